//! Scan Parser and Disc Scanner (§4.3, §4.4).

pub mod disc_scanner;
pub mod scan_parser;

pub use disc_scanner::{device_path, normalize_device, DiscScanner};
pub use scan_parser::{BdInfoParser, ScanParser};
