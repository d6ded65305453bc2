//! Fingerprinter (§4.1).

pub mod fingerprinter;
pub mod mount_table;

pub use fingerprinter::Fingerprinter;
