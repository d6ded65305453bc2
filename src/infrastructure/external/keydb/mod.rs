//! Keydb Catalog (§4.12).

pub mod catalog;

pub use catalog::{parse_line, KeydbCatalog};
