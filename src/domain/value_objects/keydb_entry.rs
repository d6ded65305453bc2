//! One record from the keydb catalog (§3, §4.12).

#[derive(Debug, Clone, PartialEq)]
pub struct KeydbEntry {
    /// 40-uppercase-hex disc id.
    pub disc_id: String,
    pub title: String,
    pub raw: String,
}
