//! The Queue collaborator (§3, §4.13). Queue persistence, item-id
//! allocation, and deletion are out of scope for this core; the Identifier
//! only reads and mutates a defined subset of fields on items it is handed.

use async_trait::async_trait;
use serde_json::Value;

use crate::shared::error::IdentifyError;

/// Finite-state slice over status (§4.13): `Pending → Identifying →
/// (Identified | Review | Failed)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueueStatus {
    Pending,
    Identifying,
    Identified,
    Review,
    Failed,
    /// Present in the broader workflow; the identifier never sets it but may
    /// observe it when checking for duplicate fingerprints.
    Completed,
}

/// The subset of queue-item state the core reads and mutates. Item ids and
/// source queue persistence belong to the caller.
#[derive(Debug, Clone)]
pub struct QueueItem {
    pub id: String,
    pub fingerprint: Option<String>,
    pub disc_title: String,
    pub status: QueueStatus,
    pub needs_review: bool,
    pub review_reason: Option<String>,
    pub progress_stage: String,
    pub progress_percent: u8,
    pub progress_message: String,
    pub error_message: Option<String>,
    pub metadata: Option<Value>,
    pub rip_spec: Option<Value>,
    pub source_path: String,
}

impl QueueItem {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            fingerprint: None,
            disc_title: String::new(),
            status: QueueStatus::Pending,
            needs_review: false,
            review_reason: None,
            progress_stage: String::new(),
            progress_percent: 0,
            progress_message: String::new(),
            error_message: None,
            metadata: None,
            rip_spec: None,
            source_path: String::new(),
        }
    }
}

/// Read/write access to the external queue, scoped to what the Identifier
/// needs (§4.13 step 4: duplicate-fingerprint lookup).
#[async_trait]
pub trait QueueRepository: Send + Sync {
    async fn find_by_fingerprint(&self, fingerprint: &str) -> Result<Option<QueueItem>, IdentifyError>;
    async fn save(&self, item: &QueueItem) -> Result<(), IdentifyError>;
}
