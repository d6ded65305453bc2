//! A minimal in-process Queue Repository. The real queue (persistence, item
//! allocation, deletion) is out of scope for this core (§3); this adapter
//! exists only so the CLI binary has something concrete to drive against.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::interfaces::queue::{QueueItem, QueueRepository};
use crate::shared::error::IdentifyError;

#[derive(Default)]
pub struct InMemoryQueueRepository {
    items: Mutex<HashMap<String, QueueItem>>,
}

impl InMemoryQueueRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl QueueRepository for InMemoryQueueRepository {
    async fn find_by_fingerprint(&self, fingerprint: &str) -> Result<Option<QueueItem>, IdentifyError> {
        let items = self.items.lock().unwrap();
        Ok(items
            .values()
            .find(|item| item.fingerprint.as_deref() == Some(fingerprint))
            .cloned())
    }

    async fn save(&self, item: &QueueItem) -> Result<(), IdentifyError> {
        self.items.lock().unwrap().insert(item.id.clone(), item.clone());
        Ok(())
    }
}
