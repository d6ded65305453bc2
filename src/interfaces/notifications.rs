//! Notification events emitted during identification (§6). A concrete enum
//! rather than a generic event bus: the Identifier only ever emits these
//! three, and a non-generic trait stays object-safe for dependency
//! injection and mocking.

use async_trait::async_trait;

#[derive(Debug, Clone, PartialEq)]
pub enum NotificationEvent {
    DiscDetected {
        disc_title: String,
        disc_type: String,
    },
    IdentificationCompleted {
        title: String,
        year: String,
        media_type: String,
        display_title: String,
        cached: bool,
    },
    UnidentifiedMedia {
        label: String,
    },
}

/// Publication is local try-and-recover (§7): failures are logged, never
/// propagated to the caller.
#[async_trait]
pub trait NotificationPublisher: Send + Sync {
    async fn publish(&self, event: NotificationEvent);
}
