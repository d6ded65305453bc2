//! Notification publication (§6). Local try-and-recover: failures never
//! propagate (§7).

use async_trait::async_trait;
use tracing::{info, warn};

use crate::interfaces::notifications::{NotificationEvent, NotificationPublisher};

/// Emits notifications as structured `tracing` events. A process that wants
/// real dispatch (webhook, message queue) wraps or replaces this adapter;
/// that wiring is outside this core's scope (§1).
pub struct TracingNotificationPublisher;

#[async_trait]
impl NotificationPublisher for TracingNotificationPublisher {
    async fn publish(&self, event: NotificationEvent) {
        match event {
            NotificationEvent::DiscDetected { disc_title, disc_type } => {
                info!(event = "disc_detected", disc_title, disc_type, "notification published");
            }
            NotificationEvent::IdentificationCompleted {
                title,
                year,
                media_type,
                display_title,
                cached,
            } => {
                info!(
                    event = "identification_completed",
                    title,
                    year,
                    media_type,
                    display_title,
                    cached,
                    "notification published"
                );
            }
            NotificationEvent::UnidentifiedMedia { label } => {
                warn!(event = "unidentified_media", label, "notification published");
            }
        }
    }
}
