//! In-app real-time delivery over a broadcast channel.
//!
//! Streaming consumers (websocket handlers and the like) subscribe and
//! filter by recipient. Publishing is fire-and-forget: having no active
//! subscriber is not a delivery failure.

use async_trait::async_trait;
use licreg_common::AppResult;
use licreg_db::entities::notification::{self, EventType};
use serde::Serialize;
use tokio::sync::broadcast;

/// Event payload pushed to in-app subscribers.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InAppEvent {
    /// Notification row id.
    pub notification_id: String,
    /// User the event is addressed to.
    pub recipient_user_id: String,
    /// Workflow event the notification announces.
    pub event_type: EventType,
    /// Rendered message body.
    pub message: String,
}

/// Realtime publisher backed by a tokio broadcast channel.
pub struct BroadcastRealtimePublisher {
    tx: broadcast::Sender<InAppEvent>,
}

impl BroadcastRealtimePublisher {
    /// Create a publisher with the given buffer capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Subscribe to the event stream.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<InAppEvent> {
        self.tx.subscribe()
    }
}

impl Default for BroadcastRealtimePublisher {
    fn default() -> Self {
        Self::new(1024)
    }
}

#[async_trait]
impl super::RealtimePublisher for BroadcastRealtimePublisher {
    async fn publish(&self, notification: &notification::Model) -> AppResult<()> {
        let event = InAppEvent {
            notification_id: notification.id.clone(),
            recipient_user_id: notification.recipient_user_id.clone(),
            event_type: notification.event_type,
            message: notification.message.clone(),
        };

        if self.tx.send(event).is_err() {
            tracing::debug!(
                notification_id = %notification.id,
                "no active in-app subscribers"
            );
        }

        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::super::RealtimePublisher;
    use super::*;
    use chrono::Utc;
    use licreg_db::entities::notification::{Channel, DeliveryStatus, EntityName};

    fn sample_notification() -> notification::Model {
        notification::Model {
            id: "n1".to_string(),
            registration_id: Some("reg1".to_string()),
            event_type: EventType::RegistrationSubmitted,
            recipient_user_id: "checker1".to_string(),
            triggered_by_user_id: "maker1".to_string(),
            message: "Registration reg1 was submitted".to_string(),
            channel: Channel::InApp,
            status: DeliveryStatus::Pending,
            entity_name: EntityName::Registration,
            entity_id: Some("reg1".to_string()),
            retry_count: 0,
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_publish_reaches_subscriber() {
        let publisher = BroadcastRealtimePublisher::new(8);
        let mut rx = publisher.subscribe();

        publisher.publish(&sample_notification()).await.unwrap();

        let event = rx.recv().await.unwrap();
        assert_eq!(event.notification_id, "n1");
        assert_eq!(event.recipient_user_id, "checker1");
    }

    #[tokio::test]
    async fn test_publish_without_subscribers_is_ok() {
        let publisher = BroadcastRealtimePublisher::new(8);
        assert!(publisher.publish(&sample_notification()).await.is_ok());
    }
}
