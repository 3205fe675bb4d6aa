//! In-process event bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`EventBus`] is the publish/subscribe hub for [`Notification`]s. It is
//! shared via `Arc<EventBus>` between the processor that emits toasts and
//! the component that displays them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

// ---------------------------------------------------------------------------
// Notification
// ---------------------------------------------------------------------------

/// Visual weight of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Info,
    Destructive,
}

/// A toast shown to the user.
///
/// Constructed via [`Notification::info`] or [`Notification::destructive`]
/// and optionally enriched with [`with_payload`](Notification::with_payload).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub level: NotificationLevel,

    /// Short headline, e.g. `"Extraction Complete"`.
    pub title: String,

    pub description: String,

    /// Structured data to render alongside the description (the saved
    /// fields, for instance).
    pub payload: Option<serde_json::Value>,

    pub timestamp: DateTime<Utc>,
}

impl Notification {
    fn new(
        level: NotificationLevel,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            level,
            title: title.into(),
            description: description.into(),
            payload: None,
            timestamp: Utc::now(),
        }
    }

    pub fn info(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Info, title, description)
    }

    pub fn destructive(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Destructive, title, description)
    }

    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = Some(payload);
        self
    }

    pub fn is_destructive(&self) -> bool {
        self.level == NotificationLevel::Destructive
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 64;

/// In-process fan-out event bus.
///
/// # Usage
///
/// ```rust
/// use passport_events::bus::{EventBus, Notification};
///
/// let bus = EventBus::default();
/// let mut rx = bus.subscribe();
///
/// bus.publish(Notification::info("Extraction Complete", "Passport data has been extracted successfully."));
/// ```
pub struct EventBus {
    sender: broadcast::Sender<Notification>,
}

impl EventBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full, the oldest un-consumed messages are dropped
    /// and slow receivers will observe a `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish a notification to all current subscribers.
    ///
    /// If there are no active subscribers the notification is dropped.
    pub fn publish(&self, notification: Notification) {
        // Ignore the SendError; it only means there are zero receivers.
        let _ = self.sender.send(notification);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn publish_and_receive_single_subscriber() {
        let bus = EventBus::default();
        let mut rx = bus.subscribe();

        bus.publish(
            Notification::info("Data Saved (Simulated)", "")
                .with_payload(serde_json::json!({"firstName": "JOHN"})),
        );

        let received = rx.recv().await.expect("should receive the notification");
        assert_eq!(received.title, "Data Saved (Simulated)");
        assert_eq!(received.level, NotificationLevel::Info);
        assert_eq!(received.payload.unwrap()["firstName"], "JOHN");
    }

    #[tokio::test]
    async fn multiple_subscribers_receive_same_notification() {
        let bus = EventBus::default();
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        bus.publish(Notification::destructive("Extraction Failed", "try again"));

        let n1 = rx1.recv().await.expect("subscriber 1 should receive");
        let n2 = rx2.recv().await.expect("subscriber 2 should receive");

        assert!(n1.is_destructive());
        assert_eq!(n2.title, "Extraction Failed");
    }

    #[test]
    fn publish_with_no_subscribers_does_not_panic() {
        let bus = EventBus::default();
        bus.publish(Notification::info("orphan", ""));
    }
}
