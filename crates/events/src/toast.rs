//! Toast display component.
//!
//! [`ToastCenter`] consumes notifications from the [`EventBus`](crate::EventBus),
//! writes each one to the log and keeps a bounded history of the most
//! recent toasts for whatever surface renders them.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use tokio::sync::broadcast;

use crate::bus::Notification;

/// Toasts kept when no capacity is given.
const DEFAULT_HISTORY: usize = 20;

pub struct ToastCenter {
    capacity: usize,
    recent: Mutex<VecDeque<Notification>>,
}

impl ToastCenter {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            recent: Mutex::new(VecDeque::with_capacity(capacity.max(1))),
        }
    }

    /// Run the consume loop until the bus is dropped.
    pub async fn run(self: Arc<Self>, mut receiver: broadcast::Receiver<Notification>) {
        loop {
            match receiver.recv().await {
                Ok(notification) => self.record(notification),
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "Toast center lagged");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::debug!("Event bus closed, toast center shutting down");
                    break;
                }
            }
        }
    }

    /// Log `notification` and append it to the history, evicting the oldest
    /// entry when full.
    pub fn record(&self, notification: Notification) {
        if notification.is_destructive() {
            tracing::warn!(
                title = %notification.title,
                description = %notification.description,
                "Toast"
            );
        } else {
            tracing::info!(
                title = %notification.title,
                description = %notification.description,
                "Toast"
            );
        }

        let mut recent = self.recent.lock().unwrap_or_else(|e| e.into_inner());
        if recent.len() == self.capacity {
            recent.pop_front();
        }
        recent.push_back(notification);
    }

    /// Snapshot of the retained toasts, oldest first.
    pub fn recent(&self) -> Vec<Notification> {
        self.recent
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .cloned()
            .collect()
    }
}

impl Default for ToastCenter {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY)
    }
}
