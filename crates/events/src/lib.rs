//! Passport processor notification infrastructure.
//!
//! User-facing toasts are explicit events rather than an ambient global:
//!
//! - [`EventBus`]: in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`.
//! - [`Notification`]: a single toast (title, description, level).
//! - [`ToastCenter`]: the consuming notification component; logs every
//!   notification and keeps the most recent ones for display.

pub mod bus;
pub mod toast;

pub use bus::{EventBus, Notification, NotificationLevel};
pub use toast::ToastCenter;
