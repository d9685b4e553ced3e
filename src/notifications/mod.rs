// Notifications module - event-to-notification policy over an injected
// platform primitive
pub mod bridge;
pub mod notifier;

pub use bridge::NotificationBridge;
pub use notifier::{NotificationRequest, Notifier, NullNotifier, PermissionState};
