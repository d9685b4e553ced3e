/// Reserved event names emitted by the client itself (magic strings layer)
pub mod client_events {
    pub const CONNECTED: &str = "connected";
    pub const DISCONNECTED: &str = "disconnected";
    pub const ERROR: &str = "error";
    pub const MAX_RECONNECT_ATTEMPTS: &str = "max_reconnect_attempts";
}

/// Server-pushed event names (magic strings layer)
pub mod server_events {
    pub const REMINDER_NOTIFICATION: &str = "reminder_notification";
    pub const REMINDER_CREATED: &str = "reminder_created";
    pub const REMINDER_UPDATED: &str = "reminder_updated";
    pub const SYSTEM_NOTIFICATION: &str = "system_notification";
}

/// Maximum reconnect attempts before `max_reconnect_attempts` fires
pub const MAX_RECONNECT_ATTEMPTS: u32 = 5;

/// Base reconnect delay (milliseconds); attempt n waits base * 2^(n-1)
pub const BASE_RECONNECT_DELAY_MS: u64 = 1000;

/// How long a shown notification stays up before auto-dismissing (milliseconds)
pub const NOTIFICATION_AUTO_CLOSE_MS: u64 = 10_000;

/// Subscription adapter status refresh period (milliseconds)
pub const STATUS_POLL_INTERVAL_MS: u64 = 5000;

/// Bounded buffer between the event router and the notification bridge
pub const BRIDGE_BUFFER_SIZE: usize = 100;

/// Notification copy and routing defaults
pub mod notification_defaults {
    pub const REMINDER_TITLE: &str = "Reminder";
    pub const REMINDER_BODY: &str = "You have a new reminder";
    pub const CREATED_TITLE: &str = "Reminder created";
    pub const CREATED_BODY: &str = "A new reminder was created";
    pub const COMPLETED_TITLE: &str = "Reminder completed";
    pub const COMPLETED_BODY: &str = "Reminder marked as completed";
    pub const SYSTEM_TITLE: &str = "System notification";
    pub const SYSTEM_BODY: &str = "You have a new notification";

    pub const ICON: &str = "/icon-192x192.png";
    pub const REMINDERS_URL: &str = "/reminders";
    pub const ROOT_URL: &str = "/";
}
