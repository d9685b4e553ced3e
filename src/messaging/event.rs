use crate::types::RealtimeMessage;
use crate::types::constants::{client_events, server_events};
use serde::{Deserialize, Serialize};

/// Type-safe event kinds used as listener registry keys.
///
/// The reserved kinds (`connected`, `disconnected`, `error`,
/// `max_reconnect_attempts`) are synthesized by the client itself; the
/// reminder/system kinds arrive from the server. Anything else falls
/// through to `Custom`, so dispatch stays type-keyed rather than
/// allowlisted.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Connection established
    Connected,

    /// Connection lost (planned or unplanned)
    Disconnected,

    /// Transport-level error
    Error,

    /// Reconnect ceiling reached
    MaxReconnectAttempts,

    /// A reminder is due
    ReminderNotification,

    /// A reminder was created
    ReminderCreated,

    /// A reminder was updated
    ReminderUpdated,

    /// Server-originated announcement
    SystemNotification,

    /// Any event type this client has no dedicated handling for
    Custom(String),
}

impl EventKind {
    /// Parse a string into an EventKind
    pub fn parse(s: &str) -> Self {
        match s {
            client_events::CONNECTED => Self::Connected,
            client_events::DISCONNECTED => Self::Disconnected,
            client_events::ERROR => Self::Error,
            client_events::MAX_RECONNECT_ATTEMPTS => Self::MaxReconnectAttempts,
            server_events::REMINDER_NOTIFICATION => Self::ReminderNotification,
            server_events::REMINDER_CREATED => Self::ReminderCreated,
            server_events::REMINDER_UPDATED => Self::ReminderUpdated,
            server_events::SYSTEM_NOTIFICATION => Self::SystemNotification,
            _ => Self::Custom(s.to_string()),
        }
    }

    /// Convert the kind to its wire string
    pub fn as_str(&self) -> &str {
        match self {
            Self::Connected => client_events::CONNECTED,
            Self::Disconnected => client_events::DISCONNECTED,
            Self::Error => client_events::ERROR,
            Self::MaxReconnectAttempts => client_events::MAX_RECONNECT_ATTEMPTS,
            Self::ReminderNotification => server_events::REMINDER_NOTIFICATION,
            Self::ReminderCreated => server_events::REMINDER_CREATED,
            Self::ReminderUpdated => server_events::REMINDER_UPDATED,
            Self::SystemNotification => server_events::SYSTEM_NOTIFICATION,
            Self::Custom(s) => s,
        }
    }
}

impl From<&str> for EventKind {
    fn from(s: &str) -> Self {
        Self::parse(s)
    }
}

impl From<String> for EventKind {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Payload for reminder-carrying events.
///
/// Mirrors the reminder record the server pushes; only `id`, `text`,
/// `message` and `completed` drive the notification bridge, the rest is
/// passed through to listeners.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReminderPayload {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub datetime: Option<String>,
}

/// Payload for `system_notification` events
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SystemPayload {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

/// Payload attached to `disconnected` events
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DisconnectPayload {
    #[serde(default)]
    pub code: Option<u16>,
    #[serde(default)]
    pub reason: Option<String>,
}

/// Payload attached to `error` events
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrorPayload {
    #[serde(default)]
    pub message: String,
}

/// A fully decoded event, fanned out to listeners in arrival order.
#[derive(Debug, Clone, PartialEq)]
pub enum ServerEvent {
    Connected,
    Disconnected(DisconnectPayload),
    Error(ErrorPayload),
    MaxReconnectAttempts,
    ReminderNotification(ReminderPayload),
    ReminderCreated(ReminderPayload),
    ReminderUpdated(ReminderPayload),
    SystemNotification(SystemPayload),
    Custom {
        kind: String,
        data: serde_json::Value,
    },
}

impl ServerEvent {
    /// The registry key this event dispatches under
    pub fn kind(&self) -> EventKind {
        match self {
            Self::Connected => EventKind::Connected,
            Self::Disconnected(_) => EventKind::Disconnected,
            Self::Error(_) => EventKind::Error,
            Self::MaxReconnectAttempts => EventKind::MaxReconnectAttempts,
            Self::ReminderNotification(_) => EventKind::ReminderNotification,
            Self::ReminderCreated(_) => EventKind::ReminderCreated,
            Self::ReminderUpdated(_) => EventKind::ReminderUpdated,
            Self::SystemNotification(_) => EventKind::SystemNotification,
            Self::Custom { kind, .. } => EventKind::Custom(kind.clone()),
        }
    }

    /// Decode a wire envelope into a typed event.
    ///
    /// Payloads that do not match the typed shape of a known kind are a
    /// decode error; the caller logs and drops the frame.
    pub fn from_message(message: RealtimeMessage) -> crate::types::Result<Self> {
        let event = match EventKind::parse(&message.kind) {
            EventKind::Connected => Self::Connected,
            EventKind::Disconnected => Self::Disconnected(serde_json::from_value(message.data)?),
            EventKind::Error => Self::Error(serde_json::from_value(message.data)?),
            EventKind::MaxReconnectAttempts => Self::MaxReconnectAttempts,
            EventKind::ReminderNotification => {
                Self::ReminderNotification(serde_json::from_value(message.data)?)
            }
            EventKind::ReminderCreated => {
                Self::ReminderCreated(serde_json::from_value(message.data)?)
            }
            EventKind::ReminderUpdated => {
                Self::ReminderUpdated(serde_json::from_value(message.data)?)
            }
            EventKind::SystemNotification => {
                Self::SystemNotification(serde_json::from_value(message.data)?)
            }
            EventKind::Custom(kind) => Self::Custom {
                kind,
                data: message.data,
            },
        };

        Ok(event)
    }
}
