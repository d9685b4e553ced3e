// Messaging module - typed events and listener fan-out
pub mod event;
pub mod router;

pub use event::{
    DisconnectPayload, ErrorPayload, EventKind, ReminderPayload, ServerEvent, SystemPayload,
};
pub use router::{EventRouter, Listener};
