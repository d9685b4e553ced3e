//! # Reminder Realtime Rust
//!
//! Realtime client for the reminder platform's notification gateway: one
//! persistent WebSocket connection with exponential-backoff reconnection,
//! typed event fan-out to any number of UI consumers, and a bridge that
//! turns reminder/system events into native notifications.
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use reminder_realtime_rs::{
//!     EventKind, RealtimeClient, RealtimeClientOptions, StaticTokenProvider,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = RealtimeClient::new(
//!         "wss://notify.example.com/ws",
//!         Arc::new(StaticTokenProvider::new("bearer-token")),
//!         RealtimeClientOptions::default(),
//!     )?;
//!
//!     client.on(EventKind::ReminderNotification, Arc::new(|event| {
//!         println!("reminder due: {:?}", event);
//!     }));
//!
//!     client.connect().await?;
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod infrastructure;
pub mod manager;
pub mod messaging;
pub mod notifications;
pub mod session;
pub mod subscription;
pub mod types;
pub mod websocket;

pub use client::{
    ConnectionState, ConnectionStatus, RealtimeClient, RealtimeClientBuilder,
    RealtimeClientOptions,
};
pub use messaging::{
    DisconnectPayload, ErrorPayload, EventKind, Listener, ReminderPayload, ServerEvent,
    SystemPayload,
};
pub use notifications::{
    NotificationBridge, NotificationRequest, Notifier, NullNotifier, PermissionState,
};
pub use session::{SharedTokenProvider, StaticTokenProvider, TokenProvider};
pub use subscription::RealtimeSubscription;
pub use types::{RealtimeError, RealtimeMessage, Result};
