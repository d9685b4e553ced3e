use crate::types::{RealtimeMessage, error::Result};
use crate::websocket::WsStream;
use futures::SinkExt;
use futures::stream::SplitSink;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio_tungstenite::tungstenite::Message;

/// Lifecycle of the underlying transport handle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// No connection has been attempted yet
    Idle,
    Connecting,
    Open,
    Closing,
    Closed,
}

/// Synchronous status snapshot exposed to UI consumers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectionStatus {
    pub is_connected: bool,
    pub reconnect_attempts: u32,
    pub ready_state: ConnectionState,
}

impl Default for ConnectionStatus {
    fn default() -> Self {
        Self {
            is_connected: false,
            reconnect_attempts: 0,
            ready_state: ConnectionState::Idle,
        }
    }
}

/// Owns the write half of the transport and the connection state.
///
/// At most one live transport handle exists per manager at any time;
/// a new writer replaces the previous one only after an explicit close.
pub struct ConnectionManager {
    ws_write: Arc<RwLock<Option<SplitSink<WsStream, Message>>>>,
    state: Arc<RwLock<ConnectionState>>,
}

impl ConnectionManager {
    pub fn new() -> Self {
        Self {
            ws_write: Arc::new(RwLock::new(None)),
            state: Arc::new(RwLock::new(ConnectionState::Idle)),
        }
    }

    /// Sets the WebSocket write sink (called after successful connection)
    pub async fn set_writer(&self, writer: SplitSink<WsStream, Message>) {
        let mut ws = self.ws_write.write().await;
        *ws = Some(writer);
    }

    /// Gets the current connection state
    pub async fn state(&self) -> ConnectionState {
        *self.state.read().await
    }

    /// Sets the connection state
    pub async fn set_state(&self, new_state: ConnectionState) {
        let mut state = self.state.write().await;
        *state = new_state;
    }

    /// Checks if currently connected
    pub async fn is_connected(&self) -> bool {
        *self.state.read().await == ConnectionState::Open
    }

    /// Sends a message through the WebSocket connection
    pub async fn send_message(&self, msg: RealtimeMessage) -> Result<()> {
        let json = serde_json::to_string(&msg)?;
        let message = Message::Text(json.into());

        let mut ws_guard = self.ws_write.write().await;
        if let Some(ws) = ws_guard.as_mut() {
            ws.send(message).await?;
        }

        Ok(())
    }

    /// Closes the WebSocket connection gracefully
    pub async fn close(&self) -> Result<()> {
        self.set_state(ConnectionState::Closing).await;

        let mut ws_guard = self.ws_write.write().await;
        if let Some(ws) = ws_guard.as_mut() {
            ws.close().await?;
        }
        *ws_guard = None;

        self.set_state(ConnectionState::Closed).await;

        Ok(())
    }

    /// Clears the writer (used when the read task observes a dead peer)
    pub async fn clear_writer(&self) {
        let mut ws = self.ws_write.write().await;
        *ws = None;
    }
}

impl Default for ConnectionManager {
    fn default() -> Self {
        Self::new()
    }
}
