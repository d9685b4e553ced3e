use super::{
    ClientState, ConnectionManager, ConnectionState, ConnectionStatus, RealtimeClientBuilder,
    RealtimeClientOptions,
};
use crate::messaging::{
    DisconnectPayload, ErrorPayload, EventKind, EventRouter, Listener, ServerEvent,
};
use crate::notifications::{NotificationBridge, PermissionState};
use crate::session::SharedTokenProvider;
use crate::types::{RealtimeMessage, Result};
use crate::websocket::{WebSocketFactory, WsStream};
use futures::stream::{SplitStream, StreamExt};
use std::sync::Arc;
use tokio::sync::RwLock;
use url::Url;

/// The main entry point for the realtime reminder gateway.
///
/// `RealtimeClient` maintains exactly one logical WebSocket connection to
/// the notification server, reconnects with exponential backoff after
/// unplanned closes, and fans typed server events out to registered
/// listeners in arrival order. Outbound sends are best-effort: while
/// disconnected they are logged and dropped, never queued and never
/// surfaced as errors.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use reminder_realtime_rs::{
///     EventKind, RealtimeClient, RealtimeClientOptions, StaticTokenProvider,
/// };
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = RealtimeClient::new(
///     "wss://notify.example.com/ws",
///     Arc::new(StaticTokenProvider::new("bearer-token")),
///     RealtimeClientOptions::default(),
/// )?;
///
/// client.on(EventKind::ReminderCreated, Arc::new(|event| {
///     println!("reminder created: {:?}", event);
/// }));
///
/// client.connect().await?;
/// // ... later
/// client.disconnect().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct RealtimeClient {
    pub(crate) endpoint: String,
    pub(crate) options: RealtimeClientOptions,
    pub(crate) token_provider: SharedTokenProvider,

    // Connection manager
    pub(crate) connection: Arc<ConnectionManager>,

    // Typed event fan-out
    pub(crate) router: Arc<EventRouter>,

    // Optional notification bridge (present when a notifier was attached)
    pub(crate) bridge: Option<Arc<NotificationBridge>>,

    // Consolidated mutable state
    pub(crate) state: Arc<RwLock<ClientState>>,
}

impl RealtimeClient {
    /// Creates a new client without connecting.
    ///
    /// Must be called within a tokio runtime; the builder spawns the
    /// reconnection watcher task. Call [`connect()`](Self::connect) to
    /// establish the connection.
    ///
    /// # Errors
    ///
    /// Returns [`RealtimeError::UrlParse`](crate::types::RealtimeError::UrlParse)
    /// or [`RealtimeError::Connection`](crate::types::RealtimeError::Connection)
    /// if the endpoint is not a valid `ws://`/`wss://` URL.
    pub fn new(
        endpoint: impl Into<String>,
        token_provider: SharedTokenProvider,
        options: RealtimeClientOptions,
    ) -> Result<Self> {
        RealtimeClientBuilder::new(endpoint, token_provider, options).map(|builder| builder.build())
    }

    /// Set connection state and notify watchers
    async fn set_state(&self, new_state: ConnectionState) {
        self.connection.set_state(new_state).await;

        let state = self.state.read().await;
        state.notify_state_change(new_state, state.was_manual_disconnect);
    }

    /// Set manual disconnect flag and notify watchers
    async fn set_manual_disconnect(&self, manual: bool) {
        let mut state = self.state.write().await;
        state.was_manual_disconnect = manual;

        let conn_state = self.connection.state().await;
        state.notify_state_change(conn_state, manual);
    }

    /// Fan an event out to listeners
    fn emit(&self, event: &ServerEvent) {
        self.router.dispatch(event);
    }

    /// Establishes the WebSocket connection to the notification server.
    ///
    /// Idempotent: while a connection is open or an attempt is in flight
    /// this returns immediately. Without an access token from the
    /// injected provider the call logs and returns without creating a
    /// transport (the expected pre-login state). A failed handshake is
    /// not an error either: it is emitted as an `error` event and handed
    /// to the backoff machinery. An explicit `connect()` always restarts
    /// the reconnect schedule from zero.
    pub async fn connect(&self) -> Result<()> {
        {
            let state = self.connection.state().await;
            if state == ConnectionState::Open || state == ConnectionState::Connecting {
                return Ok(());
            }
        }

        {
            let mut state = self.state.write().await;
            state.reset_reconnect();
            state.was_manual_disconnect = false;
        }

        if let Err(e) = self.establish().await {
            tracing::warn!("Connection attempt failed, retrying with backoff: {}", e);
        }
        Ok(())
    }

    /// One connection attempt; used by `connect()` and the reconnect loop
    pub(crate) async fn establish(&self) -> Result<()> {
        let Some(token) = self.token_provider.access_token() else {
            tracing::warn!("No access token available, skipping connection");
            return Ok(());
        };

        self.set_state(ConnectionState::Connecting).await;

        let url = self.build_endpoint_url(&token)?;
        tracing::info!("Connecting to {}", &self.endpoint);

        let ws_stream = match WebSocketFactory::create(&url).await {
            Ok(stream) => stream,
            Err(e) => {
                tracing::error!("Failed to open WebSocket connection: {}", e);
                self.emit(&ServerEvent::Error(ErrorPayload {
                    message: e.to_string(),
                }));
                self.set_state(ConnectionState::Closed).await;
                return Err(e);
            }
        };
        let (write_half, read_half) = ws_stream.split();

        // Give write half to ConnectionManager
        self.connection.set_writer(write_half).await;

        // Spawn read task using TaskManager
        let self_cloned = self.clone();
        {
            let mut state = self.state.write().await;
            state
                .task_manager
                .spawn(async move { self_cloned.read_loop(read_half).await });
        }

        {
            let mut state = self.state.write().await;
            state.reset_reconnect();
        }
        self.set_state(ConnectionState::Open).await;
        self.emit(&ServerEvent::Connected);

        tracing::info!("Connected to notification server");
        Ok(())
    }

    /// Frame pump: decodes inbound frames and fans them out in arrival order
    async fn read_loop(self, mut read_half: SplitStream<WsStream>) {
        use tokio_tungstenite::tungstenite::Message;

        tracing::info!("Starting read task");
        while let Some(msg_result) = read_half.next().await {
            match msg_result {
                Ok(msg) => match msg {
                    Message::Text(text) => {
                        tracing::debug!("Received text frame: {}", text);
                        match serde_json::from_str::<RealtimeMessage>(&text) {
                            Ok(message) => match ServerEvent::from_message(message) {
                                Ok(event) => self.emit(&event),
                                Err(e) => {
                                    tracing::warn!("Dropping frame with malformed payload: {}", e)
                                }
                            },
                            Err(e) => {
                                tracing::warn!("Failed to parse frame: {} - Raw: {}", e, text)
                            }
                        }
                    }
                    Message::Close(frame) => {
                        let payload = match frame {
                            Some(close_frame) => {
                                tracing::warn!(
                                    "Server closed connection: code={:?}, reason='{}'",
                                    close_frame.code,
                                    close_frame.reason
                                );
                                DisconnectPayload {
                                    code: Some(u16::from(close_frame.code)),
                                    reason: Some(close_frame.reason.to_string()),
                                }
                            }
                            None => {
                                tracing::warn!("Server closed connection without close frame");
                                DisconnectPayload::default()
                            }
                        };
                        self.connection.clear_writer().await;
                        self.emit(&ServerEvent::Disconnected(payload));
                        self.set_state(ConnectionState::Closed).await;
                        break;
                    }
                    Message::Ping(data) => {
                        tracing::debug!("Received ping ({} bytes)", data.len());
                    }
                    Message::Pong(data) => {
                        tracing::debug!("Received pong ({} bytes)", data.len());
                    }
                    Message::Binary(data) => {
                        tracing::warn!("Received unexpected binary frame ({} bytes)", data.len());
                    }
                    Message::Frame(_) => {
                        tracing::debug!("Received raw frame (internal)");
                    }
                },
                Err(e) => {
                    tracing::error!("WebSocket read error: {}", e);
                    self.connection.clear_writer().await;
                    self.emit(&ServerEvent::Error(ErrorPayload {
                        message: e.to_string(),
                    }));
                    self.emit(&ServerEvent::Disconnected(DisconnectPayload::default()));
                    self.set_state(ConnectionState::Closed).await;
                    break;
                }
            }
        }

        // Stream ended without a close frame or read error (peer vanished)
        if self.connection.state().await == ConnectionState::Open {
            self.connection.clear_writer().await;
            self.emit(&ServerEvent::Disconnected(DisconnectPayload::default()));
            self.set_state(ConnectionState::Closed).await;
        }
        tracing::info!("Read task finished");
    }

    /// Backoff-driven reconnect loop, invoked by the state watcher after
    /// every unplanned close.
    ///
    /// Attempt n sleeps `base * 2^(n-1)` first; once the schedule is
    /// exhausted a single `max_reconnect_attempts` event is emitted and
    /// the loop stops until an explicit `connect()` resets it.
    pub(crate) async fn try_reconnect(&self) {
        loop {
            if self.state.read().await.was_manual_disconnect {
                tracing::info!("Manual disconnect detected, will not attempt to reconnect");
                return;
            }

            {
                let conn_state = self.connection.state().await;
                if conn_state == ConnectionState::Open || conn_state == ConnectionState::Connecting
                {
                    tracing::info!(
                        "Already connected or connecting, stopping reconnection attempts"
                    );
                    return;
                }
            }

            let (delay, attempt) = {
                let mut state = self.state.write().await;
                match state.backoff.next_delay() {
                    Some(delay) => (delay, state.backoff.attempts()),
                    None => {
                        if state.ceiling_reported {
                            return;
                        }
                        state.ceiling_reported = true;
                        drop(state);

                        tracing::error!("Max reconnection attempts reached");
                        self.emit(&ServerEvent::MaxReconnectAttempts);
                        return;
                    }
                }
            };

            tracing::info!(
                "Attempting to reconnect in {:?} (attempt {}/{})",
                delay,
                attempt,
                self.options.max_reconnect_attempts
            );
            tokio::time::sleep(delay).await;

            if self.state.read().await.was_manual_disconnect {
                tracing::info!("Manual disconnect during backoff, abandoning reconnect");
                return;
            }

            match self.establish().await {
                Ok(_) => {
                    tracing::info!("Reconnected successfully");
                    return;
                }
                Err(e) => {
                    tracing::error!("Reconnection attempt failed: {}", e);
                }
            }
        }
    }

    /// Register a listener for an event kind.
    ///
    /// The reserved kinds `connected`, `disconnected`, `error` and
    /// `max_reconnect_attempts` are emitted by the client itself;
    /// everything else is keyed by the inbound frame's `type` string.
    pub fn on(&self, kind: impl Into<EventKind>, listener: Listener) {
        self.router.on(kind.into(), listener);
    }

    /// Remove a previously registered listener; unknown listeners are a no-op
    pub fn off(&self, kind: impl Into<EventKind>, listener: &Listener) {
        self.router.off(&kind.into(), listener);
    }

    /// Serialize `{type, data, timestamp}` and transmit if connected.
    ///
    /// While not connected the message is logged and dropped: no
    /// buffering, no retry, no error to the caller.
    pub async fn send(&self, kind: impl Into<EventKind>, data: serde_json::Value) {
        let kind = kind.into();
        if !self.connection.is_connected().await {
            tracing::warn!("Not connected, dropping outbound '{}' message", kind);
            return;
        }

        let message = RealtimeMessage::new(kind.as_str(), data)
            .with_timestamp(chrono::Utc::now().to_rfc3339());

        if let Err(e) = self.connection.send_message(message).await {
            tracing::error!("Failed to send '{}' message: {}", kind, e);
        }
    }

    /// Status snapshot for UI consumers
    pub async fn connection_status(&self) -> ConnectionStatus {
        let ready_state = self.connection.state().await;
        let reconnect_attempts = self.state.read().await.backoff.attempts();

        ConnectionStatus {
            is_connected: ready_state == ConnectionState::Open,
            reconnect_attempts,
            ready_state,
        }
    }

    /// Checks whether the client is currently connected to the server
    pub async fn is_connected(&self) -> bool {
        self.connection.is_connected().await
    }

    /// Permission passthrough to the attached notification bridge.
    ///
    /// Without a bridge this reports `Unsupported`.
    pub async fn request_notification_permission(&self) -> PermissionState {
        match &self.bridge {
            Some(bridge) => bridge.request_permission().await,
            None => PermissionState::Unsupported,
        }
    }

    /// Tears the connection down and clears every listener registration.
    ///
    /// The read and bridge tasks are aborted before the registry is
    /// cleared, so no frame observed after `disconnect()` begins can
    /// reach a listener, and any pending reconnect is abandoned. The
    /// reconnect counter resets to zero.
    pub async fn disconnect(&self) -> Result<()> {
        self.set_manual_disconnect(true).await;
        tracing::info!("Disconnecting from notification server");

        {
            let mut state = self.state.write().await;
            state.task_manager.abort_all();
        }

        self.router.clear();

        self.connection.close().await?;

        {
            let mut state = self.state.write().await;
            state.reset_reconnect();
        }

        tracing::info!("Disconnected from notification server");
        Ok(())
    }

    /// Build the WebSocket endpoint URL with the bearer token attached
    fn build_endpoint_url(&self, token: &str) -> Result<String> {
        let mut url = Url::parse(&self.endpoint)?;

        url.query_pairs_mut().append_pair("token", token);

        Ok(url.to_string())
    }
}
