use super::{ClientState, ConnectionManager, ConnectionState, RealtimeClient};
use crate::infrastructure::Backoff;
use crate::messaging::EventRouter;
use crate::notifications::{NotificationBridge, Notifier};
use crate::session::SharedTokenProvider;
use crate::types::constants::{BASE_RECONNECT_DELAY_MS, MAX_RECONNECT_ATTEMPTS};
use crate::types::{RealtimeError, Result};
use std::sync::Arc;
use tokio::sync::{RwLock, watch};
use url::Url;

/// Tunables for the connection manager; defaults match the production
/// notification gateway.
#[derive(Debug, Clone)]
pub struct RealtimeClientOptions {
    /// Reconnect ceiling before `max_reconnect_attempts` fires
    pub max_reconnect_attempts: u32,
    /// Backoff base; attempt n waits base * 2^(n-1)
    pub base_reconnect_delay_ms: u64,
}

impl Default for RealtimeClientOptions {
    fn default() -> Self {
        Self {
            max_reconnect_attempts: MAX_RECONNECT_ATTEMPTS,
            base_reconnect_delay_ms: BASE_RECONNECT_DELAY_MS,
        }
    }
}

/// Builder for RealtimeClient that handles initialization
pub struct RealtimeClientBuilder {
    endpoint: String,
    options: RealtimeClientOptions,
    token_provider: SharedTokenProvider,
    notifier: Option<Arc<dyn Notifier>>,
}

impl RealtimeClientBuilder {
    /// Create a new builder
    ///
    /// The endpoint must be a `ws://` or `wss://` URL; the token provider
    /// is consulted at every connect.
    pub fn new(
        endpoint: impl Into<String>,
        token_provider: SharedTokenProvider,
        options: RealtimeClientOptions,
    ) -> Result<Self> {
        let endpoint = endpoint.into();

        let url = Url::parse(&endpoint)?;
        if url.scheme() != "ws" && url.scheme() != "wss" {
            return Err(RealtimeError::Connection(format!(
                "endpoint must be a ws:// or wss:// URL, got '{}'",
                url.scheme()
            )));
        }

        Ok(Self {
            endpoint,
            options,
            token_provider,
            notifier: None,
        })
    }

    /// Attach a platform notification backend; without one the client
    /// carries no notification bridge
    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Build the client and spawn background tasks
    pub fn build(self) -> RealtimeClient {
        let router = Arc::new(EventRouter::new());
        let mut client_state = ClientState::new();
        client_state.backoff = Backoff::new(
            std::time::Duration::from_millis(self.options.base_reconnect_delay_ms),
            self.options.max_reconnect_attempts,
        );

        // Initialize state watcher channel
        let (state_tx, state_rx) = watch::channel((ConnectionState::Idle, false));
        client_state.state_change_tx = Some(state_tx);

        // Wire the notification bridge as an ordinary subscriber
        let bridge = self.notifier.map(|notifier| {
            let bridge = Arc::new(NotificationBridge::new(notifier));
            let consumer = bridge.attach(&router);
            client_state.task_manager.track(consumer);
            bridge
        });

        let client = RealtimeClient {
            endpoint: self.endpoint,
            options: self.options,
            token_provider: self.token_provider,
            connection: Arc::new(ConnectionManager::new()),
            router,
            bridge,
            state: Arc::new(RwLock::new(client_state)),
        };

        // Spawn reconnection watcher task
        let client_for_watcher = client.clone();
        tokio::spawn(async move {
            let mut rx = state_rx;

            while rx.changed().await.is_ok() {
                let (state, was_manual) = *rx.borrow_and_update();

                // Reconnect if closed AND not manual
                if matches!(state, ConnectionState::Closed) && !was_manual {
                    tracing::info!("State watcher detected disconnect, attempting reconnection...");
                    client_for_watcher.try_reconnect().await;
                }
            }
            tracing::info!("Reconnection watcher task finished");
        });

        client
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::StaticTokenProvider;

    fn provider() -> SharedTokenProvider {
        Arc::new(StaticTokenProvider::new("jwt"))
    }

    #[test]
    fn test_rejects_non_websocket_scheme() {
        let result = RealtimeClientBuilder::new(
            "https://notify.example.com/ws",
            provider(),
            RealtimeClientOptions::default(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_rejects_malformed_endpoint() {
        let result = RealtimeClientBuilder::new(
            "not a url",
            provider(),
            RealtimeClientOptions::default(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_accepts_secure_websocket_endpoint() {
        let result = RealtimeClientBuilder::new(
            "wss://notify.example.com/ws",
            provider(),
            RealtimeClientOptions::default(),
        );
        assert!(result.is_ok());
    }
}
