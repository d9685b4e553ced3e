use async_trait::async_trait;
use reminder_realtime_rs::{
    NotificationRequest, Notifier, PermissionState, RealtimeClient, RealtimeClientOptions,
    Result, StaticTokenProvider,
};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::{WebSocketStream, accept_async};

/// Bind a loopback listener and return it with the matching ws:// URL
pub async fn bind() -> (TcpListener, String) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    (listener, format!("ws://{}/ws", addr))
}

/// Accept one client and complete the WebSocket handshake
pub async fn accept(listener: &TcpListener) -> WebSocketStream<TcpStream> {
    let (stream, _) = listener.accept().await.unwrap();
    accept_async(stream).await.unwrap()
}

/// Client with a fast backoff suited to loopback tests
pub fn fast_client(url: &str) -> RealtimeClient {
    client_with_options(
        url,
        RealtimeClientOptions {
            max_reconnect_attempts: 3,
            base_reconnect_delay_ms: 20,
        },
    )
}

pub fn client_with_options(url: &str, options: RealtimeClientOptions) -> RealtimeClient {
    RealtimeClient::new(url, Arc::new(StaticTokenProvider::new("test-token")), options).unwrap()
}

/// Poll until `condition` holds or the timeout elapses
pub async fn wait_until<F>(timeout: Duration, mut condition: F) -> bool
where
    F: FnMut() -> bool,
{
    let deadline = tokio::time::Instant::now() + timeout;
    while tokio::time::Instant::now() < deadline {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    condition()
}

/// Notifier double that records every shown request
pub struct RecordingNotifier {
    permission: PermissionState,
    pub shown: Mutex<Vec<NotificationRequest>>,
}

impl RecordingNotifier {
    pub fn granted() -> Arc<Self> {
        Arc::new(Self {
            permission: PermissionState::Granted,
            shown: Mutex::new(Vec::new()),
        })
    }

    pub fn denied() -> Arc<Self> {
        Arc::new(Self {
            permission: PermissionState::Denied,
            shown: Mutex::new(Vec::new()),
        })
    }

    pub fn shown_count(&self) -> usize {
        self.shown.lock().unwrap().len()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    fn is_supported(&self) -> bool {
        true
    }

    async fn permission(&self) -> PermissionState {
        self.permission
    }

    async fn request_permission(&self) -> PermissionState {
        self.permission
    }

    async fn show(&self, request: NotificationRequest) -> Result<()> {
        self.shown.lock().unwrap().push(request);
        Ok(())
    }
}
