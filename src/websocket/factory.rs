use crate::types::Result;
use tokio::net::TcpStream;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

/// Raw transport stream handed out by the factory
pub type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// WebSocket factory for creating WebSocket connections
pub struct WebSocketFactory;

impl WebSocketFactory {
    /// Create a new WebSocket connection
    pub async fn create(url: &str) -> Result<WsStream> {
        tracing::debug!("Creating WebSocket connection to: {}", url);
        let (stream, response) = connect_async(url).await?;
        tracing::debug!("WebSocket handshake complete: {}", response.status());
        Ok(stream)
    }
}
