//! Message channels.
//!
//! A session only needs to receive one request and send one response at a
//! time. [`Channel`] captures exactly that, so the session loop can run
//! over a WebSocket in production and over an in-memory pipe in tests.

use crate::error::SessionError;
use crate::protocol::{Envelope, Response};
use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::WebSocketStream;
use tracing::debug;

/// A duplex, message-oriented connection to one client.
#[async_trait]
pub trait Channel: Send {
    /// Waits for the next request. `Ok(None)` means the peer hung up.
    async fn recv(&mut self) -> Result<Option<Envelope>, SessionError>;

    /// Sends one response.
    async fn send(&mut self, response: &Response) -> Result<(), SessionError>;

    /// Closes the channel.
    async fn close(&mut self) -> Result<(), SessionError>;
}

/// A [`Channel`] over a WebSocket. Each text or binary frame holds one
/// JSON message.
pub struct WsChannel<S> {
    stream: WebSocketStream<S>,
}

impl<S> WsChannel<S> {
    pub fn new(stream: WebSocketStream<S>) -> Self {
        Self { stream }
    }
}

#[async_trait]
impl<S> Channel for WsChannel<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    async fn recv(&mut self) -> Result<Option<Envelope>, SessionError> {
        while let Some(msg) = self.stream.next().await {
            match msg? {
                Message::Text(text) => return Ok(Some(serde_json::from_str(&text)?)),
                Message::Binary(data) => return Ok(Some(serde_json::from_slice(&data)?)),
                Message::Ping(data) => self.stream.send(Message::Pong(data)).await?,
                Message::Close(_) => {
                    debug!("Peer sent close frame");
                    return Ok(None);
                }
                _ => {}
            }
        }
        Ok(None)
    }

    async fn send(&mut self, response: &Response) -> Result<(), SessionError> {
        let json = serde_json::to_string(response)?;
        self.stream.send(Message::Text(json)).await?;
        Ok(())
    }

    async fn close(&mut self) -> Result<(), SessionError> {
        self.stream.close(None).await?;
        Ok(())
    }
}
