//! A small async client for the grid protocol.
//!
//! Used by the CLI and the integration tests. Each call sends one request
//! and waits for its response; the server answers strictly in order, so no
//! correlation ids are needed.

use crate::error::ClientError;
use crate::protocol::{Request, Response};
use futures_util::{SinkExt, StreamExt};
use tessera_core::{Cell, Grid};
use tessera_graph::Component;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::debug;

pub struct GridClient {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl GridClient {
    /// Connects to a server, e.g. `ws://127.0.0.1:8010`.
    pub async fn connect(url: &str) -> Result<Self, ClientError> {
        let (stream, _) = connect_async(url).await?;
        debug!("Connected to {}", url);
        Ok(Self { stream })
    }

    /// Uploads a grid and returns the server's echo of it.
    pub async fn load_grid(&mut self, rows: Vec<Vec<i32>>) -> Result<Grid, ClientError> {
        match self.request(Request::LoadGrid(rows)).await? {
            Response::Grid(grid) => Ok(grid),
            other => Err(ClientError::UnexpectedResponse(other.kind())),
        }
    }

    pub async fn components(&mut self) -> Result<Vec<Component>, ClientError> {
        match self.request(Request::GetComponents).await? {
            Response::Components(components) => Ok(components),
            other => Err(ClientError::UnexpectedResponse(other.kind())),
        }
    }

    /// `-1` if no grid has been uploaded on this connection yet.
    pub async fn pattern_count(&mut self) -> Result<i64, ClientError> {
        match self.request(Request::GetPatternCount).await? {
            Response::PatternCount(count) => Ok(count),
            other => Err(ClientError::UnexpectedResponse(other.kind())),
        }
    }

    pub async fn shortest_path(
        &mut self,
        start: Cell,
        end: Cell,
    ) -> Result<Option<Vec<Cell>>, ClientError> {
        self.path(Request::GetShortestPath(vec![start, end])).await
    }

    pub async fn weighted_path(
        &mut self,
        start: Cell,
        end: Cell,
    ) -> Result<Option<Vec<Cell>>, ClientError> {
        self.path(Request::GetWeightedPath(vec![start, end])).await
    }

    /// Asks the server to end the session and waits for it to close.
    pub async fn stop(mut self) -> Result<(), ClientError> {
        self.send(&Request::Stop).await?;
        while let Some(msg) = self.stream.next().await {
            if msg?.is_close() {
                break;
            }
        }
        Ok(())
    }

    async fn path(&mut self, request: Request) -> Result<Option<Vec<Cell>>, ClientError> {
        match self.request(request).await? {
            Response::Path(path) => Ok(path),
            other => Err(ClientError::UnexpectedResponse(other.kind())),
        }
    }

    async fn send(&mut self, request: &Request) -> Result<(), ClientError> {
        let json = serde_json::to_string(&request.to_envelope()?)?;
        self.stream.send(Message::Text(json)).await?;
        Ok(())
    }

    async fn request(&mut self, request: Request) -> Result<Response, ClientError> {
        self.send(&request).await?;

        while let Some(msg) = self.stream.next().await {
            match msg? {
                Message::Text(text) => return Ok(serde_json::from_str(&text)?),
                Message::Binary(data) => return Ok(serde_json::from_slice(&data)?),
                Message::Close(_) => break,
                _ => {}
            }
        }
        Err(ClientError::Closed)
    }
}
