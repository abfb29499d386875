//! WebSocket server implementation.
//!
//! Accepts connections and runs one [`Session`] per client. At most
//! `max_sessions` sessions run at once; further clients are accepted at
//! the TCP level but wait for a free slot before the handshake.

use crate::channel::WsChannel;
use crate::config::ServerConfig;
use crate::session::{run_session, Session};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};
use tokio::runtime::Handle;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio_tungstenite::accept_async;
use tracing::{debug, error, info, info_span, warn, Instrument};

/// The grid analysis server.
pub struct GridServer {
    config: ServerConfig,
    sessions: Arc<Semaphore>,
}

impl GridServer {
    pub fn new(config: ServerConfig) -> Self {
        let sessions = Arc::new(Semaphore::new(config.max_sessions.max(1)));
        Self { config, sessions }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Binds the configured address and serves until `shutdown` completes.
    pub async fn run_until<F>(
        &self,
        shutdown: F,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>
    where
        F: Future<Output = ()>,
    {
        let listener = TcpListener::bind(&self.config.addr).await?;
        info!(
            "Tessera server listening on {} ({} sessions max)",
            self.config.addr, self.config.max_sessions
        );
        self.serve_until(listener, shutdown).await
    }

    /// Serves connections from an already bound listener, forever.
    pub async fn serve(
        &self,
        listener: TcpListener,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.serve_until(listener, std::future::pending()).await
    }

    /// Serves connections from `listener` until `shutdown` completes.
    ///
    /// Shutdown stops accepting and drops the listener. Sessions already
    /// running are left to finish on their own.
    pub async fn serve_until<F>(
        &self,
        listener: TcpListener,
        shutdown: F,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        loop {
            let (stream, addr) = tokio::select! {
                _ = &mut shutdown => break,
                accepted = listener.accept() => match accepted {
                    Ok(conn) => conn,
                    Err(e) => {
                        error!("Accept error: {}", e);
                        continue;
                    }
                },
            };
            debug!("New connection from {}", addr);

            if self.sessions.available_permits() == 0 {
                info!("All session slots busy, {} is waiting", addr);
            }
            let permit = tokio::select! {
                _ = &mut shutdown => break,
                permit = Arc::clone(&self.sessions).acquire_owned() => permit?,
            };

            tokio::spawn(handle_connection(stream, addr, permit));
        }

        info!("Server shutting down");
        Ok(())
    }
}

/// Runs one client's session. The permit is held until the session ends.
async fn handle_connection(stream: TcpStream, addr: SocketAddr, _permit: OwnedSemaphorePermit) {
    let ws_stream = match accept_async(stream).await {
        Ok(ws) => ws,
        Err(e) => {
            warn!("WebSocket handshake with {} failed: {}", addr, e);
            return;
        }
    };

    let mut channel = WsChannel::new(ws_stream);
    let mut session = Session::new(Handle::current());
    let span = info_span!("session", id = %session.id(), peer = %addr);

    async {
        info!("Session started");
        match run_session(&mut channel, &mut session).await {
            Ok(()) => info!("Session ended"),
            Err(e) => warn!("Session aborted: {}", e),
        }
    }
    .instrument(span)
    .await;
}
