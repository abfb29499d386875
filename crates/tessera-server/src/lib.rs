//! Tessera Server - WebSocket front end for grid analysis
//!
//! Each connection gets its own [`Session`]. A client uploads a grid, the
//! session starts component and pattern analysis in the background, and
//! path queries are answered on demand while that analysis runs.
//!
//! The server supports:
//! - Multiple concurrent sessions, bounded by [`ServerConfig::max_sessions`]
//! - One JSON message per request and per response
//! - Background analysis handed over through promises
//!
//! Any bad request ends its session. The client sees the connection close
//! and has to reconnect and upload again.

mod channel;
mod client;
mod config;
mod error;
mod protocol;
mod server;
mod session;

pub use channel::{Channel, WsChannel};
pub use client::GridClient;
pub use config::ServerConfig;
pub use error::{ClientError, ConfigError, SessionError};
pub use protocol::{Envelope, Request, Response};
pub use server::GridServer;
pub use session::{run_session, Session};
