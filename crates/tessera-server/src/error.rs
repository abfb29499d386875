use tessera_core::PromiseError;
use thiserror::Error;
use tokio_tungstenite::tungstenite;

/// Anything that ends a session. None of these are reported to the client.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("transport error: {0}")]
    Transport(#[from] tungstenite::Error),

    #[error("malformed message: {0}")]
    Codec(#[from] serde_json::Error),

    #[error("invalid endpoints: {0}")]
    InvalidEndpoints(String),

    #[error("path requested before any grid was loaded")]
    NoGrid,

    #[error("background analysis failed: {0}")]
    Analysis(#[from] PromiseError),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("max_sessions must be at least 1")]
    NoSessions,
}

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("transport error: {0}")]
    Transport(#[from] tungstenite::Error),

    #[error("malformed message: {0}")]
    Codec(#[from] serde_json::Error),

    #[error("server closed the connection")]
    Closed,

    #[error("unexpected response: {0}")]
    UnexpectedResponse(&'static str),
}
