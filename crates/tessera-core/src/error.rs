use thiserror::Error;

/// Errors from reading a [`Promise`](crate::Promise).
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromiseError {
    /// The resolver was dropped before it produced a value.
    #[error("promise abandoned before a value was set")]
    Abandoned,
}
