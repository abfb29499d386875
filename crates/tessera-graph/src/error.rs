use tessera_core::PromiseError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    /// A discovery task ended without handing back its component.
    #[error("component discovery task abandoned: {0}")]
    Abandoned(#[from] PromiseError),
}
