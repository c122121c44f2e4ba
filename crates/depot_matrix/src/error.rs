use thiserror::Error;

/// Errors that stop a computation before any request is sent. Engine failures
/// are never surfaced here, they are absorbed by the fallback estimate.
#[derive(Debug, Error, PartialEq)]
pub enum MatrixError {
    #[error("Invalid configuration: {0}")]
    Configuration(String),
}
