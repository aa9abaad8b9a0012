use thiserror::Error;

/// Main error type for H.245 PER operations
#[derive(Error, Debug)]
pub enum H245Error {
    #[error("Buffer exhausted: {0}")]
    BufferExhausted(String),

    #[error("Value out of range: {0}")]
    OutOfRange(String),

    #[error("Malformed length determinant: {0}")]
    MalformedLength(String),

    #[error("Signature map error: {0}")]
    SigMap(String),

    #[error("Protocol error: {0}")]
    Protocol(String),
}

/// Result type alias for H.245 PER operations
pub type H245Result<T> = Result<T, H245Error>;
