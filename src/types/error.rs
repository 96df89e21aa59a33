use thiserror::Error;

/// chaosdex error types
#[derive(Error, Debug)]
pub enum ChaosError {
    /// Failed to decode a chaos payload or meta document
    #[error("parse error: {0}")]
    Parse(String),

    /// Decoded payload violates the counter-shape contract
    #[error("payload error: {0}")]
    Payload(String),

    /// File I/O error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Cache operation failed
    #[error("cache error: {0}")]
    Cache(String),

    /// Configuration error
    #[error("config error: {0}")]
    Config(String),
}

/// Result type alias for chaosdex
pub type Result<T> = std::result::Result<T, ChaosError>;
