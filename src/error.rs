//! Error types for gati-core

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// gati-core error types
///
/// The real-time control path itself is infallible state-machine code and
/// reports conditions as state (protecting flag, fault override); these
/// errors cover configuration and process wiring only.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration parse error
    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    /// Invalid parameter
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}
