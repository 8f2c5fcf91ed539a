//! Error types for AmpBridge

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// AmpBridge error types
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Serial port error
    #[error("Serial port error: {0}")]
    Serial(#[from] serialport::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file parse error
    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),

    /// Operator input stream error
    #[error("Readline error: {0}")]
    Readline(#[from] rustyline::error::ReadlineError),

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}
