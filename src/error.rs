use std::io;
use thiserror::Error;

/// Custom error type for the droidtop application
#[derive(Error, Debug)]
pub enum DroidtopError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Counter read failed: {0}")]
    CounterRead(String),

    #[error("Sampler error: {0}")]
    Sampler(String),

    #[error("Privileged channel error: {0}")]
    Privileged(String),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for the droidtop application
pub type Result<T> = std::result::Result<T, DroidtopError>;

impl DroidtopError {
    /// Create a config error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        DroidtopError::Config(msg.into())
    }

    /// Create a counter-read error
    pub fn counter_read<S: Into<String>>(msg: S) -> Self {
        DroidtopError::CounterRead(msg.into())
    }

    pub fn sampler<S: Into<String>>(msg: S) -> Self {
        DroidtopError::Sampler(msg.into())
    }

    pub fn privileged<S: Into<String>>(msg: S) -> Self {
        DroidtopError::Privileged(msg.into())
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        DroidtopError::Other(msg.into())
    }
}
