//! Error types for the synthesis service.

use thiserror::Error;

/// Result type alias for synthesis operations.
pub type Result<T> = std::result::Result<T, TtsError>;

/// Error type for the synthesis service.
#[derive(Error, Debug)]
pub enum TtsError {
    /// The voice model failed to produce a waveform.
    #[error("synthesis failed: {0}")]
    Synthesis(String),

    /// The alignment tool failed. Handled as a degradation, never surfaced
    /// to the caller.
    #[error("alignment failed: {0}")]
    Alignment(String),

    /// WAV read error.
    #[error("wav error: {0}")]
    Wav(#[from] hound::Error),

    /// JSON serialization/deserialization error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid configuration.
    #[error("invalid configuration: {0}")]
    Config(String),
}
