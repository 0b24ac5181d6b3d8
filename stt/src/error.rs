//! Error types for the transcription service.

use thiserror::Error;

/// Result type alias for transcription operations.
pub type Result<T> = std::result::Result<T, SttError>;

/// Error type for the transcription service.
#[derive(Error, Debug)]
pub enum SttError {
    /// The request body carried no audio bytes.
    ///
    /// The message is the wire-level error token clients match on.
    #[error("no_audio")]
    NoAudio,

    /// The external transcoder failed to produce the target waveform.
    #[error("transcode failed: {0}")]
    Transcode(String),

    /// The recognition model failed.
    #[error("recognition failed: {0}")]
    Recognition(String),

    /// WAV read error.
    #[error("wav error: {0}")]
    Wav(#[from] hound::Error),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid configuration.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl SttError {
    /// Returns true if the caller is at fault (maps to HTTP 400).
    pub fn is_client_error(&self) -> bool {
        matches!(self, SttError::NoAudio)
    }
}
