//! HTTP transcription service.
//!
//! Receives raw audio bytes over HTTP, normalizes them to the waveform
//! format the recognition model expects via an external transcoder, runs
//! recognition, and returns the transcript as JSON:
//!
//! - [`Transcoder`] and [`FfmpegTranscoder`]: arbitrary container/codec in,
//!   mono 16-bit 16 kHz WAV out
//! - [`Recognizer`] and [`WhisperRecognizer`]: waveform file in, ordered
//!   text segments plus detected language out
//! - [`router`] and [`serve`]: the axum surface tying both together
//!
//! Every request works on uniquely named temporary files that are deleted
//! on success and failure alike.

mod error;
mod recognizer;
mod server;
mod transcode;
mod whisper;

pub use error::{Result, SttError};
pub use recognizer::{Recognizer, Transcription};
pub use server::{router, serve, AppState, SttResponse};
pub use transcode::{FfmpegTranscoder, Transcoder};
pub use whisper::WhisperRecognizer;
