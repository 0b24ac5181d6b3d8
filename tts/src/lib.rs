//! HTTP synthesis service.
//!
//! Receives a JSON synthesis request, produces a waveform via an external
//! voice model, and computes best-effort word timings against the original
//! text via an external forced-alignment tool:
//!
//! - [`Synthesizer`] and [`CoquiSynthesizer`]: text (plus optional reference
//!   voice sample) in, WAV file out
//! - [`Aligner`] and [`AeneasAligner`]: WAV + plain text in, ordered
//!   word-level [`Viseme`] timings out
//! - [`router`] and [`serve`]: the axum surface tying both together
//!
//! Alignment failure never fails a request: the handler logs it and returns
//! an empty timing list alongside the synthesized audio. The temporary
//! output waveform is deleted on every exit path.

mod align;
mod error;
mod server;
mod synth;

pub use align::{AeneasAligner, Aligner, Viseme};
pub use error::{Result, TtsError};
pub use server::{router, serve, AppState, SynthesizeRequest, SynthesizeResponse};
pub use synth::{CoquiSynthesizer, SynthesisInput, Synthesizer};
