//! Whisper recognition engine.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters};

use crate::error::{Result, SttError};
use crate::recognizer::{Recognizer, Transcription};
use crate::transcode::TARGET_SAMPLE_RATE;

/// Beam width used for decoding.
const BEAM_SIZE: i32 = 5;

/// Recognition engine backed by a GGML whisper model.
///
/// The context is loaded once at startup and shared read-only across
/// requests; each transcription creates its own inference state and runs on
/// the blocking pool.
pub struct WhisperRecognizer {
    ctx: Arc<WhisperContext>,
    language: Option<String>,
}

impl WhisperRecognizer {
    /// Loads a GGML model from the given path.
    pub fn load(model: &Path) -> Result<Self> {
        if !model.exists() {
            return Err(SttError::Recognition(format!(
                "model not found: {}",
                model.display()
            )));
        }

        let path = model
            .to_str()
            .ok_or_else(|| SttError::Recognition(format!("invalid model path: {}", model.display())))?;
        let ctx = WhisperContext::new_with_params(path, WhisperContextParameters::default())
            .map_err(|e| SttError::Recognition(format!("failed to load model: {}", e)))?;

        Ok(Self {
            ctx: Arc::new(ctx),
            language: None,
        })
    }

    /// Pins the decoding language. `None` lets the model detect it.
    pub fn with_language(mut self, language: Option<String>) -> Self {
        self.language = language;
        self
    }

    /// Reads a WAV file into the f32 mono samples whisper expects.
    fn read_samples(wav: &Path) -> Result<Vec<f32>> {
        let mut reader = hound::WavReader::open(wav)?;
        let spec = reader.spec();

        if spec.sample_rate != TARGET_SAMPLE_RATE {
            return Err(SttError::Recognition(format!(
                "expected {} Hz waveform, got {} Hz",
                TARGET_SAMPLE_RATE, spec.sample_rate
            )));
        }

        let samples: Vec<f32> = match spec.sample_format {
            hound::SampleFormat::Float => reader
                .samples::<f32>()
                .collect::<std::result::Result<_, _>>()?,
            hound::SampleFormat::Int => {
                let scale = (1i32 << (spec.bits_per_sample - 1)) as f32;
                reader
                    .samples::<i32>()
                    .map(|s| s.map(|v| v as f32 / scale))
                    .collect::<std::result::Result<_, _>>()?
            }
        };

        if spec.channels > 1 {
            let channels = spec.channels as usize;
            return Ok(samples
                .chunks(channels)
                .map(|frame| frame.iter().sum::<f32>() / channels as f32)
                .collect());
        }

        Ok(samples)
    }

    fn run(ctx: &WhisperContext, language: Option<&str>, samples: &[f32]) -> Result<Transcription> {
        let mut state = ctx
            .create_state()
            .map_err(|e| SttError::Recognition(format!("failed to create state: {}", e)))?;

        let mut params = FullParams::new(SamplingStrategy::BeamSearch {
            beam_size: BEAM_SIZE,
            patience: -1.0,
        });
        params.set_language(Some(language.unwrap_or("auto")));
        params.set_translate(false);
        params.set_print_special(false);
        params.set_print_progress(false);
        params.set_print_realtime(false);
        params.set_print_timestamps(false);

        state
            .full(params, samples)
            .map_err(|e| SttError::Recognition(format!("inference failed: {}", e)))?;

        let n = state
            .full_n_segments()
            .map_err(|e| SttError::Recognition(format!("failed to read segments: {}", e)))?;
        let mut segments = Vec::with_capacity(n as usize);
        for i in 0..n {
            let text = state
                .full_get_segment_text(i)
                .map_err(|e| SttError::Recognition(format!("failed to read segment {}: {}", i, e)))?;
            segments.push(text);
        }

        let detected = match language {
            Some(lang) => Some(lang.to_string()),
            None => state
                .full_lang_id()
                .ok()
                .and_then(whisper_rs::get_lang_str)
                .map(str::to_string),
        };

        Ok(Transcription {
            segments,
            language: detected,
        })
    }
}

#[async_trait]
impl Recognizer for WhisperRecognizer {
    async fn transcribe(&self, wav: &Path) -> Result<Transcription> {
        let samples = Self::read_samples(wav)?;
        let ctx = self.ctx.clone();
        let language = self.language.clone();

        tokio::task::spawn_blocking(move || Self::run(&ctx, language.as_deref(), &samples))
            .await
            .map_err(|e| SttError::Recognition(format!("inference task failed: {}", e)))?
    }
}
