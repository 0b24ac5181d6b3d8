//! Speech synthesis via an external voice model CLI.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::process::Command;

use crate::error::{Result, TtsError};

/// Input to one synthesis pass.
#[derive(Debug, Clone, Default)]
pub struct SynthesisInput {
    /// Text to speak.
    pub text: String,
    /// Server-side path to a reference voice sample, for models that
    /// support voice cloning.
    pub voice_sample: Option<PathBuf>,
}

/// Interface for a pretrained speech-synthesis model.
#[async_trait]
pub trait Synthesizer: Send + Sync {
    /// Synthesizes the input text into a waveform file at `out`.
    async fn synthesize(&self, input: &SynthesisInput, out: &Path) -> Result<()>;
}

/// Synthesizer that shells out to the coqui `tts` CLI.
///
/// The reference voice sample is forwarded as `--speaker_wav` when the
/// request carries one; whether the configured model honors it depends on
/// the model.
pub struct CoquiSynthesizer {
    program: PathBuf,
    model: String,
}

impl CoquiSynthesizer {
    /// Creates a synthesizer invoking `program` with the given model name.
    pub fn new(program: impl Into<PathBuf>, model: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            model: model.into(),
        }
    }

    fn command(&self, input: &SynthesisInput, out: &Path) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.arg("--text")
            .arg(&input.text)
            .arg("--model_name")
            .arg(&self.model)
            .arg("--out_path")
            .arg(out);
        if let Some(sample) = &input.voice_sample {
            cmd.arg("--speaker_wav").arg(sample);
        }
        cmd
    }
}

#[async_trait]
impl Synthesizer for CoquiSynthesizer {
    async fn synthesize(&self, input: &SynthesisInput, out: &Path) -> Result<()> {
        if input.text.trim().is_empty() {
            return Err(TtsError::Synthesis("empty text".into()));
        }

        let output = self.command(input, out).output().await.map_err(|e| {
            TtsError::Synthesis(format!("failed to run {}: {}", self.program.display(), e))
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(TtsError::Synthesis(stderr.trim().to_string()));
        }
        if !out.exists() {
            return Err(TtsError::Synthesis("model produced no output file".into()));
        }

        Ok(())
    }
}
