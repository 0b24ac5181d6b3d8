//! Audio transcoding via an external transcoder binary.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::process::Command;

use crate::error::{Result, SttError};

/// Sample rate of the waveform handed to the recognition model.
pub const TARGET_SAMPLE_RATE: u32 = 16_000;

/// Interface for converting arbitrary audio containers to the fixed
/// mono 16-bit PCM waveform the recognition model expects.
#[async_trait]
pub trait Transcoder: Send + Sync {
    /// Converts `input` into a WAV file at `output`.
    async fn transcode_to_wav(&self, input: &Path, output: &Path) -> Result<()>;
}

/// Transcoder that shells out to ffmpeg.
///
/// Accepts anything ffmpeg can demux (webm, ogg, mp3, ...) and writes
/// mono `pcm_s16le` at [`TARGET_SAMPLE_RATE`].
pub struct FfmpegTranscoder {
    program: PathBuf,
}

impl FfmpegTranscoder {
    /// Creates a transcoder that invokes the given ffmpeg binary.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn command(&self, input: &Path, output: &Path) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.arg("-hide_banner")
            .arg("-loglevel")
            .arg("error")
            .arg("-y")
            .arg("-i")
            .arg(input)
            .arg("-f")
            .arg("wav")
            .arg("-acodec")
            .arg("pcm_s16le")
            .arg("-ac")
            .arg("1")
            .arg("-ar")
            .arg(TARGET_SAMPLE_RATE.to_string())
            .arg(output);
        cmd
    }
}

impl Default for FfmpegTranscoder {
    fn default() -> Self {
        Self::new("ffmpeg")
    }
}

#[async_trait]
impl Transcoder for FfmpegTranscoder {
    async fn transcode_to_wav(&self, input: &Path, output: &Path) -> Result<()> {
        let out = self.command(input, output).output().await.map_err(|e| {
            SttError::Transcode(format!("failed to run {}: {}", self.program.display(), e))
        })?;

        if !out.status.success() {
            let stderr = String::from_utf8_lossy(&out.stderr);
            return Err(SttError::Transcode(stderr.trim().to_string()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod transcode_tests {
    use super::*;

    #[test]
    fn test_command_args() {
        let transcoder = FfmpegTranscoder::default();
        let cmd = transcoder.command(Path::new("/tmp/in.webm"), Path::new("/tmp/out.wav"));

        let args: Vec<String> = cmd
            .as_std()
            .get_args()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();

        assert_eq!(cmd.as_std().get_program(), "ffmpeg");
        assert!(args.contains(&"-y".to_string()));
        assert!(args.windows(2).any(|w| w[0] == "-ac" && w[1] == "1"));
        assert!(args.windows(2).any(|w| w[0] == "-ar" && w[1] == "16000"));
        assert!(args.windows(2).any(|w| w[0] == "-acodec" && w[1] == "pcm_s16le"));
        assert_eq!(args.last().map(String::as_str), Some("/tmp/out.wav"));
    }

    #[tokio::test]
    async fn test_missing_binary_is_transcode_error() {
        let transcoder = FfmpegTranscoder::new("/nonexistent/ffmpeg");
        let err = transcoder
            .transcode_to_wav(Path::new("/tmp/in.webm"), Path::new("/tmp/out.wav"))
            .await
            .unwrap_err();
        assert!(matches!(err, SttError::Transcode(_)));
        assert!(err.to_string().contains("/nonexistent/ffmpeg"));
    }
}
