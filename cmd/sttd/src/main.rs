//! Transcription service daemon.
//!
//! Accepts raw audio over HTTP POST /stt, normalizes it with an external
//! transcoder, and decodes it with a whisper model loaded once at startup.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use voicebox_stt::{serve, AppState, FfmpegTranscoder, WhisperRecognizer};

/// HTTP speech-to-text service.
#[derive(Parser)]
#[command(name = "sttd")]
#[command(about = "HTTP speech-to-text service")]
#[command(version)]
struct Cli {
    /// Listen address, e.g. ":5200" or "127.0.0.1:5200"
    #[arg(long, default_value = ":5200", env = "STT_ADDR")]
    addr: String,

    /// Path to the GGML whisper model file
    #[arg(long, env = "STT_MODEL")]
    model: PathBuf,

    /// Transcoder binary used to normalize incoming audio
    #[arg(long, default_value = "ffmpeg", env = "STT_FFMPEG")]
    ffmpeg: PathBuf,

    /// Pin the decoding language instead of auto-detection
    #[arg(long, env = "STT_LANGUAGE")]
    language: Option<String>,

    /// Verbose output
    #[arg(short = 'v', long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_level.into()),
        )
        .init();

    tracing::info!(model = %cli.model.display(), "loading whisper model");
    let recognizer = WhisperRecognizer::load(&cli.model)?.with_language(cli.language);

    let state = AppState {
        transcoder: Arc::new(FfmpegTranscoder::new(cli.ffmpeg)),
        recognizer: Arc::new(recognizer),
    };

    serve(&cli.addr, state).await?;
    Ok(())
}
