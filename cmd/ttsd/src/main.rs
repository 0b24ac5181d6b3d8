//! Synthesis service daemon.
//!
//! Accepts JSON synthesis requests over HTTP POST /synthesize, produces a
//! waveform with an external voice model, and computes best-effort word
//! timings with a forced-alignment tool.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use voicebox_tts::{serve, AeneasAligner, AppState, CoquiSynthesizer};

/// HTTP text-to-speech service.
#[derive(Parser)]
#[command(name = "ttsd")]
#[command(about = "HTTP text-to-speech service")]
#[command(version)]
struct Cli {
    /// Listen address, e.g. ":5300" or "127.0.0.1:5300"
    #[arg(long, default_value = ":5300", env = "TTS_ADDR")]
    addr: String,

    /// Voice model binary (the coqui `tts` CLI)
    #[arg(long = "tts-cmd", default_value = "tts", env = "TTS_CMD")]
    tts_cmd: PathBuf,

    /// Voice model name passed to the synthesis CLI
    #[arg(long, default_value = "tts_models/en/vctk/vits", env = "TTS_MODEL")]
    model: String,

    /// Python interpreter used to run the alignment tool
    #[arg(long, default_value = "python3", env = "TTS_PYTHON")]
    python: PathBuf,

    /// Language tag handed to the alignment tool
    #[arg(long, default_value = "eng", env = "TTS_ALIGN_LANGUAGE")]
    align_language: String,

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

    tracing::info!(model = %cli.model, "tts: using voice model");
    let state = AppState {
        synthesizer: Arc::new(CoquiSynthesizer::new(cli.tts_cmd, cli.model)),
        aligner: Arc::new(AeneasAligner::new(cli.python, cli.align_language)),
    };

    serve(&cli.addr, state).await?;
    Ok(())
}
