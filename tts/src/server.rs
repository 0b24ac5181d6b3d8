//! HTTP server for the synthesis service.
//!
//! API endpoints:
//! - POST /synthesize - {text, voice_sample_path?, speed?} ->
//!                      {audioBase64, visemes, sampleRate}
//! - GET  /healthz    - service status

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::align::{Aligner, Viseme};
use crate::error::{Result, TtsError};
use crate::synth::{SynthesisInput, Synthesizer};

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub synthesizer: Arc<dyn Synthesizer>,
    pub aligner: Arc<dyn Aligner>,
}

/// Synthesis request body.
#[derive(Debug, Clone, Deserialize)]
pub struct SynthesizeRequest {
    pub text: String,
    /// Server-side path to a reference voice sample.
    #[serde(default)]
    pub voice_sample_path: Option<PathBuf>,
    /// Accepted for wire compatibility; the engine call does not apply it.
    #[serde(default = "default_speed")]
    pub speed: f32,
}

fn default_speed() -> f32 {
    1.0
}

/// Successful synthesis payload.
#[derive(Debug, Serialize)]
pub struct SynthesizeResponse {
    #[serde(rename = "audioBase64")]
    pub audio_base64: String,
    pub visemes: Vec<Viseme>,
    #[serde(rename = "sampleRate")]
    pub sample_rate: u32,
}

/// Error payload shared by all failure responses.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

/// Uniquely named temporary waveform, deleted on drop.
struct TempWav(PathBuf);

impl TempWav {
    fn new() -> Self {
        let path = std::env::temp_dir().join(format!("tts_out_{}.wav", Uuid::new_v4().simple()));
        Self(path)
    }

    fn path(&self) -> &Path {
        &self.0
    }
}

impl Drop for TempWav {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.0);
    }
}

/// Builds the service router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/synthesize", post(synthesize))
        .route("/healthz", get(healthz))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Binds the listener and serves until the process exits.
pub async fn serve(addr: &str, state: AppState) -> Result<()> {
    let addr = parse_addr(addr)?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %addr, "tts: listening");
    axum::serve(listener, router(state)).await?;
    Ok(())
}

/// Parse address string to SocketAddr.
fn parse_addr(addr: &str) -> Result<SocketAddr> {
    let addr = if addr.starts_with(':') {
        format!("0.0.0.0{}", addr)
    } else {
        addr.to_string()
    };
    addr.parse()
        .map_err(|e| TtsError::Config(format!("invalid listen address {:?}: {}", addr, e)))
}

async fn healthz() -> impl IntoResponse {
    Json(serde_json::json!({"status": "ok", "service": "tts"}))
}

async fn synthesize(State(state): State<AppState>, Json(req): Json<SynthesizeRequest>) -> Response {
    match synthesize_request(&state, &req).await {
        Ok(resp) => (StatusCode::OK, Json(resp)).into_response(),
        Err(err) => {
            error!(error = %err, "tts: request failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorBody {
                    error: err.to_string(),
                }),
            )
                .into_response()
        }
    }
}

/// Runs the synthesize -> align -> encode pipeline for one request.
///
/// The output waveform is owned by a guard, so it is deleted on every exit
/// path. Alignment failure degrades to an empty timing list.
async fn synthesize_request(state: &AppState, req: &SynthesizeRequest) -> Result<SynthesizeResponse> {
    if (req.speed - 1.0).abs() > f32::EPSILON {
        warn!(
            speed = req.speed,
            "tts: speed is accepted but not applied by the engine call"
        );
    }

    let out = TempWav::new();
    let input = SynthesisInput {
        text: req.text.clone(),
        voice_sample: req.voice_sample_path.clone(),
    };
    state.synthesizer.synthesize(&input, out.path()).await?;

    let visemes = match state.aligner.align(out.path(), &req.text).await {
        Ok(visemes) => visemes,
        Err(err) => {
            warn!(error = %err, "tts: alignment failed, returning empty timings");
            Vec::new()
        }
    };

    let raw = tokio::fs::read(out.path()).await?;
    let sample_rate = wav_sample_rate(out.path())?;

    Ok(SynthesizeResponse {
        audio_base64: BASE64.encode(&raw),
        visemes,
        sample_rate,
    })
}

/// Reads the sample rate from the produced waveform's header.
fn wav_sample_rate(path: &Path) -> Result<u32> {
    let reader = hound::WavReader::open(path)?;
    Ok(reader.spec().sample_rate)
}
