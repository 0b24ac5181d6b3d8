//! HTTP server for the transcription service.
//!
//! API endpoints:
//! - POST /stt     - raw audio bytes (any Content-Type) -> {text, language, task}
//! - GET  /healthz - service status

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::Serialize;
use tower_http::cors::CorsLayer;
use tracing::{error, info};

use crate::error::{Result, SttError};
use crate::recognizer::Recognizer;
use crate::transcode::Transcoder;

/// Task label reported for every transcription.
const TASK_TRANSCRIBE: &str = "transcribe";

/// Maximum accepted upload size.
const MAX_BODY_BYTES: usize = 32 * 1024 * 1024;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub transcoder: Arc<dyn Transcoder>,
    pub recognizer: Arc<dyn Recognizer>,
}

/// Successful transcription payload.
#[derive(Debug, Serialize)]
pub struct SttResponse {
    pub text: String,
    pub language: String,
    pub task: String,
}

/// Error payload shared by all failure responses.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

/// Builds the service router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/stt", post(stt))
        .route("/healthz", get(healthz))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Binds the listener and serves until the process exits.
pub async fn serve(addr: &str, state: AppState) -> Result<()> {
    let addr = parse_addr(addr)?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %addr, "stt: listening");
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
        .map_err(|e| SttError::Config(format!("invalid listen address {:?}: {}", addr, e)))
}

async fn healthz() -> impl IntoResponse {
    Json(serde_json::json!({"status": "ok", "service": "stt"}))
}

async fn stt(State(state): State<AppState>, body: Bytes) -> Response {
    match transcribe_bytes(&state, &body).await {
        Ok(resp) => (StatusCode::OK, Json(resp)).into_response(),
        Err(err) => {
            let status = if err.is_client_error() {
                StatusCode::BAD_REQUEST
            } else {
                error!(error = %err, "stt: request failed");
                StatusCode::INTERNAL_SERVER_ERROR
            };
            (
                status,
                Json(ErrorBody {
                    error: err.to_string(),
                }),
            )
                .into_response()
        }
    }
}

/// Runs the receive -> transcode -> recognize pipeline for one request.
///
/// Both temporary files are owned by guards, so they are deleted on every
/// exit path.
async fn transcribe_bytes(state: &AppState, body: &[u8]) -> Result<SttResponse> {
    if body.is_empty() {
        return Err(SttError::NoAudio);
    }

    let input = tempfile::Builder::new()
        .prefix("stt_in_")
        .suffix(".audio")
        .tempfile()?;
    tokio::fs::write(input.path(), body).await?;

    let wav = tempfile::Builder::new()
        .prefix("stt_wav_")
        .suffix(".wav")
        .tempfile()?;

    state
        .transcoder
        .transcode_to_wav(input.path(), wav.path())
        .await?;
    let transcription = state.recognizer.transcribe(wav.path()).await?;

    Ok(SttResponse {
        text: transcription.text(),
        language: transcription.language.unwrap_or_else(|| "auto".to_string()),
        task: TASK_TRANSCRIBE.to_string(),
    })
}
