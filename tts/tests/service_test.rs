//! Socket-level tests for the synthesis service.

use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use voicebox_tts::{
    router, Aligner, AppState, Result, SynthesisInput, Synthesizer, TtsError, Viseme,
};

const SAMPLE_RATE: u32 = 22_050;

/// Writes 200 ms of audio into the requested output file.
struct ToneSynthesizer;

#[async_trait]
impl Synthesizer for ToneSynthesizer {
    async fn synthesize(&self, input: &SynthesisInput, out: &Path) -> Result<()> {
        if input.text.trim().is_empty() {
            return Err(TtsError::Synthesis("empty text".into()));
        }
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: SAMPLE_RATE,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(out, spec)?;
        for i in 0..SAMPLE_RATE / 5 {
            writer.write_sample(((i % 441) as i16 - 220) * 50)?;
        }
        writer.finalize()?;
        Ok(())
    }
}

struct WordAligner {
    fail: bool,
}

#[async_trait]
impl Aligner for WordAligner {
    async fn align(&self, _wav: &Path, text: &str) -> Result<Vec<Viseme>> {
        if self.fail {
            return Err(TtsError::Alignment("malformed text".into()));
        }
        Ok(text
            .split_whitespace()
            .enumerate()
            .map(|(i, word)| Viseme {
                phoneme: word.to_string(),
                start: i as f64 * 0.4,
                end: i as f64 * 0.4 + 0.4,
            })
            .collect())
    }
}

async fn spawn_service(fail_alignment: bool) -> String {
    let state = AppState {
        synthesizer: Arc::new(ToneSynthesizer),
        aligner: Arc::new(WordAligner {
            fail: fail_alignment,
        }),
    };
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router(state)).await.unwrap();
    });
    format!("http://{}", addr)
}

#[tokio::test]
async fn test_synthesis_round_trip() {
    let base = spawn_service(false).await;

    let resp = reqwest::Client::new()
        .post(format!("{}/synthesize", base))
        .json(&serde_json::json!({"text": "hello there world"}))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = resp.json().await.unwrap();

    assert_eq!(body["sampleRate"], SAMPLE_RATE);
    let visemes = body["visemes"].as_array().unwrap();
    assert_eq!(visemes.len(), 3);
    let mut last_start = f64::MIN;
    for v in visemes {
        let start = v["start"].as_f64().unwrap();
        let end = v["end"].as_f64().unwrap();
        assert!(start <= end);
        assert!(start >= last_start);
        last_start = start;
    }

    // Decoded audio must parse as WAV with a non-zero duration consistent
    // with the reported sample rate.
    let raw = BASE64.decode(body["audioBase64"].as_str().unwrap()).unwrap();
    let reader = hound::WavReader::new(Cursor::new(raw)).unwrap();
    assert_eq!(reader.spec().sample_rate, SAMPLE_RATE);
    assert!(reader.duration() > 0);
    let seconds = reader.duration() as f64 / reader.spec().sample_rate as f64;
    assert!(seconds > 0.1 && seconds < 1.0);
}

#[tokio::test]
async fn test_alignment_failure_still_returns_audio() {
    let base = spawn_service(true).await;

    let resp = reqwest::Client::new()
        .post(format!("{}/synthesize", base))
        .json(&serde_json::json!({"text": "hello"}))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["visemes"].as_array().unwrap().len(), 0);
    let raw = BASE64.decode(body["audioBase64"].as_str().unwrap()).unwrap();
    assert!(raw.starts_with(b"RIFF"));
}

#[tokio::test]
async fn test_synthesis_failure_returns_500() {
    let base = spawn_service(false).await;

    let resp = reqwest::Client::new()
        .post(format!("{}/synthesize", base))
        .json(&serde_json::json!({"text": "   "}))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 500);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert!(!body["error"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_healthz() {
    let base = spawn_service(false).await;

    let resp = reqwest::Client::new()
        .get(format!("{}/healthz", base))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "ok");
}
