//! Best-effort forced alignment via the aeneas `execute_task` tool.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::process::Command;

use crate::error::{Result, TtsError};

/// One word-level timing entry.
///
/// The label carries the aligned word; the wire field stays `phoneme` for
/// compatibility with existing clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Viseme {
    pub phoneme: String,
    pub start: f64,
    pub end: f64,
}

/// Interface for a forced-alignment tool.
#[async_trait]
pub trait Aligner: Send + Sync {
    /// Aligns `text` against the waveform and returns ordered word timings.
    async fn align(&self, wav: &Path, text: &str) -> Result<Vec<Viseme>>;
}

/// Aligner that shells out to `python -m aeneas.tools.execute_task`.
///
/// The tool reads the waveform and a plain-text file and writes a JSON sync
/// map; everything happens inside a scoped working directory that is
/// removed when the pass ends.
pub struct AeneasAligner {
    python: PathBuf,
    language: String,
}

impl AeneasAligner {
    /// Creates an aligner using the given python interpreter and language tag.
    pub fn new(python: impl Into<PathBuf>, language: impl Into<String>) -> Self {
        Self {
            python: python.into(),
            language: language.into(),
        }
    }

    /// Task configuration for a word-level plain-text JSON sync map.
    fn task_config(&self) -> String {
        format!(
            "task_language={}|is_text_type=plain|os_task_file_format=json",
            self.language
        )
    }
}

impl Default for AeneasAligner {
    fn default() -> Self {
        Self::new("python3", "eng")
    }
}

#[async_trait]
impl Aligner for AeneasAligner {
    async fn align(&self, wav: &Path, text: &str) -> Result<Vec<Viseme>> {
        let workdir = tempfile::tempdir()?;
        let text_path = workdir.path().join("text.txt");
        tokio::fs::write(&text_path, text).await?;
        let map_path = workdir.path().join("map.json");

        let output = Command::new(&self.python)
            .arg("-m")
            .arg("aeneas.tools.execute_task")
            .arg(wav)
            .arg(&text_path)
            .arg(self.task_config())
            .arg(&map_path)
            .output()
            .await
            .map_err(|e| {
                TtsError::Alignment(format!("failed to run {}: {}", self.python.display(), e))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(TtsError::Alignment(stderr.trim().to_string()));
        }

        let raw = tokio::fs::read(&map_path).await?;
        let map: SyncMap = serde_json::from_slice(&raw)?;
        map.into_visemes()
    }
}

/// JSON sync map produced by the alignment tool.
///
/// Times arrive as decimal strings, e.g. `{"begin": "0.000", "end": "0.440",
/// "lines": ["hello"]}`.
#[derive(Debug, Deserialize)]
struct SyncMap {
    fragments: Vec<SyncFragment>,
}

#[derive(Debug, Deserialize)]
struct SyncFragment {
    begin: String,
    end: String,
    #[serde(default)]
    lines: Vec<String>,
}

impl SyncMap {
    fn into_visemes(self) -> Result<Vec<Viseme>> {
        let mut visemes = Vec::with_capacity(self.fragments.len());
        for fragment in self.fragments {
            let start = parse_seconds(&fragment.begin)?;
            let end = parse_seconds(&fragment.end)?;
            let phoneme = fragment.lines.into_iter().next().unwrap_or_default();
            visemes.push(Viseme {
                phoneme,
                start,
                end,
            });
        }
        Ok(visemes)
    }
}

fn parse_seconds(value: &str) -> Result<f64> {
    value
        .parse::<f64>()
        .map_err(|e| TtsError::Alignment(format!("bad fragment time {:?}: {}", value, e)))
}
