//! Speech recognition interface.

use std::path::Path;

use async_trait::async_trait;

use crate::error::Result;

/// Result of one recognition pass over a waveform.
#[derive(Debug, Clone, Default)]
pub struct Transcription {
    /// Ordered text segments as returned by the model.
    pub segments: Vec<String>,
    /// Language tag detected (or pinned) for the audio.
    pub language: Option<String>,
}

impl Transcription {
    /// Joins all segments with single spaces and trims the result.
    pub fn text(&self) -> String {
        let mut out = String::new();
        for seg in &self.segments {
            let seg = seg.trim();
            if seg.is_empty() {
                continue;
            }
            if !out.is_empty() {
                out.push(' ');
            }
            out.push_str(seg);
        }
        out
    }
}

/// Interface for a pretrained speech-recognition model.
#[async_trait]
pub trait Recognizer: Send + Sync {
    /// Transcribes a fixed-format waveform file.
    async fn transcribe(&self, wav: &Path) -> Result<Transcription>;
}

#[cfg(test)]
mod recognizer_tests {
    use super::*;

    #[test]
    fn test_text_joins_with_single_spaces() {
        let t = Transcription {
            segments: vec![" Hello".into(), " world.".into(), " Bye. ".into()],
            language: Some("en".into()),
        };
        assert_eq!(t.text(), "Hello world. Bye.");
    }

    #[test]
    fn test_text_skips_empty_segments() {
        let t = Transcription {
            segments: vec!["".into(), "  ".into(), "one".into(), "".into(), "two".into()],
            language: None,
        };
        assert_eq!(t.text(), "one two");
    }

    #[test]
    fn test_text_empty_transcription() {
        assert_eq!(Transcription::default().text(), "");
    }
}
