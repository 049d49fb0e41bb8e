//! Speech-to-text collaborators
//!
//! The game only needs the contract: audio bytes in, a best-effort
//! lowercase phrase (or an error) out. `http` covers the request/response
//! relay, `stream` the persistent live-transcription connection, `wav`
//! the audio container the HTTP relay expects.

pub mod http;
pub mod stream;
pub mod wav;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::GameError;

/// One transcription result from any backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transcript {
    pub text: String,
    /// Partial transcripts may still change; only final ones are stable
    /// enough to interpret.
    #[serde(default)]
    pub is_final: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

/// Batch transcription: a complete audio buffer resolves to a final
/// phrase, or a `TranscriptionRequestFailed`.
#[async_trait]
pub trait Transcriber: Send + Sync {
    async fn transcribe(&self, audio: &[u8]) -> Result<Transcript, GameError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transcript_wire_decoding() {
        let t: Transcript =
            serde_json::from_str(r#"{"text": "go left", "is_final": true, "confidence": 0.92}"#)
                .unwrap();
        assert_eq!(t.text, "go left");
        assert!(t.is_final);
        assert_eq!(t.confidence, Some(0.92));
        assert!(t.language.is_none());
    }

    #[test]
    fn test_missing_flag_means_partial() {
        let t: Transcript = serde_json::from_str(r#"{"text": "go le"}"#).unwrap();
        assert!(!t.is_final);
    }
}
