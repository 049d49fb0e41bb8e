//! HTTP transcription client
//!
//! POSTs a WAV buffer to the relay endpoint and maps the JSON response
//! to a final `Transcript`. The relay answers either
//! `{"text": ..., "confidence": ..., "language": ...}` or `{"error": ...}`.

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;
use tracing::debug;

use super::{Transcriber, Transcript};
use crate::errors::GameError;

pub struct HttpTranscriber {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TranscribeResponse {
    text: Option<String>,
    error: Option<String>,
    confidence: Option<f32>,
    language: Option<String>,
}

impl HttpTranscriber {
    pub fn new(endpoint: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
            api_key,
        }
    }
}

#[async_trait]
impl Transcriber for HttpTranscriber {
    async fn transcribe(&self, audio: &[u8]) -> Result<Transcript, GameError> {
        debug!(bytes = audio.len(), endpoint = %self.endpoint, "posting audio");

        let mut request = self
            .client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "audio/wav")
            .body(audio.to_vec());
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| GameError::TranscriptionRequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(GameError::TranscriptionRequestFailed(format!(
                "endpoint returned {}",
                status
            )));
        }

        let body: TranscribeResponse = response
            .json()
            .await
            .map_err(|e| GameError::TranscriptionRequestFailed(format!("bad response: {}", e)))?;

        if let Some(error) = body.error {
            return Err(GameError::TranscriptionRequestFailed(error));
        }
        let text = body.text.ok_or_else(|| {
            GameError::TranscriptionRequestFailed("response carried neither text nor error".into())
        })?;

        debug!(%text, "transcript received");
        Ok(Transcript {
            text,
            is_final: true,
            confidence: body.confidence,
            language: body.language,
        })
    }
}
