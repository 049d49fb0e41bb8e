//! Game error taxonomy
//!
//! All of these are non-fatal: they are recorded for display (or silently
//! discarded, for stale results) and never abort the session. The only
//! terminal transition is the countdown reaching zero, which is a normal
//! game-over, not an error.

use thiserror::Error;

/// Errors surfaced by the input pipeline.
#[derive(Debug, Clone, Error)]
pub enum GameError {
    /// Input normalized but matched no direction word.
    #[error("unrecognized command: \"{0}\"")]
    UnrecognizedCommand(String),

    /// Voice input capability is missing or misconfigured; keyboard
    /// input remains usable for the rest of the session.
    #[error("speech recognition unavailable: {0}")]
    RecognitionUnavailable(String),

    /// The transcription relay returned an error or the request failed.
    #[error("transcription request failed: {0}")]
    TranscriptionRequestFailed(String),

    /// A transcription completed after the session ended. Never shown
    /// to the user.
    #[error("transcript arrived after the session ended")]
    StaleResult,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unrecognized_keeps_raw_text() {
        let err = GameError::UnrecognizedCommand("banana".to_string());
        assert!(err.to_string().contains("banana"));
    }
}
