//! Command interpreter: key codes and transcribed phrases to directions
//!
//! Keyboard input maps 1:1; unknown keys are ignored with no side effect.
//! Voice input goes through two stages: an exact correction lookup for
//! known mis-transcriptions, then a lenient substring scan so phrases like
//! "please move up now" still resolve. A pure exact match would reject too
//! much real speech-to-text output.

use tracing::debug;

use crate::errors::GameError;
use crate::events::Key;
use crate::grid::Direction;

/// Words the transcription service reliably mishears the four direction
/// words as, mapped back to what the speaker meant.
const CORRECTIONS: [(&str, Direction); 4] = [
    ("app", Direction::Up),
    ("laughed", Direction::Left),
    ("write", Direction::Right),
    ("downtown", Direction::Down),
];

/// Map a key to a direction. Non-arrow keys resolve to nothing; a wrong
/// key is expected background noise, not an error.
pub fn direction_for_key(key: &Key) -> Option<Direction> {
    match key {
        Key::ArrowUp => Some(Direction::Up),
        Key::ArrowDown => Some(Direction::Down),
        Key::ArrowLeft => Some(Direction::Left),
        Key::ArrowRight => Some(Direction::Right),
        _ => None,
    }
}

/// Resolve a transcribed phrase to a direction.
///
/// The phrase is trimmed and lowercased, then run through the correction
/// table and, failing that, a contains-match against the four direction
/// words. Rejections carry the original raw text for display.
pub fn interpret_phrase(raw: &str) -> Result<Direction, GameError> {
    let phrase = raw.trim().to_lowercase();
    debug!(raw, "raw command received");

    for (heard, dir) in CORRECTIONS {
        if phrase == heard {
            debug!(heard, corrected = dir.word(), "corrected command");
            return Ok(dir);
        }
    }

    for dir in Direction::ALL {
        if phrase.contains(dir.word()) {
            return Ok(dir);
        }
    }

    debug!(raw, "ignored command");
    Err(GameError::UnrecognizedCommand(raw.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arrow_keys() {
        assert_eq!(direction_for_key(&Key::ArrowUp), Some(Direction::Up));
        assert_eq!(direction_for_key(&Key::ArrowDown), Some(Direction::Down));
        assert_eq!(direction_for_key(&Key::ArrowLeft), Some(Direction::Left));
        assert_eq!(direction_for_key(&Key::ArrowRight), Some(Direction::Right));
    }

    #[test]
    fn test_non_arrow_keys_ignored() {
        assert_eq!(direction_for_key(&Key::Enter), None);
        assert_eq!(direction_for_key(&Key::Esc), None);
        assert_eq!(direction_for_key(&Key::Char('x')), None);
    }

    #[test]
    fn test_exact_direction_words() {
        for dir in Direction::ALL {
            assert_eq!(interpret_phrase(dir.word()).unwrap(), dir);
        }
    }

    #[test]
    fn test_correction_table() {
        assert_eq!(interpret_phrase("app").unwrap(), Direction::Up);
        assert_eq!(interpret_phrase("laughed").unwrap(), Direction::Left);
        assert_eq!(interpret_phrase("write").unwrap(), Direction::Right);
        assert_eq!(interpret_phrase("downtown").unwrap(), Direction::Down);
    }

    #[test]
    fn test_substring_match() {
        assert_eq!(interpret_phrase("please go up now").unwrap(), Direction::Up);
        assert_eq!(interpret_phrase("move LEFT a bit").unwrap(), Direction::Left);
        assert_eq!(interpret_phrase("  Down  ").unwrap(), Direction::Down);
    }

    #[test]
    fn test_unrecognized_carries_raw_text() {
        match interpret_phrase("banana") {
            Err(GameError::UnrecognizedCommand(raw)) => assert_eq!(raw, "banana"),
            other => panic!("expected UnrecognizedCommand, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_phrase_rejected() {
        assert!(interpret_phrase("   ").is_err());
    }
}
