//! Typed game events and channel plumbing
//!
//! Every input source (1 Hz ticker, keyboard reader, transcription
//! feeders) is reduced to one event enum delivered over a single mpsc
//! channel, so the state machine never touches a platform event API and
//! processes exactly one event at a time.

use tokio::sync::mpsc;

use crate::errors::GameError;

/// A key press, decoupled from any terminal backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Enter,
    Esc,
    Char(char),
}

/// Everything that can happen to a session.
#[derive(Debug, Clone)]
pub enum GameEvent {
    /// One second of wall-clock time passed.
    Tick,
    /// A key was pressed.
    Key(Key),
    /// A transcription result arrived. Partial transcripts may still
    /// change; only final ones are interpreted.
    Transcript { text: String, is_final: bool },
    /// The transcription pipeline failed for one turn.
    SttError(GameError),
    /// Start or restart the session.
    Start,
    /// Tear down the game loop.
    Quit,
}

pub type EventSender = mpsc::Sender<GameEvent>;
pub type EventReceiver = mpsc::Receiver<GameEvent>;

/// Create the event channel shared by all input sources.
pub fn channel(capacity: usize) -> (EventSender, EventReceiver) {
    mpsc::channel(capacity)
}
