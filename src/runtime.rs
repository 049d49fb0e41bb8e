//! Single-consumer game loop
//!
//! One task owns the `Session` and consumes the event channel; mutual
//! exclusion falls out of single consumption, no locking needed. Stale
//! transcription results (phase no longer `Running`) are discarded at
//! dispatch entry and never surfaced to the player.

use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::events::{EventReceiver, EventSender, GameEvent, Key};
use crate::interp;
use crate::session::{Phase, Session};

/// 1 Hz countdown ticker. Feeds `Tick` events until cancelled or the
/// channel closes; `tokio::time::interval` keeps it firing with zero
/// player input.
pub async fn ticker(tx: EventSender, cancel: CancellationToken) {
    let mut interval = tokio::time::interval(Duration::from_secs(1));
    // The first tick completes immediately; skip it so ticks land on
    // whole-second boundaries after spawn.
    interval.tick().await;
    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = interval.tick() => {
                if tx.send(GameEvent::Tick).await.is_err() {
                    break;
                }
            }
        }
    }
}

/// The session plus loop-local display state.
pub struct GameLoop {
    pub session: Session,
    /// Latest partial transcript, shown as a "heard so far" hint but
    /// never interpreted.
    pub partial: Option<String>,
}

impl GameLoop {
    pub fn new(session: Session) -> Self {
        Self {
            session,
            partial: None,
        }
    }

    /// Consume events until `Quit`, `q`/esc, or channel close, invoking
    /// `render` after every event. Returns the final session.
    pub async fn run<F>(mut self, mut rx: EventReceiver, mut render: F) -> Session
    where
        F: FnMut(&GameLoop),
    {
        render(&self);
        while let Some(event) = rx.recv().await {
            if !self.dispatch(event) {
                break;
            }
            render(&self);
        }
        self.session
    }

    /// Apply one event. Returns false when the loop should exit.
    pub fn dispatch(&mut self, event: GameEvent) -> bool {
        match event {
            GameEvent::Tick => self.session.tick(),
            GameEvent::Start => {
                self.partial = None;
                self.session.start();
            }
            GameEvent::Key(key) => return self.handle_key(key),
            GameEvent::Transcript { text, is_final } => self.handle_transcript(text, is_final),
            GameEvent::SttError(err) => {
                if self.session.phase == Phase::Over {
                    debug!(%err, "discarding stale transcription error");
                } else {
                    warn!(%err, "transcription pipeline error");
                    self.session.report_error(&err);
                }
            }
            GameEvent::Quit => return false,
        }
        true
    }

    fn handle_key(&mut self, key: Key) -> bool {
        match key {
            Key::Esc | Key::Char('q') => return false,
            Key::Enter | Key::Char('r') => {
                if self.session.phase != Phase::Running {
                    self.partial = None;
                    self.session.start();
                }
            }
            other => {
                if let Some(dir) = interp::direction_for_key(&other) {
                    self.session.apply_direction(dir);
                }
                // Any other key is background noise, not an error.
            }
        }
        true
    }

    fn handle_transcript(&mut self, text: String, is_final: bool) {
        if self.session.phase != Phase::Running {
            // StaleResult: completed after the session ended.
            debug!(%text, "discarding stale transcript");
            return;
        }
        if !is_final {
            self.partial = Some(text);
            return;
        }
        self.partial = None;
        match interp::interpret_phrase(&text) {
            Ok(dir) => self.session.apply_direction(dir),
            Err(err) => {
                warn!(%err, "unrecognized voice command");
                self.session.report_error(&err);
            }
        }
    }
}
