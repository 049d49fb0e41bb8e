//! Session state machine: lifecycle, countdown, scoring, bit accrual
//!
//! Phases run `NotStarted -> Running -> Over`, with an explicit restart
//! re-entering `Running`. Every operation is total: out-of-phase calls are
//! silently ignored, and interpretation failures only populate the error
//! slot shown to the player. Aborting a live game loop on a bad frame
//! would be worse than dropping it.

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};

use crate::errors::GameError;
use crate::grid::{self, Direction, Position};
use crate::metrics::{self, MetricPolicy, TimingSource};

/// Where the session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    NotStarted,
    Running,
    Over,
}

/// The aggregate game state. One per program run; discarded on exit.
pub struct Session {
    pub phase: Phase,
    pub grid_size: u8,
    pub session_secs: u32,
    pub policy: MetricPolicy,
    pub timing: TimingSource,
    /// Current player cell.
    pub user: Position,
    /// Player cell at the time the current goal was set. Feeds the
    /// distance-weighted bit accounting.
    pub leg_start: Position,
    pub goal: Position,
    /// Goals reached this session.
    pub score: u32,
    pub time_remaining_secs: u32,
    pub total_bits: u64,
    pub started_at: DateTime<Utc>,
    /// Most recent successfully interpreted command.
    pub last_command: Option<Direction>,
    /// Most recent error message, cleared by the next good command.
    pub last_error: Option<String>,
    rng: StdRng,
}

impl Session {
    pub fn new(
        grid_size: u8,
        session_secs: u32,
        policy: MetricPolicy,
        timing: TimingSource,
    ) -> Self {
        Self::with_rng(
            grid_size,
            session_secs,
            policy,
            timing,
            StdRng::from_entropy(),
        )
    }

    /// Deterministic goal sequence for tests and reproducible sessions.
    pub fn seeded(
        grid_size: u8,
        session_secs: u32,
        policy: MetricPolicy,
        timing: TimingSource,
        seed: u64,
    ) -> Self {
        Self::with_rng(
            grid_size,
            session_secs,
            policy,
            timing,
            StdRng::seed_from_u64(seed),
        )
    }

    fn with_rng(
        grid_size: u8,
        session_secs: u32,
        policy: MetricPolicy,
        timing: TimingSource,
        mut rng: StdRng,
    ) -> Self {
        let goal = grid::sample_goal(&mut rng, grid_size);
        Self {
            phase: Phase::NotStarted,
            grid_size,
            session_secs,
            policy,
            timing,
            user: Position::ORIGIN,
            leg_start: Position::ORIGIN,
            goal,
            score: 0,
            time_remaining_secs: session_secs,
            total_bits: 0,
            started_at: Utc::now(),
            last_command: None,
            last_error: None,
            rng,
        }
    }

    /// Start or restart: reset every mutable field, resample the goal,
    /// stamp the start time, and enter `Running`.
    pub fn start(&mut self) {
        self.user = Position::ORIGIN;
        self.leg_start = Position::ORIGIN;
        self.goal = grid::sample_goal(&mut self.rng, self.grid_size);
        self.score = 0;
        self.time_remaining_secs = self.session_secs;
        self.total_bits = 0;
        self.started_at = Utc::now();
        self.last_command = None;
        self.last_error = None;
        self.phase = Phase::Running;
        info!(
            goal_row = self.goal.row,
            goal_col = self.goal.col,
            secs = self.session_secs,
            "session started"
        );
    }

    /// Advance the countdown by one second. Called at 1 Hz from the
    /// wall-clock ticker, never from input cadence, so the game ends even
    /// with zero player input. No-op outside `Running`.
    pub fn tick(&mut self) {
        if self.phase != Phase::Running {
            return;
        }
        self.time_remaining_secs = self.time_remaining_secs.saturating_sub(1);
        if self.time_remaining_secs == 0 {
            self.phase = Phase::Over;
            info!(
                score = self.score,
                total_bits = self.total_bits,
                "time up, session over"
            );
        }
    }

    /// Apply an interpreted direction: clamped move, bit accrual, arrival
    /// check, scoring, goal rotation. No-op outside `Running`.
    pub fn apply_direction(&mut self, dir: Direction) {
        if self.phase != Phase::Running {
            return;
        }
        let next = grid::clamp_move(self.user, dir, self.grid_size);
        let moved = next != self.user;
        self.user = next;
        self.last_command = Some(dir);
        self.last_error = None;
        self.total_bits += self.policy.bits_for_move(moved);
        debug!(
            dir = dir.word(),
            row = self.user.row,
            col = self.user.col,
            moved,
            "moving to new position"
        );

        if grid::has_arrived(self.user, self.goal) {
            self.score += 1;
            self.total_bits += self.policy.bits_for_arrival(self.leg_start, self.goal);
            self.leg_start = self.user;
            self.goal = grid::sample_goal(&mut self.rng, self.grid_size);
            debug!(
                score = self.score,
                goal_row = self.goal.row,
                goal_col = self.goal.col,
                "goal reached, new goal sampled"
            );
        }
    }

    /// Record a non-fatal error for display. Phase is unchanged; the slot
    /// clears on the next successfully interpreted command.
    pub fn report_error(&mut self, err: &GameError) {
        self.last_error = Some(err.to_string());
    }

    /// Seconds elapsed according to the configured timing source.
    pub fn elapsed_secs(&self) -> i64 {
        match self.timing {
            TimingSource::Countdown => {
                (self.session_secs - self.time_remaining_secs) as i64
            }
            TimingSource::WallClock => (Utc::now() - self.started_at).num_seconds(),
        }
    }

    pub fn bits_per_second(&self) -> f64 {
        metrics::bits_per_second(self.total_bits, self.elapsed_secs())
    }
}
