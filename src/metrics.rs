//! Bandwidth metric: bit accounting policies and rate computation
//!
//! Two policies coexist in the study setups this game recreates; both are
//! supported as an explicit configuration choice rather than forked copies
//! of the state machine.

use serde::Deserialize;

use crate::grid::Position;

/// Bits credited for a move that changes position under `PerMove`.
pub const MOVE_BITS: u64 = 2;

/// How moves and arrivals convert into communicated bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricPolicy {
    /// Fixed 2-bit quantum per move that changes position. Pressing into
    /// a wall communicates nothing to the grid and earns nothing.
    PerMove,
    /// 2 x manhattan(leg start, goal) credited on arrival only, modeling
    /// the information content of the path from the previous goal.
    DistanceWeighted,
}

/// Which clock elapsed time is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimingSource {
    /// Elapsed = session length minus countdown remaining.
    Countdown,
    /// Elapsed = now minus the session start timestamp.
    WallClock,
}

impl MetricPolicy {
    /// Bits earned by an accepted move. `moved` is false when the move
    /// clamped against a boundary.
    pub fn bits_for_move(self, moved: bool) -> u64 {
        match self {
            MetricPolicy::PerMove if moved => MOVE_BITS,
            _ => 0,
        }
    }

    /// Bits earned at goal arrival for the leg starting at `leg_start`.
    pub fn bits_for_arrival(self, leg_start: Position, goal: Position) -> u64 {
        match self {
            MetricPolicy::PerMove => 0,
            MetricPolicy::DistanceWeighted => 2 * leg_start.manhattan(goal) as u64,
        }
    }
}

/// Bits per second, with elapsed floored to 1 so a rate is displayable
/// from the first instant of a session.
pub fn bits_per_second(total_bits: u64, elapsed_secs: i64) -> f64 {
    total_bits as f64 / elapsed_secs.max(1) as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_per_move_bits() {
        assert_eq!(MetricPolicy::PerMove.bits_for_move(true), 2);
        assert_eq!(MetricPolicy::PerMove.bits_for_move(false), 0);
        assert_eq!(MetricPolicy::DistanceWeighted.bits_for_move(true), 0);
    }

    #[test]
    fn test_arrival_bits() {
        let start = Position::new(0, 0);
        let goal = Position::new(2, 3);
        assert_eq!(MetricPolicy::PerMove.bits_for_arrival(start, goal), 0);
        assert_eq!(
            MetricPolicy::DistanceWeighted.bits_for_arrival(start, goal),
            10
        );
    }

    #[test]
    fn test_rate() {
        assert_eq!(bits_per_second(10, 5), 2.0);
        // Elapsed zero is treated as one second.
        assert_eq!(bits_per_second(10, 0), 10.0);
        assert_eq!(bits_per_second(0, 0), 0.0);
    }

    #[test]
    fn test_policy_from_config_string() {
        let p: MetricPolicy = toml::Value::String("per_move".into())
            .try_into()
            .unwrap();
        assert_eq!(p, MetricPolicy::PerMove);
        let p: MetricPolicy = toml::Value::String("distance_weighted".into())
            .try_into()
            .unwrap();
        assert_eq!(p, MetricPolicy::DistanceWeighted);
    }
}
