//! Grid geometry: positions, directions, clamped movement, goal sampling

use rand::Rng;
use serde::Serialize;

/// A cell on the grid. Produced fresh on every move, never mutated in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Position {
    pub row: u8,
    pub col: u8,
}

impl Position {
    /// Top-left cell, where every session starts.
    pub const ORIGIN: Position = Position { row: 0, col: 0 };

    pub fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }

    /// Manhattan distance: sum of absolute row and column differences.
    pub fn manhattan(self, other: Position) -> u32 {
        self.row.abs_diff(other.row) as u32 + self.col.abs_diff(other.col) as u32
    }
}

/// The entire command vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// The spoken word for this direction.
    pub fn word(self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }
}

/// Apply a direction to a position, clamping to [0, grid_size-1].
///
/// Moving against a boundary yields the same position back; it is not
/// a rejected move.
pub fn clamp_move(pos: Position, dir: Direction, grid_size: u8) -> Position {
    let max = grid_size.saturating_sub(1);
    match dir {
        Direction::Up => Position::new(pos.row.saturating_sub(1), pos.col),
        Direction::Down => Position::new(pos.row.saturating_add(1).min(max), pos.col),
        Direction::Left => Position::new(pos.row, pos.col.saturating_sub(1)),
        Direction::Right => Position::new(pos.row, pos.col.saturating_add(1).min(max)),
    }
}

/// Sample a goal uniformly over the full grid.
///
/// No anti-repeat guard: the goal may land on the user's cell or on the
/// previous goal's cell.
pub fn sample_goal<R: Rng + ?Sized>(rng: &mut R, grid_size: u8) -> Position {
    Position {
        row: rng.gen_range(0..grid_size),
        col: rng.gen_range(0..grid_size),
    }
}

/// True iff both coordinates match exactly.
pub fn has_arrived(user: Position, goal: Position) -> bool {
    user == goal
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const GRID: u8 = 10;

    #[test]
    fn test_clamp_never_leaves_bounds() {
        for row in 0..GRID {
            for col in 0..GRID {
                for dir in Direction::ALL {
                    let next = clamp_move(Position::new(row, col), dir, GRID);
                    assert!(next.row < GRID, "{:?} from ({},{})", dir, row, col);
                    assert!(next.col < GRID, "{:?} from ({},{})", dir, row, col);
                }
            }
        }
    }

    #[test]
    fn test_boundary_moves_are_noops() {
        assert_eq!(
            clamp_move(Position::ORIGIN, Direction::Up, GRID),
            Position::ORIGIN
        );
        assert_eq!(
            clamp_move(Position::ORIGIN, Direction::Left, GRID),
            Position::ORIGIN
        );
        let corner = Position::new(GRID - 1, GRID - 1);
        assert_eq!(clamp_move(corner, Direction::Down, GRID), corner);
        assert_eq!(clamp_move(corner, Direction::Right, GRID), corner);
    }

    #[test]
    fn test_interior_moves() {
        let p = Position::new(5, 5);
        assert_eq!(clamp_move(p, Direction::Up, GRID), Position::new(4, 5));
        assert_eq!(clamp_move(p, Direction::Down, GRID), Position::new(6, 5));
        assert_eq!(clamp_move(p, Direction::Left, GRID), Position::new(5, 4));
        assert_eq!(clamp_move(p, Direction::Right, GRID), Position::new(5, 6));
    }

    #[test]
    fn test_arrival_reflexive() {
        for row in 0..GRID {
            for col in 0..GRID {
                let p = Position::new(row, col);
                assert!(has_arrived(p, p));
            }
        }
        assert!(!has_arrived(Position::new(1, 2), Position::new(1, 3)));
        assert!(!has_arrived(Position::new(1, 2), Position::new(2, 2)));
    }

    #[test]
    fn test_sample_goal_in_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let goal = sample_goal(&mut rng, GRID);
            assert!(goal.row < GRID);
            assert!(goal.col < GRID);
        }
    }

    #[test]
    fn test_manhattan() {
        assert_eq!(Position::new(0, 0).manhattan(Position::new(2, 0)), 2);
        assert_eq!(Position::new(3, 4).manhattan(Position::new(1, 9)), 7);
        assert_eq!(Position::new(5, 5).manhattan(Position::new(5, 5)), 0);
    }
}
