//! # Grid Mathematics
//!
//! Small geometric helpers shared by the decision routine and the resolver.

use crate::game::{Direction, Position};

/// Direction of a single greedy step from `from` toward `to`.
///
/// Moves along the axis with the larger gap; equal gaps move horizontally.
/// Returns `None` when the two positions coincide.
///
/// # Examples
///
/// ```
/// use dungeon_tactics::{step_toward, Direction, Position};
///
/// let origin = Position::new(0, 0);
/// assert_eq!(step_toward(origin, Position::new(1, 4)), Some(Direction::Up));
/// assert_eq!(step_toward(origin, Position::new(-2, 2)), Some(Direction::Left));
/// assert_eq!(step_toward(origin, origin), None);
/// ```
pub fn step_toward(from: Position, to: Position) -> Option<Direction> {
    let dx = to.x - from.x;
    let dy = to.y - from.y;
    if dx == 0 && dy == 0 {
        return None;
    }

    let direction = if dx.abs() >= dy.abs() {
        if dx > 0 {
            Direction::Right
        } else {
            Direction::Left
        }
    } else if dy > 0 {
        Direction::Up
    } else {
        Direction::Down
    };
    Some(direction)
}

/// Checks whether two positions share a row or a column.
pub fn is_cross_aligned(a: Position, b: Position) -> bool {
    a.x == b.x || a.y == b.y
}
