//! # Wall Derivation and Classification
//!
//! Walls are derived from the floor set: every missing 4-neighbour of a floor
//! cell, plus the diagonal cell wherever both orthogonal cells toward it are
//! missing. Classification picks a visual piece per wall and never affects
//! walkability.

use crate::game::{Direction, Position};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Visual category of a wall cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WallKind {
    Horizontal,
    Vertical,
    InnerCorner,
    OuterCorner,
}

/// Visual wall piece: a category plus a rotation in degrees (0, 90, 180 or 270).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WallPiece {
    pub kind: WallKind,
    pub rotation: u16,
}

impl WallPiece {
    fn new(kind: WallKind, rotation: u16) -> Self {
        Self { kind, rotation }
    }

    /// Picks the piece for the wall at `pos`.
    ///
    /// Two perpendicular wall neighbours make a corner, inner when the floor
    /// sits in the diagonal between them. Otherwise the wall runs horizontally
    /// or vertically depending on which neighbours are walls.
    pub fn classify(
        pos: Position,
        floor: &BTreeSet<Position>,
        walls: &BTreeSet<Position>,
    ) -> WallPiece {
        let wall = |direction: Direction| walls.contains(&pos.step(direction));
        let floor_at = |dx: i32, dy: i32| floor.contains(&Position::new(pos.x + dx, pos.y + dy));

        let up = wall(Direction::Up);
        let down = wall(Direction::Down);
        let left = wall(Direction::Left);
        let right = wall(Direction::Right);

        let corner = |diagonal_floor: bool, rotation| {
            let kind = if diagonal_floor {
                WallKind::InnerCorner
            } else {
                WallKind::OuterCorner
            };
            WallPiece::new(kind, rotation)
        };

        match (up, down, left, right) {
            (true, false, false, true) => corner(floor_at(1, 1), 0),
            (true, false, true, false) => corner(floor_at(-1, 1), 90),
            (false, true, true, false) => corner(floor_at(-1, -1), 180),
            (false, true, false, true) => corner(floor_at(1, -1), 270),
            (false, false, true, true) => WallPiece::new(WallKind::Horizontal, 0),
            (true, true, false, false) => {
                let rotation = if floor_at(1, 0) { 180 } else { 0 };
                WallPiece::new(WallKind::Vertical, rotation)
            }
            _ if left || right => WallPiece::new(WallKind::Horizontal, 0),
            _ if up || down => WallPiece::new(WallKind::Vertical, 0),
            _ => WallPiece::new(WallKind::Horizontal, 0),
        }
    }
}

/// Derives the wall set surrounding `floor`.
///
/// The result is disjoint from `floor` and every wall has a floor cell in its
/// 8-neighbourhood.
pub fn derive_walls(floor: &BTreeSet<Position>) -> BTreeSet<Position> {
    let mut walls = BTreeSet::new();

    for &pos in floor {
        for neighbour in pos.cardinal_neighbours() {
            if !floor.contains(&neighbour) {
                walls.insert(neighbour);
            }
        }
        for (dx, dy) in [(1, 1), (-1, 1), (1, -1), (-1, -1)] {
            let beside = Position::new(pos.x + dx, pos.y);
            let above = Position::new(pos.x, pos.y + dy);
            let diagonal = Position::new(pos.x + dx, pos.y + dy);
            if !floor.contains(&beside) && !floor.contains(&above) && !floor.contains(&diagonal) {
                walls.insert(diagonal);
            }
        }
    }

    walls.retain(|wall| wall.surrounding().iter().any(|cell| floor.contains(cell)));
    walls
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::Rect;

    fn room_floor(rect: Rect) -> BTreeSet<Position> {
        rect.positions().collect()
    }

    #[test]
    fn test_walls_ring_a_room() {
        let floor = room_floor(Rect::new(1, 1, 3, 2));
        let walls = derive_walls(&floor);

        // 5x4 ring around a 3x2 room, corners included
        assert_eq!(walls.len(), 5 * 4 - 3 * 2);
        assert!(walls.is_disjoint(&floor));
        assert!(walls.contains(&Position::new(0, 0)));
        assert!(walls.contains(&Position::new(4, 3)));
    }

    #[test]
    fn test_single_cell_gets_corner_fill() {
        let floor: BTreeSet<_> = [Position::new(0, 0)].into_iter().collect();
        let walls = derive_walls(&floor);
        assert_eq!(walls.len(), 8);
    }

    #[test]
    fn test_corridor_bend_has_no_gaps() {
        // An L: (0,0) (1,0) (1,1)
        let floor: BTreeSet<_> = [Position::new(0, 0), Position::new(1, 0), Position::new(1, 1)]
            .into_iter()
            .collect();
        let walls = derive_walls(&floor);
        assert!(walls.is_disjoint(&floor));
        // Inside of the bend is walled off
        assert!(walls.contains(&Position::new(0, 1)));
        assert!(walls.contains(&Position::new(2, 2)));
        assert!(walls.contains(&Position::new(-1, -1)));
    }

    #[test]
    fn test_classify_room_ring() {
        let floor = room_floor(Rect::new(1, 1, 3, 3));
        let walls = derive_walls(&floor);

        let bottom_left = WallPiece::classify(Position::new(0, 0), &floor, &walls);
        assert_eq!(bottom_left, WallPiece::new(WallKind::InnerCorner, 0));

        let top_right = WallPiece::classify(Position::new(4, 4), &floor, &walls);
        assert_eq!(top_right, WallPiece::new(WallKind::InnerCorner, 180));

        let bottom_edge = WallPiece::classify(Position::new(2, 0), &floor, &walls);
        assert_eq!(bottom_edge.kind, WallKind::Horizontal);

        let left_edge = WallPiece::classify(Position::new(0, 2), &floor, &walls);
        assert_eq!(left_edge, WallPiece::new(WallKind::Vertical, 180));

        let right_edge = WallPiece::classify(Position::new(4, 2), &floor, &walls);
        assert_eq!(right_edge, WallPiece::new(WallKind::Vertical, 0));
    }

    #[test]
    fn test_classify_isolated_wall() {
        let floor = BTreeSet::new();
        let walls: BTreeSet<_> = [Position::new(3, 3)].into_iter().collect();
        let piece = WallPiece::classify(Position::new(3, 3), &floor, &walls);
        assert_eq!(piece, WallPiece::new(WallKind::Horizontal, 0));
    }
}
