//! # Pathfinding
//!
//! Budget-bounded searches over the grid, used for move legality and for the
//! move/attack range previews.

use crate::game::{Direction, Grid, Position};
use pathfinding::prelude::{bfs, dijkstra_reach};
use serde::{Deserialize, Serialize};

/// One tile of a previewed path with the action points spent to get there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathStep {
    pub position: Position,
    pub ap_cost: u32,
}

/// Shortest 4-connected path from `start` to `goal` of at most `budget` steps.
///
/// Neighbours are explored up, down, left, right and the first discovery of a
/// tile wins, so ties always resolve the same way. Intermediate tiles must be
/// walkable; `goal` only has to be a floor tile, which lets callers path up to
/// an occupied tile for previews. The returned path excludes `start`;
/// `start == goal` yields an empty path.
///
/// # Examples
///
/// ```
/// use dungeon_tactics::{find_path, Grid, Position};
///
/// let grid = Grid::open(5, 5);
/// let path = find_path(&grid, Position::new(0, 0), Position::new(2, 1), 3).unwrap();
/// assert_eq!(path.len(), 3);
/// assert_eq!(path.last(), Some(&Position::new(2, 1)));
/// assert!(find_path(&grid, Position::new(0, 0), Position::new(4, 4), 3).is_none());
/// ```
pub fn find_path(grid: &Grid, start: Position, goal: Position, budget: u32) -> Option<Vec<Position>> {
    if start == goal {
        return Some(Vec::new());
    }
    if start.manhattan_distance(goal) > budget || !grid.is_floor(goal) {
        return None;
    }

    let path = bfs(
        &start,
        |&pos| {
            pos.cardinal_neighbours()
                .into_iter()
                .filter(move |&next| grid.is_walkable(next) || (next == goal && grid.is_floor(next)))
        },
        |&pos| pos == goal,
    )?;

    // bfs includes the start tile
    let steps = path.len() - 1;
    if steps > budget as usize {
        return None;
    }
    Some(path.into_iter().skip(1).collect())
}

/// Every walkable tile reachable from `origin` in at most `budget` steps,
/// sorted, `origin` excluded.
pub fn reachable_tiles(grid: &Grid, origin: Position, budget: u32) -> Vec<Position> {
    let mut tiles: Vec<Position> = dijkstra_reach(&origin, |&pos| {
        pos.cardinal_neighbours()
            .into_iter()
            .filter(|&next| grid.is_walkable(next))
            .map(|next| (next, 1u32))
            .collect::<Vec<_>>()
    })
    .take_while(|item| item.total_cost <= budget)
    .map(|item| item.node)
    .filter(|&pos| pos != origin)
    .collect();
    tiles.sort_unstable();
    tiles
}

/// Plus-shaped set of tiles within `range` of `origin` along its row and
/// column, keeping only those `in_bounds` accepts.
pub fn attack_tiles(origin: Position, range: u32, in_bounds: impl Fn(Position) -> bool) -> Vec<Position> {
    let mut tiles = Vec::new();
    for direction in Direction::CARDINAL {
        let delta = direction.to_delta();
        for distance in 1..=range as i32 {
            let pos = Position::new(origin.x + delta.x * distance, origin.y + delta.y * distance);
            if in_bounds(pos) {
                tiles.push(pos);
            }
        }
    }
    tiles
}

/// Pairs each tile of `path` with the cumulative action points to reach it.
pub fn annotate_path(path: &[Position]) -> Vec<PathStep> {
    path.iter()
        .enumerate()
        .map(|(index, &position)| PathStep {
            position,
            ap_cost: index as u32 + 1,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::new_actor_id;
    use crate::generation::DungeonLayout;
    use std::collections::BTreeSet;

    fn grid_from(rows: &[&str]) -> Grid {
        // First row is the top (highest y)
        let height = rows.len() as i32;
        let floor: BTreeSet<Position> = rows
            .iter()
            .enumerate()
            .flat_map(|(row, line)| {
                line.chars().enumerate().filter_map(move |(x, c)| {
                    (c == '.').then(|| Position::new(x as i32, height - 1 - row as i32))
                })
            })
            .collect();
        Grid::from_layout(&DungeonLayout::from_floor(rows[0].len() as u32, rows.len() as u32, floor))
    }

    #[test]
    fn test_same_tile_is_empty_path() {
        let grid = Grid::open(3, 3);
        let pos = Position::new(1, 1);
        assert_eq!(find_path(&grid, pos, pos, 0), Some(Vec::new()));
    }

    #[test]
    fn test_straight_line_path() {
        let grid = Grid::open(5, 1);
        let path = find_path(&grid, Position::new(0, 0), Position::new(3, 0), 3).unwrap();
        assert_eq!(
            path,
            vec![Position::new(1, 0), Position::new(2, 0), Position::new(3, 0)]
        );
        assert!(find_path(&grid, Position::new(0, 0), Position::new(3, 0), 2).is_none());
    }

    #[test]
    fn test_ties_prefer_up_first() {
        let grid = Grid::open(3, 3);
        let path = find_path(&grid, Position::new(0, 0), Position::new(1, 1), 2).unwrap();
        assert_eq!(path, vec![Position::new(0, 1), Position::new(1, 1)]);
    }

    #[test]
    fn test_path_detours_around_walls() {
        let grid = grid_from(&[
            "...",
            "#.#",
            "...",
        ]);
        let start = Position::new(0, 0);
        let goal = Position::new(0, 2);
        assert!(find_path(&grid, start, goal, 3).is_none());
        let path = find_path(&grid, start, goal, 4).unwrap();
        assert_eq!(path.len(), 4);
        assert!(path.contains(&Position::new(1, 1)));
    }

    #[test]
    fn test_occupied_tiles_block_but_goal_may_be_occupied() {
        let mut grid = Grid::open(3, 1);
        let blocker = new_actor_id();
        grid.set_occupant(Position::new(1, 0), Some(blocker));

        assert!(find_path(&grid, Position::new(0, 0), Position::new(2, 0), 5).is_none());
        let to_blocker = find_path(&grid, Position::new(0, 0), Position::new(1, 0), 1).unwrap();
        assert_eq!(to_blocker, vec![Position::new(1, 0)]);
    }

    #[test]
    fn test_wall_goal_is_unreachable() {
        let grid = grid_from(&["..#"]);
        assert!(find_path(&grid, Position::new(0, 0), Position::new(2, 0), 5).is_none());
    }

    #[test]
    fn test_reachable_tiles_within_budget() {
        let grid = Grid::open(5, 5);
        let tiles = reachable_tiles(&grid, Position::new(2, 2), 1);
        assert_eq!(
            tiles,
            vec![
                Position::new(1, 2),
                Position::new(2, 1),
                Position::new(2, 3),
                Position::new(3, 2),
            ]
        );
        assert_eq!(reachable_tiles(&grid, Position::new(2, 2), 2).len(), 12);
        assert!(reachable_tiles(&grid, Position::new(2, 2), 0).is_empty());
    }

    #[test]
    fn test_reachable_tiles_skip_walls_and_occupants() {
        let mut grid = grid_from(&[
            "...",
            "#.#",
            "...",
        ]);
        grid.set_occupant(Position::new(2, 0), Some(new_actor_id()));

        let tiles = reachable_tiles(&grid, Position::new(0, 0), 3);
        assert_eq!(
            tiles,
            vec![Position::new(1, 0), Position::new(1, 1), Position::new(1, 2)]
        );
        assert_eq!(reachable_tiles(&grid, Position::new(0, 0), 4).len(), 5);
    }

    #[test]
    fn test_attack_tiles_are_plus_shaped() {
        let origin = Position::new(0, 0);
        let all = attack_tiles(origin, 2, |_| true);
        assert_eq!(all.len(), 8);
        assert!(all.iter().all(|&pos| pos.x == 0 || pos.y == 0));

        let clipped = attack_tiles(origin, 2, |pos| pos.x >= 0 && pos.y >= 0);
        assert_eq!(clipped.len(), 4);
    }

    #[test]
    fn test_annotate_path_costs() {
        let steps = annotate_path(&[Position::new(1, 0), Position::new(2, 0)]);
        assert_eq!(steps[0].ap_cost, 1);
        assert_eq!(steps[1].ap_cost, 2);
        assert!(annotate_path(&[]).is_empty());
    }
}
