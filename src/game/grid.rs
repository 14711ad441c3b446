//! # Grid Model
//!
//! Tile existence, walkability and the mapping from coordinate to occupant.
//!
//! The grid never decides who may stand where; the game state is responsible
//! for clearing an actor's old tile before setting the new one. The grid only
//! refuses writes that would break its own invariants and reports them.

use crate::game::{ActorId, Position};
use crate::generation::DungeonLayout;
use log::{error, warn};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// One floor cell of the dungeon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    /// Coordinate of this tile
    pub position: Position,
    /// Whether actors may ever stand here
    pub walkable: bool,
    /// Non-owning reference to the actor standing here
    pub occupant: Option<ActorId>,
}

impl Tile {
    /// Creates an empty walkable floor tile.
    pub fn floor(position: Position) -> Self {
        Self {
            position,
            walkable: true,
            occupant: None,
        }
    }

    /// Checks whether an actor stands on this tile.
    pub fn is_occupied(&self) -> bool {
        self.occupant.is_some()
    }
}

/// Occupancy-tracking view of a dungeon layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Grid {
    width: u32,
    height: u32,
    tiles: HashMap<Position, Tile>,
    walls: BTreeSet<Position>,
}

impl Grid {
    /// Builds a grid with one empty tile per floor coordinate of `layout`.
    pub fn from_layout(layout: &DungeonLayout) -> Self {
        let tiles = layout
            .floor
            .iter()
            .map(|&pos| (pos, Tile::floor(pos)))
            .collect();

        Self {
            width: layout.width,
            height: layout.height,
            tiles,
            walls: layout.walls.clone(),
        }
    }

    /// Builds a fully open `width` x `height` grid with no walls.
    ///
    /// # Examples
    ///
    /// ```
    /// use dungeon_tactics::{Grid, Position};
    ///
    /// let grid = Grid::open(5, 5);
    /// assert!(grid.is_walkable(Position::new(4, 4)));
    /// assert!(!grid.is_walkable(Position::new(5, 0)));
    /// ```
    pub fn open(width: u32, height: u32) -> Self {
        Self::from_layout(&DungeonLayout::open(width, height))
    }

    /// Width of the dungeon bounds.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height of the dungeon bounds.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Checks whether `pos` lies inside the dungeon bounds.
    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as u32) < self.width && (pos.y as u32) < self.height
    }

    /// Returns true iff `pos` is a walkable floor tile with no occupant.
    pub fn is_walkable(&self, pos: Position) -> bool {
        self.tiles
            .get(&pos)
            .map(|tile| tile.walkable && !tile.is_occupied())
            .unwrap_or(false)
    }

    /// Checks whether `pos` is part of the floor.
    pub fn is_floor(&self, pos: Position) -> bool {
        self.tiles.contains_key(&pos)
    }

    /// Checks whether `pos` is a wall.
    pub fn is_wall(&self, pos: Position) -> bool {
        self.walls.contains(&pos)
    }

    /// Gets the tile at `pos`, if `pos` is part of the layout.
    pub fn get_tile(&self, pos: Position) -> Option<&Tile> {
        self.tiles.get(&pos)
    }

    /// Gets the actor standing at `pos`.
    pub fn occupant_at(&self, pos: Position) -> Option<ActorId> {
        self.tiles.get(&pos).and_then(|tile| tile.occupant)
    }

    /// Iterates over every tile in no particular order.
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.values()
    }

    /// Number of floor tiles.
    pub fn floor_count(&self) -> usize {
        self.tiles.len()
    }

    /// Sets or clears the occupant of `pos`.
    ///
    /// Returns false and leaves the grid untouched when `pos` is not a tile,
    /// when the tile is not walkable, or when another actor already stands
    /// there. Those cases are bookkeeping bugs in the caller and are logged.
    pub fn set_occupant(&mut self, pos: Position, occupant: Option<ActorId>) -> bool {
        let Some(tile) = self.tiles.get_mut(&pos) else {
            if occupant.is_some() {
                error!("set_occupant on {} which is not a floor tile", pos);
            }
            return false;
        };

        match (occupant, tile.occupant) {
            (Some(new), Some(existing)) if new != existing => {
                error!(
                    "duplicate occupancy at {}: {} is already there, refusing {}",
                    pos, existing, new
                );
                false
            }
            (Some(_), _) if !tile.walkable => {
                warn!("refusing to place an actor on non-walkable tile {}", pos);
                false
            }
            _ => {
                tile.occupant = occupant;
                true
            }
        }
    }

    /// Clears every tile that references `actor`, returning how many were cleared.
    pub fn clear_actor(&mut self, actor: ActorId) -> usize {
        let mut cleared = 0;
        for tile in self.tiles.values_mut() {
            if tile.occupant == Some(actor) {
                tile.occupant = None;
                cleared += 1;
            }
        }
        cleared
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::new_actor_id;

    #[test]
    fn test_open_grid_walkability() {
        let grid = Grid::open(5, 5);
        assert_eq!(grid.floor_count(), 25);
        assert!(grid.is_walkable(Position::new(0, 0)));
        assert!(grid.is_walkable(Position::new(4, 4)));
        assert!(!grid.is_walkable(Position::new(-1, 0)));
        assert!(grid.get_tile(Position::new(5, 5)).is_none());
    }

    #[test]
    fn test_occupancy_blocks_walkability() {
        let mut grid = Grid::open(3, 3);
        let pos = Position::new(1, 1);
        let actor = new_actor_id();

        assert!(grid.set_occupant(pos, Some(actor)));
        assert!(!grid.is_walkable(pos));
        assert_eq!(grid.occupant_at(pos), Some(actor));

        assert!(grid.set_occupant(pos, None));
        assert!(grid.is_walkable(pos));
    }

    #[test]
    fn test_walkability_is_idempotent() {
        let grid = Grid::open(3, 3);
        let pos = Position::new(2, 1);
        assert_eq!(grid.is_walkable(pos), grid.is_walkable(pos));
    }

    #[test]
    fn test_duplicate_occupancy_is_refused() {
        let mut grid = Grid::open(3, 3);
        let pos = Position::new(0, 0);
        let first = new_actor_id();
        let second = new_actor_id();

        assert!(grid.set_occupant(pos, Some(first)));
        assert!(!grid.set_occupant(pos, Some(second)));
        assert_eq!(grid.occupant_at(pos), Some(first));

        // Re-setting the same occupant is harmless
        assert!(grid.set_occupant(pos, Some(first)));
    }

    #[test]
    fn test_set_occupant_outside_layout_is_noop() {
        let mut grid = Grid::open(2, 2);
        assert!(!grid.set_occupant(Position::new(9, 9), Some(new_actor_id())));
        assert!(grid.get_tile(Position::new(9, 9)).is_none());
    }

    #[test]
    fn test_clear_actor() {
        let mut grid = Grid::open(3, 1);
        let actor = new_actor_id();
        grid.set_occupant(Position::new(2, 0), Some(actor));

        assert_eq!(grid.clear_actor(actor), 1);
        assert_eq!(grid.clear_actor(actor), 0);
        assert!(grid.is_walkable(Position::new(2, 0)));
    }

    #[test]
    fn test_bounds() {
        let grid = Grid::open(4, 2);
        assert!(grid.in_bounds(Position::new(3, 1)));
        assert!(!grid.in_bounds(Position::new(4, 1)));
        assert!(!grid.in_bounds(Position::new(0, 2)));
    }
}
