//! # Game Module
//!
//! Grid model, actors, turn scheduling and action resolution.
//!
//! This module contains the runtime half of the simulation:
//! - Grid coordinates, directions and actor identifiers
//! - The grid model tracking walkability and occupancy
//! - Actors and their turn-start behaviour
//! - The turn scheduler
//! - The game state that resolves move and attack requests

pub mod actor;
pub mod ai;
pub mod events;
pub mod grid;
pub mod state;
pub mod turns;

pub use actor::*;
pub use events::*;
pub use grid::*;
pub use state::*;
pub use turns::*;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Represents a 2D coordinate on the dungeon grid.
///
/// The y axis points up: [`Direction::Up`] increases `y`.
///
/// # Examples
///
/// ```
/// use dungeon_tactics::Position;
///
/// let pos = Position::new(10, 5);
/// assert_eq!(pos.x, 10);
/// assert_eq!(pos.y, 5);
///
/// let neighbours = pos.cardinal_neighbours();
/// assert_eq!(neighbours[0], Position::new(10, 6)); // up comes first
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    /// Creates a new position with the given coordinates.
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Calculates the Manhattan distance to another position.
    ///
    /// # Examples
    ///
    /// ```
    /// use dungeon_tactics::Position;
    ///
    /// let pos1 = Position::new(0, 0);
    /// let pos2 = Position::new(3, 4);
    /// assert_eq!(pos1.manhattan_distance(pos2), 7);
    /// ```
    pub fn manhattan_distance(self, other: Position) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// Calculates the Euclidean distance to another position.
    pub fn euclidean_distance(self, other: Position) -> f64 {
        let dx = (self.x - other.x) as f64;
        let dy = (self.y - other.y) as f64;
        (dx * dx + dy * dy).sqrt()
    }

    /// Returns the position one step away in `direction`.
    pub fn step(self, direction: Direction) -> Position {
        self + direction.to_delta()
    }

    /// Returns the 4 cardinal neighbours in search order: up, down, left, right.
    pub fn cardinal_neighbours(self) -> [Position; 4] {
        Direction::CARDINAL.map(|direction| self.step(direction))
    }

    /// Returns the 4 diagonal neighbours: up-right, up-left, down-right, down-left.
    pub fn diagonal_neighbours(self) -> [Position; 4] {
        [
            Position::new(self.x + 1, self.y + 1),
            Position::new(self.x - 1, self.y + 1),
            Position::new(self.x + 1, self.y - 1),
            Position::new(self.x - 1, self.y - 1),
        ]
    }

    /// Returns all 8 surrounding positions, cardinals first.
    pub fn surrounding(self) -> [Position; 8] {
        let [up, down, left, right] = self.cardinal_neighbours();
        let [up_right, up_left, down_right, down_left] = self.diagonal_neighbours();
        [
            up, down, left, right, up_right, up_left, down_right, down_left,
        ]
    }
}

impl std::ops::Add for Position {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self::new(self.x + other.x, self.y + other.y)
    }
}

impl std::ops::Sub for Position {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self::new(self.x - other.x, self.y - other.y)
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Cardinal directions for movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// All cardinal directions in the fixed neighbour iteration order.
    ///
    /// Path search results depend on this order when several shortest paths
    /// exist.
    pub const CARDINAL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Converts a direction to a position delta.
    ///
    /// # Examples
    ///
    /// ```
    /// use dungeon_tactics::{Direction, Position};
    ///
    /// let delta = Direction::Up.to_delta();
    /// assert_eq!(delta, Position::new(0, 1));
    /// ```
    pub fn to_delta(self) -> Position {
        match self {
            Direction::Up => Position::new(0, 1),
            Direction::Down => Position::new(0, -1),
            Direction::Left => Position::new(-1, 0),
            Direction::Right => Position::new(1, 0),
        }
    }
}

/// Unique identifier for actors.
pub type ActorId = Uuid;

/// Creates a new unique actor ID.
pub fn new_actor_id() -> ActorId {
    Uuid::new_v4()
}
