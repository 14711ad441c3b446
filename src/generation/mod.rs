//! # Generation Module
//!
//! Procedural dungeon generation and spawn placement.
//!
//! A dungeon is produced in three passes: binary space partitioning splits the
//! map into leaves and carves one room per leaf, consecutive rooms are joined
//! by L-shaped corridors, and walls are derived around the resulting floor.

pub mod bsp;
pub mod dungeon;
pub mod encounters;
pub mod walls;

pub use dungeon::*;
pub use encounters::*;
pub use walls::*;

use crate::config;
use crate::game::{ActorTemplate, Position};
use crate::{TacticsError, TacticsResult};
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for dungeon generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Random seed for reproducible generation
    pub seed: u64,
    /// Dungeon width in cells
    pub width: u32,
    /// Dungeon height in cells
    pub height: u32,
    /// Smallest partition and room side
    pub min_room_size: u32,
    /// Partitions with a side at least this long keep splitting
    pub max_room_size: u32,
}

impl GenerationConfig {
    /// Creates the default configuration with the given seed.
    ///
    /// # Examples
    ///
    /// ```
    /// use dungeon_tactics::GenerationConfig;
    ///
    /// let config = GenerationConfig::new(7);
    /// assert_eq!(config.seed, 7);
    /// assert!(config.max_room_size >= config.min_room_size);
    /// assert!(config.validate().is_ok());
    /// ```
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            width: config::DEFAULT_DUNGEON_WIDTH,
            height: config::DEFAULT_DUNGEON_HEIGHT,
            min_room_size: config::DEFAULT_MIN_ROOM_SIZE,
            max_room_size: config::DEFAULT_MAX_ROOM_SIZE,
        }
    }

    /// Creates a configuration for testing with a slightly larger map, so
    /// several rooms and corridors are always produced.
    pub fn for_testing(seed: u64) -> Self {
        Self {
            seed,
            width: 24,
            height: 20,
            min_room_size: 3,
            max_room_size: 6,
        }
    }

    /// Rejects configurations the partitioner cannot work with.
    pub fn validate(&self) -> TacticsResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(TacticsError::InvalidConfiguration(format!(
                "dungeon dimensions must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        if self.min_room_size == 0 {
            return Err(TacticsError::InvalidConfiguration(
                "min_room_size must be at least 1".to_string(),
            ));
        }
        if self.min_room_size > self.max_room_size {
            return Err(TacticsError::InvalidConfiguration(format!(
                "min_room_size {} exceeds max_room_size {}",
                self.min_room_size, self.max_room_size
            )));
        }
        Ok(())
    }

    /// Checks whether the map is too small to partition at all.
    pub fn needs_single_room_fallback(&self) -> bool {
        self.width < self.min_room_size + 2 || self.height < self.min_room_size + 2
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self::new(42)
    }
}

/// Axis-aligned rectangle of cells, used for partitions and rooms.
///
/// Covers `x..x + width` by `y..y + height`. Only lives during generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    /// Creates a new rectangle.
    ///
    /// # Examples
    ///
    /// ```
    /// use dungeon_tactics::{Position, Rect};
    ///
    /// let room = Rect::new(5, 5, 4, 3);
    /// assert_eq!(room.area(), 12);
    /// assert_eq!(room.center(), Position::new(7, 6));
    /// assert!(room.contains(Position::new(8, 7)));
    /// assert!(!room.contains(Position::new(9, 7)));
    /// ```
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// One past the last column.
    pub fn x_end(&self) -> i32 {
        self.x + self.width as i32
    }

    /// One past the last row.
    pub fn y_end(&self) -> i32 {
        self.y + self.height as i32
    }

    /// Center cell, rounding toward the origin corner.
    pub fn center(&self) -> Position {
        Position::new(
            self.x + self.width as i32 / 2,
            self.y + self.height as i32 / 2,
        )
    }

    pub fn area(&self) -> u32 {
        self.width * self.height
    }

    /// Checks if a position is inside this rectangle.
    pub fn contains(&self, pos: Position) -> bool {
        pos.x >= self.x && pos.y >= self.y && pos.x < self.x_end() && pos.y < self.y_end()
    }

    /// Every cell of the rectangle, row by row.
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (self.y..self.y_end()).flat_map(move |y| (self.x..self.x_end()).map(move |x| Position::new(x, y)))
    }
}

/// Trait for procedural generators.
pub trait Generator<T> {
    /// Generates content using the provided configuration and random number generator.
    fn generate(&self, config: &GenerationConfig, rng: &mut StdRng) -> TacticsResult<T>;

    /// Validates that the generated content meets requirements.
    fn validate(&self, content: &T, config: &GenerationConfig) -> TacticsResult<()>;

    /// Gets the generator type name for logging and debugging.
    fn generator_type(&self) -> &'static str;
}

/// Everything needed to set up a match: the dungeon and who starts in it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub generation: GenerationConfig,
    pub player: ActorTemplate,
    pub enemy: ActorTemplate,
    /// Number of monsters spawned alongside the hero
    pub enemy_count: usize,
    /// Let the built-in routine play the hero too
    pub autonomous_player: bool,
}

impl SimulationConfig {
    /// Loads a configuration from a JSON file. Missing fields take defaults.
    pub fn load_from_file(path: impl AsRef<Path>) -> TacticsResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: SimulationConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the dungeon parameters and both actor templates.
    pub fn validate(&self) -> TacticsResult<()> {
        self.generation.validate()?;
        self.player.validate()?;
        self.enemy.validate()
    }

    /// Serializes this configuration as pretty-printed JSON.
    pub fn save_to_json(&self) -> TacticsResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            generation: GenerationConfig::default(),
            player: ActorTemplate::player(),
            enemy: ActorTemplate::enemy(),
            enemy_count: config::DEFAULT_ENEMY_COUNT,
            autonomous_player: false,
        }
    }
}
