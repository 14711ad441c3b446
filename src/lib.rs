//! # Dungeon Tactics
//!
//! A turn-based tactical grid simulation over procedurally generated dungeons.
//!
//! ## Architecture Overview
//!
//! The core is split into a handful of tightly coupled pieces:
//!
//! - **Generation**: binary space partitioning dungeon generator producing a
//!   [`DungeonLayout`] of floor and wall coordinates
//! - **Grid**: tile existence, walkability and occupancy tracking
//! - **Pathfinding**: budget-bounded breadth-first search used for movement
//!   legality and range previews
//! - **Turns**: an ordered roster of actors with a cursor and safe removal
//! - **Game State**: the owned simulation context that resolves move and
//!   attack requests, spends action points and raises [`GameEvent`]s
//!
//! Rendering, input and asset loading live outside this crate. They drive the
//! core through [`GameState`] and consume the events it produces.

pub mod game;
pub mod generation;
pub mod utils;

pub use game::*;
pub use generation::*;
pub use utils::*;

pub use game::{
    // From actor
    Actor,
    ActorKind,
    ActorStats,
    Faction,
    // From events
    GameEvent,
    // From grid
    Grid,
    Tile,
    // From state
    AttackOutcome,
    GameCompletionState,
    GameState,
    MoveStepper,
    MoveSummary,
    StepOutcome,
    // From turns
    TurnScheduler,
};

pub use generation::{
    BspDungeonGenerator, DungeonLayout, GenerationConfig, Generator, Rect, SpawnPlanner,
    WallKind, WallPiece,
};

/// Reasons a move or attack request is rejected.
///
/// A rejected request never mutates state; callers treat it as "the action
/// had no effect".
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum IllegalAction {
    /// The match already has a winner
    #[error("the game is over")]
    GameOver,

    /// No live actor with that id exists
    #[error("unknown actor")]
    UnknownActor,

    /// The actor does not hold the active turn
    #[error("it is not this actor's turn")]
    NotActorsTurn,

    /// The actor has no action points left
    #[error("no action points left")]
    NoActionPoints,

    /// The destination or target is the actor's own tile
    #[error("target is the actor's own tile")]
    SameTile,

    /// The destination is not a free floor tile
    #[error("destination is not walkable")]
    DestinationBlocked,

    /// No path exists within the remaining action points
    #[error("destination is out of reach")]
    OutOfReach,

    /// Attack target is not on the same row or column
    #[error("target is not on the same row or column")]
    NotAligned,

    /// Attack target is further than the attack range
    #[error("target is out of attack range")]
    OutOfRange,

    /// No live actor other than the attacker stands on the target tile
    #[error("no valid target on that tile")]
    NoTarget,
}

/// Core error type for the simulation.
#[derive(thiserror::Error, Debug)]
pub enum TacticsError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Configuration values cannot produce a dungeon
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Generation failed
    #[error("Generation failed: {0}")]
    GenerationFailed(String),

    /// Request rejected by the action resolver
    #[error("Illegal action: {0}")]
    IllegalAction(#[from] IllegalAction),

    /// Internal bookkeeping disagrees with itself
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),
}

/// Result type used throughout the crate.
pub type TacticsResult<T> = Result<T, TacticsError>;

/// Version information for the crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Simulation configuration constants.
pub mod config {
    /// Default dungeon width in tiles
    pub const DEFAULT_DUNGEON_WIDTH: u32 = 16;

    /// Default dungeon height in tiles
    pub const DEFAULT_DUNGEON_HEIGHT: u32 = 16;

    /// Default minimum room side length
    pub const DEFAULT_MIN_ROOM_SIZE: u32 = 3;

    /// Default maximum room side length
    pub const DEFAULT_MAX_ROOM_SIZE: u32 = 6;

    /// Number of enemies spawned alongside the player
    pub const DEFAULT_ENEMY_COUNT: usize = 3;

    /// Default maximum hit points for any actor
    pub const DEFAULT_MAX_HP: i32 = 10;

    /// Default action points per turn
    pub const DEFAULT_MAX_AP: u32 = 3;

    /// Default damage dealt by one attack
    pub const DEFAULT_ATTACK_DAMAGE: i32 = 2;

    /// Default attack range in tiles
    pub const DEFAULT_ATTACK_RANGE: u32 = 1;

    /// Default presentation move speed (tiles per second)
    pub const DEFAULT_MOVE_SPEED: f32 = 5.0;

    /// Aspect ratio above which the longer side of a partition is always split
    pub const SPLIT_ASPECT_RATIO: f64 = 1.25;
}
