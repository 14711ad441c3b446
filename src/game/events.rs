//! # Game Events
//!
//! Notifications raised by the core for the presentation layer.

use crate::game::{ActorId, Faction, Position};
use serde::{Deserialize, Serialize};

/// Something observable happened in the simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// An actor was placed on the grid
    ActorSpawned {
        actor: ActorId,
        position: Position,
    },
    /// A new turn started
    TurnChanged {
        actor: ActorId,
        turn_number: u64,
    },
    /// A player-controlled actor is waiting for a move, attack or end-turn
    AwaitingInput {
        actor: ActorId,
        position: Position,
        action_points: u32,
        attack_range: u32,
    },
    /// An actor moved exactly one tile
    ActorMoved {
        actor: ActorId,
        from: Position,
        to: Position,
        remaining_ap: u32,
    },
    /// An actor lost hit points
    ActorDamaged {
        actor: ActorId,
        damage: i32,
        remaining_hp: i32,
        source: Option<ActorId>,
    },
    /// An actor was removed from the grid and the turn order
    ActorDied {
        actor: ActorId,
        position: Position,
        killer: Option<ActorId>,
    },
    /// A faction has no live members left
    GameOver {
        winner: Option<Faction>,
    },
}
