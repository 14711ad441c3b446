//! # Turn Scheduler
//!
//! An ordered roster of live actors and a cursor naming whose turn it is.
//!
//! The scheduler knows nothing about grids or actor kinds. It only answers
//! "who is next"; the game state runs the turn-start behaviour for whichever
//! actor the scheduler hands back.

use crate::game::ActorId;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// Cyclic turn order with safe removal.
///
/// Whenever the roster is non-empty the cursor is a valid index into it.
///
/// # Examples
///
/// ```
/// use dungeon_tactics::{TurnScheduler, new_actor_id};
///
/// let (a, b) = (new_actor_id(), new_actor_id());
/// let mut turns = TurnScheduler::new();
/// turns.initialize(vec![a, b]);
/// assert_eq!(turns.start_first_turn(), Some(a));
/// assert_eq!(turns.advance(), Some(b));
/// assert_eq!(turns.advance(), Some(a));
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TurnScheduler {
    roster: Vec<ActorId>,
    cursor: usize,
}

impl TurnScheduler {
    /// Creates an empty scheduler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the roster and resets the cursor to the first actor.
    ///
    /// Duplicate ids keep their first position.
    pub fn initialize(&mut self, actors: impl IntoIterator<Item = ActorId>) {
        self.roster.clear();
        for actor in actors {
            if self.roster.contains(&actor) {
                warn!("actor {} listed twice in turn order, keeping first", actor);
                continue;
            }
            self.roster.push(actor);
        }
        self.cursor = 0;
    }

    /// Returns the first actor to act, if any.
    pub fn start_first_turn(&mut self) -> Option<ActorId> {
        self.cursor = 0;
        self.roster.first().copied()
    }

    /// Moves the cursor to the next actor and returns it.
    ///
    /// An empty roster is logged and left alone.
    pub fn advance(&mut self) -> Option<ActorId> {
        if self.roster.is_empty() {
            warn!("advance called with an empty turn order");
            return None;
        }
        self.cursor = (self.cursor + 1) % self.roster.len();
        let next = self.roster[self.cursor];
        debug!("turn passes to {} (slot {})", next, self.cursor);
        Some(next)
    }

    /// Appends `actor` to the end of the turn order. Returns false if it was
    /// already there.
    pub fn join(&mut self, actor: ActorId) -> bool {
        if self.roster.contains(&actor) {
            return false;
        }
        self.roster.push(actor);
        true
    }

    /// Removes `actor` from the roster. Returns false if it was not present.
    ///
    /// Removing an actor that sits before the cursor keeps the same actor
    /// active. Removing the active actor hands the slot to its successor
    /// without running that successor's turn-start behaviour.
    pub fn remove(&mut self, actor: ActorId) -> bool {
        let Some(index) = self.roster.iter().position(|&id| id == actor) else {
            return false;
        };
        self.roster.remove(index);

        if self.roster.is_empty() {
            self.cursor = 0;
        } else if index < self.cursor {
            self.cursor -= 1;
        } else if self.cursor >= self.roster.len() {
            self.cursor = 0;
        }
        true
    }

    /// Returns up to `count` actors in turn order, starting with the active one.
    pub fn peek_upcoming(&self, count: usize) -> Vec<ActorId> {
        let len = self.roster.len();
        (0..count.min(len))
            .map(|offset| self.roster[(self.cursor + offset) % len])
            .collect()
    }

    /// The actor holding the active turn.
    pub fn current(&self) -> Option<ActorId> {
        self.roster.get(self.cursor).copied()
    }

    /// Index of the active actor in the roster.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Checks whether `actor` is in the roster.
    pub fn contains(&self, actor: ActorId) -> bool {
        self.roster.contains(&actor)
    }

    /// The full roster in turn order.
    pub fn roster(&self) -> &[ActorId] {
        &self.roster
    }

    pub fn len(&self) -> usize {
        self.roster.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roster.is_empty()
    }
}
