//! # Autonomous Decision Routine
//!
//! Greedy chase-and-strike behaviour for actors without a human behind them.
//!
//! Each iteration re-targets the nearest opposing actor, strikes if it is
//! orthogonally adjacent, and otherwise takes a single step along the axis with
//! the larger gap. A blocked step ends the turn; there is no detour search.

use crate::game::{ActorId, GameState, Position};
use crate::utils::step_toward;
use log::debug;

/// Plays out the whole turn of `actor`. Does not advance the scheduler.
pub fn take_turn(state: &mut GameState, actor: ActorId) {
    loop {
        let Some(me) = state.actor(actor) else {
            return;
        };
        if me.stats.ap == 0 || !state.is_playing() {
            return;
        }
        let origin = me.position;

        let Some((target, target_pos)) = nearest_opponent(state, actor) else {
            debug!("{} has no opponents left", actor);
            return;
        };

        if origin.manhattan_distance(target_pos) == 1 {
            state.apply_attack(actor, target);
            return;
        }

        let Some(direction) = step_toward(origin, target_pos) else {
            return;
        };
        let next = origin.step(direction);
        if !state.is_walkable(next) {
            debug!("{} is blocked at {} heading {:?}", actor, origin, direction);
            return;
        }
        state.apply_step(actor, next);
    }
}

/// Finds the closest live actor of an opposing faction by Euclidean distance.
///
/// Ties keep whichever opponent comes first in turn order.
pub fn nearest_opponent(state: &GameState, actor: ActorId) -> Option<(ActorId, Position)> {
    let me = state.actor(actor)?;
    let mut best: Option<(ActorId, Position, f64)> = None;

    for &other_id in state.scheduler().roster() {
        let Some(other) = state.actor(other_id) else {
            continue;
        };
        if other_id == actor || !other.is_alive() || !me.faction.opposes(other.faction) {
            continue;
        }
        let distance = me.position.euclidean_distance(other.position);
        if best.map_or(true, |(_, _, closest)| distance < closest) {
            best = Some((other_id, other.position, distance));
        }
    }

    best.map(|(id, pos, _)| (id, pos))
}
