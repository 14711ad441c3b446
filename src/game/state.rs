//! # Game State Module
//!
//! The owned simulation context: dungeon, grid, actors, turn order and the
//! action resolver that ties them together.
//!
//! Every move and attack request goes through [`GameState`]. Requests are
//! validated first and rejected with an [`IllegalAction`] without touching any
//! state; accepted requests mutate occupancy, action points and hit points and
//! record [`GameEvent`]s for the presentation layer to drain.

use crate::game::actor::TurnStart;
use crate::game::{
    Actor, ActorId, ActorKind, Faction, GameEvent, Grid, Position, Tile, TurnScheduler,
};
use crate::generation::{
    BspDungeonGenerator, DungeonLayout, Generator, SimulationConfig, SpawnPlanner,
};
use crate::utils::{self, PathStep};
use crate::{IllegalAction, TacticsError, TacticsResult};
use log::{debug, error, info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};

/// Central simulation context.
///
/// There is exactly one writer at a time: whoever holds `&mut GameState`.
/// Each public mutation is applied completely before it returns.
#[derive(Debug, Clone)]
pub struct GameState {
    layout: DungeonLayout,
    grid: Grid,
    actors: HashMap<ActorId, Actor>,
    /// Live actors in the order they were spawned
    spawn_order: Vec<ActorId>,
    scheduler: TurnScheduler,
    events: Vec<GameEvent>,
    /// Number of turns started so far
    pub turn_number: u64,
    /// Running totals derived from events
    pub statistics: GameStatistics,
    /// Current game completion state
    pub completion_state: GameCompletionState,
    rng_seed: u64,
    rng: StdRng,
}

/// Running totals for a match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameStatistics {
    /// Tiles walked by all actors
    pub steps_taken: u64,
    /// Total damage applied
    pub damage_dealt: u64,
    /// Actors killed
    pub actors_defeated: u32,
    /// Turns started
    pub turns_started: u64,
}

impl GameStatistics {
    /// Creates new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Updates statistics based on a game event.
    pub fn update_from_event(&mut self, event: &GameEvent) {
        match event {
            GameEvent::ActorMoved { .. } => {
                self.steps_taken += 1;
            }
            GameEvent::ActorDamaged { damage, .. } => {
                self.damage_dealt += (*damage).max(0) as u64;
            }
            GameEvent::ActorDied { .. } => {
                self.actors_defeated += 1;
            }
            GameEvent::TurnChanged { .. } => {
                self.turns_started += 1;
            }
            _ => {}
        }
    }
}

/// Whether the match is still running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameCompletionState {
    /// Turns are still being played
    Playing,
    /// A faction was wiped out
    Finished { winner: Option<Faction> },
}

/// Result of an accepted attack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttackOutcome {
    pub attacker: ActorId,
    pub defender: ActorId,
    pub damage: i32,
    pub remaining_hp: i32,
    /// The defender died and was removed
    pub killed: bool,
    /// The attacker ran out of action points and the turn moved on
    pub turn_ended: bool,
}

/// Result of a completed [`GameState::request_move`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveSummary {
    pub actor: ActorId,
    /// Tiles entered, in order
    pub path: Vec<Position>,
    pub remaining_ap: u32,
    /// The actor ran out of action points and the turn moved on
    pub turn_ended: bool,
}

/// What a single [`MoveStepper::next_step`] call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// The actor entered `to` and still has action points
    Moved {
        from: Position,
        to: Position,
        remaining_ap: u32,
    },
    /// The actor entered `to` with its last action point; the turn advanced
    TurnEnded { from: Position, to: Position },
    /// Nothing left to do: the path is walked or the move was cancelled
    Done,
    /// The move could not continue and was abandoned on the current tile
    Halted,
}

/// Tile-by-tile walker for an accepted move.
///
/// Each [`next_step`](MoveStepper::next_step) applies one whole step (clear
/// old tile, occupy new tile, spend one action point) so a presentation layer
/// can animate between calls without ever seeing a half-applied step.
#[derive(Debug, Clone)]
pub struct MoveStepper {
    actor: ActorId,
    destination: Position,
    path: VecDeque<Position>,
    /// Turn the path was validated in
    turn_number: u64,
    cancelled: bool,
}

impl MoveStepper {
    fn new(actor: ActorId, destination: Position, path: Vec<Position>, turn_number: u64) -> Self {
        Self {
            actor,
            destination,
            path: path.into(),
            turn_number,
            cancelled: false,
        }
    }

    pub fn actor(&self) -> ActorId {
        self.actor
    }

    pub fn destination(&self) -> Position {
        self.destination
    }

    /// Steps still to be taken.
    pub fn remaining_steps(&self) -> usize {
        if self.cancelled {
            0
        } else {
            self.path.len()
        }
    }

    /// Stops the move before the next step; the actor keeps its current tile.
    pub fn cancel(&mut self) {
        self.cancelled = true;
    }

    /// Checks whether further calls to `next_step` can do anything.
    pub fn is_finished(&self) -> bool {
        self.remaining_steps() == 0
    }

    /// Applies the next step of the move.
    pub fn next_step(&mut self, state: &mut GameState) -> StepOutcome {
        if self.cancelled {
            return StepOutcome::Done;
        }
        let Some(&next) = self.path.front() else {
            return StepOutcome::Done;
        };

        let Some(from) = state.actor(self.actor).map(|actor| actor.position) else {
            warn!("moving actor {} vanished mid-move", self.actor);
            self.path.clear();
            return StepOutcome::Halted;
        };
        if state.turn_number != self.turn_number
            || state.ensure_can_act(self.actor).is_err()
            || state.actor(self.actor).map_or(true, |actor| actor.stats.ap == 0)
        {
            debug!(
                "move of {} toward {} halted: turn no longer usable",
                self.actor, self.destination
            );
            self.path.clear();
            return StepOutcome::Halted;
        }
        if from.manhattan_distance(next) != 1 || !state.is_walkable(next) {
            warn!(
                "move of {} toward {} halted at {}: {} is not enterable",
                self.actor, self.destination, from, next
            );
            self.path.clear();
            return StepOutcome::Halted;
        }

        self.path.pop_front();
        let remaining_ap = state.apply_step(self.actor, next);
        if remaining_ap == 0 {
            self.path.clear();
            state.advance_turn();
            return StepOutcome::TurnEnded { from, to: next };
        }

        StepOutcome::Moved {
            from,
            to: next,
            remaining_ap,
        }
    }
}

impl GameState {
    /// Creates a game state over an existing layout with no actors.
    ///
    /// # Examples
    ///
    /// ```
    /// use dungeon_tactics::{DungeonLayout, GameState, Position};
    ///
    /// let state = GameState::new(DungeonLayout::open(5, 5), 12345);
    /// assert_eq!(state.turn_number, 0);
    /// assert!(state.is_walkable(Position::new(2, 2)));
    /// ```
    pub fn new(layout: DungeonLayout, seed: u64) -> Self {
        let grid = Grid::from_layout(&layout);
        Self {
            layout,
            grid,
            actors: HashMap::new(),
            spawn_order: Vec::new(),
            scheduler: TurnScheduler::new(),
            events: Vec::new(),
            turn_number: 0,
            statistics: GameStatistics::new(),
            completion_state: GameCompletionState::Playing,
            rng_seed: seed,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Generates a dungeon and spawns the party described by `config`.
    ///
    /// Turns are not started; call [`GameState::start`].
    pub fn from_config(config: &SimulationConfig) -> TacticsResult<Self> {
        config.validate()?;
        let seed = config.generation.seed;
        let mut rng = StdRng::seed_from_u64(seed);
        let layout = BspDungeonGenerator::new().generate(&config.generation, &mut rng)?;

        let mut state = Self::new(layout, seed);
        state.rng = rng;
        state.spawn_party(config)?;
        Ok(state)
    }

    /// Places `actor` on its tile. Joins the turn order immediately if turns
    /// have already started.
    pub fn spawn_actor(&mut self, actor: Actor) -> TacticsResult<ActorId> {
        if !actor.is_alive() {
            return Err(TacticsError::InvalidConfiguration(format!(
                "cannot spawn {} with {} hp",
                actor.name, actor.stats.hp
            )));
        }
        if !self.grid.is_walkable(actor.position) {
            return Err(IllegalAction::DestinationBlocked.into());
        }

        let id = actor.id;
        let position = actor.position;
        self.grid.set_occupant(position, Some(id));
        debug!("spawned {} ({}) at {}", actor.name, id, position);
        self.actors.insert(id, actor);
        self.spawn_order.push(id);
        if !self.scheduler.is_empty() {
            self.scheduler.join(id);
        }
        self.emit(GameEvent::ActorSpawned {
            actor: id,
            position,
        });
        Ok(id)
    }

    /// Spawns one hero and `config.enemy_count` monsters on random floor tiles.
    pub fn spawn_party(&mut self, config: &SimulationConfig) -> TacticsResult<Vec<ActorId>> {
        let mut planner = SpawnPlanner::new(
            self.layout
                .floor
                .iter()
                .copied()
                .filter(|&pos| self.grid.is_walkable(pos)),
        );
        let mut spawned = Vec::with_capacity(config.enemy_count + 1);

        let player_kind = if config.autonomous_player {
            ActorKind::Autonomous
        } else {
            ActorKind::Player
        };
        let position = planner.take_random(&mut self.rng)?;
        let player = Actor::from_template(&config.player, player_kind, Faction::Heroes, position);
        spawned.push(self.spawn_actor(player)?);

        for index in 0..config.enemy_count {
            let position = planner.take_random(&mut self.rng)?;
            let mut enemy = Actor::from_template(
                &config.enemy,
                ActorKind::Autonomous,
                Faction::Monsters,
                position,
            );
            enemy.name = format!("{} {}", config.enemy.name, index + 1);
            spawned.push(self.spawn_actor(enemy)?);
        }

        info!(
            "spawned {} actors on a {}x{} dungeon",
            spawned.len(),
            self.layout.width,
            self.layout.height
        );
        Ok(spawned)
    }

    /// Builds the turn order from live actors in spawn order.
    pub fn initialize_turn_order(&mut self) {
        let roster: Vec<ActorId> = self
            .spawn_order
            .iter()
            .copied()
            .filter(|id| self.actors.get(id).map_or(false, Actor::is_alive))
            .collect();
        self.scheduler.initialize(roster);
    }

    /// Initializes the turn order and starts the first turn.
    ///
    /// Autonomous actors at the front of the roster play immediately; this
    /// returns once a player-controlled actor is waiting for input or the
    /// game is over.
    pub fn start(&mut self) {
        self.initialize_turn_order();
        match self.scheduler.start_first_turn() {
            Some(first) => self.run_turns_from(first),
            None => warn!("start called with no actors"),
        }
    }

    /// Ends the active turn and runs turns until input is needed.
    pub fn advance_turn(&mut self) {
        if !self.is_playing() {
            return;
        }
        if let Some(next) = self.scheduler.advance() {
            self.run_turns_from(next);
        }
    }

    /// Explicitly ends `actor`'s turn.
    pub fn end_turn(&mut self, actor: ActorId) -> TacticsResult<()> {
        self.ensure_can_act(actor)?;
        debug!("{} ends its turn", actor);
        self.advance_turn();
        Ok(())
    }

    /// Validates a move and returns a stepper that walks it.
    ///
    /// Nothing is mutated until the first [`MoveStepper::next_step`].
    pub fn begin_move(&self, actor: ActorId, destination: Position) -> TacticsResult<MoveStepper> {
        let mover = self.ensure_can_act(actor)?;
        let ap = mover.stats.ap;
        if ap == 0 {
            return Err(IllegalAction::NoActionPoints.into());
        }
        if destination == mover.position {
            return Err(IllegalAction::SameTile.into());
        }
        if !self.grid.is_walkable(destination) {
            return Err(IllegalAction::DestinationBlocked.into());
        }

        let path = utils::find_path(&self.grid, mover.position, destination, ap)
            .filter(|path| path.len() <= ap as usize)
            .ok_or(IllegalAction::OutOfReach)?;

        Ok(MoveStepper::new(actor, destination, path, self.turn_number))
    }

    /// Moves `actor` toward `destination`, one action point per tile.
    ///
    /// If the last action point is spent the turn advances immediately.
    pub fn request_move(
        &mut self,
        actor: ActorId,
        destination: Position,
    ) -> TacticsResult<MoveSummary> {
        let mut stepper = self.begin_move(actor, destination)?;
        let mut path = Vec::new();
        let mut turn_ended = false;

        loop {
            match stepper.next_step(self) {
                StepOutcome::Moved { to, .. } => path.push(to),
                StepOutcome::TurnEnded { to, .. } => {
                    path.push(to);
                    turn_ended = true;
                    break;
                }
                StepOutcome::Done | StepOutcome::Halted => break,
            }
        }

        let remaining_ap = self.actor(actor).map_or(0, |a| a.stats.ap);
        Ok(MoveSummary {
            actor,
            path,
            remaining_ap,
            turn_ended,
        })
    }

    /// Attacks whatever stands on `target`.
    ///
    /// Legal only along the attacker's row or column, within its attack range,
    /// against a live actor other than the attacker. Costs one action point.
    pub fn request_attack(
        &mut self,
        actor: ActorId,
        target: Position,
    ) -> TacticsResult<AttackOutcome> {
        let attacker = self.ensure_can_act(actor)?;
        if attacker.stats.ap == 0 {
            return Err(IllegalAction::NoActionPoints.into());
        }
        attacker.check_attack_reach(target)?;
        let defender = self
            .grid
            .occupant_at(target)
            .filter(|&id| id != actor && self.actors.get(&id).map_or(false, Actor::is_alive))
            .ok_or(IllegalAction::NoTarget)?;

        let mut outcome = self.apply_attack(actor, defender).ok_or_else(|| {
            TacticsError::InvariantViolation(format!("attack by {} lost its actors", actor))
        })?;

        if self.is_playing() && self.actor(actor).map_or(false, |a| a.stats.ap == 0) {
            self.advance_turn();
            outcome.turn_ended = true;
        }
        Ok(outcome)
    }

    /// Returns true iff `pos` is a free floor tile.
    pub fn is_walkable(&self, pos: Position) -> bool {
        self.grid.is_walkable(pos)
    }

    /// Gets the tile at `pos`.
    pub fn get_tile(&self, pos: Position) -> Option<&Tile> {
        self.grid.get_tile(pos)
    }

    /// Budget-bounded shortest path; see [`utils::find_path`].
    pub fn find_path(&self, start: Position, goal: Position, budget: u32) -> Option<Vec<Position>> {
        utils::find_path(&self.grid, start, goal, budget)
    }

    /// Tiles `actor` could move to with its remaining action points.
    pub fn move_range(&self, actor: ActorId) -> Vec<Position> {
        self.actor(actor)
            .map(|a| utils::reachable_tiles(&self.grid, a.position, a.stats.ap))
            .unwrap_or_default()
    }

    /// Tiles `actor` could attack from where it stands.
    pub fn attack_range(&self, actor: ActorId) -> Vec<Position> {
        self.actor(actor)
            .map(|a| utils::attack_tiles(a.position, a.stats.attack_range, |pos| self.grid.in_bounds(pos)))
            .unwrap_or_default()
    }

    /// Path toward `destination` annotated with cumulative action point cost.
    ///
    /// The destination may be occupied, which lets the caller preview a walk
    /// up to an enemy.
    pub fn preview_path(&self, actor: ActorId, destination: Position) -> Option<Vec<PathStep>> {
        let a = self.actor(actor)?;
        utils::find_path(&self.grid, a.position, destination, a.stats.ap)
            .map(|path| utils::annotate_path(&path))
    }

    /// The actor holding the active turn.
    pub fn current_actor(&self) -> Option<&Actor> {
        self.scheduler.current().and_then(|id| self.actors.get(&id))
    }

    /// The next `count` actors in turn order, starting with the active one.
    pub fn peek_upcoming(&self, count: usize) -> Vec<&Actor> {
        self.scheduler
            .peek_upcoming(count)
            .into_iter()
            .filter_map(|id| self.actors.get(&id))
            .collect()
    }

    /// Looks up a live actor.
    pub fn actor(&self, id: ActorId) -> Option<&Actor> {
        self.actors.get(&id)
    }

    /// Mutable access to a live actor's stats.
    ///
    /// Do not change `position` through this; occupancy is tracked separately.
    pub fn actor_mut(&mut self, id: ActorId) -> Option<&mut Actor> {
        self.actors.get_mut(&id)
    }

    /// Live actors in spawn order.
    pub fn actors(&self) -> impl Iterator<Item = &Actor> {
        self.spawn_order.iter().filter_map(|id| self.actors.get(id))
    }

    /// Live actors belonging to `faction`.
    pub fn living_actors_in(&self, faction: Faction) -> Vec<&Actor> {
        self.actors()
            .filter(|actor| actor.faction == faction && actor.is_alive())
            .collect()
    }

    pub fn layout(&self) -> &DungeonLayout {
        &self.layout
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn scheduler(&self) -> &TurnScheduler {
        &self.scheduler
    }

    pub fn seed(&self) -> u64 {
        self.rng_seed
    }

    /// Events raised since the last drain.
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Takes every pending event.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Checks whether turns are still being played.
    pub fn is_playing(&self) -> bool {
        self.completion_state == GameCompletionState::Playing
    }

    /// Surfaces the action prompt for a player-controlled actor.
    pub(crate) fn prompt_for_input(&mut self, actor: ActorId) {
        let Some(a) = self.actors.get(&actor) else {
            return;
        };
        let event = GameEvent::AwaitingInput {
            actor,
            position: a.position,
            action_points: a.stats.ap,
            attack_range: a.stats.attack_range,
        };
        self.emit(event);
    }

    /// Moves `actor` one tile to `to` and spends one action point.
    ///
    /// Returns the remaining action points. Does not advance the turn. The
    /// caller has already checked that `to` is a free neighbouring floor tile.
    pub(crate) fn apply_step(&mut self, actor: ActorId, to: Position) -> u32 {
        let Some(mover) = self.actors.get_mut(&actor) else {
            error!("apply_step for unknown actor {}", actor);
            return 0;
        };
        let from = mover.position;

        self.grid.set_occupant(from, None);
        if !self.grid.set_occupant(to, Some(actor)) {
            self.grid.set_occupant(from, Some(actor));
            return mover.stats.ap;
        }
        mover.position = to;
        mover.spend_action_point();
        let remaining_ap = mover.stats.ap;

        debug!("{} stepped {} -> {} ({} AP left)", actor, from, to, remaining_ap);
        self.emit(GameEvent::ActorMoved {
            actor,
            from,
            to,
            remaining_ap,
        });
        remaining_ap
    }

    /// Spends one of the attacker's action points and damages the defender.
    ///
    /// Kills the defender at zero hit points. Does not advance the turn.
    pub(crate) fn apply_attack(
        &mut self,
        attacker: ActorId,
        defender: ActorId,
    ) -> Option<AttackOutcome> {
        if !self.actors.contains_key(&defender) {
            return None;
        }
        let damage = {
            let striker = self.actors.get_mut(&attacker)?;
            striker.spend_action_point();
            striker.stats.attack_damage
        };
        let remaining_hp = self.actors.get_mut(&defender)?.take_damage(damage);

        info!("{} hits {} for {} ({} hp left)", attacker, defender, damage, remaining_hp);
        self.emit(GameEvent::ActorDamaged {
            actor: defender,
            damage,
            remaining_hp,
            source: Some(attacker),
        });

        let killed = remaining_hp <= 0;
        if killed {
            self.kill(defender, Some(attacker));
        }

        Some(AttackOutcome {
            attacker,
            defender,
            damage,
            remaining_hp,
            killed,
            turn_ended: false,
        })
    }

    /// Removes a dead actor from the grid, the turn order and the actor table.
    fn kill(&mut self, actor: ActorId, killer: Option<ActorId>) {
        let Some(dead) = self.actors.remove(&actor) else {
            return;
        };

        if self.grid.occupant_at(dead.position) == Some(actor) {
            self.grid.set_occupant(dead.position, None);
        } else {
            warn!("{} was not on its own tile {}", actor, dead.position);
            self.grid.clear_actor(actor);
        }
        self.scheduler.remove(actor);
        self.spawn_order.retain(|&id| id != actor);

        info!("{} ({}) died at {}", dead.name, actor, dead.position);
        self.emit(GameEvent::ActorDied {
            actor,
            position: dead.position,
            killer,
        });

        if self.living_actors_in(dead.faction).is_empty() {
            let winner = killer
                .and_then(|id| self.actors.get(&id))
                .map(|a| a.faction)
                .filter(|&faction| faction != dead.faction);
            info!("{:?} wiped out, game over (winner: {:?})", dead.faction, winner);
            self.completion_state = GameCompletionState::Finished { winner };
            self.emit(GameEvent::GameOver { winner });
        }
    }

    /// Checks that `actor` exists, the game is running and it holds the turn.
    fn ensure_can_act(&self, actor: ActorId) -> Result<&Actor, IllegalAction> {
        if !self.is_playing() {
            return Err(IllegalAction::GameOver);
        }
        let found = self.actors.get(&actor).ok_or(IllegalAction::UnknownActor)?;
        if self.scheduler.current() != Some(actor) {
            return Err(IllegalAction::NotActorsTurn);
        }
        Ok(found)
    }

    /// Starts turns beginning with `first` until input is needed.
    ///
    /// With no player-controlled actor left in the roster, at most one full
    /// round is played per call so an all-autonomous match cannot spin
    /// forever; call [`GameState::advance_turn`] to continue it.
    fn run_turns_from(&mut self, first: ActorId) {
        let mut autonomous_budget = self.scheduler.len();
        let mut next = Some(first);

        while let Some(actor) = next {
            if !self.is_playing() {
                return;
            }
            match self.begin_turn(actor) {
                TurnStart::AwaitingInput => return,
                TurnStart::Resolved => {
                    if !self.has_player_controlled_actor() {
                        autonomous_budget = autonomous_budget.saturating_sub(1);
                        if autonomous_budget == 0 {
                            return;
                        }
                    }
                    if !self.is_playing() {
                        return;
                    }
                    next = self.scheduler.advance();
                }
            }
        }
    }

    /// Resets action points and dispatches the kind-specific turn start.
    fn begin_turn(&mut self, actor: ActorId) -> TurnStart {
        let Some(active) = self.actors.get_mut(&actor) else {
            error!("turn started for unknown actor {}", actor);
            self.scheduler.remove(actor);
            return TurnStart::Resolved;
        };
        active.reset_action_points();
        let kind = active.kind;

        self.turn_number += 1;
        info!("turn {}: {} ({:?})", self.turn_number, actor, kind);
        self.emit(GameEvent::TurnChanged {
            actor,
            turn_number: self.turn_number,
        });

        kind.on_turn_start(actor, self)
    }

    fn has_player_controlled_actor(&self) -> bool {
        self.scheduler
            .roster()
            .iter()
            .any(|id| self.actors.get(id).map_or(false, |a| a.kind == ActorKind::Player))
    }

    fn emit(&mut self, event: GameEvent) {
        self.statistics.update_from_event(&event);
        self.events.push(event);
    }
}
