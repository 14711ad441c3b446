//! # Actors
//!
//! Player and enemy combatants, their stats and their turn-start behaviour.

use crate::config;
use crate::game::{ActorId, GameState, Position};
use crate::{IllegalAction, TacticsError, TacticsResult};
use serde::{Deserialize, Serialize};

/// Who decides what an actor does on its turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActorKind {
    /// Driven by the external input layer
    Player,
    /// Driven by the built-in decision routine
    Autonomous,
}

/// What happened when an actor's turn started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnStart {
    /// The turn waits for external input
    AwaitingInput,
    /// The turn was played out immediately and is over
    Resolved,
}

impl ActorKind {
    /// Runs the kind-specific turn-start behaviour for `actor`.
    ///
    /// Action points have already been reset by the caller. Player-controlled
    /// actors surface a prompt and wait; autonomous actors play their whole
    /// turn before this returns.
    pub fn on_turn_start(self, actor: ActorId, state: &mut GameState) -> TurnStart {
        match self {
            ActorKind::Player => {
                state.prompt_for_input(actor);
                TurnStart::AwaitingInput
            }
            ActorKind::Autonomous => {
                crate::game::ai::take_turn(state, actor);
                TurnStart::Resolved
            }
        }
    }
}

/// Side an actor fights for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Faction {
    Heroes,
    Monsters,
}

impl Faction {
    /// Checks whether actors of `self` treat `other` as an enemy.
    pub fn opposes(self, other: Faction) -> bool {
        self != other
    }
}

/// Combat and economy numbers for an actor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActorStats {
    /// Maximum hit points
    pub max_hp: i32,
    /// Current hit points; the actor dies at zero or below
    pub hp: i32,
    /// Action points granted at the start of each turn
    pub max_ap: u32,
    /// Action points left this turn
    pub ap: u32,
    /// Damage dealt per attack
    pub attack_damage: i32,
    /// Maximum distance along a row or column for attacks
    pub attack_range: u32,
    /// Presentation-only animation speed
    pub move_speed: f32,
}

impl ActorStats {
    /// Creates full-health stats from a template.
    pub fn from_template(template: &ActorTemplate) -> Self {
        Self {
            max_hp: template.max_hp,
            hp: template.max_hp,
            max_ap: template.max_ap,
            ap: template.max_ap,
            attack_damage: template.attack_damage,
            attack_range: template.attack_range,
            move_speed: template.move_speed,
        }
    }
}

/// Blueprint used to spawn actors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActorTemplate {
    pub name: String,
    pub max_hp: i32,
    pub max_ap: u32,
    pub attack_damage: i32,
    pub attack_range: u32,
    pub move_speed: f32,
}

impl ActorTemplate {
    /// Default player blueprint.
    pub fn player() -> Self {
        Self {
            name: "Player".to_string(),
            ..Self::base()
        }
    }

    /// Default enemy blueprint.
    pub fn enemy() -> Self {
        Self {
            name: "Enemy".to_string(),
            ..Self::base()
        }
    }

    /// Rejects blueprints that would spawn dead actors, actors that can never
    /// act, or attacks that heal.
    pub fn validate(&self) -> TacticsResult<()> {
        if self.max_hp <= 0 {
            return Err(TacticsError::InvalidConfiguration(format!(
                "template '{}' needs positive max_hp, got {}",
                self.name, self.max_hp
            )));
        }
        if self.max_ap == 0 {
            return Err(TacticsError::InvalidConfiguration(format!(
                "template '{}' needs at least one action point",
                self.name
            )));
        }
        if self.attack_damage < 0 {
            return Err(TacticsError::InvalidConfiguration(format!(
                "template '{}' has negative attack_damage {}",
                self.name, self.attack_damage
            )));
        }
        Ok(())
    }

    fn base() -> Self {
        Self {
            name: String::new(),
            max_hp: config::DEFAULT_MAX_HP,
            max_ap: config::DEFAULT_MAX_AP,
            attack_damage: config::DEFAULT_ATTACK_DAMAGE,
            attack_range: config::DEFAULT_ATTACK_RANGE,
            move_speed: config::DEFAULT_MOVE_SPEED,
        }
    }
}

/// A combatant on the grid.
///
/// # Examples
///
/// ```
/// use dungeon_tactics::{Actor, ActorKind, Faction, Position};
/// use dungeon_tactics::game::ActorTemplate;
///
/// let actor = Actor::from_template(
///     &ActorTemplate::player(),
///     ActorKind::Player,
///     Faction::Heroes,
///     Position::new(2, 3),
/// );
/// assert!(actor.is_alive());
/// assert_eq!(actor.stats.ap, actor.stats.max_ap);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Actor {
    pub id: ActorId,
    pub name: String,
    pub kind: ActorKind,
    pub faction: Faction,
    pub position: Position,
    pub stats: ActorStats,
}

impl Actor {
    /// Creates an actor with full HP and AP.
    pub fn new(
        name: impl Into<String>,
        kind: ActorKind,
        faction: Faction,
        position: Position,
        stats: ActorStats,
    ) -> Self {
        Self {
            id: crate::game::new_actor_id(),
            name: name.into(),
            kind,
            faction,
            position,
            stats,
        }
    }

    /// Creates an actor from a template.
    pub fn from_template(
        template: &ActorTemplate,
        kind: ActorKind,
        faction: Faction,
        position: Position,
    ) -> Self {
        Self::new(
            template.name.clone(),
            kind,
            faction,
            position,
            ActorStats::from_template(template),
        )
    }

    /// Checks whether the actor still has hit points.
    pub fn is_alive(&self) -> bool {
        self.stats.hp > 0
    }

    /// Refills action points at the start of a turn.
    pub fn reset_action_points(&mut self) {
        self.stats.ap = self.stats.max_ap;
    }

    /// Spends one action point. Returns false if none were left.
    pub fn spend_action_point(&mut self) -> bool {
        if self.stats.ap == 0 {
            return false;
        }
        self.stats.ap -= 1;
        true
    }

    /// Applies damage and returns the remaining hit points.
    pub fn take_damage(&mut self, damage: i32) -> i32 {
        self.stats.hp -= damage;
        self.stats.hp
    }

    /// Checks the geometric attack rule: same row or column, within range,
    /// and not the actor's own tile.
    pub fn check_attack_reach(&self, target: Position) -> Result<(), IllegalAction> {
        if target == self.position {
            return Err(IllegalAction::SameTile);
        }
        if !crate::utils::is_cross_aligned(self.position, target) {
            return Err(IllegalAction::NotAligned);
        }
        if self.position.manhattan_distance(target) > self.stats.attack_range {
            return Err(IllegalAction::OutOfRange);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hero_at(x: i32, y: i32) -> Actor {
        Actor::from_template(
            &ActorTemplate::player(),
            ActorKind::Player,
            Faction::Heroes,
            Position::new(x, y),
        )
    }

    #[test]
    fn test_actor_from_template() {
        let actor = hero_at(1, 1);
        assert_eq!(actor.name, "Player");
        assert_eq!(actor.stats.hp, config::DEFAULT_MAX_HP);
        assert_eq!(actor.stats.ap, config::DEFAULT_MAX_AP);
        assert!(actor.is_alive());
    }

    #[test]
    fn test_action_point_economy() {
        let mut actor = hero_at(0, 0);
        for _ in 0..actor.stats.max_ap {
            assert!(actor.spend_action_point());
        }
        assert_eq!(actor.stats.ap, 0);
        assert!(!actor.spend_action_point());

        actor.reset_action_points();
        assert_eq!(actor.stats.ap, actor.stats.max_ap);
    }

    #[test]
    fn test_damage_and_death() {
        let mut actor = hero_at(0, 0);
        assert_eq!(actor.take_damage(4), 6);
        assert!(actor.is_alive());
        assert_eq!(actor.take_damage(6), 0);
        assert!(!actor.is_alive());
    }

    #[test]
    fn test_attack_reach_is_plus_shaped() {
        let mut actor = hero_at(2, 2);
        actor.stats.attack_range = 2;

        assert_eq!(actor.check_attack_reach(Position::new(2, 4)), Ok(()));
        assert_eq!(actor.check_attack_reach(Position::new(0, 2)), Ok(()));
        assert_eq!(
            actor.check_attack_reach(Position::new(3, 3)),
            Err(IllegalAction::NotAligned)
        );
        assert_eq!(
            actor.check_attack_reach(Position::new(2, 5)),
            Err(IllegalAction::OutOfRange)
        );
        assert_eq!(
            actor.check_attack_reach(Position::new(2, 2)),
            Err(IllegalAction::SameTile)
        );
    }

    #[test]
    fn test_default_templates_are_valid() {
        assert!(ActorTemplate::player().validate().is_ok());
        assert!(ActorTemplate::enemy().validate().is_ok());
    }

    #[test]
    fn test_template_validation_rejects_broken_stats() {
        let broken = [
            ActorTemplate { max_hp: 0, ..ActorTemplate::player() },
            ActorTemplate { max_ap: 0, ..ActorTemplate::player() },
            ActorTemplate { attack_damage: -5, ..ActorTemplate::enemy() },
        ];
        for template in broken {
            assert!(matches!(
                template.validate(),
                Err(TacticsError::InvalidConfiguration(_))
            ));
        }
        let harmless = ActorTemplate { attack_damage: 0, ..ActorTemplate::enemy() };
        assert!(harmless.validate().is_ok());
    }

    #[test]
    fn test_factions() {
        assert!(Faction::Heroes.opposes(Faction::Monsters));
        assert!(!Faction::Monsters.opposes(Faction::Monsters));
    }
}
