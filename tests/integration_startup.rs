//! Integration test to ensure a match can be set up and started without errors.

use dungeon_tactics::{
    ActorKind, Faction, GameEvent, GameState, GenerationConfig, SimulationConfig, TacticsError,
    TacticsResult,
};
use std::io::Write;

#[test]
fn test_basic_startup() -> TacticsResult<()> {
    let config = SimulationConfig {
        generation: GenerationConfig::for_testing(12345),
        ..SimulationConfig::default()
    };
    let mut game_state = GameState::from_config(&config)?;

    assert_eq!(game_state.turn_number, 0);
    assert_eq!(game_state.actors().count(), config.enemy_count + 1);
    assert_eq!(game_state.living_actors_in(Faction::Monsters).len(), config.enemy_count);

    game_state.start();

    // The hero spawns first, so the match waits for its input right away.
    let current = game_state.current_actor().expect("someone holds the turn");
    assert_eq!(current.kind, ActorKind::Player);
    assert_eq!(current.faction, Faction::Heroes);
    assert_eq!(game_state.turn_number, 1);
    assert!(matches!(
        game_state.events().last(),
        Some(GameEvent::AwaitingInput { .. })
    ));

    Ok(())
}

#[test]
fn test_actors_spawn_on_distinct_floor_tiles() -> TacticsResult<()> {
    let config = SimulationConfig {
        enemy_count: 6,
        ..SimulationConfig::default()
    };
    let game_state = GameState::from_config(&config)?;

    let mut seen = std::collections::HashSet::new();
    for actor in game_state.actors() {
        assert!(game_state.layout().is_floor(actor.position));
        assert!(seen.insert(actor.position), "two actors share {}", actor.position);
    }
    Ok(())
}

#[test]
fn test_same_seed_same_match() -> TacticsResult<()> {
    let config = SimulationConfig {
        autonomous_player: true,
        ..SimulationConfig::default()
    };
    let positions = |state: &GameState| -> Vec<_> { state.actors().map(|a| a.position).collect() };

    let mut first = GameState::from_config(&config)?;
    let mut second = GameState::from_config(&config)?;
    assert_eq!(first.layout(), second.layout());
    assert_eq!(positions(&first), positions(&second));

    first.start();
    second.start();
    for _ in 0..5 {
        first.advance_turn();
        second.advance_turn();
    }
    assert_eq!(positions(&first), positions(&second));
    assert_eq!(first.turn_number, second.turn_number);
    Ok(())
}

#[test]
fn test_config_loads_from_file() -> TacticsResult<()> {
    let mut file = tempfile::NamedTempFile::new()?;
    write!(
        file,
        r#"{{"generation": {{"seed": 9, "width": 20, "height": 18, "min_room_size": 3, "max_room_size": 7}}, "enemy_count": 2}}"#
    )?;

    let config = SimulationConfig::load_from_file(file.path())?;
    assert_eq!(config.generation.seed, 9);
    assert_eq!(config.generation.width, 20);
    assert_eq!(config.enemy_count, 2);
    assert!(!config.autonomous_player);

    let game_state = GameState::from_config(&config)?;
    assert_eq!(game_state.actors().count(), 3);
    Ok(())
}

#[test]
fn test_config_save_and_reload() -> TacticsResult<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("match.json");
    let config = SimulationConfig {
        enemy_count: 4,
        ..SimulationConfig::default()
    };
    std::fs::write(&path, config.save_to_json()?)?;

    assert_eq!(SimulationConfig::load_from_file(&path)?, config);
    Ok(())
}

#[test]
fn test_bad_config_file_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.json");
    assert!(matches!(
        SimulationConfig::load_from_file(&missing),
        Err(TacticsError::Io(_))
    ));

    let broken = dir.path().join("broken.json");
    std::fs::write(&broken, "{ not json").unwrap();
    assert!(matches!(
        SimulationConfig::load_from_file(&broken),
        Err(TacticsError::Serde(_))
    ));

    let invalid = dir.path().join("invalid.json");
    std::fs::write(&invalid, r#"{"generation": {"seed": 1, "width": 10, "height": 10, "min_room_size": 5, "max_room_size": 2}}"#).unwrap();
    assert!(matches!(
        SimulationConfig::load_from_file(&invalid),
        Err(TacticsError::InvalidConfiguration(_))
    ));
}

#[test]
fn test_broken_actor_templates_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let healing = dir.path().join("healing.json");
    std::fs::write(&healing, r#"{"enemy": {"name": "Leech", "max_hp": 10, "max_ap": 3, "attack_damage": -5, "attack_range": 1, "move_speed": 4.0}}"#).unwrap();
    assert!(matches!(
        SimulationConfig::load_from_file(&healing),
        Err(TacticsError::InvalidConfiguration(_))
    ));

    let mut config = SimulationConfig::default();
    config.player.max_ap = 0;
    assert!(matches!(
        GameState::from_config(&config),
        Err(TacticsError::InvalidConfiguration(_))
    ));
}
