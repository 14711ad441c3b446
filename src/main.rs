//! # Dungeon Tactics Entry Point
//!
//! Runs a headless match: generates a dungeon, spawns the party, plays turns
//! and prints every game event as a JSON line.

use clap::Parser;
use dungeon_tactics::{ActorKind, GameState, SimulationConfig, TacticsError, TacticsResult};
use log::{info, LevelFilter};

/// Command line arguments for Dungeon Tactics.
#[derive(Parser, Debug)]
#[command(name = "dungeon-tactics")]
#[command(about = "Turn-based tactics on procedurally generated dungeons")]
#[command(version)]
struct Args {
    /// Random seed for dungeon generation and spawning
    #[arg(short, long)]
    seed: Option<u64>,

    /// Dungeon width in cells
    #[arg(long)]
    width: Option<u32>,

    /// Dungeon height in cells
    #[arg(long)]
    height: Option<u32>,

    /// Minimum room size
    #[arg(long)]
    min_room: Option<u32>,

    /// Partition size that keeps splitting
    #[arg(long)]
    max_room: Option<u32>,

    /// Number of enemies to spawn
    #[arg(short, long)]
    enemies: Option<usize>,

    /// JSON configuration file; command line flags override its values
    #[arg(short, long)]
    config: Option<std::path::PathBuf>,

    /// Let the built-in routine play the hero instead of passing its turns
    #[arg(long)]
    auto_player: bool,

    /// Stop after this many rounds
    #[arg(long, default_value_t = 50)]
    rounds: u64,

    /// Print the dungeon before the match starts
    #[arg(long)]
    show_map: bool,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> TacticsResult<()> {
    let args = Args::parse();

    initialize_logging(&args.log_level)?;

    info!("Starting Dungeon Tactics v{}", dungeon_tactics::VERSION);

    let config = build_config(&args)?;
    run_match(&args, &config)
}

/// Initializes the logging system based on the specified log level.
fn initialize_logging(log_level: &str) -> TacticsResult<()> {
    let level = match log_level.to_lowercase().as_str() {
        "error" => LevelFilter::Error,
        "warn" => LevelFilter::Warn,
        "info" => LevelFilter::Info,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        "off" => LevelFilter::Off,
        other => {
            return Err(TacticsError::InvalidConfiguration(format!(
                "unknown log level '{}'",
                other
            )))
        }
    };

    env_logger::Builder::new()
        .filter_level(level)
        .format_target(false)
        .try_init()
        .map_err(|e| TacticsError::InvalidConfiguration(e.to_string()))
}

/// Loads the configuration file, if any, and applies command line overrides.
fn build_config(args: &Args) -> TacticsResult<SimulationConfig> {
    let mut config = match &args.config {
        Some(path) => {
            info!("Loading configuration from {}", path.display());
            SimulationConfig::load_from_file(path)?
        }
        None => SimulationConfig::default(),
    };

    let generation = &mut config.generation;
    if let Some(seed) = args.seed {
        generation.seed = seed;
    }
    if let Some(width) = args.width {
        generation.width = width;
    }
    if let Some(height) = args.height {
        generation.height = height;
    }
    if let Some(min_room) = args.min_room {
        generation.min_room_size = min_room;
    }
    if let Some(max_room) = args.max_room {
        generation.max_room_size = max_room;
    }
    if let Some(enemies) = args.enemies {
        config.enemy_count = enemies;
    }
    config.autonomous_player |= args.auto_player;

    config.validate()?;
    Ok(config)
}

/// Plays turns until one side is wiped out or the round limit is hit.
fn run_match(args: &Args, config: &SimulationConfig) -> TacticsResult<()> {
    let mut state = GameState::from_config(config)?;
    if args.show_map {
        println!("{}", state.layout().to_ascii());
    }

    state.start();
    print_events(&mut state)?;

    let turn_limit = args.rounds * state.scheduler().len() as u64;
    while state.is_playing() && state.turn_number < turn_limit {
        let before = state.turn_number;
        match state.current_actor().map(|actor| (actor.id, actor.kind)) {
            Some((id, ActorKind::Player)) => state.end_turn(id)?,
            Some(_) => state.advance_turn(),
            None => break,
        }
        print_events(&mut state)?;

        if state.turn_number == before {
            break;
        }
    }

    let stats = &state.statistics;
    info!(
        "Match ended after {} turns: {} steps, {} damage, {} defeated ({:?})",
        state.turn_number,
        stats.steps_taken,
        stats.damage_dealt,
        stats.actors_defeated,
        state.completion_state
    );
    Ok(())
}

fn print_events(state: &mut GameState) -> TacticsResult<()> {
    for event in state.drain_events() {
        println!("{}", serde_json::to_string(&event)?);
    }
    Ok(())
}
