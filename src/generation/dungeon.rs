//! # Dungeon Generation
//!
//! Binary space partitioning dungeon generator.
//!
//! The generator:
//! 1. Partitions the map breadth-first into leaves
//! 2. Carves one inset room per leaf
//! 3. Joins consecutive rooms with L-shaped corridors
//! 4. Derives walls around the floor and checks the floor is one connected piece

use crate::game::Position;
use crate::generation::walls::{derive_walls, WallPiece};
use crate::generation::{bsp, GenerationConfig, Generator, Rect};
use crate::{TacticsError, TacticsResult};
use log::{debug, info, warn};
use pathfinding::prelude::bfs_reach;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Floor and wall coordinates of a generated dungeon.
///
/// Floor and walls are disjoint. Rooms are not retained; only their carved
/// cells and the corridors between them are.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DungeonLayout {
    pub width: u32,
    pub height: u32,
    pub floor: BTreeSet<Position>,
    pub walls: BTreeSet<Position>,
}

impl DungeonLayout {
    /// Builds a layout from a floor set, deriving its walls.
    pub fn from_floor(width: u32, height: u32, floor: BTreeSet<Position>) -> Self {
        let walls = derive_walls(&floor);
        Self {
            width,
            height,
            floor,
            walls,
        }
    }

    /// A single open room covering the whole `width` x `height` area.
    ///
    /// # Examples
    ///
    /// ```
    /// use dungeon_tactics::{DungeonLayout, Position};
    ///
    /// let layout = DungeonLayout::open(4, 3);
    /// assert_eq!(layout.floor.len(), 12);
    /// assert!(layout.walls.contains(&Position::new(-1, -1)));
    /// ```
    pub fn open(width: u32, height: u32) -> Self {
        let floor = Rect::new(0, 0, width, height).positions().collect();
        Self::from_floor(width, height, floor)
    }

    pub fn is_floor(&self, pos: Position) -> bool {
        self.floor.contains(&pos)
    }

    pub fn is_wall(&self, pos: Position) -> bool {
        self.walls.contains(&pos)
    }

    /// Visual piece for every wall.
    pub fn wall_pieces(&self) -> BTreeMap<Position, WallPiece> {
        self.walls
            .iter()
            .map(|&pos| (pos, WallPiece::classify(pos, &self.floor, &self.walls)))
            .collect()
    }

    /// Checks that every floor cell is reachable from every other one
    /// through 4-adjacent floor cells.
    pub fn is_connected(&self) -> bool {
        let Some(&start) = self.floor.iter().next() else {
            return false;
        };
        let floor = &self.floor;
        let reached = bfs_reach(start, |pos: &Position| {
            pos.cardinal_neighbours()
                .into_iter()
                .filter(move |neighbour| floor.contains(neighbour))
        })
        .count();
        reached == floor.len()
    }

    /// Text dump with `#` for walls, `.` for floor, highest row first.
    pub fn to_ascii(&self) -> String {
        let cells = self.floor.iter().chain(self.walls.iter());
        let (mut min_x, mut min_y) = (0, 0);
        let (mut max_x, mut max_y) = (self.width as i32 - 1, self.height as i32 - 1);
        for pos in cells {
            min_x = min_x.min(pos.x);
            min_y = min_y.min(pos.y);
            max_x = max_x.max(pos.x);
            max_y = max_y.max(pos.y);
        }

        let mut out = String::new();
        for y in (min_y..=max_y).rev() {
            for x in min_x..=max_x {
                let pos = Position::new(x, y);
                out.push(if self.is_floor(pos) {
                    '.'
                } else if self.is_wall(pos) {
                    '#'
                } else {
                    ' '
                });
            }
            out.push('\n');
        }
        out
    }
}

/// Dungeon generator built on binary space partitioning.
#[derive(Debug, Clone)]
pub struct BspDungeonGenerator {
    /// Whether to reject layouts whose floor is not one connected piece
    pub ensure_connectivity: bool,
}

impl BspDungeonGenerator {
    /// Creates a new dungeon generator with default settings.
    ///
    /// # Examples
    ///
    /// ```
    /// use dungeon_tactics::{BspDungeonGenerator, GenerationConfig, Generator};
    /// use rand::{rngs::StdRng, SeedableRng};
    ///
    /// let config = GenerationConfig::new(3);
    /// let mut rng = StdRng::seed_from_u64(config.seed);
    /// let layout = BspDungeonGenerator::new().generate(&config, &mut rng).unwrap();
    /// assert!(!layout.floor.is_empty());
    /// ```
    pub fn new() -> Self {
        Self {
            ensure_connectivity: true,
        }
    }

    /// Carves the rooms for `config`, in generation order.
    fn plan_rooms(&self, config: &GenerationConfig, rng: &mut StdRng) -> Vec<Rect> {
        let area = Rect::new(0, 0, config.width, config.height);
        if config.needs_single_room_fallback() {
            warn!(
                "{}x{} dungeon is too small for min room size {}, using a single room",
                config.width, config.height, config.min_room_size
            );
            return vec![bsp::carve_room(area, config.min_room_size, rng)];
        }

        bsp::partition(area, config.min_room_size, config.max_room_size, rng)
            .into_iter()
            .map(|leaf| bsp::carve_room(leaf, config.min_room_size, rng))
            .collect()
    }
}

/// Carves an L-shaped corridor: along the row of `start` to the column of
/// `end`, then along that column to `end`.
pub fn carve_l_corridor(floor: &mut BTreeSet<Position>, start: Position, end: Position) {
    let mut pos = start;
    while pos.x != end.x {
        floor.insert(pos);
        pos.x += (end.x - pos.x).signum();
    }
    while pos.y != end.y {
        floor.insert(pos);
        pos.y += (end.y - pos.y).signum();
    }
    floor.insert(end);
}

/// Generates a dungeon with the default generator.
pub fn generate_dungeon(config: &GenerationConfig, rng: &mut StdRng) -> TacticsResult<DungeonLayout> {
    BspDungeonGenerator::new().generate(config, rng)
}

impl Generator<DungeonLayout> for BspDungeonGenerator {
    fn generate(&self, config: &GenerationConfig, rng: &mut StdRng) -> TacticsResult<DungeonLayout> {
        config.validate()?;

        let rooms = self.plan_rooms(config, rng);
        let mut floor = BTreeSet::new();
        for room in &rooms {
            floor.extend(room.positions());
        }
        for pair in rooms.windows(2) {
            carve_l_corridor(&mut floor, pair[0].center(), pair[1].center());
        }

        let layout = DungeonLayout::from_floor(config.width, config.height, floor);
        debug!(
            "{} carved {} rooms ({} room cells), {} floor, {} walls",
            self.generator_type(),
            rooms.len(),
            rooms.iter().map(Rect::area).sum::<u32>(),
            layout.floor.len(),
            layout.walls.len()
        );

        self.validate(&layout, config)?;
        info!(
            "generated {}x{} dungeon (seed {}) with {} rooms",
            config.width,
            config.height,
            config.seed,
            rooms.len()
        );
        Ok(layout)
    }

    fn validate(&self, layout: &DungeonLayout, _config: &GenerationConfig) -> TacticsResult<()> {
        if layout.floor.is_empty() {
            return Err(TacticsError::GenerationFailed(
                "dungeon has no floor tiles".to_string(),
            ));
        }
        if !layout.floor.is_disjoint(&layout.walls) {
            return Err(TacticsError::GenerationFailed(
                "floor and wall sets overlap".to_string(),
            ));
        }
        if self.ensure_connectivity && !layout.is_connected() {
            return Err(TacticsError::GenerationFailed(
                "dungeon floor is not connected".to_string(),
            ));
        }
        Ok(())
    }

    fn generator_type(&self) -> &'static str {
        "BspDungeonGenerator"
    }
}

impl Default for BspDungeonGenerator {
    fn default() -> Self {
        Self::new()
    }
}
