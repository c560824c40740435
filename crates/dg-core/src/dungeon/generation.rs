//! Map generation pipeline
//!
//! Places rooms by rejection sampling, joins them along a minimum spanning
//! tree of gap distances, digs extra corridors where the tree forces long
//! detours, and finally walls in everything that was dug.

use log::{info, trace};
use serde::Serialize;

use crate::GenError;
use crate::config::GenConfig;
use crate::rng::GameRng;

use super::augment::{AugmentReport, Corridor, EdgeAugmenter};
use super::corridor::dig_corridor;
use super::graph::{RoomGraph, TreeDistances};
use super::grid::{Point, TileGrid};
use super::render::render;
use super::room::Room;
use super::tileset::Tileset;

/// Result of room placement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct PlacementStats {
    pub placed: usize,
    pub attempts: usize,
}

/// Spanning tree stage output
#[derive(Debug, Clone, PartialEq)]
pub struct Connection {
    pub graph: RoomGraph,
    pub corridors: Vec<Corridor>,
    pub distances: TreeDistances,
}

/// A finished map and how it was built
#[derive(Debug, Clone)]
pub struct GeneratedMap {
    pub grid: TileGrid,
    pub tileset: Tileset,
    pub seed: u64,
    pub placement: PlacementStats,
    pub tree_corridors: Vec<Corridor>,
    pub augment: AugmentReport,
    pub distances: TreeDistances,
    /// A random cell of the first room
    pub starting_square: Option<Point>,
}

impl GeneratedMap {
    pub fn rooms(&self) -> &[Room] {
        self.grid.rooms()
    }
}

/// Owns a single generation run
#[derive(Debug)]
pub struct Generator {
    config: GenConfig,
    tileset: Tileset,
    rng: GameRng,
    grid: TileGrid,
}

impl Generator {
    /// Validate `config` and set up an empty grid
    pub fn new(config: GenConfig, rng: GameRng) -> Result<Self, GenError> {
        config.validate()?;
        let tileset = config.build_tileset()?;
        let grid = TileGrid::new(config.width, config.height, tileset.default_tile());
        Ok(Self {
            config,
            tileset,
            rng,
            grid,
        })
    }

    pub fn config(&self) -> &GenConfig {
        &self.config
    }

    pub fn tileset(&self) -> &Tileset {
        &self.tileset
    }

    pub fn grid(&self) -> &TileGrid {
        &self.grid
    }

    /// Place rooms until the failure budget runs out.
    ///
    /// A sample that does not fit, comes within the tolerance of a placed
    /// room, or would cover a reserved corner costs one try.
    pub fn place_rooms(&mut self) -> PlacementStats {
        let tolerance = self.config.effective_tolerance();
        let mut tries_left = self.config.effective_tries();
        let mut stats = PlacementStats::default();

        while tries_left > 0 {
            stats.attempts += 1;
            let candidate = Room::sample(
                self.config.width,
                self.config.height,
                self.config.min_size,
                self.config.max_size,
                &mut self.rng,
            );
            match candidate {
                Some(room)
                    if room.is_separated(self.grid.rooms(), tolerance)
                        && self.grid.can_place(&room, &self.tileset) =>
                {
                    self.grid.stamp_room(room, &self.tileset, &mut self.rng);
                    stats.placed += 1;
                }
                _ => tries_left -= 1,
            }
        }

        info!(
            "Placed {} rooms after {} attempts.",
            stats.placed, stats.attempts
        );
        stats
    }

    /// Dig one corridor per minimum spanning tree edge
    pub fn connect(&mut self) -> Result<Connection, GenError> {
        let graph = RoomGraph::new(self.grid.rooms());
        let tree = graph.minimum_spanning_tree();
        info!(
            "Computed a minimal spanning tree with {} edges.",
            tree.len()
        );
        debug_assert!(tree.spans(graph.len()));

        let mut corridors = Vec::with_capacity(tree.len());
        for &(a, b) in tree.edges() {
            let cost = self.dig_between(a, b)?;
            corridors.push(Corridor {
                from_room: a,
                to_room: b,
                cost,
            });
        }

        let edges: Vec<_> = corridors
            .iter()
            .map(|c| (c.from_room, c.to_room, c.cost))
            .collect();
        let distances = TreeDistances::from_tree(graph.len(), &edges);
        Ok(Connection {
            graph,
            corridors,
            distances,
        })
    }

    /// Dig extra corridors where the tree forces long detours
    pub fn augment(&mut self, connection: &mut Connection) -> Result<AugmentReport, GenError> {
        EdgeAugmenter::default().run(
            &mut self.grid,
            &self.tileset,
            &connection.graph,
            &mut connection.distances,
            &mut self.rng,
        )
    }

    /// Wall in every dug area
    pub fn finish(&mut self) -> usize {
        self.grid.finish_walls(&self.tileset)
    }

    /// Run every stage and return the finished map
    pub fn run(mut self) -> Result<GeneratedMap, GenError> {
        let placement = self.place_rooms();
        let mut connection = self.connect()?;
        let augment = if self.config.extra_edges {
            self.augment(&mut connection)?
        } else {
            AugmentReport::default()
        };
        self.finish();

        let starting_square = self
            .grid
            .room(0)
            .copied()
            .map(|room| room.random_point(&mut self.rng));
        trace!("Final map:\n{}", render(&self.grid, &self.tileset, true));

        Ok(GeneratedMap {
            seed: self.rng.seed(),
            tileset: self.tileset,
            grid: self.grid,
            placement,
            tree_corridors: connection.corridors,
            augment,
            distances: connection.distances,
            starting_square,
        })
    }

    fn dig_between(&mut self, a: usize, b: usize) -> Result<f64, GenError> {
        let (Some(ra), Some(rb)) = (self.grid.room(a).copied(), self.grid.room(b).copied()) else {
            return Err(GenError::invalid(format!("no room pair ({a}, {b})")));
        };
        let from = ra.random_point(&mut self.rng);
        let to = rb.random_point(&mut self.rng);
        dig_corridor(&mut self.grid, &self.tileset, from, to, &mut self.rng)
    }
}

/// Generate a map from `config` with the given seed
pub fn generate(config: &GenConfig, seed: u64) -> Result<GeneratedMap, GenError> {
    Generator::new(config.clone(), GameRng::new(seed))?.run()
}
