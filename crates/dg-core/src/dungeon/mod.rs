//! Dungeon generation
//!
//! Contains the tileset, rooms, the tile grid, the room graph and the
//! corridor machinery that ties them together.

mod augment;
mod corridor;
mod generation;
mod graph;
mod grid;
mod render;
mod room;
mod tileset;

pub use augment::{AugmentReport, Corridor, EdgeAugmenter, max_ratio_pair};
pub use corridor::{CorridorPath, carve, dig_corridor, find_path};
pub use generation::{Connection, GeneratedMap, Generator, PlacementStats, generate};
pub use graph::{RoomGraph, SpanningTree, TreeDistances};
pub use grid::{ORTHOGONAL, Point, SURROUNDING, TileGrid};
pub use render::render;
pub use room::Room;
pub use tileset::{TileClass, TileId, Tileset};
