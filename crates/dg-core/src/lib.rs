//! dg-core: room-and-corridor map generation
//!
//! Places non-overlapping rooms on a tile grid, joins them along a minimum
//! spanning tree with randomized shortest-path corridors, adds shortcuts
//! where the tree forces long detours, and walls everything in.
//!
//! A run is a pure function of its [`GenConfig`] and seed.

pub mod config;
pub mod dungeon;
pub mod save;

mod consts;
mod error;
mod rng;

pub use config::{ConfigError, GenConfig, TilesetConfig};
pub use consts::*;
pub use error::GenError;
pub use rng::GameRng;
