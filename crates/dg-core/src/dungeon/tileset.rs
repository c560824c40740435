//! Tile id semantics
//!
//! A tileset numbers its tiles `0..num_tiles`. The two highest ids are
//! blocked: one of them is the uninitialized default, the other is the wall.
//! Every lower id is a free (walkable) tile.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use crate::GenError;
use crate::consts::{DEFAULT_NUM_TILES, DEFAULT_TILE};
use crate::rng::GameRng;

/// A grid cell's terrain label. One byte per cell in the map artifact.
pub type TileId = u8;

/// Coarse classification of a tile id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter)]
pub enum TileClass {
    /// Never touched by generation
    Default,
    /// Walkable floor
    Free,
    /// Impassable wall
    Wall,
}

impl TileClass {
    /// Character used by the debug renderer
    pub const fn debug_char(self) -> char {
        match self {
            TileClass::Default => ' ',
            TileClass::Free => '.',
            TileClass::Wall => 'X',
        }
    }
}

/// Immutable tile id configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tileset {
    default_tile: TileId,
    wall_tile: TileId,
    num_tiles: u16,
}

impl Tileset {
    /// Build a tileset with `num_tiles` ids whose uninitialized id is
    /// `default_tile`. The default must be one of the two highest ids.
    pub fn new(default_tile: TileId, num_tiles: u16) -> Result<Self, GenError> {
        if !(3..=256).contains(&num_tiles) {
            return Err(GenError::invalid(format!(
                "num_tiles must be in 3..=256, got {num_tiles}"
            )));
        }
        let top = num_tiles - 1;
        let wall_tile = if u16::from(default_tile) == top {
            top - 1
        } else if u16::from(default_tile) == top - 1 {
            top
        } else {
            return Err(GenError::invalid(format!(
                "default_tile {default_tile} must be one of the two blocked ids {} or {top}",
                top - 1
            )));
        };

        Ok(Self {
            default_tile,
            wall_tile: wall_tile as TileId,
            num_tiles,
        })
    }

    /// The uninitialized tile id
    pub const fn default_tile(&self) -> TileId {
        self.default_tile
    }

    /// The wall tile id
    pub const fn wall_tile(&self) -> TileId {
        self.wall_tile
    }

    /// Number of tile ids
    pub const fn num_tiles(&self) -> u16 {
        self.num_tiles
    }

    /// Number of free tile ids
    pub const fn num_free(&self) -> u16 {
        self.num_tiles - 2
    }

    /// Whether `id` belongs to this tileset
    pub const fn is_valid(&self, id: TileId) -> bool {
        (id as u16) < self.num_tiles
    }

    /// Whether `id` is impassable. Ids outside the tileset count as blocked.
    pub const fn is_blocked(&self, id: TileId) -> bool {
        (id as u16) >= self.num_free()
    }

    /// Whether `id` is walkable
    pub const fn is_free(&self, id: TileId) -> bool {
        !self.is_blocked(id)
    }

    /// Classify a tile id
    pub const fn classify(&self, id: TileId) -> TileClass {
        if id == self.default_tile {
            TileClass::Default
        } else if self.is_blocked(id) {
            TileClass::Wall
        } else {
            TileClass::Free
        }
    }

    /// Pick a free tile id uniformly
    pub fn random_free_tile(&self, rng: &mut GameRng) -> TileId {
        rng.rn2(u32::from(self.num_free())) as TileId
    }
}

impl Default for Tileset {
    fn default() -> Self {
        Self {
            default_tile: DEFAULT_TILE,
            wall_tile: DEFAULT_TILE - 1,
            num_tiles: DEFAULT_NUM_TILES,
        }
    }
}
