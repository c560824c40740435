//! Generation configuration
//!
//! Loaded from a JSON document or built in code. Every field has a default,
//! so a config file only needs the values it changes.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::GenError;
use crate::consts::{
    DEFAULT_HEIGHT, DEFAULT_MAX_SIZE, DEFAULT_MIN_SIZE, DEFAULT_NUM_TILES, DEFAULT_TILE,
    DEFAULT_WIDTH, MAX_GRID_SIDE,
};
use crate::dungeon::{TileId, Tileset};

/// Errors loading a configuration file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error(transparent)]
    Invalid(#[from] GenError),
}

/// Tile id numbering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TilesetConfig {
    /// Uninitialized tile id; one of the two highest ids
    pub default_tile: TileId,
    /// Number of tile ids
    pub num_tiles: u16,
}

impl Default for TilesetConfig {
    fn default() -> Self {
        Self {
            default_tile: DEFAULT_TILE,
            num_tiles: DEFAULT_NUM_TILES,
        }
    }
}

/// Everything a generation run needs besides its seed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenConfig {
    pub width: usize,
    pub height: usize,
    pub tileset: TilesetConfig,
    /// Smallest room side
    pub min_size: usize,
    /// Largest room side
    pub max_size: usize,
    /// Rooms must be strictly farther apart than this. Defaults to `min_size`.
    pub tolerance: Option<f64>,
    /// Failed placements allowed before giving up. Defaults to
    /// `width * height / min_size²`.
    pub tries: Option<usize>,
    /// Dig extra corridors where the tree forces long detours
    pub extra_edges: bool,
}

impl Default for GenConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            tileset: TilesetConfig::default(),
            min_size: DEFAULT_MIN_SIZE,
            max_size: DEFAULT_MAX_SIZE,
            tolerance: None,
            tries: None,
            extra_edges: true,
        }
    }
}

impl GenConfig {
    /// Load and validate a JSON config file
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse_json(&contents)
    }

    /// Parse and validate a JSON config document
    pub fn parse_json(contents: &str) -> Result<Self, ConfigError> {
        let config: GenConfig = serde_json::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize as pretty JSON
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject configurations that cannot drive a run.
    ///
    /// A grid too small to hold any room is valid; it simply yields no rooms.
    pub fn validate(&self) -> Result<(), GenError> {
        if self.width == 0 || self.height == 0 {
            return Err(GenError::invalid(format!(
                "grid must be non-empty, got {}x{}",
                self.width, self.height
            )));
        }
        if self.width > MAX_GRID_SIDE || self.height > MAX_GRID_SIDE {
            return Err(GenError::invalid(format!(
                "grid sides are limited to {MAX_GRID_SIDE}, got {}x{}",
                self.width, self.height
            )));
        }
        if self.min_size == 0 {
            return Err(GenError::invalid("min_size must be positive"));
        }
        if self.max_size > MAX_GRID_SIDE {
            return Err(GenError::invalid(format!(
                "max_size is limited to {MAX_GRID_SIDE}, got {}",
                self.max_size
            )));
        }
        if self.min_size > self.max_size {
            return Err(GenError::invalid(format!(
                "min_size {} exceeds max_size {}",
                self.min_size, self.max_size
            )));
        }
        if let Some(t) = self.tolerance
            && !(t.is_finite() && t >= 0.0)
        {
            return Err(GenError::invalid(format!(
                "tolerance must be a non-negative number, got {t}"
            )));
        }
        self.build_tileset()?;
        Ok(())
    }

    /// The configured tileset
    pub fn build_tileset(&self) -> Result<Tileset, GenError> {
        Tileset::new(self.tileset.default_tile, self.tileset.num_tiles)
    }

    /// Separation threshold for room placement
    pub fn effective_tolerance(&self) -> f64 {
        self.tolerance.unwrap_or(self.min_size as f64)
    }

    /// Placement failure budget
    pub fn effective_tries(&self) -> usize {
        self.tries.unwrap_or_else(|| {
            let side = self.min_size.max(1);
            self.width.saturating_mul(self.height) / side.saturating_mul(side)
        })
    }
}
