//! Generation constants

/// Tree-distance to direct-distance ratio above which an extra corridor is dug
pub const EXTRA_EDGE_RATIO: f64 = 3.0;

/// Base cost of stepping onto a free tile
pub const FREE_STEP_COST: f64 = 1.0;

/// Base cost of stepping onto a blocked tile (digging)
pub const BLOCKED_STEP_COST: f64 = 2.0;

/// Default grid width
pub const DEFAULT_WIDTH: usize = 64;

/// Default grid height
pub const DEFAULT_HEIGHT: usize = 64;

/// Default minimum room side
pub const DEFAULT_MIN_SIZE: usize = 4;

/// Default maximum room side
pub const DEFAULT_MAX_SIZE: usize = 8;

/// Default uninitialized tile id
pub const DEFAULT_TILE: u8 = 5;

/// Default number of tile ids
pub const DEFAULT_NUM_TILES: u16 = 6;

/// Largest accepted grid side
pub const MAX_GRID_SIDE: usize = u16::MAX as usize;

/// Labels used by the debug renderer for room interiors
pub const ROOM_LABELS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";
