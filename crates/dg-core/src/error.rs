//! Generation errors

use thiserror::Error;

use crate::dungeon::Point;

/// Errors that abort a generation run
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GenError {
    /// The configuration was rejected before any placement attempt
    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    /// Corridor routing could not reach its target. Blocked corners or the
    /// border have isolated a room.
    #[error("No path from ({}, {}) to ({}, {})", from.x, from.y, to.x, to.y)]
    NoPath { from: Point, to: Point },
}

impl GenError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        GenError::InvalidConfig {
            reason: reason.into(),
        }
    }
}
