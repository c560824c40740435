//! Map artifact reading and writing
//!
//! The artifact is a short text header followed by the raw tiles:
//!
//! ```text
//! width: 64
//! height: 64
//! default_tile: 5
//! starting_square: 12 30
//! num_rooms: 2
//! room: 10 28 5 6
//! room: 40 3 4 4
//! tiles:
//! <width * height bytes>
//! ```
//!
//! `starting_square` is optional. Tiles are one byte each in column-major
//! order: byte `x * height + y` holds cell `(x, y)`.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Read, Write};
use std::path::Path;

use thiserror::Error;

use crate::dungeon::{GeneratedMap, Point, Room, TileGrid, TileId, Tileset};

/// Marker line separating the header from the tile bytes
pub const TILES_MARKER: &str = "tiles:";

/// Map file errors
#[derive(Debug, Error)]
pub enum MapFileError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid header line: {line:?}")]
    InvalidHeader { line: String },

    #[error("Missing header field: {0}")]
    MissingField(&'static str),

    #[error("Truncated tile data: expected {expected} bytes, found {found}")]
    Truncated { expected: usize, found: usize },

    #[error("Tile {tile} is outside a tileset of {num_tiles} ids")]
    InvalidTile { tile: TileId, num_tiles: u16 },
}

/// Contents of a map artifact
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapFile {
    pub width: usize,
    pub height: usize,
    pub default_tile: TileId,
    pub starting_square: Option<Point>,
    pub rooms: Vec<Room>,
    /// Column-major tiles
    pub tiles: Vec<TileId>,
}

impl MapFile {
    /// Capture a grid
    pub fn from_grid(grid: &TileGrid, default_tile: TileId, starting_square: Option<Point>) -> Self {
        Self {
            width: grid.width(),
            height: grid.height(),
            default_tile,
            starting_square,
            rooms: grid.rooms().to_vec(),
            tiles: grid.tiles().to_vec(),
        }
    }

    /// Capture a finished generation run
    pub fn from_generated(map: &GeneratedMap) -> Self {
        Self::from_grid(&map.grid, map.tileset.default_tile(), map.starting_square)
    }

    /// Rebuild the grid, including corner reservations
    pub fn to_grid(&self) -> Option<TileGrid> {
        TileGrid::from_parts(self.width, self.height, self.tiles.clone(), self.rooms.clone())
    }

    /// Header text, without the tiles marker
    pub fn header(&self) -> String {
        let mut lines = vec![
            format!("width: {}", self.width),
            format!("height: {}", self.height),
            format!("default_tile: {}", self.default_tile),
        ];
        if let Some(p) = self.starting_square {
            lines.push(format!("starting_square: {} {}", p.x, p.y));
        }
        lines.push(format!("num_rooms: {}", self.rooms.len()));
        for r in &self.rooms {
            lines.push(format!("room: {} {} {} {}", r.x, r.y, r.width, r.height));
        }
        lines.join("\n")
    }

    /// Write header, marker and tiles
    pub fn write_to<W: Write>(&self, mut writer: W) -> Result<(), MapFileError> {
        writeln!(writer, "{}", self.header())?;
        writeln!(writer, "{TILES_MARKER}")?;
        writer.write_all(&self.tiles)?;
        writer.flush()?;
        Ok(())
    }

    /// Write to a file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), MapFileError> {
        let file = File::create(path)?;
        self.write_to(BufWriter::new(file))
    }

    /// Parse an artifact. Bytes after the tile body are ignored.
    pub fn read_from<R: BufRead>(mut reader: R) -> Result<Self, MapFileError> {
        let mut width = None;
        let mut height = None;
        let mut default_tile = None;
        let mut starting_square = None;
        let mut num_rooms = None;
        let mut rooms = Vec::new();

        let mut line = String::new();
        loop {
            line.clear();
            if reader.read_line(&mut line)? == 0 {
                return Err(MapFileError::MissingField(TILES_MARKER));
            }
            let trimmed = line.trim_end_matches(['\r', '\n']);
            if trimmed == TILES_MARKER {
                break;
            }

            let invalid = || MapFileError::InvalidHeader {
                line: trimmed.to_string(),
            };
            let (key, value) = trimmed.split_once(':').ok_or_else(invalid)?;
            let values = parse_numbers(value).ok_or_else(invalid)?;
            match (key, values.as_slice()) {
                ("width", &[w]) => width = Some(w),
                ("height", &[h]) => height = Some(h),
                ("default_tile", &[d]) => {
                    default_tile = Some(TileId::try_from(d).map_err(|_| invalid())?)
                }
                ("starting_square", &[x, y]) => starting_square = Some(Point::new(x, y)),
                ("num_rooms", &[n]) => num_rooms = Some(n),
                ("room", &[x, y, w, h]) => rooms.push(Room::new(x, y, w, h)),
                _ => return Err(invalid()),
            }
        }

        let width = width.ok_or(MapFileError::MissingField("width"))?;
        let height = height.ok_or(MapFileError::MissingField("height"))?;
        let default_tile = default_tile.ok_or(MapFileError::MissingField("default_tile"))?;
        if let Some(n) = num_rooms
            && n != rooms.len()
        {
            return Err(MapFileError::InvalidHeader {
                line: format!("num_rooms: {n} (found {} rooms)", rooms.len()),
            });
        }

        let expected = width
            .checked_mul(height)
            .ok_or_else(|| MapFileError::InvalidHeader {
                line: format!("width: {width}, height: {height} (too large)"),
            })?;
        let mut tiles = Vec::new();
        reader.take(expected as u64).read_to_end(&mut tiles)?;
        if tiles.len() != expected {
            return Err(MapFileError::Truncated {
                expected,
                found: tiles.len(),
            });
        }

        Ok(Self {
            width,
            height,
            default_tile,
            starting_square,
            rooms,
            tiles,
        })
    }

    /// Read from a file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, MapFileError> {
        let file = File::open(path)?;
        Self::read_from(BufReader::new(file))
    }

    /// Check every tile byte against a tileset
    pub fn validate_tiles(&self, tileset: &Tileset) -> Result<(), MapFileError> {
        match self.tiles.iter().find(|&&t| !tileset.is_valid(t)) {
            Some(&tile) => Err(MapFileError::InvalidTile {
                tile,
                num_tiles: tileset.num_tiles(),
            }),
            None => Ok(()),
        }
    }
}

fn parse_numbers(value: &str) -> Option<Vec<usize>> {
    let numbers: Vec<usize> = value
        .split_whitespace()
        .map(|v| v.parse().ok())
        .collect::<Option<_>>()?;
    (!numbers.is_empty()).then_some(numbers)
}
