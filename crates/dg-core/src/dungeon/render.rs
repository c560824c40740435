//! Debug text rendering

use crate::consts::ROOM_LABELS;

use super::grid::{Point, TileGrid};
use super::tileset::Tileset;

/// Render the grid one text line per row.
///
/// With `label_rooms`, room interiors show their room index as a single
/// character from `0-9a-zA-Z`, wrapping around after 62 rooms.
pub fn render(grid: &TileGrid, tileset: &Tileset, label_rooms: bool) -> String {
    let width = grid.width();
    let height = grid.height();
    let mut rows: Vec<Vec<char>> = (0..height)
        .map(|y| {
            (0..width)
                .map(|x| {
                    grid.get(Point::new(x, y))
                        .map_or(' ', |t| tileset.classify(t).debug_char())
                })
                .collect()
        })
        .collect();

    if label_rooms {
        for (i, room) in grid.rooms().iter().enumerate() {
            let label = ROOM_LABELS[i % ROOM_LABELS.len()] as char;
            for p in room.cells() {
                if let Some(c) = rows.get_mut(p.y).and_then(|row| row.get_mut(p.x)) {
                    *c = label;
                }
            }
        }
    }

    rows.into_iter()
        .map(|row| row.into_iter().collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}
