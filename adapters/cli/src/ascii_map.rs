//! Plain-text rendering of a dungeon grid.

use delve_core::{CellCoord, Grid, Room};

/// Glyph used for wall cells.
pub(crate) const SOLID_GLYPH: char = '#';
/// Glyph used for open floor outside any room.
pub(crate) const OPEN_GLYPH: char = '.';
/// Glyph used for cells inside a rectangular room.
pub(crate) const ROOM_GLYPH: char = '+';

/// Draws one line per grid row, rooms drawn over open floor.
pub(crate) fn render(grid: &Grid, rooms: &[Room]) -> String {
    let width = grid.width() as usize;
    let mut out = String::with_capacity((width + 1) * grid.height() as usize);

    for row in 0..grid.height() {
        for column in 0..grid.width() {
            let cell = CellCoord::new(column, row);
            out.push(glyph(grid, rooms, cell));
        }
        out.push('\n');
    }

    out
}

fn glyph(grid: &Grid, rooms: &[Room], cell: CellCoord) -> char {
    if grid.is_solid(cell) {
        SOLID_GLYPH
    } else if rooms.iter().any(|room| room.rect().contains(cell)) {
        ROOM_GLYPH
    } else {
        OPEN_GLYPH
    }
}
