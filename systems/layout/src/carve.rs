//! Brushes that clear cells out of the grid.

use delve_core::{Cell, CellCoord, CellRect, Grid};

/// Clears every cell of the rectangle and protects it from smoothing.
pub(crate) fn carve_room(grid: &mut Grid, rect: CellRect) {
    for cell in rect.cells() {
        grid.set(cell, Cell::Open);
        grid.protect(cell);
    }
}

/// Sweeps a circular brush along the integer Bresenham line between two cells.
pub(crate) fn carve_tunnel(grid: &mut Grid, from: CellCoord, to: CellCoord, radius: u32) {
    let (mut x, mut y) = (i64::from(from.column()), i64::from(from.row()));
    let (x1, y1) = (i64::from(to.column()), i64::from(to.row()));
    let dx = (x1 - x).abs();
    let dy = (y1 - y).abs();
    let step_x = if x < x1 { 1 } else { -1 };
    let step_y = if y < y1 { 1 } else { -1 };
    let mut err = dx - dy;

    loop {
        carve_circle(grid, x, y, radius);
        if x == x1 && y == y1 {
            break;
        }

        let doubled = err * 2;
        if doubled > -dy {
            err -= dy;
            x += step_x;
        }
        if doubled < dx {
            err += dx;
            y += step_y;
        }
    }
}

/// Clears every cell within `radius` of the centre. The border ring is never touched.
fn carve_circle(grid: &mut Grid, center_x: i64, center_y: i64, radius: u32) {
    let radius = i64::from(radius);
    for offset_y in -radius..=radius {
        for offset_x in -radius..=radius {
            if offset_x * offset_x + offset_y * offset_y > radius * radius {
                continue;
            }

            let (Ok(column), Ok(row)) = (
                u32::try_from(center_x + offset_x),
                u32::try_from(center_y + offset_y),
            ) else {
                continue;
            };
            let cell = CellCoord::new(column, row);
            if grid.contains(cell) && !grid.is_border(cell) {
                grid.set(cell, Cell::Open);
            }
        }
    }
}
