//! Cellular-automaton smoothing.

use delve_core::{Cell, Grid, SmoothingRule};

/// Runs one smoothing pass, returning a new grid.
///
/// Every cell reads its neighbours from the input grid. Protected cells never
/// become solid and the border ring stays solid.
#[must_use]
pub(crate) fn smooth(grid: &Grid, rule: SmoothingRule) -> Grid {
    let mut next = grid.clone();

    for cell in grid.coords() {
        if grid.is_border(cell) {
            continue;
        }

        let current = if grid.is_solid(cell) { Cell::Solid } else { Cell::Open };
        let mut value = rule.apply(current, grid.solid_neighbor_count(cell));
        if value.is_solid() && grid.is_protected(cell) {
            value = Cell::Open;
        }
        next.set(cell, value);
    }

    next.enforce_border();
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use delve_core::CellCoord;

    #[test]
    fn isolated_wall_cells_erode() {
        let mut grid = Grid::solid(7, 7);
        for cell in grid.coords().collect::<Vec<_>>() {
            if !grid.is_border(cell) {
                grid.set(cell, Cell::Open);
            }
        }
        grid.set(CellCoord::new(3, 3), Cell::Solid);

        let next = smooth(&grid, SmoothingRule::default());

        assert_eq!(next.get(CellCoord::new(3, 3)), Some(Cell::Open));
        assert_eq!(next.count(Cell::Solid), 24);
    }

    #[test]
    fn enclosed_floor_fills_unless_protected() {
        let mut grid = Grid::solid(7, 7);
        grid.set(CellCoord::new(2, 2), Cell::Open);
        grid.set(CellCoord::new(4, 4), Cell::Open);
        grid.protect(CellCoord::new(4, 4));

        let next = smooth(&grid, SmoothingRule::default());

        assert_eq!(next.get(CellCoord::new(2, 2)), Some(Cell::Solid));
        assert_eq!(next.get(CellCoord::new(4, 4)), Some(Cell::Open));
    }
}
