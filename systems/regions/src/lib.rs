#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Connected-region analysis over occupancy grids.
//!
//! Regions are discovered with a breadth-first flood fill across orthogonal
//! neighbours. Pruning removes small wall islands and isolated pockets of
//! floor; classification turns the surviving floor into [`CaveRoom`] values
//! joined by an index-based [`RoomGraph`].

use std::{collections::VecDeque, ops::AddAssign};

use delve_core::{Cell, CaveRoom, CellCoord, Grid, Region, RoomGraph, RoomId};

/// Collects every 4-connected region holding `value`, in row-major discovery order.
#[must_use]
pub fn find_regions(grid: &Grid, value: Cell) -> Vec<Region> {
    let mut visited = vec![false; grid.cells().len()];
    let mut regions = Vec::new();
    let mut frontier = VecDeque::new();

    for start in grid.coords() {
        let Some(start_index) = grid.index(start) else {
            continue;
        };
        if visited[start_index] || grid.cells()[start_index] != value {
            continue;
        }

        visited[start_index] = true;
        frontier.push_back(start);
        let mut cells = Vec::new();

        while let Some(cell) = frontier.pop_front() {
            cells.push(cell);
            for neighbor in grid.orthogonal_neighbors(cell) {
                let Some(index) = grid.index(neighbor) else {
                    continue;
                };
                if visited[index] || grid.cells()[index] != value {
                    continue;
                }
                visited[index] = true;
                frontier.push_back(neighbor);
            }
        }

        regions.push(Region::new(value, cells));
    }

    regions
}

/// Size limits below which regions are removed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PruneThresholds {
    /// Solid regions smaller than this become open.
    pub min_wall_region: usize,
    /// Open regions smaller than this become solid.
    pub min_room_region: usize,
}

impl PruneThresholds {
    /// Creates a new set of thresholds.
    #[must_use]
    pub const fn new(min_wall_region: usize, min_room_region: usize) -> Self {
        Self {
            min_wall_region,
            min_room_region,
        }
    }
}

/// Counts of regions removed by a pruning pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PruneReport {
    /// Wall regions that were cleared.
    pub wall_regions_cleared: usize,
    /// Cells turned open while clearing wall regions.
    pub wall_cells_cleared: usize,
    /// Open regions that were filled.
    pub room_regions_filled: usize,
    /// Cells turned solid while filling open regions.
    pub room_cells_filled: usize,
}

impl PruneReport {
    /// Reports whether the pass left the grid untouched.
    #[must_use]
    pub const fn is_noop(&self) -> bool {
        self.wall_regions_cleared == 0 && self.room_regions_filled == 0
    }
}

impl AddAssign for PruneReport {
    fn add_assign(&mut self, other: Self) {
        self.wall_regions_cleared += other.wall_regions_cleared;
        self.wall_cells_cleared += other.wall_cells_cleared;
        self.room_regions_filled += other.room_regions_filled;
        self.room_cells_filled += other.room_cells_filled;
    }
}

/// Removes small wall islands, then isolated pockets of floor.
///
/// Wall regions touching the border ring are never cleared. The largest open
/// region and any open region holding a protected cell are never filled.
/// Running the pass twice leaves the grid unchanged the second time.
pub fn prune_regions(grid: &mut Grid, thresholds: PruneThresholds) -> PruneReport {
    let mut report = PruneReport::default();

    for region in find_regions(grid, Cell::Solid) {
        if region.size() >= thresholds.min_wall_region {
            continue;
        }
        if region.cells().iter().any(|cell| grid.is_border(*cell)) {
            continue;
        }

        report.wall_regions_cleared += 1;
        report.wall_cells_cleared += region.size();
        for cell in region.cells() {
            grid.set(*cell, Cell::Open);
        }
    }

    let open_regions = find_regions(grid, Cell::Open);
    let main = largest_region(&open_regions);

    for (index, region) in open_regions.iter().enumerate() {
        if Some(index) == main || region.size() >= thresholds.min_room_region {
            continue;
        }
        if region.cells().iter().any(|cell| grid.is_protected(*cell)) {
            continue;
        }

        report.room_regions_filled += 1;
        report.room_cells_filled += region.size();
        for cell in region.cells() {
            grid.set(*cell, Cell::Solid);
        }
    }

    log::debug!(
        "pruned {} wall regions ({} cells) and {} open regions ({} cells)",
        report.wall_regions_cleared,
        report.wall_cells_cleared,
        report.room_regions_filled,
        report.room_cells_filled,
    );

    report
}

fn largest_region(regions: &[Region]) -> Option<usize> {
    let mut best: Option<(usize, usize)> = None;
    for (index, region) in regions.iter().enumerate() {
        match best {
            Some((_, size)) if size >= region.size() => {}
            _ => best = Some((index, region.size())),
        }
    }
    best.map(|(index, _)| index)
}

/// Open regions of a grid expressed as connected cave rooms.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RoomClassification {
    /// Rooms ordered by size, largest first.
    pub rooms: Vec<CaveRoom>,
    /// Connections between rooms.
    pub graph: RoomGraph,
    /// The largest room, when any room exists.
    pub main: Option<RoomId>,
}

/// Turns every open region into a [`CaveRoom`] with no connections.
///
/// Rooms are sorted by size, largest first, keeping discovery order between
/// equal sizes. The largest room is the main room and starts accessible.
#[must_use]
pub fn classify_rooms(grid: &Grid) -> RoomClassification {
    let mut regions = find_regions(grid, Cell::Open);
    regions.sort_by(|a, b| b.size().cmp(&a.size()));

    let rooms: Vec<CaveRoom> = regions
        .into_iter()
        .enumerate()
        .map(|(index, region)| {
            let cells = region.into_cells();
            let edge_cells = cells
                .iter()
                .copied()
                .filter(|cell| is_edge_cell(grid, *cell))
                .collect();
            CaveRoom {
                id: RoomId::new(u32::try_from(index).unwrap_or(u32::MAX)),
                cells,
                edge_cells,
                is_main: index == 0,
                accessible: index == 0,
            }
        })
        .collect();

    let main = rooms.first().map(|room| room.id);
    let graph = RoomGraph::with_rooms(rooms.len());

    log::debug!("classified {} cave rooms", rooms.len());

    RoomClassification { rooms, graph, main }
}

fn is_edge_cell(grid: &Grid, cell: CellCoord) -> bool {
    let column = i64::from(cell.column());
    let row = i64::from(cell.row());
    [(0, -1), (1, 0), (0, 1), (-1, 0)]
        .into_iter()
        .any(|(dc, dr)| match (u32::try_from(column + dc), u32::try_from(row + dr)) {
            (Ok(column), Ok(row)) => grid.is_solid(CellCoord::new(column, row)),
            _ => true,
        })
}

/// Marks every room reachable from an accessible room as accessible.
pub fn propagate_accessibility(rooms: &mut [CaveRoom], graph: &RoomGraph) {
    let mut frontier: VecDeque<RoomId> = rooms
        .iter()
        .filter(|room| room.accessible)
        .map(|room| room.id)
        .collect();

    while let Some(room) = frontier.pop_front() {
        for neighbor in graph.neighbors(room) {
            let Some(candidate) = rooms.get_mut(neighbor.index()) else {
                continue;
            };
            if candidate.accessible {
                continue;
            }
            candidate.accessible = true;
            frontier.push_back(neighbor);
        }
    }
}

/// Link between two cave rooms through their closest edge cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Passage {
    /// Room the passage starts from.
    pub from_room: RoomId,
    /// Room the passage leads to.
    pub to_room: RoomId,
    /// Edge cell of `from_room` closest to `to_room`.
    pub from: CellCoord,
    /// Edge cell of `to_room` closest to `from_room`.
    pub to: CellCoord,
}

#[derive(Clone, Copy, Debug)]
struct Candidate {
    distance: u64,
    passage: Passage,
}

/// Links rooms until every room is reachable from the main room.
///
/// Rooms without any connection first link to their closest room. Then, while
/// some room is unreachable, the closest pair of unreachable and reachable
/// rooms is linked. Distances are squared distances between edge cells.
pub fn connect_closest_rooms(classification: &mut RoomClassification) -> Vec<Passage> {
    let mut passages = Vec::new();
    let room_count = classification.rooms.len();

    for index in 0..room_count {
        if classification.graph.degree(classification.rooms[index].id) > 0 {
            continue;
        }

        let mut best: Option<Candidate> = None;
        for other in 0..room_count {
            let (from, to) = (&classification.rooms[index], &classification.rooms[other]);
            if index == other || classification.graph.is_connected(from.id, to.id) {
                continue;
            }
            best = closer(best, closest_cells(from, to));
        }

        if let Some(candidate) = best {
            link(classification, candidate.passage, &mut passages);
        }
    }

    loop {
        let mut best: Option<Candidate> = None;
        for from in classification.rooms.iter().filter(|room| !room.accessible) {
            for to in classification.rooms.iter().filter(|room| room.accessible) {
                best = closer(best, closest_cells(from, to));
            }
        }

        let Some(candidate) = best else {
            break;
        };
        link(classification, candidate.passage, &mut passages);
    }

    log::debug!("carved {} passages between cave rooms", passages.len());
    passages
}

fn link(classification: &mut RoomClassification, passage: Passage, passages: &mut Vec<Passage>) {
    let _ = classification
        .graph
        .connect(passage.from_room, passage.to_room);
    propagate_accessibility(&mut classification.rooms, &classification.graph);
    passages.push(passage);
}

fn closer(current: Option<Candidate>, candidate: Option<Candidate>) -> Option<Candidate> {
    match (current, candidate) {
        (Some(current), Some(candidate)) if candidate.distance < current.distance => Some(candidate),
        (None, candidate) => candidate,
        (current, _) => current,
    }
}

fn closest_cells(from: &CaveRoom, to: &CaveRoom) -> Option<Candidate> {
    let mut best: Option<Candidate> = None;
    for a in &from.edge_cells {
        for b in &to.edge_cells {
            let distance = a.squared_distance(*b);
            if best.map_or(true, |current| distance < current.distance) {
                best = Some(Candidate {
                    distance,
                    passage: Passage {
                        from_room: from.id,
                        to_room: to.id,
                        from: *a,
                        to: *b,
                    },
                });
            }
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_from_rows(rows: &[&str]) -> Grid {
        let height = rows.len() as u32;
        let width = rows[0].len() as u32;
        let mut grid = Grid::solid(width, height);
        for (row, line) in rows.iter().enumerate() {
            for (column, symbol) in line.chars().enumerate() {
                let cell = CellCoord::new(column as u32, row as u32);
                match symbol {
                    '.' => grid.set(cell, Cell::Open),
                    '+' => {
                        grid.set(cell, Cell::Open);
                        grid.protect(cell);
                    }
                    _ => {}
                }
            }
        }
        grid
    }

    #[test]
    fn largest_region_prefers_first_on_ties() {
        let regions = vec![
            Region::new(Cell::Open, vec![CellCoord::new(0, 0); 3]),
            Region::new(Cell::Open, vec![CellCoord::new(0, 0); 5]),
            Region::new(Cell::Open, vec![CellCoord::new(0, 0); 5]),
        ];
        assert_eq!(largest_region(&regions), Some(1));
        assert_eq!(largest_region(&[]), None);
    }

    #[test]
    fn edge_cells_touch_walls() {
        let grid = grid_from_rows(&["#####", "#...#", "#...#", "#...#", "#####"]);
        let classification = classify_rooms(&grid);

        assert_eq!(classification.rooms.len(), 1);
        assert_eq!(classification.rooms[0].edge_cells.len(), 8);
        assert!(!classification.rooms[0].edge_cells.contains(&CellCoord::new(2, 2)));
    }

    #[test]
    fn closer_keeps_first_on_equal_distance() {
        let passage = Passage {
            from_room: RoomId::new(1),
            to_room: RoomId::new(0),
            from: CellCoord::new(1, 1),
            to: CellCoord::new(2, 2),
        };
        let first = Candidate {
            distance: 4,
            passage,
        };
        let second = Candidate {
            distance: 4,
            passage: Passage {
                to_room: RoomId::new(2),
                ..passage
            },
        };
        let kept = closer(Some(first), Some(second)).map(|candidate| candidate.passage.to_room);
        assert_eq!(kept, Some(RoomId::new(0)));
    }
}
