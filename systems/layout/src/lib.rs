#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Seeded grid synthesis for cave dungeons.
//!
//! A pass fills the grid with noise, carves rectangular rooms, joins
//! consecutive rooms with tunnels, smooths the result with a cellular
//! automaton and prunes small regions. Every random decision is drawn from a
//! single [`SeedStream`], so a seed and a configuration reproduce the same
//! layout.

mod carve;
pub mod rng;
mod smoothing;

use delve_core::{
    Cell, CaveRoom, CellCoord, CellRect, CellRectSize, ConfigError, GenerationConfig, Grid, Room,
    RoomGraph, RoomId, RoomKind, Seed,
};
use delve_system_regions::{
    classify_rooms, connect_closest_rooms, prune_regions, Passage, PruneReport, PruneThresholds,
};

pub use rng::{derive_seed, random_seed, SeedStream};

/// Grid produced by a layout pass along with everything discovered while building it.
#[derive(Clone, Debug, PartialEq)]
pub struct Layout {
    /// Finished occupancy grid.
    pub grid: Grid,
    /// Rectangular rooms in placement order.
    pub rooms: Vec<Room>,
    /// Open regions of the finished grid, largest first.
    pub cave_rooms: Vec<CaveRoom>,
    /// Connections between the cave rooms of the finished grid.
    pub room_graph: RoomGraph,
    /// Passages carved between cave rooms when region connection is enabled.
    ///
    /// Room ids refer to the classification the passage was planned against;
    /// carving merges those rooms, and the grid is pruned and classified again.
    pub passages: Vec<Passage>,
    /// Regions removed by every pruning pass.
    pub pruning: PruneReport,
}

/// Builds layouts from a validated [`GenerationConfig`].
#[derive(Clone, Debug)]
pub struct LayoutGenerator {
    config: GenerationConfig,
}

impl LayoutGenerator {
    /// Validates the configuration and creates a generator for it.
    pub fn new(config: GenerationConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Configuration the generator was built with.
    #[must_use]
    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    /// Runs a complete layout pass for the seed.
    #[must_use]
    pub fn generate(&self, seed: &Seed) -> Layout {
        let mut stream = SeedStream::new(seed);
        let mut grid = self.noise_fill(&mut stream);
        let rooms = self.place_rooms(&mut grid, &mut stream);
        log::debug!("placed {} rooms for seed {seed}", rooms.len());
        self.finish(grid, rooms, &mut stream)
    }

    /// Re-rolls the noise fill around existing rooms.
    ///
    /// The stream restarts from the seed, so only the fill percentage and the
    /// rooms influence the result.
    #[must_use]
    pub fn regenerate_fill(&self, seed: &Seed, rooms: &[Room]) -> Layout {
        let mut stream = SeedStream::new(seed);
        let mut grid = self.noise_fill(&mut stream);
        for room in rooms {
            carve::carve_room(&mut grid, room.rect());
        }
        log::debug!("re-rolled fill around {} rooms for seed {seed}", rooms.len());
        self.finish(grid, rooms.to_vec(), &mut stream)
    }

    fn noise_fill(&self, stream: &mut SeedStream) -> Grid {
        let mut grid = Grid::solid(self.config.width, self.config.height);
        for row in 0..self.config.height {
            for column in 0..self.config.width {
                let cell = CellCoord::new(column, row);
                if grid.is_border(cell) {
                    continue;
                }
                if stream.percent() >= self.config.fill_percent {
                    grid.set(cell, Cell::Open);
                }
            }
        }
        grid
    }

    fn place_rooms(&self, grid: &mut Grid, stream: &mut SeedStream) -> Vec<Room> {
        let mut rooms = Vec::new();

        for rect in &self.config.anchored_rooms {
            self.accept_room(grid, &mut rooms, *rect, stream);
        }

        let size = self.config.room_size;
        for _ in 0..self.config.room_attempts {
            let width = stream.range_inclusive(size.min, size.max);
            let height = stream.range_inclusive(size.min, size.max);
            let column = stream.range_inclusive(1, self.config.width - width - 1);
            let row = stream.range_inclusive(1, self.config.height - height - 1);
            let rect = CellRect::from_origin_and_size(
                CellCoord::new(column, row),
                CellRectSize::new(width, height),
            );

            if rooms
                .iter()
                .any(|room: &Room| room.rect().intersects_with_halo(&rect, 1))
            {
                continue;
            }

            self.accept_room(grid, &mut rooms, rect, stream);
        }

        rooms
    }

    fn accept_room(&self, grid: &mut Grid, rooms: &mut Vec<Room>, rect: CellRect, stream: &mut SeedStream) {
        carve::carve_room(grid, rect);
        let kind = if rooms.is_empty() {
            RoomKind::Entrance
        } else {
            RoomKind::from_roll(stream.unit())
        };
        let id = RoomId::new(u32::try_from(rooms.len()).unwrap_or(u32::MAX));
        rooms.push(Room::new(id, rect, kind, self.config.width, self.config.height));
    }

    fn finish(&self, mut grid: Grid, rooms: Vec<Room>, stream: &mut SeedStream) -> Layout {
        let radius = self.config.tunnel_radius;
        for pair in rooms.windows(2) {
            let brush = stream.range_inclusive(radius.min, radius.max);
            carve::carve_tunnel(
                &mut grid,
                pair[0].rect().center_cell(),
                pair[1].rect().center_cell(),
                brush,
            );
        }
        log::debug!("carved {} tunnels", rooms.len().saturating_sub(1));

        for _ in 0..self.config.smoothing_passes {
            grid = smoothing::smooth(&grid, self.config.smoothing);
        }
        log::debug!("applied {} smoothing passes", self.config.smoothing_passes);

        let thresholds =
            PruneThresholds::new(self.config.min_wall_region, self.config.min_room_region);
        let mut pruning = prune_regions(&mut grid, thresholds);
        let mut classification = classify_rooms(&grid);

        let mut passages = Vec::new();
        if self.config.connect_regions {
            // Rounds repeat only while carved passages leave rooms apart.
            for _ in 0..classification.rooms.len() {
                let round = connect_closest_rooms(&mut classification);
                if round.is_empty() {
                    break;
                }
                for passage in &round {
                    let brush = stream.range_inclusive(radius.min, radius.max);
                    carve::carve_tunnel(&mut grid, passage.from, passage.to, brush);
                }
                passages.extend(round);

                pruning += prune_regions(&mut grid, thresholds);
                classification = classify_rooms(&grid);
            }
        }

        Layout {
            grid,
            rooms,
            cave_rooms: classification.rooms,
            room_graph: classification.graph,
            passages,
            pruning,
        }
    }
}
