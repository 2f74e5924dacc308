//! Generation pipeline sequencing layout, triangulation and tracing.

use delve_core::{
    CaveRoom, DungeonSummary, GenerationConfig, GenerationError, Grid, Mesh, Outline, Room,
    RoomGraph, Seed,
};
use delve_system_layout::{random_seed, Layout, LayoutGenerator};
use delve_system_marching_squares::triangulate;
use delve_system_outline::trace_outlines;
use delve_system_regions::{Passage, PruneReport};

/// Complete result of one generation pass.
#[derive(Clone, Debug, PartialEq)]
pub struct Dungeon {
    config: GenerationConfig,
    seed: Seed,
    grid: Grid,
    rooms: Vec<Room>,
    cave_rooms: Vec<CaveRoom>,
    room_graph: RoomGraph,
    passages: Vec<Passage>,
    pruning: PruneReport,
    mesh: Mesh,
    outlines: Vec<Outline>,
}

impl Dungeon {
    /// Configuration that reproduces the dungeon. The seed is always resolved.
    #[must_use]
    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    /// Seed the dungeon was generated from.
    #[must_use]
    pub fn seed(&self) -> &Seed {
        &self.seed
    }

    /// Finished occupancy grid, without mesh padding.
    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Rectangular rooms in placement order.
    #[must_use]
    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    /// Open regions that survived pruning, largest first.
    #[must_use]
    pub fn cave_rooms(&self) -> &[CaveRoom] {
        &self.cave_rooms
    }

    /// Connections between cave rooms.
    #[must_use]
    pub fn room_graph(&self) -> &RoomGraph {
        &self.room_graph
    }

    /// Passages carved between cave rooms.
    #[must_use]
    pub fn passages(&self) -> &[Passage] {
        &self.passages
    }

    /// Regions removed while pruning.
    #[must_use]
    pub fn pruning(&self) -> PruneReport {
        self.pruning
    }

    /// Wall surface mesh of the padded grid.
    #[must_use]
    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    /// Closed outlines traced from the mesh.
    #[must_use]
    pub fn outlines(&self) -> &[Outline] {
        &self.outlines
    }

    /// Solid rings added around the grid before triangulation.
    #[must_use]
    pub fn mesh_padding(&self) -> u32 {
        self.config.mesh_padding
    }

    /// Headline counts describing the dungeon.
    #[must_use]
    pub fn summary(&self) -> DungeonSummary {
        DungeonSummary {
            width: self.grid.width(),
            height: self.grid.height(),
            rooms: self.rooms.len(),
            cave_rooms: self.cave_rooms.len(),
            solid_cells: self.grid.count(delve_core::Cell::Solid),
            vertices: self.mesh.vertex_count(),
            triangles: self.mesh.triangle_count(),
            outlines: self.outlines.len(),
        }
    }
}

/// Runs a full generation pass.
///
/// A fresh seed is drawn when the configuration carries none; the returned
/// dungeon's configuration always records the seed that was used.
pub fn generate(config: &GenerationConfig) -> Result<Dungeon, GenerationError> {
    let generator = LayoutGenerator::new(config.clone())?;
    let seed = config.seed.clone().unwrap_or_else(random_seed);
    let layout = generator.generate(&seed);
    assemble(generator.config().clone(), seed, layout)
}

/// Re-rolls the cave fill of an existing dungeon while keeping its rooms and seed.
pub fn regenerate_fill(dungeon: &Dungeon, fill_percent: u8) -> Result<Dungeon, GenerationError> {
    let config = GenerationConfig {
        fill_percent,
        ..dungeon.config.clone()
    };
    let generator = LayoutGenerator::new(config)?;
    let layout = generator.regenerate_fill(&dungeon.seed, &dungeon.rooms);
    assemble(generator.config().clone(), dungeon.seed.clone(), layout)
}

fn assemble(
    mut config: GenerationConfig,
    seed: Seed,
    layout: Layout,
) -> Result<Dungeon, GenerationError> {
    let padded = layout.grid.with_border(config.mesh_padding);
    let mesh = triangulate(&padded, config.square_size)?;
    let outlines = trace_outlines(&mesh)?;
    config.seed = Some(seed.clone());

    Ok(Dungeon {
        config,
        seed,
        grid: layout.grid,
        rooms: layout.rooms,
        cave_rooms: layout.cave_rooms,
        room_graph: layout.room_graph,
        passages: layout.passages,
        pruning: layout.pruning,
        mesh,
        outlines,
    })
}
