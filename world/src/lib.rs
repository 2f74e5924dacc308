#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative dungeon state management for Delve.

mod dungeon;

use delve_core::{Command, Event, GenerationError};

pub use dungeon::{generate, regenerate_fill, Dungeon};

/// Represents the authoritative Delve world state.
#[derive(Debug, Default)]
pub struct World {
    dungeon: Option<Dungeon>,
    ready: bool,
    passes: u64,
}

impl World {
    /// Creates an empty world that has not generated a dungeon yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn publish(&mut self, dungeon: Dungeon) {
        self.dungeon = Some(dungeon);
        self.ready = true;
        self.passes = self.passes.saturating_add(1);
    }
}

/// Applies the provided command to the world.
///
/// A failed pass leaves the previously published dungeon untouched and emits
/// [`Event::GenerationRejected`].
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Generate { config } => match dungeon::generate(&config) {
            Ok(dungeon) => {
                let seed = dungeon.seed().clone();
                let summary = dungeon.summary();
                world.publish(dungeon);
                log::info!(
                    "generated {}x{} dungeon from seed {seed}: {} rooms, {} outlines",
                    summary.width,
                    summary.height,
                    summary.rooms,
                    summary.outlines,
                );
                out_events.push(Event::DungeonGenerated { seed, summary });
            }
            Err(error) => reject(error, out_events),
        },
        Command::RegenerateFill { fill_percent } => {
            if !world.ready {
                reject(GenerationError::NotReady, out_events);
                return;
            }
            let Some(current) = world.dungeon.as_ref() else {
                reject(GenerationError::NothingToRegenerate, out_events);
                return;
            };

            match dungeon::regenerate_fill(current, fill_percent) {
                Ok(dungeon) => {
                    let seed = dungeon.seed().clone();
                    let summary = dungeon.summary();
                    world.publish(dungeon);
                    log::info!(
                        "regenerated fill at {fill_percent}% for seed {seed}: {} cave rooms",
                        summary.cave_rooms,
                    );
                    out_events.push(Event::FillRegenerated { seed, summary });
                }
                Err(error) => reject(error, out_events),
            }
        }
    }
}

fn reject(error: GenerationError, out_events: &mut Vec<Event>) {
    log::warn!("generation rejected: {error}");
    out_events.push(Event::GenerationRejected { error });
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::{Dungeon, World};
    use delve_core::{CaveRoom, DungeonSummary, Grid, Mesh, Outline, Room, RoomGraph, Seed};

    /// Currently published dungeon, if any pass has succeeded.
    #[must_use]
    pub fn dungeon(world: &World) -> Option<&Dungeon> {
        world.dungeon.as_ref()
    }

    /// Reports whether a dungeon has been generated and fill regeneration is allowed.
    #[must_use]
    pub fn is_ready(world: &World) -> bool {
        world.ready
    }

    /// Number of passes that replaced the published dungeon.
    #[must_use]
    pub fn completed_passes(world: &World) -> u64 {
        world.passes
    }

    /// Occupancy grid of the published dungeon.
    #[must_use]
    pub fn grid(world: &World) -> Option<&Grid> {
        dungeon(world).map(Dungeon::grid)
    }

    /// Rectangular rooms of the published dungeon.
    #[must_use]
    pub fn rooms(world: &World) -> &[Room] {
        dungeon(world).map(Dungeon::rooms).unwrap_or(&[])
    }

    /// Cave rooms of the published dungeon.
    #[must_use]
    pub fn cave_rooms(world: &World) -> &[CaveRoom] {
        dungeon(world).map(Dungeon::cave_rooms).unwrap_or(&[])
    }

    /// Room graph of the published dungeon.
    #[must_use]
    pub fn room_graph(world: &World) -> Option<&RoomGraph> {
        dungeon(world).map(Dungeon::room_graph)
    }

    /// Wall surface mesh of the published dungeon.
    #[must_use]
    pub fn mesh(world: &World) -> Option<&Mesh> {
        dungeon(world).map(Dungeon::mesh)
    }

    /// Outlines of the published dungeon.
    #[must_use]
    pub fn outlines(world: &World) -> &[Outline] {
        dungeon(world).map(Dungeon::outlines).unwrap_or(&[])
    }

    /// Seed of the published dungeon.
    #[must_use]
    pub fn seed(world: &World) -> Option<&Seed> {
        dungeon(world).map(Dungeon::seed)
    }

    /// Headline counts of the published dungeon.
    #[must_use]
    pub fn summary(world: &World) -> Option<DungeonSummary> {
        dungeon(world).map(Dungeon::summary)
    }
}
