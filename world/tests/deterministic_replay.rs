use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
};

use delve_core::{Command, DungeonSummary, Event, GenerationConfig, RoomSizeRange, Seed};
use delve_world::{self as world, query, World};

#[test]
fn deterministic_replay_produces_identical_snapshots() {
    let first = replay(scripted_commands());
    let second = replay(scripted_commands());

    assert_eq!(first, second, "replay diverged between runs");
    assert_eq!(first.fingerprint(), second.fingerprint());
    assert_eq!(first.events.len(), 5);
}

fn scripted_commands() -> Vec<Command> {
    let base = GenerationConfig {
        width: 48,
        height: 36,
        seed: Some(Seed::from("replay")),
        room_size: RoomSizeRange::new(5, 9),
        ..GenerationConfig::default()
    };

    vec![
        Command::RegenerateFill { fill_percent: 50 },
        Command::Generate {
            config: base.clone(),
        },
        Command::RegenerateFill { fill_percent: 55 },
        Command::Generate {
            config: GenerationConfig {
                connect_regions: true,
                seed: Some(Seed::number(77)),
                ..base
            },
        },
        Command::RegenerateFill { fill_percent: 40 },
    ]
}

fn replay(commands: Vec<Command>) -> ReplayOutcome {
    let mut world = World::new();
    let mut events = Vec::new();

    for command in commands {
        let mut emitted = Vec::new();
        world::apply(&mut world, command, &mut emitted);
        events.extend(emitted.into_iter().map(EventRecord::from));
    }

    let grid_rows = query::grid(&world)
        .map(|grid| {
            grid.rows()
                .map(|row| row.iter().map(|cell| cell.is_solid()).collect())
                .collect()
        })
        .unwrap_or_default();
    let outlines = query::outlines(&world)
        .iter()
        .map(|outline| outline.vertices().to_vec())
        .collect();

    ReplayOutcome {
        grid_rows,
        outlines,
        events,
    }
}

#[derive(Debug, PartialEq, Eq, Hash)]
struct ReplayOutcome {
    grid_rows: Vec<Vec<bool>>,
    outlines: Vec<Vec<u32>>,
    events: Vec<EventRecord>,
}

impl ReplayOutcome {
    fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.hash(&mut hasher);
        hasher.finish()
    }
}

#[derive(Debug, PartialEq, Eq, Hash)]
enum EventRecord {
    Generated { seed: String, summary: DungeonSummary },
    Regenerated { seed: String, summary: DungeonSummary },
    Rejected { reason: String },
}

impl From<Event> for EventRecord {
    fn from(event: Event) -> Self {
        match event {
            Event::DungeonGenerated { seed, summary } => Self::Generated {
                seed: seed.to_string(),
                summary,
            },
            Event::FillRegenerated { seed, summary } => Self::Regenerated {
                seed: seed.to_string(),
                summary,
            },
            Event::GenerationRejected { error } => Self::Rejected {
                reason: error.to_string(),
            },
        }
    }
}
