use delve_core::{
    Cell, CellCoord, CellRect, CellRectSize, Command, ConfigError, Event, GenerationConfig,
    GenerationError, RoomSizeRange, Seed,
};
use delve_system_outline::TriangleIndex;
use delve_world::{self as world, query, World};

fn small_config(seed: Seed) -> GenerationConfig {
    GenerationConfig {
        width: 40,
        height: 30,
        seed: Some(seed),
        room_size: RoomSizeRange::new(4, 8),
        ..GenerationConfig::default()
    }
}

fn generate(world: &mut World, config: GenerationConfig) -> Vec<Event> {
    let mut events = Vec::new();
    world::apply(world, Command::Generate { config }, &mut events);
    events
}

#[test]
fn anchored_room_scenario_yields_one_open_room_and_outlines() {
    let rect = CellRect::from_origin_and_size(CellCoord::new(6, 6), CellRectSize::new(8, 8));
    let config = GenerationConfig {
        width: 20,
        height: 20,
        seed: Some(Seed::from("test")),
        fill_percent: 45,
        room_size: RoomSizeRange::new(8, 8),
        room_attempts: 0,
        anchored_rooms: vec![rect],
        ..GenerationConfig::default()
    };

    let dungeon = world::generate(&config).expect("generate");

    assert_eq!(dungeon.rooms().len(), 1);
    assert!(rect.cells().all(|cell| dungeon.grid().get(cell) == Some(Cell::Open)));
    assert!(!dungeon.outlines().is_empty());
}

#[test]
fn empty_fill_yields_a_single_outline() {
    let config = GenerationConfig {
        fill_percent: 0,
        ..small_config(Seed::number(3))
    };

    let dungeon = world::generate(&config).expect("generate");

    assert_eq!(dungeon.outlines().len(), 1);
}

/// A fully solid grid still emits its configuration-15 roof quads over the
/// padded grid, so the mesh is non-empty even though no outline is traced.
#[test]
fn full_fill_without_smoothing_has_no_outlines() {
    let config = GenerationConfig {
        width: 20,
        height: 20,
        fill_percent: 100,
        room_attempts: 0,
        smoothing_passes: 0,
        ..small_config(Seed::number(3))
    };

    let dungeon = world::generate(&config).expect("generate");
    let mesh = dungeon.mesh();

    assert!(dungeon.outlines().is_empty());
    assert_eq!(mesh.vertex_count(), 22 * 22);
    assert_eq!(mesh.triangle_count(), 2 * 21 * 21);
    assert!((0..mesh.vertex_count() as u32).all(|vertex| mesh.is_interior(vertex)));
}

#[test]
fn generated_outlines_follow_boundary_edges() {
    for seed in 0..5 {
        let dungeon = world::generate(&small_config(Seed::number(seed))).expect("generate");
        let index = TriangleIndex::build(dungeon.mesh()).expect("index");

        for outline in dungeon.outlines() {
            assert!(outline.is_closed());
            assert!(outline.segments().all(|(a, b)| index.is_boundary_edge(a, b)));
        }
        for triangle in dungeon.mesh().triangles() {
            for (a, b) in triangle.edges() {
                let shared = index.shared_triangle_count(a, b);
                assert!(shared == 1 || shared == 2);
            }
        }
    }
}

#[test]
fn unpadded_mesh_is_rejected_before_generation() {
    let config = GenerationConfig {
        mesh_padding: 0,
        ..small_config(Seed::number(0))
    };

    assert_eq!(
        world::generate(&config).err(),
        Some(GenerationError::Config(ConfigError::ZeroMeshPadding))
    );
}

#[test]
fn accepted_configurations_always_trace() {
    for mesh_padding in 1..=2 {
        for fill_percent in [0, 30, 45, 60] {
            for seed in 0..10 {
                let config = GenerationConfig {
                    fill_percent,
                    mesh_padding,
                    ..small_config(Seed::number(seed))
                };

                let dungeon = world::generate(&config).unwrap_or_else(|error| {
                    panic!("seed {seed} fill {fill_percent} padding {mesh_padding}: {error}")
                });
                for outline in dungeon.outlines() {
                    let distinct: std::collections::HashSet<_> =
                        outline.vertices().iter().collect();
                    assert!(outline.is_closed());
                    assert!(distinct.len() >= 3, "{outline:?}");
                }
            }
        }
    }
}

#[test]
fn missing_seed_is_resolved_and_reported() {
    let config = GenerationConfig {
        seed: None,
        ..small_config(Seed::number(0))
    };

    let dungeon = world::generate(&config).expect("generate");

    assert_eq!(dungeon.config().seed.as_ref(), Some(dungeon.seed()));
    let replayed = world::generate(dungeon.config()).expect("replay");
    assert_eq!(replayed.grid(), dungeon.grid());
}

#[test]
fn regenerate_fill_before_first_generation_is_rejected() {
    let mut world = World::new();
    let mut events = Vec::new();

    world::apply(
        &mut world,
        Command::RegenerateFill { fill_percent: 40 },
        &mut events,
    );

    assert_eq!(
        events,
        vec![Event::GenerationRejected {
            error: GenerationError::NotReady
        }]
    );
    assert!(query::dungeon(&world).is_none());
}

#[test]
fn regenerate_fill_keeps_rooms_and_seed() {
    let mut world = World::new();
    let _ = generate(&mut world, small_config(Seed::from("regen")));
    let rooms_before = query::rooms(&world).to_vec();
    let seed_before = query::seed(&world).cloned();

    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::RegenerateFill { fill_percent: 58 },
        &mut events,
    );

    assert!(matches!(events.as_slice(), [Event::FillRegenerated { .. }]));
    assert_eq!(query::rooms(&world), rooms_before.as_slice());
    assert_eq!(query::seed(&world).cloned(), seed_before);
    let dungeon = query::dungeon(&world).expect("dungeon");
    assert_eq!(dungeon.config().fill_percent, 58);
    for room in query::rooms(&world) {
        assert!(room
            .rect()
            .cells()
            .all(|cell| dungeon.grid().get(cell) == Some(Cell::Open)));
    }
}

#[test]
fn failed_pass_keeps_previous_dungeon() {
    let mut world = World::new();
    let _ = generate(&mut world, small_config(Seed::number(12)));
    let before = query::dungeon(&world).cloned();

    let events = generate(
        &mut world,
        GenerationConfig {
            room_size: RoomSizeRange::new(10, 2),
            ..small_config(Seed::number(13))
        },
    );

    assert_eq!(
        events,
        vec![Event::GenerationRejected {
            error: GenerationError::Config(ConfigError::RoomRangeInverted { min: 10, max: 2 })
        }]
    );
    assert_eq!(query::dungeon(&world).cloned(), before);
    assert!(query::is_ready(&world));

    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::RegenerateFill { fill_percent: 101 },
        &mut events,
    );
    assert_eq!(
        events,
        vec![Event::GenerationRejected {
            error: GenerationError::Config(ConfigError::FillPercentOutOfRange(101))
        }]
    );
    assert_eq!(query::dungeon(&world).cloned(), before);
}

#[test]
fn each_generation_replaces_the_previous_dungeon() {
    let mut world = World::new();
    let _ = generate(&mut world, small_config(Seed::number(1)));
    let _ = generate(&mut world, small_config(Seed::number(2)));

    assert_eq!(query::completed_passes(&world), 2);
    assert_eq!(query::seed(&world), Some(&Seed::number(2)));
    let summary = query::summary(&world).expect("summary");
    assert_eq!(summary.outlines, query::outlines(&world).len());
    assert_eq!(summary.rooms, query::rooms(&world).len());
}

#[test]
fn connected_regions_are_all_accessible() {
    let config = GenerationConfig {
        connect_regions: true,
        min_room_region: 1,
        ..small_config(Seed::number(21))
    };

    let dungeon = world::generate(&config).expect("generate");

    assert!(dungeon.cave_rooms().iter().all(|room| room.accessible));
    assert_eq!(
        dungeon.room_graph().room_count(),
        dungeon.cave_rooms().len()
    );
}
