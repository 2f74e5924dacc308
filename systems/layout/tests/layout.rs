use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use delve_core::{
    Cell, CellCoord, CellRect, CellRectSize, GenerationConfig, Grid, RoomKind, RoomSizeRange, Seed,
};
use delve_system_layout::{Layout, LayoutGenerator};
use delve_system_regions::{prune_regions, PruneThresholds};

fn generator(config: GenerationConfig) -> LayoutGenerator {
    LayoutGenerator::new(config).expect("valid configuration")
}

fn medium_config() -> GenerationConfig {
    GenerationConfig {
        width: 64,
        height: 48,
        room_size: RoomSizeRange::new(5, 10),
        room_attempts: 10,
        ..GenerationConfig::default()
    }
}

fn fingerprint(layout: &Layout) -> u64 {
    let mut hasher = DefaultHasher::new();
    layout.grid.hash(&mut hasher);
    for room in &layout.rooms {
        room.rect().hash(&mut hasher);
        room.kind().hash(&mut hasher);
    }
    layout.cave_rooms.len().hash(&mut hasher);
    hasher.finish()
}

fn border_is_solid(grid: &Grid) -> bool {
    grid.coords()
        .filter(|cell| grid.is_border(*cell))
        .all(|cell| grid.is_solid(cell))
}

#[test]
fn same_seed_produces_identical_layouts() {
    let generator = generator(medium_config());
    let seed = Seed::from("determinism");

    let first = generator.generate(&seed);
    let second = generator.generate(&seed);

    assert_eq!(first, second);
    assert_eq!(fingerprint(&first), fingerprint(&second));
}

#[test]
fn different_seeds_diverge() {
    let generator = generator(medium_config());
    let first = generator.generate(&Seed::number(1));
    let second = generator.generate(&Seed::number(2));
    assert_ne!(first.grid, second.grid);
}

#[test]
fn border_ring_is_always_solid() {
    for seed in 0..10 {
        for fill_percent in [0, 30, 45, 60, 100] {
            let config = GenerationConfig {
                fill_percent,
                connect_regions: seed % 2 == 0,
                ..medium_config()
            };
            let layout = generator(config).generate(&Seed::number(seed));
            assert!(border_is_solid(&layout.grid), "seed {seed} fill {fill_percent}");
        }
    }
}

#[test]
fn rooms_never_touch_each_other() {
    for seed in 0..10 {
        let layout = generator(medium_config()).generate(&Seed::number(seed));
        for (index, room) in layout.rooms.iter().enumerate() {
            for other in &layout.rooms[index + 1..] {
                assert!(
                    !room.rect().intersects_with_halo(&other.rect(), 1),
                    "seed {seed}: {:?} touches {:?}",
                    room.rect(),
                    other.rect()
                );
            }
        }
    }
}

#[test]
fn room_cells_survive_smoothing_and_pruning() {
    for seed in 0..10 {
        let layout = generator(medium_config()).generate(&Seed::number(seed));
        for room in &layout.rooms {
            for cell in room.rect().cells() {
                assert_eq!(layout.grid.get(cell), Some(Cell::Open), "seed {seed} {cell:?}");
                assert!(layout.grid.is_protected(cell));
            }
        }
    }
}

#[test]
fn pruning_a_finished_layout_changes_nothing() {
    let config = medium_config();
    let thresholds = PruneThresholds::new(config.min_wall_region, config.min_room_region);
    for seed in 0..6 {
        let mut layout = generator(config.clone()).generate(&Seed::number(seed));
        let before = layout.grid.clone();
        let report = prune_regions(&mut layout.grid, thresholds);
        assert!(report.is_noop(), "seed {seed}: {report:?}");
        assert_eq!(layout.grid, before);
    }
}

#[test]
fn anchored_room_on_small_grid_is_kept_open() {
    let rect = CellRect::from_origin_and_size(CellCoord::new(6, 6), CellRectSize::new(8, 8));
    let config = GenerationConfig {
        width: 20,
        height: 20,
        fill_percent: 45,
        room_size: RoomSizeRange::new(8, 8),
        room_attempts: 0,
        anchored_rooms: vec![rect],
        ..GenerationConfig::default()
    };

    let layout = generator(config).generate(&Seed::from("test"));

    assert_eq!(layout.rooms.len(), 1);
    assert_eq!(layout.rooms[0].rect(), rect);
    assert_eq!(layout.rooms[0].kind(), RoomKind::Entrance);
    assert!(rect.cells().all(|cell| layout.grid.get(cell) == Some(Cell::Open)));
}

#[test]
fn empty_fill_leaves_the_whole_interior_open() {
    let config = GenerationConfig {
        width: 24,
        height: 18,
        fill_percent: 0,
        room_size: RoomSizeRange::new(4, 6),
        ..GenerationConfig::default()
    };

    let layout = generator(config).generate(&Seed::number(9));

    assert_eq!(layout.grid.count(Cell::Solid), 2 * 24 + 2 * 16);
    assert_eq!(layout.cave_rooms.len(), 1);
}

#[test]
fn full_fill_without_rooms_or_smoothing_is_solid() {
    let config = GenerationConfig {
        width: 20,
        height: 20,
        fill_percent: 100,
        room_size: RoomSizeRange::new(4, 6),
        room_attempts: 0,
        smoothing_passes: 0,
        ..GenerationConfig::default()
    };

    let layout = generator(config).generate(&Seed::number(1));

    assert_eq!(layout.grid.count(Cell::Open), 0);
    assert!(layout.rooms.is_empty());
    assert!(layout.cave_rooms.is_empty());
}

#[test]
fn regenerating_fill_keeps_rooms() {
    let base = medium_config();
    let seed = Seed::from("regen");
    let original = generator(base.clone()).generate(&seed);

    let denser = GenerationConfig {
        fill_percent: 60,
        ..base
    };
    let regenerated = generator(denser).regenerate_fill(&seed, &original.rooms);

    assert_eq!(regenerated.rooms, original.rooms);
    for room in &regenerated.rooms {
        assert!(room
            .rect()
            .cells()
            .all(|cell| regenerated.grid.get(cell) == Some(Cell::Open)));
    }
    assert!(border_is_solid(&regenerated.grid));
}

#[test]
fn connecting_regions_reaches_every_cave_room() {
    let config = GenerationConfig {
        connect_regions: true,
        min_room_region: 1,
        fill_percent: 50,
        ..medium_config()
    };
    let thresholds = PruneThresholds::new(config.min_wall_region, config.min_room_region);
    let generator = generator(config);
    let mut carved = 0;

    for seed in 0..24 {
        let mut layout = generator.generate(&Seed::number(seed));

        assert!(layout.cave_rooms.iter().all(|room| room.accessible), "seed {seed}");
        assert!(layout.cave_rooms.len() <= 1, "seed {seed}: {} rooms", layout.cave_rooms.len());
        assert_eq!(layout.room_graph.room_count(), layout.cave_rooms.len());
        for passage in &layout.passages {
            assert_eq!(layout.grid.get(passage.from), Some(Cell::Open));
            assert_eq!(layout.grid.get(passage.to), Some(Cell::Open));
        }
        carved += layout.passages.len();

        let before = layout.grid.clone();
        let report = prune_regions(&mut layout.grid, thresholds);
        assert!(report.is_noop(), "seed {seed}: {report:?}");
        assert_eq!(layout.grid, before);
    }

    assert!(carved > 0);
}
