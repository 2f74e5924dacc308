use std::collections::HashSet;

use delve_core::{Cell, CellCoord, GenerationConfig, Grid, Mesh, Outline, RoomSizeRange, Seed};
use delve_system_layout::LayoutGenerator;
use delve_system_marching_squares::triangulate;
use delve_system_outline::{trace_outlines, TriangleIndex};

fn open_interior(width: u32, height: u32) -> Grid {
    let mut grid = Grid::solid(width, height);
    for cell in grid.coords().collect::<Vec<_>>() {
        if !grid.is_border(cell) {
            grid.set(cell, Cell::Open);
        }
    }
    grid
}

fn mesh_of(grid: &Grid) -> Mesh {
    triangulate(&grid.with_border(1), 1.0).expect("triangulate")
}

fn assert_closed_along_boundary(mesh: &Mesh, outlines: &[Outline]) {
    let index = TriangleIndex::build(mesh).expect("index");
    for outline in outlines {
        assert!(outline.is_closed(), "{outline:?}");
        for (a, b) in outline.segments() {
            assert!(index.is_boundary_edge(a, b), "segment {a}-{b} is not a boundary edge");
        }
    }
}

#[test]
fn open_interior_has_exactly_one_outline() {
    let mesh = mesh_of(&open_interior(20, 20));
    let outlines = trace_outlines(&mesh).expect("trace");

    assert_eq!(outlines.len(), 1);
    assert_closed_along_boundary(&mesh, &outlines);
}

#[test]
fn solid_grid_has_no_outlines() {
    let mesh = mesh_of(&Grid::solid(20, 20));
    let outlines = trace_outlines(&mesh).expect("trace");

    assert!(outlines.is_empty());
    assert_eq!(mesh.triangle_count(), 2 * 21 * 21);
}

#[test]
fn pillar_adds_a_second_outline() {
    let mut grid = open_interior(16, 16);
    for (column, row) in [(7, 7), (8, 7), (7, 8), (8, 8)] {
        grid.set(CellCoord::new(column, row), Cell::Solid);
    }

    let mesh = mesh_of(&grid);
    let outlines = trace_outlines(&mesh).expect("trace");

    assert_eq!(outlines.len(), 2);
    assert_closed_along_boundary(&mesh, &outlines);
}

#[test]
fn lone_wall_cell_traces_its_midpoints() {
    let mut grid = Grid::solid(3, 3);
    for cell in grid.coords().collect::<Vec<_>>() {
        grid.set(cell, Cell::Open);
    }
    grid.set(CellCoord::new(1, 1), Cell::Solid);

    let mesh = triangulate(&grid, 1.0).expect("triangulate");
    let outlines = trace_outlines(&mesh).expect("trace");

    assert_eq!(outlines.len(), 1);
    assert_eq!(outlines[0].len(), 5);
    assert!(!outlines[0].vertices().contains(&0));
}

#[test]
fn every_edge_is_shared_by_one_or_two_triangles() {
    let mut grid = open_interior(18, 14);
    for (column, row) in [(3, 3), (4, 3), (9, 6), (10, 7), (14, 10), (5, 11), (6, 10)] {
        grid.set(CellCoord::new(column, row), Cell::Solid);
    }
    let mesh = mesh_of(&grid);
    let index = TriangleIndex::build(&mesh).expect("index");

    for triangle in mesh.triangles() {
        for (a, b) in triangle.edges() {
            let shared = index.shared_triangle_count(a, b);
            assert!(shared == 1 || shared == 2, "edge {a}-{b} shared by {shared}");
        }
    }
}

#[test]
fn outlines_never_share_vertices() {
    let mut grid = open_interior(24, 18);
    for (column, row) in [(5, 5), (6, 5), (12, 9), (18, 4), (18, 5), (19, 5)] {
        grid.set(CellCoord::new(column, row), Cell::Solid);
    }
    let mesh = mesh_of(&grid);
    let outlines = trace_outlines(&mesh).expect("trace");

    let mut seen = HashSet::new();
    for outline in &outlines {
        let body = &outline.vertices()[..outline.len() - 1];
        for vertex in body {
            assert!(seen.insert(*vertex), "vertex {vertex} traced twice");
            assert!(!mesh.is_interior(*vertex));
        }
    }
    assert_eq!(outlines.len(), 4);
}

fn distinct_vertices(outline: &Outline) -> usize {
    outline.vertices().iter().collect::<HashSet<_>>().len()
}

#[test]
fn generated_layouts_trace_cleanly_at_every_padding() {
    for fill_percent in [0, 30, 45, 60, 100] {
        for connect_regions in [false, true] {
            let config = GenerationConfig {
                width: 40,
                height: 30,
                fill_percent,
                room_size: RoomSizeRange::new(4, 8),
                connect_regions,
                ..GenerationConfig::default()
            };
            let generator = LayoutGenerator::new(config).expect("valid configuration");

            for seed in 0..12 {
                let layout = generator.generate(&Seed::number(seed));
                for padding in 1..=3 {
                    let mesh = triangulate(&layout.grid.with_border(padding), 1.0)
                        .expect("triangulate");
                    let outlines = trace_outlines(&mesh).unwrap_or_else(|error| {
                        panic!("seed {seed} fill {fill_percent} padding {padding}: {error}")
                    });

                    assert_closed_along_boundary(&mesh, &outlines);
                    for outline in &outlines {
                        assert!(
                            distinct_vertices(outline) >= 3,
                            "seed {seed} fill {fill_percent} padding {padding}: {outline:?}"
                        );
                    }
                }
            }
        }
    }
}
