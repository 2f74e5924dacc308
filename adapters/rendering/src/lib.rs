#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Consumer-side geometry for Delve adapters.
//!
//! Converts the generator's mesh and outlines into render-ready buffers:
//! a coloured, textured wall-top surface, extruded wall quads or 2D edge
//! paths, and markers placed at room centres.

use std::{error::Error, fmt, io::Write};

use anyhow::{Context, Result as AnyResult};
use delve_core::{CellCoord, Grid, Mesh, Outline, Room, RoomId, RoomKind, WorldPoint};
use glam::{Vec2, Vec3};

/// Height of extruded walls in world units.
pub const DEFAULT_WALL_HEIGHT: f32 = 15.0;

/// Number of texture repeats across the padded grid.
pub const TEXTURE_TILES: f32 = 10.0;

/// Depth below the floor at which room markers are placed.
pub const MARKER_DEPTH: f32 = 4.0;

/// RGBA color used when presenting geometry.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }
}

/// Tint of wall-top vertices that border a carved room.
pub const ROOM_SURFACE_COLOR: Color = Color::new(1.0, 0.0, 0.0, 1.0);

/// Tint of every other wall-top vertex.
pub const WALL_SURFACE_COLOR: Color = Color::new(0.5, 0.5, 0.5, 1.0);

/// Marker tint for each room kind.
#[must_use]
pub const fn room_kind_color(kind: RoomKind) -> Color {
    match kind {
        RoomKind::Normal => Color::new(0.5, 0.5, 0.5, 1.0),
        RoomKind::Treasure => Color::new(1.0, 0.92, 0.016, 1.0),
        RoomKind::Boss => Color::new(1.0, 0.0, 0.0, 1.0),
        RoomKind::Shrine => Color::new(0.0, 1.0, 1.0, 1.0),
        RoomKind::Entrance => Color::new(0.0, 1.0, 0.0, 1.0),
    }
}

fn to_vec3(point: WorldPoint) -> Vec3 {
    Vec3::new(point.x, point.y, point.z)
}

fn inverse_lerp(from: f32, to: f32, value: f32) -> f32 {
    if (to - from).abs() <= f32::EPSILON {
        return 0.0;
    }
    ((value - from) / (to - from)).clamp(0.0, 1.0)
}

/// Grid and mesh data a scene is built from.
#[derive(Clone, Copy, Debug)]
pub struct SceneInput<'a> {
    /// Occupancy grid without mesh padding.
    pub grid: &'a Grid,
    /// Wall surface mesh of the padded grid.
    pub mesh: &'a Mesh,
    /// Outlines traced from the mesh.
    pub outlines: &'a [Outline],
    /// Rectangular rooms carved into the grid.
    pub rooms: &'a [Room],
    /// Solid rings added around the grid before triangulation.
    pub mesh_padding: u32,
    /// World-space edge length of one grid cell.
    pub square_size: f32,
}

/// Wall-top surface with per-vertex texture coordinates and colors.
#[derive(Clone, Debug, PartialEq)]
pub struct SurfaceMesh {
    /// Vertex positions.
    pub positions: Vec<Vec3>,
    /// Texture coordinates parallel to `positions`.
    pub uvs: Vec<Vec2>,
    /// Vertex colors parallel to `positions`.
    pub colors: Vec<Color>,
    /// Triangle list indices.
    pub indices: Vec<u32>,
}

impl SurfaceMesh {
    /// Builds the surface from the mesh, tinting vertices that sit on protected room cells.
    #[must_use]
    pub fn from_dungeon_parts(input: &SceneInput<'_>) -> Self {
        let size = input.square_size;
        let padded_width = (input.grid.width() + input.mesh_padding * 2) as f32 * size;
        let padded_height = (input.grid.height() + input.mesh_padding * 2) as f32 * size;
        let (half_width, half_height) = (padded_width / 2.0, padded_height / 2.0);

        let positions: Vec<Vec3> = input.mesh.vertices().iter().copied().map(to_vec3).collect();
        let uvs = positions
            .iter()
            .map(|position| {
                Vec2::new(
                    inverse_lerp(-half_width, half_width, position.x) * TEXTURE_TILES,
                    inverse_lerp(-half_height, half_height, position.z) * TEXTURE_TILES,
                )
            })
            .collect();
        let colors = positions
            .iter()
            .map(|position| {
                let column = ((position.x + half_width) / size).floor() - input.mesh_padding as f32;
                let row = ((position.z + half_height) / size).floor() - input.mesh_padding as f32;
                let in_room = column >= 0.0
                    && row >= 0.0
                    && input
                        .grid
                        .is_protected(CellCoord::new(column as u32, row as u32));
                if in_room {
                    ROOM_SURFACE_COLOR
                } else {
                    WALL_SURFACE_COLOR
                }
            })
            .collect();
        let indices = input
            .mesh
            .triangles()
            .iter()
            .flat_map(|triangle| triangle.indices())
            .collect();

        Self {
            positions,
            uvs,
            colors,
            indices,
        }
    }
}

/// Vertical wall quads hanging below every outline.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WallMesh {
    /// Vertex positions, four per outline segment.
    pub positions: Vec<Vec3>,
    /// Triangle list indices, six per outline segment.
    pub indices: Vec<u32>,
}

impl WallMesh {
    /// Extrudes each outline segment downwards by `wall_height`.
    ///
    /// Every segment contributes its two top vertices followed by the matching
    /// bottom vertices, joined by triangles `(0, 2, 3)` and `(3, 1, 0)`.
    pub fn extrude(mesh: &Mesh, outlines: &[Outline], wall_height: f32) -> Result<Self, RenderingError> {
        let mut walls = Self::default();
        let drop = Vec3::new(0.0, wall_height, 0.0);

        for outline in outlines {
            for (left, right) in outline.segments() {
                let top_left = to_vec3(vertex(mesh, left)?);
                let top_right = to_vec3(vertex(mesh, right)?);
                let start = u32::try_from(walls.positions.len())
                    .map_err(|_| RenderingError::TooManyVertices)?;

                walls.positions.extend([top_left, top_right, top_left - drop, top_right - drop]);
                walls.indices.extend([
                    start,
                    start + 2,
                    start + 3,
                    start + 3,
                    start + 1,
                    start,
                ]);
            }
        }

        Ok(walls)
    }
}

fn vertex(mesh: &Mesh, index: u32) -> Result<WorldPoint, RenderingError> {
    mesh.vertex(index)
        .ok_or(RenderingError::MissingVertex { vertex: index })
}

/// Outline projected onto the floor plane for 2D edge colliders.
#[derive(Clone, Debug, PartialEq)]
pub struct EdgePath {
    /// Points as `(x, z)` pairs, first point repeated at the end.
    pub points: Vec<Vec2>,
}

impl EdgePath {
    /// Projects every outline onto the `(x, z)` plane.
    pub fn from_outlines(mesh: &Mesh, outlines: &[Outline]) -> Result<Vec<Self>, RenderingError> {
        outlines
            .iter()
            .map(|outline| {
                let points = outline
                    .vertices()
                    .iter()
                    .map(|index| vertex(mesh, *index).map(|point| Vec2::new(point.x, point.z)))
                    .collect::<Result<_, _>>()?;
                Ok(Self { points })
            })
            .collect()
    }
}

/// Marker placed below a room's centre for decoration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RoomMarker {
    /// Room the marker belongs to.
    pub room: RoomId,
    /// Semantic tag of the room.
    pub kind: RoomKind,
    /// World-space position of the marker.
    pub position: Vec3,
    /// Tint derived from the room kind.
    pub color: Color,
}

impl RoomMarker {
    /// Creates a marker for every room.
    #[must_use]
    pub fn from_rooms(rooms: &[Room]) -> Vec<Self> {
        rooms
            .iter()
            .map(|room| Self {
                room: room.id(),
                kind: room.kind(),
                position: to_vec3(room.center()) - Vec3::new(0.0, MARKER_DEPTH, 0.0),
                color: room_kind_color(room.kind()),
            })
            .collect()
    }
}

/// How wall geometry is presented.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum WallMode {
    /// Vertical quads hanging below the outlines.
    #[default]
    Extruded,
    /// Flat `(x, z)` polylines following the outlines.
    EdgePaths,
}

/// Render-ready description of a dungeon.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Wall-top surface.
    pub surface: SurfaceMesh,
    /// Extruded walls, present in [`WallMode::Extruded`].
    pub walls: Option<WallMesh>,
    /// Edge paths, populated in [`WallMode::EdgePaths`].
    pub edges: Vec<EdgePath>,
    /// Room markers in room order.
    pub markers: Vec<RoomMarker>,
}

impl Scene {
    /// Builds a scene using the requested wall presentation.
    pub fn build(input: &SceneInput<'_>, mode: WallMode, wall_height: f32) -> Result<Self, RenderingError> {
        let surface = SurfaceMesh::from_dungeon_parts(input);
        let (walls, edges) = match mode {
            WallMode::Extruded => (
                Some(WallMesh::extrude(input.mesh, input.outlines, wall_height)?),
                Vec::new(),
            ),
            WallMode::EdgePaths => (None, EdgePath::from_outlines(input.mesh, input.outlines)?),
        };

        Ok(Self {
            surface,
            walls,
            edges,
            markers: RoomMarker::from_rooms(input.rooms),
        })
    }
}

/// Writes the scene as a Wavefront OBJ document.
pub fn write_obj<W: Write>(scene: &Scene, mut out: W) -> AnyResult<()> {
    writeln!(out, "o surface").context("failed to write surface header")?;
    for (position, uv) in scene.surface.positions.iter().zip(&scene.surface.uvs) {
        writeln!(out, "v {} {} {}", position.x, position.y, position.z)
            .context("failed to write surface vertex")?;
        writeln!(out, "vt {} {}", uv.x, uv.y).context("failed to write texture coordinate")?;
    }
    for face in scene.surface.indices.chunks_exact(3) {
        writeln!(
            out,
            "f {0}/{0} {1}/{1} {2}/{2}",
            face[0] + 1,
            face[1] + 1,
            face[2] + 1
        )
        .context("failed to write surface face")?;
    }

    let mut offset = scene.surface.positions.len() as u32;

    if let Some(walls) = &scene.walls {
        writeln!(out, "o walls").context("failed to write wall header")?;
        for position in &walls.positions {
            writeln!(out, "v {} {} {}", position.x, position.y, position.z)
                .context("failed to write wall vertex")?;
        }
        for face in walls.indices.chunks_exact(3) {
            writeln!(
                out,
                "f {} {} {}",
                face[0] + offset + 1,
                face[1] + offset + 1,
                face[2] + offset + 1
            )
            .context("failed to write wall face")?;
        }
        offset += walls.positions.len() as u32;
    }

    for (index, edge) in scene.edges.iter().enumerate() {
        writeln!(out, "o edge_{index}").context("failed to write edge header")?;
        for point in &edge.points {
            writeln!(out, "v {} 0 {}", point.x, point.y).context("failed to write edge vertex")?;
        }
        let line: Vec<String> = (0..edge.points.len() as u32)
            .map(|point| (point + offset + 1).to_string())
            .collect();
        writeln!(out, "l {}", line.join(" ")).context("failed to write edge polyline")?;
        offset += edge.points.len() as u32;
    }

    Ok(())
}

/// Errors that can occur when building render geometry.
#[derive(Debug, PartialEq, Eq)]
pub enum RenderingError {
    /// An outline referenced a vertex the mesh does not contain.
    MissingVertex {
        /// Offending vertex index.
        vertex: u32,
    },
    /// The wall mesh outgrew 32-bit indices.
    TooManyVertices,
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingVertex { vertex } => {
                write!(f, "outline references missing vertex {vertex}")
            }
            Self::TooManyVertices => f.write_str("wall mesh exceeds 32-bit vertex indices"),
        }
    }
}

impl Error for RenderingError {}
