#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Marching-squares triangulation of the wall surface.
//!
//! Every grid cell owns a control node at its centre plus two midpoint nodes,
//! one half a square above it and one half a square to its right. Each 2×2
//! block of control nodes forms a square whose solid corners select one of
//! sixteen polygons. Polygons are fan-triangulated and share vertices through
//! the node they were emitted from.

use delve_core::{CellCoord, Grid, Mesh, MeshError, Triangle, WorldPoint};

/// Point of a marching square, in the order used by the lookup table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Point {
    TopLeft,
    TopRight,
    BottomRight,
    BottomLeft,
    CentreTop,
    CentreRight,
    CentreBottom,
    CentreLeft,
}

use Point::{
    BottomLeft as BL, BottomRight as BR, CentreBottom as CB, CentreLeft as CL,
    CentreRight as CR, CentreTop as CT, TopLeft as TL, TopRight as TR,
};

/// Polygon emitted for each configuration `8·TL + 4·TR + 2·BR + 1·BL`.
const CONFIGURATIONS: [&[Point]; 16] = [
    &[],
    &[CL, CB, BL],
    &[BR, CB, CR],
    &[CR, BR, BL, CL],
    &[TR, CR, CT],
    &[CT, TR, CR, CB, BL, CL],
    &[CT, TR, BR, CB],
    &[CT, TR, BR, BL, CL],
    &[TL, CT, CL],
    &[TL, CT, CB, BL],
    &[TL, CT, CR, BR, CB, CL],
    &[TL, CT, CR, BR, BL],
    &[TL, TR, CR, CL],
    &[TL, TR, CR, CB, BL],
    &[TL, TR, BR, CB, CL],
    &[TL, TR, BR, BL],
];

const FULL: usize = 15;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum NodeKind {
    Control = 0,
    Above = 1,
    Right = 2,
}

/// Triangulates the solid area of the grid.
///
/// Node positions are centred on the grid: the control node of cell
/// `(column, row)` sits at `x = -W/2 + column·s + s/2`, `z = -H/2 + row·s + s/2`
/// where `W` and `H` are the grid's extent in world units.
pub fn triangulate(grid: &Grid, square_size: f32) -> Result<Mesh, MeshError> {
    let layout = NodeLayout::new(grid, square_size);
    let mut builder = MeshBuilder::new(layout.node_count());

    for row in 0..grid.height().saturating_sub(1) {
        for column in 0..grid.width().saturating_sub(1) {
            let configuration = configuration(grid, column, row);
            let points = CONFIGURATIONS[configuration];
            if points.is_empty() {
                continue;
            }

            let mut nodes = [0_usize; 6];
            for (slot, point) in nodes.iter_mut().zip(points) {
                *slot = layout.node_of(column, row, *point);
            }
            let nodes = &nodes[..points.len()];

            builder.add_polygon(&layout, nodes, column, row)?;
            if configuration == FULL {
                builder.mark_interior(nodes);
            }
        }
    }

    let mesh = builder.finish();
    log::debug!(
        "triangulated {}x{} grid into {} vertices and {} triangles",
        grid.width(),
        grid.height(),
        mesh.vertex_count(),
        mesh.triangle_count(),
    );
    Ok(mesh)
}

fn configuration(grid: &Grid, column: u32, row: u32) -> usize {
    let solid = |column, row| usize::from(grid.is_solid(CellCoord::new(column, row)));
    8 * solid(column, row + 1)
        + 4 * solid(column + 1, row + 1)
        + 2 * solid(column + 1, row)
        + solid(column, row)
}

#[derive(Clone, Copy, Debug)]
struct NodeLayout {
    width: u32,
    height: u32,
    square_size: f32,
}

impl NodeLayout {
    fn new(grid: &Grid, square_size: f32) -> Self {
        Self {
            width: grid.width(),
            height: grid.height(),
            square_size,
        }
    }

    fn node_count(&self) -> usize {
        (self.width as usize) * (self.height as usize) * 3
    }

    fn node_id(&self, column: u32, row: u32, kind: NodeKind) -> usize {
        ((row as usize) * (self.width as usize) + column as usize) * 3 + kind as usize
    }

    fn node_of(&self, column: u32, row: u32, point: Point) -> usize {
        match point {
            Point::TopLeft => self.node_id(column, row + 1, NodeKind::Control),
            Point::TopRight => self.node_id(column + 1, row + 1, NodeKind::Control),
            Point::BottomRight => self.node_id(column + 1, row, NodeKind::Control),
            Point::BottomLeft => self.node_id(column, row, NodeKind::Control),
            Point::CentreTop => self.node_id(column, row + 1, NodeKind::Right),
            Point::CentreRight => self.node_id(column + 1, row, NodeKind::Above),
            Point::CentreBottom => self.node_id(column, row, NodeKind::Right),
            Point::CentreLeft => self.node_id(column, row, NodeKind::Above),
        }
    }

    fn position(&self, node: usize) -> WorldPoint {
        let cell = node / 3;
        let width = (self.width as usize).max(1);
        let column = (cell % width) as f32;
        let row = (cell / width) as f32;
        let size = self.square_size;
        let half = size / 2.0;
        let x = -(self.width as f32 * size) / 2.0 + column * size + half;
        let z = -(self.height as f32 * size) / 2.0 + row * size + half;

        match node % 3 {
            1 => WorldPoint::new(x, 0.0, z + half),
            2 => WorldPoint::new(x + half, 0.0, z),
            _ => WorldPoint::new(x, 0.0, z),
        }
    }
}

#[derive(Debug)]
struct MeshBuilder {
    vertex_of_node: Vec<Option<u32>>,
    vertices: Vec<WorldPoint>,
    triangles: Vec<Triangle>,
    interior: Vec<bool>,
}

impl MeshBuilder {
    fn new(node_count: usize) -> Self {
        Self {
            vertex_of_node: vec![None; node_count],
            vertices: Vec::new(),
            triangles: Vec::new(),
            interior: Vec::new(),
        }
    }

    fn add_polygon(
        &mut self,
        layout: &NodeLayout,
        nodes: &[usize],
        column: u32,
        row: u32,
    ) -> Result<(), MeshError> {
        for node in nodes {
            if self.vertex_of_node[*node].is_none() {
                let index = u32::try_from(self.vertices.len())
                    .map_err(|_| MeshError::UnassignedVertex { column, row })?;
                self.vertex_of_node[*node] = Some(index);
                self.vertices.push(layout.position(*node));
                self.interior.push(false);
            }
        }

        let assigned = &self.vertex_of_node;
        let vertex =
            |node: usize| assigned[node].ok_or(MeshError::UnassignedVertex { column, row });
        for pair in nodes[1..].windows(2) {
            let triangle = Triangle::new(vertex(nodes[0])?, vertex(pair[0])?, vertex(pair[1])?);
            self.triangles.push(triangle);
        }
        Ok(())
    }

    fn mark_interior(&mut self, nodes: &[usize]) {
        for node in nodes {
            if let Some(vertex) = self.vertex_of_node[*node] {
                self.interior[vertex as usize] = true;
            }
        }
    }

    fn finish(self) -> Mesh {
        Mesh::from_parts(self.vertices, self.triangles, self.interior)
    }
}
