//! Triangle mesh and outline contracts produced by the geometry systems.

use serde::{Deserialize, Serialize};

/// Point in centred world space. `y` is the vertical axis; the floor lies at `y = 0`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldPoint {
    /// Horizontal position along the grid's columns.
    pub x: f32,
    /// Vertical position.
    pub y: f32,
    /// Horizontal position along the grid's rows.
    pub z: f32,
}

impl WorldPoint {
    /// Creates a new world-space point.
    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

/// Three vertex indices into a [`Mesh`]'s vertex list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Triangle([u32; 3]);

impl Triangle {
    /// Creates a triangle from three vertex indices in winding order.
    #[must_use]
    pub const fn new(a: u32, b: u32, c: u32) -> Self {
        Self([a, b, c])
    }

    /// Vertex indices in winding order.
    #[must_use]
    pub const fn indices(&self) -> [u32; 3] {
        self.0
    }

    /// Reports whether the triangle references the vertex.
    #[must_use]
    pub fn contains(&self, vertex: u32) -> bool {
        self.0.contains(&vertex)
    }

    /// The triangle's three edges in winding order.
    #[must_use]
    pub const fn edges(&self) -> [(u32, u32); 3] {
        let [a, b, c] = self.0;
        [(a, b), (b, c), (c, a)]
    }
}

/// Indexed triangle mesh of the cave walls' top surface.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Mesh {
    vertices: Vec<WorldPoint>,
    triangles: Vec<Triangle>,
    interior: Vec<bool>,
}

impl Mesh {
    /// Assembles a mesh from its parts. `interior` is parallel to `vertices`.
    #[must_use]
    pub fn from_parts(vertices: Vec<WorldPoint>, triangles: Vec<Triangle>, interior: Vec<bool>) -> Self {
        Self {
            vertices,
            triangles,
            interior,
        }
    }

    /// Every vertex in emission order.
    #[must_use]
    pub fn vertices(&self) -> &[WorldPoint] {
        &self.vertices
    }

    /// Every triangle in emission order.
    #[must_use]
    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    /// Position of a single vertex.
    #[must_use]
    pub fn vertex(&self, index: u32) -> Option<WorldPoint> {
        self.vertices.get(index as usize).copied()
    }

    /// Reports whether the vertex is fully surrounded by wall and cannot lie on an outline.
    #[must_use]
    pub fn is_interior(&self, index: u32) -> bool {
        self.interior.get(index as usize).copied().unwrap_or(false)
    }

    /// Number of vertices.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of triangles.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Reports whether the mesh holds no triangles.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }
}

/// Closed loop of boundary vertices. The first vertex is repeated at the end.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Outline {
    vertices: Vec<u32>,
}

impl Outline {
    /// Creates an outline from a vertex walk whose last entry repeats the first.
    #[must_use]
    pub fn new(vertices: Vec<u32>) -> Self {
        Self { vertices }
    }

    /// Vertex indices in walk order, closing vertex included.
    #[must_use]
    pub fn vertices(&self) -> &[u32] {
        &self.vertices
    }

    /// Number of vertex entries, closing vertex included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Reports whether the outline holds no vertices.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Reports whether the walk returns to its first vertex.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.vertices.len() >= 4 && self.vertices.first() == self.vertices.last()
    }

    /// Consecutive vertex pairs along the loop.
    pub fn segments(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.vertices.windows(2).map(|pair| (pair[0], pair[1]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closed_outline_yields_one_segment_per_edge() {
        let outline = Outline::new(vec![3, 4, 5, 3]);
        assert!(outline.is_closed());
        assert_eq!(outline.segments().collect::<Vec<_>>(), vec![(3, 4), (4, 5), (5, 3)]);
    }

    #[test]
    fn triangle_edges_follow_winding() {
        let triangle = Triangle::new(1, 2, 3);
        assert_eq!(triangle.edges(), [(1, 2), (2, 3), (3, 1)]);
        assert!(triangle.contains(3));
        assert!(!triangle.contains(4));
    }
}
