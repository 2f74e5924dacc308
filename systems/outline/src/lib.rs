#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Extraction of closed outlines from a triangle mesh.
//!
//! An edge lies on the boundary when exactly one triangle contains both of
//! its endpoints. Outlines are traced by walking from vertex to vertex along
//! boundary edges until the walk returns to its start.

use delve_core::{Mesh, MeshError, Outline};

/// Lookup from each vertex to the triangles that reference it.
#[derive(Clone, Debug)]
pub struct TriangleIndex<'a> {
    mesh: &'a Mesh,
    by_vertex: Vec<Vec<usize>>,
}

impl<'a> TriangleIndex<'a> {
    /// Indexes every triangle of the mesh, rejecting out-of-range vertex indices.
    pub fn build(mesh: &'a Mesh) -> Result<Self, MeshError> {
        let vertex_count = mesh.vertex_count();
        let mut by_vertex = vec![Vec::new(); vertex_count];

        for (triangle_index, triangle) in mesh.triangles().iter().enumerate() {
            for vertex in triangle.indices() {
                let Some(triangles) = by_vertex.get_mut(vertex as usize) else {
                    return Err(MeshError::TriangleOutOfBounds {
                        triangle: triangle_index,
                        vertex,
                        vertex_count,
                    });
                };
                triangles.push(triangle_index);
            }
        }

        Ok(Self { mesh, by_vertex })
    }

    /// Triangles referencing the vertex, in mesh order.
    #[must_use]
    pub fn triangles_of(&self, vertex: u32) -> &[usize] {
        self.by_vertex
            .get(vertex as usize)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Number of triangles containing both endpoints.
    #[must_use]
    pub fn shared_triangle_count(&self, a: u32, b: u32) -> usize {
        self.triangles_of(a)
            .iter()
            .filter(|triangle| self.mesh.triangles()[**triangle].contains(b))
            .count()
    }

    /// Reports whether exactly one triangle contains both endpoints.
    #[must_use]
    pub fn is_boundary_edge(&self, a: u32, b: u32) -> bool {
        a != b && self.shared_triangle_count(a, b) == 1
    }

    fn next_outline_vertex(&self, vertex: u32, checked: &[bool]) -> Option<u32> {
        for triangle in self.triangles_of(vertex) {
            for candidate in self.mesh.triangles()[*triangle].indices() {
                if candidate == vertex || checked[candidate as usize] {
                    continue;
                }
                if self.is_boundary_edge(vertex, candidate) {
                    return Some(candidate);
                }
            }
        }
        None
    }
}

/// Traces every closed outline of the mesh.
///
/// Vertices are visited in index order. Interior vertices and vertices already
/// placed on an outline are skipped. Each outline repeats its first vertex at
/// the end and visits at least three distinct vertices; a walk that closes
/// sooner is reported as [`MeshError::DegenerateOutline`].
pub fn trace_outlines(mesh: &Mesh) -> Result<Vec<Outline>, MeshError> {
    let index = TriangleIndex::build(mesh)?;
    let mut checked: Vec<bool> = (0..mesh.vertex_count())
        .map(|vertex| mesh.is_interior(vertex as u32))
        .collect();
    let mut outlines = Vec::new();

    for start in 0..mesh.vertex_count() as u32 {
        if checked[start as usize] {
            continue;
        }
        let Some(mut current) = index.next_outline_vertex(start, &checked) else {
            continue;
        };

        checked[start as usize] = true;
        let mut walk = vec![start];
        loop {
            walk.push(current);
            checked[current as usize] = true;
            match index.next_outline_vertex(current, &checked) {
                Some(next) => current = next,
                None => break,
            }
        }

        if !index.is_boundary_edge(current, start) {
            log::error!("outline starting at vertex {start} stopped at vertex {current}");
            return Err(MeshError::UnclosedOutline {
                start,
                end: current,
            });
        }

        if walk.len() < 3 {
            log::error!("outline starting at vertex {start} doubled back after {} vertices", walk.len());
            return Err(MeshError::DegenerateOutline {
                start,
                vertices: walk.len(),
            });
        }

        walk.push(start);
        outlines.push(Outline::new(walk));
    }

    log::debug!("traced {} outlines", outlines.len());
    Ok(outlines)
}
