//! Mesh construction for the built-in scene geometry
//!
//! The cube is the same 36-vertex triangle soup the whole demo revolves
//! around: six faces, two triangles each, with per-face normals and uvs
//! interleaved in position/normal/uv order.

use std::collections::HashSet;

use macroquad::models::{Mesh, Vertex};
use macroquad::prelude::*;

use super::layout::VertexLayout;

/// Interleaved cube data: vec3 position, vec3 normal, vec2 uv.
#[rustfmt::skip]
pub const CUBE_VERTEX_DATA: [f32; 288] = [
    // back face
    -0.5, -0.5, -0.5,  0.0,  0.0, -1.0,  0.0, 0.0,
     0.5, -0.5, -0.5,  0.0,  0.0, -1.0,  1.0, 0.0,
     0.5,  0.5, -0.5,  0.0,  0.0, -1.0,  1.0, 1.0,
     0.5,  0.5, -0.5,  0.0,  0.0, -1.0,  1.0, 1.0,
    -0.5,  0.5, -0.5,  0.0,  0.0, -1.0,  0.0, 1.0,
    -0.5, -0.5, -0.5,  0.0,  0.0, -1.0,  0.0, 0.0,
    // front face
    -0.5, -0.5,  0.5,  0.0,  0.0,  1.0,  0.0, 0.0,
     0.5, -0.5,  0.5,  0.0,  0.0,  1.0,  1.0, 0.0,
     0.5,  0.5,  0.5,  0.0,  0.0,  1.0,  1.0, 1.0,
     0.5,  0.5,  0.5,  0.0,  0.0,  1.0,  1.0, 1.0,
    -0.5,  0.5,  0.5,  0.0,  0.0,  1.0,  0.0, 1.0,
    -0.5, -0.5,  0.5,  0.0,  0.0,  1.0,  0.0, 0.0,
    // left face
    -0.5,  0.5,  0.5, -1.0,  0.0,  0.0,  1.0, 0.0,
    -0.5,  0.5, -0.5, -1.0,  0.0,  0.0,  1.0, 1.0,
    -0.5, -0.5, -0.5, -1.0,  0.0,  0.0,  0.0, 1.0,
    -0.5, -0.5, -0.5, -1.0,  0.0,  0.0,  0.0, 1.0,
    -0.5, -0.5,  0.5, -1.0,  0.0,  0.0,  0.0, 0.0,
    -0.5,  0.5,  0.5, -1.0,  0.0,  0.0,  1.0, 0.0,
    // right face
     0.5,  0.5,  0.5,  1.0,  0.0,  0.0,  1.0, 0.0,
     0.5,  0.5, -0.5,  1.0,  0.0,  0.0,  1.0, 1.0,
     0.5, -0.5, -0.5,  1.0,  0.0,  0.0,  0.0, 1.0,
     0.5, -0.5, -0.5,  1.0,  0.0,  0.0,  0.0, 1.0,
     0.5, -0.5,  0.5,  1.0,  0.0,  0.0,  0.0, 0.0,
     0.5,  0.5,  0.5,  1.0,  0.0,  0.0,  1.0, 0.0,
    // bottom face
    -0.5, -0.5, -0.5,  0.0, -1.0,  0.0,  0.0, 1.0,
     0.5, -0.5, -0.5,  0.0, -1.0,  0.0,  1.0, 1.0,
     0.5, -0.5,  0.5,  0.0, -1.0,  0.0,  1.0, 0.0,
     0.5, -0.5,  0.5,  0.0, -1.0,  0.0,  1.0, 0.0,
    -0.5, -0.5,  0.5,  0.0, -1.0,  0.0,  0.0, 0.0,
    -0.5, -0.5, -0.5,  0.0, -1.0,  0.0,  0.0, 1.0,
    // top face
    -0.5,  0.5, -0.5,  0.0,  1.0,  0.0,  0.0, 1.0,
     0.5,  0.5, -0.5,  0.0,  1.0,  0.0,  1.0, 1.0,
     0.5,  0.5,  0.5,  0.0,  1.0,  0.0,  1.0, 0.0,
     0.5,  0.5,  0.5,  0.0,  1.0,  0.0,  1.0, 0.0,
    -0.5,  0.5,  0.5,  0.0,  1.0,  0.0,  0.0, 1.0,
    -0.5,  0.5, -0.5,  0.0,  1.0,  0.0,  0.0, 1.0,
];

/// Build the unit cube as an unindexed triangle mesh with the given texture.
pub fn unit_cube(texture: Option<Texture2D>) -> Mesh {
    let vertices = VertexLayout::position_normal_uv()
        .build_vertices(&CUBE_VERTEX_DATA)
        .expect("cube data matches layout");
    let indices = (0..vertices.len() as u16).collect();
    Mesh {
        vertices,
        indices,
        texture,
    }
}

/// Extract the unique edges of a triangle mesh for wireframe drawing.
///
/// Edges are deduplicated by endpoint position rather than by index, so
/// triangle soup (like the cube, where corner vertices are repeated per
/// face) still yields each geometric edge once.
pub fn unique_edges(vertices: &[Vertex], indices: &[u16]) -> Vec<(Vec3, Vec3)> {
    let mut edges = Vec::with_capacity(indices.len());
    for tri in indices.chunks_exact(3) {
        for (a, b) in [(tri[0], tri[1]), (tri[1], tri[2]), (tri[2], tri[0])] {
            edges.push((vertices[a as usize].position, vertices[b as usize].position));
        }
    }
    dedupe_edges(edges)
}

/// Collapse duplicate and degenerate edges by endpoint position, ignoring
/// orientation. Also used to merge edge lists gathered from separate meshes
/// that share geometry.
pub fn dedupe_edges(edges: impl IntoIterator<Item = (Vec3, Vec3)>) -> Vec<(Vec3, Vec3)> {
    let key = |v: Vec3| (v.x.to_bits(), v.y.to_bits(), v.z.to_bits());

    let mut seen = HashSet::new();
    let mut unique = Vec::new();
    for (a, b) in edges {
        let (ka, kb) = (key(a), key(b));
        if ka == kb {
            continue; // degenerate
        }
        let edge_key = if ka < kb { (ka, kb) } else { (kb, ka) };
        if seen.insert(edge_key) {
            unique.push((a, b));
        }
    }
    unique
}

/// Draw precomputed edges as 3D lines under the current camera and model
/// matrix.
pub fn draw_edges(edges: &[(Vec3, Vec3)], color: Color) {
    for &(a, b) in edges {
        draw_line_3d(a, b, color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cube_has_36_vertices() {
        let cube = unit_cube(None);
        assert_eq!(cube.vertices.len(), 36);
        assert_eq!(cube.indices.len(), 36);
    }

    #[test]
    fn test_cube_normals_are_unit_axis_aligned() {
        let cube = unit_cube(None);
        for v in &cube.vertices {
            let n = v.normal;
            assert!((n.length() - 1.0).abs() < 1e-6);
            assert_eq!(
                n.abs().to_array().iter().filter(|&&c| c == 1.0).count(),
                1,
                "normal {:?} is not axis aligned",
                n
            );
        }
    }

    #[test]
    fn test_cube_edge_count() {
        // A cube has 12 geometric edges plus the 6 face diagonals introduced
        // by triangulation.
        let cube = unit_cube(None);
        let edges = unique_edges(&cube.vertices, &cube.indices);
        assert_eq!(edges.len(), 18);
    }

    #[test]
    fn test_edges_shared_between_meshes_dedupe() {
        // Two edge lists built separately (as split mesh chunks are) share an
        // edge, once with reversed orientation; merging keeps it once.
        let a = vec3(0.0, 0.0, 0.0);
        let b = vec3(1.0, 0.0, 0.0);
        let c = vec3(0.0, 1.0, 0.0);
        let d = vec3(1.0, 1.0, 0.0);
        let first = vec![(a, b), (b, c), (c, a)];
        let second = vec![(c, b), (b, d), (d, c)];
        let merged = dedupe_edges(first.into_iter().chain(second));
        assert_eq!(merged.len(), 5);
    }

    #[test]
    fn test_degenerate_edges_skipped() {
        let v = Vertex {
            position: vec3(1.0, 1.0, 1.0),
            uv: Vec2::ZERO,
            color: [255, 255, 255, 255],
            normal: Vec4::ZERO,
        };
        let edges = unique_edges(&[v, v.clone(), v.clone()], &[0, 1, 2]);
        assert!(edges.is_empty());
    }
}
