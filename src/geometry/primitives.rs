//! # Primitive Shape Generation
//!
//! All shapes are generated in the Z-up authoring convention with outward
//! counter-clockwise winding, vertex normals and one UV coordinate per loop.

use super::DEFAULT_UV_LAYER;
use crate::scene::{Mesh, Polygon};

/// Generate a single right triangle in the XY plane
///
/// Corners at the origin, +X and +Y; the normal points up (positive Z).
pub fn generate_triangle() -> Mesh {
    Mesh::new(
        vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
        vec![[0.0, 0.0, 1.0]; 3],
        vec![Polygon::new([0, 1, 2])],
    )
    .with_uv_layer(DEFAULT_UV_LAYER, vec![[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]])
}

/// Generate a unit cube centered at the origin
///
/// The 8 corners from -0.5 to 0.5 are shared between the 6 quad faces, so the
/// vertex normals point diagonally out of each corner. Each loop also carries
/// the flat normal of its face as a split normal, and each face maps the full
/// 0-1 UV square.
pub fn generate_cube() -> Mesh {
    let positions = vec![
        [-0.5, -0.5, -0.5],
        [0.5, -0.5, -0.5],
        [0.5, 0.5, -0.5],
        [-0.5, 0.5, -0.5],
        [-0.5, -0.5, 0.5],
        [0.5, -0.5, 0.5],
        [0.5, 0.5, 0.5],
        [-0.5, 0.5, 0.5],
    ];

    // (corners, face normal)
    let faces: [([u32; 4], [f32; 3]); 6] = [
        // Bottom (negative Z)
        ([0, 3, 2, 1], [0.0, 0.0, -1.0]),
        // Top (positive Z)
        ([4, 5, 6, 7], [0.0, 0.0, 1.0]),
        // Front (negative Y)
        ([0, 1, 5, 4], [0.0, -1.0, 0.0]),
        // Right (positive X)
        ([1, 2, 6, 5], [1.0, 0.0, 0.0]),
        // Back (positive Y)
        ([2, 3, 7, 6], [0.0, 1.0, 0.0]),
        // Left (negative X)
        ([3, 0, 4, 7], [-1.0, 0.0, 0.0]),
    ];

    let polygons = faces.iter().map(|(corners, _)| Polygon::new(*corners)).collect();
    let split_normals = faces
        .iter()
        .flat_map(|(_, normal)| [*normal; 4])
        .collect();
    let uvs = faces
        .iter()
        .flat_map(|_| [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]])
        .collect();

    // Empty normals: smooth corner normals are calculated from the faces
    Mesh::new(positions, Vec::new(), polygons)
        .with_split_normals(split_normals)
        .with_uv_layer(DEFAULT_UV_LAYER, uvs)
}

/// Generate a plane in the XY plane (horizontal in the Z-up convention)
///
/// # Arguments
/// * `width` - Width of the plane (X direction)
/// * `height` - Height of the plane (Y direction)
/// * `width_segments` - Number of subdivisions along width
/// * `height_segments` - Number of subdivisions along height
///
/// Returns a plane of quads centered at the origin with normal pointing up
/// (positive Z). UVs run from 0 to 1 across the plane.
pub fn generate_plane(width: f32, height: f32, width_segments: u32, height_segments: u32) -> Mesh {
    let w_segs = width_segments.max(1);
    let h_segs = height_segments.max(1);

    let mut positions = Vec::new();
    let mut grid_uvs = Vec::new();
    for y in 0..=h_segs {
        let v = y as f32 / h_segs as f32;
        for x in 0..=w_segs {
            let u = x as f32 / w_segs as f32;
            positions.push([(u - 0.5) * width, (v - 0.5) * height, 0.0]);
            grid_uvs.push([u, v]);
        }
    }

    // Counter-clockwise when viewed from above
    let mut polygons = Vec::new();
    for y in 0..h_segs {
        for x in 0..w_segs {
            let i = y * (w_segs + 1) + x;
            let next_row = i + w_segs + 1;
            polygons.push(Polygon::new([i, i + 1, next_row + 1, next_row]));
        }
    }

    let grid_uvs = &grid_uvs;
    let uvs = polygons
        .iter()
        .flat_map(|polygon| polygon.vertices.iter().map(move |&i| grid_uvs[i as usize]))
        .collect();
    let normals = vec![[0.0, 0.0, 1.0]; positions.len()];

    Mesh::new(positions, normals, polygons).with_uv_layer(DEFAULT_UV_LAYER, uvs)
}
