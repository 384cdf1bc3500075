//! Finalized polygon meshes.
//!
//! A [`Mesh`] is what the host hands over after modifiers have been applied:
//! vertex positions and normals, polygons indexing into them, and per-loop data.
//! A loop is one (polygon, corner) occurrence; loops are numbered consecutively
//! in polygon order, then in-polygon vertex order, and every per-loop array
//! (UV layers, split normals) is indexed by that number.

use cgmath::{InnerSpace, Vector3, Zero};
use thiserror::Error;

/// Normal given to vertices whose surrounding faces define no direction:
/// up, in the Z-up authoring convention.
pub const FALLBACK_NORMAL: [f32; 3] = [0.0, 0.0, 1.0];

/// Normalizes an accumulated normal, or returns [`FALLBACK_NORMAL`] for a zero sum.
pub(crate) fn unit_or_fallback(sum: Vector3<f32>) -> [f32; 3] {
    if sum.magnitude2() > 0.0 {
        sum.normalize().into()
    } else {
        FALLBACK_NORMAL
    }
}

/// Structural problems that make a mesh impossible to serialize.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MeshError {
    #[error("polygon {polygon} references vertex {index} but the mesh has {vertex_count} vertices")]
    IndexOutOfRange {
        polygon: usize,
        index: u32,
        vertex_count: usize,
    },

    #[error("mesh has {vertices} vertices but {normals} vertex normals")]
    NormalCountMismatch { vertices: usize, normals: usize },

    #[error("UV layer '{layer}' has {uvs} coordinates but the mesh has {loops} loops")]
    UvCountMismatch {
        layer: String,
        loops: usize,
        uvs: usize,
    },

    #[error("mesh has {loops} loops but {normals} split normals")]
    SplitNormalCountMismatch { loops: usize, normals: usize },
}

/// One face of a mesh, listing the vertex indices of its corners in winding order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Polygon {
    pub vertices: Vec<u32>,
}

impl Polygon {
    pub fn new(vertices: impl Into<Vec<u32>>) -> Self {
        Self {
            vertices: vertices.into(),
        }
    }

    /// Number of corners (loops) in this polygon
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }
}

/// A named set of per-loop texture coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct UvLayer {
    pub name: String,
    pub uvs: Vec<[f32; 2]>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Mesh {
    positions: Vec<[f32; 3]>,
    normals: Vec<[f32; 3]>,
    polygons: Vec<Polygon>,
    split_normals: Option<Vec<[f32; 3]>>,
    uv_layers: Vec<UvLayer>,
    active_uv_layer: Option<usize>,
    texture_image: Option<String>,
}

impl Mesh {
    /// Creates a mesh from vertex positions, vertex normals and polygons.
    ///
    /// When `normals` is empty the vertex normals are calculated from the
    /// polygons instead.
    pub fn new(positions: Vec<[f32; 3]>, normals: Vec<[f32; 3]>, polygons: Vec<Polygon>) -> Self {
        let normals = if normals.is_empty() && !positions.is_empty() {
            Self::calculate_vertex_normals(&positions, &polygons)
        } else {
            normals
        };

        Self {
            positions,
            normals,
            polygons,
            ..Default::default()
        }
    }

    /// Creates a triangle mesh from flat position/normal arrays and a flat index list,
    /// the layout OBJ loaders and GPU buffers use.
    pub fn from_triangles(positions: &[f32], normals: &[f32], indices: &[u32]) -> Self {
        let positions: Vec<[f32; 3]> = positions
            .chunks_exact(3)
            .map(|p| [p[0], p[1], p[2]])
            .collect();
        let normals: Vec<[f32; 3]> = normals
            .chunks_exact(3)
            .map(|n| [n[0], n[1], n[2]])
            .collect();
        let polygons = indices.chunks_exact(3).map(Polygon::new).collect();

        Self::new(positions, normals, polygons)
    }

    /// Attaches per-loop normals, used when a vertex is shaded differently on
    /// each face it belongs to (hard edges).
    pub fn with_split_normals(mut self, normals: Vec<[f32; 3]>) -> Self {
        self.split_normals = Some(normals);
        self
    }

    /// Adds a UV layer. The first layer added becomes the active one.
    pub fn with_uv_layer(mut self, name: &str, uvs: Vec<[f32; 2]>) -> Self {
        self.add_uv_layer(name, uvs);
        self
    }

    pub fn with_texture_image(mut self, path: &str) -> Self {
        self.texture_image = Some(path.to_string());
        self
    }

    /// Adds a UV layer and returns its index. The first layer added becomes active.
    pub fn add_uv_layer(&mut self, name: &str, uvs: Vec<[f32; 2]>) -> usize {
        self.uv_layers.push(UvLayer {
            name: name.to_string(),
            uvs,
        });
        let index = self.uv_layers.len() - 1;
        if self.active_uv_layer.is_none() {
            self.active_uv_layer = Some(index);
        }
        index
    }

    /// Makes the layer at `index` active. Returns `false` if there is no such layer.
    pub fn set_active_uv_layer(&mut self, index: usize) -> bool {
        if index < self.uv_layers.len() {
            self.active_uv_layer = Some(index);
            true
        } else {
            false
        }
    }

    pub fn set_texture_image(&mut self, path: Option<String>) {
        self.texture_image = path;
    }

    pub fn positions(&self) -> &[[f32; 3]] {
        &self.positions
    }

    pub fn normals(&self) -> &[[f32; 3]] {
        &self.normals
    }

    pub fn polygons(&self) -> &[Polygon] {
        &self.polygons
    }

    pub fn split_normals(&self) -> Option<&[[f32; 3]]> {
        self.split_normals.as_deref()
    }

    pub fn uv_layers(&self) -> &[UvLayer] {
        &self.uv_layers
    }

    pub fn active_uv_layer(&self) -> Option<&UvLayer> {
        self.active_uv_layer.and_then(|i| self.uv_layers.get(i))
    }

    pub fn texture_image(&self) -> Option<&str> {
        self.texture_image.as_deref()
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn polygon_count(&self) -> usize {
        self.polygons.len()
    }

    /// Total number of vertex occurrences across all polygons
    pub fn loop_count(&self) -> usize {
        self.polygons.iter().map(Polygon::len).sum()
    }

    /// Iterates `(loop_index, vertex_index)` in polygon order, then corner order.
    pub fn loops(&self) -> impl Iterator<Item = (usize, u32)> + '_ {
        self.polygons
            .iter()
            .flat_map(|polygon| polygon.vertices.iter().copied())
            .enumerate()
    }

    /// Checks that every index and per-loop array agrees with the mesh topology.
    pub fn validate(&self) -> Result<(), MeshError> {
        let vertex_count = self.positions.len();
        if self.normals.len() != vertex_count {
            return Err(MeshError::NormalCountMismatch {
                vertices: vertex_count,
                normals: self.normals.len(),
            });
        }

        for (polygon_index, polygon) in self.polygons.iter().enumerate() {
            if let Some(&index) = polygon
                .vertices
                .iter()
                .find(|&&index| index as usize >= vertex_count)
            {
                return Err(MeshError::IndexOutOfRange {
                    polygon: polygon_index,
                    index,
                    vertex_count,
                });
            }
        }

        let loops = self.loop_count();
        if let Some(split) = &self.split_normals {
            if split.len() != loops {
                return Err(MeshError::SplitNormalCountMismatch {
                    loops,
                    normals: split.len(),
                });
            }
        }
        for layer in &self.uv_layers {
            if layer.uvs.len() != loops {
                return Err(MeshError::UvCountMismatch {
                    layer: layer.name.clone(),
                    loops,
                    uvs: layer.uvs.len(),
                });
            }
        }

        Ok(())
    }

    /// Calculates smooth vertex normals for a polygon mesh.
    ///
    /// Each polygon's normal comes from Newell's method, so its length is twice
    /// the polygon area and larger faces weigh more. The sums are normalized per
    /// vertex. Vertices no polygon touches, or whose faces cancel out, get
    /// [`FALLBACK_NORMAL`] so no zero-length normal is ever written. Indices
    /// outside `positions` are ignored.
    pub fn calculate_vertex_normals(positions: &[[f32; 3]], polygons: &[Polygon]) -> Vec<[f32; 3]> {
        let mut sums = vec![Vector3::<f32>::zero(); positions.len()];

        for polygon in polygons {
            let corners: Vec<Vector3<f32>> = polygon
                .vertices
                .iter()
                .filter_map(|&i| positions.get(i as usize))
                .map(|&p| Vector3::from(p))
                .collect();
            if corners.len() < 3 {
                continue;
            }

            let mut face_normal = Vector3::zero();
            for (i, current) in corners.iter().enumerate() {
                let next = corners[(i + 1) % corners.len()];
                face_normal.x += (current.y - next.y) * (current.z + next.z);
                face_normal.y += (current.z - next.z) * (current.x + next.x);
                face_normal.z += (current.x - next.x) * (current.y + next.y);
            }

            for &index in &polygon.vertices {
                if let Some(sum) = sums.get_mut(index as usize) {
                    *sum += face_normal;
                }
            }
        }

        sums.into_iter().map(unit_or_fallback).collect()
    }
}
