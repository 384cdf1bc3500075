//! # Procedural Geometry Generation
//!
//! Builds small finalized meshes in the authoring convention (Z up) so scenes
//! can be assembled without external model files.
//!
//! ## Supported Primitives
//!
//! - **Triangle**: Single right triangle in the XY plane
//! - **Cube**: Unit cube with 8 shared vertices, 6 quads and hard-edged split normals
//! - **Plane**: Flat quad grid with configurable size and subdivisions
//!
//! Every primitive carries one active UV layer named `UVMap`.
//!
//! ## Usage
//!
//! ```rust
//! use scene_exporter::geometry::{generate_cube, generate_plane};
//!
//! let cube = generate_cube();
//! assert_eq!(cube.polygon_count(), 6);
//!
//! let plane = generate_plane(10.0, 10.0, 4, 4);
//! assert_eq!(plane.vertex_count(), 25);
//! ```

pub mod primitives;

pub use primitives::*;

/// Name of the UV layer attached to every generated primitive
pub const DEFAULT_UV_LAYER: &str = "UVMap";
