//! # Import Module
//!
//! Reads an exported scene document back into plain Rust data, the way the
//! renderer consumes it. Used to check exports and by tools that inspect
//! them.
//!
//! ```rust
//! use scene_exporter::export::{export_to_string, ExportConfig};
//! use scene_exporter::geometry::generate_cube;
//! use scene_exporter::import::read_document;
//! use scene_exporter::scene::{Object, Scene};
//!
//! let mut scene = Scene::new();
//! scene.add_material_rgb("Red", 1.0, 0.0, 0.0);
//! scene.add_object(Object::builder("Cube").material("Red").mesh(generate_cube()).build());
//!
//! let xml = export_to_string(&scene, &ExportConfig::default()).unwrap();
//! let document = read_document(&xml).unwrap();
//! assert_eq!(document.objects[0].meshes[0].positions.len(), 8);
//! ```

use std::{fs, path::Path};

pub mod error;
pub mod reader;

pub use error::ImportError;
pub use reader::read_document;

use crate::export::Strategy;

/// A parsed scene document
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ImportedDocument {
    pub version: String,
    pub author: String,
    pub created: String,
    pub objects: Vec<ImportedObject>,
}

impl ImportedDocument {
    /// The layout the document was written with, if the version is known
    pub fn strategy(&self) -> Option<Strategy> {
        Strategy::from_format_version(&self.version)
    }

    pub fn object(&self, name: &str) -> Option<&ImportedObject> {
        self.objects.iter().find(|object| object.name == name)
    }

    pub fn mesh_count(&self) -> usize {
        self.objects.iter().map(|object| object.meshes.len()).sum()
    }
}

/// One `<object>` element
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ImportedObject {
    pub name: String,
    pub meshes: Vec<ImportedMesh>,
}

/// One `<mesh>` element, coordinates already in the renderer convention
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ImportedMesh {
    /// Object the mesh was exported from
    pub object: String,
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub face_indices: Option<Vec<u32>>,
    pub uv_coords: Option<Vec<[f32; 2]>>,
    pub texture_image: Option<String>,
    pub color: [f32; 3],
}

impl ImportedMesh {
    /// The material color repeated once per written vertex
    pub fn vertex_colors(&self) -> Vec<[f32; 3]> {
        vec![self.color; self.positions.len()]
    }
}

/// Reads and parses a document from disk.
pub fn load_document(path: impl AsRef<Path>) -> Result<ImportedDocument, ImportError> {
    let path = path.as_ref();
    let xml = fs::read_to_string(path)?;
    let document = read_document(&xml)?;
    log::debug!(
        "Loaded {} with {} object(s) and {} mesh(es)",
        path.display(),
        document.objects.len(),
        document.mesh_count()
    );
    Ok(document)
}
