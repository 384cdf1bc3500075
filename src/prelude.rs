//! # Scene Exporter Prelude
//!
//! Commonly used types for building a scene and exporting it.
//!
//! ## Usage
//!
//! ```rust
//! use scene_exporter::prelude::*;
//!
//! let mut scene = Scene::new();
//! scene.add_material_rgb("Clay", 0.7, 0.4, 0.3);
//! scene.add_object(Object::builder("Pot").material("Clay").mesh(generate_cube()).build());
//!
//! let config = ExportConfig::new(Strategy::Indexed);
//! let xml = export_to_string(&scene, &config).unwrap();
//! let document = read_document(&xml).unwrap();
//! assert_eq!(document.objects[0].name, "Pot");
//! ```

// Scene description
pub use crate::scene::{
    Material, MaterialSlot, Mesh, Object, ObjectId, ObjectKind, Polygon, Scene, SceneProvider,
};

// Primitive shapes
pub use crate::geometry::{generate_cube, generate_plane, generate_triangle};

// Export
pub use crate::export::{
    export_to_file, export_to_string, export_to_writer, output_path_for, ExportConfig,
    ExportError, ExportSummary, SourceAxes, Strategy,
};

// Import
pub use crate::import::{load_document, read_document, ImportError, ImportedDocument};
