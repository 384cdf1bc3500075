//! # Export Module
//!
//! Serializes a [`SceneProvider`] into the renderer's XML scene document.
//!
//! ## Key Components
//!
//! - [`ExportConfig`] / [`Strategy`] - Layout choice and per-export settings
//! - [`coords`] - Z-up to Y-up coordinate correction and number formatting
//! - [`mesh`] - Per-object mesh serialization for both strategies
//! - [`document`] - Document assembly and object hierarchy
//! - [`XmlDocumentWriter`] - Streaming writer with explicit open/close calls
//!
//! ## Usage
//!
//! ```rust
//! use scene_exporter::export::{export_to_string, ExportConfig, Strategy};
//! use scene_exporter::geometry::generate_cube;
//! use scene_exporter::scene::{Object, Scene};
//!
//! let mut scene = Scene::new();
//! scene.add_material_rgb("Red", 1.0, 0.0, 0.0);
//! scene.add_object(Object::builder("Cube").material("Red").mesh(generate_cube()).build());
//!
//! let xml = export_to_string(&scene, &ExportConfig::new(Strategy::Indexed)).unwrap();
//! assert!(xml.contains(r#"<object id="Cube">"#));
//! ```

use std::{
    ffi::OsString,
    fs,
    io::Write,
    path::{Path, PathBuf},
};

pub mod config;
pub mod coords;
pub mod document;
pub mod error;
pub mod mesh;
pub mod writer;

pub use config::{ExportConfig, SourceAxes, Strategy};
pub use coords::{format_number, vertex_correction};
pub use document::{
    collect_fragments, render_document, write_document, ExportSummary, ObjectFragment,
    RenderedDocument,
};
pub use error::ExportError;
pub use mesh::{serialize_mesh, AttributeArray, MeshFragment};
pub use writer::XmlDocumentWriter;

use crate::scene::SceneProvider;

/// Renders the document and returns it as a string.
pub fn export_to_string<P: SceneProvider + ?Sized>(
    scene: &P,
    config: &ExportConfig,
) -> Result<String, ExportError> {
    render_document(scene, config).map(|rendered| rendered.xml)
}

/// Renders the document, then writes it to `out` in one piece.
pub fn export_to_writer<P: SceneProvider + ?Sized, W: Write>(
    scene: &P,
    config: &ExportConfig,
    out: &mut W,
) -> Result<ExportSummary, ExportError> {
    let rendered = render_document(scene, config)?;
    out.write_all(rendered.xml.as_bytes())?;
    out.flush()?;
    Ok(rendered.summary)
}

/// Exports `scene` to `path`.
///
/// The document is written to a sibling `.tmp` file and renamed over `path`
/// once complete. On any error `path` is left untouched.
pub fn export_to_file<P: SceneProvider + ?Sized>(
    scene: &P,
    path: impl AsRef<Path>,
    config: &ExportConfig,
) -> Result<ExportSummary, ExportError> {
    let path = path.as_ref();
    let rendered = render_document(scene, config)?;

    let temp = temp_path_for(path);
    if let Err(e) = fs::write(&temp, rendered.xml.as_bytes()).and_then(|_| fs::rename(&temp, path)) {
        let _ = fs::remove_file(&temp);
        return Err(e.into());
    }

    log::info!(
        "Exported {} object(s) with {} mesh(es) to {} ({} format {})",
        rendered.summary.objects,
        rendered.summary.meshes,
        path.display(),
        config.strategy,
        config.strategy.format_version()
    );
    Ok(rendered.summary)
}

/// The default output path for a scene file: same location, `.xml` extension.
pub fn output_path_for(scene_path: impl AsRef<Path>) -> PathBuf {
    scene_path.as_ref().with_extension("xml")
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut temp = OsString::from(path.as_os_str());
    temp.push(".tmp");
    PathBuf::from(temp)
}
