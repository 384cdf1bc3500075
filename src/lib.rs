// src/lib.rs
//! Scene Exporter
//!
//! Converts an authoring scene (Z up, polygon meshes, named materials) into the
//! XML scene document a Y-up real-time renderer loads. Two mesh layouts are
//! supported: an indexed one with shared vertices, and a flattened one with a
//! position, normal and UV per polygon corner plus a texture reference.

pub mod export;
pub mod geometry;
pub mod import;
pub mod prelude;
pub mod scene;

pub use export::{export_to_file, export_to_string, ExportConfig, ExportError, Strategy};
pub use scene::{Scene, SceneProvider};

/// Crate version, printed by the command line tool
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
