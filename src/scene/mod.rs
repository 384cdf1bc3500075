//! # Scene Module
//!
//! Read-only view of the authoring scene that the exporter walks. The exporter
//! never reaches into a host application directly; it asks a [`SceneProvider`]
//! for objects, materials and finalized meshes.
//!
//! ## Key Components
//!
//! - [`SceneProvider`] - The host-facing query interface
//! - [`Scene`] - In-memory scene that implements [`SceneProvider`]
//! - [`Object`] / [`ObjectBuilder`] - Named scene objects with parent links and material slots
//! - [`Mesh`] - Finalized polygon mesh with loops, UV layers and a texture reference
//! - [`Material`] / [`MaterialManager`] - Named materials referenced by objects
//!
//! ## Usage
//!
//! ```rust
//! use scene_exporter::geometry::generate_cube;
//! use scene_exporter::scene::{Material, Object, Scene};
//!
//! let mut scene = Scene::new();
//! scene.add_material(Material::new("Red", [1.0, 0.0, 0.0, 1.0]));
//! scene.add_object(Object::builder("Cube").material("Red").mesh(generate_cube()).build());
//! assert_eq!(scene.statistics().object_count, 1);
//! ```

use std::borrow::Cow;

pub mod material;
pub mod mesh;
pub mod obj;
pub mod object;
#[allow(clippy::module_inception)]
pub mod scene;

pub use material::{Material, MaterialId, MaterialManager};
pub use mesh::{Mesh, MeshError, Polygon, UvLayer, FALLBACK_NORMAL};
pub use obj::SceneLoadError;
pub use object::{Object, ObjectBuilder, ObjectKind};
pub use scene::{Scene, SceneStatistics};

/// One material slot of an object, resolved against the host's materials.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum MaterialSlot<'a> {
    /// Nothing assigned
    Empty,
    Assigned(&'a Material),
    /// The slot names a material the host does not know
    Unresolved(&'a str),
}

/// Handle to an object inside a [`SceneProvider`].
///
/// Handles are only meaningful for the provider that produced them.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ObjectId(pub usize);

/// Read-only access to the host scene.
///
/// Implementations return whatever the host currently holds; the exporter
/// takes a single pass over it and never mutates anything. `mesh` returns a
/// [`Cow`] so hosts that evaluate modifiers on demand can hand over an owned
/// mesh while in-memory scenes simply lend theirs.
pub trait SceneProvider {
    /// All objects, in host iteration order.
    fn objects(&self) -> Vec<ObjectId>;

    fn name(&self, id: ObjectId) -> &str;

    fn kind(&self, id: ObjectId) -> ObjectKind;

    fn parent(&self, id: ObjectId) -> Option<ObjectId>;

    /// Material slots in slot order.
    fn material_slots(&self, id: ObjectId) -> Vec<MaterialSlot<'_>>;

    /// The finalized polygon mesh, or `None` when the object carries no geometry.
    fn mesh(&self, id: ObjectId) -> Option<Cow<'_, Mesh>>;

    /// Direct children of `id`, in host iteration order.
    fn children(&self, id: ObjectId) -> Vec<ObjectId> {
        self.objects()
            .into_iter()
            .filter(|&candidate| self.parent(candidate) == Some(id))
            .collect()
    }
}
