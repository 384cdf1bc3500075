use std::borrow::Cow;

use super::{
    material::{Material, MaterialManager},
    mesh::Mesh,
    object::{Object, ObjectKind},
    MaterialSlot, ObjectId, SceneProvider,
};

/// In-memory scene containing objects and the materials they reference
///
/// Objects keep insertion order, which is the order they are exported in.
#[derive(Clone, Debug, Default)]
pub struct Scene {
    pub objects: Vec<Object>,
    pub material_manager: MaterialManager,
}

impl Scene {
    /// Creates an empty scene
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an object and returns its handle
    pub fn add_object(&mut self, object: Object) -> ObjectId {
        self.objects.push(object);
        ObjectId(self.objects.len() - 1)
    }

    /// Adds a material to the material manager
    pub fn add_material(&mut self, material: Material) {
        self.material_manager.add_material(material);
    }

    /// Convenience method for creating materials with RGB colors
    ///
    /// # Arguments
    /// * `name` - Unique name for the material
    /// * `r`, `g`, `b` - RGB color components (0.0-1.0)
    pub fn add_material_rgb(&mut self, name: &str, r: f32, g: f32, b: f32) -> &mut Material {
        self.material_manager
            .add_material(Material::new(name, [r, g, b, 1.0]));
        self.material_manager.create_material(name)
    }

    /// Gets the material manager for advanced material operations
    pub fn get_material_manager(&self) -> &MaterialManager {
        &self.material_manager
    }

    /// Gets all object names, in scene order
    pub fn get_object_names(&self) -> Vec<String> {
        self.objects.iter().map(|obj| obj.name.clone()).collect()
    }

    /// Gets immutable reference to an object by index
    pub fn get_object(&self, index: usize) -> Option<&Object> {
        self.objects.get(index)
    }

    /// Looks an object up by name
    pub fn find_object(&self, name: &str) -> Option<ObjectId> {
        self.objects
            .iter()
            .position(|obj| obj.name == name)
            .map(ObjectId)
    }

    /// Gets statistics about the scene
    pub fn statistics(&self) -> SceneStatistics {
        let meshes = || self.objects.iter().filter_map(|obj| obj.mesh.as_ref());

        SceneStatistics {
            object_count: self.objects.len(),
            mesh_count: meshes().count(),
            material_count: self.material_manager.len(),
            total_polygons: meshes().map(Mesh::polygon_count).sum(),
            total_vertices: meshes().map(Mesh::vertex_count).sum(),
        }
    }

    /// Returns `desired_name`, or `desired_name (n)` with the first free `n`
    pub fn ensure_unique_name(&self, desired_name: &str) -> String {
        let mut counter = 0;
        let mut test_name = desired_name.to_string();

        while self.objects.iter().any(|obj| obj.name == test_name) {
            counter += 1;
            test_name = format!("{} ({})", desired_name, counter);
        }

        test_name
    }
}

impl SceneProvider for Scene {
    fn objects(&self) -> Vec<ObjectId> {
        (0..self.objects.len()).map(ObjectId).collect()
    }

    fn name(&self, id: ObjectId) -> &str {
        &self.objects[id.0].name
    }

    fn kind(&self, id: ObjectId) -> ObjectKind {
        self.objects[id.0].kind
    }

    // A parent name that matches no object resolves to no parent.
    fn parent(&self, id: ObjectId) -> Option<ObjectId> {
        self.objects[id.0]
            .parent
            .as_deref()
            .and_then(|parent| self.find_object(parent))
    }

    fn material_slots(&self, id: ObjectId) -> Vec<MaterialSlot<'_>> {
        self.objects[id.0]
            .material_slots
            .iter()
            .map(|slot| match slot.as_deref() {
                None => MaterialSlot::Empty,
                Some(material_id) => match self.material_manager.get_material(material_id) {
                    Some(material) => MaterialSlot::Assigned(material),
                    None => MaterialSlot::Unresolved(material_id),
                },
            })
            .collect()
    }

    fn mesh(&self, id: ObjectId) -> Option<Cow<'_, Mesh>> {
        self.objects[id.0].mesh.as_ref().map(Cow::Borrowed)
    }
}

/// Scene statistics for logging
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneStatistics {
    pub object_count: usize,
    pub mesh_count: usize,
    pub material_count: usize,
    pub total_polygons: usize,
    pub total_vertices: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{generate_cube, generate_triangle};

    fn family() -> Scene {
        let mut scene = Scene::new();
        scene.add_material_rgb("Red", 1.0, 0.0, 0.0);
        scene.add_object(Object::builder("Body").material("Red").mesh(generate_cube()).build());
        scene.add_object(Object::builder("Lamp").kind(ObjectKind::Light).build());
        scene.add_object(
            Object::builder("Wheel")
                .parent("Body")
                .material("Red")
                .mesh(generate_triangle())
                .build(),
        );
        scene
    }

    #[test]
    fn test_provider_resolves_parents_and_children() {
        let scene = family();
        let body = scene.find_object("Body").unwrap();
        let wheel = scene.find_object("Wheel").unwrap();

        assert_eq!(scene.parent(wheel), Some(body));
        assert_eq!(scene.parent(body), None);
        assert_eq!(scene.children(body), vec![wheel]);
        assert_eq!(scene.kind(ObjectId(1)), ObjectKind::Light);
    }

    #[test]
    fn test_dangling_parent_resolves_to_none() {
        let mut scene = family();
        let id = scene.add_object(Object::builder("Orphan").parent("Nobody").build());
        assert_eq!(scene.parent(id), None);
    }

    #[test]
    fn test_material_slots_resolve_through_manager() {
        let mut scene = family();
        let id = scene.add_object(
            Object::builder("Mixed")
                .material("Red")
                .empty_material_slot()
                .material("Missing")
                .build(),
        );
        let slots = scene.material_slots(id);
        assert_eq!(slots.len(), 3);
        assert!(matches!(slots[0], MaterialSlot::Assigned(m) if m.name == "Red"));
        assert_eq!(slots[1], MaterialSlot::Empty);
        assert_eq!(slots[2], MaterialSlot::Unresolved("Missing"));
    }

    #[test]
    fn test_statistics() {
        let stats = family().statistics();
        assert_eq!(
            stats,
            SceneStatistics {
                object_count: 3,
                mesh_count: 2,
                material_count: 1,
                total_polygons: 7,
                total_vertices: 11,
            }
        );
    }

    #[test]
    fn test_ensure_unique_name() {
        let mut scene = family();
        assert_eq!(scene.ensure_unique_name("Tree"), "Tree");
        assert_eq!(scene.ensure_unique_name("Body"), "Body (1)");

        scene.add_object(Object::new("Body (1)", generate_triangle()));
        assert_eq!(scene.ensure_unique_name("Body"), "Body (2)");
    }
}
