use super::{material::MaterialId, mesh::Mesh};

/// What an object is. Only [`ObjectKind::Mesh`] objects are exported.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum ObjectKind {
    #[default]
    Mesh,
    Empty,
    Camera,
    Light,
}

/// A named object in the scene
///
/// Objects point at their parent by name and at their materials by ID, the same
/// way an authoring tool links datablocks. The first assigned material slot is
/// the active material.
#[derive(Clone, Debug, PartialEq)]
pub struct Object {
    pub name: String,
    pub kind: ObjectKind,
    pub parent: Option<String>,
    pub material_slots: Vec<Option<MaterialId>>,
    pub mesh: Option<Mesh>,
}

impl Object {
    /// Create a new mesh object without materials or parent
    pub fn new(name: &str, mesh: Mesh) -> Self {
        Self {
            name: name.to_string(),
            kind: ObjectKind::Mesh,
            parent: None,
            material_slots: Vec::new(),
            mesh: Some(mesh),
        }
    }

    pub fn builder(name: &str) -> ObjectBuilder {
        ObjectBuilder::new(name)
    }

    /// Replaces all material slots with a single one
    pub fn set_material(&mut self, material_id: &str) {
        self.material_slots = vec![Some(material_id.to_string())];
    }

    /// The first assigned material slot
    pub fn get_material_id(&self) -> Option<&MaterialId> {
        self.material_slots.iter().flatten().next()
    }
}

/// Builder pattern for configuring objects
pub struct ObjectBuilder {
    object: Object,
}

impl ObjectBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            object: Object {
                name: name.to_string(),
                kind: ObjectKind::Mesh,
                parent: None,
                material_slots: Vec::new(),
                mesh: None,
            },
        }
    }

    pub fn kind(mut self, kind: ObjectKind) -> Self {
        self.object.kind = kind;
        self
    }

    pub fn parent(mut self, parent: &str) -> Self {
        self.object.parent = Some(parent.to_string());
        self
    }

    /// Appends a material slot
    pub fn material(mut self, material_id: &str) -> Self {
        self.object.material_slots.push(Some(material_id.to_string()));
        self
    }

    /// Appends an empty material slot
    pub fn empty_material_slot(mut self) -> Self {
        self.object.material_slots.push(None);
        self
    }

    pub fn mesh(mut self, mesh: Mesh) -> Self {
        self.object.mesh = Some(mesh);
        self
    }

    pub fn build(self) -> Object {
        self.object
    }
}
