//! Material definitions and centralized storage.
//!
//! Materials are stored in a [`MaterialManager`] and objects reference them by
//! ID through their material slots. The exporter only reads the diffuse color;
//! the renderer colors vertices with it.

use std::collections::HashMap;

/// Material ID for referencing materials
pub type MaterialId = String;

/// Material definition
///
/// Only the diffuse color is written to the exported document. Alpha is kept
/// so sources such as MTL `d`/dissolve survive a round trip through the scene.
#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    pub name: String,
    pub diffuse_color: [f32; 4],
}

impl Default for Material {
    fn default() -> Self {
        Self {
            name: "Default".to_string(),
            diffuse_color: [0.8, 0.8, 0.8, 1.0],
        }
    }
}

impl Material {
    /// Creates a new material
    ///
    /// # Arguments
    /// * `name` - Unique name for this material
    /// * `diffuse_color` - RGBA diffuse color, channels in 0.0-1.0
    pub fn new(name: &str, diffuse_color: [f32; 4]) -> Self {
        Self {
            name: name.to_string(),
            diffuse_color: diffuse_color.map(|c| c.clamp(0.0, 1.0)),
        }
    }

    /// Builder pattern: Set diffuse color from RGB values
    pub fn with_color(mut self, r: f32, g: f32, b: f32) -> Self {
        self.diffuse_color = [
            r.clamp(0.0, 1.0),
            g.clamp(0.0, 1.0),
            b.clamp(0.0, 1.0),
            self.diffuse_color[3],
        ];
        self
    }

    /// Builder pattern: Set alpha transparency
    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.diffuse_color[3] = alpha.clamp(0.0, 1.0);
        self
    }

    /// The RGB channels written to the `color` element.
    pub fn rgb(&self) -> [f32; 3] {
        let [r, g, b, _] = self.diffuse_color;
        [r, g, b]
    }
}

/// Manages all materials of a scene
///
/// Objects reference materials by ID rather than storing material data
/// directly, so several objects can share one material.
#[derive(Clone, Debug, Default)]
pub struct MaterialManager {
    materials: HashMap<MaterialId, Material>,
}

impl MaterialManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a material, replacing any material with the same name
    pub fn add_material(&mut self, material: Material) {
        self.materials.insert(material.name.clone(), material);
    }

    /// Gets a material by ID
    pub fn get_material(&self, id: &str) -> Option<&Material> {
        self.materials.get(id)
    }

    /// Creates a new material with the default diffuse color and adds it
    ///
    /// Returns the existing material untouched if the name is already taken.
    pub fn create_material(&mut self, name: &str) -> &mut Material {
        self.materials
            .entry(name.to_string())
            .or_insert_with(|| Material::new(name, Material::default().diffuse_color))
    }

    /// Lists all material IDs, sorted
    pub fn list_materials(&self) -> Vec<&MaterialId> {
        let mut ids: Vec<&MaterialId> = self.materials.keys().collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }
}
