//! Mesh serialization.
//!
//! Turns one object's finalized mesh into a [`MeshFragment`]: the formatted
//! attribute arrays, their counts, the texture reference and the material
//! color. Serialization is a pure function of its inputs, so fragments for
//! independent objects can be produced in any order (or in parallel) and
//! written afterwards in scene order.

use std::io::Write;

use super::{
    config::{ExportConfig, Strategy},
    coords::{format_number, push_corrected, push_number, COLOR_DECIMALS, VECTOR_DECIMALS},
    error::ExportError,
    writer::XmlDocumentWriter,
};
use crate::scene::{Material, MaterialSlot, Mesh};

/// A formatted attribute array and the number of entries in it
///
/// `count` is the number of vertices, UV pairs or indices written, not the
/// number of scalars.
#[derive(Clone, Debug, PartialEq)]
pub struct AttributeArray {
    pub count: usize,
    pub text: String,
}

impl AttributeArray {
    fn new(count: usize, mut text: String) -> Self {
        text.truncate(text.trim_end().len());
        Self { count, text }
    }
}

/// Everything written for one `<mesh>` element
#[derive(Clone, Debug, PartialEq)]
pub struct MeshFragment {
    /// Name of the object the mesh belongs to, the prefix of every id
    pub object: String,
    pub positions: AttributeArray,
    pub normals: AttributeArray,
    /// Indexed strategy only
    pub face_indices: Option<AttributeArray>,
    /// Flattened strategy only
    pub uv_coords: Option<AttributeArray>,
    /// Flattened strategy only, already rewritten under the resource root
    pub texture_image: Option<String>,
    pub color: [f32; 3],
}

impl MeshFragment {
    /// `<object>_<role>`
    pub fn id(&self, role: &str) -> String {
        format!("{}_{}", self.object, role)
    }

    /// The color channels as written, three decimals each
    pub fn color_text(&self) -> String {
        self.color
            .iter()
            .map(|&c| format_number(c, COLOR_DECIMALS))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Writes the `<mesh>` element and its children
    pub fn write<W: Write>(&self, writer: &mut XmlDocumentWriter<W>) -> Result<(), ExportError> {
        let mesh_id = self.id("mesh");
        writer.open("mesh", &[("id", mesh_id.as_str())])?;

        write_array(writer, "vertex_positions", &self.id("positions"), &self.positions)?;
        write_array(writer, "vertex_normals", &self.id("normals"), &self.normals)?;
        if let Some(indices) = &self.face_indices {
            write_array(writer, "face_indices", &self.id("indices"), indices)?;
        }
        if let Some(uvs) = &self.uv_coords {
            write_array(writer, "uv_coords", &self.id("uv"), uvs)?;
        }
        if let Some(texture) = &self.texture_image {
            let texture_id = self.id("texture");
            writer.text_element("texture_image", &[("id", texture_id.as_str())], texture)?;
        }
        let color_id = self.id("color");
        writer.text_element("color", &[("id", color_id.as_str())], &self.color_text())?;

        writer.close("mesh")
    }
}

fn write_array<W: Write>(
    writer: &mut XmlDocumentWriter<W>,
    element: &str,
    id: &str,
    array: &AttributeArray,
) -> Result<(), ExportError> {
    let count = array.count.to_string();
    writer.text_element(element, &[("id", id), ("count", count.as_str())], &array.text)
}

/// Picks the one material an object is exported with.
///
/// Empty slots are ignored and a material assigned to several slots counts
/// once. A slot naming an unknown material, no material, or more than one
/// distinct material is an error.
pub fn active_material<'a>(
    object: &str,
    slots: &[MaterialSlot<'a>],
) -> Result<&'a Material, ExportError> {
    let mut distinct: Vec<&'a Material> = Vec::new();
    for slot in slots {
        match *slot {
            MaterialSlot::Empty => {}
            MaterialSlot::Assigned(material) => {
                if !distinct.iter().any(|m| m.name == material.name) {
                    distinct.push(material);
                }
            }
            MaterialSlot::Unresolved(material) => {
                return Err(ExportError::UnknownMaterial {
                    object: object.to_string(),
                    material: material.to_string(),
                })
            }
        }
    }

    match distinct.as_slice() {
        [] => Err(ExportError::MissingMaterial {
            object: object.to_string(),
        }),
        [material] => Ok(*material),
        _ => Err(ExportError::MultipleMaterials {
            object: object.to_string(),
            count: distinct.len(),
        }),
    }
}

/// Rewrites a host texture path relative to the renderer's resource root.
///
/// Backslashes become slashes, and a leading `//` (relative to the scene file)
/// plus any leading `./` or `../` segments are dropped. Absolute paths keep
/// only their file name.
pub fn resource_path(resource_root: &str, texture_path: &str) -> String {
    let normalized = texture_path.replace('\\', "/");
    let is_absolute = !normalized.starts_with("//")
        && (normalized.starts_with('/') || normalized.get(1..2) == Some(":"));

    let relative = if is_absolute {
        normalized.rsplit('/').next().unwrap_or_default()
    } else {
        let mut rest = normalized.trim_start_matches("//");
        loop {
            if let Some(stripped) = rest.strip_prefix("../") {
                rest = stripped;
            } else if let Some(stripped) = rest.strip_prefix("./") {
                rest = stripped;
            } else {
                break rest;
            }
        }
    };

    let root = resource_root.trim_end_matches('/');
    if root.is_empty() {
        relative.to_string()
    } else {
        format!("{}/{}", root, relative)
    }
}

/// Serializes one object's mesh with the configured strategy.
///
/// # Errors
///
/// Fails without producing anything when the object has no single material,
/// when the mesh is structurally invalid, or (flattened strategy) when it has
/// no active UV layer or no texture image.
pub fn serialize_mesh(
    object: &str,
    mesh: &Mesh,
    material_slots: &[MaterialSlot<'_>],
    config: &ExportConfig,
) -> Result<MeshFragment, ExportError> {
    let material = active_material(object, material_slots)?;
    mesh.validate().map_err(|source| ExportError::InvalidMesh {
        object: object.to_string(),
        source,
    })?;

    let fragment = match config.strategy {
        Strategy::Indexed => serialize_indexed(object, mesh, material, config),
        Strategy::Flattened => serialize_flattened(object, mesh, material, config)?,
    };

    log::debug!(
        "Serialized mesh of '{}': {} positions, {} normals",
        object,
        fragment.positions.count,
        fragment.normals.count
    );
    Ok(fragment)
}

fn serialize_indexed(
    object: &str,
    mesh: &Mesh,
    material: &Material,
    config: &ExportConfig,
) -> MeshFragment {
    let mut positions = String::new();
    for &position in mesh.positions() {
        push_corrected(&mut positions, position, config.source_axes);
    }

    let mut normals = String::new();
    for &normal in mesh.normals() {
        push_corrected(&mut normals, normal, config.source_axes);
    }

    let mut indices = String::new();
    let mut index_count = 0;
    for (_, vertex) in mesh.loops() {
        indices.push_str(&vertex.to_string());
        indices.push(' ');
        index_count += 1;
    }

    MeshFragment {
        object: object.to_string(),
        positions: AttributeArray::new(mesh.vertex_count(), positions),
        normals: AttributeArray::new(mesh.normals().len(), normals),
        face_indices: Some(AttributeArray::new(index_count, indices)),
        uv_coords: None,
        texture_image: None,
        color: material.rgb(),
    }
}

fn serialize_flattened(
    object: &str,
    mesh: &Mesh,
    material: &Material,
    config: &ExportConfig,
) -> Result<MeshFragment, ExportError> {
    let uv_layer = mesh.active_uv_layer().ok_or_else(|| ExportError::MissingUvLayer {
        object: object.to_string(),
    })?;
    let texture = mesh
        .texture_image()
        .filter(|path| !path.trim().is_empty())
        .ok_or_else(|| ExportError::MissingTexture {
            object: object.to_string(),
        })?;

    let split_normals = mesh.split_normals();
    let mut positions = String::new();
    let mut normals = String::new();
    let mut uvs = String::new();
    let mut loop_count = 0;

    // validate() guarantees every index and per-loop array is in range
    for (loop_index, vertex) in mesh.loops() {
        let vertex = vertex as usize;
        push_corrected(&mut positions, mesh.positions()[vertex], config.source_axes);

        let normal = match split_normals {
            Some(split) => split[loop_index],
            None => mesh.normals()[vertex],
        };
        push_corrected(&mut normals, normal, config.source_axes);

        // Flip V: the renderer samples textures from the top-left corner
        let [u, v] = uv_layer.uvs[loop_index];
        push_number(&mut uvs, u, VECTOR_DECIMALS);
        push_number(&mut uvs, 1.0 - v, VECTOR_DECIMALS);

        loop_count += 1;
    }

    Ok(MeshFragment {
        object: object.to_string(),
        positions: AttributeArray::new(loop_count, positions),
        normals: AttributeArray::new(loop_count, normals),
        face_indices: None,
        uv_coords: Some(AttributeArray::new(loop_count, uvs)),
        texture_image: Some(resource_path(&config.resource_root, texture)),
        color: material.rgb(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{generate_cube, generate_plane, generate_triangle};
    use crate::scene::{MeshError, Polygon};

    fn red() -> Material {
        Material::new("Red", [1.0, 0.25, 0.0, 1.0])
    }

    fn groups(array: &AttributeArray, width: usize) -> usize {
        let values = array.text.split_whitespace().count();
        assert_eq!(values % width, 0, "ragged array {:?}", array.text);
        values / width
    }

    #[test]
    fn test_single_triangle_indexed() {
        let material = red();
        let fragment = serialize_mesh(
            "Tri",
            &generate_triangle(),
            &[MaterialSlot::Assigned(&material)],
            &ExportConfig::new(Strategy::Indexed),
        )
        .unwrap();

        assert_eq!(fragment.positions.count, 3);
        assert_eq!(
            fragment.positions.text,
            "0.0000 0.0000 0.0000 1.0000 0.0000 0.0000 0.0000 0.0000 -1.0000"
        );
        assert_eq!(fragment.normals.count, 3);
        assert_eq!(
            fragment.normals.text,
            "0.0000 1.0000 0.0000 0.0000 1.0000 0.0000 0.0000 1.0000 0.0000"
        );
        let indices = fragment.face_indices.as_ref().unwrap();
        assert_eq!(indices.count, 3);
        assert_eq!(indices.text, "0 1 2");
        assert_eq!(fragment.color_text(), "1.000 0.250 0.000");
        assert!(fragment.uv_coords.is_none());
        assert!(fragment.texture_image.is_none());
    }

    #[test]
    fn test_indexed_counts_match_content() {
        let material = red();
        let cube = generate_cube();
        let fragment = serialize_mesh(
            "Cube",
            &cube,
            &[MaterialSlot::Assigned(&material)],
            &ExportConfig::default(),
        )
        .unwrap();

        assert_eq!(fragment.positions.count, 8);
        assert_eq!(groups(&fragment.positions, 3), 8);
        assert_eq!(groups(&fragment.normals, 3), 8);

        let indices = fragment.face_indices.unwrap();
        assert_eq!(indices.count, 24);
        assert_eq!(groups(&indices, 1), 24);
        for index in indices.text.split_whitespace() {
            let index: usize = index.parse().unwrap();
            assert!(index < 8);
        }
    }

    #[test]
    fn test_flattened_duplicates_shared_vertices() {
        let material = red();
        let cube = generate_cube().with_texture_image("//../textures/crate.png");
        let fragment = serialize_mesh(
            "Crate",
            &cube,
            &[MaterialSlot::Assigned(&material)],
            &ExportConfig::new(Strategy::Flattened),
        )
        .unwrap();

        assert_eq!(fragment.positions.count, 24);
        assert_eq!(fragment.normals.count, 24);
        assert_eq!(groups(&fragment.positions, 3), 24);
        assert_eq!(groups(&fragment.normals, 3), 24);

        let uvs = fragment.uv_coords.as_ref().unwrap();
        assert_eq!(uvs.count, 24);
        assert_eq!(groups(uvs, 2), 24);
        // First face loops map (0,0) (1,0) (1,1) (0,1), V flipped
        assert!(uvs.text.starts_with("0.0000 1.0000 1.0000 1.0000 1.0000 0.0000 0.0000 0.0000"));

        assert_eq!(fragment.texture_image.as_deref(), Some("resources/textures/crate.png"));
        assert!(fragment.face_indices.is_none());
    }

    #[test]
    fn test_flattened_uses_split_normals() {
        let material = red();
        let cube = generate_cube().with_texture_image("crate.png");
        let fragment = serialize_mesh(
            "Crate",
            &cube,
            &[MaterialSlot::Assigned(&material)],
            &ExportConfig::new(Strategy::Flattened),
        )
        .unwrap();

        // The bottom face comes first; its -Z normal becomes -Y
        let first: Vec<&str> = fragment.normals.text.split_whitespace().take(3).collect();
        assert_eq!(first, ["0.0000", "-1.0000", "0.0000"]);
    }

    #[test]
    fn test_flattened_falls_back_to_vertex_normals() {
        let material = red();
        let plane = generate_plane(2.0, 2.0, 1, 1).with_texture_image("grass.png");
        let fragment = serialize_mesh(
            "Ground",
            &plane,
            &[MaterialSlot::Assigned(&material)],
            &ExportConfig::new(Strategy::Flattened),
        )
        .unwrap();

        assert_eq!(fragment.normals.count, 4);
        assert_eq!(
            fragment.normals.text,
            ["0.0000 1.0000 0.0000"; 4].join(" ")
        );
    }

    #[test]
    fn test_zero_polygon_mesh_is_not_an_error() {
        let material = red();
        let empty = Mesh::new(Vec::new(), Vec::new(), Vec::new())
            .with_uv_layer("UVMap", Vec::new())
            .with_texture_image("empty.png");

        for strategy in [Strategy::Indexed, Strategy::Flattened] {
            let fragment = serialize_mesh(
                "Empty",
                &empty,
                &[MaterialSlot::Assigned(&material)],
                &ExportConfig::new(strategy),
            )
            .unwrap();
            assert_eq!(fragment.positions.count, 0);
            assert_eq!(fragment.positions.text, "");
            assert_eq!(fragment.normals.count, 0);
        }
    }

    #[test]
    fn test_loose_vertex_gets_up_normal() {
        let material = red();
        let point = Mesh::new(vec![[1.0, 2.0, 3.0]], Vec::new(), Vec::new());

        let fragment = serialize_mesh(
            "Point",
            &point,
            &[MaterialSlot::Assigned(&material)],
            &ExportConfig::new(Strategy::Indexed),
        )
        .unwrap();
        assert_eq!(fragment.positions.text, "1.0000 3.0000 -2.0000");
        assert_eq!(fragment.normals.text, "0.0000 1.0000 0.0000");
    }

    #[test]
    fn test_missing_material_is_fatal() {
        let result = serialize_mesh(
            "Bare",
            &generate_triangle(),
            &[MaterialSlot::Empty],
            &ExportConfig::default(),
        );
        assert!(matches!(
            result,
            Err(ExportError::MissingMaterial { ref object }) if object == "Bare"
        ));
    }

    #[test]
    fn test_multiple_materials_are_fatal() {
        let red = red();
        let blue = Material::new("Blue", [0.0, 0.0, 1.0, 1.0]);
        let result = serialize_mesh(
            "Car",
            &generate_cube(),
            &[MaterialSlot::Assigned(&red), MaterialSlot::Empty, MaterialSlot::Assigned(&blue)],
            &ExportConfig::default(),
        );
        assert!(matches!(
            result,
            Err(ExportError::MultipleMaterials { count: 2, .. })
        ));

        // The same material in two slots is still one material
        assert!(active_material("Car", &[MaterialSlot::Assigned(&red), MaterialSlot::Assigned(&red)]).is_ok());
    }

    #[test]
    fn test_unknown_material_is_fatal() {
        let red = red();
        let result = serialize_mesh(
            "Cube",
            &generate_cube(),
            &[MaterialSlot::Assigned(&red), MaterialSlot::Unresolved("Typo")],
            &ExportConfig::default(),
        );
        assert!(matches!(
            result,
            Err(ExportError::UnknownMaterial { ref object, ref material })
                if object == "Cube" && material == "Typo"
        ));
    }

    #[test]
    fn test_flattened_requires_uv_layer_and_texture() {
        let material = red();
        let config = ExportConfig::new(Strategy::Flattened);

        let no_uv = Mesh::new(
            vec![[0.0; 3]; 3],
            vec![[0.0, 0.0, 1.0]; 3],
            vec![Polygon::new([0, 1, 2])],
        )
        .with_texture_image("wood.png");
        assert!(matches!(
            serialize_mesh("NoUv", &no_uv, &[MaterialSlot::Assigned(&material)], &config),
            Err(ExportError::MissingUvLayer { .. })
        ));

        assert!(matches!(
            serialize_mesh("NoTexture", &generate_triangle(), &[MaterialSlot::Assigned(&material)], &config),
            Err(ExportError::MissingTexture { .. })
        ));

        let blank = generate_triangle().with_texture_image("");
        assert!(matches!(
            serialize_mesh("Blank", &blank, &[MaterialSlot::Assigned(&material)], &config),
            Err(ExportError::MissingTexture { ref object }) if object == "Blank"
        ));

        // The indexed strategy needs neither
        assert!(serialize_mesh("NoUv", &no_uv, &[MaterialSlot::Assigned(&material)], &ExportConfig::default()).is_ok());
    }

    #[test]
    fn test_invalid_mesh_is_fatal() {
        let material = red();
        let broken = Mesh::new(
            vec![[0.0; 3]; 2],
            vec![[0.0, 0.0, 1.0]; 2],
            vec![Polygon::new([0, 1, 2])],
        );
        let err = serialize_mesh("Broken", &broken, &[MaterialSlot::Assigned(&material)], &ExportConfig::default())
            .unwrap_err();
        assert_eq!(err.object(), Some("Broken"));
        assert!(matches!(
            err,
            ExportError::InvalidMesh {
                source: MeshError::IndexOutOfRange { index: 2, .. },
                ..
            }
        ));
    }

    #[test]
    fn test_resource_paths() {
        assert_eq!(resource_path("resources/", "//../wood.png"), "resources/wood.png");
        assert_eq!(resource_path("resources", "//textures\\wood.png"), "resources/textures/wood.png");
        assert_eq!(resource_path("resources/", "./maps/wood.png"), "resources/maps/wood.png");
        assert_eq!(resource_path("resources/", "/home/me/art/wood.png"), "resources/wood.png");
        assert_eq!(resource_path("resources/", "C:\\art\\wood.png"), "resources/wood.png");
        assert_eq!(resource_path("", "../wood.png"), "wood.png");
    }
}
