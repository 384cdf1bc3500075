//! Wavefront OBJ loading.
//!
//! Every model in the file becomes one mesh object. Faces are kept as authored
//! (no triangulation) and per-corner normals and texture coordinates become
//! split normals and a UV layer, so both export strategies have what they
//! need. Materials come from the MTL library next to the OBJ file.

use std::path::Path;

use cgmath::{Vector3, Zero};
use thiserror::Error;

use super::{
    mesh::{unit_or_fallback, FALLBACK_NORMAL},
    Material, Mesh, MeshError, Object, ObjectId, Polygon, Scene,
};
use crate::geometry::DEFAULT_UV_LAYER;

#[derive(Debug, Error)]
pub enum SceneLoadError {
    #[error("failed to load OBJ file {path}: {source}")]
    Obj {
        path: String,
        #[source]
        source: tobj::LoadError,
    },

    #[error("model '{object}' in {path} is malformed: {source}")]
    InvalidMesh {
        path: String,
        object: String,
        #[source]
        source: MeshError,
    },
}

impl Scene {
    /// Creates a scene from an OBJ file.
    pub fn from_obj(path: impl AsRef<Path>) -> Result<Self, SceneLoadError> {
        let mut scene = Scene::new();
        scene.load_obj(path)?;
        Ok(scene)
    }

    /// Loads the models of an OBJ file as new objects.
    ///
    /// Materials already known by name are kept as they are. Returns the ids of
    /// the added objects in file order.
    pub fn load_obj(&mut self, path: impl AsRef<Path>) -> Result<Vec<ObjectId>, SceneLoadError> {
        let path = path.as_ref();
        let (models, materials) = tobj::load_obj(
            path,
            &tobj::LoadOptions {
                triangulate: false,
                single_index: false,
                ..Default::default()
            },
        )
        .map_err(|source| SceneLoadError::Obj {
            path: path.display().to_string(),
            source,
        })?;

        let materials = materials.unwrap_or_else(|e| {
            log::warn!("No usable MTL library for {}: {}", path.display(), e);
            Vec::new()
        });

        for (i, mtl) in materials.iter().enumerate() {
            let material_name = material_name(mtl, i);
            if self.get_material_manager().get_material(&material_name).is_some() {
                continue;
            }

            let diffuse = mtl.diffuse.unwrap_or([0.8, 0.8, 0.8]);
            self.add_material(Material::new(
                &material_name,
                [diffuse[0], diffuse[1], diffuse[2], mtl.dissolve.unwrap_or(1.0)],
            ));
        }

        let mut ids = Vec::with_capacity(models.len());
        for (i, model) in models.iter().enumerate() {
            let desired = if model.name.is_empty() {
                format!("object_{}", i)
            } else {
                model.name.clone()
            };
            let name = self.ensure_unique_name(&desired);

            let material = model
                .mesh
                .material_id
                .and_then(|id| materials.get(id).map(|mtl| (id, mtl)));

            let mut mesh = convert_mesh(&model.mesh);
            if let Some(texture) = material.and_then(|(_, mtl)| mtl.diffuse_texture.as_deref()) {
                mesh.set_texture_image(Some(texture.to_string()));
            }
            mesh.validate().map_err(|source| SceneLoadError::InvalidMesh {
                path: path.display().to_string(),
                object: name.clone(),
                source,
            })?;

            log::debug!(
                "Loaded '{}': {} vertices, {} polygons",
                name,
                mesh.vertex_count(),
                mesh.polygon_count()
            );

            let mut object = Object::new(&name, mesh);
            if let Some((id, mtl)) = material {
                object.set_material(&material_name(mtl, id));
            }
            ids.push(self.add_object(object));
        }

        log::info!(
            "Loaded {} object(s) and {} material(s) from {}",
            ids.len(),
            materials.len(),
            path.display()
        );
        Ok(ids)
    }
}

fn material_name(mtl: &tobj::Material, index: usize) -> String {
    if mtl.name.is_empty() {
        format!("material_{}", index)
    } else {
        mtl.name.clone()
    }
}

fn triples(values: &[f32]) -> Vec<[f32; 3]> {
    values.chunks_exact(3).map(|v| [v[0], v[1], v[2]]).collect()
}

fn convert_mesh(source: &tobj::Mesh) -> Mesh {
    let positions = triples(&source.positions);

    // No arities means every face is a triangle
    let polygons: Vec<Polygon> = if source.face_arities.is_empty() {
        source.indices.chunks_exact(3).map(Polygon::new).collect()
    } else {
        let mut start = 0;
        source
            .face_arities
            .iter()
            .map(|&arity| {
                let end = start + arity as usize;
                let polygon = Polygon::new(&source.indices[start..end]);
                start = end;
                polygon
            })
            .collect()
    };

    let has_split_normals =
        !source.normals.is_empty() && source.normal_indices.len() == source.indices.len();
    let split_normals: Option<Vec<[f32; 3]>> = has_split_normals.then(|| {
        let normals = triples(&source.normals);
        source
            .normal_indices
            .iter()
            .map(|&i| normals.get(i as usize).copied().unwrap_or(FALLBACK_NORMAL))
            .collect()
    });

    let vertex_normals = match &split_normals {
        Some(split) => average_split_normals(positions.len(), &source.indices, split),
        None => Vec::new(),
    };

    let mut mesh = Mesh::new(positions, vertex_normals, polygons);
    if let Some(split) = split_normals {
        mesh = mesh.with_split_normals(split);
    }

    if !source.texcoords.is_empty() && source.texcoord_indices.len() == source.indices.len() {
        let uvs = source
            .texcoord_indices
            .iter()
            .map(|&i| {
                let i = i as usize * 2;
                match source.texcoords.get(i..i + 2) {
                    Some(uv) => [uv[0], uv[1]],
                    None => [0.0, 0.0],
                }
            })
            .collect();
        mesh.add_uv_layer(DEFAULT_UV_LAYER, uvs);
    }

    mesh
}

/// Smooth vertex normals from the normals of every corner that uses the vertex
fn average_split_normals(vertex_count: usize, indices: &[u32], split: &[[f32; 3]]) -> Vec<[f32; 3]> {
    let mut sums = vec![Vector3::<f32>::zero(); vertex_count];
    for (&vertex, &normal) in indices.iter().zip(split) {
        if let Some(sum) = sums.get_mut(vertex as usize) {
            *sum += Vector3::from(normal);
        }
    }

    sums.into_iter().map(unit_or_fallback).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::{render_document, ExportConfig, Strategy};
    use std::{fs, path::PathBuf};

    const PLATE_OBJ: &str = "mtllib plate.mtl
o Plate
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
vt 0 0
vt 1 0
vt 1 1
vt 0 1
vn 0 0 1
usemtl Brass
f 1/1/1 2/2/1 3/3/1 4/4/1
";

    const PLATE_MTL: &str = "newmtl Brass
Kd 0.9 0.7 0.2
d 1.0
map_Kd textures/brass.png
";

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("scene-exporter-obj-{}-{}", name, std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_loads_quad_with_material_and_uvs() {
        let dir = scratch_dir("plate");
        fs::write(dir.join("plate.obj"), PLATE_OBJ).unwrap();
        fs::write(dir.join("plate.mtl"), PLATE_MTL).unwrap();

        let scene = Scene::from_obj(dir.join("plate.obj")).unwrap();
        assert_eq!(scene.get_object_names(), ["Plate"]);

        let plate = scene.get_object(0).unwrap();
        assert_eq!(plate.get_material_id().map(String::as_str), Some("Brass"));

        let mesh = plate.mesh.as_ref().unwrap();
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.polygons(), [Polygon::new([0, 1, 2, 3])]);
        assert_eq!(mesh.split_normals().map(<[_]>::len), Some(4));
        assert_eq!(mesh.normals()[2], [0.0, 0.0, 1.0]);
        assert_eq!(mesh.active_uv_layer().unwrap().uvs[2], [1.0, 1.0]);
        assert_eq!(mesh.texture_image(), Some("textures/brass.png"));

        let brass = scene.get_material_manager().get_material("Brass").unwrap();
        assert_eq!(brass.rgb(), [0.9, 0.7, 0.2]);

        let rendered = render_document(&scene, &ExportConfig::new(Strategy::Flattened)).unwrap();
        assert!(rendered.xml.contains("resources/textures/brass.png"));
        assert!(rendered.xml.contains(r#"<uv_coords id="Plate_uv" count="4">"#));

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_triangles_without_normals_or_library() {
        let dir = scratch_dir("bare");
        let path = dir.join("bare.obj");
        fs::write(
            &path,
            "mtllib missing.mtl\nv 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nf 1 2 3\nf 1 3 4\n",
        )
        .unwrap();

        let mut scene = Scene::new();
        let ids = scene.load_obj(&path).unwrap();
        assert_eq!(ids.len(), 1);

        let object = scene.get_object(0).unwrap();
        assert!(object.get_material_id().is_none());

        let mesh = object.mesh.as_ref().unwrap();
        assert_eq!(mesh.polygon_count(), 2);
        assert!(mesh.split_normals().is_none());
        assert!(mesh.uv_layers().is_empty());
        // Calculated from the faces, which face +Z
        assert_eq!(mesh.normals()[0], [0.0, 0.0, 1.0]);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let err = Scene::from_obj("/nonexistent/scene.obj").unwrap_err();
        assert!(matches!(err, SceneLoadError::Obj { .. }));
    }
}
