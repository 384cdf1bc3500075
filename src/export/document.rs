//! Document assembly.
//!
//! Walks the scene once in provider order, serializes every top-level mesh
//! object (and, for the indexed strategy, its direct mesh children) into
//! buffered fragments, then writes the complete document. Nothing reaches the
//! output until every fragment has been produced, so a precondition error
//! never leaves half a document behind.

use std::{borrow::Cow, io::Write};

use rayon::prelude::*;

use super::{
    config::{ExportConfig, Strategy},
    error::ExportError,
    mesh::{serialize_mesh, MeshFragment},
    writer::XmlDocumentWriter,
};
use crate::scene::{MaterialSlot, Mesh, ObjectId, ObjectKind, SceneProvider};

/// Root element name, also checked by the importer
pub const ROOT_ELEMENT: &str = "exporter";

/// What an export wrote
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExportSummary {
    /// `<object>` elements written
    pub objects: usize,
    /// `<mesh>` elements written
    pub meshes: usize,
    /// Direct mesh children left out because the flattened strategy has no
    /// place for them
    pub omitted_children: usize,
    /// Mesh objects nested two or more levels below a top-level object
    pub skipped_grandchildren: usize,
}

/// A top-level object and the meshes written inside its `<object>` element
#[derive(Clone, Debug, PartialEq)]
pub struct ObjectFragment {
    pub name: String,
    pub meshes: Vec<MeshFragment>,
}

/// A fully rendered document
#[derive(Clone, Debug, PartialEq)]
pub struct RenderedDocument {
    pub xml: String,
    pub summary: ExportSummary,
}

struct MeshJob<'s> {
    object: &'s str,
    mesh: Option<Cow<'s, Mesh>>,
    slots: Vec<MaterialSlot<'s>>,
}

impl MeshJob<'_> {
    fn serialize(&self, config: &ExportConfig) -> Result<MeshFragment, ExportError> {
        let mesh = self.mesh.as_ref().ok_or_else(|| ExportError::MissingMesh {
            object: self.object.to_string(),
        })?;
        serialize_mesh(self.object, mesh, &self.slots, config)
    }
}

struct ObjectJob<'s> {
    name: &'s str,
    meshes: Vec<MeshJob<'s>>,
}

impl ObjectJob<'_> {
    fn serialize(&self, config: &ExportConfig) -> Result<ObjectFragment, ExportError> {
        let meshes = self
            .meshes
            .iter()
            .map(|job| job.serialize(config))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ObjectFragment {
            name: self.name.to_string(),
            meshes,
        })
    }
}

fn mesh_job<P: SceneProvider + ?Sized>(scene: &P, id: ObjectId) -> MeshJob<'_> {
    MeshJob {
        object: scene.name(id),
        mesh: scene.mesh(id),
        slots: scene.material_slots(id),
    }
}

fn mesh_children<P: SceneProvider + ?Sized>(scene: &P, id: ObjectId) -> Vec<ObjectId> {
    scene
        .children(id)
        .into_iter()
        .filter(|&child| scene.kind(child) == ObjectKind::Mesh)
        .collect()
}

/// Counts mesh objects at any depth below `id`
fn count_mesh_descendants<P: SceneProvider + ?Sized>(scene: &P, id: ObjectId) -> usize {
    mesh_children(scene, id)
        .into_iter()
        .map(|child| 1 + count_mesh_descendants(scene, child))
        .sum()
}

/// Decides which objects end up in the document, in provider order.
fn plan<'s, P: SceneProvider + ?Sized>(
    scene: &'s P,
    config: &ExportConfig,
    summary: &mut ExportSummary,
) -> Vec<ObjectJob<'s>> {
    let mut jobs = Vec::new();

    for id in scene.objects() {
        if scene.kind(id) != ObjectKind::Mesh || scene.parent(id).is_some() {
            continue;
        }

        let name = scene.name(id);
        let mut meshes = vec![mesh_job(scene, id)];

        for child in mesh_children(scene, id) {
            match config.strategy {
                Strategy::Indexed => meshes.push(mesh_job(scene, child)),
                Strategy::Flattened => {
                    log::debug!(
                        "Omitting child '{}' of '{}': the flattened format has no nested meshes",
                        scene.name(child),
                        name
                    );
                    summary.omitted_children += 1;
                }
            }

            let nested = count_mesh_descendants(scene, child);
            if nested > 0 {
                log::debug!(
                    "Skipping {} object(s) nested below '{}': only one level of parenting is exported",
                    nested,
                    scene.name(child)
                );
                summary.skipped_grandchildren += nested;
            }
        }

        summary.meshes += meshes.len();
        jobs.push(ObjectJob { name, meshes });
    }

    summary.objects = jobs.len();
    jobs
}

/// Serializes every exported object of the scene into buffered fragments.
///
/// With [`ExportConfig::parallel`] the objects are serialized on the rayon pool;
/// fragments come back in provider order either way, and the error reported is
/// the one of the first failing object in that order.
pub fn collect_fragments<P: SceneProvider + ?Sized>(
    scene: &P,
    config: &ExportConfig,
) -> Result<(Vec<ObjectFragment>, ExportSummary), ExportError> {
    let mut summary = ExportSummary::default();
    let jobs = plan(scene, config, &mut summary);

    let fragments = if config.parallel {
        jobs.par_iter()
            .map(|job| job.serialize(config))
            .collect::<Vec<_>>()
            .into_iter()
            .collect::<Result<Vec<_>, _>>()?
    } else {
        jobs.iter()
            .map(|job| job.serialize(config))
            .collect::<Result<Vec<_>, _>>()?
    };

    Ok((fragments, summary))
}

/// Writes a complete document for already serialized fragments.
pub fn write_document<W: Write>(
    out: W,
    fragments: &[ObjectFragment],
    config: &ExportConfig,
) -> Result<W, ExportError> {
    let mut writer = XmlDocumentWriter::new(out);

    writer.declaration()?;
    writer.open(ROOT_ELEMENT, &[("version", config.strategy.format_version())])?;

    let created = config.created_date().format("%Y-%m-%d").to_string();
    writer.open("info", &[])?;
    writer.text_element("author", &[], "")?;
    writer.text_element("created", &[], &created)?;
    writer.close("info")?;

    for object in fragments {
        writer.open("object", &[("id", object.name.as_str())])?;
        for mesh in &object.meshes {
            mesh.write(&mut writer)?;
        }
        writer.close("object")?;
    }

    writer.close(ROOT_ELEMENT)?;
    writer.finish()
}

/// Renders the whole document for `scene` into memory.
pub fn render_document<P: SceneProvider + ?Sized>(
    scene: &P,
    config: &ExportConfig,
) -> Result<RenderedDocument, ExportError> {
    let (fragments, summary) = collect_fragments(scene, config)?;
    let bytes = write_document(Vec::new(), &fragments, config)?;
    let xml = String::from_utf8(bytes).map_err(ExportError::xml)?;
    Ok(RenderedDocument { xml, summary })
}
