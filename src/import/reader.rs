//! Event-driven document reader.

use quick_xml::{
    events::{BytesStart, Event},
    Reader,
};

use super::{error::ImportError, ImportedDocument, ImportedMesh, ImportedObject};
use crate::export::document::ROOT_ELEMENT;

#[derive(Default)]
struct MeshBuilder {
    object: String,
    positions: Option<Vec<[f32; 3]>>,
    normals: Option<Vec<[f32; 3]>>,
    face_indices: Option<Vec<u32>>,
    uv_coords: Option<Vec<[f32; 2]>>,
    texture_image: Option<String>,
    color: Option<[f32; 3]>,
}

impl MeshBuilder {
    fn finish(self) -> Result<ImportedMesh, ImportError> {
        let context = format!("mesh of '{}'", self.object);
        let missing = |element: &str| ImportError::MissingElement {
            element: element.to_string(),
            context: context.clone(),
        };

        let positions = self.positions.ok_or_else(|| missing("vertex_positions"))?;
        let normals = self.normals.ok_or_else(|| missing("vertex_normals"))?;
        let color = self.color.ok_or_else(|| missing("color"))?;

        if normals.len() != positions.len() {
            return Err(ImportError::CountMismatch {
                element: "vertex_normals".to_string(),
                expected: positions.len() * 3,
                found: normals.len() * 3,
            });
        }

        Ok(ImportedMesh {
            object: self.object,
            positions,
            normals,
            face_indices: self.face_indices,
            uv_coords: self.uv_coords,
            texture_image: self.texture_image,
            color,
        })
    }
}

#[derive(Default)]
struct DocumentParser {
    document: Option<ImportedDocument>,
    object: Option<ImportedObject>,
    mesh: Option<MeshBuilder>,
    text: String,
    count: Option<usize>,
}

impl DocumentParser {
    fn start(&mut self, e: &BytesStart) -> Result<(), ImportError> {
        let name = element_name(e.name().as_ref())?;
        self.text.clear();
        self.count = None;

        match name.as_str() {
            ROOT_ELEMENT => {
                if self.document.is_some() {
                    return Err(ImportError::xml("nested <exporter> element"));
                }
                self.document = Some(ImportedDocument {
                    version: required_attribute(e, &name, "version")?,
                    ..Default::default()
                });
            }
            _ if self.document.is_none() => return Err(ImportError::WrongDocType(name)),
            "object" => {
                self.object = Some(ImportedObject {
                    name: required_attribute(e, &name, "id")?,
                    meshes: Vec::new(),
                });
            }
            "mesh" => {
                let id = required_attribute(e, &name, "id")?;
                let object = id.strip_suffix("_mesh").unwrap_or(&id).to_string();
                self.mesh = Some(MeshBuilder {
                    object,
                    ..Default::default()
                });
            }
            "vertex_positions" | "vertex_normals" | "face_indices" | "uv_coords" => {
                let count = required_attribute(e, &name, "count")?;
                self.count = Some(count.parse().map_err(|_| ImportError::InvalidNumber {
                    element: name.clone(),
                    value: count,
                })?);
            }
            _ => {}
        }
        Ok(())
    }

    fn end(&mut self, name: &str) -> Result<(), ImportError> {
        let text = std::mem::take(&mut self.text);

        match name {
            "author" => self.document_mut(name)?.author = text,
            "created" => self.document_mut(name)?.created = text,
            "vertex_positions" => {
                let values = group::<3>(name, &text, self.count)?;
                self.mesh_mut(name)?.positions = Some(values);
            }
            "vertex_normals" => {
                let values = group::<3>(name, &text, self.count)?;
                self.mesh_mut(name)?.normals = Some(values);
            }
            "uv_coords" => {
                let values = group::<2>(name, &text, self.count)?;
                self.mesh_mut(name)?.uv_coords = Some(values);
            }
            "face_indices" => {
                let values = parse_values::<u32>(name, &text)?;
                check_count(name, self.count, 1, values.len())?;
                self.mesh_mut(name)?.face_indices = Some(values);
            }
            "texture_image" => self.mesh_mut(name)?.texture_image = Some(text),
            "color" => {
                let values = group::<3>(name, &text, Some(1))?;
                self.mesh_mut(name)?.color = Some(values[0]);
            }
            "mesh" => {
                let mesh = self
                    .mesh
                    .take()
                    .ok_or_else(|| ImportError::xml("unbalanced </mesh>"))?
                    .finish()?;
                self.object
                    .as_mut()
                    .ok_or_else(|| ImportError::xml("<mesh> outside <object>"))?
                    .meshes
                    .push(mesh);
            }
            "object" => {
                let object = self
                    .object
                    .take()
                    .ok_or_else(|| ImportError::xml("unbalanced </object>"))?;
                self.document_mut(name)?.objects.push(object);
            }
            _ => {}
        }
        Ok(())
    }

    fn document_mut(&mut self, element: &str) -> Result<&mut ImportedDocument, ImportError> {
        self.document
            .as_mut()
            .ok_or_else(|| ImportError::WrongDocType(element.to_string()))
    }

    fn mesh_mut(&mut self, element: &str) -> Result<&mut MeshBuilder, ImportError> {
        self.mesh
            .as_mut()
            .ok_or_else(|| ImportError::xml(format!("<{}> outside <mesh>", element)))
    }

    fn finish(self) -> Result<ImportedDocument, ImportError> {
        if self.mesh.is_some() || self.object.is_some() {
            return Err(ImportError::xml("document ends inside an <object>"));
        }
        self.document.ok_or_else(|| ImportError::MissingElement {
            element: ROOT_ELEMENT.to_string(),
            context: "document".to_string(),
        })
    }
}

/// Parses a document produced by the exporter.
pub fn read_document(xml: &str) -> Result<ImportedDocument, ImportError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut parser = DocumentParser::default();
    loop {
        match reader.read_event().map_err(ImportError::xml)? {
            Event::Start(ref e) => parser.start(e)?,
            Event::Empty(ref e) => {
                parser.start(e)?;
                parser.end(&element_name(e.name().as_ref())?)?;
            }
            Event::Text(t) => {
                let text = t.unescape().map_err(ImportError::xml)?;
                parser.text.push_str(&text);
            }
            Event::End(ref e) => parser.end(&element_name(e.name().as_ref())?)?,
            Event::Eof => break,
            _ => {}
        }
    }

    parser.finish()
}

fn element_name(raw: &[u8]) -> Result<String, ImportError> {
    std::str::from_utf8(raw)
        .map(str::to_string)
        .map_err(ImportError::xml)
}

fn required_attribute(e: &BytesStart, element: &str, key: &str) -> Result<String, ImportError> {
    for attr in e.attributes() {
        let attr = attr.map_err(ImportError::xml)?;
        if attr.key.as_ref() == key.as_bytes() {
            let value = attr.unescape_value().map_err(ImportError::xml)?;
            return Ok(value.into_owned());
        }
    }
    Err(ImportError::MissingAttribute {
        element: element.to_string(),
        attribute: key.to_string(),
    })
}

fn parse_values<T: std::str::FromStr>(element: &str, text: &str) -> Result<Vec<T>, ImportError> {
    text.split_whitespace()
        .map(|value| {
            value.parse().map_err(|_| ImportError::InvalidNumber {
                element: element.to_string(),
                value: value.to_string(),
            })
        })
        .collect()
}

fn check_count(
    element: &str,
    declared: Option<usize>,
    width: usize,
    found: usize,
) -> Result<(), ImportError> {
    if let Some(count) = declared {
        let expected = count
            .checked_mul(width)
            .ok_or_else(|| ImportError::InvalidNumber {
                element: element.to_string(),
                value: count.to_string(),
            })?;
        if expected != found {
            return Err(ImportError::CountMismatch {
                element: element.to_string(),
                expected,
                found,
            });
        }
    }

    if found % width != 0 {
        return Err(ImportError::CountMismatch {
            element: element.to_string(),
            expected: found - found % width,
            found,
        });
    }
    Ok(())
}

fn group<const N: usize>(
    element: &str,
    text: &str,
    declared: Option<usize>,
) -> Result<Vec<[f32; N]>, ImportError> {
    let values = parse_values::<f32>(element, text)?;
    check_count(element, declared, N, values.len())?;
    Ok(values
        .chunks_exact(N)
        .map(|chunk| {
            let mut group = [0.0; N];
            group.copy_from_slice(chunk);
            group
        })
        .collect())
}
