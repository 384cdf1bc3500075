use thiserror::Error;

use crate::scene::MeshError;

/// Errors that abort an export.
///
/// Precondition errors name the offending object so the user can fix the
/// scene; no document is written when any of them occurs.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("object '{object}' has no active material")]
    MissingMaterial { object: String },

    #[error("object '{object}' references unknown material '{material}'")]
    UnknownMaterial { object: String, material: String },

    #[error("object '{object}' uses {count} materials; split it into single-material child objects")]
    MultipleMaterials { object: String, count: usize },

    #[error("object '{object}' has no mesh data")]
    MissingMesh { object: String },

    #[error("object '{object}' has no active UV layer, required by the flattened strategy")]
    MissingUvLayer { object: String },

    #[error("object '{object}' has no texture image, required by the flattened strategy")]
    MissingTexture { object: String },

    #[error("object '{object}' has an invalid mesh: {source}")]
    InvalidMesh {
        object: String,
        #[source]
        source: MeshError,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("XML write error: {0}")]
    Xml(String),
}

impl ExportError {
    pub(crate) fn xml<T: ToString>(msg: T) -> Self {
        ExportError::Xml(msg.to_string())
    }

    /// The object the error is about, if it is a precondition error
    pub fn object(&self) -> Option<&str> {
        match self {
            ExportError::MissingMaterial { object }
            | ExportError::UnknownMaterial { object, .. }
            | ExportError::MultipleMaterials { object, .. }
            | ExportError::MissingMesh { object }
            | ExportError::MissingUvLayer { object }
            | ExportError::MissingTexture { object }
            | ExportError::InvalidMesh { object, .. } => Some(object),
            ExportError::Io(_) | ExportError::Xml(_) => None,
        }
    }
}
