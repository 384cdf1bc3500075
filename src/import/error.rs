use thiserror::Error;

/// Errors raised while reading a scene document back in.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("XML parse error: {0}")]
    Xml(String),

    #[error("not a scene document: root element is <{0}>")]
    WrongDocType(String),

    #[error("<{element}> missing in {context}")]
    MissingElement { element: String, context: String },

    #[error("<{element}> has no '{attribute}' attribute")]
    MissingAttribute { element: String, attribute: String },

    #[error("<{element}> should hold {expected} values but holds {found}")]
    CountMismatch {
        element: String,
        expected: usize,
        found: usize,
    },

    #[error("invalid number '{value}' in <{element}>")]
    InvalidNumber { element: String, value: String },
}

impl ImportError {
    pub(crate) fn xml<T: ToString>(msg: T) -> Self {
        ImportError::Xml(msg.to_string())
    }
}
