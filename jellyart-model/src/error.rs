use std::fmt::{self, Display};

/// Errors produced by model constructors and parsers.
#[derive(Debug)]
pub enum ModelError {
    InvalidId { value: String, source: uuid::Error },
    InvalidExportMethod(String),
}

impl Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelError::InvalidId { value, source } => {
                write!(f, "invalid item id '{value}': {source}")
            }
            ModelError::InvalidExportMethod(value) => write!(
                f,
                "invalid export method '{value}' (expected 'single' or 'separate')"
            ),
        }
    }
}

impl std::error::Error for ModelError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ModelError::InvalidId { source, .. } => Some(source),
            ModelError::InvalidExportMethod(_) => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ModelError>;
