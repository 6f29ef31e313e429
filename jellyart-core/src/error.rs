use std::{io, path::PathBuf};

use jellyart_model::{ImageKind, ItemId};
use thiserror::Error;

use crate::catalog::CatalogError;

/// Failures an export run can hit.
///
/// Only some of them end a run; see [`ExportError::is_fatal`]. The rest are
/// logged and counted against the affected item.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("media server error: {0}")]
    Api(#[from] CatalogError),

    #[error(
        "library '{name}' has type '{collection_type}'; only tvshows and movies libraries can be exported"
    )]
    UnsupportedLibrary {
        name: String,
        collection_type: String,
    },

    #[error("metadata store {} is not accessible", .path.display())]
    MetadataAccess {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("no cached {kind} image for item {item_id}")]
    ImageNotFound { item_id: ItemId, kind: ImageKind },

    #[error("failed to write {}", .destination.display())]
    Copy {
        destination: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ExportError {
    /// Whether the run has to stop. Missing images and per-file copy
    /// failures are tallied instead.
    pub fn is_fatal(&self) -> bool {
        match self {
            ExportError::Configuration(_)
            | ExportError::Api(_)
            | ExportError::UnsupportedLibrary { .. }
            | ExportError::MetadataAccess { .. } => true,
            ExportError::ImageNotFound { .. } | ExportError::Copy { .. } => {
                false
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, ExportError>;

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn only_setup_failures_are_fatal() {
        let missing = ExportError::ImageNotFound {
            item_id: ItemId(Uuid::nil()),
            kind: ImageKind::Primary,
        };
        assert!(!missing.is_fatal());

        let copy = ExportError::Copy {
            destination: PathBuf::from("/out/poster.jpg"),
            source: io::Error::from(io::ErrorKind::PermissionDenied),
        };
        assert!(!copy.is_fatal());

        let unsupported = ExportError::UnsupportedLibrary {
            name: "Music".into(),
            collection_type: "music".into(),
        };
        assert!(unsupported.is_fatal());
        assert!(unsupported.to_string().contains("'music'"));
    }
}
