use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("connection file {} not found", .path.display())]
    NotFound { path: PathBuf },
    #[error("failed to read connection file {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("connection file {} is not valid JSON", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("connection setting '{field}' is missing or empty")]
    MissingField { field: &'static str },
    #[error("failed to write connection file {}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to encode connection settings")]
    Encode(#[source] serde_json::Error),
    #[error(
        "invalid connection method '{0}' (expected 'file' or 'parameters')"
    )]
    InvalidConnectionSource(String),
}
