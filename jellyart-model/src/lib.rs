//! Core data model definitions shared across jellyart crates.

pub mod error;
pub mod export;
pub mod ids;
pub mod image;
pub mod item;
pub mod library;

// Intentionally curated re-exports for downstream consumers.
pub use error::{ModelError, Result as ModelResult};
pub use export::{
    ExportMethod, ExportPlan, ExportSummary, ExportTarget, MissingImage,
    PlanEntry,
};
pub use ids::{ItemId, LibraryId};
pub use image::ImageKind;
pub use item::{ItemKind, LibraryItem};
pub use library::{CollectionType, Library};
