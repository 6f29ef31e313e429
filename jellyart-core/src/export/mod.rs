//! Planning and executing an export run.

pub mod comparator;
mod orchestrator;
pub mod paths;

pub use comparator::{Comparison, SyncOutcome, compare, needs_copy, sync_file};
pub use orchestrator::{ExportRequest, Exporter};
pub use paths::{
    PathContext, artwork_stem, sanitize_name, series_folder, synthesize,
    synthesize_numbered,
};
