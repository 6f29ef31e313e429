//! Locates Jellyfin's cached artwork and exports it into folder layouts that
//! other media players pick up as local images.
//!
//! The pieces compose bottom-up:
//!
//! - [`catalog`] reads libraries and items from the server
//! - [`metadata`] finds the cached image files for an item on disk
//! - [`export`] names destinations, compares and copies files, and drives a
//!   whole run through [`export::Exporter`]

pub mod catalog;
pub mod error;
pub mod export;
pub mod metadata;

pub use catalog::{CatalogError, JellyfinCatalog, LibraryCatalog};
pub use error::{ExportError, Result};
pub use export::{ExportRequest, Exporter};
pub use metadata::MetadataLocator;

pub use jellyart_model as model;
