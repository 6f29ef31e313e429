//! On-disk lookup of the server's cached artwork.

mod locator;

pub use locator::{CachedImage, IMAGE_EXTENSIONS, MetadataLocator, cache_stems};
