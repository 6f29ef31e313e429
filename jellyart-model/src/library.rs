use std::{fmt, path::PathBuf};

use crate::ids::LibraryId;

/// Content type of a Jellyfin virtual folder.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CollectionType {
    TvShows,
    Movies,
    /// Music, books, mixed folders, ... listed but never exported.
    Other(String),
}

impl CollectionType {
    pub fn parse(value: &str) -> Self {
        if value.eq_ignore_ascii_case("tvshows") {
            CollectionType::TvShows
        } else if value.eq_ignore_ascii_case("movies") {
            CollectionType::Movies
        } else {
            CollectionType::Other(value.to_ascii_lowercase())
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            CollectionType::TvShows => "tvshows",
            CollectionType::Movies => "movies",
            CollectionType::Other(value) => value.as_str(),
        }
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, CollectionType::Other(_))
    }
}

impl fmt::Display for CollectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A library (virtual folder) and the root folders it spans.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Library {
    pub id: LibraryId,
    pub name: String,
    pub collection_type: CollectionType,
    pub locations: Vec<PathBuf>,
}

impl Library {
    pub fn is_supported(&self) -> bool {
        self.collection_type.is_supported()
    }
}
