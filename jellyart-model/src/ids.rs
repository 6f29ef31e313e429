use std::{fmt, str::FromStr};

use uuid::Uuid;

use crate::error::ModelError;

/// Jellyfin item identifier.
///
/// The server hands these out as 32 lowercase hex digits (the "simple" GUID
/// form). Hyphenated input is accepted as well; [`ItemId::simple`] always
/// renders the canonical form used for on-disk metadata lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemId(pub Uuid);

impl ItemId {
    pub fn parse(value: &str) -> Result<Self, ModelError> {
        Uuid::parse_str(value.trim())
            .map(ItemId)
            .map_err(|source| ModelError::InvalidId {
                value: value.to_string(),
                source,
            })
    }

    /// Lowercase 32-hex rendering.
    pub fn simple(&self) -> String {
        self.0.simple().to_string()
    }
}

impl FromStr for ItemId {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ItemId::parse(s)
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.simple())
    }
}

/// Identifier of a Jellyfin virtual folder (library).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LibraryId(pub Uuid);

impl LibraryId {
    pub fn parse(value: &str) -> Result<Self, ModelError> {
        Uuid::parse_str(value.trim())
            .map(LibraryId)
            .map_err(|source| ModelError::InvalidId {
                value: value.to_string(),
                source,
            })
    }

    pub fn simple(&self) -> String {
        self.0.simple().to_string()
    }
}

impl FromStr for LibraryId {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LibraryId::parse(s)
    }
}

impl fmt::Display for LibraryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.simple())
    }
}
