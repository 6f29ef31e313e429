use std::{collections::BTreeSet, fmt, path::PathBuf};

use crate::{ids::ItemId, image::ImageKind};

/// Position of an item in a library's hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ItemKind {
    Series,
    Season,
    Episode,
    Movie,
}

impl ItemKind {
    /// Maps the API's `Type` field. Anything else (`BoxSet`, `Folder`, ...)
    /// is not exported.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Series" => Some(ItemKind::Series),
            "Season" => Some(ItemKind::Season),
            "Episode" => Some(ItemKind::Episode),
            "Movie" => Some(ItemKind::Movie),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ItemKind::Series => "Series",
            ItemKind::Season => "Season",
            ItemKind::Episode => "Episode",
            ItemKind::Movie => "Movie",
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single library entry as reported by the server. Read-only for the
/// duration of an export run.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LibraryItem {
    pub id: ItemId,
    pub kind: ItemKind,
    pub name: String,
    pub production_year: Option<u32>,
    /// Media path on the server: the show folder for series, the season
    /// folder (when there is one) for seasons, the video file otherwise.
    pub path: Option<PathBuf>,
    /// Season number for seasons, episode number for episodes.
    pub index_number: Option<u32>,
    /// Season number of an episode.
    pub parent_index_number: Option<u32>,
    pub series_id: Option<ItemId>,
    pub season_id: Option<ItemId>,
    /// Image kinds the server advertises for this item.
    pub image_kinds: BTreeSet<ImageKind>,
}

impl LibraryItem {
    pub fn new(id: ItemId, kind: ItemKind, name: impl Into<String>) -> Self {
        Self {
            id,
            kind,
            name: name.into(),
            production_year: None,
            path: None,
            index_number: None,
            parent_index_number: None,
            series_id: None,
            season_id: None,
            image_kinds: BTreeSet::new(),
        }
    }

    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_year(mut self, year: u32) -> Self {
        self.production_year = Some(year);
        self
    }

    pub fn with_index(mut self, index: u32) -> Self {
        self.index_number = Some(index);
        self
    }

    pub fn with_parent_index(mut self, index: u32) -> Self {
        self.parent_index_number = Some(index);
        self
    }

    pub fn with_series(mut self, series_id: ItemId) -> Self {
        self.series_id = Some(series_id);
        self
    }

    pub fn with_season(mut self, season_id: ItemId) -> Self {
        self.season_id = Some(season_id);
        self
    }

    pub fn with_images(
        mut self,
        kinds: impl IntoIterator<Item = ImageKind>,
    ) -> Self {
        self.image_kinds.extend(kinds);
        self
    }

    pub fn has_image(&self, kind: ImageKind) -> bool {
        self.image_kinds.contains(&kind)
    }

    /// Short human label used in logs and previews, e.g. `Show S01E02` style
    /// numbering for episodes.
    pub fn label(&self) -> String {
        match self.kind {
            ItemKind::Season => match self.index_number {
                Some(0) => format!("{} (specials)", self.name),
                Some(n) => format!("Season {n}"),
                None => self.name.clone(),
            },
            ItemKind::Episode => {
                match (self.parent_index_number, self.index_number) {
                    (Some(s), Some(e)) => {
                        format!("S{s:02}E{e:02} {}", self.name)
                    }
                    _ => self.name.clone(),
                }
            }
            ItemKind::Series | ItemKind::Movie => match self.production_year {
                Some(year) => format!("{} ({year})", self.name),
                None => self.name.clone(),
            },
        }
    }
}
