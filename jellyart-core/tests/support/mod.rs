//! Shared fixtures for export integration tests.
#![allow(dead_code)]

use std::{
    collections::{HashMap, HashSet},
    fs,
    path::{Path, PathBuf},
    sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use async_trait::async_trait;
use jellyart_core::{CatalogError, LibraryCatalog};
use jellyart_core::model::{
    CollectionType, ItemId, Library, LibraryId, LibraryItem,
};
use tempfile::TempDir;
use uuid::Uuid;

/// In-memory catalog that records which queries were made.
#[derive(Debug, Default)]
pub struct FakeCatalog {
    libraries: Vec<Library>,
    items: HashMap<LibraryId, Vec<LibraryItem>>,
    seasons: HashMap<ItemId, Vec<LibraryItem>>,
    episodes: HashMap<ItemId, Vec<LibraryItem>>,
    broken_series: HashSet<ItemId>,
    pub library_calls: AtomicUsize,
    pub episode_calls: AtomicUsize,
    pub season_requests: Mutex<Vec<ItemId>>,
}

impl FakeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_library(mut self, library: Library, items: Vec<LibraryItem>) -> Self {
        self.items.insert(library.id, items);
        self.libraries.push(library);
        self
    }

    pub fn with_seasons(mut self, series: ItemId, seasons: Vec<LibraryItem>) -> Self {
        self.seasons.insert(series, seasons);
        self
    }

    pub fn with_episodes(mut self, series: ItemId, episodes: Vec<LibraryItem>) -> Self {
        self.episodes.insert(series, episodes);
        self
    }

    /// Season and episode lookups for this series fail with a server error.
    pub fn with_broken_series(mut self, series: ItemId) -> Self {
        self.broken_series.insert(series);
        self
    }

    pub fn episode_calls(&self) -> usize {
        self.episode_calls.load(Ordering::SeqCst)
    }

    pub fn library_calls(&self) -> usize {
        self.library_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LibraryCatalog for FakeCatalog {
    async fn test_connection(&self) -> Result<(), CatalogError> {
        Ok(())
    }

    async fn list_libraries(&self) -> Result<Vec<Library>, CatalogError> {
        self.library_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.libraries.clone())
    }

    async fn list_items(
        &self,
        library_id: LibraryId,
    ) -> Result<Vec<LibraryItem>, CatalogError> {
        self.items
            .get(&library_id)
            .cloned()
            .ok_or(CatalogError::LibraryNotFound(library_id))
    }

    async fn list_seasons(
        &self,
        series_id: ItemId,
    ) -> Result<Vec<LibraryItem>, CatalogError> {
        self.season_requests
            .lock()
            .expect("season log poisoned")
            .push(series_id);
        if self.broken_series.contains(&series_id) {
            return Err(CatalogError::Status {
                endpoint: format!("Shows/{series_id}/Seasons"),
                status: 500,
            });
        }
        Ok(self.seasons.get(&series_id).cloned().unwrap_or_default())
    }

    async fn list_episodes(
        &self,
        series_id: ItemId,
    ) -> Result<Vec<LibraryItem>, CatalogError> {
        self.episode_calls.fetch_add(1, Ordering::SeqCst);
        if self.broken_series.contains(&series_id) {
            return Err(CatalogError::Status {
                endpoint: format!("Shows/{series_id}/Episodes"),
                status: 500,
            });
        }
        Ok(self.episodes.get(&series_id).cloned().unwrap_or_default())
    }

    fn name(&self) -> &'static str {
        "Fake"
    }
}

pub fn new_item_id() -> ItemId {
    ItemId(Uuid::new_v4())
}

pub fn library(name: &str, collection_type: CollectionType, root: &str) -> Library {
    Library {
        id: LibraryId(Uuid::new_v4()),
        name: name.to_string(),
        collection_type,
        locations: vec![PathBuf::from(root)],
    }
}

/// Temporary metadata store laid out like the server's.
pub struct MetadataStore {
    dir: TempDir,
}

impl MetadataStore {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("temp metadata store"),
        }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn put(&self, item: ItemId, file: &str, bytes: &[u8]) -> PathBuf {
        let simple = item.simple();
        let dir = self.dir.path().join(&simple[..2]).join(&simple);
        fs::create_dir_all(&dir).expect("create item dir");
        let path = dir.join(file);
        fs::write(&path, bytes).expect("write cached image");
        path
    }
}

/// Every regular file under `root`, relative to it, sorted.
pub fn files_under(root: &Path) -> Vec<PathBuf> {
    fn walk(dir: &Path, root: &Path, out: &mut Vec<PathBuf>) {
        let Ok(entries) = fs::read_dir(dir) else {
            return;
        };
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                walk(&path, root, out);
            } else if let Ok(rel) = path.strip_prefix(root) {
                out.push(rel.to_path_buf());
            }
        }
    }
    let mut out = Vec::new();
    walk(root, root, &mut out);
    out.sort();
    out
}
