//! Read-only access to a media server's libraries.

mod jellyfin;

pub use jellyfin::JellyfinCatalog;

use async_trait::async_trait;
use jellyart_model::{ItemId, Library, LibraryId, LibraryItem};

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("server at {url} is unreachable: {source}")]
    Unreachable {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("server rejected the API key (status {status})")]
    Unauthorized { status: u16 },

    #[error("{endpoint} returned status {status}")]
    Status { endpoint: String, status: u16 },

    #[error("library {0} not found on server")]
    LibraryNotFound(LibraryId),

    #[error("invalid server url '{0}'")]
    InvalidUrl(String),

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("parse error: {0}")]
    Parse(String),
}

/// The queries an export run needs from the server.
#[async_trait]
pub trait LibraryCatalog: Send + Sync {
    /// Cheap authenticated request used to validate url and key.
    async fn test_connection(&self) -> Result<(), CatalogError>;

    async fn list_libraries(&self) -> Result<Vec<Library>, CatalogError>;

    /// Top-level items of a library: series for TV libraries, movies for
    /// movie libraries.
    async fn list_items(
        &self,
        library_id: LibraryId,
    ) -> Result<Vec<LibraryItem>, CatalogError>;

    async fn list_seasons(
        &self,
        series_id: ItemId,
    ) -> Result<Vec<LibraryItem>, CatalogError>;

    async fn list_episodes(
        &self,
        series_id: ItemId,
    ) -> Result<Vec<LibraryItem>, CatalogError>;

    /// Get the catalog name
    fn name(&self) -> &'static str;

    async fn find_library(
        &self,
        library_id: LibraryId,
    ) -> Result<Library, CatalogError> {
        self.list_libraries()
            .await?
            .into_iter()
            .find(|library| library.id == library_id)
            .ok_or(CatalogError::LibraryNotFound(library_id))
    }
}
