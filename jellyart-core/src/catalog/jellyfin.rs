use std::{collections::HashMap, path::PathBuf, time::Duration};

use async_trait::async_trait;
use jellyart_model::{
    CollectionType, ImageKind, ItemId, ItemKind, Library, LibraryId,
    LibraryItem,
};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, de::DeserializeOwned};
use url::Url;

use super::{CatalogError, LibraryCatalog};

const TOKEN_HEADER: &str = "X-Emby-Token";
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// [`LibraryCatalog`] backed by the Jellyfin REST API.
#[derive(Debug, Clone)]
pub struct JellyfinCatalog {
    base_url: Url,
    api_key: String,
    client: Client,
}

impl JellyfinCatalog {
    /// Builds a client for a url that already carries its scheme. Nothing is
    /// sent until the first query.
    pub fn new(
        base_url: &str,
        api_key: impl Into<String>,
    ) -> Result<Self, CatalogError> {
        let trimmed = base_url.trim();
        let mut url = Url::parse(trimmed)
            .map_err(|_| CatalogError::InvalidUrl(trimmed.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(CatalogError::InvalidUrl(trimmed.to_string()));
        }
        // Join relative endpoints under any path prefix (reverse proxies).
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }

        let client = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            base_url: url,
            api_key: api_key.into(),
            client,
        })
    }

    /// Connects and verifies the key. A url without a scheme is tried over
    /// `http://` first, then `https://`.
    pub async fn connect(
        url: &str,
        api_key: &str,
    ) -> Result<Self, CatalogError> {
        let trimmed = url.trim();
        if trimmed.contains("://") {
            let catalog = Self::new(trimmed, api_key)?;
            catalog.test_connection().await?;
            return Ok(catalog);
        }

        let mut last_error = CatalogError::InvalidUrl(trimmed.to_string());
        for scheme in ["http", "https"] {
            let candidate = format!("{scheme}://{trimmed}");
            let catalog = Self::new(&candidate, api_key)?;
            match catalog.test_connection().await {
                Ok(()) => {
                    tracing::info!("Connected to Jellyfin at {}", candidate);
                    return Ok(catalog);
                }
                // The server answered; switching scheme will not help.
                Err(err @ CatalogError::Unauthorized { .. }) => return Err(err),
                Err(err) => {
                    tracing::debug!("{} failed: {}", candidate, err);
                    last_error = err;
                }
            }
        }
        Err(last_error)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, CatalogError> {
        self.base_url
            .join(path)
            .map_err(|_| CatalogError::InvalidUrl(format!("{}{path}", self.base_url)))
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, CatalogError> {
        let url = self.endpoint(path)?;
        tracing::debug!("Jellyfin request URL: {}", url);

        let response = self
            .client
            .get(url)
            .header(TOKEN_HEADER, &self.api_key)
            .query(query)
            .send()
            .await
            .map_err(|source| {
                if source.is_connect() || source.is_timeout() {
                    CatalogError::Unreachable {
                        url: self.base_url.to_string(),
                        source,
                    }
                } else {
                    CatalogError::Network(source)
                }
            })?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN
        {
            return Err(CatalogError::Unauthorized {
                status: status.as_u16(),
            });
        }
        if !status.is_success() {
            return Err(CatalogError::Status {
                endpoint: path.to_string(),
                status: status.as_u16(),
            });
        }

        response
            .json()
            .await
            .map_err(|e| CatalogError::Parse(e.to_string()))
    }
}

#[async_trait]
impl LibraryCatalog for JellyfinCatalog {
    async fn test_connection(&self) -> Result<(), CatalogError> {
        let _: serde_json::Value = self.get_json("Users", &[]).await?;
        Ok(())
    }

    async fn list_libraries(&self) -> Result<Vec<Library>, CatalogError> {
        let folders: Vec<VirtualFolderDto> =
            self.get_json("Library/VirtualFolders", &[]).await?;
        let libraries: Vec<Library> =
            folders.into_iter().filter_map(VirtualFolderDto::into_library).collect();
        tracing::info!("Server reports {} libraries", libraries.len());
        Ok(libraries)
    }

    async fn list_items(
        &self,
        library_id: LibraryId,
    ) -> Result<Vec<LibraryItem>, CatalogError> {
        let parent = library_id.simple();
        let response: ItemsResponse = self
            .get_json(
                "Items",
                &[
                    ("ParentId", parent.as_str()),
                    ("Recursive", "true"),
                    ("IncludeItemTypes", "Series,Movie"),
                    ("Fields", "Path,ProductionYear"),
                ],
            )
            .await?;
        Ok(response.into_items())
    }

    async fn list_seasons(
        &self,
        series_id: ItemId,
    ) -> Result<Vec<LibraryItem>, CatalogError> {
        let path = format!("Shows/{}/Seasons", series_id.simple());
        let response: ItemsResponse =
            self.get_json(&path, &[("Fields", "Path")]).await?;
        Ok(response.into_items())
    }

    async fn list_episodes(
        &self,
        series_id: ItemId,
    ) -> Result<Vec<LibraryItem>, CatalogError> {
        let path = format!("Shows/{}/Episodes", series_id.simple());
        let response: ItemsResponse = self
            .get_json(&path, &[("Fields", "Path,ParentIndexNumber,IndexNumber")])
            .await?;
        Ok(response.into_items())
    }

    fn name(&self) -> &'static str {
        "Jellyfin"
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct VirtualFolderDto {
    name: String,
    item_id: Option<String>,
    collection_type: Option<String>,
    #[serde(default)]
    locations: Option<Vec<String>>,
}

impl VirtualFolderDto {
    fn into_library(self) -> Option<Library> {
        let raw_id = self.item_id?;
        let id = match LibraryId::parse(&raw_id) {
            Ok(id) => id,
            Err(e) => {
                tracing::warn!("Skipping library '{}': {}", self.name, e);
                return None;
            }
        };
        Some(Library {
            id,
            name: self.name,
            collection_type: CollectionType::parse(
                self.collection_type.as_deref().unwrap_or("mixed"),
            ),
            locations: self
                .locations
                .unwrap_or_default()
                .into_iter()
                .map(PathBuf::from)
                .collect(),
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ItemsResponse {
    #[serde(default)]
    items: Vec<BaseItemDto>,
}

impl ItemsResponse {
    fn into_items(self) -> Vec<LibraryItem> {
        self.items
            .into_iter()
            .filter_map(BaseItemDto::into_item)
            .collect()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct BaseItemDto {
    id: String,
    name: Option<String>,
    #[serde(rename = "Type")]
    item_type: Option<String>,
    path: Option<String>,
    production_year: Option<u32>,
    index_number: Option<u32>,
    parent_index_number: Option<u32>,
    series_id: Option<String>,
    season_id: Option<String>,
    image_tags: Option<HashMap<String, String>>,
    backdrop_image_tags: Option<Vec<String>>,
}

impl BaseItemDto {
    fn into_item(self) -> Option<LibraryItem> {
        let kind = ItemKind::parse(self.item_type.as_deref()?)?;
        let id = match ItemId::parse(&self.id) {
            Ok(id) => id,
            Err(e) => {
                tracing::warn!("Skipping {} item: {}", kind, e);
                return None;
            }
        };

        let mut images: Vec<ImageKind> = self
            .image_tags
            .unwrap_or_default()
            .keys()
            .filter_map(|key| ImageKind::parse(key))
            .map(|image| match (kind, image) {
                // An episode's primary image is its still.
                (ItemKind::Episode, ImageKind::Primary) => ImageKind::Thumb,
                _ => image,
            })
            .collect();
        if self
            .backdrop_image_tags
            .is_some_and(|tags| !tags.is_empty())
        {
            images.push(ImageKind::Backdrop);
        }

        let mut item =
            LibraryItem::new(id, kind, self.name.unwrap_or_default())
                .with_images(images);
        item.path = self.path.filter(|p| !p.is_empty()).map(PathBuf::from);
        item.production_year = self.production_year;
        item.index_number = self.index_number;
        item.parent_index_number = self.parent_index_number;
        item.series_id =
            self.series_id.as_deref().and_then(|s| ItemId::parse(s).ok());
        item.season_id =
            self.season_id.as_deref().and_then(|s| ItemId::parse(s).ok());
        Some(item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_without_trailing_slash_keeps_its_prefix() {
        let catalog =
            JellyfinCatalog::new("https://media.example.com/jellyfin", "key")
                .unwrap();
        let url = catalog.endpoint("Library/VirtualFolders").unwrap();
        assert_eq!(
            url.as_str(),
            "https://media.example.com/jellyfin/Library/VirtualFolders"
        );
    }

    #[test]
    fn non_http_schemes_are_rejected() {
        assert!(matches!(
            JellyfinCatalog::new("ftp://nas", "key"),
            Err(CatalogError::InvalidUrl(_))
        ));
    }

    #[test]
    fn episode_primary_image_becomes_thumb() {
        let json = r#"{
            "Items": [{
                "Id": "8c2bcd6f6ef84a7d93b5a3a8c1d0e2f4",
                "Name": "Pilot",
                "Type": "Episode",
                "Path": "/tv/Show/Season 01/Show - S01E01.mkv",
                "IndexNumber": 1,
                "ParentIndexNumber": 1,
                "SeriesId": "1f0e6a7cb0b14e2c9d8f7a6b5c4d3e2f",
                "ImageTags": { "Primary": "abc" }
            }]
        }"#;
        let response: ItemsResponse = serde_json::from_str(json).unwrap();
        let items = response.into_items();
        assert_eq!(items.len(), 1);
        let episode = &items[0];
        assert!(episode.has_image(ImageKind::Thumb));
        assert!(!episode.has_image(ImageKind::Primary));
        assert_eq!(episode.label(), "S01E01 Pilot");
        assert!(episode.series_id.is_some());
    }

    #[test]
    fn unknown_types_and_null_tags_are_tolerated() {
        let json = r#"{
            "Items": [
                { "Id": "00000000000000000000000000000001", "Type": "BoxSet" },
                {
                    "Id": "00000000000000000000000000000002",
                    "Name": "Film",
                    "Type": "Movie",
                    "ProductionYear": 1999,
                    "ImageTags": null,
                    "BackdropImageTags": ["x"]
                }
            ]
        }"#;
        let response: ItemsResponse = serde_json::from_str(json).unwrap();
        let items = response.into_items();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].label(), "Film (1999)");
        assert!(items[0].has_image(ImageKind::Backdrop));
        assert!(items[0].path.is_none());
    }

    #[test]
    fn virtual_folders_map_to_libraries() {
        let json = r#"[
            {
                "Name": "Shows",
                "ItemId": "a656b907eb3a73532e40e44b968d0225",
                "CollectionType": "tvshows",
                "Locations": ["/media/tv", "/media/tv2"]
            },
            { "Name": "Mixed", "ItemId": "b656b907eb3a73532e40e44b968d0225" }
        ]"#;
        let folders: Vec<VirtualFolderDto> = serde_json::from_str(json).unwrap();
        let libraries: Vec<Library> = folders
            .into_iter()
            .filter_map(VirtualFolderDto::into_library)
            .collect();
        assert_eq!(libraries.len(), 2);
        assert_eq!(libraries[0].collection_type, CollectionType::TvShows);
        assert_eq!(libraries[0].locations.len(), 2);
        assert!(!libraries[1].is_supported());
    }
}
