use std::{
    fs, io,
    path::{Path, PathBuf},
};

use jellyart_model::{ImageKind, ItemId, ItemKind};

use crate::error::{ExportError, Result};

/// Extensions recognised as cached images, compared case-insensitively.
pub const IMAGE_EXTENSIONS: &[&str] =
    &["jpg", "jpeg", "png", "webp", "gif", "bmp", "tbn"];

/// File stems the server uses for each kind, in order of preference.
///
/// An episode's still is stored as its poster, while other items keep
/// their thumb as a landscape image.
pub fn cache_stems(item: ItemKind, kind: ImageKind) -> &'static [&'static str] {
    match kind {
        ImageKind::Primary => &["poster", "folder", "cover"],
        ImageKind::Banner => &["banner"],
        ImageKind::Thumb if item == ItemKind::Episode => &["poster", "thumb"],
        ImageKind::Thumb => &["landscape", "thumb"],
        ImageKind::Backdrop => &["backdrop", "fanart"],
        ImageKind::Logo => &["logo", "clearlogo"],
        ImageKind::Art => &["clearart", "art"],
        ImageKind::Disc => &["disc", "discart"],
    }
}

/// Stem extra copies of `kind` are numbered from, as in `backdrop1.jpg`.
fn numbered_stem(kind: ImageKind) -> Option<&'static str> {
    match kind {
        ImageKind::Backdrop => Some("backdrop"),
        _ => None,
    }
}

/// One cached file for an image kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedImage {
    pub path: PathBuf,
    /// 0 for the main image, `N` for a `<stem>N` copy.
    pub index: u32,
}

/// Resolves `(item, kind)` to a file under the metadata store.
///
/// Jellyfin keeps item artwork at
/// `<root>/<first two hex digits of id>/<32-hex id>/<stem>.<ext>`.
#[derive(Debug, Clone)]
pub struct MetadataLocator {
    root: PathBuf,
}

impl MetadataLocator {
    /// Fails with [`ExportError::MetadataAccess`] when the root cannot be
    /// listed.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let metadata =
            fs::metadata(&root).map_err(|source| ExportError::MetadataAccess {
                path: root.clone(),
                source,
            })?;
        if !metadata.is_dir() {
            return Err(ExportError::MetadataAccess {
                path: root,
                source: io::Error::new(
                    io::ErrorKind::NotADirectory,
                    "not a directory",
                ),
            });
        }
        fs::read_dir(&root).map_err(|source| ExportError::MetadataAccess {
            path: root.clone(),
            source,
        })?;

        tracing::debug!("Metadata store opened at {}", root.display());
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding an item's cached images, whether or not it exists.
    pub fn item_dir(&self, item_id: ItemId) -> PathBuf {
        let simple = item_id.simple();
        self.root.join(&simple[..2]).join(&simple)
    }

    /// Cached image for `kind`, or `None` when the store does not have one.
    ///
    /// The store root disappearing mid-run is fatal; an unreadable item
    /// directory only means the image is treated as absent.
    pub fn locate(
        &self,
        item_id: ItemId,
        item_kind: ItemKind,
        kind: ImageKind,
    ) -> Result<Option<PathBuf>> {
        let files = self.item_files(item_id)?;
        Ok(pick(&files, item_kind, kind))
    }

    /// Every cached file for `kind`: the main image first, then numbered
    /// copies (`backdrop1`, `backdrop2`, ...) in index order.
    pub fn locate_all(
        &self,
        item_id: ItemId,
        item_kind: ItemKind,
        kind: ImageKind,
    ) -> Result<Vec<CachedImage>> {
        let mut found: Vec<CachedImage> = self
            .locate(item_id, item_kind, kind)?
            .map(|path| CachedImage { path, index: 0 })
            .into_iter()
            .collect();
        let Some(base) = numbered_stem(kind) else {
            return Ok(found);
        };

        let mut numbered: Vec<CachedImage> = self
            .item_files(item_id)?
            .into_iter()
            .filter_map(|path| {
                numbered_index(&path, base).map(|index| CachedImage { path, index })
            })
            .collect();
        // Files are sorted, so the stable sort keeps the first extension
        // for a repeated index.
        numbered.sort_by_key(|image| image.index);
        numbered.dedup_by_key(|image| image.index);
        found.extend(numbered);
        Ok(found)
    }

    /// Sorted image files of one item; empty when the item has no folder.
    fn item_files(&self, item_id: ItemId) -> Result<Vec<PathBuf>> {
        let dir = self.item_dir(item_id);
        let mut files = match fs::read_dir(&dir) {
            Ok(entries) => entries
                .filter_map(|entry| entry.ok())
                .map(|entry| entry.path())
                .filter(|path| path.is_file())
                .collect::<Vec<_>>(),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                self.ensure_root()?;
                return Ok(Vec::new());
            }
            Err(err) => {
                self.ensure_root()?;
                tracing::warn!(
                    "Cannot read metadata for item {}: {}",
                    item_id,
                    err
                );
                return Ok(Vec::new());
            }
        };
        // Deterministic pick when several extensions share a stem.
        files.sort();
        Ok(files)
    }

    fn ensure_root(&self) -> Result<()> {
        fs::read_dir(&self.root)
            .map(|_| ())
            .map_err(|source| ExportError::MetadataAccess {
                path: self.root.clone(),
                source,
            })
    }
}

fn pick(files: &[PathBuf], item_kind: ItemKind, kind: ImageKind) -> Option<PathBuf> {
    cache_stems(item_kind, kind).iter().find_map(|stem| {
        files
            .iter()
            .find(|path| has_image_extension(path) && file_stem_is(path, stem))
            .cloned()
    })
}

fn file_stem_is(path: &Path, stem: &str) -> bool {
    path.file_stem()
        .and_then(|s| s.to_str())
        .is_some_and(|s| s.eq_ignore_ascii_case(stem))
}

fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| {
            IMAGE_EXTENSIONS
                .iter()
                .any(|known| known.eq_ignore_ascii_case(ext))
        })
}

/// `N` for an image file named `<base>N.<ext>` with `N >= 1`.
fn numbered_index(path: &Path, base: &str) -> Option<u32> {
    if !has_image_extension(path) {
        return None;
    }
    let stem = path.file_stem()?.to_str()?;
    let head = stem.get(..base.len())?;
    let digits = stem.get(base.len()..)?;
    if !head.eq_ignore_ascii_case(base)
        || digits.is_empty()
        || !digits.bytes().all(|b| b.is_ascii_digit())
    {
        return None;
    }
    digits.parse().ok().filter(|index| *index > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn item() -> ItemId {
        ItemId::parse("3fa4c1d2e5b6478899aabbccddeeff00").unwrap()
    }

    fn seed(store: &TempDir, id: ItemId, files: &[&str]) -> PathBuf {
        let simple = id.simple();
        let dir = store.path().join(&simple[..2]).join(&simple);
        fs::create_dir_all(&dir).unwrap();
        for file in files {
            fs::write(dir.join(file), b"img").unwrap();
        }
        dir
    }

    #[test]
    fn item_dir_is_bucketed_by_id_prefix() {
        let store = TempDir::new().unwrap();
        let locator = MetadataLocator::open(store.path()).unwrap();
        assert_eq!(
            locator.item_dir(item()),
            store
                .path()
                .join("3f")
                .join("3fa4c1d2e5b6478899aabbccddeeff00")
        );
    }

    #[test]
    fn finds_poster_and_banner_by_stem() {
        let store = TempDir::new().unwrap();
        let dir = seed(&store, item(), &["poster.jpg", "Banner.PNG", "notes.txt"]);
        let locator = MetadataLocator::open(store.path()).unwrap();

        assert_eq!(
            locator.locate(item(), ItemKind::Series, ImageKind::Primary).unwrap(),
            Some(dir.join("poster.jpg"))
        );
        assert_eq!(
            locator.locate(item(), ItemKind::Series, ImageKind::Banner).unwrap(),
            Some(dir.join("Banner.PNG"))
        );
        assert_eq!(
            locator.locate(item(), ItemKind::Series, ImageKind::Logo).unwrap(),
            None
        );
    }

    #[test]
    fn falls_back_to_secondary_stems() {
        let store = TempDir::new().unwrap();
        let dir = seed(&store, item(), &["folder.webp", "fanart.jpg"]);
        let locator = MetadataLocator::open(store.path()).unwrap();

        assert_eq!(
            locator.locate(item(), ItemKind::Movie, ImageKind::Primary).unwrap(),
            Some(dir.join("folder.webp"))
        );
        assert_eq!(
            locator.locate(item(), ItemKind::Movie, ImageKind::Backdrop).unwrap(),
            Some(dir.join("fanart.jpg"))
        );
    }

    #[test]
    fn same_stem_with_several_extensions_resolves_the_same_file_every_time() {
        let store = TempDir::new().unwrap();
        let dir = seed(&store, item(), &["poster.png", "POSTER.webp", "poster.jpg"]);
        let locator = MetadataLocator::open(store.path()).unwrap();

        let first = locator.locate(item(), ItemKind::Movie, ImageKind::Primary).unwrap();
        let second = locator.locate(item(), ItemKind::Movie, ImageKind::Primary).unwrap();
        assert_eq!(first, second);
        assert_eq!(first, Some(dir.join("POSTER.webp")));
    }

    #[test]
    fn thumb_stem_depends_on_the_item_kind() {
        let store = TempDir::new().unwrap();
        let dir = seed(&store, item(), &["poster.jpg", "landscape.jpg"]);
        let locator = MetadataLocator::open(store.path()).unwrap();

        assert_eq!(
            locator.locate(item(), ItemKind::Episode, ImageKind::Thumb).unwrap(),
            Some(dir.join("poster.jpg"))
        );
        assert_eq!(
            locator.locate(item(), ItemKind::Series, ImageKind::Thumb).unwrap(),
            Some(dir.join("landscape.jpg"))
        );
    }

    #[test]
    fn numbered_backdrops_follow_the_main_one() {
        let store = TempDir::new().unwrap();
        let dir = seed(
            &store,
            item(),
            &[
                "backdrop10.jpg",
                "backdrop2.jpg",
                "backdrop.jpg",
                "backdrop1.png",
                "backdrop1.jpg",
                "backdropx.jpg",
                "backdrop3.txt",
            ],
        );
        let locator = MetadataLocator::open(store.path()).unwrap();

        let found = locator
            .locate_all(item(), ItemKind::Movie, ImageKind::Backdrop)
            .unwrap();
        let names: Vec<(String, u32)> = found
            .iter()
            .map(|image| {
                let name = image.path.strip_prefix(&dir).unwrap();
                (name.to_string_lossy().into_owned(), image.index)
            })
            .collect();
        assert_eq!(
            names,
            vec![
                ("backdrop.jpg".to_string(), 0),
                ("backdrop1.jpg".to_string(), 1),
                ("backdrop2.jpg".to_string(), 2),
                ("backdrop10.jpg".to_string(), 10),
            ]
        );
    }

    #[test]
    fn only_backdrops_are_numbered() {
        let store = TempDir::new().unwrap();
        let dir = seed(&store, item(), &["logo.png", "logo1.png"]);
        let locator = MetadataLocator::open(store.path()).unwrap();

        assert_eq!(
            locator.locate_all(item(), ItemKind::Movie, ImageKind::Logo).unwrap(),
            vec![CachedImage {
                path: dir.join("logo.png"),
                index: 0
            }]
        );
    }

    #[test]
    fn unknown_item_is_absent_not_an_error() {
        let store = TempDir::new().unwrap();
        let locator = MetadataLocator::open(store.path()).unwrap();
        assert_eq!(
            locator.locate(item(), ItemKind::Movie, ImageKind::Primary).unwrap(),
            None
        );
        assert!(
            locator
                .locate_all(item(), ItemKind::Movie, ImageKind::Backdrop)
                .unwrap()
                .is_empty()
        );
    }

    #[test]
    fn missing_root_cannot_be_opened() {
        let store = TempDir::new().unwrap();
        let err = MetadataLocator::open(store.path().join("nope")).unwrap_err();
        assert!(matches!(err, ExportError::MetadataAccess { .. }));
        assert!(err.is_fatal());
    }

    #[test]
    fn root_removed_after_open_is_fatal() {
        let store = TempDir::new().unwrap();
        let root = store.path().join("metadata");
        fs::create_dir(&root).unwrap();
        let locator = MetadataLocator::open(&root).unwrap();
        fs::remove_dir(&root).unwrap();

        assert!(matches!(
            locator.locate(item(), ItemKind::Movie, ImageKind::Primary),
            Err(ExportError::MetadataAccess { .. })
        ));
    }
}
