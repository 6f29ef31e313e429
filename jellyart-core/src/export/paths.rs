//! Destination naming for exported artwork.
//!
//! Media paths come from the server and may use either separator, so they
//! are split on both `/` and `\` rather than parsed with the local
//! [`Path`](std::path::Path) rules.

use std::path::{Path, PathBuf};

use jellyart_model::{ExportTarget, ImageKind, ItemKind, LibraryItem};

const FORBIDDEN_CHARS: &[char] = &['\\', '/', '*', '?', ':', '"', '<', '>', '|'];

/// Library information destinations are derived from.
#[derive(Debug, Clone, Copy, Default)]
pub struct PathContext<'a> {
    /// Root folders of the library, as the server reports them.
    pub library_roots: &'a [PathBuf],
    /// Owning series for seasons and episodes.
    pub series: Option<&'a LibraryItem>,
}

impl<'a> PathContext<'a> {
    pub fn new(library_roots: &'a [PathBuf]) -> Self {
        Self {
            library_roots,
            series: None,
        }
    }

    pub fn with_series(mut self, series: &'a LibraryItem) -> Self {
        self.series = Some(series);
        self
    }
}

/// Stem an image kind is written under. Thumbs of anything but an episode
/// are landscape art.
pub fn artwork_stem(item: ItemKind, kind: ImageKind) -> &'static str {
    match kind {
        ImageKind::Primary => "poster",
        ImageKind::Banner => "banner",
        ImageKind::Thumb if item == ItemKind::Episode => "thumb",
        ImageKind::Thumb => "landscape",
        ImageKind::Backdrop => "backdrop",
        ImageKind::Logo => "logo",
        ImageKind::Art => "clearart",
        ImageKind::Disc => "disc",
    }
}

/// Drops characters that are invalid in file names on common filesystems.
pub fn sanitize_name(name: &str) -> String {
    name.chars()
        .filter(|c| !FORBIDDEN_CHARS.contains(c))
        .collect::<String>()
        .trim()
        .to_string()
}

/// Folder a series' artwork lives in: the show folder's name, or
/// `Name (Year)` when the server has no path for it.
pub fn series_folder(series: &LibraryItem) -> String {
    series
        .path
        .as_deref()
        .and_then(|path| server_components(path).pop())
        .map(|name| sanitize_name(&name))
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| display_name(series))
}

/// Destination of one image. Pure: the same inputs always give the same
/// path and nothing on disk is consulted.
pub fn synthesize(
    target: &ExportTarget,
    item: &LibraryItem,
    ctx: &PathContext<'_>,
    kind: ImageKind,
    extension: &str,
) -> PathBuf {
    synthesize_numbered(target, item, ctx, kind, 0, extension)
}

/// Like [`synthesize`] for the `index`th copy of a kind; copies past the
/// first get the index appended to their stem (`backdrop2`).
pub fn synthesize_numbered(
    target: &ExportTarget,
    item: &LibraryItem,
    ctx: &PathContext<'_>,
    kind: ImageKind,
    index: u32,
    extension: &str,
) -> PathBuf {
    let ext = extension.trim_start_matches('.').to_ascii_lowercase();
    let base = artwork_stem(item.kind, kind);
    let stem = if index == 0 {
        base.to_string()
    } else {
        format!("{base}{index}")
    };
    let stem = stem.as_str();
    let root = target.root();

    match item.kind {
        ItemKind::Series => root
            .join(series_folder(item))
            .join(format!("{stem}.{ext}")),
        ItemKind::Season => {
            let series_dir = root.join(parent_series_folder(item, ctx));
            match item.index_number {
                Some(0) => series_dir.join(format!("season-specials-{stem}.{ext}")),
                Some(n) => series_dir.join(format!("season{n:02}-{stem}.{ext}")),
                None => series_dir
                    .join(season_folder(item))
                    .join(format!("{stem}.{ext}")),
            }
        }
        ItemKind::Episode => episode_destination(root, item, ctx, stem, &ext),
        ItemKind::Movie => movie_destination(root, item, ctx, stem, &ext),
    }
}

fn episode_destination(
    root: &Path,
    item: &LibraryItem,
    ctx: &PathContext<'_>,
    stem: &str,
    ext: &str,
) -> PathBuf {
    let mut dest = root.join(parent_series_folder(item, ctx));

    let Some(path) = item.path.as_deref() else {
        return match (item.parent_index_number, item.index_number) {
            (Some(season), Some(episode)) => dest
                .join(format!("Season {season:02}"))
                .join(format!("S{season:02}E{episode:02}-{stem}.{ext}")),
            _ => dest.join(format!("{}-{stem}.{ext}", display_name(item))),
        };
    };

    let components = server_components(path);
    let series_path = ctx
        .series
        .and_then(|series| series.path.as_deref())
        .map(server_components);
    let dirs = match series_path {
        Some(series) => relative_dirs(&components, &series)
            .unwrap_or_else(|| parent_dir(&components)),
        None => parent_dir(&components),
    };
    for dir in dirs {
        dest.push(dir);
    }
    dest.join(format!("{}-{stem}.{ext}", video_stem(&components, item)))
}

fn movie_destination(
    root: &Path,
    item: &LibraryItem,
    ctx: &PathContext<'_>,
    stem: &str,
    ext: &str,
) -> PathBuf {
    let Some(path) = item.path.as_deref() else {
        let name = display_name(item);
        return root.join(&name).join(format!("{name}-{stem}.{ext}"));
    };

    let components = server_components(path);
    let dirs = ctx
        .library_roots
        .iter()
        .find_map(|lib_root| {
            relative_dirs(&components, &server_components(lib_root))
        })
        .unwrap_or_else(|| parent_dir(&components));

    let mut dest = root.to_path_buf();
    for dir in dirs {
        dest.push(dir);
    }
    dest.join(format!("{}-{stem}.{ext}", video_stem(&components, item)))
}

fn parent_series_folder(item: &LibraryItem, ctx: &PathContext<'_>) -> String {
    ctx.series
        .map(series_folder)
        .unwrap_or_else(|| display_name(item))
}

/// Folder of a season without a number: its own folder on the server when
/// known, else its name.
fn season_folder(season: &LibraryItem) -> String {
    season
        .path
        .as_deref()
        .and_then(|path| server_components(path).pop())
        .map(|name| sanitize_name(&name))
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| display_name(season))
}

fn display_name(item: &LibraryItem) -> String {
    let name = match (item.kind, item.production_year) {
        (ItemKind::Series | ItemKind::Movie, Some(year)) => {
            format!("{} ({year})", item.name)
        }
        _ => item.name.clone(),
    };
    let sanitized = sanitize_name(&name);
    if sanitized.is_empty() {
        item.id.simple()
    } else {
        sanitized
    }
}

fn server_components(path: &Path) -> Vec<String> {
    path.to_string_lossy()
        .split(['/', '\\'])
        .filter(|part| !part.is_empty() && *part != "." && *part != "..")
        .map(str::to_string)
        .collect()
}

/// Directories between `base` and the file named by `path`, sanitized.
/// `None` when `path` is not under `base`.
fn relative_dirs(path: &[String], base: &[String]) -> Option<Vec<String>> {
    if base.is_empty() || path.len() <= base.len() || !path.starts_with(base) {
        return None;
    }
    Some(
        path[base.len()..path.len() - 1]
            .iter()
            .map(|dir| sanitize_name(dir))
            .filter(|dir| !dir.is_empty())
            .collect(),
    )
}

fn parent_dir(path: &[String]) -> Vec<String> {
    path.len()
        .checked_sub(2)
        .map(|idx| sanitize_name(&path[idx]))
        .filter(|dir| !dir.is_empty())
        .into_iter()
        .collect()
}

fn video_stem(components: &[String], item: &LibraryItem) -> String {
    let stem = components
        .last()
        .map(|file| match file.rsplit_once('.') {
            Some((stem, _)) if !stem.is_empty() => stem.to_string(),
            _ => file.clone(),
        })
        .map(|stem| sanitize_name(&stem))
        .unwrap_or_default();
    if stem.is_empty() {
        display_name(item)
    } else {
        stem
    }
}
