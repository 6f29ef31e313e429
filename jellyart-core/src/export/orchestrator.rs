use std::{fs::File, path::PathBuf};

use jellyart_model::{
    CollectionType, ExportMethod, ExportPlan, ExportSummary, ExportTarget,
    ImageKind, ItemKind, Library, LibraryId, LibraryItem, MissingImage,
    PlanEntry,
};
use tracing::{debug, info, warn};

use super::{
    comparator::{SyncOutcome, sync_file},
    paths::{PathContext, synthesize_numbered},
};
use crate::{
    catalog::LibraryCatalog,
    error::{ExportError, Result},
    metadata::MetadataLocator,
};

/// Everything one export run needs besides the server connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRequest {
    pub library_id: LibraryId,
    pub method: ExportMethod,
    pub target_paths: Vec<PathBuf>,
    pub include_episode_thumbnails: bool,
    pub include_extra_artwork: bool,
    /// Resolve the plan and report counts without writing anything.
    pub dry_run: bool,
}

impl ExportRequest {
    pub fn new(
        library_id: LibraryId,
        method: ExportMethod,
        target_paths: Vec<PathBuf>,
    ) -> Self {
        Self {
            library_id,
            method,
            target_paths,
            include_episode_thumbnails: false,
            include_extra_artwork: false,
            dry_run: false,
        }
    }

    pub fn with_episode_thumbnails(mut self, enabled: bool) -> Self {
        self.include_episode_thumbnails = enabled;
        self
    }

    pub fn with_extra_artwork(mut self, enabled: bool) -> Self {
        self.include_extra_artwork = enabled;
        self
    }

    pub fn with_dry_run(mut self, enabled: bool) -> Self {
        self.dry_run = enabled;
        self
    }

    /// Rejects requests that cannot produce a single destination.
    pub fn validate(&self) -> Result<()> {
        if self.target_paths.is_empty() {
            return Err(ExportError::Configuration(
                "at least one target path is required".into(),
            ));
        }
        if let Some(empty) = self
            .target_paths
            .iter()
            .find(|p| p.as_os_str().is_empty())
        {
            return Err(ExportError::Configuration(format!(
                "empty target path '{}'",
                empty.display()
            )));
        }
        Ok(())
    }

    /// Image kinds worth looking up for `item`, limited to what the server
    /// says the item has.
    fn kinds_for(&self, item: &LibraryItem) -> Vec<ImageKind> {
        let wanted: Vec<ImageKind> = match item.kind {
            ItemKind::Episode if self.include_episode_thumbnails => {
                vec![ImageKind::Thumb]
            }
            ItemKind::Episode => Vec::new(),
            ItemKind::Series | ItemKind::Season | ItemKind::Movie => {
                let mut kinds = vec![ImageKind::Primary, ImageKind::Banner];
                if self.include_extra_artwork {
                    kinds.extend(ImageKind::EXTRA_ARTWORK);
                }
                kinds
            }
        };
        wanted.into_iter().filter(|kind| item.has_image(*kind)).collect()
    }
}

/// Drives an export: resolve a plan against the catalog and the metadata
/// store, then copy.
#[derive(Debug)]
pub struct Exporter<'a, C: ?Sized> {
    catalog: &'a C,
    metadata_root: PathBuf,
}

impl<'a, C> Exporter<'a, C>
where
    C: LibraryCatalog + ?Sized,
{
    pub fn new(catalog: &'a C, metadata_root: impl Into<PathBuf>) -> Self {
        Self {
            catalog,
            metadata_root: metadata_root.into(),
        }
    }

    /// Full run. Stops early only on fatal errors; everything else ends up
    /// in the returned counters.
    pub async fn run(&self, request: &ExportRequest) -> Result<ExportSummary> {
        let (library, plan) = self.plan(request).await?;

        if request.dry_run {
            info!(
                "Dry run for '{}': {} files would be checked, {} images missing",
                library.name,
                plan.len(),
                plan.missing.len()
            );
            return Ok(plan.initial_summary());
        }

        let summary = self.execute(&plan);
        info!(
            "Export of '{}' finished: {} copied, {} updated, {} skipped, {} missing, {} errors",
            library.name,
            summary.copied,
            summary.updated,
            summary.skipped,
            summary.missing,
            summary.errors
        );
        Ok(summary)
    }

    /// Resolves every copy the run would make without touching the targets.
    pub async fn plan(
        &self,
        request: &ExportRequest,
    ) -> Result<(Library, ExportPlan)> {
        request.validate()?;
        let locator = MetadataLocator::open(&self.metadata_root)?;

        let library = self.catalog.find_library(request.library_id).await?;
        if !library.is_supported() {
            return Err(ExportError::UnsupportedLibrary {
                name: library.name,
                collection_type: library.collection_type.to_string(),
            });
        }

        let targets =
            ExportTarget::from_paths(&request.target_paths, request.method);
        info!(
            "Planning export of '{}' ({}) to {} target(s) via {}",
            library.name,
            library.collection_type,
            targets.len(),
            self.catalog.name()
        );

        let mut planner = Planner {
            request,
            locator: &locator,
            targets: &targets,
            plan: ExportPlan::default(),
        };
        let items = self.catalog.list_items(library.id).await?;
        let roots = library.locations.as_slice();

        match library.collection_type {
            CollectionType::Movies => {
                for movie in items.iter().filter(|i| i.kind == ItemKind::Movie) {
                    planner.add_item(movie, &PathContext::new(roots))?;
                }
            }
            CollectionType::TvShows => {
                for series in items.iter().filter(|i| i.kind == ItemKind::Series)
                {
                    self.plan_series(&mut planner, series, roots).await?;
                }
            }
            CollectionType::Other(_) => {}
        }

        let plan = planner.plan;
        info!(
            "Plan ready: {} items, {} files, {} missing, {} errors",
            plan.items_processed,
            plan.len(),
            plan.missing.len(),
            plan.errors
        );
        Ok((library, plan))
    }

    async fn plan_series(
        &self,
        planner: &mut Planner<'_>,
        series: &LibraryItem,
        roots: &[PathBuf],
    ) -> Result<()> {
        info!("Processing series {}", series.label());
        let ctx = PathContext::new(roots).with_series(series);
        planner.add_item(series, &ctx)?;

        match self.catalog.list_seasons(series.id).await {
            Ok(seasons) => {
                for season in &seasons {
                    planner.add_item(season, &ctx)?;
                }
            }
            Err(err) => {
                warn!("Failed to list seasons of {}: {}", series.label(), err);
                planner.plan.errors += 1;
            }
        }

        if !planner.request.include_episode_thumbnails {
            return Ok(());
        }
        match self.catalog.list_episodes(series.id).await {
            Ok(episodes) => {
                for episode in &episodes {
                    planner.add_item(episode, &ctx)?;
                }
            }
            Err(err) => {
                warn!("Failed to list episodes of {}: {}", series.label(), err);
                planner.plan.errors += 1;
            }
        }
        Ok(())
    }

    /// Applies a plan. Per-file failures are counted and the run goes on.
    pub fn execute(&self, plan: &ExportPlan) -> ExportSummary {
        let mut summary = plan.initial_summary();

        for entry in &plan.entries {
            match sync_file(&entry.source, &entry.destination) {
                Ok(SyncOutcome::Copied) => {
                    debug!("Copied {}", entry.destination.display());
                    summary.copied += 1;
                }
                Ok(SyncOutcome::Updated) => {
                    debug!("Updated {}", entry.destination.display());
                    summary.updated += 1;
                }
                Ok(SyncOutcome::Unchanged) => {
                    debug!("Unchanged {}", entry.destination.display());
                    summary.skipped += 1;
                }
                Err(source) => {
                    let cause = source.to_string();
                    let err = ExportError::Copy {
                        destination: entry.destination.clone(),
                        source,
                    };
                    warn!("{} ({}): {}: {}", entry.item_label, entry.kind, err, cause);
                    summary.errors += 1;
                }
            }
        }
        summary
    }
}

struct Planner<'r> {
    request: &'r ExportRequest,
    locator: &'r MetadataLocator,
    targets: &'r [ExportTarget],
    plan: ExportPlan,
}

impl Planner<'_> {
    fn add_item(&mut self, item: &LibraryItem, ctx: &PathContext<'_>) -> Result<()> {
        self.plan.items_processed += 1;

        for kind in self.request.kinds_for(item) {
            let sources = self.locator.locate_all(item.id, item.kind, kind)?;
            if sources.is_empty() {
                let err = ExportError::ImageNotFound {
                    item_id: item.id,
                    kind,
                };
                debug!("{}: {}", item.label(), err);
                self.plan.missing.push(MissingImage {
                    item_id: item.id,
                    item_label: item.label(),
                    kind,
                });
                continue;
            }

            for cached in sources {
                if let Err(err) = File::open(&cached.path) {
                    warn!("Cannot read {}: {}", cached.path.display(), err);
                    self.plan.errors += 1;
                    continue;
                }

                let extension = cached
                    .path
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .unwrap_or("jpg");
                for target in self.targets {
                    let destination = synthesize_numbered(
                        target,
                        item,
                        ctx,
                        kind,
                        cached.index,
                        extension,
                    );
                    self.plan.entries.push(PlanEntry {
                        item_id: item.id,
                        item_label: item.label(),
                        kind,
                        source: cached.path.clone(),
                        destination,
                    });
                }
            }
        }
        Ok(())
    }
}
