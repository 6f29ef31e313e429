use std::{fmt::Write as _, path::PathBuf};

use anyhow::Result;
use jellyart_core::{ExportRequest, Exporter, LibraryCatalog};
use jellyart_model::{ExportMethod, ExportPlan, Library};

/// Placeholder root shown in previews, before a target is chosen.
const PREVIEW_ROOT: &str = "<target>";

/// Resolves the plan for `library` without writing and prints what was
/// found in the metadata store.
pub async fn show_preview<C>(
    catalog: &C,
    metadata_root: &std::path::Path,
    library: &Library,
    include_episode_thumbnails: bool,
    include_extra_artwork: bool,
) -> Result<()>
where
    C: LibraryCatalog + ?Sized,
{
    let request = ExportRequest::new(
        library.id,
        ExportMethod::Single,
        vec![PathBuf::from(PREVIEW_ROOT)],
    )
    .with_episode_thumbnails(include_episode_thumbnails)
    .with_extra_artwork(include_extra_artwork)
    .with_dry_run(true);

    let (_, plan) = Exporter::new(catalog, metadata_root).plan(&request).await?;
    println!("{}", render_plan(&library.name, &plan));
    Ok(())
}

pub fn render_plan(library_name: &str, plan: &ExportPlan) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Artwork for '{library_name}':");
    for entry in &plan.entries {
        let _ = writeln!(
            out,
            "  found    {} [{}] -> {}",
            entry.item_label,
            entry.kind,
            entry.destination.display()
        );
    }
    for missing in &plan.missing {
        let _ = writeln!(out, "  missing  {} [{}]", missing.item_label, missing.kind);
    }
    let _ = write!(
        out,
        "{} items, {} images found, {} missing, {} errors",
        plan.items_processed,
        plan.len(),
        plan.missing.len(),
        plan.errors
    );
    out
}
