pub mod automation;
pub mod command_gen;
pub mod connection_editor;
pub mod menu;
pub mod preview;
pub mod prompts;

pub use dialoguer::console::Term;

use clap::Parser;
use jellyart_config::ConnectionSource;
use jellyart_model::ExportMethod;

/// Without arguments an interactive menu starts. Passing any option runs a
/// single export unattended.
#[derive(Debug, Default, Parser)]
#[command(
    name = "jellyartctl",
    version,
    about = "Export Jellyfin's cached artwork next to your media"
)]
pub struct Cli {
    /// Library (virtual folder) id to export
    #[arg(long = "library_id", value_name = "ID")]
    pub library_id: Option<String>,

    /// single: everything under one target; separate: a full copy per target
    #[arg(long = "export_method", value_name = "single|separate")]
    pub export_method: Option<ExportMethod>,

    /// Destination folders separated by '|'
    #[arg(long = "target_paths", value_name = "PATH|PATH")]
    pub target_paths: Option<String>,

    /// Also export episode thumbnails (true/1/yes)
    #[arg(long = "episode_thumbnails", value_name = "BOOL")]
    pub episode_thumbnails: Option<String>,

    /// Also export backdrops, logos, clear art and disc art (true/1/yes)
    #[arg(long = "extra_artwork", value_name = "BOOL")]
    pub extra_artwork: Option<String>,

    /// Where connection settings come from
    #[arg(
        long = "connection_method",
        value_name = "file|parameters",
        default_value = "file"
    )]
    pub connection_method: ConnectionSource,

    /// Server url (with connection_method parameters)
    #[arg(long = "url")]
    pub url: Option<String>,

    /// API key (with connection_method parameters)
    #[arg(long = "api_key")]
    pub api_key: Option<String>,

    /// Jellyfin metadata directory (with connection_method parameters)
    #[arg(long = "library_path", value_name = "PATH")]
    pub library_path: Option<String>,

    /// Resolve everything and print the summary without writing files
    #[arg(long = "dry_run")]
    pub dry_run: bool,
}
