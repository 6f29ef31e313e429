use anyhow::{Result, bail};
use dialoguer::Select;
use jellyart_config::{ConnectionConfig, ConnectionSource, default_connection_file};
use jellyart_core::{JellyfinCatalog, LibraryCatalog};
use jellyart_model::LibraryId;

use super::{
    Term,
    prompts::{self, ExportOptions},
};

/// Builds the automation command line equivalent to a set of answers.
pub fn render_command(
    library_id: LibraryId,
    options: &ExportOptions,
    source: ConnectionSource,
    connection: Option<&ConnectionConfig>,
) -> String {
    let targets = options
        .target_paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join("|");

    let mut args = vec![
        "jellyartctl".to_string(),
        format!("--library_id {library_id}"),
        format!("--export_method {}", options.method),
        format!("--target_paths {}", quote(&targets)),
        format!("--episode_thumbnails {}", options.include_episode_thumbnails),
    ];
    if options.include_extra_artwork {
        args.push("--extra_artwork true".to_string());
    }
    args.push(format!("--connection_method {source}"));
    if let (ConnectionSource::Parameters, Some(config)) = (source, connection) {
        args.push(format!("--url {}", quote(&config.url)));
        args.push(format!("--api_key {}", quote(&config.api_key)));
        args.push(format!(
            "--library_path {}",
            quote(&config.library_path.display().to_string())
        ));
    }
    args.join(" ")
}

fn quote(value: &str) -> String {
    let plain = !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./:~@=+,".contains(c));
    if plain {
        value.to_string()
    } else {
        format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
    }
}

/// Walks through the export questions and prints the command instead of
/// running it.
pub async fn run_interactive() -> Result<()> {
    let choice = Select::new()
        .with_prompt("How should the command get its connection settings?")
        .items(&[
            "file: read connection.json at run time",
            "parameters: pass url, API key and metadata path on the command line",
        ])
        .default(0)
        .interact_on(&Term::stderr())?;
    let source = if choice == 0 {
        ConnectionSource::File
    } else {
        ConnectionSource::Parameters
    };

    let config = match source {
        ConnectionSource::File => {
            ConnectionConfig::load(&default_connection_file())?
        }
        ConnectionSource::Parameters => prompts::ask_connection(None)?,
    };
    prompts::print_warnings(&config.validate());

    let catalog = JellyfinCatalog::connect(&config.url, &config.api_key).await?;
    let libraries = catalog.list_libraries().await?;
    let Some(library) = prompts::pick_library(&libraries)? else {
        return Ok(());
    };
    let options = prompts::ask_export_options(&library)?;
    if options.target_paths.is_empty() {
        bail!("no target paths given");
    }

    let command = render_command(library.id, &options, source, Some(&config));
    println!("\nAutomation command:\n\n{command}\n");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use jellyart_model::ExportMethod;
    use std::path::PathBuf;

    fn options() -> ExportOptions {
        ExportOptions {
            method: ExportMethod::Separate,
            target_paths: vec![PathBuf::from("/mnt/art a"), PathBuf::from("/mnt/b")],
            include_episode_thumbnails: true,
            include_extra_artwork: false,
        }
    }

    #[test]
    fn file_method_omits_credentials() {
        let id = LibraryId::parse("a656b907eb3a73532e40e44b968d0225").unwrap();
        let command = render_command(id, &options(), ConnectionSource::File, None);
        assert_eq!(
            command,
            "jellyartctl --library_id a656b907eb3a73532e40e44b968d0225 \
             --export_method separate --target_paths \"/mnt/art a|/mnt/b\" \
             --episode_thumbnails true --connection_method file"
        );
    }

    #[test]
    fn parameters_method_includes_connection_values() {
        let id = LibraryId::parse("a656b907eb3a73532e40e44b968d0225").unwrap();
        let config = ConnectionConfig::new(
            "http://jf:8096",
            "k3y",
            "/var/lib/jellyfin/metadata/library",
        );
        let mut opts = options();
        opts.include_extra_artwork = true;
        let command = render_command(
            id,
            &opts,
            ConnectionSource::Parameters,
            Some(&config),
        );
        assert!(command.contains("--extra_artwork true"));
        assert!(command.ends_with(
            "--connection_method parameters --url http://jf:8096 --api_key k3y \
             --library_path /var/lib/jellyfin/metadata/library"
        ));
    }
}
