use anyhow::Result;
use dialoguer::{Confirm, Select};
use jellyart_config::{ConnectionConfig, default_connection_file};
use jellyart_core::{Exporter, JellyfinCatalog, LibraryCatalog};
use jellyart_model::{CollectionType, Library};

use super::{Term, command_gen, connection_editor, preview, prompts};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MainMenuItem {
    Exit,
    ReadConnectionFile,
    EnterConnection,
    EditConnectionFile,
    GenerateCommand,
}

impl MainMenuItem {
    const ALL: [MainMenuItem; 5] = [
        MainMenuItem::Exit,
        MainMenuItem::ReadConnectionFile,
        MainMenuItem::EnterConnection,
        MainMenuItem::EditConnectionFile,
        MainMenuItem::GenerateCommand,
    ];

    fn label(&self) -> &'static str {
        match self {
            MainMenuItem::Exit => "Exit",
            MainMenuItem::ReadConnectionFile => "Connect using the connection file",
            MainMenuItem::EnterConnection => "Connect by entering details",
            MainMenuItem::EditConnectionFile => "Create or edit the connection file",
            MainMenuItem::GenerateCommand => "Generate an automation command",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LibraryAction {
    Back,
    Preview,
    Export,
}

pub async fn run_main_menu() -> Result<()> {
    let labels: Vec<&str> = MainMenuItem::ALL.iter().map(|i| i.label()).collect();
    loop {
        let choice = Select::new()
            .with_prompt("jellyart")
            .items(&labels)
            .default(0)
            .interact_on(&Term::stderr())?;
        match MainMenuItem::ALL[choice] {
            MainMenuItem::Exit => return Ok(()),
            MainMenuItem::ReadConnectionFile => {
                let path = default_connection_file();
                match ConnectionConfig::load(&path) {
                    Ok(config) => session(config).await?,
                    Err(err) => eprintln!("{err}"),
                }
            }
            MainMenuItem::EnterConnection => {
                let config = prompts::ask_connection(None)?;
                session(config).await?;
            }
            MainMenuItem::EditConnectionFile => connection_editor::run().await?,
            MainMenuItem::GenerateCommand => {
                if let Err(err) = command_gen::run_interactive().await {
                    eprintln!("Could not build a command: {err:#}");
                }
            }
        }
    }
}

async fn session(config: ConnectionConfig) -> Result<()> {
    prompts::print_warnings(&config.validate());

    let catalog = match JellyfinCatalog::connect(&config.url, &config.api_key).await {
        Ok(catalog) => catalog,
        Err(err) => {
            eprintln!("Connection failed: {err}");
            return Ok(());
        }
    };
    eprintln!("Connected to {}", catalog.base_url());

    loop {
        let libraries = match catalog.list_libraries().await {
            Ok(libraries) => libraries,
            Err(err) => {
                eprintln!("Could not list libraries: {err}");
                return Ok(());
            }
        };
        let Some(library) = prompts::pick_library(&libraries)? else {
            return Ok(());
        };
        library_menu(&catalog, &config, &library).await?;
    }
}

async fn library_menu<C>(
    catalog: &C,
    config: &ConnectionConfig,
    library: &Library,
) -> Result<()>
where
    C: LibraryCatalog + ?Sized,
{
    let actions = [
        (LibraryAction::Back, "Back"),
        (LibraryAction::Preview, "Preview cached artwork"),
        (LibraryAction::Export, "Export artwork"),
    ];
    let labels: Vec<&str> = actions.iter().map(|(_, label)| *label).collect();

    loop {
        let choice = Select::new()
            .with_prompt(format!("{} ({})", library.name, library.collection_type))
            .items(&labels)
            .default(0)
            .interact_on(&Term::stderr())?;
        match actions[choice].0 {
            LibraryAction::Back => return Ok(()),
            LibraryAction::Preview => {
                let thumbs = library.collection_type == CollectionType::TvShows
                    && Confirm::new()
                        .with_prompt("Include episode thumbnails in the preview?")
                        .default(false)
                        .interact_on(&Term::stderr())?;
                if let Err(err) = preview::show_preview(
                    catalog,
                    &config.library_path,
                    library,
                    thumbs,
                    true,
                )
                .await
                {
                    eprintln!("Preview failed: {err:#}");
                }
            }
            LibraryAction::Export => export(catalog, config, library).await?,
        }
    }
}

async fn export<C>(
    catalog: &C,
    config: &ConnectionConfig,
    library: &Library,
) -> Result<()>
where
    C: LibraryCatalog + ?Sized,
{
    let options = prompts::ask_export_options(library)?;
    let targets = options
        .target_paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ");
    let confirmed = Confirm::new()
        .with_prompt(format!(
            "Export '{}' ({}) to {targets}?",
            library.name, options.method
        ))
        .default(true)
        .interact_on(&Term::stderr())?;
    if !confirmed {
        return Ok(());
    }

    let request = options.to_request(library.id);
    let exporter = Exporter::new(catalog, &config.library_path);
    match exporter.run(&request).await {
        Ok(summary) => println!("{summary}"),
        Err(err) => eprintln!("Export failed: {err}"),
    }
    Ok(())
}
