use anyhow::Result;
use dialoguer::Confirm;
use jellyart_config::{ConfigLoadError, ConnectionConfig, default_connection_file};
use jellyart_core::JellyfinCatalog;

use super::{Term, prompts};

/// Creates or edits the connection file, optionally testing the result.
pub async fn run() -> Result<()> {
    let path = default_connection_file();
    let current = match ConnectionConfig::load(&path) {
        Ok(config) => {
            eprintln!("Editing {}", path.display());
            Some(config)
        }
        Err(ConfigLoadError::NotFound { .. }) => {
            eprintln!("Creating {}", path.display());
            None
        }
        Err(err) => {
            eprintln!("{err}; starting from empty settings");
            None
        }
    };

    let config = prompts::ask_connection(current.as_ref())?;
    prompts::print_warnings(&config.validate());

    let save = Confirm::new()
        .with_prompt(format!("Save to {}?", path.display()))
        .default(true)
        .interact_on(&Term::stderr())?;
    if save {
        config.save(&path)?;
        eprintln!("Saved.");
    }

    let test = Confirm::new()
        .with_prompt("Test the connection now?")
        .default(true)
        .interact_on(&Term::stderr())?;
    if test {
        match JellyfinCatalog::connect(&config.url, &config.api_key).await {
            Ok(catalog) => eprintln!("Connected to {}", catalog.base_url()),
            Err(err) => eprintln!("Connection failed: {err}"),
        }
    }
    Ok(())
}
