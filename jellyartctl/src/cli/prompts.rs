use std::path::PathBuf;

use anyhow::Result;
use dialoguer::{Confirm, Input, Select};
use jellyart_config::{
    ConfigWarnings, ConnectionConfig,
    util::{expand_home, split_target_paths},
};
use jellyart_core::ExportRequest;
use jellyart_model::{CollectionType, ExportMethod, Library, LibraryId};

use super::{Term, automation::validate_targets};

/// Answers to the export questions, shared by the export flow and the
/// command generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOptions {
    pub method: ExportMethod,
    pub target_paths: Vec<PathBuf>,
    pub include_episode_thumbnails: bool,
    pub include_extra_artwork: bool,
}

impl ExportOptions {
    pub fn to_request(&self, library_id: LibraryId) -> ExportRequest {
        ExportRequest::new(library_id, self.method, self.target_paths.clone())
            .with_episode_thumbnails(self.include_episode_thumbnails)
            .with_extra_artwork(self.include_extra_artwork)
    }
}

pub fn ask_connection(
    current: Option<&ConnectionConfig>,
) -> Result<ConnectionConfig> {
    let url: String = Input::new()
        .with_prompt("Jellyfin url (e.g. http://localhost:8096)")
        .with_initial_text(current.map(|c| c.url.clone()).unwrap_or_default())
        .validate_with(|input: &String| non_empty(input, "url"))
        .interact_text_on(&Term::stderr())?;
    let api_key: String = Input::new()
        .with_prompt("API key")
        .with_initial_text(current.map(|c| c.api_key.clone()).unwrap_or_default())
        .validate_with(|input: &String| non_empty(input, "API key"))
        .interact_text_on(&Term::stderr())?;
    let library_path: String = Input::new()
        .with_prompt("Jellyfin metadata path (.../metadata/library)")
        .with_initial_text(
            current
                .map(|c| c.library_path.display().to_string())
                .unwrap_or_default(),
        )
        .validate_with(|input: &String| non_empty(input, "metadata path"))
        .interact_text_on(&Term::stderr())?;

    Ok(ConnectionConfig::from_parameters(&url, &api_key, &library_path)?)
}

pub fn print_warnings(warnings: &ConfigWarnings) {
    for warning in warnings.iter() {
        eprintln!("warning: {}", warning.message);
        if let Some(hint) = &warning.hint {
            eprintln!("         {hint}");
        }
    }
}

/// Lists TV libraries, then movie libraries. Unsupported ones are named but
/// cannot be picked. `None` means "back".
pub fn pick_library(libraries: &[Library]) -> Result<Option<Library>> {
    let mut choices: Vec<&Library> = libraries
        .iter()
        .filter(|l| l.collection_type == CollectionType::TvShows)
        .collect();
    choices.extend(
        libraries
            .iter()
            .filter(|l| l.collection_type == CollectionType::Movies),
    );

    let unsupported: Vec<String> = libraries
        .iter()
        .filter(|l| !l.is_supported())
        .map(|l| format!("{} ({})", l.name, l.collection_type))
        .collect();
    if !unsupported.is_empty() {
        eprintln!("Not exportable: {}", unsupported.join(", "));
    }
    if choices.is_empty() {
        eprintln!("The server has no TV or movie libraries.");
        return Ok(None);
    }

    let mut labels = vec!["Back".to_string()];
    labels.extend(choices.iter().map(|l| {
        let kind = match l.collection_type {
            CollectionType::TvShows => "TV",
            _ => "Movies",
        };
        format!("[{kind}] {}", l.name)
    }));

    let choice = Select::new()
        .with_prompt("Select a library")
        .items(&labels)
        .default(0)
        .interact_on(&Term::stderr())?;
    Ok(choice
        .checked_sub(1)
        .and_then(|idx| choices.get(idx))
        .map(|library| (*library).clone()))
}

pub fn ask_export_options(library: &Library) -> Result<ExportOptions> {
    let include_episode_thumbnails =
        if library.collection_type == CollectionType::TvShows {
            Confirm::new()
                .with_prompt("Include episode thumbnails?")
                .default(false)
                .interact_on(&Term::stderr())?
        } else {
            false
        };
    let include_extra_artwork = Confirm::new()
        .with_prompt("Include backdrops, logos, clear art and disc art?")
        .default(false)
        .interact_on(&Term::stderr())?;

    let method = if library.locations.len() > 1 {
        for location in &library.locations {
            eprintln!("  library folder: {}", location.display());
        }
        let choice = Select::new()
            .with_prompt("This library spans several folders. Export method")
            .items(&[
                "single: everything under one target folder",
                "separate: a full copy under each of several target folders",
            ])
            .default(0)
            .interact_on(&Term::stderr())?;
        if choice == 0 {
            ExportMethod::Single
        } else {
            ExportMethod::Separate
        }
    } else {
        ExportMethod::Single
    };

    let target_paths = ask_target_paths(method)?;
    Ok(ExportOptions {
        method,
        target_paths,
        include_episode_thumbnails,
        include_extra_artwork,
    })
}

fn ask_target_paths(method: ExportMethod) -> Result<Vec<PathBuf>> {
    let prompt = match method {
        ExportMethod::Single => "Target folder",
        ExportMethod::Separate => "Target folders, separated by '|'",
    };
    let raw: String = Input::new()
        .with_prompt(prompt)
        .validate_with(move |input: &String| check_targets(method, input))
        .interact_text_on(&Term::stderr())?;
    Ok(parse_targets(method, &raw))
}

fn parse_targets(method: ExportMethod, raw: &str) -> Vec<PathBuf> {
    match method {
        ExportMethod::Single => {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                Vec::new()
            } else {
                vec![expand_home(trimmed)]
            }
        }
        ExportMethod::Separate => split_target_paths(raw),
    }
}

/// Targets typed interactively must already exist as directories.
fn check_targets(method: ExportMethod, raw: &str) -> Result<(), String> {
    let targets = parse_targets(method, raw);
    validate_targets(method, &targets).map_err(|e| e.to_string())?;
    match targets.iter().find(|path| !path.is_dir()) {
        Some(path) => Err(format!("{} is not an existing folder", path.display())),
        None => Ok(()),
    }
}

fn non_empty(input: &str, what: &str) -> Result<(), String> {
    if input.trim().is_empty() {
        Err(format!("{what} cannot be empty"))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn single_target_is_trimmed() {
        let dir = TempDir::new().unwrap();
        let raw = format!("  {}  ", dir.path().display());
        assert!(check_targets(ExportMethod::Single, &raw).is_ok());
        assert_eq!(
            parse_targets(ExportMethod::Single, &raw),
            vec![dir.path().to_path_buf()]
        );
    }

    #[test]
    fn missing_or_repeated_folders_are_refused() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing");
        assert!(
            check_targets(ExportMethod::Single, &missing.display().to_string())
                .is_err()
        );

        let twice = format!("{0}|{0}", dir.path().display());
        assert!(check_targets(ExportMethod::Separate, &twice).is_err());
    }
}
