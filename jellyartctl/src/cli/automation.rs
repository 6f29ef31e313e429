use std::{collections::HashSet, path::PathBuf};

use anyhow::Result;
use jellyart_config::{
    ConfigLoadError, ConnectionConfig, ConnectionSource,
    default_connection_file,
    util::{parse_truthy, split_target_paths},
};
use jellyart_core::{
    ExportError, ExportRequest, Exporter, JellyfinCatalog, MetadataLocator,
};
use jellyart_model::{ExportMethod, ExportSummary, LibraryId};

use super::Cli;

/// Validated automation invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub source: ConnectionSource,
    pub parameters: Option<ConnectionConfig>,
    pub request: ExportRequest,
}

impl Invocation {
    pub fn from_cli(cli: &Cli) -> Result<Self, ExportError> {
        let library_id = required(&cli.library_id, "--library_id")?;
        let library_id = LibraryId::parse(library_id)
            .map_err(|e| ExportError::Configuration(e.to_string()))?;
        let method = cli.export_method.ok_or_else(|| {
            ExportError::Configuration("--export_method is required".into())
        })?;
        let target_paths =
            split_target_paths(required(&cli.target_paths, "--target_paths")?);
        validate_targets(method, &target_paths)?;

        let parameters = match cli.connection_method {
            ConnectionSource::File => None,
            ConnectionSource::Parameters => {
                let url = required(&cli.url, "--url")?;
                let api_key = required(&cli.api_key, "--api_key")?;
                let library_path = required(&cli.library_path, "--library_path")?;
                Some(
                    ConnectionConfig::from_parameters(url, api_key, library_path)
                        .map_err(config_error)?,
                )
            }
        };

        let request = ExportRequest::new(library_id, method, target_paths)
            .with_episode_thumbnails(
                cli.episode_thumbnails.as_deref().is_some_and(parse_truthy),
            )
            .with_extra_artwork(
                cli.extra_artwork.as_deref().is_some_and(parse_truthy),
            )
            .with_dry_run(cli.dry_run);

        Ok(Self {
            source: cli.connection_method,
            parameters,
            request,
        })
    }

    pub fn connection(&self) -> Result<ConnectionConfig, ExportError> {
        match &self.parameters {
            Some(config) => Ok(config.clone()),
            None => ConnectionConfig::load(&default_connection_file())
                .map_err(config_error),
        }
    }
}

/// `single` takes exactly one target; `separate` takes one or more distinct
/// targets.
pub fn validate_targets(
    method: ExportMethod,
    targets: &[PathBuf],
) -> Result<(), ExportError> {
    match method {
        ExportMethod::Single if targets.len() != 1 => {
            Err(ExportError::Configuration(format!(
                "single export needs exactly one target path, got {}",
                targets.len()
            )))
        }
        ExportMethod::Separate if targets.is_empty() => Err(
            ExportError::Configuration("separate export needs at least one target path".into()),
        ),
        _ => {
            let mut seen = HashSet::new();
            match targets.iter().find(|path| !seen.insert(*path)) {
                Some(dup) => Err(ExportError::Configuration(format!(
                    "target path {} is listed more than once",
                    dup.display()
                ))),
                None => Ok(()),
            }
        }
    }
}

pub async fn run(cli: Cli) -> Result<ExportSummary> {
    let invocation = Invocation::from_cli(&cli)?;
    let config = invocation.connection()?;
    tracing::info!(
        "Connection settings from {}; exporting library {}",
        invocation.source,
        invocation.request.library_id
    );
    for warning in config.validate().iter() {
        tracing::warn!("{}", warning.message);
    }

    // The metadata store is checked before any network traffic.
    MetadataLocator::open(&config.library_path)?;

    let catalog = JellyfinCatalog::connect(&config.url, &config.api_key)
        .await
        .map_err(ExportError::Api)?;
    let exporter = Exporter::new(&catalog, &config.library_path);
    let summary = exporter.run(&invocation.request).await?;
    Ok(summary)
}

fn required<'a>(
    value: &'a Option<String>,
    flag: &str,
) -> Result<&'a str, ExportError> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ExportError::Configuration(format!("{flag} is required")))
}

/// Flattens a config error and its cause into one message.
pub fn config_error(err: ConfigLoadError) -> ExportError {
    let mut message = err.to_string();
    let mut source = std::error::Error::source(&err);
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    ExportError::Configuration(message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("jellyartctl").chain(args.iter().copied()))
            .unwrap()
    }

    const LIBRARY: &str = "a656b907eb3a73532e40e44b968d0225";

    #[test]
    fn full_parameter_invocation_is_accepted() {
        let cli = parse(&[
            "--library_id",
            LIBRARY,
            "--export_method",
            "separate",
            "--target_paths",
            "/mnt/a|/mnt/b",
            "--episode_thumbnails",
            "yes",
            "--connection_method",
            "parameters",
            "--url",
            "jellyfin:8096",
            "--api_key",
            "k",
            "--library_path",
            "/var/lib/jellyfin/metadata/library",
        ]);
        let invocation = Invocation::from_cli(&cli).unwrap();

        assert_eq!(invocation.request.method, ExportMethod::Separate);
        assert_eq!(invocation.request.target_paths.len(), 2);
        assert!(invocation.request.include_episode_thumbnails);
        assert!(!invocation.request.include_extra_artwork);
        assert!(!invocation.request.dry_run);
        assert_eq!(
            invocation.parameters.unwrap().url,
            "jellyfin:8096"
        );
    }

    #[test]
    fn thumbnails_default_to_off_for_unknown_values() {
        let cli = parse(&[
            "--library_id",
            LIBRARY,
            "--export_method",
            "single",
            "--target_paths",
            "/mnt/a",
            "--episode_thumbnails",
            "maybe",
        ]);
        let invocation = Invocation::from_cli(&cli).unwrap();
        assert!(!invocation.request.include_episode_thumbnails);
        assert!(invocation.parameters.is_none());
    }

    #[test]
    fn parameters_method_needs_every_connection_value() {
        let cli = parse(&[
            "--library_id",
            LIBRARY,
            "--export_method",
            "single",
            "--target_paths",
            "/mnt/a",
            "--connection_method",
            "parameters",
            "--url",
            "http://jf",
        ]);
        let err = Invocation::from_cli(&cli).unwrap_err();
        assert!(err.to_string().contains("--api_key"));
    }

    #[test]
    fn single_rejects_several_targets() {
        let targets = vec![PathBuf::from("/a"), PathBuf::from("/b")];
        assert!(validate_targets(ExportMethod::Single, &targets).is_err());
        assert!(validate_targets(ExportMethod::Separate, &targets).is_ok());
    }

    #[test]
    fn separate_rejects_duplicates_and_empty_lists() {
        let dup = vec![PathBuf::from("/a"), PathBuf::from("/a")];
        assert!(validate_targets(ExportMethod::Separate, &dup).is_err());
        assert!(validate_targets(ExportMethod::Separate, &[]).is_err());
    }

    #[test]
    fn missing_library_id_is_a_configuration_error() {
        let cli = parse(&["--export_method", "single", "--target_paths", "/a"]);
        let err = Invocation::from_cli(&cli).unwrap_err();
        assert!(matches!(err, ExportError::Configuration(_)));
        assert!(err.is_fatal());
    }
}
