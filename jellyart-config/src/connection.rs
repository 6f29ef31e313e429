use std::{
    fmt, fs, io,
    path::{Path, PathBuf},
    str::FromStr,
};

use serde::{Deserialize, Serialize};

use crate::{
    error::ConfigLoadError,
    util::expand_home,
    validation::{ConfigWarnings, check_connection},
};

pub const DEFAULT_CONNECTION_FILE: &str = "connection.json";
/// Overrides where the connection file is read from and saved to.
pub const CONNECTION_FILE_ENV: &str = "JELLYART_CONNECTION_FILE";

/// Connection file location: `$JELLYART_CONNECTION_FILE` when set, else
/// `./connection.json`.
pub fn default_connection_file() -> PathBuf {
    std::env::var(CONNECTION_FILE_ENV)
        .ok()
        .filter(|raw| !raw.trim().is_empty())
        .map(|raw| expand_home(&raw))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONNECTION_FILE))
}

/// Server url, API key and the server's metadata directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionConfig {
    pub url: String,
    pub api_key: String,
    pub library_path: PathBuf,
}

impl ConnectionConfig {
    pub fn new(
        url: impl Into<String>,
        api_key: impl Into<String>,
        library_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            url: url.into(),
            api_key: api_key.into(),
            library_path: library_path.into(),
        }
    }

    /// Builds a config from raw command-line values, trimming and expanding
    /// `~` in the metadata path.
    pub fn from_parameters(
        url: &str,
        api_key: &str,
        library_path: &str,
    ) -> Result<Self, ConfigLoadError> {
        let config = Self {
            url: url.trim().trim_end_matches('/').to_string(),
            api_key: api_key.trim().to_string(),
            library_path: expand_home(library_path.trim()),
        };
        config.ensure_complete()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigLoadError> {
        let raw = fs::read_to_string(path).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                ConfigLoadError::NotFound {
                    path: path.to_path_buf(),
                }
            } else {
                ConfigLoadError::Io {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;
        let mut config: ConnectionConfig =
            serde_json::from_str(&raw).map_err(|source| {
                ConfigLoadError::Parse {
                    path: path.to_path_buf(),
                    source,
                }
            })?;
        config.url = config.url.trim().trim_end_matches('/').to_string();
        config.api_key = config.api_key.trim().to_string();
        if let Some(raw) = config.library_path.to_str() {
            config.library_path = expand_home(raw.trim());
        }
        config.ensure_complete()?;

        tracing::debug!("Loaded connection settings from {}", path.display());
        Ok(config)
    }

    /// Writes the config as pretty-printed JSON, creating parent folders.
    pub fn save(&self, path: &Path) -> Result<(), ConfigLoadError> {
        let body =
            serde_json::to_string_pretty(self).map_err(ConfigLoadError::Encode)?;
        let write_err = |source: io::Error| ConfigLoadError::Write {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
        fs::write(path, body).map_err(write_err)?;

        tracing::info!("Connection settings saved to {}", path.display());
        Ok(())
    }

    pub fn validate(&self) -> ConfigWarnings {
        check_connection(self)
    }

    fn ensure_complete(&self) -> Result<(), ConfigLoadError> {
        if self.url.is_empty() {
            return Err(ConfigLoadError::MissingField { field: "url" });
        }
        if self.api_key.is_empty() {
            return Err(ConfigLoadError::MissingField { field: "api_key" });
        }
        if self.library_path.as_os_str().is_empty() {
            return Err(ConfigLoadError::MissingField {
                field: "library_path",
            });
        }
        Ok(())
    }
}

/// Where automation mode takes its connection settings from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionSource {
    #[default]
    File,
    Parameters,
}

impl ConnectionSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionSource::File => "file",
            ConnectionSource::Parameters => "parameters",
        }
    }
}

impl FromStr for ConnectionSource {
    type Err = ConfigLoadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "file" => Ok(ConnectionSource::File),
            "parameters" => Ok(ConnectionSource::Parameters),
            _ => Err(ConfigLoadError::InvalidConnectionSource(s.to_string())),
        }
    }
}

impl fmt::Display for ConnectionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
