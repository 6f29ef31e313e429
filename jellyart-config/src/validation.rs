use std::fs;

use crate::connection::ConnectionConfig;

#[derive(Debug, Clone)]
pub struct ConfigWarning {
    pub message: String,
    pub hint: Option<String>,
}

/// Non-fatal findings about a connection config.
#[derive(Debug, Default, Clone)]
pub struct ConfigWarnings {
    pub items: Vec<ConfigWarning>,
}

impl ConfigWarnings {
    pub fn push_with_hint<S: Into<String>, H: Into<String>>(
        &mut self,
        message: S,
        hint: H,
    ) {
        self.items.push(ConfigWarning {
            message: message.into(),
            hint: Some(hint.into()),
        });
    }

    pub fn iter(&self) -> impl Iterator<Item = &ConfigWarning> {
        self.items.iter()
    }
}

/// Checks that do not stop a run but usually explain why one fails later.
pub fn check_connection(config: &ConnectionConfig) -> ConfigWarnings {
    let mut warnings = ConfigWarnings::default();

    match fs::read_dir(&config.library_path) {
        Ok(_) => {}
        Err(err) => warnings.push_with_hint(
            format!(
                "metadata path {} is not accessible: {err}",
                config.library_path.display()
            ),
            "Point library_path at Jellyfin's metadata/library directory",
        ),
    }

    if !config.url.contains("://") {
        warnings.push_with_hint(
            format!("url '{}' has no scheme", config.url),
            "http:// is tried first, then https://",
        );
    }

    warnings
}
