use std::path::PathBuf;

/// Loose boolean used by automation flags: `true`, `1` and `yes`
/// (case-insensitive) are true, anything else is false.
pub fn parse_truthy(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "true" | "1" | "yes"
    )
}

/// Splits a `|`-separated list of paths, dropping empty entries.
pub fn split_target_paths(raw: &str) -> Vec<PathBuf> {
    raw.split('|')
        .filter_map(|part| {
            let trimmed = part.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(expand_home(trimmed))
            }
        })
        .collect()
}

/// Expands a leading `~` to the user's home directory.
pub fn expand_home(raw: &str) -> PathBuf {
    let rest = match raw.strip_prefix('~') {
        Some(rest) if rest.is_empty() || rest.starts_with(['/', '\\']) => rest,
        _ => return PathBuf::from(raw),
    };
    match dirs::home_dir() {
        Some(home) => home.join(rest.trim_start_matches(['/', '\\'])),
        None => PathBuf::from(raw),
    }
}
