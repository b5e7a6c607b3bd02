//! Environment file loading

use std::path::PathBuf;

/// Candidate locations for `blox.env`, in search order:
/// 1. /usr/local/etc/blox/blox.env
/// 2. User's config directory/blox/blox.env
/// 3. ~/.config/blox/blox.env
pub fn env_file_candidates() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from("/usr/local/etc/blox/blox.env")];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("blox/blox.env"));
    }
    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(".config/blox/blox.env"));
    }
    paths
}

/// Load variables from the first `blox.env` found. Variables already set in
/// the process environment win.
pub fn load_env_file() {
    for path in env_file_candidates() {
        if path.exists() {
            if let Ok(contents) = std::fs::read_to_string(&path) {
                tracing::debug!("Loading environment from {}", path.display());
                parse_env_file(&contents);
            }
            break;
        }
    }
}

/// Parse env file contents and set variables that are not already set.
/// Supports formats:
/// - `KEY=value`
/// - `export KEY=value`
/// - `KEY="quoted value"`
/// - `KEY='single quoted'`
/// - Comments starting with #
pub fn parse_env_file(contents: &str) {
    for (key, value) in parse_env_pairs(contents) {
        if std::env::var(&key).is_err() {
            std::env::set_var(key, value);
        }
    }
}

/// Parse env file contents into key/value pairs without touching the
/// process environment
pub fn parse_env_pairs(contents: &str) -> Vec<(String, String)> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| {
            let line = line.strip_prefix("export ").unwrap_or(line);
            let (key, value) = line.split_once('=')?;
            let value = value.trim().trim_matches('"').trim_matches('\'');
            Some((key.trim().to_string(), value.to_string()))
        })
        .collect()
}
