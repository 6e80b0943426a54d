//! Configuration loader for Arcana.
//!
//! Reads `config.toml` from the data directory (`~/.arcana/` unless
//! `ARCANA_DATA_DIR` says otherwise) and deserializes it into
//! [`ArcanaConfig`]. Falls back to defaults when the file is missing or
//! malformed.

use std::path::{Path, PathBuf};

use arcana_types::config::ArcanaConfig;

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "ARCANA_DATA_DIR";

/// Resolve the data directory: `ARCANA_DATA_DIR`, else `~/.arcana`.
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
        if !dir.trim().is_empty() {
            return PathBuf::from(dir);
        }
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".arcana")
}

/// SQLite URL of the database file inside `data_dir`.
pub fn database_url(data_dir: &Path) -> String {
    format!("sqlite://{}?mode=rwc", data_dir.join("arcana.db").display())
}

/// Load configuration from `{data_dir}/config.toml`.
///
/// - If the file does not exist, returns [`ArcanaConfig::default()`].
/// - If the file exists but fails to read or parse, logs a warning and
///   returns the default.
pub async fn load_config(data_dir: &Path) -> ArcanaConfig {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return ArcanaConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return ArcanaConfig::default();
        }
    };

    match toml::from_str::<ArcanaConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            ArcanaConfig::default()
        }
    }
}
