//! Configuration types for Arcana.
//!
//! `ArcanaConfig` represents the top-level `config.toml`. Every section and
//! every field has a default, so an empty or partial file is valid.

use serde::{Deserialize, Serialize};

/// Top-level configuration for the Arcana backend.
///
/// Loaded from `~/.arcana/config.toml` (or `$ARCANA_DATA_DIR/config.toml`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ArcanaConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub chat: ChatConfig,
    #[serde(default)]
    pub horoscope: HoroscopeConfig,
    #[serde(default)]
    pub logging: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Generative text provider settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Human-readable provider name used in logs (e.g. "gemini").
    #[serde(default = "default_provider_name")]
    pub provider: String,
    /// OpenAI-compatible endpoint. Defaults to Gemini's.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    /// Name of the environment variable holding the API key.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default)]
    pub temperature: Option<f64>,
}

fn default_provider_name() -> String {
    "gemini".to_string()
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta/openai".to_string()
}

fn default_model() -> String {
    "gemini-1.5-flash".to_string()
}

fn default_api_key_env() -> String {
    "GEMINI_API_KEY".to_string()
}

fn default_max_tokens() -> u32 {
    2048
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: default_provider_name(),
            base_url: default_base_url(),
            model: default_model(),
            api_key_env: default_api_key_env(),
            max_tokens: default_max_tokens(),
            temperature: None,
        }
    }
}

/// Chat lifecycle settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Points deducted from an app user when a reading is opened.
    #[serde(default = "default_reading_cost")]
    pub reading_cost: i64,
    /// Active chats older than this many days are closed by the sweep.
    #[serde(default = "default_retention_days")]
    pub retention_days: u32,
    /// Six-field cron expression (seconds first) for the stale-chat sweep.
    #[serde(default = "default_sweep_schedule")]
    pub sweep_schedule: String,
    #[serde(default = "default_page_size")]
    pub default_page_size: u32,
}

fn default_reading_cost() -> i64 {
    1
}

fn default_retention_days() -> u32 {
    3
}

fn default_sweep_schedule() -> String {
    "0 0 0 * * *".to_string()
}

fn default_page_size() -> u32 {
    20
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            reading_cost: default_reading_cost(),
            retention_days: default_retention_days(),
            sweep_schedule: default_sweep_schedule(),
            default_page_size: default_page_size(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HoroscopeConfig {
    /// Offset from UTC used to decide what "today" is. Vietnam is +7.
    #[serde(default = "default_utc_offset_hours")]
    pub utc_offset_hours: i32,
    #[serde(default = "default_retention_days")]
    pub retention_days: u32,
    #[serde(default = "default_cleanup_schedule")]
    pub cleanup_schedule: String,
    /// Cron schedule for generating every app user's reading for the day.
    #[serde(default = "default_generate_schedule")]
    pub generate_schedule: String,
}

fn default_utc_offset_hours() -> i32 {
    7
}

fn default_cleanup_schedule() -> String {
    "0 5 0 * * *".to_string()
}

/// 00:10 UTC, 07:10 in Vietnam.
fn default_generate_schedule() -> String {
    "0 10 0 * * *".to_string()
}

impl Default for HoroscopeConfig {
    fn default() -> Self {
        Self {
            utc_offset_hours: default_utc_offset_hours(),
            retention_days: default_retention_days(),
            cleanup_schedule: default_cleanup_schedule(),
            generate_schedule: default_generate_schedule(),
        }
    }
}

/// Output format of the log subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Default filter directive when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
    /// Export spans through OpenTelemetry (stdout exporter).
    #[serde(default)]
    pub otel: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
            otel: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let config = ArcanaConfig::default();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.chat.retention_days, 3);
        assert_eq!(config.chat.sweep_schedule, "0 0 0 * * *");
        assert_eq!(config.horoscope.utc_offset_hours, 7);
        assert_eq!(config.horoscope.generate_schedule, "0 10 0 * * *");
        assert_eq!(config.llm.api_key_env, "GEMINI_API_KEY");
        assert_eq!(config.logging.format, LogFormat::Pretty);
    }

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config: ArcanaConfig = toml::from_str("").unwrap();
        assert_eq!(config.chat.reading_cost, 1);
        assert_eq!(config.chat.default_page_size, 20);
        assert!(!config.logging.otel);
    }

    #[test]
    fn test_partial_toml_overrides() {
        let toml_str = r#"
[server]
port = 8080

[chat]
reading_cost = 5

[logging]
format = "json"
otel = true
"#;
        let config: ArcanaConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.chat.reading_cost, 5);
        assert_eq!(config.chat.retention_days, 3);
        assert_eq!(config.logging.format, LogFormat::Json);
        assert!(config.logging.otel);
    }
}
