// ABOUTME: Configuration resolution for the chat client
// CLI flags win over the MARKET_CHAT_API_URL env var, which wins over the config file

use std::path::PathBuf;

use serde::Deserialize;

pub const DEFAULT_API_BASE: &str = "http://localhost:8000";

#[derive(Debug, Clone)]
pub struct Config {
    pub api_base: String,
    /// Where session state lives. `None` means no usable home directory was
    /// found and the registry runs in its non-persisted degraded mode.
    pub state_dir: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    api_base: Option<String>,
    state_dir: Option<PathBuf>,
}

impl Config {
    pub fn load(cli_api_base: Option<String>, cli_state_dir: Option<PathBuf>) -> Self {
        let file = read_config_file();
        let api_base = cli_api_base
            .or_else(|| {
                std::env::var("MARKET_CHAT_API_URL")
                    .ok()
                    .filter(|value| !value.is_empty())
            })
            .or(file.api_base)
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());
        let state_dir = cli_state_dir.or(file.state_dir).or_else(default_state_dir);
        Self {
            api_base,
            state_dir,
        }
    }
}

pub fn app_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".market-chat"))
}

pub fn default_state_dir() -> Option<PathBuf> {
    app_dir().map(|dir| dir.join("state"))
}

pub fn log_dir() -> PathBuf {
    app_dir()
        .map(|dir| dir.join("logs"))
        .unwrap_or_else(|| PathBuf::from(".market-chat/logs"))
}

fn read_config_file() -> ConfigFile {
    let Some(path) = app_dir().map(|dir| dir.join("config.toml")) else {
        return ConfigFile::default();
    };
    match std::fs::read_to_string(&path) {
        Ok(raw) => toml::from_str(&raw).unwrap_or_else(|e| {
            tracing::warn!("Ignoring unparseable config {:?}: {}", path, e);
            ConfigFile::default()
        }),
        Err(_) => ConfigFile::default(),
    }
}
