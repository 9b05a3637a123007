//! Configuration loading
//!
//! Reads `~/.config/blockpad/config.toml`. A missing file yields defaults;
//! an unreadable or invalid file also yields defaults plus a warning that the
//! app surfaces as a notification.

use std::fs;
use std::path::{Path, PathBuf};

mod types;

pub use types::{API_KEY_ENV, Config, EditorConfig, OpenAiConfig, ProviderType, SuggestConfig};

pub const CONFIG_DIR: &str = "blockpad";
const CONFIG_FILE: &str = "config.toml";

/// Loaded configuration plus any warning produced while loading it
#[derive(Debug, Clone, Default)]
pub struct ConfigResult {
    pub config: Config,
    pub warning: Option<String>,
}

/// `~/.config/blockpad`
pub fn config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|p| p.join(".config").join(CONFIG_DIR))
}

pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|p| p.join(CONFIG_FILE))
}

pub fn load_config() -> ConfigResult {
    let Some(path) = config_path() else {
        return ConfigResult::default();
    };

    load_config_from_path(&path)
}

pub fn load_config_from_path(path: &Path) -> ConfigResult {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return ConfigResult::default(),
        Err(e) => {
            log::warn!("Failed to read config {}: {}", path.display(), e);
            return ConfigResult {
                config: Config::default(),
                warning: Some(format!("Could not read config: {}", e)),
            };
        }
    };

    match toml::from_str::<Config>(&contents) {
        Ok(config) => ConfigResult {
            config,
            warning: None,
        },
        Err(e) => {
            log::warn!("Invalid config {}: {}", path.display(), e);
            ConfigResult {
                config: Config::default(),
                warning: Some(format!("Invalid config, using defaults: {}", e.message())),
            }
        }
    }
}
