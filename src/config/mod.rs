use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub(crate) enum ConfigPathError {
    #[error("missing HOME environment variable")]
    MissingHomeDirectory,
}

pub(crate) const APP_DIR: &str = "sitetheme";
const APP_CONFIG_FILE: &str = "config.json";

/// Names the controller uses to talk to storage and the document.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ThemeSettings {
    /// Key of the persisted preference.
    pub storage_key: String,
    /// Attribute written on the document root.
    pub root_attribute: String,
    /// Id of the theme selection container.
    pub selector_id: String,
    /// Attribute that tags selector items with a theme variant.
    pub item_marker: String,
    pub active_class: String,
    /// File name of the key-value store inside the config directory.
    pub store_file: String,
}

impl Default for ThemeSettings {
    fn default() -> Self {
        Self {
            storage_key: "theme".to_string(),
            root_attribute: "data-theme".to_string(),
            selector_id: "THEME-DROPDOWN".to_string(),
            item_marker: "data-theme".to_string(),
            active_class: "active".to_string(),
            store_file: "preferences.json".to_string(),
        }
    }
}

pub fn load_theme_settings() -> ThemeSettings {
    let (xdg_config_home, home) = config_env_dirs();
    load_theme_settings_with(xdg_config_home.as_deref(), home.as_deref())
}

fn load_theme_settings_with(xdg_config_home: Option<&Path>, home: Option<&Path>) -> ThemeSettings {
    let path = match app_config_path(APP_DIR, APP_CONFIG_FILE, xdg_config_home, home) {
        Ok(p) => p,
        Err(_) => return ThemeSettings::default(),
    };
    if !path.exists() {
        return ThemeSettings::default();
    }
    match std::fs::read_to_string(&path) {
        Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|err| {
            tracing::warn!(?err, ?path, "failed to parse config.json; using defaults");
            ThemeSettings::default()
        }),
        Err(err) => {
            tracing::warn!(?err, ?path, "failed to read config.json; using defaults");
            ThemeSettings::default()
        }
    }
}

pub(crate) fn config_env_dirs() -> (Option<PathBuf>, Option<PathBuf>) {
    (
        std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from),
        std::env::var_os("HOME").map(PathBuf::from),
    )
}

pub(crate) fn app_config_path(
    app_dir: &str,
    file_name: &str,
    xdg_config_home: Option<&Path>,
    home: Option<&Path>,
) -> Result<PathBuf, ConfigPathError> {
    let mut path = config_root(xdg_config_home, home)?;
    path.push(app_dir);
    path.push(file_name);
    Ok(path)
}

fn config_root(
    xdg_config_home: Option<&Path>,
    home: Option<&Path>,
) -> Result<PathBuf, ConfigPathError> {
    if let Some(xdg) = xdg_config_home.filter(|path| !path.as_os_str().is_empty()) {
        return Ok(xdg.to_path_buf());
    }

    let home = home.ok_or(ConfigPathError::MissingHomeDirectory)?;
    Ok(home.join(".config"))
}
