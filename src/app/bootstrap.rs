use std::path::PathBuf;

use crate::config::ThemeSettings;
use crate::storage::{JsonFileStore, MemoryStore, PreferenceStore};
use crate::system::{ColorSchemeSource, OsColorScheme, SimulatedColorScheme};

use super::startup::StartupConfig;

pub(super) struct ThemeRuntime {
    pub(super) store: Box<dyn PreferenceStore>,
    pub(super) store_path: Option<PathBuf>,
    pub(super) source: Box<dyn ColorSchemeSource>,
}

pub(super) fn bootstrap_theme_runtime(
    startup: &StartupConfig,
    settings: &ThemeSettings,
) -> ThemeRuntime {
    let (store, store_path) = open_store(startup, settings);
    let source = system_source(startup);
    ThemeRuntime {
        store,
        store_path,
        source,
    }
}

fn open_store(
    startup: &StartupConfig,
    settings: &ThemeSettings,
) -> (Box<dyn PreferenceStore>, Option<PathBuf>) {
    let store = match startup.store_path.clone() {
        Some(path) => Ok(JsonFileStore::with_path(path)),
        None => JsonFileStore::with_default_path(&settings.store_file),
    };
    match store {
        Ok(store) => {
            let path = store.path().to_path_buf();
            tracing::debug!(?path, "using file preference store");
            let store: Box<dyn PreferenceStore> = Box::new(store);
            (store, Some(path))
        }
        Err(err) => {
            tracing::warn!(?err, "no preference store location; keeping theme in memory");
            let store: Box<dyn PreferenceStore> = Box::new(MemoryStore::new());
            (store, None)
        }
    }
}

fn system_source(startup: &StartupConfig) -> Box<dyn ColorSchemeSource> {
    match startup.system {
        Some(scheme) => {
            tracing::debug!(%scheme, "using forced system color scheme");
            Box::new(SimulatedColorScheme::new(scheme))
        }
        None => Box::new(OsColorScheme),
    }
}
