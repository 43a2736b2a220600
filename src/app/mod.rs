mod bootstrap;
mod startup;

use std::fmt;
use std::path::PathBuf;
use std::rc::Rc;

use crate::config::{load_theme_settings, ThemeSettings};
use crate::document::DocumentRoot;
use crate::error::AppResult;
use crate::theme::{AppliedTheme, ThemeController, ThemePreference};
use crate::ui::ThemeSelector;

use bootstrap::bootstrap_theme_runtime;
pub use startup::{StartupConfig, StartupError};

/// Outcome of one headless session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeReport {
    pub preference: ThemePreference,
    pub applied: AppliedTheme,
    pub store_path: Option<PathBuf>,
}

impl fmt::Display for ThemeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "preference={} applied={}", self.preference, self.applied)?;
        if let Some(path) = &self.store_path {
            write!(f, " store={}", path.display())?;
        }
        Ok(())
    }
}

#[derive(Debug)]
pub struct App {
    startup: StartupConfig,
    settings: ThemeSettings,
}

impl App {
    pub fn new(startup: StartupConfig) -> Self {
        Self::with_settings(startup, load_theme_settings())
    }

    pub fn with_settings(startup: StartupConfig, settings: ThemeSettings) -> Self {
        Self { startup, settings }
    }

    /// Runs both load phases against a detached document root, then applies
    /// the requested selection if any.
    pub fn start(&self) -> AppResult<ThemeReport> {
        let runtime = bootstrap_theme_runtime(&self.startup, &self.settings);
        if self.startup.reset {
            runtime.store.remove(&self.settings.storage_key)?;
            tracing::info!("cleared stored theme preference");
        }

        let root = Rc::new(DocumentRoot::new(self.settings.root_attribute.clone()));
        let mut controller = ThemeController::new(
            self.settings.clone(),
            runtime.store,
            runtime.source,
            Rc::clone(&root),
        );

        controller.pre_paint();
        controller.on_interactive(Some(ThemeSelector::standard(&self.settings)));
        if let Some(preference) = self.startup.theme {
            controller.set_theme(preference);
        }

        Ok(ThemeReport {
            preference: controller.preference(),
            applied: controller.applied_theme(),
            store_path: runtime.store_path,
        })
    }
}
