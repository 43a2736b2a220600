pub mod app;
pub mod config;
pub mod document;
pub mod error;
pub mod logging;
pub mod state;
pub mod storage;
pub mod system;
pub mod theme;
pub mod ui;
pub use error::{AppError, AppResult};
pub use theme::{resolve, AppliedTheme, ColorScheme, ThemeController, ThemePreference};

/// Entrypoint used by the CLI binding.
pub fn run() -> AppResult<()> {
    logging::init();
    tracing::info!("starting sitetheme");

    let startup = app::StartupConfig::from_args()?;
    let report = app::App::new(startup).start()?;

    tracing::info!(
        preference = %report.preference,
        applied = %report.applied,
        "theme session complete"
    );
    println!("{report}");
    Ok(())
}
