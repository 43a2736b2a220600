use std::path::PathBuf;

use thiserror::Error;

use crate::theme::{ColorScheme, ParseThemeError, ThemePreference};

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("missing value for {0}")]
    MissingValue(&'static str),
    #[error("invalid value for {flag}")]
    InvalidValue {
        flag: &'static str,
        #[source]
        source: ParseThemeError,
    },
    #[error("unknown argument: {0}")]
    UnknownArgument(String),
}

/// Command line options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StartupConfig {
    /// Selection to apply after both load phases.
    pub theme: Option<ThemePreference>,
    /// Forces the system scheme instead of asking the OS.
    pub system: Option<ColorScheme>,
    pub store_path: Option<PathBuf>,
    /// Clears the stored preference before loading.
    pub reset: bool,
}

impl StartupConfig {
    pub fn from_args() -> Result<Self, StartupError> {
        Self::parse(std::env::args().skip(1))
    }

    pub fn parse<I>(args: I) -> Result<Self, StartupError>
    where
        I: IntoIterator<Item = String>,
    {
        let mut config = Self::default();
        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--theme" => {
                    let raw = args.next().ok_or(StartupError::MissingValue("--theme"))?;
                    config.theme = Some(raw.parse().map_err(|source| {
                        StartupError::InvalidValue {
                            flag: "--theme",
                            source,
                        }
                    })?);
                }
                "--system" => {
                    let raw = args.next().ok_or(StartupError::MissingValue("--system"))?;
                    config.system = Some(raw.parse().map_err(|source| {
                        StartupError::InvalidValue {
                            flag: "--system",
                            source,
                        }
                    })?);
                }
                "--store" => {
                    let raw = args.next().ok_or(StartupError::MissingValue("--store"))?;
                    config.store_path = Some(PathBuf::from(raw));
                }
                "--reset" => config.reset = true,
                _ => return Err(StartupError::UnknownArgument(arg)),
            }
        }
        Ok(config)
    }
}
