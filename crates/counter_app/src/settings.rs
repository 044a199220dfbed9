use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::LevelFilter;
use loop_logging::LogDestination;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_SETTINGS_FILE: &str = "counter_app.ron";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings from {path:?}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to parse settings from {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: ron::error::SpannedError,
    },
    #[error("invalid settings: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogSetting {
    Terminal,
    File(PathBuf),
    Both(PathBuf),
}

impl LogSetting {
    pub fn destination(&self) -> LogDestination {
        match self {
            LogSetting::Terminal => LogDestination::Terminal,
            LogSetting::File(path) => LogDestination::File(path.clone()),
            LogSetting::Both(path) => LogDestination::Both(path.clone()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Delay between ticker events.
    pub tick_interval_ms: u64,
    /// Number of ticks before the run finishes.
    pub ticks: u32,
    /// Starting counter value.
    pub start: i64,
    pub log: LogSetting,
    pub verbose: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            tick_interval_ms: 100,
            ticks: 10,
            start: 0,
            log: LogSetting::Terminal,
            verbose: false,
        }
    }
}

impl AppSettings {
    pub fn level(&self) -> LevelFilter {
        if self.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        }
    }

    fn validate(self) -> Result<Self, SettingsError> {
        if self.ticks == 0 {
            return Err(SettingsError::Invalid("ticks must be at least 1".into()));
        }
        Ok(self)
    }
}

/// Loads settings from a RON file. A missing file yields the defaults.
pub fn load_settings(path: &Path) -> Result<AppSettings, SettingsError> {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            return Ok(AppSettings::default());
        }
        Err(source) => {
            return Err(SettingsError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    let settings: AppSettings = ron::from_str(&content).map_err(|source| SettingsError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    settings.validate()
}
