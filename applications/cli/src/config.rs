/// Application configuration
use crate::error::{CliError, Result};
use mixtape_playback::PlaybackConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Config file picked up from the working directory when `--config` is absent
pub const DEFAULT_CONFIG_FILE: &str = "mixtape.toml";

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub storage: StorageSettings,

    #[serde(default)]
    pub playback: PlaybackConfig,

    #[serde(default)]
    pub library: LibrarySettings,

    #[serde(default)]
    pub log: LogSettings,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct StorageSettings {
    /// JSON file holding the playlist and last-played position.
    /// Defaults to `<data dir>/mixtape/state.json`.
    #[serde(default = "default_state_file")]
    pub state_file: Option<PathBuf>,

    /// Keep everything in memory for the session, ignoring `state_file`
    #[serde(default)]
    pub in_memory: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LibrarySettings {
    /// Extensions picked up when a directory is added
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LogSettings {
    /// `EnvFilter` directive used when `RUST_LOG` is unset
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

impl AppConfig {
    /// Load configuration from file and environment
    ///
    /// `path` must exist when given; otherwise `./mixtape.toml` is read if
    /// present. Environment variables prefixed `MIXTAPE__` override both,
    /// e.g. `MIXTAPE__PLAYBACK__INITIAL_VOLUME=0.8`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                settings = settings.add_source(config::File::from(path).required(true));
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        settings = settings.add_source(
            config::Environment::with_prefix("MIXTAPE")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("library.extensions")
                .try_parsing(true),
        );

        let config = settings.build()?;
        Ok(config.try_deserialize()?)
    }

    /// State file to persist to, `None` when state stays in memory
    pub fn state_file(&self) -> Option<&Path> {
        if self.storage.in_memory {
            return None;
        }
        self.storage.state_file.as_deref()
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        let volume = self.playback.initial_volume;
        if !volume.is_finite() || !(0.0..=1.0).contains(&volume) {
            return Err(CliError::Config(format!(
                "playback.initial_volume must be between 0 and 1, got {}",
                volume
            )));
        }

        let interval = self.playback.position_save_interval_secs;
        if !interval.is_finite() || interval < 0.0 {
            return Err(CliError::Config(format!(
                "playback.position_save_interval_secs must be >= 0, got {}",
                interval
            )));
        }

        if self.library.extensions.iter().all(|e| e.trim().is_empty()) {
            return Err(CliError::Config(
                "library.extensions must name at least one extension".to_string(),
            ));
        }

        Ok(())
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            state_file: default_state_file(),
            in_memory: false,
        }
    }
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            extensions: default_extensions(),
        }
    }
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

// Default values
fn default_state_file() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join("mixtape").join("state.json"))
}

fn default_extensions() -> Vec<String> {
    ["mp3", "flac", "ogg", "wav", "m4a", "aac", "opus"]
        .iter()
        .map(|e| (*e).to_string())
        .collect()
}

fn default_log_filter() -> String {
    "mixtape=info,mixtape_storage=info,mixtape_playback=info".to_string()
}
