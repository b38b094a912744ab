use crate::error::ConfigError;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Persisted defaults for a timetally run.
///
/// Command-line flags always win over the file; a missing file just means
/// "use the defaults below" rather than an error.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Config {
    /// Upper bound of the contiguous activity-letter range (A..=max_letter).
    /// 'S' and 'P' are reserved and valid regardless of this bound.
    pub max_letter: char,
    /// Strict decode mode: any unrecognized character aborts the run
    /// instead of flagging the row and continuing.
    pub strict: bool,
    /// Insert the computed "Activity Total" column into every table.
    pub activity_total: bool,
    /// Directory the report CSVs are written under.
    pub output_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            max_letter: 'Q',
            strict: false,
            activity_total: true,
            output_dir: PathBuf::from("output"),
        }
    }
}

impl Config {
    pub fn get_config_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "yourname", "timetally")
            .map(|proj_dirs| proj_dirs.config_dir().join("config.json"))
    }

    /// Loads the saved config, falling back to defaults when no file exists.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::get_config_path().ok_or_else(|| {
            ConfigError::LoadFailed("Could not determine config directory".to_string())
        })?;

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let config_data = fs::read_to_string(&config_path)
            .map_err(|e| ConfigError::LoadFailed(format!("Failed to read config file: {}", e)))?;

        let config: Config = serde_json::from_str(&config_data)
            .map_err(|e| ConfigError::LoadFailed(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        self.validate()?;

        let config_path = Self::get_config_path().ok_or_else(|| {
            ConfigError::SaveFailed("Could not determine config directory".to_string())
        })?;

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| ConfigError::DirectoryCreationFailed(e.to_string()))?;
        }

        let config_data = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::SaveFailed(format!("Failed to serialize config: {}", e)))?;

        fs::write(&config_path, config_data)
            .map_err(|e| ConfigError::SaveFailed(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    /// The letter range bound must itself be a valid activity letter.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.max_letter.is_ascii_uppercase() {
            return Err(ConfigError::InvalidMaxLetter(self.max_letter));
        }
        Ok(())
    }
}
