// Profile recovery Settings Engine
// Reads the recovery settings file and writes back the effective settings.
// The file is JSON, at the platform config dir unless a path is given.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::platform;
use crate::types::errors::SettingsError;
use crate::types::settings::RecoverySettings;

/// File name of the settings file inside the config dir.
pub const SETTINGS_FILE: &str = "settings.json";

/// Trait defining the settings engine interface.
pub trait SettingsEngineTrait {
    fn load(&mut self) -> Result<RecoverySettings, SettingsError>;
    fn save(&self) -> Result<(), SettingsError>;
    fn get_settings(&self) -> &RecoverySettings;
    fn set_settings(&mut self, settings: RecoverySettings) -> Result<(), SettingsError>;
    fn get_config_path(&self) -> &Path;
}

/// Holds the effective settings and the file they come from.
pub struct SettingsEngine {
    config_path: PathBuf,
    settings: RecoverySettings,
}

impl SettingsEngine {
    /// `path_override` replaces `<config dir>/settings.json`.
    pub fn new(path_override: Option<PathBuf>) -> Self {
        Self {
            config_path: path_override
                .unwrap_or_else(|| platform::get_config_dir().join(SETTINGS_FILE)),
            settings: RecoverySettings::default(),
        }
    }

    /// Rejects values the recovery cannot work with.
    pub fn validate(settings: &RecoverySettings) -> Result<(), SettingsError> {
        if settings.history_limit == 0 {
            return Err(SettingsError::InvalidValue(
                "history_limit must be greater than zero".to_string(),
            ));
        }
        for (key, name) in [
            ("dashboard_file_name", &settings.dashboard_file_name),
            ("bookmarks_file_name", &settings.bookmarks_file_name),
        ] {
            if name.trim().is_empty() || name.contains(['/', '\\']) {
                return Err(SettingsError::InvalidValue(format!(
                    "{} must be a plain file name: {:?}",
                    key, name
                )));
            }
        }
        Ok(())
    }
}

impl SettingsEngineTrait for SettingsEngine {
    /// Reads the settings file. A missing file leaves the defaults in place.
    fn load(&mut self) -> Result<RecoverySettings, SettingsError> {
        let settings = match fs::read_to_string(&self.config_path) {
            Ok(json) => serde_json::from_str(&json).map_err(|e| {
                SettingsError::SerializationError(format!(
                    "{}: {}",
                    self.config_path.display(),
                    e
                ))
            })?,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %self.config_path.display(), "no settings file, using defaults");
                RecoverySettings::default()
            }
            Err(e) => {
                return Err(SettingsError::IoError(format!(
                    "{}: {}",
                    self.config_path.display(),
                    e
                )))
            }
        };
        self.set_settings(settings)?;
        Ok(self.settings.clone())
    }

    /// Writes the effective settings, creating the config dir if needed.
    fn save(&self) -> Result<(), SettingsError> {
        let io_err = |e: std::io::Error| {
            SettingsError::IoError(format!("{}: {}", self.config_path.display(), e))
        };
        if let Some(dir) = self.config_path.parent() {
            fs::create_dir_all(dir).map_err(io_err)?;
        }
        let json = serde_json::to_string_pretty(&self.settings)
            .map_err(|e| SettingsError::SerializationError(e.to_string()))?;
        fs::write(&self.config_path, json + "\n").map_err(io_err)?;
        tracing::info!(path = %self.config_path.display(), "saved settings");
        Ok(())
    }

    fn get_settings(&self) -> &RecoverySettings {
        &self.settings
    }

    /// Replaces the effective settings after validating them. Does not save.
    fn set_settings(&mut self, settings: RecoverySettings) -> Result<(), SettingsError> {
        Self::validate(&settings)?;
        self.settings = settings;
        Ok(())
    }

    fn get_config_path(&self) -> &Path {
        &self.config_path
    }
}
