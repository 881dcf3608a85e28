//! Default data home resolution with layered settings
//!
//! The default data home is resolved from three layers, later layers
//! overriding earlier ones:
//! 1. Built-in default (`~/mir_datasets`, or `<temp>/mir_datasets` without a home)
//! 2. Global config (`<config_dir>/mirdata/config.toml`, key `data_home`)
//! 3. The `MIR_DATA_HOME` environment variable
//!
//! Only the default changes; an explicit data home passed by a caller is
//! never touched by settings.

use serde::Deserialize;
use std::ffi::OsString;
use std::fs;
use std::path::PathBuf;

use crate::{Error, Result};

/// Environment variable overriding the default data home.
pub const DATA_HOME_ENV: &str = "MIR_DATA_HOME";

const DEFAULT_DIR_NAME: &str = "mir_datasets";
const APP_CONFIG_DIR: &str = "mirdata";
const CONFIG_FILE: &str = "config.toml";

/// Which layer produced the effective data home.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsSource {
    BuiltIn,
    ConfigFile(PathBuf),
    Environment,
}

/// The effective settings after all layers are applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Root under which every dataset directory lives by default
    pub data_home: PathBuf,
    /// Layer that supplied `data_home`
    pub source: SettingsSource,
}

impl Settings {
    /// Resolve settings from the real user environment.
    pub fn load() -> Result<Self> {
        SettingsResolver::new().resolve()
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct SettingsFile {
    #[serde(default)]
    data_home: Option<PathBuf>,
}

/// Resolves [`Settings`] from the layer hierarchy.
///
/// Every external input can be overridden, which keeps tests independent of
/// the machine's home directory, config directory and environment.
#[derive(Debug, Default, Clone)]
pub struct SettingsResolver {
    home_dir_override: Option<PathBuf>,
    config_dir_override: Option<PathBuf>,
    env_override: Option<Option<OsString>>,
}

impl SettingsResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `home` instead of the user's home directory for the built-in default.
    pub fn with_home_dir(mut self, home: impl Into<PathBuf>) -> Self {
        self.home_dir_override = Some(home.into());
        self
    }

    /// Use `dir` as the application config directory (the one holding `config.toml`).
    pub fn with_config_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config_dir_override = Some(dir.into());
        self
    }

    /// Use a fixed value for `MIR_DATA_HOME`; `None` behaves as unset.
    pub fn with_env_data_home(mut self, value: Option<impl Into<OsString>>) -> Self {
        self.env_override = Some(value.map(Into::into));
        self
    }

    fn home_dir(&self) -> Option<PathBuf> {
        if let Some(ref home) = self.home_dir_override {
            return Some(home.clone());
        }
        dirs::home_dir()
    }

    fn config_dir(&self) -> Option<PathBuf> {
        if let Some(ref dir) = self.config_dir_override {
            return Some(dir.clone());
        }
        dirs::config_dir().map(|d| d.join(APP_CONFIG_DIR))
    }

    fn env_data_home(&self) -> Option<OsString> {
        match &self.env_override {
            Some(value) => value.clone(),
            None => std::env::var_os(DATA_HOME_ENV),
        }
    }

    /// Apply all layers and return the effective settings.
    ///
    /// Missing layers are skipped. A config file that exists but cannot be
    /// parsed is an error.
    pub fn resolve(&self) -> Result<Settings> {
        // Layer 1 - built-in default
        let mut settings = Settings {
            data_home: self
                .home_dir()
                .unwrap_or_else(std::env::temp_dir)
                .join(DEFAULT_DIR_NAME),
            source: SettingsSource::BuiltIn,
        };

        // Layer 2 - global config file
        if let Some(config_dir) = self.config_dir() {
            let config_path = config_dir.join(CONFIG_FILE);
            if config_path.is_file() {
                tracing::debug!(?config_path, "Loading settings file (layer 2)");
                let content = fs::read_to_string(&config_path)?;
                let file: SettingsFile =
                    toml::from_str(&content).map_err(|e| Error::InvalidSettings {
                        path: config_path.clone(),
                        message: e.to_string(),
                    })?;
                if let Some(data_home) = file.data_home {
                    settings.data_home = data_home;
                    settings.source = SettingsSource::ConfigFile(config_path);
                }
            } else {
                tracing::debug!(?config_path, "No settings file found (layer 2), skipping");
            }
        }

        // Layer 3 - environment
        if let Some(value) = self.env_data_home().filter(|v| !v.is_empty()) {
            tracing::debug!(?value, "Using {DATA_HOME_ENV} (layer 3)");
            settings.data_home = PathBuf::from(value);
            settings.source = SettingsSource::Environment;
        }

        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn isolated(home: &TempDir, config: &TempDir) -> SettingsResolver {
        SettingsResolver::new()
            .with_home_dir(home.path())
            .with_config_dir(config.path())
            .with_env_data_home(None::<OsString>)
    }

    #[test]
    fn test_builtin_default_under_home() {
        let home = TempDir::new().unwrap();
        let config = TempDir::new().unwrap();

        let settings = isolated(&home, &config).resolve().unwrap();
        assert_eq!(settings.data_home, home.path().join("mir_datasets"));
        assert_eq!(settings.source, SettingsSource::BuiltIn);
    }

    #[test]
    fn test_config_file_overrides_default() {
        let home = TempDir::new().unwrap();
        let config = TempDir::new().unwrap();
        fs::write(config.path().join("config.toml"), "data_home = \"/srv/mir\"\n").unwrap();

        let settings = isolated(&home, &config).resolve().unwrap();
        assert_eq!(settings.data_home, PathBuf::from("/srv/mir"));
        assert_eq!(
            settings.source,
            SettingsSource::ConfigFile(config.path().join("config.toml"))
        );
    }

    #[test]
    fn test_config_file_without_key_keeps_default() {
        let home = TempDir::new().unwrap();
        let config = TempDir::new().unwrap();
        fs::write(config.path().join("config.toml"), "").unwrap();

        let settings = isolated(&home, &config).resolve().unwrap();
        assert_eq!(settings.source, SettingsSource::BuiltIn);
    }

    #[test]
    fn test_environment_overrides_config_file() {
        let home = TempDir::new().unwrap();
        let config = TempDir::new().unwrap();
        fs::write(config.path().join("config.toml"), "data_home = \"/srv/mir\"\n").unwrap();

        let settings = isolated(&home, &config)
            .with_env_data_home(Some("/scratch/datasets"))
            .resolve()
            .unwrap();
        assert_eq!(settings.data_home, PathBuf::from("/scratch/datasets"));
        assert_eq!(settings.source, SettingsSource::Environment);
    }

    #[test]
    fn test_empty_environment_value_is_ignored() {
        let home = TempDir::new().unwrap();
        let config = TempDir::new().unwrap();

        let settings = isolated(&home, &config)
            .with_env_data_home(Some(""))
            .resolve()
            .unwrap();
        assert_eq!(settings.source, SettingsSource::BuiltIn);
    }

    #[test]
    fn test_invalid_config_file_is_error() {
        let home = TempDir::new().unwrap();
        let config = TempDir::new().unwrap();
        fs::write(config.path().join("config.toml"), "data_home = [").unwrap();

        let err = isolated(&home, &config).resolve().unwrap_err();
        assert!(matches!(err, Error::InvalidSettings { .. }));
    }
}
