//! User configuration at ~/.config/agenda/config.toml

use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, File};
use serde::Deserialize;

use crate::constants::{
    DEFAULT_DATA_DIR, DEFAULT_HOLIDAY_COUNTRY, DEFAULT_REMINDER_INTERVAL_SECS,
};
use crate::error::{AgendaError, AgendaResult};
use crate::remote::Provider;

fn default_data_dir() -> PathBuf {
    PathBuf::from(DEFAULT_DATA_DIR)
}

fn default_reminder_interval() -> String {
    format!("{DEFAULT_REMINDER_INTERVAL_SECS}s")
}

fn default_holiday_country() -> String {
    DEFAULT_HOLIDAY_COUNTRY.to_string()
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct AgendaConfig {
    /// Where the event list is stored. `~` is expanded.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// How often the reminder poll runs, e.g. "60s" or "5m".
    #[serde(default = "default_reminder_interval")]
    pub reminder_interval: String,

    #[serde(default = "default_holiday_country")]
    pub holiday_country: String,

    pub holiday_provider: Option<String>,

    /// Falls back to the built-in mock when unset.
    pub sync_provider: Option<String>,
}

impl Default for AgendaConfig {
    fn default() -> Self {
        AgendaConfig {
            data_dir: default_data_dir(),
            reminder_interval: default_reminder_interval(),
            holiday_country: default_holiday_country(),
            holiday_provider: None,
            sync_provider: None,
        }
    }
}

impl AgendaConfig {
    pub fn config_path() -> AgendaResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| AgendaError::Config("Could not determine config directory".into()))?
            .join("agenda");

        Ok(config_dir.join("config.toml"))
    }

    /// Load the user's config, writing a commented-out default on first run.
    pub fn load() -> AgendaResult<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> AgendaResult<Self> {
        let config: AgendaConfig = Config::builder()
            .add_source(File::from(path).required(false))
            .build()
            .map_err(|e| AgendaError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| AgendaError::Config(e.to_string()))?;

        // Surface a bad interval at load time rather than when the poll starts
        config.reminder_interval()?;
        Ok(config)
    }

    pub fn data_path(&self) -> PathBuf {
        let full_path_str = shellexpand::tilde(&self.data_dir.to_string_lossy()).into_owned();
        PathBuf::from(full_path_str)
    }

    pub fn reminder_interval(&self) -> AgendaResult<Duration> {
        let interval = humantime::parse_duration(&self.reminder_interval).map_err(|e| {
            AgendaError::Config(format!(
                "Invalid reminder_interval '{}': {}",
                self.reminder_interval, e
            ))
        })?;

        if interval.is_zero() {
            return Err(AgendaError::Config(
                "reminder_interval must be greater than zero".into(),
            ));
        }
        Ok(interval)
    }

    pub fn holiday_provider(&self) -> Option<Provider> {
        self.holiday_provider.as_deref().map(Provider::from_name)
    }

    pub fn sync_provider(&self) -> Option<Provider> {
        self.sync_provider.as_deref().map(Provider::from_name)
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> AgendaResult<()> {
        let contents = format!(
            "\
# agenda configuration

# Where your events are stored:
# data_dir = \"{DEFAULT_DATA_DIR}\"

# How often `agenda remind` checks for upcoming events:
# reminder_interval = \"{DEFAULT_REMINDER_INTERVAL_SECS}s\"

# Country whose public holidays are shown in `agenda list`:
# holiday_country = \"{DEFAULT_HOLIDAY_COUNTRY}\"

# Providers are executables named agenda-provider-<name> on your PATH:
# holiday_provider = \"nager\"
# sync_provider = \"google\"
"
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                AgendaError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| AgendaError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_file_loads_as_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("agenda/config.toml");

        AgendaConfig::create_default_config(&path).unwrap();
        let config = AgendaConfig::load_from(&path).unwrap();

        assert_eq!(config, AgendaConfig::default());
        assert_eq!(config.reminder_interval().unwrap(), Duration::from_secs(60));
        assert_eq!(config.holiday_country, "IN");
        assert!(config.sync_provider().is_none());
    }

    #[test]
    fn reads_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "data_dir = \"/tmp/agenda-data\"\n\
             reminder_interval = \"5m\"\n\
             holiday_country = \"DE\"\n\
             sync_provider = \"google\"\n",
        )
        .unwrap();

        let config = AgendaConfig::load_from(&path).unwrap();

        assert_eq!(config.data_path(), PathBuf::from("/tmp/agenda-data"));
        assert_eq!(config.reminder_interval().unwrap(), Duration::from_secs(300));
        assert_eq!(config.holiday_country, "DE");
        assert_eq!(
            config.sync_provider().map(|p| p.binary_name()),
            Some("agenda-provider-google".to_string())
        );
    }

    #[test]
    fn bad_interval_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "reminder_interval = \"soon\"\n").unwrap();

        let err = AgendaConfig::load_from(&path).unwrap_err();
        assert!(matches!(err, AgendaError::Config(_)));
    }

    #[test]
    fn tilde_is_expanded() {
        let config = AgendaConfig::default();
        assert!(!config.data_path().to_string_lossy().starts_with('~'));
    }
}
