//! User preferences for Pécule
//!
//! Holds the first name shown in greetings, the theme preference, the
//! currency symbol and the backup retention policy.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::paths::PeculePaths;
use crate::error::PeculeError;

/// Theme preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Follow the system setting
    #[default]
    Auto,
    Light,
    Dark,
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Theme::Auto => write!(f, "auto"),
            Theme::Light => write!(f, "light"),
            Theme::Dark => write!(f, "dark"),
        }
    }
}

impl FromStr for Theme {
    type Err = PeculeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "auto" => Ok(Theme::Auto),
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(PeculeError::Config(format!("Unknown theme: {}", other))),
        }
    }
}

/// Backup retention settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupRetention {
    /// Number of most recent backups to keep
    pub daily_count: u32,
    /// Number of monthly backups to keep
    pub monthly_count: u32,
}

impl Default for BackupRetention {
    fn default() -> Self {
        Self {
            daily_count: 30,
            monthly_count: 12,
        }
    }
}

/// User settings for Pécule
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// First name entered during onboarding
    #[serde(default)]
    pub first_name: String,

    #[serde(default)]
    pub theme: Theme,

    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    #[serde(default)]
    pub backup_retention: BackupRetention,

    /// Whether onboarding has been completed
    #[serde(default)]
    pub setup_completed: bool,
}

fn default_schema_version() -> u32 {
    1
}

fn default_currency() -> String {
    "€".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            first_name: String::new(),
            theme: Theme::default(),
            currency_symbol: default_currency(),
            backup_retention: BackupRetention::default(),
            setup_completed: false,
        }
    }
}

impl Settings {
    /// Load settings from disk, or return defaults if the file doesn't exist
    pub fn load_or_create(paths: &PeculePaths) -> Result<Self, PeculeError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path)
                .map_err(|e| PeculeError::Io(format!("Failed to read settings file: {}", e)))?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                PeculeError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            Ok(settings)
        } else {
            // Not persisted until the caller saves
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &PeculePaths) -> Result<(), PeculeError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| PeculeError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| PeculeError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }

    /// Greeting line built from the first name
    pub fn greeting(&self) -> String {
        if self.first_name.trim().is_empty() {
            "Bonjour !".to_string()
        } else {
            format!("Bonjour {} !", self.first_name.trim())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.theme, Theme::Auto);
        assert_eq!(settings.currency_symbol, "€");
        assert!(!settings.setup_completed);
        assert_eq!(settings.backup_retention.daily_count, 30);
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let paths = PeculePaths::with_base_dir(temp_dir.path().to_path_buf());

        let mut settings = Settings::default();
        settings.first_name = "Camille".into();
        settings.theme = Theme::Dark;
        settings.save(&paths).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded.first_name, "Camille");
        assert_eq!(loaded.theme, Theme::Dark);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"first_name":"Léa"}"#).unwrap();
        assert_eq!(settings.first_name, "Léa");
        assert_eq!(settings.theme, Theme::Auto);
        assert_eq!(settings.currency_symbol, "€");
    }

    #[test]
    fn test_theme_parse() {
        assert_eq!("Dark".parse::<Theme>().unwrap(), Theme::Dark);
        assert_eq!(" light ".parse::<Theme>().unwrap(), Theme::Light);
        assert!("sepia".parse::<Theme>().is_err());
        assert_eq!(Theme::Auto.to_string(), "auto");
    }

    #[test]
    fn test_greeting() {
        let mut settings = Settings::default();
        assert_eq!(settings.greeting(), "Bonjour !");
        settings.first_name = "Camille".into();
        assert_eq!(settings.greeting(), "Bonjour Camille !");
    }
}
