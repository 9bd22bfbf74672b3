//! Path management for Pécule
//!
//! ## Path Resolution Order
//!
//! 1. `PECULE_DATA_DIR` environment variable (if set)
//! 2. The platform configuration directory (`~/.config/pecule` on Linux,
//!    `~/Library/Application Support/pecule` on macOS, `%APPDATA%\pecule` on
//!    Windows)

use std::path::PathBuf;

use directories::ProjectDirs;

use crate::error::PeculeError;

/// Environment variable overriding the base directory
pub const DATA_DIR_ENV: &str = "PECULE_DATA_DIR";

/// Manages all paths used by Pécule
#[derive(Debug, Clone)]
pub struct PeculePaths {
    base_dir: PathBuf,
}

impl PeculePaths {
    /// Resolve the base directory from the environment or the platform default
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory can be determined.
    pub fn new() -> Result<Self, PeculeError> {
        let base_dir = match std::env::var(DATA_DIR_ENV) {
            Ok(custom) if !custom.is_empty() => PathBuf::from(custom),
            _ => resolve_default_path()?,
        };

        Ok(Self { base_dir })
    }

    /// Create paths rooted at a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Data directory holding the store files
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    pub fn backup_dir(&self) -> PathBuf {
        self.base_dir.join("backups")
    }

    /// User preferences file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    pub fn audit_log(&self) -> PathBuf {
        self.base_dir.join("audit.log")
    }

    pub fn cycles_file(&self) -> PathBuf {
        self.data_dir().join("cycles.json")
    }

    pub fn expenses_file(&self) -> PathBuf {
        self.data_dir().join("expenses.json")
    }

    pub fn incomes_file(&self) -> PathBuf {
        self.data_dir().join("incomes.json")
    }

    pub fn categories_file(&self) -> PathBuf {
        self.data_dir().join("categories.json")
    }

    /// Ensure the base, data and backup directories exist
    pub fn ensure_directories(&self) -> Result<(), PeculeError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| PeculeError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.data_dir())
            .map_err(|e| PeculeError::Io(format!("Failed to create data directory: {}", e)))?;

        std::fs::create_dir_all(self.backup_dir())
            .map_err(|e| PeculeError::Io(format!("Failed to create backup directory: {}", e)))?;

        Ok(())
    }

    /// Check if Pécule has been initialized (settings file exists)
    pub fn is_initialized(&self) -> bool {
        self.settings_file().exists()
    }
}

fn resolve_default_path() -> Result<PathBuf, PeculeError> {
    ProjectDirs::from("", "", "pecule")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or_else(|| PeculeError::Config("Could not determine the home directory".into()))
}
