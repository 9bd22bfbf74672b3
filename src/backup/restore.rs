//! Backup restoration for Pécule
//!
//! Handles restoring data from backup archives.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};

use crate::config::paths::PeculePaths;
use crate::error::{PeculeError, PeculeResult};
use crate::storage::write_json_atomic;

use super::manager::{BackupArchive, BACKUP_SCHEMA_VERSION};

/// Handles restoring from backups
pub struct RestoreManager {
    paths: PeculePaths,
}

impl RestoreManager {
    pub fn new(paths: PeculePaths) -> Self {
        Self { paths }
    }

    fn read_archive(backup_path: &Path) -> PeculeResult<BackupArchive> {
        let contents = fs::read_to_string(backup_path)
            .map_err(|e| PeculeError::Backup(format!("Failed to read backup file: {}", e)))?;

        serde_json::from_str(&contents)
            .map_err(|e| PeculeError::Backup(format!("Failed to parse backup file: {}", e)))
    }

    /// Restore data from a backup file
    ///
    /// Overwrites every store file present in the archive. Callers should
    /// create a backup of the current state first.
    pub fn restore_from_file(&self, backup_path: &Path) -> PeculeResult<RestoreResult> {
        let archive = Self::read_archive(backup_path)?;
        self.restore_from_archive(&archive)
    }

    pub fn restore_from_archive(&self, archive: &BackupArchive) -> PeculeResult<RestoreResult> {
        if archive.schema_version > BACKUP_SCHEMA_VERSION {
            return Err(PeculeError::Backup(format!(
                "Backup schema v{} is newer than this version of Pécule supports (v{})",
                archive.schema_version, BACKUP_SCHEMA_VERSION
            )));
        }

        self.paths.ensure_directories()?;

        let mut result = RestoreResult {
            schema_version: archive.schema_version,
            backup_date: archive.created_at,
            ..Default::default()
        };

        let targets = [
            (&archive.cycles, self.paths.cycles_file(), &mut result.cycles_restored),
            (&archive.expenses, self.paths.expenses_file(), &mut result.expenses_restored),
            (&archive.incomes, self.paths.incomes_file(), &mut result.incomes_restored),
            (&archive.categories, self.paths.categories_file(), &mut result.categories_restored),
            (&archive.settings, self.paths.settings_file(), &mut result.settings_restored),
        ];

        for (value, path, restored) in targets {
            if !value.is_null() {
                write_json_atomic(&path, value)?;
                *restored = true;
            }
        }

        Ok(result)
    }

    /// Check a backup file without restoring it
    pub fn validate_backup(&self, backup_path: &Path) -> PeculeResult<ValidationResult> {
        let archive = Self::read_archive(backup_path)?;

        Ok(ValidationResult {
            schema_version: archive.schema_version,
            backup_date: archive.created_at,
            has_cycles: archive.cycles.is_object(),
            has_expenses: archive.expenses.is_object(),
            has_incomes: archive.incomes.is_object(),
            has_categories: archive.categories.is_object(),
        })
    }
}

/// Result of a restore operation
#[derive(Debug, Default)]
pub struct RestoreResult {
    pub schema_version: u32,
    pub backup_date: DateTime<Utc>,
    pub cycles_restored: bool,
    pub expenses_restored: bool,
    pub incomes_restored: bool,
    pub categories_restored: bool,
    pub settings_restored: bool,
}

impl RestoreResult {
    pub fn summary(&self) -> String {
        let parts: Vec<&str> = [
            (self.cycles_restored, "cycles"),
            (self.expenses_restored, "expenses"),
            (self.incomes_restored, "incomes"),
            (self.categories_restored, "categories"),
            (self.settings_restored, "settings"),
        ]
        .iter()
        .filter(|(restored, _)| *restored)
        .map(|(_, name)| *name)
        .collect();

        if parts.is_empty() {
            "Nothing to restore".to_string()
        } else {
            format!("Restored: {}", parts.join(", "))
        }
    }
}

/// Result of validating a backup
#[derive(Debug)]
pub struct ValidationResult {
    pub schema_version: u32,
    pub backup_date: DateTime<Utc>,
    pub has_cycles: bool,
    pub has_expenses: bool,
    pub has_incomes: bool,
    pub has_categories: bool,
}

impl ValidationResult {
    pub fn is_complete(&self) -> bool {
        self.has_cycles && self.has_expenses && self.has_incomes && self.has_categories
    }

    pub fn summary(&self) -> String {
        let checks = [
            (self.has_cycles, "cycles"),
            (self.has_expenses, "expenses"),
            (self.has_incomes, "incomes"),
            (self.has_categories, "categories"),
        ];
        let missing: Vec<&str> = checks.iter().filter(|(has, _)| !has).map(|(_, n)| *n).collect();

        if missing.is_empty() {
            format!("Complete backup (v{})", self.schema_version)
        } else {
            format!(
                "Partial backup (v{}): missing {}",
                self.schema_version,
                missing.join(", ")
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backup::manager::BackupManager;
    use crate::config::settings::BackupRetention;
    use crate::models::{BudgetCycle, Money};
    use crate::storage::Storage;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn create_test_env() -> (RestoreManager, BackupManager, PeculePaths, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let paths = PeculePaths::with_base_dir(temp_dir.path().to_path_buf());
        paths.ensure_directories().unwrap();

        let backup_manager = BackupManager::new(paths.clone(), BackupRetention::default());
        let restore_manager = RestoreManager::new(paths.clone());

        (restore_manager, backup_manager, paths, temp_dir)
    }

    #[test]
    fn test_restore_round_trip() {
        let (restore_manager, backup_manager, paths, _temp) = create_test_env();

        let storage = Storage::new(paths.clone()).unwrap();
        let cycle = BudgetCycle::new(
            Money::from_cents(250000),
            NaiveDate::from_ymd_opt(2025, 1, 25).unwrap(),
        );
        storage.cycles.upsert(cycle.clone()).unwrap();
        storage.save_all().unwrap();

        let backup_path = backup_manager.create_backup().unwrap();

        fs::remove_dir_all(paths.data_dir()).unwrap();
        let result = restore_manager.restore_from_file(&backup_path).unwrap();
        assert!(result.cycles_restored);
        assert!(result.categories_restored);
        assert!(!result.settings_restored);
        assert!(result.summary().contains("cycles"));

        let mut reloaded = Storage::new(paths).unwrap();
        reloaded.load_all().unwrap();
        assert_eq!(reloaded.cycles.current().unwrap(), Some(cycle));
    }

    #[test]
    fn test_validate_backup() {
        let (restore_manager, backup_manager, _paths, _temp) = create_test_env();

        let backup_path = backup_manager.create_backup().unwrap();
        let result = restore_manager.validate_backup(&backup_path).unwrap();

        assert_eq!(result.schema_version, BACKUP_SCHEMA_VERSION);
        assert!(!result.is_complete());
        assert!(result.summary().contains("missing"));
    }

    #[test]
    fn test_rejects_newer_schema() {
        let (restore_manager, _backup_manager, _paths, _temp) = create_test_env();
        let archive = BackupArchive {
            schema_version: BACKUP_SCHEMA_VERSION + 1,
            created_at: Utc::now(),
            cycles: serde_json::Value::Null,
            expenses: serde_json::Value::Null,
            incomes: serde_json::Value::Null,
            categories: serde_json::Value::Null,
            settings: serde_json::Value::Null,
        };

        let err = restore_manager.restore_from_archive(&archive).unwrap_err();
        assert!(matches!(err, PeculeError::Backup(_)));
    }

    #[test]
    fn test_garbage_file_is_a_backup_error() {
        let (restore_manager, _backup_manager, paths, _temp) = create_test_env();
        let bogus = paths.backup_dir().join("backup-20250101-000000.json");
        fs::write(&bogus, "not json").unwrap();

        assert!(matches!(
            restore_manager.restore_from_file(&bogus),
            Err(PeculeError::Backup(_))
        ));
    }
}
