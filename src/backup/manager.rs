//! Backup manager for Pécule
//!
//! Handles rolling backups with configurable retention policies.
//! Backups are stored as dated JSON archives.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::config::paths::PeculePaths;
use crate::config::settings::BackupRetention;
use crate::error::{PeculeError, PeculeResult};

/// Current archive layout version
pub const BACKUP_SCHEMA_VERSION: u32 = 1;

/// Metadata about a backup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupInfo {
    pub filename: String,
    pub path: PathBuf,
    pub created_at: DateTime<Utc>,
    pub size_bytes: u64,
    /// First backup of its calendar month (kept longer)
    pub is_monthly: bool,
}

/// Backup archive format
#[derive(Debug, Serialize, Deserialize)]
pub struct BackupArchive {
    pub schema_version: u32,
    pub created_at: DateTime<Utc>,
    pub cycles: serde_json::Value,
    pub expenses: serde_json::Value,
    pub incomes: serde_json::Value,
    pub categories: serde_json::Value,
    #[serde(default)]
    pub settings: serde_json::Value,
}

/// Manages backup creation and retention
pub struct BackupManager {
    backup_dir: PathBuf,
    paths: PeculePaths,
    retention: BackupRetention,
}

impl BackupManager {
    pub fn new(paths: PeculePaths, retention: BackupRetention) -> Self {
        let backup_dir = paths.backup_dir();
        Self {
            backup_dir,
            paths,
            retention,
        }
    }

    /// Create a backup of all data
    ///
    /// Returns the path to the created backup file.
    pub fn create_backup(&self) -> PeculeResult<PathBuf> {
        fs::create_dir_all(&self.backup_dir)
            .map_err(|e| PeculeError::Backup(format!("Failed to create backup directory: {}", e)))?;

        let mut now = Utc::now();
        let mut backup_path = self.backup_dir.join(backup_filename(&now));
        // Two backups within the same millisecond must not overwrite each other
        while backup_path.exists() {
            now += chrono::Duration::milliseconds(1);
            backup_path = self.backup_dir.join(backup_filename(&now));
        }

        let archive = self.create_archive(now)?;

        let json = serde_json::to_string_pretty(&archive)
            .map_err(|e| PeculeError::Json(format!("Failed to serialize backup: {}", e)))?;

        fs::write(&backup_path, json)
            .map_err(|e| PeculeError::Backup(format!("Failed to write backup file: {}", e)))?;

        Ok(backup_path)
    }

    fn create_archive(&self, timestamp: DateTime<Utc>) -> PeculeResult<BackupArchive> {
        Ok(BackupArchive {
            schema_version: BACKUP_SCHEMA_VERSION,
            created_at: timestamp,
            cycles: read_json_value(&self.paths.cycles_file())?,
            expenses: read_json_value(&self.paths.expenses_file())?,
            incomes: read_json_value(&self.paths.incomes_file())?,
            categories: read_json_value(&self.paths.categories_file())?,
            settings: read_json_value(&self.paths.settings_file())?,
        })
    }

    /// List all available backups, newest first
    pub fn list_backups(&self) -> PeculeResult<Vec<BackupInfo>> {
        if !self.backup_dir.exists() {
            return Ok(Vec::new());
        }

        let mut backups = Vec::new();

        for entry in fs::read_dir(&self.backup_dir)
            .map_err(|e| PeculeError::Io(format!("Failed to read backup directory: {}", e)))?
        {
            let entry =
                entry.map_err(|e| PeculeError::Io(format!("Failed to read directory entry: {}", e)))?;

            let path = entry.path();
            if path.extension().map_or(false, |ext| ext == "json") {
                if let Some(info) = parse_backup_info(&path) {
                    backups.push(info);
                }
            }
        }

        backups.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        mark_monthly(&mut backups);

        Ok(backups)
    }

    /// Delete the backups the retention policy no longer covers
    ///
    /// The newest `daily_count` backups are kept, plus the first backup of
    /// each of the `monthly_count` most recent months.
    pub fn enforce_retention(&self) -> PeculeResult<Vec<PathBuf>> {
        let backups = self.list_backups()?;
        let mut deleted = Vec::new();

        for backup in select_for_pruning(&backups, &self.retention) {
            fs::remove_file(&backup.path)
                .map_err(|e| PeculeError::Backup(format!("Failed to delete old backup: {}", e)))?;
            deleted.push(backup.path.clone());
        }

        Ok(deleted)
    }

    /// Backups `enforce_retention` would delete, newest first
    pub fn pruning_candidates(&self) -> PeculeResult<Vec<BackupInfo>> {
        let backups = self.list_backups()?;
        Ok(select_for_pruning(&backups, &self.retention)
            .into_iter()
            .cloned()
            .collect())
    }

    /// Create a backup and then enforce retention policy
    pub fn create_backup_with_retention(&self) -> PeculeResult<(PathBuf, Vec<PathBuf>)> {
        let backup_path = self.create_backup()?;
        let deleted = self.enforce_retention()?;
        Ok((backup_path, deleted))
    }

    pub fn backup_dir(&self) -> &PathBuf {
        &self.backup_dir
    }

    /// Get a specific backup by filename
    pub fn get_backup(&self, filename: &str) -> PeculeResult<Option<BackupInfo>> {
        Ok(self
            .list_backups()?
            .into_iter()
            .find(|b| b.filename == filename))
    }

    pub fn get_latest_backup(&self) -> PeculeResult<Option<BackupInfo>> {
        Ok(self.list_backups()?.into_iter().next())
    }
}

fn backup_filename(timestamp: &DateTime<Utc>) -> String {
    format!(
        "backup-{}-{:03}.json",
        timestamp.format("%Y%m%d-%H%M%S"),
        timestamp.timestamp_subsec_millis()
    )
}

fn parse_backup_info(path: &Path) -> Option<BackupInfo> {
    let filename = path.file_name()?.to_string_lossy().to_string();
    let date_part = filename.strip_prefix("backup-")?.strip_suffix(".json")?;
    let created_at = parse_backup_timestamp(date_part)?;
    let size_bytes = fs::metadata(path).ok()?.len();

    Some(BackupInfo {
        filename,
        path: path.to_path_buf(),
        created_at,
        size_bytes,
        is_monthly: false,
    })
}

/// Flag the oldest backup of each month; `backups` is sorted newest first
fn mark_monthly(backups: &mut [BackupInfo]) {
    let mut seen = HashSet::new();
    for backup in backups.iter_mut().rev() {
        let month = (backup.created_at.year(), backup.created_at.month());
        backup.is_monthly = seen.insert(month);
    }
}

/// Backups outside the retention policy; `backups` is sorted newest first
fn select_for_pruning<'b>(backups: &'b [BackupInfo], retention: &BackupRetention) -> Vec<&'b BackupInfo> {
    let daily_kept = retention.daily_count as usize;

    let monthly_kept: HashSet<&Path> = backups
        .iter()
        .filter(|b| b.is_monthly)
        .take(retention.monthly_count as usize)
        .map(|b| b.path.as_path())
        .collect();

    backups
        .iter()
        .enumerate()
        .filter(|(index, backup)| *index >= daily_kept && !monthly_kept.contains(backup.path.as_path()))
        .map(|(_, backup)| backup)
        .collect()
}

/// Read a JSON file as a generic Value, `null` if the file doesn't exist
fn read_json_value(path: &Path) -> PeculeResult<serde_json::Value> {
    if !path.exists() {
        return Ok(serde_json::Value::Null);
    }

    let contents = fs::read_to_string(path)
        .map_err(|e| PeculeError::Io(format!("Failed to read file for backup: {}", e)))?;

    serde_json::from_str(&contents)
        .map_err(|e| PeculeError::Json(format!("Failed to parse JSON for backup: {}", e)))
}

/// Parse `YYYYMMDD-HHMMSS` or `YYYYMMDD-HHMMSS-mmm`
fn parse_backup_timestamp(date_str: &str) -> Option<DateTime<Utc>> {
    let parts: Vec<&str> = date_str.split('-').collect();
    if parts.len() < 2 || parts.len() > 3 {
        return None;
    }

    let date_part = parts[0];
    let time_part = parts[1];
    let millis: u32 = match parts.get(2) {
        Some(ms) => ms.parse().ok()?,
        None => 0,
    };

    if date_part.len() != 8 || time_part.len() != 6 || !date_part.is_ascii() || !time_part.is_ascii() {
        return None;
    }

    let year: i32 = date_part[0..4].parse().ok()?;
    let month: u32 = date_part[4..6].parse().ok()?;
    let day: u32 = date_part[6..8].parse().ok()?;
    let hour: u32 = time_part[0..2].parse().ok()?;
    let minute: u32 = time_part[2..4].parse().ok()?;
    let second: u32 = time_part[4..6].parse().ok()?;

    let date = NaiveDate::from_ymd_opt(year, month, day)?;
    let time = chrono::NaiveTime::from_hms_milli_opt(hour, minute, second, millis)?;

    Some(DateTime::from_naive_utc_and_offset(date.and_time(time), Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BudgetCycle, Money};
    use crate::storage::write_json_atomic;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn create_test_manager() -> (BackupManager, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let paths = PeculePaths::with_base_dir(temp_dir.path().to_path_buf());
        paths.ensure_directories().unwrap();

        let retention = BackupRetention {
            daily_count: 3,
            monthly_count: 2,
        };

        let manager = BackupManager::new(paths, retention);
        (manager, temp_dir)
    }

    fn info(y: i32, m: u32, d: u32) -> BackupInfo {
        let created_at = Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap();
        BackupInfo {
            filename: backup_filename(&created_at),
            path: PathBuf::from(backup_filename(&created_at)),
            created_at,
            size_bytes: 0,
            is_monthly: false,
        }
    }

    #[test]
    fn test_create_backup() {
        let (manager, _temp) = create_test_manager();

        let backup_path = manager.create_backup().unwrap();
        assert!(backup_path.exists());
        assert!(backup_path.to_string_lossy().contains("backup-"));
    }

    #[test]
    fn test_list_backups_newest_first() {
        let (manager, _temp) = create_test_manager();

        let first = manager.create_backup().unwrap();
        let second = manager.create_backup().unwrap();
        assert_ne!(first, second);

        let backups = manager.list_backups().unwrap();
        assert_eq!(backups.len(), 2);
        assert!(backups[0].created_at > backups[1].created_at);
        assert_eq!(backups[0].path, second);
    }

    #[test]
    fn test_monthly_is_first_of_each_month() {
        let mut backups = vec![info(2025, 3, 20), info(2025, 3, 5), info(2025, 2, 27), info(2025, 2, 3)];
        mark_monthly(&mut backups);

        let flags: Vec<_> = backups.iter().map(|b| b.is_monthly).collect();
        assert_eq!(flags, vec![false, true, false, true]);
    }

    #[test]
    fn test_pruning_keeps_recent_and_monthly() {
        // Newest first: five in June, one each for May, April and March
        let mut backups = vec![
            info(2025, 6, 25),
            info(2025, 6, 20),
            info(2025, 6, 15),
            info(2025, 6, 10),
            info(2025, 6, 2),
            info(2025, 5, 14),
            info(2025, 4, 9),
            info(2025, 3, 1),
        ];
        mark_monthly(&mut backups);

        let retention = BackupRetention {
            daily_count: 3,
            monthly_count: 2,
        };
        let pruned: Vec<_> = select_for_pruning(&backups, &retention)
            .into_iter()
            .map(|b| b.created_at.date_naive())
            .collect();

        // June 2 and May 14 survive as the two most recent monthly backups
        let expected: Vec<_> = [(6, 10), (4, 9), (3, 1)]
            .iter()
            .map(|&(m, d)| NaiveDate::from_ymd_opt(2025, m, d).unwrap())
            .collect();
        assert_eq!(pruned, expected);
    }

    #[test]
    fn test_enforce_retention_on_disk() {
        let (manager, _temp) = create_test_manager();

        for _ in 0..5 {
            manager.create_backup().unwrap();
        }

        // All five share a month: three daily plus the oldest as monthly
        let deleted = manager.enforce_retention().unwrap();
        assert_eq!(deleted.len(), 1);
        assert_eq!(manager.list_backups().unwrap().len(), 4);
    }

    #[test]
    fn test_parse_backup_timestamp() {
        let timestamp = parse_backup_timestamp("20251127-143022").unwrap();
        assert_eq!((timestamp.year(), timestamp.month(), timestamp.day()), (2025, 11, 27));

        let timestamp = parse_backup_timestamp("20251127-143022-456").unwrap();
        assert_eq!(timestamp.timestamp_subsec_millis(), 456);

        assert!(parse_backup_timestamp("2025-11-27").is_none());
        assert!(parse_backup_timestamp("20251127-143022-abc").is_none());
    }

    #[test]
    fn test_archive_contains_store_files() {
        let (manager, _temp) = create_test_manager();
        let cycle = BudgetCycle::new(Money::from_cents(100), NaiveDate::from_ymd_opt(2025, 1, 25).unwrap());
        write_json_atomic(
            manager.paths.cycles_file(),
            &serde_json::json!({ "cycles": [cycle] }),
        )
        .unwrap();

        let backup_path = manager.create_backup().unwrap();
        let contents = fs::read_to_string(&backup_path).unwrap();
        let archive: BackupArchive = serde_json::from_str(&contents).unwrap();

        assert_eq!(archive.schema_version, BACKUP_SCHEMA_VERSION);
        assert_eq!(archive.cycles["cycles"].as_array().unwrap().len(), 1);
        assert!(archive.expenses.is_null());
    }

    #[test]
    fn test_get_latest_backup() {
        let (manager, _temp) = create_test_manager();
        assert!(manager.get_latest_backup().unwrap().is_none());

        let path = manager.create_backup().unwrap();
        let latest = manager.get_latest_backup().unwrap().unwrap();
        assert_eq!(latest.path, path);
        assert!(manager.get_backup(&latest.filename).unwrap().is_some());
    }
}
