//! Backup system for Pécule
//!
//! - `BackupManager`: creates dated archives and applies the retention policy
//! - `RestoreManager`: validates archives and writes them back over the data
//!
//! An archive is one JSON document holding the cycles, expenses, incomes,
//! categories and settings files as they were on disk. The default policy
//! keeps the 30 most recent backups plus the first backup of each of the
//! last 12 months.

mod manager;
mod restore;

pub use manager::{BackupArchive, BackupInfo, BackupManager, BACKUP_SCHEMA_VERSION};
pub use restore::{RestoreManager, RestoreResult, ValidationResult};
