//! Backup system for budgetbook
//!
//! A backup is a snapshot of every key in the key/value store, written as a
//! dated JSON archive under the backup directory. One is taken automatically
//! before an import or a full data clear.
//!
//! - `BackupManager`: creates and lists backups and applies retention
//! - `RestoreManager`: validates and restores backups
//!
//! # Retention Policy
//!
//! The newest `backup_retention.keep` archives (default 30) are kept.

mod manager;
mod restore;

pub use manager::{BackupArchive, BackupInfo, BackupManager};
pub use restore::{RestoreManager, RestoreResult, ValidationResult};
