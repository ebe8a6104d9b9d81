//! Backup manager for budgetbook
//!
//! Handles rolling backups of the key/value store with a keep-newest-N
//! retention policy.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::config::paths::BudgetbookPaths;
use crate::config::settings::BackupRetention;
use crate::error::{BudgetbookError, BudgetbookResult};
use crate::storage::KeyValueStore;

/// Current archive schema version
pub const BACKUP_SCHEMA_VERSION: u32 = 1;

/// Metadata about a backup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupInfo {
    /// Backup filename
    pub filename: String,
    /// Full path to backup
    pub path: PathBuf,
    /// When the backup was created
    pub created_at: DateTime<Utc>,
}

/// Backup archive format
#[derive(Debug, Serialize, Deserialize)]
pub struct BackupArchive {
    /// Schema version for migration support
    pub schema_version: u32,
    /// When the backup was created
    pub created_at: DateTime<Utc>,
    /// What triggered the backup ("manual", "import", "clear")
    #[serde(default)]
    pub reason: Option<String>,
    /// Every store key with its raw serialized value
    pub entries: BTreeMap<String, String>,
}

impl BackupArchive {
    /// Snapshot every key of `store`
    pub fn capture(
        store: &dyn KeyValueStore,
        reason: Option<&str>,
        created_at: DateTime<Utc>,
    ) -> BudgetbookResult<Self> {
        let mut entries = BTreeMap::new();
        for key in store.keys()? {
            if let Some(value) = store.get(&key)? {
                entries.insert(key, value);
            }
        }

        Ok(Self {
            schema_version: BACKUP_SCHEMA_VERSION,
            created_at,
            reason: reason.map(str::to_string),
            entries,
        })
    }

    /// Number of records stored under `key`, if it holds a JSON array
    pub fn record_count(&self, key: &str) -> Option<usize> {
        let raw = self.entries.get(key)?;
        serde_json::from_str::<Vec<serde_json::Value>>(raw)
            .ok()
            .map(|records| records.len())
    }
}

/// Manages backup creation and retention
pub struct BackupManager {
    /// Path to backup directory
    backup_dir: PathBuf,
    /// Retention policy
    retention: BackupRetention,
}

impl BackupManager {
    /// Create a new BackupManager
    pub fn new(paths: &BudgetbookPaths, retention: BackupRetention) -> Self {
        Self {
            backup_dir: paths.backup_dir(),
            retention,
        }
    }

    /// Snapshot `store` into a new backup file
    ///
    /// Returns the path to the created backup file.
    pub fn create_backup(
        &self,
        store: &dyn KeyValueStore,
        reason: Option<&str>,
    ) -> BudgetbookResult<PathBuf> {
        fs::create_dir_all(&self.backup_dir).map_err(|e| {
            BudgetbookError::Io(format!("Failed to create backup directory: {}", e))
        })?;

        let now = Utc::now();
        let filename = format!(
            "backup-{}-{:03}.json",
            now.format("%Y%m%d-%H%M%S"),
            now.timestamp_subsec_millis()
        );
        let backup_path = self.backup_dir.join(&filename);

        let archive = BackupArchive::capture(store, reason, now)?;

        let json = serde_json::to_string_pretty(&archive).map_err(|e| {
            BudgetbookError::Json(format!("Failed to serialize backup: {}", e))
        })?;

        fs::write(&backup_path, json).map_err(|e| {
            BudgetbookError::Io(format!("Failed to write backup file: {}", e))
        })?;

        log::info!("Created backup {}", backup_path.display());
        Ok(backup_path)
    }

    /// List all available backups, newest first
    pub fn list_backups(&self) -> BudgetbookResult<Vec<BackupInfo>> {
        if !self.backup_dir.exists() {
            return Ok(Vec::new());
        }

        let mut backups = Vec::new();

        for entry in fs::read_dir(&self.backup_dir).map_err(|e| {
            BudgetbookError::Io(format!("Failed to read backup directory: {}", e))
        })? {
            let entry = entry.map_err(|e| {
                BudgetbookError::Io(format!("Failed to read directory entry: {}", e))
            })?;

            let path = entry.path();
            if path.extension().map_or(false, |ext| ext == "json") {
                if let Some(info) = parse_backup_info(&path) {
                    backups.push(info);
                }
            }
        }

        backups.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(backups)
    }

    /// Delete all but the newest `retention.keep` backups
    pub fn enforce_retention(&self) -> BudgetbookResult<Vec<PathBuf>> {
        let mut deleted = Vec::new();

        for backup in self
            .list_backups()?
            .into_iter()
            .skip(self.retention.keep as usize)
        {
            fs::remove_file(&backup.path).map_err(|e| {
                BudgetbookError::Io(format!("Failed to delete old backup: {}", e))
            })?;
            deleted.push(backup.path);
        }

        if !deleted.is_empty() {
            log::debug!("Removed {} old backup(s)", deleted.len());
        }

        Ok(deleted)
    }

    /// Create a backup and then enforce retention policy
    pub fn create_backup_with_retention(
        &self,
        store: &dyn KeyValueStore,
        reason: Option<&str>,
    ) -> BudgetbookResult<(PathBuf, Vec<PathBuf>)> {
        let backup_path = self.create_backup(store, reason)?;
        let deleted = self.enforce_retention()?;
        Ok((backup_path, deleted))
    }

    /// Get backup directory path
    pub fn backup_dir(&self) -> &PathBuf {
        &self.backup_dir
    }

    /// Get the most recent backup
    pub fn get_latest_backup(&self) -> BudgetbookResult<Option<BackupInfo>> {
        let backups = self.list_backups()?;
        Ok(backups.into_iter().next())
    }
}

/// Parse backup info from a backup file name
fn parse_backup_info(path: &Path) -> Option<BackupInfo> {
    let filename = path.file_name()?.to_string_lossy().to_string();

    let date_part = filename.strip_prefix("backup-")?.strip_suffix(".json")?;
    let created_at = parse_backup_timestamp(date_part)?;

    Some(BackupInfo {
        filename,
        path: path.to_path_buf(),
        created_at,
    })
}

/// Parse a backup timestamp from the filename date part
fn parse_backup_timestamp(date_str: &str) -> Option<DateTime<Utc>> {
    // Expected format: YYYYMMDD-HHMMSS or YYYYMMDD-HHMMSS-mmm
    let parts: Vec<&str> = date_str.split('-').collect();
    if parts.len() < 2 || parts.len() > 3 {
        return None;
    }

    let date_part = parts[0];
    let time_part = parts[1];
    let millis: u32 = if parts.len() == 3 {
        parts[2].parse().unwrap_or(0)
    } else {
        0
    };

    if date_part.len() != 8 || time_part.len() != 6 {
        return None;
    }

    let year: i32 = date_part.get(0..4)?.parse().ok()?;
    let month: u32 = date_part.get(4..6)?.parse().ok()?;
    let day: u32 = date_part.get(6..8)?.parse().ok()?;
    let hour: u32 = time_part.get(0..2)?.parse().ok()?;
    let minute: u32 = time_part.get(2..4)?.parse().ok()?;
    let second: u32 = time_part.get(4..6)?.parse().ok()?;

    let date = NaiveDate::from_ymd_opt(year, month, day)?;
    let time = chrono::NaiveTime::from_hms_milli_opt(hour, minute, second, millis)?;
    let datetime = chrono::NaiveDateTime::new(date, time);

    Some(DateTime::from_naive_utc_and_offset(datetime, Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::kv::{MemoryStore, TRANSACTIONS_KEY};
    use chrono::Datelike;
    use tempfile::TempDir;

    fn create_test_manager(keep: u32) -> (BackupManager, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let paths = BudgetbookPaths::with_base_dir(temp_dir.path().to_path_buf());
        paths.ensure_directories().unwrap();

        let manager = BackupManager::new(&paths, BackupRetention { keep });
        (manager, temp_dir)
    }

    fn sample_store() -> MemoryStore {
        let store = MemoryStore::new();
        store.set(TRANSACTIONS_KEY, "[{\"id\":\"a\"},{\"id\":\"b\"}]".into()).unwrap();
        store.set("theme", "dark".into()).unwrap();
        store
    }

    #[test]
    fn test_create_backup() {
        let (manager, _temp) = create_test_manager(30);

        let backup_path = manager.create_backup(&sample_store(), Some("manual")).unwrap();
        assert!(backup_path.exists());
        assert!(backup_path.to_string_lossy().contains("backup-"));

        let contents = fs::read_to_string(&backup_path).unwrap();
        let archive: BackupArchive = serde_json::from_str(&contents).unwrap();
        assert_eq!(archive.schema_version, 1);
        assert_eq!(archive.reason.as_deref(), Some("manual"));
        assert_eq!(archive.entries.get("theme").map(String::as_str), Some("dark"));
        assert_eq!(archive.record_count(TRANSACTIONS_KEY), Some(2));
    }

    #[test]
    fn test_list_backups() {
        let (manager, _temp) = create_test_manager(30);
        let store = sample_store();

        manager.create_backup(&store, None).unwrap();
        std::thread::sleep(std::time::Duration::from_millis(20));
        manager.create_backup(&store, None).unwrap();

        let backups = manager.list_backups().unwrap();
        assert_eq!(backups.len(), 2);
        assert!(backups[0].created_at >= backups[1].created_at);
    }

    #[test]
    fn test_retention_policy() {
        let (manager, _temp) = create_test_manager(3);
        let store = sample_store();

        for _ in 0..5 {
            manager.create_backup(&store, None).unwrap();
            std::thread::sleep(std::time::Duration::from_millis(20));
        }

        let deleted = manager.enforce_retention().unwrap();
        assert_eq!(deleted.len(), 2);
        assert_eq!(manager.list_backups().unwrap().len(), 3);
    }

    #[test]
    fn test_get_latest_backup() {
        let (manager, _temp) = create_test_manager(30);

        assert!(manager.get_latest_backup().unwrap().is_none());

        let path = manager.create_backup(&sample_store(), None).unwrap();
        let latest = manager.get_latest_backup().unwrap().unwrap();
        assert_eq!(latest.path, path);
    }

    #[test]
    fn test_parse_backup_timestamp() {
        let timestamp = parse_backup_timestamp("20251127-143022").unwrap();
        assert_eq!(timestamp.year(), 2025);
        assert_eq!(timestamp.month(), 11);
        assert_eq!(timestamp.day(), 27);

        assert!(parse_backup_timestamp("20251127-143022-456").is_some());
        assert!(parse_backup_timestamp("2025-11").is_none());
    }

    #[test]
    fn test_unrelated_files_are_ignored() {
        let (manager, _temp) = create_test_manager(30);
        fs::write(manager.backup_dir().join("notes.json"), "{}").unwrap();

        assert!(manager.list_backups().unwrap().is_empty());
    }
}
