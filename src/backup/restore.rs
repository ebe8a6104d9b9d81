//! Backup restoration for budgetbook

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};

use crate::error::{BudgetbookError, BudgetbookResult};
use crate::storage::kv::{BUDGETS_KEY, CATEGORIES_KEY, TRANSACTIONS_KEY};
use crate::storage::KeyValueStore;

use super::manager::BackupArchive;

/// Handles restoring from backups
#[derive(Debug, Default)]
pub struct RestoreManager;

impl RestoreManager {
    pub fn new() -> Self {
        Self
    }

    fn read_archive(&self, backup_path: &Path) -> BudgetbookResult<BackupArchive> {
        let contents = fs::read_to_string(backup_path)
            .map_err(|e| BudgetbookError::Io(format!("Failed to read backup file: {}", e)))?;

        serde_json::from_str(&contents)
            .map_err(|e| BudgetbookError::Json(format!("Failed to parse backup file: {}", e)))
    }

    /// Replace the contents of `store` with a backup file
    ///
    /// Keys missing from the backup are removed. Callers reload their
    /// repositories afterwards.
    pub fn restore_from_file(
        &self,
        backup_path: &Path,
        store: &dyn KeyValueStore,
    ) -> BudgetbookResult<RestoreResult> {
        let archive = self.read_archive(backup_path)?;
        self.restore_from_archive(&archive, store)
    }

    /// Replace the contents of `store` with a parsed archive
    pub fn restore_from_archive(
        &self,
        archive: &BackupArchive,
        store: &dyn KeyValueStore,
    ) -> BudgetbookResult<RestoreResult> {
        store.clear()?;
        for (key, value) in &archive.entries {
            store.set(key, value.clone())?;
        }

        log::info!(
            "Restored {} key(s) from backup taken {}",
            archive.entries.len(),
            archive.created_at
        );

        Ok(RestoreResult {
            schema_version: archive.schema_version,
            backup_date: archive.created_at,
            keys_restored: archive.entries.len(),
            transactions: archive.record_count(TRANSACTIONS_KEY).unwrap_or(0),
            categories: archive.record_count(CATEGORIES_KEY).unwrap_or(0),
            budgets: archive.record_count(BUDGETS_KEY).unwrap_or(0),
        })
    }

    /// Validate a backup file without restoring it
    pub fn validate_backup(&self, backup_path: &Path) -> BudgetbookResult<ValidationResult> {
        let archive = self.read_archive(backup_path)?;

        Ok(ValidationResult {
            schema_version: archive.schema_version,
            backup_date: archive.created_at,
            reason: archive.reason.clone(),
            transactions: archive.record_count(TRANSACTIONS_KEY),
            categories: archive.record_count(CATEGORIES_KEY),
            budgets: archive.record_count(BUDGETS_KEY),
        })
    }
}

/// Result of a restore operation
#[derive(Debug)]
pub struct RestoreResult {
    pub schema_version: u32,
    pub backup_date: DateTime<Utc>,
    pub keys_restored: usize,
    pub transactions: usize,
    pub categories: usize,
    pub budgets: usize,
}

impl RestoreResult {
    /// Get a summary of what was restored
    pub fn summary(&self) -> String {
        format!(
            "Restored {} transactions, {} categories, {} budgets from {}",
            self.transactions,
            self.categories,
            self.budgets,
            self.backup_date.format("%Y-%m-%d %H:%M:%S")
        )
    }
}

/// Result of validating a backup
#[derive(Debug)]
pub struct ValidationResult {
    pub schema_version: u32,
    pub backup_date: DateTime<Utc>,
    pub reason: Option<String>,
    /// Record counts; `None` when the collection is absent or unreadable
    pub transactions: Option<usize>,
    pub categories: Option<usize>,
    pub budgets: Option<usize>,
}

impl ValidationResult {
    /// Check if every collection is present
    pub fn is_complete(&self) -> bool {
        self.transactions.is_some() && self.categories.is_some() && self.budgets.is_some()
    }

    /// Get a summary of what data is present
    pub fn summary(&self) -> String {
        let describe = |name: &str, count: Option<usize>| match count {
            Some(n) => format!("{} {}", n, name),
            None => format!("no {}", name),
        };

        format!(
            "{} backup (v{}): {}, {}, {}",
            if self.is_complete() { "Complete" } else { "Partial" },
            self.schema_version,
            describe("transactions", self.transactions),
            describe("categories", self.categories),
            describe("budgets", self.budgets)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backup::manager::BackupManager;
    use crate::config::paths::BudgetbookPaths;
    use crate::config::settings::BackupRetention;
    use crate::models::{Money, Transaction, TransactionType};
    use crate::storage::Storage;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn create_test_env() -> (Storage, BackupManager, BudgetbookPaths, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let paths = BudgetbookPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::open(&paths).unwrap();
        storage.load_all().unwrap();

        let backup_manager = BackupManager::new(&paths, BackupRetention::default());
        (storage, backup_manager, paths, temp_dir)
    }

    #[test]
    fn test_restore_after_clear() {
        let (storage, backup_manager, paths, _temp) = create_test_env();
        storage
            .transactions
            .upsert(Transaction::new(
                Money::from_cents(1500),
                TransactionType::Expense,
                "food".into(),
                NaiveDate::from_ymd_opt(2025, 10, 1).unwrap(),
                "Noodles",
            ))
            .unwrap();
        storage.save_all().unwrap();

        let backup_path = backup_manager
            .create_backup(storage.store(), Some("clear"))
            .unwrap();
        storage.clear_all().unwrap();
        assert_eq!(storage.transactions.count().unwrap(), 0);

        let result = RestoreManager::new()
            .restore_from_file(&backup_path, storage.store())
            .unwrap();
        assert_eq!(result.transactions, 1);
        assert_eq!(result.categories, 12);

        // A fresh process sees the restored data
        let reopened = Storage::open(&paths).unwrap();
        reopened.load_all().unwrap();
        assert_eq!(
            reopened.transactions.get_all().unwrap()[0].description,
            "Noodles"
        );
    }

    #[test]
    fn test_validate_backup() {
        let (storage, backup_manager, _paths, _temp) = create_test_env();
        storage.save_all().unwrap();

        let backup_path = backup_manager.create_backup(storage.store(), None).unwrap();
        let result = RestoreManager::new().validate_backup(&backup_path).unwrap();

        assert_eq!(result.schema_version, 1);
        assert_eq!(result.categories, Some(12));
        assert!(result.is_complete());
        assert!(result.summary().starts_with("Complete backup"));
    }

    #[test]
    fn test_validation_summary_for_partial_backup() {
        let result = ValidationResult {
            schema_version: 1,
            backup_date: Utc::now(),
            reason: None,
            transactions: Some(4),
            categories: Some(12),
            budgets: None,
        };

        assert!(!result.is_complete());
        assert_eq!(
            result.summary(),
            "Partial backup (v1): 4 transactions, 12 categories, no budgets"
        );
    }

    #[test]
    fn test_invalid_backup_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("backup-20250101-000000.json");
        fs::write(&path, "not json").unwrap();

        let err = RestoreManager::new().validate_backup(&path).unwrap_err();
        assert!(matches!(err, BudgetbookError::Json(_)));
    }
}
