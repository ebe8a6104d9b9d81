//! Backup CLI commands
//!
//! Snapshots of the whole key/value store, kept under the backup directory.

use std::path::PathBuf;

use clap::Subcommand;

use crate::backup::{BackupManager, RestoreManager, ValidationResult};
use crate::config::{BudgetbookPaths, Settings};
use crate::error::{BudgetbookError, BudgetbookResult};
use crate::storage::Storage;

/// Backup subcommands
#[derive(Subcommand)]
pub enum BackupCommands {
    /// Snapshot the current data
    Create {
        /// Note stored with the backup
        #[arg(short = 'm', long, default_value = "manual")]
        reason: String,
    },
    /// List backups, newest first
    List,
    /// Show what a backup contains
    Show {
        /// File name, path or "latest"
        backup: String,
    },
    /// Replace all data with a backup
    Restore {
        /// File name, path or "latest"
        backup: String,
        /// Restore without asking
        #[arg(short, long)]
        force: bool,
    },
    /// Delete backups beyond the retention count
    Prune,
}

/// Record counts per collection; an absent collection shows as "-"
fn record_counts(validation: &ValidationResult) -> String {
    let count = |n: Option<usize>| n.map_or_else(|| "-".to_string(), |n| n.to_string());
    format!(
        "{} transactions, {} categories, {} budgets",
        count(validation.transactions),
        count(validation.categories),
        count(validation.budgets)
    )
}

/// Find a backup by "latest", a path, or a file name in the backup directory
fn resolve_backup(manager: &BackupManager, backup: &str) -> BudgetbookResult<PathBuf> {
    let found = if backup.eq_ignore_ascii_case("latest") {
        manager.get_latest_backup()?.map(|b| b.path)
    } else {
        [
            PathBuf::from(backup),
            manager.backup_dir().join(backup),
            manager.backup_dir().join(format!("{}.json", backup)),
        ]
        .into_iter()
        .find(|path| path.is_file())
    };

    found.ok_or_else(|| BudgetbookError::NotFound {
        entity_type: "Backup",
        identifier: backup.to_string(),
    })
}

/// Handle a backup command
pub fn handle_backup_command(
    storage: &Storage,
    paths: &BudgetbookPaths,
    settings: &Settings,
    cmd: BackupCommands,
) -> BudgetbookResult<()> {
    let manager = BackupManager::new(paths, settings.backup_retention.clone());
    let restore = RestoreManager::new();

    match cmd {
        BackupCommands::Create { reason } => {
            let (path, pruned) =
                manager.create_backup_with_retention(storage.store(), Some(reason.as_str()))?;
            println!("Backup created: {}", path.display());
            if !pruned.is_empty() {
                println!("Removed {} old backup(s)", pruned.len());
            }
        }

        BackupCommands::List => {
            let backups = manager.list_backups()?;
            if backups.is_empty() {
                println!("No backups found.");
                return Ok(());
            }

            for backup in &backups {
                let contents = match restore.validate_backup(&backup.path) {
                    Ok(v) => format!(
                        "{:<15} {}",
                        v.reason.as_deref().unwrap_or("-"),
                        record_counts(&v)
                    ),
                    Err(e) => {
                        log::warn!("Unreadable backup {}: {}", backup.filename, e);
                        "unreadable".to_string()
                    }
                };
                println!("  {}  {}", backup.filename, contents);
            }
            println!();
            println!("{} backup(s) in {}", backups.len(), manager.backup_dir().display());
        }

        BackupCommands::Show { backup } => {
            let path = resolve_backup(&manager, &backup)?;
            let validation = restore.validate_backup(&path)?;

            println!("{}", path.display());
            println!("Created: {}", validation.backup_date.format("%Y-%m-%d %H:%M:%S UTC"));
            println!("Reason:  {}", validation.reason.as_deref().unwrap_or("-"));
            println!("{}", validation.summary());
        }

        BackupCommands::Restore { backup, force } => {
            let path = resolve_backup(&manager, &backup)?;
            let validation = restore.validate_backup(&path)?;
            println!("{}", validation.summary());

            if !force {
                println!("Restoring replaces ALL current data. Run again with --force to proceed.");
                return Ok(());
            }

            let saved = manager.create_backup(storage.store(), Some("before restore"))?;
            println!("Current data saved to {}", saved.display());

            let result = restore.restore_from_file(&path, storage.store())?;
            storage.load_all()?;
            println!("{}", result.summary());
        }

        BackupCommands::Prune => {
            let deleted = manager.enforce_retention()?;
            println!(
                "Removed {} backup(s), keeping the newest {}",
                deleted.len(),
                settings.backup_retention.keep
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::settings::BackupRetention;
    use crate::storage::MemoryStore;
    use tempfile::TempDir;

    #[test]
    fn test_resolve_backup() {
        let temp_dir = TempDir::new().unwrap();
        let paths = BudgetbookPaths::with_base_dir(temp_dir.path().to_path_buf());
        let manager = BackupManager::new(&paths, BackupRetention { keep: 5 });

        assert!(resolve_backup(&manager, "latest").unwrap_err().is_not_found());

        let created = manager.create_backup(&MemoryStore::new(), Some("manual")).unwrap();
        let name = created.file_name().unwrap().to_string_lossy().to_string();
        let stem = name.trim_end_matches(".json");

        assert_eq!(resolve_backup(&manager, "latest").unwrap(), created);
        assert_eq!(resolve_backup(&manager, &name).unwrap(), created);
        assert_eq!(resolve_backup(&manager, stem).unwrap(), created);
        assert!(resolve_backup(&manager, "backup-nope").is_err());
    }

    #[test]
    fn test_record_counts_marks_missing_collections() {
        let temp_dir = TempDir::new().unwrap();
        let paths = BudgetbookPaths::with_base_dir(temp_dir.path().to_path_buf());
        let manager = BackupManager::new(&paths, BackupRetention::default());

        let store = MemoryStore::new();
        crate::storage::kv::save_array(&store, crate::storage::kv::TRANSACTIONS_KEY, &[1, 2])
            .unwrap();
        let path = manager.create_backup(&store, None).unwrap();

        let validation = RestoreManager::new().validate_backup(&path).unwrap();
        assert_eq!(record_counts(&validation), "2 transactions, - categories, - budgets");
    }
}
