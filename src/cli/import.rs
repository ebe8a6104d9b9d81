//! CLI command handler for JSON import
//!
//! Merges a previously exported document into the current data set.
//! Records that already exist are skipped; a backup is taken before
//! anything is written.

use std::fs;
use std::path::Path;

use super::today;
use crate::backup::BackupManager;
use crate::config::{BudgetbookPaths, Settings};
use crate::error::{BudgetbookError, BudgetbookResult};
use crate::services::ImportService;
use crate::storage::Storage;

/// Handle the import command
pub fn handle_import_command(
    storage: &Storage,
    paths: &BudgetbookPaths,
    settings: &Settings,
    file: &Path,
    dry_run: bool,
) -> BudgetbookResult<()> {
    if !file.exists() {
        return Err(BudgetbookError::Import(format!(
            "File not found: {}",
            file.display()
        )));
    }

    let content = fs::read_to_string(file)
        .map_err(|e| BudgetbookError::Import(format!("Failed to read file: {}", e)))?;

    let service = ImportService::new(storage);
    let plan = service.analyze(&content, today())?;

    println!("Import Preview for {}", file.display());
    println!("{}", "=".repeat(40));
    print!("{}", plan.summary.format_terminal());
    println!();

    if dry_run {
        println!("Dry run: nothing was written.");
        return Ok(());
    }

    let summary = plan.summary;
    if summary.transactions.new == 0 && summary.categories.new == 0 && summary.budgets.new == 0 {
        println!("Nothing new to import.");
        return Ok(());
    }

    let manager = BackupManager::new(paths, settings.backup_retention.clone());
    let (backup, _) = manager.create_backup_with_retention(storage.store(), Some("before import"))?;
    log::info!("Pre-import backup written to {}", backup.display());

    service.apply(plan)?;

    println!("Import Complete!");
    println!("  Imported:    {} transaction(s)", summary.transactions.new);
    println!("  Skipped:     {} duplicate(s)", summary.transactions.duplicate);
    if summary.transactions.invalid > 0 {
        println!("  Invalid:     {} row(s)", summary.transactions.invalid);
    }

    Ok(())
}
