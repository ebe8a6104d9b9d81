//! Data maintenance CLI commands

use clap::Subcommand;

use crate::backup::BackupManager;
use crate::config::{BudgetbookPaths, Settings};
use crate::error::BudgetbookResult;
use crate::services::MaintenanceService;
use crate::storage::Storage;

/// Data subcommands
#[derive(Subcommand)]
pub enum DataCommands {
    /// Check for transactions and budgets pointing at missing categories
    Diagnose {
        /// List every affected record
        #[arg(short, long)]
        verbose: bool,
    },

    /// Delete all transactions, categories and budgets
    ///
    /// Default categories are recreated and the theme is kept. A backup is
    /// written first.
    Clear {
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
}

/// Handle a data command
pub fn handle_data_command(
    storage: &Storage,
    paths: &BudgetbookPaths,
    settings: &Settings,
    cmd: DataCommands,
) -> BudgetbookResult<()> {
    let service = MaintenanceService::new(storage);

    match cmd {
        DataCommands::Diagnose { verbose } => {
            let diagnosis = service.diagnose()?;

            println!("Data Diagnosis");
            println!("==============");
            print!("{}", diagnosis.format_terminal());

            if verbose {
                for txn in &diagnosis.orphaned_transactions {
                    println!(
                        "  transaction {} {} {} ({})",
                        txn.id.short(),
                        txn.date,
                        txn.amount,
                        txn.category_id.as_ref().map_or("none", |id| id.as_str())
                    );
                }
                for budget in &diagnosis.orphaned_budgets {
                    println!("  budget {} {}", budget.id.short(), budget.name);
                }
            }
        }

        DataCommands::Clear { yes } => {
            if !yes {
                println!("WARNING: This deletes ALL transactions, categories and budgets!");
                println!("To proceed, run again with --yes:");
                println!("  budgetbook data clear --yes");
                return Ok(());
            }

            let manager = BackupManager::new(paths, settings.backup_retention.clone());
            let (backup, _) =
                manager.create_backup_with_retention(storage.store(), Some("before clear"))?;
            println!("Backup saved: {}", backup.display());

            service.clear_all()?;
            println!("All data cleared. Default categories have been restored.");
        }
    }

    Ok(())
}
