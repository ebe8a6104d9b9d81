//! CLI commands for data export
//!
//! JSON carries the full data set and can be imported again; CSV carries
//! transactions only.

use std::io::Write;
use std::path::PathBuf;

use clap::Subcommand;

use super::{create_output, today};
use crate::error::{BudgetbookError, BudgetbookResult};
use crate::export::{default_file_name, export_json, export_transactions_csv, ExportDocument};
use crate::storage::Storage;

/// Export subcommands
#[derive(Subcommand, Debug)]
pub enum ExportCommands {
    /// Export transactions, categories and budgets as JSON
    Json {
        /// Output file, "-" for stdout (default: budgetbook_YYYY-MM-DD.json)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Export transactions as CSV
    Csv {
        /// Output file, "-" for stdout (default: budgetbook_YYYY-MM-DD.csv)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show what an export would contain
    Info,
}

fn finish(mut writer: Box<dyn Write>) -> BudgetbookResult<()> {
    writer
        .flush()
        .map_err(|e| BudgetbookError::Export(format!("Failed to write export: {}", e)))
}

fn is_stdout(path: &std::path::Path) -> bool {
    path == std::path::Path::new("-")
}

/// Handle export commands
pub fn handle_export_command(storage: &Storage, cmd: ExportCommands) -> BudgetbookResult<()> {
    match cmd {
        ExportCommands::Json { output } => {
            let output = output.unwrap_or_else(|| default_file_name("json", today()).into());
            let mut writer = create_output(&output)?;
            export_json(storage, &mut writer)?;
            finish(writer)?;

            if !is_stdout(&output) {
                println!("Full data set exported to: {}", output.display());
            }
        }

        ExportCommands::Csv { output } => {
            let output = output.unwrap_or_else(|| default_file_name("csv", today()).into());
            let mut writer = create_output(&output)?;
            export_transactions_csv(storage, &mut writer)?;
            finish(writer)?;

            if !is_stdout(&output) {
                let count = storage.transactions.count()?;
                println!("Exported {} transactions to: {}", count, output.display());
            }
        }

        ExportCommands::Info => {
            let document = ExportDocument::from_storage(storage)?;

            println!("Export Information");
            println!("==================\n");
            println!("Format version: {}", document.version);
            println!();
            println!("Data Summary:");
            println!("  Transactions:  {}", document.transactions.len());
            println!("  Categories:    {}", document.categories.len());
            println!("  Budgets:       {}", document.budgets.len());

            let earliest = document.transactions.iter().map(|t| t.date).min();
            let latest = document.transactions.iter().map(|t| t.date).max();
            if let (Some(earliest), Some(latest)) = (earliest, latest) {
                println!();
                println!("Transaction Date Range:");
                println!("  Earliest: {}", earliest);
                println!("  Latest:   {}", latest);
            }

            println!("\nAvailable Export Formats:");
            println!("  json - full data set, re-importable with `budgetbook import`");
            println!("  csv  - transactions only, for spreadsheets");
        }
    }

    Ok(())
}
