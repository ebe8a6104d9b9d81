//! CLI command handlers
//!
//! This module contains the implementation of CLI commands, bridging the clap
//! argument parsing with the service layer. Handlers print their results and
//! return errors for `main` to report.

pub mod audit;
pub mod backup;
pub mod budget;
pub mod category;
pub mod data;
pub mod export;
pub mod import;
pub mod render;
pub mod stats;
pub mod theme;
pub mod transaction;

use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use chrono::{Local, NaiveDate};

use crate::error::{BudgetbookError, BudgetbookResult};
use crate::models::{parse_date, Category, CategoryId, Money};
use crate::storage::Storage;

pub use audit::handle_audit_command;
pub use backup::{handle_backup_command, BackupCommands};
pub use budget::{handle_budget_command, BudgetCommands};
pub use category::{handle_category_command, CategoryCommands};
pub use data::{handle_data_command, DataCommands};
pub use export::{handle_export_command, ExportCommands};
pub use import::handle_import_command;
pub use render::{handle_render_command, RenderArgs};
pub use stats::{handle_stats_command, StatsCommands};
pub use theme::{handle_theme_command, ThemeCommands};
pub use transaction::{handle_transaction_command, TransactionCommands};

/// The reference date for windows and defaults
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Parse a user-entered amount such as "35.5" or "1,200"
pub(crate) fn parse_amount(input: &str) -> BudgetbookResult<Money> {
    Money::parse(input).map_err(|e| {
        BudgetbookError::Validation(format!(
            "Invalid amount '{}'. Use a number like 35.50. ({})",
            input, e
        ))
    })
}

pub(crate) fn parse_date_arg(input: &str) -> BudgetbookResult<NaiveDate> {
    parse_date(input).map_err(BudgetbookError::Validation)
}

pub(crate) fn parse_optional_date(input: Option<&str>) -> BudgetbookResult<Option<NaiveDate>> {
    input.map(parse_date_arg).transpose()
}

/// All categories keyed by id, for labelling rows
pub(crate) fn category_map(storage: &Storage) -> BudgetbookResult<HashMap<CategoryId, Category>> {
    Ok(storage
        .categories
        .get_all()?
        .into_iter()
        .map(|c| (c.id.clone(), c))
        .collect())
}

/// Open `path` for writing, or stdout for `-`
pub(crate) fn create_output(path: &Path) -> BudgetbookResult<Box<dyn Write>> {
    if path == Path::new("-") {
        return Ok(Box::new(io::stdout().lock()));
    }

    let file = File::create(path).map_err(|e| {
        BudgetbookError::Export(format!("Failed to create file {}: {}", path.display(), e))
    })?;
    Ok(Box::new(BufWriter::new(file)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_amount_errors_are_validation() {
        assert_eq!(parse_amount("35.5").unwrap(), Money::from_cents(3550));
        assert!(parse_amount("abc").unwrap_err().is_validation());
    }

    #[test]
    fn test_parse_optional_date() {
        assert!(parse_optional_date(None).unwrap().is_none());
        assert!(parse_optional_date(Some("2025-02-30")).unwrap_err().is_validation());
    }
}
