//! JSON export
//!
//! The full data set as one pretty-printed document, readable by the import
//! service.

use std::io::Write;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{BudgetbookError, BudgetbookResult};
use crate::models::{Budget, Category, Transaction};
use crate::storage::Storage;

/// Document format version
pub const EXPORT_VERSION: &str = "1.0";

/// Everything the user has entered
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    pub transactions: Vec<Transaction>,
    pub categories: Vec<Category>,
    #[serde(default)]
    pub budgets: Vec<Budget>,
    pub export_date: DateTime<Utc>,
    pub version: String,
}

impl ExportDocument {
    pub fn from_storage(storage: &Storage) -> BudgetbookResult<Self> {
        Ok(Self {
            transactions: storage.transactions.get_all()?,
            categories: storage.categories.get_all()?,
            budgets: storage.budgets.get_all()?,
            export_date: Utc::now(),
            version: EXPORT_VERSION.to_string(),
        })
    }
}

/// `budgetbook_2025-10-18.json`
pub fn default_file_name(extension: &str, today: NaiveDate) -> String {
    format!("budgetbook_{}.{}", today.format("%Y-%m-%d"), extension)
}

/// Write the full data set as pretty-printed JSON
pub fn export_json<W: Write>(storage: &Storage, writer: &mut W) -> BudgetbookResult<()> {
    let document = ExportDocument::from_storage(storage)?;

    serde_json::to_writer_pretty(&mut *writer, &document)
        .map_err(|e| BudgetbookError::Export(e.to_string()))?;
    writeln!(writer).map_err(|e| BudgetbookError::Export(e.to_string()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BudgetPeriod, BudgetScope, Money, TransactionType};
    use crate::services::ImportService;

    #[test]
    fn test_document_shape() {
        let storage = Storage::in_memory().unwrap();
        storage
            .transactions
            .upsert(Transaction::new(
                Money::from_cents(3550),
                TransactionType::Expense,
                "food".into(),
                NaiveDate::from_ymd_opt(2025, 10, 1).unwrap(),
                "Lunch",
            ))
            .unwrap();
        storage
            .budgets
            .upsert(Budget::new("All", Money::from_cents(100_000), BudgetScope::All, BudgetPeriod::Monthly))
            .unwrap();

        let mut buffer = Vec::new();
        export_json(&storage, &mut buffer).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buffer).unwrap();

        assert_eq!(value["version"], "1.0");
        assert!(value["exportDate"].is_string());
        assert_eq!(value["categories"].as_array().unwrap().len(), 12);
        assert_eq!(value["transactions"][0]["amount"], 35.5);
        assert_eq!(value["transactions"][0]["type"], "expense");
        assert_eq!(value["transactions"][0]["categoryId"], "food");
        assert_eq!(value["budgets"][0]["categoryId"], "all");
        assert!(String::from_utf8(buffer).unwrap().contains("\n  \"transactions\""));
    }

    #[test]
    fn test_export_then_import_into_fresh_store() {
        let source = Storage::in_memory().unwrap();
        source
            .transactions
            .upsert(Transaction::new(
                Money::from_cents(120_000),
                TransactionType::Income,
                "salary".into(),
                NaiveDate::from_ymd_opt(2025, 10, 1).unwrap(),
                "October",
            ))
            .unwrap();

        let mut buffer = Vec::new();
        export_json(&source, &mut buffer).unwrap();

        let target = Storage::in_memory().unwrap();
        let summary = ImportService::new(&target)
            .import_json(std::str::from_utf8(&buffer).unwrap(), NaiveDate::from_ymd_opt(2025, 10, 18).unwrap())
            .unwrap();

        assert_eq!(summary.transactions.new, 1);
        assert_eq!(summary.categories.duplicate, 12);
        assert_eq!(target.transactions.get_all().unwrap()[0].description, "October");
    }

    #[test]
    fn test_default_file_name() {
        let today = NaiveDate::from_ymd_opt(2025, 1, 9).unwrap();
        assert_eq!(default_file_name("csv", today), "budgetbook_2025-01-09.csv");
    }
}
