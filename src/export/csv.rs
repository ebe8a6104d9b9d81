//! CSV export
//!
//! One row per transaction for spreadsheets. The file starts with a UTF-8
//! byte order mark so Excel picks the right encoding.

use std::collections::HashMap;
use std::io::Write;

use crate::error::{BudgetbookError, BudgetbookResult};
use crate::models::{CategoryId, Transaction};
use crate::storage::Storage;

const BOM: &[u8] = b"\xEF\xBB\xBF";

const HEADER: [&str; 5] = ["Date", "Type", "Category", "Amount", "Description"];

/// Category column text for a transaction
fn category_label(txn: &Transaction, names: &HashMap<CategoryId, String>) -> String {
    match &txn.category_id {
        None => "Uncategorized".to_string(),
        Some(id) => match names.get(id) {
            Some(name) => name.clone(),
            None => format!("Unknown category ({})", id),
        },
    }
}

/// Export all transactions to CSV, in stored order
pub fn export_transactions_csv<W: Write>(storage: &Storage, writer: &mut W) -> BudgetbookResult<()> {
    let names: HashMap<CategoryId, String> = storage
        .categories
        .get_all()?
        .into_iter()
        .map(|c| (c.id, c.name))
        .collect();

    writer
        .write_all(BOM)
        .map_err(|e| BudgetbookError::Export(e.to_string()))?;

    let mut out = csv::Writer::from_writer(writer);
    out.write_record(HEADER)?;

    for txn in storage.transactions.get_all()? {
        out.write_record([
            txn.date.format("%Y-%m-%d").to_string(),
            txn.kind.label().to_string(),
            category_label(&txn, &names),
            txn.amount.to_string(),
            txn.description.clone(),
        ])?;
    }

    out.flush()
        .map_err(|e| BudgetbookError::Export(e.to_string()))?;

    Ok(())
}
