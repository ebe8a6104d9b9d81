//! Transaction display formatting

use std::collections::HashMap;

use tabled::settings::Style;
use tabled::{Table, Tabled};

use super::truncate;
use crate::models::{Category, CategoryId, Transaction};
use crate::render::views::{signed_amount, UNCATEGORIZED};

#[derive(Tabled)]
struct TransactionRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Description")]
    description: String,
}

fn category_label(txn: &Transaction, categories: &HashMap<CategoryId, Category>) -> String {
    match &txn.category_id {
        Some(id) => match categories.get(id) {
            Some(c) => format!("{} {}", c.icon, c.name),
            None => format!("{} (missing)", id),
        },
        None => UNCATEGORIZED.to_string(),
    }
}

/// Format transactions as a table, newest first as given
pub fn format_transaction_list(
    transactions: &[Transaction],
    categories: &HashMap<CategoryId, Category>,
    currency: &str,
) -> String {
    if transactions.is_empty() {
        return "No transactions found.\n".to_string();
    }

    let rows = transactions.iter().map(|txn| TransactionRow {
        id: txn.id.short().to_string(),
        date: txn.date.format("%Y-%m-%d").to_string(),
        category: category_label(txn, categories),
        amount: signed_amount(txn.kind, txn.amount, currency),
        description: truncate(&txn.description, 32),
    });

    let mut table = Table::new(rows);
    table.with(Style::modern());
    format!("{}\n{} transaction(s)\n", table, transactions.len())
}

/// Format transaction details for display
pub fn format_transaction_details(
    txn: &Transaction,
    categories: &HashMap<CategoryId, Category>,
    currency: &str,
) -> String {
    let mut output = String::new();

    output.push_str(&format!("Transaction: {}\n", txn.id));
    output.push_str(&format!("Date:        {}\n", txn.date.format("%Y-%m-%d")));
    output.push_str(&format!("Type:        {}\n", txn.kind.label()));
    output.push_str(&format!(
        "Amount:      {}\n",
        signed_amount(txn.kind, txn.amount, currency)
    ));
    output.push_str(&format!("Category:    {}\n", category_label(txn, categories)));

    if !txn.description.is_empty() {
        output.push_str(&format!("Description: {}\n", txn.description));
    }

    output.push_str(&format!(
        "Created:     {}\n",
        txn.created_at.format("%Y-%m-%d %H:%M:%S")
    ));
    if txn.updated_at != txn.created_at {
        output.push_str(&format!(
            "Updated:     {}\n",
            txn.updated_at.format("%Y-%m-%d %H:%M:%S")
        ));
    }

    output
}
