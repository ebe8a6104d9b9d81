//! Budget display formatting

use std::collections::HashMap;

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::models::{BudgetScope, Category, CategoryId};
use crate::reports::BudgetProgress;

#[derive(Tabled)]
struct BudgetRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Scope")]
    scope: String,
    #[tabled(rename = "Period")]
    period: &'static str,
    #[tabled(rename = "Budget")]
    amount: String,
    #[tabled(rename = "Spent")]
    spent: String,
    #[tabled(rename = "Used")]
    used: String,
    #[tabled(rename = "Status")]
    status: String,
}

fn scope_label(scope: &BudgetScope, categories: &HashMap<CategoryId, Category>) -> String {
    match scope {
        BudgetScope::All => "All expenses".to_string(),
        BudgetScope::Category(id) => categories
            .get(id)
            .map_or_else(|| format!("{} (missing)", id), |c| c.name.clone()),
    }
}

fn status_label(progress: &BudgetProgress, currency: &str, threshold: f64) -> String {
    if progress.is_over_budget {
        format!("🚨 over by {}", progress.overspent().format_with_symbol(currency))
    } else if progress.percentage >= threshold {
        format!("⚠️ {} left", progress.remaining.format_with_symbol(currency))
    } else {
        format!("{} left", progress.remaining.format_with_symbol(currency))
    }
}

/// Format budgets with their current-window progress as a table
pub fn format_budget_list(
    progress: &[BudgetProgress],
    categories: &HashMap<CategoryId, Category>,
    currency: &str,
    threshold: f64,
) -> String {
    if progress.is_empty() {
        return "No budgets found.\n".to_string();
    }

    let rows = progress.iter().map(|p| BudgetRow {
        id: p.budget.id.short().to_string(),
        name: p.budget.name.clone(),
        scope: scope_label(&p.budget.category_id, categories),
        period: p.budget.period.label(),
        amount: p.budget.amount.format_with_symbol(currency),
        spent: p.spent.format_with_symbol(currency),
        used: format!("{:.1}%", p.percentage),
        status: status_label(p, currency, threshold),
    });

    let mut table = Table::new(rows);
    table.with(Style::modern());
    format!("{}\n", table)
}

/// Format one budget with the transactions counted against it
pub fn format_budget_details(
    progress: &BudgetProgress,
    categories: &HashMap<CategoryId, Category>,
    currency: &str,
    threshold: f64,
) -> String {
    let budget = &progress.budget;
    let mut output = String::new();

    output.push_str(&format!("Budget:    {}\n", budget.name));
    output.push_str(&format!("ID:        {}\n", budget.id));
    output.push_str(&format!("Scope:     {}\n", scope_label(&budget.category_id, categories)));
    output.push_str(&format!("Period:    {} ({})\n", budget.period.label(), progress.window));
    output.push_str(&format!("Amount:    {}\n", budget.amount.format_with_symbol(currency)));
    output.push_str(&format!(
        "Spent:     {} ({:.1}%)\n",
        progress.spent.format_with_symbol(currency),
        progress.percentage
    ));
    output.push_str(&format!("Status:    {}\n", status_label(progress, currency, threshold)));

    if !budget.description.is_empty() {
        output.push_str(&format!("Notes:     {}\n", budget.description));
    }

    if !progress.transactions.is_empty() {
        output.push_str("\nCounted transactions:\n");
        for txn in &progress.transactions {
            output.push_str(&format!(
                "  {} {:>14} {}\n",
                txn.date.format("%Y-%m-%d"),
                txn.amount.format_with_symbol(currency),
                txn.description
            ));
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Budget, BudgetPeriod, Money, Transaction, TransactionType};
    use chrono::NaiveDate;

    fn progress(spent_cents: i64) -> BudgetProgress {
        let today = NaiveDate::from_ymd_opt(2025, 10, 18).unwrap();
        let budget = Budget::new(
            "Groceries",
            Money::from_cents(10_000),
            BudgetScope::All,
            BudgetPeriod::Monthly,
        );
        let txn = Transaction::new(
            Money::from_cents(spent_cents),
            TransactionType::Expense,
            "food".into(),
            today,
            "Market",
        );
        BudgetProgress::calculate(budget, &[txn], today)
    }

    #[test]
    fn test_list_status() {
        let output = format_budget_list(&[progress(12_000)], &HashMap::new(), "¥", 80.0);
        assert!(output.contains("All expenses"));
        assert!(output.contains("over by ¥20.00"));
        assert!(output.contains("100.0%"));
    }

    #[test]
    fn test_details_lists_transactions() {
        let output = format_budget_details(&progress(4_000), &HashMap::new(), "¥", 80.0);
        assert!(output.contains("Spent:     ¥40.00 (40.0%)"));
        assert!(output.contains("Market"));
        assert!(output.contains("¥60.00 left"));
    }
}
