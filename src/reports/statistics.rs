//! Overview statistics
//!
//! Income, expense and balance totals over a [`StatsRange`], with per-category
//! sums for each direction.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::error::BudgetbookResult;
use crate::models::{CategoryId, DateRange, Money, StatsRange, Transaction, TransactionType};
use crate::storage::Storage;

/// Totals for one selection of transactions
#[derive(Debug, Clone, Default)]
pub struct Statistics {
    /// The resolved window, `None` for all time
    pub range: Option<DateRange>,
    pub label: String,
    pub total_income: Money,
    pub total_expense: Money,
    pub transaction_count: usize,
    /// Keyed by category id; `None` collects transactions without one
    pub income_by_category: BTreeMap<Option<CategoryId>, Money>,
    pub expense_by_category: BTreeMap<Option<CategoryId>, Money>,
}

impl Statistics {
    /// Generate statistics from storage for `range` as seen on `today`
    pub fn generate(storage: &Storage, range: StatsRange, today: NaiveDate) -> BudgetbookResult<Self> {
        let transactions = storage.transactions.get_all()?;
        Ok(Self::from_transactions(&transactions, range, today))
    }

    pub fn from_transactions(transactions: &[Transaction], range: StatsRange, today: NaiveDate) -> Self {
        let window = range.resolve(today);
        let selected = transactions
            .iter()
            .filter(|t| window.map_or(true, |w| w.contains(t.date)));

        let mut stats = Self::over(selected);
        stats.range = window;
        stats.label = range.label();
        stats
    }

    /// Statistics over an inclusive date range
    pub fn for_range(transactions: &[Transaction], window: DateRange) -> Self {
        let mut stats = Self::over(transactions.iter().filter(|t| window.contains(t.date)));
        stats.range = Some(window);
        stats.label = window.to_string();
        stats
    }

    fn over<'t>(transactions: impl Iterator<Item = &'t Transaction>) -> Self {
        let mut stats = Self::default();

        for txn in transactions {
            stats.transaction_count += 1;
            let key = txn.category_id.clone();
            match txn.kind {
                TransactionType::Income => {
                    stats.total_income += txn.amount;
                    *stats.income_by_category.entry(key).or_default() += txn.amount;
                }
                TransactionType::Expense => {
                    stats.total_expense += txn.amount;
                    *stats.expense_by_category.entry(key).or_default() += txn.amount;
                }
            }
        }

        stats
    }

    /// Income minus expense
    pub fn balance(&self) -> Money {
        self.total_income - self.total_expense
    }

    pub fn by_category(&self, kind: TransactionType) -> &BTreeMap<Option<CategoryId>, Money> {
        match kind {
            TransactionType::Income => &self.income_by_category,
            TransactionType::Expense => &self.expense_by_category,
        }
    }

    /// Format the overview for terminal display
    pub fn format_terminal(&self, currency: &str) -> String {
        let mut output = String::new();

        output.push_str(&format!("Overview: {}\n", self.label));
        output.push_str(&"=".repeat(40));
        output.push('\n');
        output.push_str(&format!(
            "{:<16} {:>20}\n",
            "Income",
            self.total_income.format_with_symbol(currency)
        ));
        output.push_str(&format!(
            "{:<16} {:>20}\n",
            "Expense",
            self.total_expense.format_with_symbol(currency)
        ));
        output.push_str(&"-".repeat(40));
        output.push('\n');
        output.push_str(&format!(
            "{:<16} {:>20}\n",
            "Balance",
            self.balance().format_with_symbol(currency)
        ));
        output.push_str(&format!("{:<16} {:>20}\n", "Transactions", self.transaction_count));

        output
    }
}
