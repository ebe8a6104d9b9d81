//! Category ranking
//!
//! Per-category totals for one transaction type, largest first, and the
//! donut chart slices derived from them.

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::error::BudgetbookResult;
use crate::models::{Category, CategoryId, Money, StatsRange, Transaction, TransactionType};
use crate::storage::Storage;

/// Icon for ids that resolve to no category
pub const FALLBACK_ICON: &str = "📊";

/// Color for ids that resolve to no category
pub const FALLBACK_COLOR: &str = "#999999";

/// Slices shown in the donut chart
pub const CHART_SLICES: usize = 8;

/// Circumference of the donut ring (2 * pi * 80, rounded)
pub const CHART_CIRCUMFERENCE: f64 = 502.0;

/// Slice colors, assigned by rank
pub const CHART_PALETTE: [&str; 12] = [
    "#4CAF50", "#2196F3", "#FF9800", "#E91E63", "#9C27B0", "#00BCD4", "#CDDC39", "#FF5722",
    "#607D8B", "#795548", "#FFC107", "#3F51B5",
];

/// One ranked category
#[derive(Debug, Clone)]
pub struct RankingEntry {
    pub category_id: Option<CategoryId>,
    pub name: String,
    pub icon: String,
    pub color: String,
    pub amount: Money,
    pub count: usize,
    /// Share of the total for this type, 0-100
    pub percentage: f64,
}

/// One arc of the donut chart
#[derive(Debug, Clone)]
pub struct ChartSlice {
    pub label: String,
    pub color: &'static str,
    pub amount: Money,
    pub percentage: f64,
    pub arc_length: f64,
    /// Distance along the ring where this arc starts
    pub offset: f64,
}

/// Categories of one type ranked by amount
#[derive(Debug, Clone)]
pub struct CategoryRanking {
    pub kind: TransactionType,
    pub total: Money,
    pub entries: Vec<RankingEntry>,
}

impl CategoryRanking {
    /// Generate the ranking from storage for `range` as seen on `today`
    pub fn generate(
        storage: &Storage,
        kind: TransactionType,
        range: StatsRange,
        today: NaiveDate,
    ) -> BudgetbookResult<Self> {
        let transactions = storage.transactions.get_all()?;
        let categories = storage.categories.get_all()?;
        let window = range.resolve(today);

        let selected: Vec<Transaction> = transactions
            .into_iter()
            .filter(|t| window.map_or(true, |w| w.contains(t.date)))
            .collect();

        Ok(Self::from_transactions(&selected, &categories, kind))
    }

    pub fn from_transactions(
        transactions: &[Transaction],
        categories: &[Category],
        kind: TransactionType,
    ) -> Self {
        let lookup: HashMap<&CategoryId, &Category> =
            categories.iter().map(|c| (&c.id, c)).collect();

        let mut sums: HashMap<Option<CategoryId>, (Money, usize)> = HashMap::new();
        for txn in transactions.iter().filter(|t| t.kind == kind) {
            let entry = sums.entry(txn.category_id.clone()).or_default();
            entry.0 += txn.amount;
            entry.1 += 1;
        }

        let total: Money = sums.values().map(|(amount, _)| *amount).sum();

        let mut entries: Vec<RankingEntry> = sums
            .into_iter()
            .map(|(category_id, (amount, count))| {
                let category = category_id.as_ref().and_then(|id| lookup.get(id));
                let (name, icon, color) = match (category, &category_id) {
                    (Some(c), _) => (c.name.clone(), c.icon.clone(), c.color.clone()),
                    (None, Some(id)) => (id.to_string(), FALLBACK_ICON.into(), FALLBACK_COLOR.into()),
                    (None, None) => ("Uncategorized".into(), FALLBACK_ICON.into(), FALLBACK_COLOR.into()),
                };

                RankingEntry {
                    category_id,
                    name,
                    icon,
                    color,
                    amount,
                    count,
                    percentage: percentage_of(amount, total),
                }
            })
            .collect();

        // Largest first; names keep equal amounts in a stable order
        entries.sort_by(|a, b| b.amount.cmp(&a.amount).then_with(|| a.name.cmp(&b.name)));

        Self { kind, total, entries }
    }

    pub fn is_empty(&self) -> bool {
        self.total.is_zero()
    }

    /// Arcs for the top entries, laid end to end around the ring
    pub fn chart_slices(&self) -> Vec<ChartSlice> {
        if self.is_empty() {
            return Vec::new();
        }

        let mut offset = 0.0;
        self.entries
            .iter()
            .take(CHART_SLICES)
            .enumerate()
            .map(|(index, entry)| {
                let arc_length = entry.percentage / 100.0 * CHART_CIRCUMFERENCE;
                let slice = ChartSlice {
                    label: format!("{} {}", entry.icon, entry.name),
                    color: CHART_PALETTE[index % CHART_PALETTE.len()],
                    amount: entry.amount,
                    percentage: entry.percentage,
                    arc_length,
                    offset,
                };
                offset += arc_length;
                slice
            })
            .collect()
    }

    /// Format the ranking for terminal display
    pub fn format_terminal(&self, currency: &str) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "{} by category (total {})\n",
            self.kind.label(),
            self.total.format_with_symbol(currency)
        ));
        output.push_str(&"=".repeat(60));
        output.push('\n');

        if self.entries.is_empty() {
            output.push_str("No data for this range.\n");
            return output;
        }

        for (rank, entry) in self.entries.iter().enumerate() {
            output.push_str(&format!(
                "{:>2}. {} {:<22} {:>16} {:>4} {:>6.1}%\n",
                rank + 1,
                entry.icon,
                entry.name,
                entry.amount.format_with_symbol(currency),
                entry.count,
                entry.percentage
            ));
        }

        output
    }
}

fn percentage_of(part: Money, total: Money) -> f64 {
    if total.is_zero() {
        0.0
    } else {
        part.cents() as f64 * 100.0 / total.cents() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::default_categories;

    fn txn(cents: i64, kind: TransactionType, category: &str) -> Transaction {
        Transaction::new(
            Money::from_cents(cents),
            kind,
            category.into(),
            NaiveDate::from_ymd_opt(2025, 10, 5).unwrap(),
            "",
        )
    }

    #[test]
    fn test_sorted_with_percentages() {
        let transactions = vec![
            txn(2_500, TransactionType::Expense, "food"),
            txn(2_500, TransactionType::Expense, "food"),
            txn(15_000, TransactionType::Expense, "housing"),
            txn(99_999, TransactionType::Income, "salary"),
        ];

        let ranking = CategoryRanking::from_transactions(
            &transactions,
            &default_categories(),
            TransactionType::Expense,
        );

        assert_eq!(ranking.total.cents(), 20_000);
        assert_eq!(ranking.entries.len(), 2);
        assert_eq!(ranking.entries[0].name, "Housing");
        assert_eq!(ranking.entries[0].percentage, 75.0);
        assert_eq!(ranking.entries[1].count, 2);
        assert_eq!(ranking.entries[1].icon, "🍽️");
    }

    #[test]
    fn test_unknown_category_fallback() {
        let transactions = vec![txn(1_000, TransactionType::Expense, "gone")];
        let ranking = CategoryRanking::from_transactions(
            &transactions,
            &default_categories(),
            TransactionType::Expense,
        );

        let entry = &ranking.entries[0];
        assert_eq!(entry.name, "gone");
        assert_eq!(entry.icon, FALLBACK_ICON);
        assert_eq!(entry.color, FALLBACK_COLOR);
    }

    #[test]
    fn test_chart_slices_top_eight() {
        let ids = [
            "food", "transport", "shopping", "entertainment", "healthcare", "education",
            "housing", "other_expense", "x1", "x2",
        ];
        let transactions: Vec<Transaction> = ids
            .iter()
            .enumerate()
            .map(|(i, id)| txn(1_000 * (i as i64 + 1), TransactionType::Expense, id))
            .collect();

        let ranking = CategoryRanking::from_transactions(
            &transactions,
            &default_categories(),
            TransactionType::Expense,
        );
        let slices = ranking.chart_slices();

        assert_eq!(slices.len(), 8);
        assert_eq!(slices[0].color, "#4CAF50");
        assert_eq!(slices[0].offset, 0.0);
        assert!((slices[1].offset - slices[0].arc_length).abs() < 1e-9);
        let covered: f64 = slices.iter().map(|s| s.arc_length).sum();
        assert!(covered < CHART_CIRCUMFERENCE);
    }

    #[test]
    fn test_empty_ranking() {
        let ranking = CategoryRanking::from_transactions(&[], &default_categories(), TransactionType::Income);
        assert!(ranking.is_empty());
        assert!(ranking.chart_slices().is_empty());
        assert!(ranking.format_terminal("¥").contains("No data"));
    }
}
