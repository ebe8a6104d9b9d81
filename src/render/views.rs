//! View rows for the HTML pages
//!
//! Templates only interpolate strings; every amount, percentage and fallback
//! label is settled here.

use std::collections::HashMap;
use std::fmt::Write;

use chrono::NaiveDate;

use crate::models::{BudgetScope, Category, CategoryId, Money, Transaction, TransactionType};
use crate::reports::ranking::{CHART_CIRCUMFERENCE, FALLBACK_ICON};
use crate::reports::{
    BudgetAlert, BudgetProgress, Change, ChartSlice, ComparisonReport, RankingEntry, TrendPoint,
};
use crate::theme::{Theme, ThemeChoice};

pub const UNCATEGORIZED: &str = "Uncategorized";
pub const NO_DESCRIPTION: &str = "No description";

/// "+¥35.50" for income, "-¥35.50" for expenses
pub fn signed_amount(kind: TransactionType, amount: Money, currency: &str) -> String {
    let sign = match kind {
        TransactionType::Income => '+',
        TransactionType::Expense => '-',
    };
    format!("{}{}", sign, amount.abs().format_with_symbol(currency))
}

/// Format `date` with a user-supplied strftime pattern. Patterns chrono can't
/// apply to a bare date (time fields, bad specifiers) fall back to ISO.
pub fn format_date(date: NaiveDate, pattern: &str) -> String {
    let mut out = String::new();
    if write!(out, "{}", date.format(pattern)).is_err() {
        log::warn!("Unusable date format {:?}, using %Y-%m-%d", pattern);
        out.clear();
        out.push_str(&date.format("%Y-%m-%d").to_string());
    }
    out
}

pub fn percent(value: f64) -> String {
    format!("{:.1}", value)
}

/// Empty-state placeholder shown in place of an empty list
#[derive(Debug, Clone)]
pub struct EmptyState {
    pub icon: &'static str,
    pub title: &'static str,
    pub subtitle: &'static str,
}

impl EmptyState {
    pub const fn new(icon: &'static str, title: &'static str, subtitle: &'static str) -> Self {
        Self {
            icon,
            title,
            subtitle,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NavItem {
    pub href: &'static str,
    pub label: &'static str,
    pub active: bool,
}

#[derive(Debug, Clone)]
pub struct TransactionRow {
    pub id: String,
    pub icon: String,
    pub category: String,
    pub description: String,
    pub date: String,
    pub amount: String,
    /// `income` or `expense`
    pub kind: String,
}

impl TransactionRow {
    pub fn new(
        txn: &Transaction,
        categories: &HashMap<CategoryId, Category>,
        currency: &str,
        date_format: &str,
    ) -> Self {
        let category = txn.category_id.as_ref().and_then(|id| categories.get(id));

        Self {
            id: txn.id.to_string(),
            icon: category.map_or_else(|| FALLBACK_ICON.to_string(), |c| c.icon.clone()),
            category: category.map_or_else(|| UNCATEGORIZED.to_string(), |c| c.name.clone()),
            description: if txn.description.trim().is_empty() {
                NO_DESCRIPTION.to_string()
            } else {
                txn.description.clone()
            },
            date: format_date(txn.date, date_format),
            amount: signed_amount(txn.kind, txn.amount, currency),
            kind: txn.kind.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CategoryCard {
    pub id: String,
    pub name: String,
    pub icon: String,
    pub color: String,
    pub transaction_count: usize,
}

impl CategoryCard {
    pub fn new(category: &Category, transaction_count: usize) -> Self {
        Self {
            id: category.id.to_string(),
            name: category.name.clone(),
            icon: category.icon.clone(),
            color: category.color.clone(),
            transaction_count,
        }
    }
}

#[derive(Debug, Clone)]
pub struct BudgetCard {
    pub name: String,
    pub scope: String,
    pub period: String,
    pub description: String,
    pub amount: String,
    pub spent: String,
    pub percentage: String,
    /// Bar width, already capped at 100
    pub width: String,
    /// "¥200.00 left" or "Over by ¥50.00"
    pub remaining: String,
    pub window: String,
    /// `normal`, `warning` or `over-budget`
    pub status: String,
}

impl BudgetCard {
    pub fn new(
        progress: &BudgetProgress,
        categories: &HashMap<CategoryId, Category>,
        currency: &str,
        threshold: f64,
    ) -> Self {
        let budget = &progress.budget;
        let scope = match &budget.category_id {
            BudgetScope::All => "All expenses".to_string(),
            BudgetScope::Category(id) => categories
                .get(id)
                .map_or_else(|| id.to_string(), |c| format!("{} {}", c.icon, c.name)),
        };
        let remaining = if progress.is_over_budget {
            format!("Over by {}", progress.overspent().format_with_symbol(currency))
        } else {
            format!("{} left", progress.remaining.format_with_symbol(currency))
        };

        Self {
            name: budget.name.clone(),
            scope,
            period: budget.period.label().to_string(),
            description: budget.description.clone(),
            amount: budget.amount.format_with_symbol(currency),
            spent: progress.spent.format_with_symbol(currency),
            percentage: percent(progress.percentage),
            width: percent(progress.percentage.min(100.0)),
            remaining,
            window: progress.window.to_string(),
            status: progress.status(threshold).css_class().to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AlertRow {
    pub icon: String,
    pub level: String,
    pub message: String,
}

impl AlertRow {
    pub fn new(alert: &BudgetAlert, currency: &str) -> Self {
        Self {
            icon: alert.level.icon().to_string(),
            level: alert.level.css_class().to_string(),
            message: alert.message(currency),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RankingRow {
    pub icon: String,
    pub name: String,
    pub color: String,
    pub amount: String,
    pub count: usize,
    pub percentage: String,
}

impl RankingRow {
    pub fn new(entry: &RankingEntry, currency: &str) -> Self {
        Self {
            icon: entry.icon.clone(),
            name: entry.name.clone(),
            color: entry.color.clone(),
            amount: entry.amount.format_with_symbol(currency),
            count: entry.count,
            percentage: percent(entry.percentage),
        }
    }
}

/// One `<circle>` arc of the donut chart
#[derive(Debug, Clone)]
pub struct SliceRow {
    pub label: String,
    pub color: String,
    pub amount: String,
    pub percentage: String,
    /// `stroke-dasharray` value
    pub dasharray: String,
    /// `stroke-dashoffset` value
    pub dashoffset: String,
}

impl SliceRow {
    pub fn new(slice: &ChartSlice, currency: &str) -> Self {
        Self {
            label: slice.label.clone(),
            color: slice.color.to_string(),
            amount: slice.amount.format_with_symbol(currency),
            percentage: percent(slice.percentage),
            dasharray: format!("{:.2} {:.0}", slice.arc_length, CHART_CIRCUMFERENCE),
            dashoffset: format!("{:.2}", -slice.offset),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TrendRow {
    pub label: String,
    pub income: String,
    pub expense: String,
    pub balance: String,
    /// Bar widths relative to the largest value in the series
    pub income_width: String,
    pub expense_width: String,
}

impl TrendRow {
    pub fn new(point: &TrendPoint, peak: Money, currency: &str) -> Self {
        let width = |value: Money| {
            if peak.is_positive() {
                percent(value.cents() as f64 * 100.0 / peak.cents() as f64)
            } else {
                percent(0.0)
            }
        };

        Self {
            label: point.label.clone(),
            income: point.income.format_with_symbol(currency),
            expense: point.expense.format_with_symbol(currency),
            balance: point.balance().format_with_symbol(currency),
            income_width: width(point.income),
            expense_width: width(point.expense),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ComparisonCard {
    pub title: &'static str,
    pub current: String,
    pub previous: String,
    pub change: String,
    pub icon: String,
    /// `positive`, `negative` or `neutral`
    pub class: String,
}

impl ComparisonCard {
    pub fn new(
        title: &'static str,
        current: Money,
        previous: Money,
        change: &Change,
        currency: &str,
    ) -> Self {
        Self {
            title,
            current: current.format_with_symbol(currency),
            previous: previous.format_with_symbol(currency),
            change: change.describe(currency),
            icon: change.direction.icon().to_string(),
            class: change.direction.css_class().to_string(),
        }
    }
}

/// Income, expense and balance cards for one comparison
#[derive(Debug, Clone)]
pub struct ComparisonGroup {
    pub title: String,
    pub periods: String,
    pub cards: Vec<ComparisonCard>,
}

impl ComparisonGroup {
    pub fn new(report: &ComparisonReport, currency: &str) -> Self {
        let (current, previous) = (&report.current, &report.previous);
        Self {
            title: report.kind.to_string(),
            periods: format!("{} vs {}", current.range, previous.range),
            cards: vec![
                ComparisonCard::new("Income", current.income, previous.income, &report.income, currency),
                ComparisonCard::new("Expense", current.expense, previous.expense, &report.expense, currency),
                ComparisonCard::new(
                    "Balance",
                    current.balance(),
                    previous.balance(),
                    &report.balance,
                    currency,
                ),
            ],
        }
    }
}

#[derive(Debug, Clone)]
pub struct ThemeOption {
    pub key: String,
    pub name: String,
    pub accent: String,
    pub selected: bool,
}

impl ThemeOption {
    /// Every fixed theme, then "auto"
    pub fn all(choice: ThemeChoice) -> Vec<Self> {
        let mut options: Vec<Self> = Theme::all()
            .into_iter()
            .map(|theme| Self {
                key: theme.key().to_string(),
                name: theme.display_name().to_string(),
                accent: theme.accent().to_string(),
                selected: choice == ThemeChoice::Fixed(theme),
            })
            .collect();

        options.push(Self {
            key: "auto".to_string(),
            name: "Follow system".to_string(),
            accent: "linear-gradient(135deg, #667eea 50%, #1f2937 50%)".to_string(),
            selected: choice == ThemeChoice::Auto,
        });

        options
    }
}
