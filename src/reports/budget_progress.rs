//! Budget progress and alerts
//!
//! How much of each budget has been spent in the period window containing
//! the reference date.

use chrono::NaiveDate;

use crate::models::{Budget, DateRange, Money, Transaction, TransactionType};

/// Spending against one budget for its current window
#[derive(Debug, Clone)]
pub struct BudgetProgress {
    pub budget: Budget,
    pub window: DateRange,
    pub spent: Money,
    /// Negative once overspent
    pub remaining: Money,
    /// Capped at 100; zero for a zero-amount budget
    pub percentage: f64,
    pub is_over_budget: bool,
    /// Expenses that count against the budget, in stored order
    pub transactions: Vec<Transaction>,
}

/// Display state of a budget card
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressStatus {
    Normal,
    Warning,
    OverBudget,
}

impl ProgressStatus {
    pub fn css_class(&self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Warning => "warning",
            Self::OverBudget => "over-budget",
        }
    }
}

impl BudgetProgress {
    pub fn calculate(budget: Budget, transactions: &[Transaction], today: NaiveDate) -> Self {
        let window = budget.period.window(today);

        let matching: Vec<Transaction> = transactions
            .iter()
            .filter(|t| {
                t.kind == TransactionType::Expense
                    && window.contains(t.date)
                    && budget.scope().covers(t.category_id.as_ref())
            })
            .cloned()
            .collect();

        let spent: Money = matching.iter().map(|t| t.amount).sum();
        let percentage = if budget.amount.is_positive() {
            (spent.cents() as f64 * 100.0 / budget.amount.cents() as f64).min(100.0)
        } else {
            0.0
        };

        Self {
            window,
            remaining: budget.amount - spent,
            is_over_budget: spent > budget.amount,
            percentage,
            spent,
            transactions: matching,
            budget,
        }
    }

    pub fn status(&self, threshold: f64) -> ProgressStatus {
        if self.is_over_budget {
            ProgressStatus::OverBudget
        } else if self.percentage >= threshold {
            ProgressStatus::Warning
        } else {
            ProgressStatus::Normal
        }
    }

    /// Amount spent past the limit, zero when within budget
    pub fn overspent(&self) -> Money {
        if self.is_over_budget {
            self.spent - self.budget.amount
        } else {
            Money::zero()
        }
    }
}

/// Severity of a budget alert
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertLevel {
    Warning,
    OverBudget,
}

impl AlertLevel {
    pub fn icon(&self) -> &'static str {
        match self {
            Self::Warning => "⚠️",
            Self::OverBudget => "🚨",
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            Self::Warning => "warning",
            Self::OverBudget => "danger",
        }
    }
}

/// A budget that is over, or close to, its limit
#[derive(Debug, Clone)]
pub struct BudgetAlert {
    pub level: AlertLevel,
    pub budget_name: String,
    pub overspent: Money,
    pub percentage: f64,
}

impl BudgetAlert {
    /// The alert for a budget, if any; `threshold` is a percentage
    pub fn for_progress(progress: &BudgetProgress, threshold: f64) -> Option<Self> {
        let level = match progress.status(threshold) {
            ProgressStatus::OverBudget => AlertLevel::OverBudget,
            ProgressStatus::Warning => AlertLevel::Warning,
            ProgressStatus::Normal => return None,
        };

        Some(Self {
            level,
            budget_name: progress.budget.name.clone(),
            overspent: progress.overspent(),
            percentage: progress.percentage,
        })
    }

    pub fn message(&self, currency: &str) -> String {
        match self.level {
            AlertLevel::OverBudget => format!(
                "Budget \"{}\" is over by {}",
                self.budget_name,
                self.overspent.format_with_symbol(currency)
            ),
            AlertLevel::Warning => format!(
                "Budget \"{}\" has used {:.1}%",
                self.budget_name, self.percentage
            ),
        }
    }
}
