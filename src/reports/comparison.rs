//! Period comparison
//!
//! Month over month, year over year, or two arbitrary date ranges, each
//! reported as income/expense/balance changes.

use std::fmt;

use chrono::NaiveDate;

use crate::error::BudgetbookResult;
use crate::models::{shift_months, DateRange, Money, Transaction, TransactionType};
use crate::storage::Storage;

/// Totals for one compared period
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodStats {
    pub range: DateRange,
    pub income: Money,
    pub expense: Money,
    pub count: usize,
}

impl PeriodStats {
    pub fn calculate(transactions: &[Transaction], range: DateRange) -> Self {
        let mut stats = Self {
            range,
            income: Money::zero(),
            expense: Money::zero(),
            count: 0,
        };

        for txn in transactions.iter().filter(|t| range.contains(t.date)) {
            match txn.kind {
                TransactionType::Income => stats.income += txn.amount,
                TransactionType::Expense => stats.expense += txn.amount,
            }
            stats.count += 1;
        }

        stats
    }

    pub fn balance(&self) -> Money {
        self.income - self.expense
    }
}

/// Which way a metric moved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeDirection {
    Increase,
    Decrease,
    /// Previous value was zero and the current one is positive
    New,
    Unchanged,
}

impl ChangeDirection {
    /// CSS class used by the statistics page
    pub fn css_class(&self) -> &'static str {
        match self {
            Self::Increase | Self::New => "positive",
            Self::Decrease => "negative",
            Self::Unchanged => "neutral",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Self::Increase | Self::New => "📈",
            Self::Decrease => "📉",
            Self::Unchanged => "➖",
        }
    }
}

/// Change from a previous value to a current one
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Change {
    pub direction: ChangeDirection,
    /// Absolute difference
    pub difference: Money,
    /// `|difference / previous| * 100`; zero for `New` and `Unchanged`
    pub percentage: f64,
}

impl Change {
    pub fn between(current: Money, previous: Money) -> Self {
        if previous.is_zero() {
            let direction = if current.is_positive() {
                ChangeDirection::New
            } else {
                ChangeDirection::Unchanged
            };
            return Self {
                direction,
                difference: current.abs(),
                percentage: 0.0,
            };
        }

        let change = current - previous;
        // Amounts are whole cents, so under 0.01 means equal
        if change.is_zero() {
            return Self {
                direction: ChangeDirection::Unchanged,
                difference: Money::zero(),
                percentage: 0.0,
            };
        }

        Self {
            direction: if change.is_positive() {
                ChangeDirection::Increase
            } else {
                ChangeDirection::Decrease
            },
            difference: change.abs(),
            percentage: (change.cents() as f64 * 100.0 / previous.cents() as f64).abs(),
        }
    }

    /// `+¥12.00 (5.0%)`, `-¥3.50 (1.2%)`, `New` or `No change`
    pub fn describe(&self, currency: &str) -> String {
        match self.direction {
            ChangeDirection::New => "New".to_string(),
            ChangeDirection::Unchanged => "No change".to_string(),
            ChangeDirection::Increase => format!(
                "+{} ({:.1}%)",
                self.difference.format_with_symbol(currency),
                self.percentage
            ),
            ChangeDirection::Decrease => format!(
                "-{} ({:.1}%)",
                self.difference.format_with_symbol(currency),
                self.percentage
            ),
        }
    }
}

/// Which two periods are compared
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ComparisonKind {
    #[default]
    MonthOverMonth,
    YearOverYear,
    Custom { first: DateRange, second: DateRange },
}

impl fmt::Display for ComparisonKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MonthOverMonth => write!(f, "This month vs last month"),
            Self::YearOverYear => write!(f, "This month vs same month last year"),
            Self::Custom { .. } => write!(f, "Period 1 vs period 2"),
        }
    }
}

/// The current period measured against the previous one
#[derive(Debug, Clone)]
pub struct ComparisonReport {
    pub kind: ComparisonKind,
    pub current: PeriodStats,
    pub previous: PeriodStats,
    pub income: Change,
    pub expense: Change,
    pub balance: Change,
}

impl ComparisonReport {
    pub fn generate(storage: &Storage, kind: ComparisonKind, today: NaiveDate) -> BudgetbookResult<Self> {
        let transactions = storage.transactions.get_all()?;
        Ok(Self::from_transactions(&transactions, kind, today))
    }

    pub fn from_transactions(transactions: &[Transaction], kind: ComparisonKind, today: NaiveDate) -> Self {
        let (current_range, previous_range) = match kind {
            ComparisonKind::MonthOverMonth => (
                DateRange::month_of(today),
                DateRange::month_of(shift_months(today, -1)),
            ),
            ComparisonKind::YearOverYear => (
                DateRange::month_of(today),
                DateRange::month_of(shift_months(today, -12)),
            ),
            ComparisonKind::Custom { first, second } => (first, second),
        };

        let current = PeriodStats::calculate(transactions, current_range);
        let previous = PeriodStats::calculate(transactions, previous_range);

        Self {
            kind,
            income: Change::between(current.income, previous.income),
            expense: Change::between(current.expense, previous.expense),
            balance: Change::between(current.balance(), previous.balance()),
            current,
            previous,
        }
    }

    /// Format the comparison for terminal display
    pub fn format_terminal(&self, currency: &str) -> String {
        let mut output = String::new();

        output.push_str(&format!("{}\n", self.kind));
        output.push_str(&format!(
            "  {} vs {}\n",
            self.current.range, self.previous.range
        ));
        output.push_str(&"=".repeat(72));
        output.push('\n');

        let rows = [
            ("Income", self.current.income, self.previous.income, &self.income),
            ("Expense", self.current.expense, self.previous.expense, &self.expense),
            ("Balance", self.current.balance(), self.previous.balance(), &self.balance),
        ];

        for (label, current, previous, change) in rows {
            output.push_str(&format!(
                "{:<8} {:>16} vs {:>16}  {} {}\n",
                label,
                current.format_with_symbol(currency),
                previous.format_with_symbol(currency),
                change.direction.icon(),
                change.describe(currency)
            ));
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn txn(cents: i64, kind: TransactionType, when: NaiveDate) -> Transaction {
        Transaction::new(Money::from_cents(cents), kind, "food".into(), when, "")
    }

    #[test]
    fn test_change_rules() {
        let new = Change::between(Money::from_cents(500), Money::zero());
        assert_eq!(new.direction, ChangeDirection::New);

        let flat = Change::between(Money::zero(), Money::zero());
        assert_eq!(flat.direction, ChangeDirection::Unchanged);

        let same = Change::between(Money::from_cents(700), Money::from_cents(700));
        assert_eq!(same.direction, ChangeDirection::Unchanged);

        let up = Change::between(Money::from_cents(15_000), Money::from_cents(10_000));
        assert_eq!(up.direction, ChangeDirection::Increase);
        assert_eq!(up.difference.cents(), 5_000);
        assert_eq!(up.percentage, 50.0);

        let smaller_deficit = Change::between(Money::from_cents(-5_000), Money::from_cents(-10_000));
        assert_eq!(smaller_deficit.direction, ChangeDirection::Increase);
        assert_eq!(smaller_deficit.percentage, 50.0);

        let drop = Change::between(Money::from_cents(2_500), Money::from_cents(10_000));
        assert_eq!(drop.direction, ChangeDirection::Decrease);
        assert_eq!(drop.describe("$"), "-$75.00 (75.0%)");
    }

    #[test]
    fn test_month_over_month() {
        let transactions = vec![
            txn(10_000, TransactionType::Expense, date(2025, 3, 31)),
            txn(12_000, TransactionType::Expense, date(2025, 3, 1)),
            txn(20_000, TransactionType::Expense, date(2025, 2, 28)),
            txn(50_000, TransactionType::Income, date(2025, 3, 15)),
        ];

        let report = ComparisonReport::from_transactions(
            &transactions,
            ComparisonKind::MonthOverMonth,
            date(2025, 3, 31),
        );

        assert_eq!(report.previous.range, DateRange::new(date(2025, 2, 1), date(2025, 2, 28)));
        assert_eq!(report.current.expense.cents(), 22_000);
        assert_eq!(report.expense.direction, ChangeDirection::Increase);
        assert_eq!(report.income.direction, ChangeDirection::New);
        assert_eq!(report.balance.direction, ChangeDirection::Increase);
    }

    #[test]
    fn test_year_over_year_and_custom() {
        let transactions = vec![
            txn(10_000, TransactionType::Income, date(2024, 10, 3)),
            txn(10_000, TransactionType::Income, date(2025, 10, 3)),
        ];

        let yoy = ComparisonReport::from_transactions(
            &transactions,
            ComparisonKind::YearOverYear,
            date(2025, 10, 18),
        );
        assert_eq!(yoy.income.direction, ChangeDirection::Unchanged);

        let custom = ComparisonReport::from_transactions(
            &transactions,
            ComparisonKind::Custom {
                first: DateRange::new(date(2025, 1, 1), date(2025, 12, 31)),
                second: DateRange::new(date(2023, 1, 1), date(2023, 12, 31)),
            },
            date(2025, 10, 18),
        );
        assert_eq!(custom.current.count, 1);
        assert_eq!(custom.previous.count, 0);
        assert_eq!(custom.income.direction, ChangeDirection::New);
    }
}
