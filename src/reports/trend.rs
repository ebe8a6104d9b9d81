//! Income and expense trend series
//!
//! Zero-filled monthly or daily buckets ending at the reference date.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Duration, NaiveDate};

use crate::error::BudgetbookResult;
use crate::models::{first_of_month, shift_months, Money, Transaction, TransactionType};
use crate::storage::Storage;

/// Bucket size and how many buckets to show
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrendSpan {
    Months(u32),
    Days(u32),
}

impl TrendSpan {
    pub const MONTH_CHOICES: [u32; 3] = [6, 12, 24];
    pub const DAY_CHOICES: [u32; 3] = [30, 90, 180];

    /// Build a span, accepting only the supported bucket counts
    pub fn new(unit: &str, count: u32) -> Result<Self, String> {
        match unit.trim().to_lowercase().as_str() {
            "month" | "months" | "monthly" if Self::MONTH_CHOICES.contains(&count) => {
                Ok(Self::Months(count))
            }
            "day" | "days" | "daily" if Self::DAY_CHOICES.contains(&count) => Ok(Self::Days(count)),
            "month" | "months" | "monthly" => Err(format!(
                "Monthly trend supports 6, 12 or 24 months (got {})",
                count
            )),
            "day" | "days" | "daily" => Err(format!(
                "Daily trend supports 30, 90 or 180 days (got {})",
                count
            )),
            other => Err(format!("Unknown trend unit '{}'. Use month or day", other)),
        }
    }
}

impl Default for TrendSpan {
    fn default() -> Self {
        Self::Days(30)
    }
}

impl fmt::Display for TrendSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Months(n) => write!(f, "last {} months", n),
            Self::Days(n) => write!(f, "last {} days", n),
        }
    }
}

impl FromStr for TrendSpan {
    type Err = String;

    /// `6m`, `24m`, `30d`, `180d`...
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        let split = s.char_indices().last().map_or(0, |(index, _)| index);
        let (digits, unit) = s.split_at(split);
        let count: u32 = digits
            .parse()
            .map_err(|_| format!("Invalid trend span '{}'. Use e.g. 6m or 30d", s))?;
        match unit {
            "m" => Self::new("month", count),
            "d" => Self::new("day", count),
            _ => Err(format!("Invalid trend span '{}'. Use e.g. 6m or 30d", s)),
        }
    }
}

/// One bucket of the series
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrendPoint {
    /// `YYYY-MM` for months, `YYYY-MM-DD` for days
    pub key: String,
    /// Short axis label: `Oct` or `10/18`
    pub label: String,
    pub income: Money,
    pub expense: Money,
}

impl TrendPoint {
    pub fn balance(&self) -> Money {
        self.income - self.expense
    }
}

/// An ascending, gap-free series
#[derive(Debug, Clone)]
pub struct TrendReport {
    pub span: TrendSpan,
    pub points: Vec<TrendPoint>,
}

impl TrendReport {
    pub fn generate(storage: &Storage, span: TrendSpan, today: NaiveDate) -> BudgetbookResult<Self> {
        let transactions = storage.transactions.get_all()?;
        Ok(Self::from_transactions(&transactions, span, today))
    }

    pub fn from_transactions(transactions: &[Transaction], span: TrendSpan, today: NaiveDate) -> Self {
        let buckets: Vec<(NaiveDate, TrendPoint)> = match span {
            TrendSpan::Months(n) => {
                let current = first_of_month(today);
                (0..n as i32)
                    .rev()
                    .map(|back| {
                        let month = shift_months(current, -back);
                        (
                            month,
                            TrendPoint {
                                key: month.format("%Y-%m").to_string(),
                                label: month.format("%b").to_string(),
                                income: Money::zero(),
                                expense: Money::zero(),
                            },
                        )
                    })
                    .collect()
            }
            TrendSpan::Days(n) => (0..n as i64)
                .rev()
                .map(|back| {
                    let day = today - Duration::days(back);
                    (
                        day,
                        TrendPoint {
                            key: day.format("%Y-%m-%d").to_string(),
                            label: format!("{}/{}", day.month(), day.day()),
                            income: Money::zero(),
                            expense: Money::zero(),
                        },
                    )
                })
                .collect(),
        };

        let mut by_start: BTreeMap<NaiveDate, TrendPoint> = buckets.into_iter().collect();

        for txn in transactions {
            let bucket = match span {
                TrendSpan::Months(_) => first_of_month(txn.date),
                TrendSpan::Days(_) => txn.date,
            };
            if let Some(point) = by_start.get_mut(&bucket) {
                match txn.kind {
                    TransactionType::Income => point.income += txn.amount,
                    TransactionType::Expense => point.expense += txn.amount,
                }
            }
        }

        Self {
            span,
            points: by_start.into_values().collect(),
        }
    }

    /// Largest income or expense bucket, for scaling bars
    pub fn peak(&self) -> Money {
        self.points
            .iter()
            .map(|p| p.income.max(p.expense))
            .max()
            .unwrap_or_default()
    }

    /// Format the series for terminal display
    pub fn format_terminal(&self, currency: &str) -> String {
        let mut output = String::new();

        output.push_str(&format!("Trend, {}\n", self.span));
        output.push_str(&"=".repeat(64));
        output.push('\n');
        output.push_str(&format!(
            "{:<12} {:>16} {:>16} {:>16}\n",
            "Period", "Income", "Expense", "Balance"
        ));
        output.push_str(&"-".repeat(64));
        output.push('\n');

        for point in &self.points {
            output.push_str(&format!(
                "{:<12} {:>16} {:>16} {:>16}\n",
                point.key,
                point.income.format_with_symbol(currency),
                point.expense.format_with_symbol(currency),
                point.balance().format_with_symbol(currency)
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
    fn test_monthly_buckets_cross_year() {
        let transactions = vec![
            txn(1_000, TransactionType::Expense, date(2025, 12, 5)),
            txn(5_000, TransactionType::Income, date(2026, 2, 27)),
            txn(7_000, TransactionType::Expense, date(2025, 8, 31)),
        ];

        let report = TrendReport::from_transactions(&transactions, TrendSpan::Months(6), date(2026, 2, 28));
        let keys: Vec<&str> = report.points.iter().map(|p| p.key.as_str()).collect();

        assert_eq!(
            keys,
            vec!["2025-09", "2025-10", "2025-11", "2025-12", "2026-01", "2026-02"]
        );
        assert_eq!(report.points[3].expense.cents(), 1_000);
        assert!(report.points[4].income.is_zero());
        assert_eq!(report.points[5].income.cents(), 5_000);
        assert_eq!(report.points[3].label, "Dec");
        assert_eq!(report.peak().cents(), 5_000);
    }

    #[test]
    fn test_daily_buckets_include_today() {
        let today = date(2025, 3, 2);
        let transactions = vec![
            txn(300, TransactionType::Expense, date(2025, 2, 1)),
            txn(400, TransactionType::Expense, today),
            txn(999, TransactionType::Expense, date(2025, 1, 31)),
        ];

        let report = TrendReport::from_transactions(&transactions, TrendSpan::default(), today);

        assert_eq!(report.span, TrendSpan::Days(30));
        assert_eq!(report.points.len(), 30);
        assert_eq!(report.points[0].key, "2025-02-01");
        assert_eq!(report.points[0].label, "2/1");
        assert_eq!(report.points[29].expense.cents(), 400);
        let total: i64 = report.points.iter().map(|p| p.expense.cents()).sum();
        assert_eq!(total, 700);
    }

    #[test]
    fn test_span_parsing() {
        assert_eq!("24m".parse::<TrendSpan>().unwrap(), TrendSpan::Months(24));
        assert_eq!("30D".parse::<TrendSpan>().unwrap(), TrendSpan::Days(30));
        assert_eq!("180d".parse::<TrendSpan>().unwrap(), TrendSpan::Days(180));
        assert!("3m".parse::<TrendSpan>().is_err());
        assert!("7d".parse::<TrendSpan>().is_err());
        assert!("7w".parse::<TrendSpan>().is_err());
        assert!("m".parse::<TrendSpan>().is_err());
    }
}
