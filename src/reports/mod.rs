//! Reports module for budgetbook
//!
//! Read-only views over the stored transactions: overview totals, category
//! ranking, trend series, period comparison and budget progress.

pub mod budget_progress;
pub mod comparison;
pub mod ranking;
pub mod statistics;
pub mod trend;

pub use budget_progress::{AlertLevel, BudgetAlert, BudgetProgress, ProgressStatus};
pub use comparison::{Change, ChangeDirection, ComparisonKind, ComparisonReport, PeriodStats};
pub use ranking::{CategoryRanking, ChartSlice, RankingEntry};
pub use statistics::Statistics;
pub use trend::{TrendPoint, TrendReport, TrendSpan};
