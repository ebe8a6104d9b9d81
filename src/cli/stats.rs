//! Statistics CLI commands
//!
//! Overview totals, category ranking, trend series and period comparison.

use clap::{Args, Subcommand};

use super::{parse_date_arg, parse_optional_date, today};
use crate::config::Settings;
use crate::error::{BudgetbookError, BudgetbookResult};
use crate::models::{DateRange, StatsRange, TransactionType};
use crate::reports::{CategoryRanking, ComparisonKind, ComparisonReport, Statistics, TrendReport, TrendSpan};
use crate::storage::Storage;

/// Date range selection shared by statistics and rendering
#[derive(Args, Debug, Clone)]
pub struct RangeArgs {
    /// today, month, year, all or custom
    #[arg(short, long, default_value = "month")]
    pub range: String,
    /// Start date (YYYY-MM-DD), inclusive; bounds a custom range and the rendered transactions page
    #[arg(long)]
    pub from: Option<String>,
    /// End date (YYYY-MM-DD), inclusive; bounds a custom range and the rendered transactions page
    #[arg(long)]
    pub to: Option<String>,
}

impl RangeArgs {
    pub fn to_range(&self) -> BudgetbookResult<StatsRange> {
        StatsRange::from_parts(
            &self.range,
            parse_optional_date(self.from.as_deref())?,
            parse_optional_date(self.to.as_deref())?,
        )
        .map_err(BudgetbookError::Validation)
    }
}

/// Comparison selection shared by statistics and rendering
#[derive(Args, Debug, Clone)]
pub struct CompareArgs {
    /// mom (month over month), yoy (year over year) or custom
    #[arg(long, default_value = "mom")]
    pub mode: String,
    /// Custom comparison: period 1 as START END
    #[arg(long, num_args = 2, value_names = ["START", "END"])]
    pub first: Option<Vec<String>>,
    /// Custom comparison: period 2 as START END
    #[arg(long, num_args = 2, value_names = ["START", "END"])]
    pub second: Option<Vec<String>>,
}

fn parse_period_pair(values: Option<&Vec<String>>, flag: &str) -> BudgetbookResult<DateRange> {
    match values.map(|v| v.as_slice()) {
        Some([start, end]) => Ok(DateRange::new(parse_date_arg(start)?, parse_date_arg(end)?)),
        _ => Err(BudgetbookError::Validation(format!(
            "Custom comparison needs --{} START END",
            flag
        ))),
    }
}

impl CompareArgs {
    pub fn to_kind(&self) -> BudgetbookResult<ComparisonKind> {
        match self.mode.trim().to_lowercase().as_str() {
            "mom" | "month" => Ok(ComparisonKind::MonthOverMonth),
            "yoy" | "year" => Ok(ComparisonKind::YearOverYear),
            "custom" => Ok(ComparisonKind::Custom {
                first: parse_period_pair(self.first.as_ref(), "first")?,
                second: parse_period_pair(self.second.as_ref(), "second")?,
            }),
            other => Err(BudgetbookError::Validation(format!(
                "Unknown comparison '{}'. Use mom, yoy or custom",
                other
            ))),
        }
    }
}

/// Statistics subcommands
#[derive(Subcommand)]
pub enum StatsCommands {
    /// Income, expense and balance for a range
    Overview {
        #[command(flatten)]
        range: RangeArgs,
    },

    /// Categories ranked by amount
    Ranking {
        /// income or expense
        #[arg(short = 't', long = "type", default_value = "expense")]
        kind: String,
        #[command(flatten)]
        range: RangeArgs,
    },

    /// Income and expense per month or day
    Trend {
        /// 6m, 12m, 24m, 30d, 90d or 180d
        #[arg(short, long, default_value = "30d")]
        span: String,
    },

    /// Compare two periods
    Compare {
        #[command(flatten)]
        compare: CompareArgs,
    },
}

/// Handle a statistics command
pub fn handle_stats_command(
    storage: &Storage,
    settings: &Settings,
    cmd: StatsCommands,
) -> BudgetbookResult<()> {
    let currency = settings.currency_symbol.as_str();
    let today = today();

    match cmd {
        StatsCommands::Overview { range } => {
            let stats = Statistics::generate(storage, range.to_range()?, today)?;
            print!("{}", stats.format_terminal(currency));
        }

        StatsCommands::Ranking { kind, range } => {
            let kind: TransactionType = kind.parse().map_err(BudgetbookError::Validation)?;
            let range = range.to_range()?;
            let ranking = CategoryRanking::generate(storage, kind, range, today)?;
            println!("{}", range.label());
            print!("{}", ranking.format_terminal(currency));
        }

        StatsCommands::Trend { span } => {
            let span: TrendSpan = span.parse().map_err(BudgetbookError::Validation)?;
            let trend = TrendReport::generate(storage, span, today)?;
            print!("{}", trend.format_terminal(currency));
        }

        StatsCommands::Compare { compare } => {
            let report = ComparisonReport::generate(storage, compare.to_kind()?, today)?;
            print!("{}", report.format_terminal(currency));
        }
    }

    Ok(())
}
