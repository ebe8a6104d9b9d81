//! Date ranges and budget periods
//!
//! All ranges are inclusive calendar-date ranges. Weeks start on Sunday.

use chrono::{Datelike, Duration, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// An inclusive range of calendar dates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// A single day
    pub fn day(date: NaiveDate) -> Self {
        Self::new(date, date)
    }

    /// The calendar month containing `date`
    pub fn month_of(date: NaiveDate) -> Self {
        let first = first_of_month(date);
        let last = first
            .checked_add_months(Months::new(1))
            .and_then(|d| d.pred_opt())
            .unwrap_or(date);
        Self::new(first, last)
    }

    /// The Sunday-to-Saturday week containing `date`
    pub fn week_of(date: NaiveDate) -> Self {
        let start = date - Duration::days(date.weekday().num_days_from_sunday() as i64);
        Self::new(start, start + Duration::days(6))
    }

    /// January 1st through December 31st of the year containing `date`
    pub fn year_of(date: NaiveDate) -> Self {
        let first = NaiveDate::from_ymd_opt(date.year(), 1, 1).unwrap_or(date);
        let last = NaiveDate::from_ymd_opt(date.year(), 12, 31).unwrap_or(date);
        Self::new(first, last)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Number of days covered
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start == self.end {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{} to {}", self.start, self.end)
        }
    }
}

/// First day of the month containing `date`
pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Shift a date by whole months, clamping the day to the target month
pub fn shift_months(date: NaiveDate, months: i32) -> NaiveDate {
    let shifted = if months >= 0 {
        date.checked_add_months(Months::new(months as u32))
    } else {
        date.checked_sub_months(Months::new(months.unsigned_abs()))
    };
    shifted.unwrap_or(date)
}

/// How often a budget resets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BudgetPeriod {
    Weekly,
    #[default]
    Monthly,
    Yearly,
}

impl BudgetPeriod {
    /// The window of the current period relative to `today`
    pub fn window(&self, today: NaiveDate) -> DateRange {
        match self {
            Self::Weekly => DateRange::week_of(today),
            Self::Monthly => DateRange::month_of(today),
            Self::Yearly => DateRange::year_of(today),
        }
    }

    /// Label used in budget cards
    pub fn label(&self) -> &'static str {
        match self {
            Self::Weekly => "This week",
            Self::Monthly => "This month",
            Self::Yearly => "This year",
        }
    }

    pub fn all() -> [BudgetPeriod; 3] {
        [Self::Weekly, Self::Monthly, Self::Yearly]
    }
}

impl fmt::Display for BudgetPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Weekly => write!(f, "weekly"),
            Self::Monthly => write!(f, "monthly"),
            Self::Yearly => write!(f, "yearly"),
        }
    }
}

impl FromStr for BudgetPeriod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "weekly" | "week" => Ok(Self::Weekly),
            "monthly" | "month" => Ok(Self::Monthly),
            "yearly" | "year" | "annual" => Ok(Self::Yearly),
            other => Err(format!(
                "Unknown budget period '{}'. Use weekly, monthly or yearly",
                other
            )),
        }
    }
}

/// Which transactions a statistics query covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatsRange {
    Today,
    #[default]
    Month,
    Year,
    All,
    /// Inclusive range; selects nothing unless both bounds are given
    Custom {
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    },
}

impl StatsRange {
    /// Build a range from a CLI-style name plus optional custom bounds
    pub fn from_parts(
        name: &str,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Self, String> {
        match name.trim().to_lowercase().as_str() {
            "today" => Ok(Self::Today),
            "month" => Ok(Self::Month),
            "year" => Ok(Self::Year),
            "all" => Ok(Self::All),
            "custom" => Ok(Self::Custom { start, end }),
            other => Err(format!(
                "Unknown range '{}'. Use today, month, year, all or custom",
                other
            )),
        }
    }

    /// The concrete window for this selection, `None` meaning unbounded
    ///
    /// `Month` and `Year` start on the first day and stay open at the end, so
    /// future-dated entries count. An incomplete custom range resolves to an
    /// empty window.
    pub fn resolve(&self, today: NaiveDate) -> Option<DateRange> {
        match self {
            Self::Today => Some(DateRange::day(today)),
            Self::Month => Some(DateRange::new(DateRange::month_of(today).start, NaiveDate::MAX)),
            Self::Year => Some(DateRange::new(DateRange::year_of(today).start, NaiveDate::MAX)),
            Self::All => None,
            Self::Custom {
                start: Some(start),
                end: Some(end),
            } => Some(DateRange::new(*start, *end)),
            Self::Custom { .. } => Some(DateRange::new(
                NaiveDate::MAX,
                NaiveDate::MIN,
            )),
        }
    }

    pub fn contains(&self, date: NaiveDate, today: NaiveDate) -> bool {
        self.resolve(today).map_or(true, |range| range.contains(date))
    }

    pub fn label(&self) -> String {
        match self {
            Self::Today => "Today".into(),
            Self::Month => "This month".into(),
            Self::Year => "This year".into(),
            Self::All => "All time".into(),
            Self::Custom {
                start: Some(start),
                end: Some(end),
            } => format!("{} to {}", start, end),
            Self::Custom { .. } => "Custom (incomplete)".into(),
        }
    }
}

/// Parse a `YYYY-MM-DD` date
pub fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| format!("Invalid date '{}'. Use YYYY-MM-DD", s.trim()))
}
