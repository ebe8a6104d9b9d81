//! Static HTML pages
//!
//! Each page is a complete document rendered with askama. The active theme
//! is set through the `data-theme` attribute on `<html>`, and the stylesheet
//! in `base.html` maps it to CSS custom properties. User text is escaped by
//! the template engine.

pub mod pages;
pub mod views;

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use askama::Template;
use chrono::NaiveDate;

use crate::config::Settings;
use crate::error::{BudgetbookError, BudgetbookResult};
use crate::models::StatsRange;
use crate::reports::{ComparisonKind, TrendSpan};
use crate::services::TransactionFilter;
use crate::storage::Storage;
use crate::theme::{Theme, ThemeChoice};

/// The pages that can be rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Dashboard,
    Transactions,
    Categories,
    Budgets,
    Statistics,
    Settings,
}

impl Page {
    pub fn all() -> [Page; 6] {
        [
            Self::Dashboard,
            Self::Transactions,
            Self::Categories,
            Self::Budgets,
            Self::Statistics,
            Self::Settings,
        ]
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Dashboard => "Dashboard",
            Self::Transactions => "Transactions",
            Self::Categories => "Categories",
            Self::Budgets => "Budgets",
            Self::Statistics => "Statistics",
            Self::Settings => "Settings",
        }
    }

    /// File name used when writing every page into one directory
    pub fn file_name(&self) -> &'static str {
        match self {
            Self::Dashboard => "index.html",
            Self::Transactions => "transactions.html",
            Self::Categories => "categories.html",
            Self::Budgets => "budgets.html",
            Self::Statistics => "statistics.html",
            Self::Settings => "settings.html",
        }
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.title().to_lowercase())
    }
}

impl FromStr for Page {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "dashboard" | "home" | "index" => Ok(Self::Dashboard),
            "transactions" => Ok(Self::Transactions),
            "categories" => Ok(Self::Categories),
            "budgets" => Ok(Self::Budgets),
            "statistics" | "stats" => Ok(Self::Statistics),
            "settings" => Ok(Self::Settings),
            other => Err(format!(
                "Unknown page '{}'. Use dashboard, transactions, categories, budgets, statistics or settings",
                other
            )),
        }
    }
}

/// Everything a page needs besides the stored data
#[derive(Debug, Clone)]
pub struct RenderContext {
    pub today: NaiveDate,
    pub currency: String,
    pub date_format: String,
    pub alert_threshold: f64,
    pub recent_count: usize,
    pub theme_choice: ThemeChoice,
    /// Resolves the `auto` theme
    pub prefers_dark: bool,
}

impl RenderContext {
    pub fn new(settings: &Settings, theme_choice: ThemeChoice, today: NaiveDate) -> Self {
        Self {
            today,
            currency: settings.currency_symbol.clone(),
            date_format: settings.date_format.clone(),
            alert_threshold: settings.alert_threshold,
            recent_count: settings.recent_count,
            theme_choice,
            prefers_dark: false,
        }
    }

    pub fn prefers_dark(mut self, prefers_dark: bool) -> Self {
        self.prefers_dark = prefers_dark;
        self
    }

    /// The theme actually applied
    pub fn theme(&self) -> Theme {
        self.theme_choice.resolve(self.prefers_dark)
    }
}

/// Selections for the statistics page
#[derive(Debug, Clone, Copy, Default)]
pub struct StatisticsOptions {
    pub range: StatsRange,
    pub trend: TrendSpan,
    pub comparison: ComparisonKind,
}

/// Per-page selections
#[derive(Debug, Clone, Default)]
pub struct PageOptions {
    pub filter: TransactionFilter,
    pub statistics: StatisticsOptions,
}

/// Render one page to a string
pub fn render_page(
    storage: &Storage,
    page: Page,
    ctx: &RenderContext,
    options: &PageOptions,
) -> BudgetbookResult<String> {
    let html = match page {
        Page::Dashboard => pages::dashboard(storage, ctx)?.render()?,
        Page::Transactions => pages::transactions(storage, ctx, &options.filter)?.render()?,
        Page::Categories => pages::categories(storage, ctx)?.render()?,
        Page::Budgets => pages::budgets(storage, ctx)?.render()?,
        Page::Statistics => pages::statistics(storage, ctx, &options.statistics)?.render()?,
        Page::Settings => pages::settings(storage, ctx)?.render()?,
    };

    log::debug!("Rendered {} page ({} bytes)", page, html.len());
    Ok(html)
}

/// Render every page into `dir`, returning the written paths
pub fn render_site(
    storage: &Storage,
    dir: &Path,
    ctx: &RenderContext,
    options: &PageOptions,
) -> BudgetbookResult<Vec<PathBuf>> {
    fs::create_dir_all(dir).map_err(|e| {
        BudgetbookError::Render(format!("Failed to create {}: {}", dir.display(), e))
    })?;

    let mut written = Vec::new();
    for page in Page::all() {
        let path = dir.join(page.file_name());
        let html = render_page(storage, page, ctx, options)?;
        fs::write(&path, html).map_err(|e| {
            BudgetbookError::Render(format!("Failed to write {}: {}", path.display(), e))
        })?;
        written.push(path);
    }

    log::info!("Rendered {} pages into {}", written.len(), dir.display());
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BudgetPeriod, BudgetScope, CategoryId, DateRange, Money, TransactionType};
    use crate::services::{
        BudgetService, CreateBudgetInput, CreateTransactionInput, TransactionService,
    };
    use tempfile::TempDir;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 10, 18).unwrap()
    }

    fn context() -> RenderContext {
        RenderContext::new(&Settings::default(), ThemeChoice::default(), today())
    }

    fn add(storage: &Storage, cents: i64, kind: TransactionType, category: &str, desc: &str) {
        TransactionService::new(storage)
            .create(CreateTransactionInput {
                amount: Money::from_cents(cents),
                kind,
                category_id: CategoryId::from(category),
                date: today(),
                description: Some(desc.to_string()),
            })
            .unwrap();
    }

    fn render(storage: &Storage, page: Page) -> String {
        render_page(storage, page, &context(), &PageOptions::default()).unwrap()
    }

    #[test]
    fn test_page_names() {
        assert_eq!("stats".parse::<Page>().unwrap(), Page::Statistics);
        assert_eq!(Page::Dashboard.file_name(), "index.html");
        assert!("reports".parse::<Page>().is_err());
    }

    #[test]
    fn test_empty_states() {
        let storage = Storage::in_memory().unwrap();

        let dashboard = render(&storage, Page::Dashboard);
        assert!(dashboard.contains("No transactions yet"));
        assert!(dashboard.contains("<html lang=\"en\" data-theme=\"light\">"));

        assert!(render(&storage, Page::Budgets).contains("No budgets"));
    }

    #[test]
    fn test_user_text_is_escaped() {
        let storage = Storage::in_memory().unwrap();
        add(&storage, 1000, TransactionType::Expense, "food", "<script>alert(1)</script>");

        let html = render(&storage, Page::Transactions);
        assert!(!html.contains("<script>alert(1)</script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_dashboard_totals_and_alerts() {
        let storage = Storage::in_memory().unwrap();
        add(&storage, 500_000, TransactionType::Income, "salary", "October");
        add(&storage, 95_000, TransactionType::Expense, "food", "Groceries");
        BudgetService::new(&storage)
            .create(CreateBudgetInput {
                name: "Food".into(),
                amount: Money::from_cents(100_000),
                scope: BudgetScope::Category(CategoryId::from("food")),
                period: BudgetPeriod::Monthly,
                description: None,
            })
            .unwrap();

        let html = render(&storage, Page::Dashboard);
        assert!(html.contains("¥4,050.00"));
        assert!(html.contains("¥5,000.00"));
        assert!(html.contains("has used 95.0%"));
        assert!(html.contains("Groceries"));

        let budgets = render(&storage, Page::Budgets);
        assert!(budgets.contains("warning"));
        assert!(budgets.contains("¥50.00 left"));
    }

    #[test]
    fn test_statistics_chart() {
        let storage = Storage::in_memory().unwrap();
        add(&storage, 7500, TransactionType::Expense, "food", "");
        add(&storage, 2500, TransactionType::Expense, "transport", "");

        let html = render(&storage, Page::Statistics);
        assert!(html.contains("stroke-dasharray=\"376.50 502\""));
        assert!(html.contains("stroke-dasharray=\"125.50 502\""));
        assert!(html.contains("75.0%"));
    }

    #[test]
    fn test_time_date_format_renders_iso_dates() {
        let storage = Storage::in_memory().unwrap();
        add(&storage, 1000, TransactionType::Expense, "food", "Lunch");

        let mut settings = Settings::default();
        settings.date_format = "%Y-%m-%d %H:%M".into();
        let ctx = RenderContext::new(&settings, ThemeChoice::default(), today());

        for page in [Page::Dashboard, Page::Transactions] {
            let html = render_page(&storage, page, &ctx, &PageOptions::default()).unwrap();
            assert!(html.contains("2025-10-18"));
            assert!(html.contains("Lunch"));
        }
    }

    #[test]
    fn test_statistics_shows_both_month_comparisons() {
        let storage = Storage::in_memory().unwrap();
        add(&storage, 2500, TransactionType::Expense, "food", "");

        let html = render(&storage, Page::Statistics);
        assert!(html.contains("This month vs last month"));
        assert!(html.contains("This month vs same month last year"));

        let custom = ComparisonKind::Custom {
            first: DateRange::month_of(today()),
            second: DateRange::month_of(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()),
        };
        let options = PageOptions {
            statistics: StatisticsOptions {
                comparison: custom,
                ..Default::default()
            },
            ..Default::default()
        };
        let html = render_page(&storage, Page::Statistics, &context(), &options).unwrap();
        assert!(html.contains("Period 1 vs period 2"));
        assert!(!html.contains("This month vs last month"));
    }

    #[test]
    fn test_settings_theme() {
        let storage = Storage::in_memory().unwrap();
        let ctx = RenderContext::new(&Settings::default(), ThemeChoice::Auto, today()).prefers_dark(true);

        let html = render_page(&storage, Page::Settings, &ctx, &PageOptions::default()).unwrap();
        assert!(html.contains("<html lang=\"en\" data-theme=\"dark\">"));
        assert!(html.contains("Follow system"));
    }

    #[test]
    fn test_render_site() {
        let storage = Storage::in_memory().unwrap();
        let dir = TempDir::new().unwrap();

        let written = render_site(&storage, dir.path(), &context(), &PageOptions::default()).unwrap();
        assert_eq!(written.len(), 6);
        assert!(dir.path().join("index.html").exists());
        assert!(dir.path().join("statistics.html").exists());
    }
}
