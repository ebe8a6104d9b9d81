//! Page templates and the builders that fill them

use std::collections::HashMap;

use askama::Template;

use super::views::{
    percent, AlertRow, BudgetCard, CategoryCard, ComparisonGroup, EmptyState, NavItem, RankingRow,
    SliceRow, ThemeOption, TransactionRow, TrendRow,
};
use super::{Page, RenderContext, StatisticsOptions};
use crate::error::BudgetbookResult;
use crate::models::{Category, CategoryId, DateRange, Money, StatsRange, TransactionType};
use crate::reports::{CategoryRanking, ComparisonKind, ComparisonReport, Statistics, TrendReport};
use crate::services::{BudgetService, CategoryService, TransactionFilter, TransactionService};
use crate::storage::Storage;

/// Shared by every page: title, theme and navigation
#[derive(Debug, Clone)]
pub struct Layout {
    pub title: &'static str,
    pub theme: String,
    pub nav: Vec<NavItem>,
    pub generated: String,
}

impl Layout {
    fn new(page: Page, ctx: &RenderContext) -> Self {
        Self {
            title: page.title(),
            theme: ctx.theme().key().to_string(),
            nav: Page::all()
                .into_iter()
                .map(|p| NavItem {
                    href: p.file_name(),
                    label: p.title(),
                    active: p == page,
                })
                .collect(),
            generated: ctx.today.format("%Y-%m-%d").to_string(),
        }
    }
}

fn category_map(storage: &Storage) -> BudgetbookResult<HashMap<CategoryId, Category>> {
    Ok(CategoryService::new(storage)
        .list()?
        .into_iter()
        .map(|c| (c.id.clone(), c))
        .collect())
}

#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub layout: Layout,
    pub balance: String,
    pub balance_negative: bool,
    pub month_income: String,
    pub month_expense: String,
    pub alerts: Vec<AlertRow>,
    pub recent: Vec<TransactionRow>,
    pub empty: EmptyState,
}

pub fn dashboard(storage: &Storage, ctx: &RenderContext) -> BudgetbookResult<DashboardTemplate> {
    let transactions = storage.transactions.get_all()?;
    let categories = category_map(storage)?;
    let overall = Statistics::from_transactions(&transactions, StatsRange::All, ctx.today);
    let month = Statistics::for_range(&transactions, DateRange::month_of(ctx.today));

    let alerts = BudgetService::new(storage)
        .alerts(ctx.today, ctx.alert_threshold)?
        .iter()
        .map(|alert| AlertRow::new(alert, &ctx.currency))
        .collect();

    let recent = TransactionService::new(storage)
        .recent(ctx.recent_count)?
        .iter()
        .map(|txn| TransactionRow::new(txn, &categories, &ctx.currency, &ctx.date_format))
        .collect();

    Ok(DashboardTemplate {
        layout: Layout::new(Page::Dashboard, ctx),
        balance: overall.balance().format_with_symbol(&ctx.currency),
        balance_negative: overall.balance().is_negative(),
        month_income: month.total_income.format_with_symbol(&ctx.currency),
        month_expense: month.total_expense.format_with_symbol(&ctx.currency),
        alerts,
        recent,
        empty: EmptyState::new("📝", "No transactions yet", "Add one with `budgetbook transaction add`"),
    })
}

#[derive(Template)]
#[template(path = "transactions.html")]
pub struct TransactionsTemplate {
    pub layout: Layout,
    /// Human-readable description of the active filter
    pub filter: String,
    pub rows: Vec<TransactionRow>,
    pub empty: EmptyState,
}

fn describe_filter(filter: &TransactionFilter, categories: &HashMap<CategoryId, Category>) -> String {
    let mut parts = Vec::new();
    if let Some(kind) = filter.kind {
        parts.push(kind.label().to_string());
    }
    if let Some(id) = &filter.category_id {
        parts.push(categories.get(id).map_or_else(|| id.to_string(), |c| c.name.clone()));
    }
    if let Some(date) = filter.date {
        parts.push(date.to_string());
    }
    if let Some(range) = filter.range {
        parts.push(range.to_string());
    }
    if let Some(term) = &filter.search {
        parts.push(format!("\"{}\"", term));
    }
    if parts.is_empty() {
        "All transactions".to_string()
    } else {
        parts.join(" · ")
    }
}

pub fn transactions(
    storage: &Storage,
    ctx: &RenderContext,
    filter: &TransactionFilter,
) -> BudgetbookResult<TransactionsTemplate> {
    let categories = category_map(storage)?;
    let rows = TransactionService::new(storage)
        .list(filter)?
        .iter()
        .map(|txn| TransactionRow::new(txn, &categories, &ctx.currency, &ctx.date_format))
        .collect();

    Ok(TransactionsTemplate {
        layout: Layout::new(Page::Transactions, ctx),
        filter: describe_filter(filter, &categories),
        rows,
        empty: EmptyState::new("📝", "No transactions", "Nothing matches the current filter"),
    })
}

#[derive(Template)]
#[template(path = "categories.html")]
pub struct CategoriesTemplate {
    pub layout: Layout,
    pub income: Vec<CategoryCard>,
    pub expense: Vec<CategoryCard>,
    pub empty: EmptyState,
}

pub fn categories(storage: &Storage, ctx: &RenderContext) -> BudgetbookResult<CategoriesTemplate> {
    let mut counts: HashMap<CategoryId, usize> = HashMap::new();
    for txn in storage.transactions.get_all()? {
        if let Some(id) = txn.category_id {
            *counts.entry(id).or_default() += 1;
        }
    }

    let service = CategoryService::new(storage);
    let cards = |kind: TransactionType| -> BudgetbookResult<Vec<CategoryCard>> {
        Ok(service
            .list_by_type(kind)?
            .iter()
            .map(|c| CategoryCard::new(c, counts.get(&c.id).copied().unwrap_or(0)))
            .collect())
    };

    Ok(CategoriesTemplate {
        layout: Layout::new(Page::Categories, ctx),
        income: cards(TransactionType::Income)?,
        expense: cards(TransactionType::Expense)?,
        empty: EmptyState::new("🏷️", "No categories", "Add one with `budgetbook category add`"),
    })
}

#[derive(Template)]
#[template(path = "budgets.html")]
pub struct BudgetsTemplate {
    pub layout: Layout,
    pub cards: Vec<BudgetCard>,
    pub empty: EmptyState,
}

pub fn budgets(storage: &Storage, ctx: &RenderContext) -> BudgetbookResult<BudgetsTemplate> {
    let categories = category_map(storage)?;
    let cards = BudgetService::new(storage)
        .progress(ctx.today)?
        .iter()
        .map(|p| BudgetCard::new(p, &categories, &ctx.currency, ctx.alert_threshold))
        .collect();

    Ok(BudgetsTemplate {
        layout: Layout::new(Page::Budgets, ctx),
        cards,
        empty: EmptyState::new("🎯", "No budgets", "Add one with `budgetbook budget add`"),
    })
}

/// Ranking table plus donut chart for one transaction type
pub struct RankingSection {
    pub title: &'static str,
    pub total: String,
    pub rows: Vec<RankingRow>,
    pub slices: Vec<SliceRow>,
}

impl RankingSection {
    fn new(ranking: &CategoryRanking, currency: &str) -> Self {
        Self {
            title: match ranking.kind {
                TransactionType::Income => "Income by category",
                TransactionType::Expense => "Expenses by category",
            },
            total: ranking.total.format_with_symbol(currency),
            rows: ranking
                .entries
                .iter()
                .map(|e| RankingRow::new(e, currency))
                .collect(),
            slices: ranking
                .chart_slices()
                .iter()
                .map(|s| SliceRow::new(s, currency))
                .collect(),
        }
    }
}

#[derive(Template)]
#[template(path = "statistics.html")]
pub struct StatisticsTemplate {
    pub layout: Layout,
    pub range: String,
    pub balance: String,
    pub income: String,
    pub expense: String,
    pub count: usize,
    pub rankings: Vec<RankingSection>,
    pub trend_span: String,
    pub trend: Vec<TrendRow>,
    pub comparisons: Vec<ComparisonGroup>,
    pub empty: EmptyState,
}

pub fn statistics(
    storage: &Storage,
    ctx: &RenderContext,
    options: &StatisticsOptions,
) -> BudgetbookResult<StatisticsTemplate> {
    let transactions = storage.transactions.get_all()?;
    let categories = CategoryService::new(storage).list()?;
    let currency = ctx.currency.as_str();

    let overview = Statistics::from_transactions(&transactions, options.range, ctx.today);

    let in_range: Vec<_> = transactions
        .iter()
        .filter(|t| options.range.contains(t.date, ctx.today))
        .cloned()
        .collect();
    let rankings = [TransactionType::Income, TransactionType::Expense]
        .into_iter()
        .map(|kind| CategoryRanking::from_transactions(&in_range, &categories, kind))
        .map(|ranking| RankingSection::new(&ranking, currency))
        .collect();

    let trend = TrendReport::from_transactions(&transactions, options.trend, ctx.today);
    let peak = trend.peak();

    // Preset mode shows both month comparisons side by side
    let kinds = match options.comparison {
        ComparisonKind::Custom { .. } => vec![options.comparison],
        _ => vec![ComparisonKind::MonthOverMonth, ComparisonKind::YearOverYear],
    };
    let comparisons = kinds
        .into_iter()
        .map(|kind| ComparisonReport::from_transactions(&transactions, kind, ctx.today))
        .map(|report| ComparisonGroup::new(&report, currency))
        .collect();

    Ok(StatisticsTemplate {
        layout: Layout::new(Page::Statistics, ctx),
        range: overview.label.clone(),
        balance: overview.balance().format_with_symbol(currency),
        income: overview.total_income.format_with_symbol(currency),
        expense: overview.total_expense.format_with_symbol(currency),
        count: overview.transaction_count,
        rankings,
        trend_span: trend.span.to_string(),
        trend: trend
            .points
            .iter()
            .map(|p| TrendRow::new(p, peak, currency))
            .collect(),
        comparisons,
        empty: EmptyState::new("📊", "No data", "No transactions in this range"),
    })
}

#[derive(Template)]
#[template(path = "settings.html")]
pub struct SettingsTemplate {
    pub layout: Layout,
    pub themes: Vec<ThemeOption>,
    pub active_theme: String,
    pub currency: String,
    pub alert_threshold: String,
    pub transaction_count: usize,
    pub category_count: usize,
    pub budget_count: usize,
    pub total_volume: String,
}

pub fn settings(storage: &Storage, ctx: &RenderContext) -> BudgetbookResult<SettingsTemplate> {
    let transactions = storage.transactions.get_all()?;
    let volume: Money = transactions.iter().map(|t| t.amount).sum();

    Ok(SettingsTemplate {
        layout: Layout::new(Page::Settings, ctx),
        themes: ThemeOption::all(ctx.theme_choice),
        active_theme: ctx.theme().display_name().to_string(),
        currency: ctx.currency.clone(),
        alert_threshold: percent(ctx.alert_threshold),
        transaction_count: transactions.len(),
        category_count: storage.categories.count()?,
        budget_count: storage.budgets.count()?,
        total_volume: volume.format_with_symbol(&ctx.currency),
    })
}
