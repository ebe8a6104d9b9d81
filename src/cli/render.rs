//! Render CLI command
//!
//! Writes one page, or every page into a directory, as static HTML.

use std::fs;
use std::path::PathBuf;

use clap::Args;

use super::stats::{CompareArgs, RangeArgs};
use super::today;
use super::transaction::build_filter;
use crate::config::Settings;
use crate::error::{BudgetbookError, BudgetbookResult};
use crate::render::{render_page, render_site, Page, PageOptions, RenderContext, StatisticsOptions};
use crate::reports::TrendSpan;
use crate::storage::Storage;
use crate::theme::load_theme;

/// Arguments for `budgetbook render`
#[derive(Args, Debug)]
pub struct RenderArgs {
    /// dashboard, transactions, categories, budgets, statistics, settings or all
    #[arg(default_value = "dashboard")]
    pub page: String,

    /// Output file; a directory when rendering all pages (default: stdout, or ./site)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Resolve the "auto" theme as dark
    #[arg(long)]
    pub dark: bool,

    /// Transactions page: only income or expense
    #[arg(short = 't', long = "type")]
    pub kind: Option<String>,

    /// Transactions page: only this category
    #[arg(short, long)]
    pub category: Option<String>,

    /// Transactions page: only this date
    #[arg(short, long)]
    pub date: Option<String>,

    /// Transactions page: search description and category name
    #[arg(short, long)]
    pub search: Option<String>,

    #[command(flatten)]
    pub range: RangeArgs,

    /// Statistics page: trend span (6m, 12m, 24m, 30d, 90d, 180d)
    #[arg(long, default_value = "30d")]
    pub span: String,

    #[command(flatten)]
    pub compare: CompareArgs,
}

impl RenderArgs {
    fn page_options(&self, storage: &Storage) -> BudgetbookResult<PageOptions> {
        let filter = build_filter(
            storage,
            self.kind.as_deref(),
            self.category.as_deref(),
            self.date.as_deref(),
            self.range.from.as_deref(),
            self.range.to.as_deref(),
            self.search.clone(),
        )?;

        let trend: TrendSpan = self.span.parse().map_err(BudgetbookError::Validation)?;

        Ok(PageOptions {
            filter,
            statistics: StatisticsOptions {
                range: self.range.to_range()?,
                trend,
                comparison: self.compare.to_kind()?,
            },
        })
    }
}

/// Handle the render command
pub fn handle_render_command(
    storage: &Storage,
    settings: &Settings,
    args: RenderArgs,
) -> BudgetbookResult<()> {
    let theme = load_theme(storage.store())?;
    let ctx = RenderContext::new(settings, theme, today()).prefers_dark(args.dark);
    let options = args.page_options(storage)?;

    if args.page.trim().eq_ignore_ascii_case("all") {
        let dir = args.output.unwrap_or_else(|| PathBuf::from("site"));
        let written = render_site(storage, &dir, &ctx, &options)?;
        println!("Rendered {} pages into {}", written.len(), dir.display());
        for path in written {
            println!("  {}", path.display());
        }
        return Ok(());
    }

    let page: Page = args.page.parse().map_err(BudgetbookError::Validation)?;
    let html = render_page(storage, page, &ctx, &options)?;

    match args.output {
        Some(path) => {
            fs::write(&path, html).map_err(|e| {
                BudgetbookError::Render(format!("Failed to write {}: {}", path.display(), e))
            })?;
            println!("Rendered {} page to {}", page, path.display());
        }
        None => print!("{}", html),
    }

    Ok(())
}
