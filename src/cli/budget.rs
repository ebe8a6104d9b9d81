//! Budget CLI commands
//!
//! Implements CLI commands for spending budgets and their alerts.

use clap::Subcommand;

use super::{category_map, parse_amount, today};
use crate::config::Settings;
use crate::display::{format_budget_details, format_budget_list};
use crate::error::{BudgetbookError, BudgetbookResult};
use crate::models::{BudgetPeriod, BudgetScope, TransactionType, ALL_CATEGORIES};
use crate::reports::BudgetProgress;
use crate::services::{BudgetService, CategoryService, CreateBudgetInput, UpdateBudgetInput};
use crate::storage::Storage;

/// Budget subcommands
#[derive(Subcommand)]
pub enum BudgetCommands {
    /// List budgets with their progress for the current period
    List,

    /// Show a budget and the transactions counted against it
    Show {
        /// Budget name or ID
        budget: String,
    },

    /// Create a new budget
    Add {
        /// Budget name
        name: String,
        /// Spending limit (e.g. "1500" or "1,500.00")
        amount: String,
        /// Expense category name or ID, or "all"
        #[arg(short, long, default_value = ALL_CATEGORIES)]
        category: String,
        /// weekly, monthly or yearly
        #[arg(short, long, default_value = "monthly")]
        period: String,
        /// Notes
        #[arg(short = 'm', long)]
        description: Option<String>,
    },

    /// Edit a budget
    Edit {
        /// Budget name or ID
        budget: String,
        /// New name
        #[arg(short, long)]
        name: Option<String>,
        /// New spending limit
        #[arg(short, long)]
        amount: Option<String>,
        /// New category, or "all"
        #[arg(short, long)]
        category: Option<String>,
        /// New period
        #[arg(short, long)]
        period: Option<String>,
        /// New notes
        #[arg(short = 'm', long)]
        description: Option<String>,
    },

    /// Delete a budget
    Delete {
        /// Budget name or ID
        budget: String,
    },

    /// Show budgets that are over or near their limit
    Alerts,
}

fn parse_period(input: &str) -> BudgetbookResult<BudgetPeriod> {
    input.parse().map_err(BudgetbookError::Validation)
}

/// Resolve "all" or an expense category
fn parse_scope(storage: &Storage, input: &str) -> BudgetbookResult<BudgetScope> {
    if input.trim().eq_ignore_ascii_case(ALL_CATEGORIES) {
        return Ok(BudgetScope::All);
    }

    let category = CategoryService::new(storage).require(input)?;
    if category.kind != TransactionType::Expense {
        return Err(BudgetbookError::Validation(format!(
            "Budgets track spending; '{}' is an income category",
            category.name
        )));
    }
    Ok(BudgetScope::Category(category.id))
}

/// Handle a budget command
pub fn handle_budget_command(
    storage: &Storage,
    settings: &Settings,
    cmd: BudgetCommands,
) -> BudgetbookResult<()> {
    let service = BudgetService::new(storage);
    let currency = settings.currency_symbol.as_str();
    let threshold = settings.alert_threshold;

    match cmd {
        BudgetCommands::List => {
            let progress = service.progress(today())?;
            print!(
                "{}",
                format_budget_list(&progress, &category_map(storage)?, currency, threshold)
            );
        }

        BudgetCommands::Show { budget } => {
            let budget = service
                .find(&budget)?
                .ok_or_else(|| BudgetbookError::budget_not_found(&budget))?;
            let transactions = storage.transactions.get_all()?;
            let progress = BudgetProgress::calculate(budget, &transactions, today());
            print!(
                "{}",
                format_budget_details(&progress, &category_map(storage)?, currency, threshold)
            );
        }

        BudgetCommands::Add {
            name,
            amount,
            category,
            period,
            description,
        } => {
            let budget = service.create(CreateBudgetInput {
                name,
                amount: parse_amount(&amount)?,
                scope: parse_scope(storage, &category)?,
                period: parse_period(&period)?,
                description,
            })?;

            println!("Created budget: {}", budget.name);
            println!(
                "  Limit: {} {}",
                budget.amount.format_with_symbol(currency),
                budget.period
            );
            println!("  ID: {}", budget.id);
        }

        BudgetCommands::Edit {
            budget,
            name,
            amount,
            category,
            period,
            description,
        } => {
            let existing = service
                .find(&budget)?
                .ok_or_else(|| BudgetbookError::budget_not_found(&budget))?;

            if name.is_none()
                && amount.is_none()
                && category.is_none()
                && period.is_none()
                && description.is_none()
            {
                println!("No changes specified. Use --name, --amount, --category, --period, or --description.");
                return Ok(());
            }

            let updated = service.update(
                &existing.id,
                UpdateBudgetInput {
                    name,
                    amount: amount.as_deref().map(parse_amount).transpose()?,
                    scope: category
                        .as_deref()
                        .map(|c| parse_scope(storage, c))
                        .transpose()?,
                    period: period.as_deref().map(parse_period).transpose()?,
                    description,
                },
            )?;
            println!("Updated budget: {}", updated.name);
        }

        BudgetCommands::Delete { budget } => {
            let existing = service
                .find(&budget)?
                .ok_or_else(|| BudgetbookError::budget_not_found(&budget))?;
            service.delete(&existing.id)?;
            println!("Deleted budget: {}", existing.name);
        }

        BudgetCommands::Alerts => {
            let alerts = service.alerts(today(), threshold)?;

            if alerts.is_empty() {
                println!("All budgets are within {:.0}% of their limit.", threshold);
                return Ok(());
            }

            println!("Budget Alerts");
            println!("=============");
            for alert in &alerts {
                println!("{} {}", alert.level.icon(), alert.message(currency));
            }
        }
    }

    Ok(())
}
