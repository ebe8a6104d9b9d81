//! Transaction CLI commands
//!
//! Implements CLI commands for adding, editing and listing transactions.

use clap::Subcommand;

use super::{category_map, parse_amount, parse_date_arg, parse_optional_date, today};
use crate::config::Settings;
use crate::display::{format_transaction_details, format_transaction_list};
use crate::error::{BudgetbookError, BudgetbookResult};
use crate::models::{Category, DateRange, TransactionType};
use crate::services::{
    CategoryService, CreateTransactionInput, TransactionFilter, TransactionService,
    UpdateTransactionInput,
};
use crate::storage::Storage;

/// Transaction subcommands
#[derive(Subcommand)]
pub enum TransactionCommands {
    /// Add a new transaction
    Add {
        /// Amount, always positive (e.g. "35.50")
        amount: String,
        /// Category name or ID
        #[arg(short, long)]
        category: String,
        /// income or expense
        #[arg(short = 't', long = "type", default_value = "expense")]
        kind: String,
        /// Transaction date (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<String>,
        /// Description
        #[arg(short = 'm', long)]
        description: Option<String>,
    },
    /// List transactions, newest first
    List {
        /// Filter by type (income or expense)
        #[arg(short = 't', long = "type")]
        kind: Option<String>,
        /// Filter by category name or ID
        #[arg(short, long)]
        category: Option<String>,
        /// Only this date (YYYY-MM-DD)
        #[arg(short, long)]
        date: Option<String>,
        /// Start date (YYYY-MM-DD), inclusive
        #[arg(long)]
        from: Option<String>,
        /// End date (YYYY-MM-DD), inclusive
        #[arg(long)]
        to: Option<String>,
        /// Search description and category name
        #[arg(short, long)]
        search: Option<String>,
        /// Number of transactions to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },
    /// Show transaction details
    Show {
        /// Transaction ID or ID prefix
        id: String,
    },
    /// Edit a transaction
    Edit {
        /// Transaction ID or ID prefix
        id: String,
        /// New amount
        #[arg(short, long)]
        amount: Option<String>,
        /// New type
        #[arg(short = 't', long = "type")]
        kind: Option<String>,
        /// New category name or ID
        #[arg(short, long)]
        category: Option<String>,
        /// New date
        #[arg(short, long)]
        date: Option<String>,
        /// New description
        #[arg(short = 'm', long)]
        description: Option<String>,
    },
    /// Delete a transaction
    Delete {
        /// Transaction ID or ID prefix
        id: String,
    },
}

fn parse_kind(input: &str) -> BudgetbookResult<TransactionType> {
    input.parse().map_err(BudgetbookError::Validation)
}

/// A category must match the direction of the transaction it is used on
fn check_kind(category: &Category, kind: TransactionType) -> BudgetbookResult<()> {
    if category.kind != kind {
        return Err(BudgetbookError::Validation(format!(
            "Category '{}' is an {} category, not {}",
            category.name, category.kind, kind
        )));
    }
    Ok(())
}

/// Build the list filter from command-line options
pub(crate) fn build_filter(
    storage: &Storage,
    kind: Option<&str>,
    category: Option<&str>,
    date: Option<&str>,
    from: Option<&str>,
    to: Option<&str>,
    search: Option<String>,
) -> BudgetbookResult<TransactionFilter> {
    let mut filter = TransactionFilter::new();

    if let Some(kind) = kind {
        filter = filter.kind(parse_kind(kind)?);
    }
    if let Some(category) = category {
        filter = filter.category(CategoryService::new(storage).require(category)?.id);
    }
    if let Some(date) = parse_optional_date(date)? {
        filter = filter.date(date);
    }
    match (parse_optional_date(from)?, parse_optional_date(to)?) {
        (Some(start), Some(end)) => filter = filter.range(DateRange::new(start, end)),
        (Some(start), None) => filter = filter.range(DateRange::new(start, chrono::NaiveDate::MAX)),
        (None, Some(end)) => filter = filter.range(DateRange::new(chrono::NaiveDate::MIN, end)),
        (None, None) => {}
    }
    if let Some(search) = search {
        filter = filter.search(search);
    }

    Ok(filter)
}

/// Handle a transaction command
pub fn handle_transaction_command(
    storage: &Storage,
    settings: &Settings,
    cmd: TransactionCommands,
) -> BudgetbookResult<()> {
    let service = TransactionService::new(storage);
    let category_service = CategoryService::new(storage);
    let currency = settings.currency_symbol.as_str();

    match cmd {
        TransactionCommands::Add {
            amount,
            category,
            kind,
            date,
            description,
        } => {
            let kind = parse_kind(&kind)?;
            let category = category_service.require(&category)?;
            check_kind(&category, kind)?;

            let txn = service.create(CreateTransactionInput {
                amount: parse_amount(&amount)?,
                kind,
                category_id: category.id.clone(),
                date: match date {
                    Some(d) => parse_date_arg(&d)?,
                    None => today(),
                },
                description,
            })?;

            println!(
                "Added {} {} in {} {} on {}",
                txn.kind,
                txn.amount.format_with_symbol(currency),
                category.icon,
                category.name,
                txn.date
            );
            println!("ID: {}", txn.id);
        }

        TransactionCommands::List {
            kind,
            category,
            date,
            from,
            to,
            search,
            limit,
        } => {
            let filter = build_filter(
                storage,
                kind.as_deref(),
                category.as_deref(),
                date.as_deref(),
                from.as_deref(),
                to.as_deref(),
                search,
            )?
            .limit(limit);

            let transactions = service.list(&filter)?;
            print!(
                "{}",
                format_transaction_list(&transactions, &category_map(storage)?, currency)
            );
        }

        TransactionCommands::Show { id } => {
            let txn = service
                .find(&id)?
                .ok_or_else(|| BudgetbookError::transaction_not_found(&id))?;
            print!(
                "{}",
                format_transaction_details(&txn, &category_map(storage)?, currency)
            );
        }

        TransactionCommands::Edit {
            id,
            amount,
            kind,
            category,
            date,
            description,
        } => {
            let txn = service
                .find(&id)?
                .ok_or_else(|| BudgetbookError::transaction_not_found(&id))?;

            let kind = kind.as_deref().map(parse_kind).transpose()?;
            let category_id = match category {
                Some(category) => {
                    let category = category_service.require(&category)?;
                    check_kind(&category, kind.unwrap_or(txn.kind))?;
                    Some(category.id)
                }
                None => {
                    if let (Some(kind), Some(id)) = (kind, &txn.category_id) {
                        if let Some(current) = category_service.get(id)? {
                            check_kind(&current, kind)?;
                        }
                    }
                    None
                }
            };

            if amount.is_none()
                && kind.is_none()
                && category_id.is_none()
                && date.is_none()
                && description.is_none()
            {
                println!("Nothing to change. Pass --amount, --type, --category, --date or --description.");
                return Ok(());
            }

            let updated = service.update(
                &txn.id,
                UpdateTransactionInput {
                    amount: amount.as_deref().map(parse_amount).transpose()?,
                    kind,
                    category_id,
                    date: parse_optional_date(date.as_deref())?,
                    description,
                },
            )?;

            println!("Updated transaction {}", updated.id.short());
        }

        TransactionCommands::Delete { id } => {
            let txn = service
                .find(&id)?
                .ok_or_else(|| BudgetbookError::transaction_not_found(&id))?;

            service.delete(&txn.id)?;
            println!(
                "Deleted {} {} on {}",
                txn.kind,
                txn.amount.format_with_symbol(currency),
                txn.date
            );
        }
    }

    Ok(())
}
