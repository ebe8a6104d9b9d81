//! Category CLI commands
//!
//! Implements CLI commands for income and expense category management.

use clap::Subcommand;

use crate::display::{format_category_details, format_category_list};
use crate::error::{BudgetbookError, BudgetbookResult};
use crate::models::TransactionType;
use crate::services::{CategoryService, CreateCategoryInput, UpdateCategoryInput};
use crate::storage::Storage;

/// Category subcommands
#[derive(Subcommand)]
pub enum CategoryCommands {
    /// List categories
    List {
        /// Only income or expense categories
        #[arg(short = 't', long = "type")]
        kind: Option<String>,
    },

    /// Create a new category
    Add {
        /// Category name
        name: String,
        /// income or expense
        #[arg(short = 't', long = "type", default_value = "expense")]
        kind: String,
        /// Hex color (e.g. "#ff6b6b")
        #[arg(long)]
        color: Option<String>,
        /// Icon, usually an emoji
        #[arg(long)]
        icon: Option<String>,
    },

    /// Show category details
    Show {
        /// Category name or ID
        category: String,
    },

    /// Edit a category
    Edit {
        /// Category name or ID
        category: String,
        /// New name
        #[arg(short, long)]
        name: Option<String>,
        /// New color
        #[arg(long)]
        color: Option<String>,
        /// New icon
        #[arg(long)]
        icon: Option<String>,
    },

    /// Delete a category
    ///
    /// Transactions and budgets that used it are kept and shown as
    /// uncategorized.
    Delete {
        /// Category name or ID
        category: String,
    },
}

/// Handle a category command
pub fn handle_category_command(storage: &Storage, cmd: CategoryCommands) -> BudgetbookResult<()> {
    let service = CategoryService::new(storage);

    match cmd {
        CategoryCommands::List { kind } => {
            let categories = match kind {
                Some(kind) => {
                    let kind: TransactionType = kind.parse().map_err(BudgetbookError::Validation)?;
                    service.list_by_type(kind)?
                }
                None => service.list()?,
            };
            print!("{}", format_category_list(&categories));
        }

        CategoryCommands::Add {
            name,
            kind,
            color,
            icon,
        } => {
            let kind: TransactionType = kind.parse().map_err(BudgetbookError::Validation)?;
            let category = service.create(CreateCategoryInput {
                name,
                kind,
                color,
                icon,
            })?;

            println!("Created category: {} {}", category.icon, category.name);
            println!("  Type: {}", category.kind);
            println!("  ID: {}", category.id);
        }

        CategoryCommands::Show { category } => {
            let category = service.require(&category)?;
            let count = storage
                .transactions
                .get_all()?
                .iter()
                .filter(|t| t.category_id.as_ref() == Some(&category.id))
                .count();
            print!("{}", format_category_details(&category, count));
        }

        CategoryCommands::Edit {
            category,
            name,
            color,
            icon,
        } => {
            let category = service.require(&category)?;

            if name.is_none() && color.is_none() && icon.is_none() {
                println!("No changes specified. Use --name, --color, or --icon.");
                return Ok(());
            }

            let updated = service.update(&category.id, UpdateCategoryInput { name, color, icon })?;
            println!("Updated category: {} {}", updated.icon, updated.name);
        }

        CategoryCommands::Delete { category } => {
            let category = service.require(&category)?;
            let deleted = service.delete(&category.id)?;

            println!("Deleted category: {}", deleted.category.name);
            if deleted.orphaned_transactions > 0 || deleted.orphaned_budgets > 0 {
                println!(
                    "  {} transaction(s) and {} budget(s) now point to a missing category.",
                    deleted.orphaned_transactions, deleted.orphaned_budgets
                );
            }
        }
    }

    Ok(())
}
