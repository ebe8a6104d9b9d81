//! Storage initialization
//!
//! Seeds default categories and upgrades records written by older versions.

use crate::error::BudgetbookResult;
use crate::models::default_categories;

use super::categories::CategoryRepository;
use super::transactions::TransactionRepository;

/// Seed the default categories when the category collection is empty
///
/// Returns whether anything was written.
pub fn initialize_defaults(categories: &CategoryRepository) -> BudgetbookResult<bool> {
    if categories.count()? > 0 {
        return Ok(false);
    }

    categories.replace_all(default_categories())?;
    categories.save()?;
    log::info!("Seeded default categories");

    Ok(true)
}

/// Rewrite transactions that still carry the old `category` field
///
/// The old value may be a category id or a category name. Records whose
/// reference resolves to nothing are left untouched. Saves and returns the
/// number of migrated records.
pub fn migrate_legacy_transactions(
    transactions: &TransactionRepository,
    categories: &CategoryRepository,
) -> BudgetbookResult<usize> {
    let known = categories.get_all()?;
    let mut all = transactions.get_all()?;
    let mut migrated = 0;

    for txn in all.iter_mut().filter(|t| t.needs_category_migration()) {
        let reference = txn.category.clone().unwrap_or_default();
        let found = known
            .iter()
            .find(|c| c.id.as_str() == reference || c.name == reference);

        if let Some(category) = found {
            txn.category_id = Some(category.id.clone());
            txn.category = None;
            migrated += 1;
        }
    }

    if migrated > 0 {
        transactions.replace_all(all)?;
        transactions.save()?;
        log::info!(
            "Data migration: moved {} transactions to categoryId references",
            migrated
        );
    }

    Ok(migrated)
}
