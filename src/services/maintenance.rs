//! Data maintenance
//!
//! Diagnostics for dangling category references and the full data reset.

use std::collections::{BTreeSet, HashSet};

use crate::error::BudgetbookResult;
use crate::models::{Budget, CategoryId, Transaction};
use crate::storage::Storage;

/// Records whose category no longer exists
#[derive(Debug, Clone, Default)]
pub struct Diagnosis {
    pub transaction_count: usize,
    pub category_count: usize,
    pub budget_count: usize,
    /// Transactions with a missing category id, or with none at all
    pub orphaned_transactions: Vec<Transaction>,
    pub orphaned_budgets: Vec<Budget>,
    /// Distinct ids referenced but not defined
    pub missing_category_ids: BTreeSet<CategoryId>,
}

impl Diagnosis {
    pub fn is_healthy(&self) -> bool {
        self.orphaned_transactions.is_empty() && self.orphaned_budgets.is_empty()
    }

    /// Format the diagnosis for terminal display
    pub fn format_terminal(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "{} transaction(s), {} categor(ies), {} budget(s)\n",
            self.transaction_count, self.category_count, self.budget_count
        ));

        if self.is_healthy() {
            output.push_str("All category references resolve.\n");
            return output;
        }

        output.push_str(&format!(
            "{} transaction(s) and {} budget(s) reference missing categories\n",
            self.orphaned_transactions.len(),
            self.orphaned_budgets.len()
        ));
        if !self.missing_category_ids.is_empty() {
            let ids: Vec<&str> = self.missing_category_ids.iter().map(|id| id.as_str()).collect();
            output.push_str(&format!("Missing category ids: {}\n", ids.join(", ")));
        }

        output
    }
}

/// Service for whole-store maintenance
pub struct MaintenanceService<'a> {
    storage: &'a Storage,
}

impl<'a> MaintenanceService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Find transactions and budgets pointing at categories that do not exist
    pub fn diagnose(&self) -> BudgetbookResult<Diagnosis> {
        let categories = self.storage.categories.get_all()?;
        let transactions = self.storage.transactions.get_all()?;
        let budgets = self.storage.budgets.get_all()?;

        let known: HashSet<&CategoryId> = categories.iter().map(|c| &c.id).collect();
        let mut missing = BTreeSet::new();

        let orphaned_transactions: Vec<Transaction> = transactions
            .iter()
            .filter(|t| match &t.category_id {
                Some(id) if known.contains(id) => false,
                Some(id) => {
                    missing.insert(id.clone());
                    true
                }
                None => true,
            })
            .cloned()
            .collect();

        let orphaned_budgets: Vec<Budget> = budgets
            .iter()
            .filter(|b| match b.scope().category_id() {
                Some(id) if !known.contains(id) => {
                    missing.insert(id.clone());
                    true
                }
                _ => false,
            })
            .cloned()
            .collect();

        Ok(Diagnosis {
            transaction_count: transactions.len(),
            category_count: categories.len(),
            budget_count: budgets.len(),
            orphaned_transactions,
            orphaned_budgets,
            missing_category_ids: missing,
        })
    }

    /// Delete every transaction, category and budget and reseed the defaults
    pub fn clear_all(&self) -> BudgetbookResult<()> {
        self.storage.clear_all()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BudgetPeriod, BudgetScope, Money, TransactionType};
    use chrono::NaiveDate;

    fn expense(category: &str) -> Transaction {
        Transaction::new(
            Money::from_cents(100),
            TransactionType::Expense,
            category.into(),
            NaiveDate::from_ymd_opt(2025, 10, 1).unwrap(),
            "",
        )
    }

    #[test]
    fn test_healthy_store() {
        let storage = Storage::in_memory().unwrap();
        storage.transactions.upsert(expense("food")).unwrap();

        let diagnosis = MaintenanceService::new(&storage).diagnose().unwrap();
        assert!(diagnosis.is_healthy());
        assert_eq!(diagnosis.category_count, 12);
        assert!(diagnosis.format_terminal().contains("All category references resolve"));
    }

    #[test]
    fn test_orphans_are_reported() {
        let storage = Storage::in_memory().unwrap();
        storage.transactions.upsert(expense("gone")).unwrap();
        storage.transactions.upsert(expense("gone")).unwrap();
        storage.transactions.upsert(expense("food")).unwrap();
        storage
            .budgets
            .upsert(Budget::new(
                "Pets",
                Money::from_cents(100),
                BudgetScope::Category("pets".into()),
                BudgetPeriod::Monthly,
            ))
            .unwrap();
        storage
            .budgets
            .upsert(Budget::new("All", Money::from_cents(100), BudgetScope::All, BudgetPeriod::Monthly))
            .unwrap();

        let diagnosis = MaintenanceService::new(&storage).diagnose().unwrap();

        assert_eq!(diagnosis.orphaned_transactions.len(), 2);
        assert_eq!(diagnosis.orphaned_budgets.len(), 1);
        let ids: Vec<&str> = diagnosis.missing_category_ids.iter().map(|id| id.as_str()).collect();
        assert_eq!(ids, vec!["gone", "pets"]);
        assert!(diagnosis.format_terminal().contains("gone, pets"));
    }

    #[test]
    fn test_clear_all() {
        let storage = Storage::in_memory().unwrap();
        storage.transactions.upsert(expense("food")).unwrap();
        storage.transactions.save().unwrap();

        MaintenanceService::new(&storage).clear_all().unwrap();

        assert_eq!(storage.transactions.count().unwrap(), 0);
        assert_eq!(storage.categories.count().unwrap(), 12);
    }
}
