//! Budget repository
//!
//! Budgets are kept in insertion order under `accounting_budgets`.

use std::sync::{Arc, RwLock};

use crate::error::{BudgetbookError, BudgetbookResult};
use crate::models::{Budget, BudgetId, BudgetPeriod, BudgetScope};

use super::kv::{load_array, save_array, KeyValueStore, BUDGETS_KEY};

/// Repository for budget persistence
pub struct BudgetRepository {
    store: Arc<dyn KeyValueStore>,
    data: RwLock<Vec<Budget>>,
}

impl BudgetRepository {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            data: RwLock::new(Vec::new()),
        }
    }

    /// Load budgets from the store
    pub fn load(&self) -> BudgetbookResult<()> {
        let loaded: Vec<Budget> = load_array(self.store.as_ref(), BUDGETS_KEY)?;

        let mut data = self
            .data
            .write()
            .map_err(|e| BudgetbookError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        *data = loaded;

        Ok(())
    }

    /// Save budgets to the store
    pub fn save(&self) -> BudgetbookResult<()> {
        let data = self
            .data
            .read()
            .map_err(|e| BudgetbookError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        save_array(self.store.as_ref(), BUDGETS_KEY, &data)
    }

    pub fn get(&self, id: &BudgetId) -> BudgetbookResult<Option<Budget>> {
        let data = self
            .data
            .read()
            .map_err(|e| BudgetbookError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.iter().find(|b| &b.id == id).cloned())
    }

    pub fn get_all(&self) -> BudgetbookResult<Vec<Budget>> {
        let data = self
            .data
            .read()
            .map_err(|e| BudgetbookError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.clone())
    }

    /// Get a budget by name (case-insensitive)
    pub fn get_by_name(&self, name: &str) -> BudgetbookResult<Option<Budget>> {
        let data = self
            .data
            .read()
            .map_err(|e| BudgetbookError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let name_lower = name.trim().to_lowercase();
        Ok(data
            .iter()
            .find(|b| b.name.to_lowercase() == name_lower)
            .cloned())
    }

    pub fn get_for_period(&self, period: BudgetPeriod) -> BudgetbookResult<Vec<Budget>> {
        let data = self
            .data
            .read()
            .map_err(|e| BudgetbookError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.iter().filter(|b| b.period == period).cloned().collect())
    }

    pub fn get_for_scope(&self, scope: &BudgetScope) -> BudgetbookResult<Vec<Budget>> {
        let data = self
            .data
            .read()
            .map_err(|e| BudgetbookError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data
            .iter()
            .filter(|b| &b.category_id == scope)
            .cloned()
            .collect())
    }

    /// Replace an existing budget in place, or append a new one
    pub fn upsert(&self, budget: Budget) -> BudgetbookResult<()> {
        let mut data = self
            .data
            .write()
            .map_err(|e| BudgetbookError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        match data.iter_mut().find(|b| b.id == budget.id) {
            Some(existing) => *existing = budget,
            None => data.push(budget),
        }

        Ok(())
    }

    /// Replace the whole collection
    pub fn replace_all(&self, budgets: Vec<Budget>) -> BudgetbookResult<()> {
        let mut data = self
            .data
            .write()
            .map_err(|e| BudgetbookError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        *data = budgets;
        Ok(())
    }

    pub fn delete(&self, id: &BudgetId) -> BudgetbookResult<bool> {
        let mut data = self
            .data
            .write()
            .map_err(|e| BudgetbookError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        let before = data.len();
        data.retain(|b| &b.id != id);
        Ok(data.len() != before)
    }

    pub fn count(&self) -> BudgetbookResult<usize> {
        let data = self
            .data
            .read()
            .map_err(|e| BudgetbookError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        Ok(data.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CategoryId, Money};
    use crate::storage::kv::MemoryStore;

    #[test]
    fn test_filters() {
        let repo = BudgetRepository::new(Arc::new(MemoryStore::new()));
        let food = BudgetScope::Category(CategoryId::from("food"));

        repo.upsert(Budget::new("Food", Money::from_cents(50000), food.clone(), BudgetPeriod::Monthly))
            .unwrap();
        repo.upsert(Budget::new("Total", Money::from_cents(900000), BudgetScope::All, BudgetPeriod::Yearly))
            .unwrap();

        assert_eq!(repo.get_for_period(BudgetPeriod::Monthly).unwrap().len(), 1);
        assert_eq!(repo.get_for_scope(&food).unwrap().len(), 1);
        assert_eq!(repo.get_for_scope(&BudgetScope::All).unwrap()[0].name, "Total");
        assert!(repo.get_by_name("food").unwrap().is_some());
    }

    #[test]
    fn test_save_reload_delete() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let repo = BudgetRepository::new(store.clone());
        let budget = Budget::new("Weekly", Money::from_cents(10000), BudgetScope::All, BudgetPeriod::Weekly);
        repo.upsert(budget.clone()).unwrap();
        repo.save().unwrap();

        let reloaded = BudgetRepository::new(store);
        reloaded.load().unwrap();
        assert_eq!(reloaded.count().unwrap(), 1);
        assert!(reloaded.delete(&budget.id).unwrap());
        assert_eq!(reloaded.count().unwrap(), 0);
    }
}
