//! Transaction repository
//!
//! Transactions are cached newest-first, the order they were entered in, and
//! written back as a whole array under `accounting_transactions`.

use std::sync::{Arc, RwLock};

use chrono::NaiveDate;

use crate::error::{BudgetbookError, BudgetbookResult};
use crate::models::{CategoryId, Transaction, TransactionId};

use super::kv::{load_array, save_array, KeyValueStore, TRANSACTIONS_KEY};

/// Repository for transaction persistence
pub struct TransactionRepository {
    store: Arc<dyn KeyValueStore>,
    data: RwLock<Vec<Transaction>>,
}

impl TransactionRepository {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            data: RwLock::new(Vec::new()),
        }
    }

    /// Load transactions from the store
    pub fn load(&self) -> BudgetbookResult<()> {
        let loaded: Vec<Transaction> = load_array(self.store.as_ref(), TRANSACTIONS_KEY)?;

        let mut data = self
            .data
            .write()
            .map_err(|e| BudgetbookError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        *data = loaded;

        Ok(())
    }

    /// Save transactions to the store
    pub fn save(&self) -> BudgetbookResult<()> {
        let data = self
            .data
            .read()
            .map_err(|e| BudgetbookError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        save_array(self.store.as_ref(), TRANSACTIONS_KEY, &data)
    }

    /// Get a transaction by ID
    pub fn get(&self, id: &TransactionId) -> BudgetbookResult<Option<Transaction>> {
        let data = self
            .data
            .read()
            .map_err(|e| BudgetbookError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.iter().find(|t| &t.id == id).cloned())
    }

    /// All transactions in stored order (newest entry first)
    pub fn get_all(&self) -> BudgetbookResult<Vec<Transaction>> {
        let data = self
            .data
            .read()
            .map_err(|e| BudgetbookError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.clone())
    }

    /// Transactions referencing a category
    pub fn get_by_category(&self, category_id: &CategoryId) -> BudgetbookResult<Vec<Transaction>> {
        let data = self
            .data
            .read()
            .map_err(|e| BudgetbookError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data
            .iter()
            .filter(|t| t.category_id.as_ref() == Some(category_id))
            .cloned()
            .collect())
    }

    /// Transactions dated within an inclusive range
    pub fn get_by_date_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> BudgetbookResult<Vec<Transaction>> {
        let data = self
            .data
            .read()
            .map_err(|e| BudgetbookError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data
            .iter()
            .filter(|t| t.date >= start && t.date <= end)
            .cloned()
            .collect())
    }

    /// Replace an existing transaction in place, or insert a new one at the front
    pub fn upsert(&self, txn: Transaction) -> BudgetbookResult<()> {
        let mut data = self
            .data
            .write()
            .map_err(|e| BudgetbookError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        match data.iter_mut().find(|t| t.id == txn.id) {
            Some(existing) => *existing = txn,
            None => data.insert(0, txn),
        }

        Ok(())
    }

    /// Replace the whole collection
    pub fn replace_all(&self, transactions: Vec<Transaction>) -> BudgetbookResult<()> {
        let mut data = self
            .data
            .write()
            .map_err(|e| BudgetbookError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        *data = transactions;
        Ok(())
    }

    /// Delete a transaction, returning whether it existed
    pub fn delete(&self, id: &TransactionId) -> BudgetbookResult<bool> {
        let mut data = self
            .data
            .write()
            .map_err(|e| BudgetbookError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        let before = data.len();
        data.retain(|t| &t.id != id);
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
    use crate::models::{Money, TransactionType};
    use crate::storage::kv::MemoryStore;

    fn txn(cents: i64, category: &str, day: u32) -> Transaction {
        Transaction::new(
            Money::from_cents(cents),
            TransactionType::Expense,
            CategoryId::from(category),
            NaiveDate::from_ymd_opt(2025, 10, day).unwrap(),
            "",
        )
    }

    #[test]
    fn test_new_transactions_go_first() {
        let repo = TransactionRepository::new(Arc::new(MemoryStore::new()));
        repo.load().unwrap();

        let first = txn(100, "food", 1);
        let second = txn(200, "food", 2);
        repo.upsert(first.clone()).unwrap();
        repo.upsert(second.clone()).unwrap();

        let all = repo.get_all().unwrap();
        assert_eq!(all[0].id, second.id);
        assert_eq!(all[1].id, first.id);
    }

    #[test]
    fn test_upsert_replaces_in_place() {
        let repo = TransactionRepository::new(Arc::new(MemoryStore::new()));
        let mut a = txn(100, "food", 1);
        let b = txn(200, "food", 2);
        repo.upsert(a.clone()).unwrap();
        repo.upsert(b).unwrap();

        a.description = "edited".into();
        repo.upsert(a.clone()).unwrap();

        let all = repo.get_all().unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[1].description, "edited");
    }

    #[test]
    fn test_save_and_reload() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let repo = TransactionRepository::new(store.clone());
        let t = txn(4250, "transport", 5);
        repo.upsert(t.clone()).unwrap();
        repo.save().unwrap();

        let reloaded = TransactionRepository::new(store);
        reloaded.load().unwrap();
        assert_eq!(reloaded.count().unwrap(), 1);
        assert_eq!(reloaded.get(&t.id).unwrap().unwrap().amount.cents(), 4250);
    }

    #[test]
    fn test_queries_and_delete() {
        let repo = TransactionRepository::new(Arc::new(MemoryStore::new()));
        let a = txn(100, "food", 1);
        let b = txn(200, "housing", 10);
        repo.upsert(a.clone()).unwrap();
        repo.upsert(b).unwrap();

        assert_eq!(repo.get_by_category(&CategoryId::from("food")).unwrap().len(), 1);
        let early = repo
            .get_by_date_range(
                NaiveDate::from_ymd_opt(2025, 10, 1).unwrap(),
                NaiveDate::from_ymd_opt(2025, 10, 5).unwrap(),
            )
            .unwrap();
        assert_eq!(early.len(), 1);

        assert!(repo.delete(&a.id).unwrap());
        assert!(!repo.delete(&a.id).unwrap());
        assert_eq!(repo.count().unwrap(), 1);
    }
}
