//! Category repository
//!
//! Categories are kept in insertion order under `accounting_categories`.

use std::sync::{Arc, RwLock};

use crate::error::{BudgetbookError, BudgetbookResult};
use crate::models::{Category, CategoryId, TransactionType};

use super::kv::{load_array, save_array, KeyValueStore, CATEGORIES_KEY};

/// Repository for category persistence
pub struct CategoryRepository {
    store: Arc<dyn KeyValueStore>,
    data: RwLock<Vec<Category>>,
}

impl CategoryRepository {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            data: RwLock::new(Vec::new()),
        }
    }

    /// Load categories from the store
    pub fn load(&self) -> BudgetbookResult<()> {
        let loaded: Vec<Category> = load_array(self.store.as_ref(), CATEGORIES_KEY)?;

        let mut data = self
            .data
            .write()
            .map_err(|e| BudgetbookError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        *data = loaded;

        Ok(())
    }

    /// Save categories to the store
    pub fn save(&self) -> BudgetbookResult<()> {
        let data = self
            .data
            .read()
            .map_err(|e| BudgetbookError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        save_array(self.store.as_ref(), CATEGORIES_KEY, &data)
    }

    /// Get a category by ID
    pub fn get(&self, id: &CategoryId) -> BudgetbookResult<Option<Category>> {
        let data = self
            .data
            .read()
            .map_err(|e| BudgetbookError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.iter().find(|c| &c.id == id).cloned())
    }

    pub fn get_all(&self) -> BudgetbookResult<Vec<Category>> {
        let data = self
            .data
            .read()
            .map_err(|e| BudgetbookError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.clone())
    }

    /// Categories of one type, in insertion order
    pub fn get_by_type(&self, kind: TransactionType) -> BudgetbookResult<Vec<Category>> {
        let data = self
            .data
            .read()
            .map_err(|e| BudgetbookError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.iter().filter(|c| c.kind == kind).cloned().collect())
    }

    /// Get a category by name (case-insensitive)
    pub fn get_by_name(&self, name: &str) -> BudgetbookResult<Option<Category>> {
        let data = self
            .data
            .read()
            .map_err(|e| BudgetbookError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let name_lower = name.trim().to_lowercase();
        Ok(data
            .iter()
            .find(|c| c.name.to_lowercase() == name_lower)
            .cloned())
    }

    /// Exact name and type match, as used when merging imports
    pub fn get_by_name_and_type(
        &self,
        name: &str,
        kind: TransactionType,
    ) -> BudgetbookResult<Option<Category>> {
        let data = self
            .data
            .read()
            .map_err(|e| BudgetbookError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data
            .iter()
            .find(|c| c.name == name && c.kind == kind)
            .cloned())
    }

    /// Replace an existing category in place, or append a new one
    pub fn upsert(&self, category: Category) -> BudgetbookResult<()> {
        let mut data = self
            .data
            .write()
            .map_err(|e| BudgetbookError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        match data.iter_mut().find(|c| c.id == category.id) {
            Some(existing) => *existing = category,
            None => data.push(category),
        }

        Ok(())
    }

    /// Replace the whole collection
    pub fn replace_all(&self, categories: Vec<Category>) -> BudgetbookResult<()> {
        let mut data = self
            .data
            .write()
            .map_err(|e| BudgetbookError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        *data = categories;
        Ok(())
    }

    /// Delete a category, returning whether it existed
    pub fn delete(&self, id: &CategoryId) -> BudgetbookResult<bool> {
        let mut data = self
            .data
            .write()
            .map_err(|e| BudgetbookError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        let before = data.len();
        data.retain(|c| &c.id != id);
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
    use crate::storage::kv::MemoryStore;

    fn create_test_repo() -> CategoryRepository {
        let repo = CategoryRepository::new(Arc::new(MemoryStore::new()));
        repo.load().unwrap();
        repo
    }

    #[test]
    fn test_empty_load() {
        let repo = create_test_repo();
        assert_eq!(repo.count().unwrap(), 0);
    }

    #[test]
    fn test_insertion_order_and_lookup() {
        let repo = create_test_repo();
        let gifts = Category::new("Gifts", TransactionType::Income);
        let pets = Category::new("Pets", TransactionType::Expense);
        repo.upsert(gifts.clone()).unwrap();
        repo.upsert(pets.clone()).unwrap();

        let all = repo.get_all().unwrap();
        assert_eq!(all[0].name, "Gifts");
        assert_eq!(all[1].name, "Pets");

        assert!(repo.get_by_name("PETS").unwrap().is_some());
        assert!(repo
            .get_by_name_and_type("Pets", TransactionType::Income)
            .unwrap()
            .is_none());
        assert_eq!(repo.get_by_type(TransactionType::Income).unwrap().len(), 1);
    }

    #[test]
    fn test_save_and_reload() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let repo = CategoryRepository::new(store.clone());
        let cat = Category::new("Rent", TransactionType::Expense);
        repo.upsert(cat.clone()).unwrap();
        repo.save().unwrap();

        let repo2 = CategoryRepository::new(store);
        repo2.load().unwrap();
        assert_eq!(repo2.get(&cat.id).unwrap().unwrap().name, "Rent");
    }

    #[test]
    fn test_delete() {
        let repo = create_test_repo();
        let cat = Category::new("Rent", TransactionType::Expense);
        repo.upsert(cat.clone()).unwrap();

        assert!(repo.delete(&cat.id).unwrap());
        assert_eq!(repo.count().unwrap(), 0);
    }
}
