//! Category service
//!
//! Provides business logic for category management. Deleting a category
//! leaves its transactions and budgets pointing at the removed id.

use crate::audit::EntityType;
use crate::error::{BudgetbookError, BudgetbookResult};
use crate::models::{Category, CategoryId, TransactionType};
use crate::storage::Storage;

/// Service for category management
pub struct CategoryService<'a> {
    storage: &'a Storage,
}

/// Input for creating a category
#[derive(Debug, Clone)]
pub struct CreateCategoryInput {
    pub name: String,
    pub kind: TransactionType,
    pub color: Option<String>,
    pub icon: Option<String>,
}

/// Fields to change on a category
#[derive(Debug, Clone, Default)]
pub struct UpdateCategoryInput {
    pub name: Option<String>,
    pub color: Option<String>,
    pub icon: Option<String>,
}

/// What a delete left behind
#[derive(Debug, Clone)]
pub struct DeletedCategory {
    pub category: Category,
    pub orphaned_transactions: usize,
    pub orphaned_budgets: usize,
}

impl<'a> CategoryService<'a> {
    /// Create a new category service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// All categories in insertion order
    pub fn list(&self) -> BudgetbookResult<Vec<Category>> {
        self.storage.categories.get_all()
    }

    pub fn list_by_type(&self, kind: TransactionType) -> BudgetbookResult<Vec<Category>> {
        self.storage.categories.get_by_type(kind)
    }

    pub fn get(&self, id: &CategoryId) -> BudgetbookResult<Option<Category>> {
        self.storage.categories.get(id)
    }

    /// Find a category by ID or name (case-insensitive)
    pub fn find(&self, identifier: &str) -> BudgetbookResult<Option<Category>> {
        let identifier = identifier.trim();

        // Ids first; default ids look like names
        if let Some(category) = self.storage.categories.get(&CategoryId::from(identifier))? {
            return Ok(Some(category));
        }

        self.storage.categories.get_by_name(identifier)
    }

    /// Find a category or fail with a not-found error
    pub fn require(&self, identifier: &str) -> BudgetbookResult<Category> {
        self.find(identifier)?
            .ok_or_else(|| BudgetbookError::category_not_found(identifier.trim()))
    }

    /// Create a new category
    pub fn create(&self, input: CreateCategoryInput) -> BudgetbookResult<Category> {
        let name = input.name.trim();

        if self
            .storage
            .categories
            .get_by_name_and_type(name, input.kind)?
            .is_some()
        {
            return Err(BudgetbookError::Duplicate {
                entity_type: "Category",
                identifier: name.to_string(),
            });
        }

        let mut category = Category::new(name, input.kind);
        if let Some(color) = input.color {
            category.color = color.trim().to_string();
        }
        if let Some(icon) = input.icon.filter(|i| !i.trim().is_empty()) {
            category.icon = icon.trim().to_string();
        }

        category
            .validate()
            .map_err(|e| BudgetbookError::Validation(e.to_string()))?;

        self.storage.categories.upsert(category.clone())?;
        self.storage.categories.save()?;

        self.storage.log_create(
            EntityType::Category,
            category.id.to_string(),
            Some(category.name.clone()),
            &category,
        )?;

        Ok(category)
    }

    /// Update a category's name, color or icon
    pub fn update(&self, id: &CategoryId, input: UpdateCategoryInput) -> BudgetbookResult<Category> {
        let mut category = self
            .storage
            .categories
            .get(id)?
            .ok_or_else(|| BudgetbookError::category_not_found(id.to_string()))?;

        let before = category.clone();

        if let Some(name) = input.name {
            let name = name.trim();
            if let Some(existing) = self
                .storage
                .categories
                .get_by_name_and_type(name, category.kind)?
            {
                if existing.id != category.id {
                    return Err(BudgetbookError::Duplicate {
                        entity_type: "Category",
                        identifier: name.to_string(),
                    });
                }
            }
            category.name = name.to_string();
        }
        if let Some(color) = input.color {
            category.color = color.trim().to_string();
        }
        if let Some(icon) = input.icon {
            category.icon = icon.trim().to_string();
        }

        category
            .validate()
            .map_err(|e| BudgetbookError::Validation(e.to_string()))?;

        self.storage.categories.upsert(category.clone())?;
        self.storage.categories.save()?;

        self.storage.log_update(
            EntityType::Category,
            category.id.to_string(),
            Some(category.name.clone()),
            &before,
            &category,
        )?;

        Ok(category)
    }

    /// Delete a category; transactions and budgets that used it are left as is
    pub fn delete(&self, id: &CategoryId) -> BudgetbookResult<DeletedCategory> {
        let category = self
            .storage
            .categories
            .get(id)?
            .ok_or_else(|| BudgetbookError::category_not_found(id.to_string()))?;

        let orphaned_transactions = self.storage.transactions.get_by_category(id)?.len();
        let orphaned_budgets = self
            .storage
            .budgets
            .get_all()?
            .iter()
            .filter(|b| b.scope().category_id() == Some(id))
            .count();

        if orphaned_transactions > 0 || orphaned_budgets > 0 {
            log::warn!(
                "Deleting category '{}' orphans {} transaction(s) and {} budget(s)",
                category.name,
                orphaned_transactions,
                orphaned_budgets
            );
        }

        self.storage.categories.delete(id)?;
        self.storage.categories.save()?;

        self.storage.log_delete(
            EntityType::Category,
            category.id.to_string(),
            Some(category.name.clone()),
            &category,
        )?;

        Ok(DeletedCategory {
            category,
            orphaned_transactions,
            orphaned_budgets,
        })
    }
}
