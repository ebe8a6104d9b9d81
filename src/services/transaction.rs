//! Transaction service
//!
//! Validated CRUD over transactions plus the filtered listing used by the
//! transaction list and the dashboard.

use std::collections::HashMap;

use chrono::{NaiveDate, Utc};

use crate::audit::EntityType;
use crate::error::{BudgetbookError, BudgetbookResult};
use crate::models::{
    CategoryId, DateRange, Money, Transaction, TransactionId, TransactionType,
};
use crate::storage::Storage;

/// Service for transaction management
pub struct TransactionService<'a> {
    storage: &'a Storage,
}

/// Options for filtering transactions
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    pub kind: Option<TransactionType>,
    pub category_id: Option<CategoryId>,
    /// Exact date match
    pub date: Option<NaiveDate>,
    /// Inclusive date range
    pub range: Option<DateRange>,
    /// Case-insensitive match against description or category name
    pub search: Option<String>,
    pub limit: Option<usize>,
}

impl TransactionFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn kind(mut self, kind: TransactionType) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn category(mut self, category_id: CategoryId) -> Self {
        self.category_id = Some(category_id);
        self
    }

    pub fn date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn range(mut self, range: DateRange) -> Self {
        self.range = Some(range);
        self
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        let term = term.into();
        self.search = if term.trim().is_empty() { None } else { Some(term) };
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Whether a transaction passes every condition except the limit
    pub fn matches(&self, txn: &Transaction, category_names: &HashMap<CategoryId, String>) -> bool {
        if self.kind.is_some_and(|kind| txn.kind != kind) {
            return false;
        }

        if let Some(category_id) = &self.category_id {
            if txn.category_id.as_ref() != Some(category_id) {
                return false;
            }
        }

        if self.date.is_some_and(|date| txn.date != date) {
            return false;
        }

        if self.range.is_some_and(|range| !range.contains(txn.date)) {
            return false;
        }

        if let Some(term) = &self.search {
            let term = term.trim().to_lowercase();
            let in_description = txn.description.to_lowercase().contains(&term);
            let in_category = txn
                .category_id
                .as_ref()
                .and_then(|id| category_names.get(id))
                .is_some_and(|name| name.to_lowercase().contains(&term));
            if !in_description && !in_category {
                return false;
            }
        }

        true
    }
}

/// Input for creating a new transaction
#[derive(Debug, Clone)]
pub struct CreateTransactionInput {
    pub amount: Money,
    pub kind: TransactionType,
    pub category_id: CategoryId,
    pub date: NaiveDate,
    pub description: Option<String>,
}

/// Fields to change on an existing transaction; `None` leaves a field as is
#[derive(Debug, Clone, Default)]
pub struct UpdateTransactionInput {
    pub amount: Option<Money>,
    pub kind: Option<TransactionType>,
    pub category_id: Option<CategoryId>,
    pub date: Option<NaiveDate>,
    pub description: Option<String>,
}

impl<'a> TransactionService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Create a new transaction at the front of the list
    pub fn create(&self, input: CreateTransactionInput) -> BudgetbookResult<Transaction> {
        let txn = Transaction::new(
            input.amount,
            input.kind,
            input.category_id,
            input.date,
            input.description.unwrap_or_default().trim(),
        );

        txn.validate()
            .map_err(|e| BudgetbookError::Validation(e.to_string()))?;

        self.storage.transactions.upsert(txn.clone())?;
        self.storage.transactions.save()?;

        self.storage.log_create(
            EntityType::Transaction,
            txn.id.to_string(),
            label(&txn),
            &txn,
        )?;

        Ok(txn)
    }

    pub fn get(&self, id: &TransactionId) -> BudgetbookResult<Option<Transaction>> {
        self.storage.transactions.get(id)
    }

    /// Find a transaction by full id or unique id prefix
    pub fn find(&self, identifier: &str) -> BudgetbookResult<Option<Transaction>> {
        let identifier = identifier.trim();
        if let Some(txn) = self.storage.transactions.get(&TransactionId::from(identifier))? {
            return Ok(Some(txn));
        }

        if identifier.len() < 4 {
            return Ok(None);
        }

        let mut matches: Vec<Transaction> = self
            .storage
            .transactions
            .get_all()?
            .into_iter()
            .filter(|t| t.id.as_str().starts_with(identifier))
            .collect();

        match matches.len() {
            1 => Ok(matches.pop()),
            0 => Ok(None),
            n => Err(BudgetbookError::Validation(format!(
                "Id prefix '{}' matches {} transactions",
                identifier, n
            ))),
        }
    }

    /// Merge changes into an existing transaction and refresh `updatedAt`
    pub fn update(
        &self,
        id: &TransactionId,
        input: UpdateTransactionInput,
    ) -> BudgetbookResult<Transaction> {
        let mut txn = self
            .storage
            .transactions
            .get(id)?
            .ok_or_else(|| BudgetbookError::transaction_not_found(id.to_string()))?;

        let before = txn.clone();

        if let Some(amount) = input.amount {
            txn.amount = amount;
        }
        if let Some(kind) = input.kind {
            txn.kind = kind;
        }
        if let Some(category_id) = input.category_id {
            txn.category_id = Some(category_id);
            txn.category = None;
        }
        if let Some(date) = input.date {
            txn.date = date;
        }
        if let Some(description) = input.description {
            txn.description = description.trim().to_string();
        }

        txn.validate()
            .map_err(|e| BudgetbookError::Validation(e.to_string()))?;
        txn.updated_at = Utc::now();

        self.storage.transactions.upsert(txn.clone())?;
        self.storage.transactions.save()?;

        self.storage.log_update(
            EntityType::Transaction,
            txn.id.to_string(),
            label(&txn),
            &before,
            &txn,
        )?;

        Ok(txn)
    }

    /// Delete a transaction, returning whether one was removed
    pub fn delete(&self, id: &TransactionId) -> BudgetbookResult<bool> {
        let Some(txn) = self.storage.transactions.get(id)? else {
            return Ok(false);
        };

        self.storage.transactions.delete(id)?;
        self.storage.transactions.save()?;

        self.storage.log_delete(
            EntityType::Transaction,
            txn.id.to_string(),
            label(&txn),
            &txn,
        )?;

        Ok(true)
    }

    /// Filtered list, newest date first, ties broken by creation time
    pub fn list(&self, filter: &TransactionFilter) -> BudgetbookResult<Vec<Transaction>> {
        let category_names: HashMap<CategoryId, String> = self
            .storage
            .categories
            .get_all()?
            .into_iter()
            .map(|c| (c.id, c.name))
            .collect();

        let mut transactions: Vec<Transaction> = self
            .storage
            .transactions
            .get_all()?
            .into_iter()
            .filter(|t| filter.matches(t, &category_names))
            .collect();

        transactions.sort_by(|a, b| {
            b.date
                .cmp(&a.date)
                .then_with(|| b.created_at.cmp(&a.created_at))
        });

        if let Some(limit) = filter.limit {
            transactions.truncate(limit);
        }

        Ok(transactions)
    }

    /// The most recently entered transactions, in entry order
    pub fn recent(&self, count: usize) -> BudgetbookResult<Vec<Transaction>> {
        let mut all = self.storage.transactions.get_all()?;
        all.truncate(count);
        Ok(all)
    }

    pub fn count(&self) -> BudgetbookResult<usize> {
        self.storage.transactions.count()
    }
}

fn label(txn: &Transaction) -> Option<String> {
    if txn.description.is_empty() {
        None
    } else {
        Some(txn.description.clone())
    }
}
