//! Storage layer for budgetbook
//!
//! A [`KeyValueStore`] holds one serialized JSON array per collection.
//! [`Storage`] owns the store, the in-memory repositories loaded from it and
//! the audit logger, and is what every service borrows.

pub mod budget;
pub mod categories;
pub mod init;
pub mod kv;
pub mod transactions;

use std::sync::Arc;

use serde::Serialize;

pub use budget::BudgetRepository;
pub use categories::CategoryRepository;
pub use init::{initialize_defaults, migrate_legacy_transactions};
pub use kv::{FileStore, KeyValueStore, MemoryStore};
pub use transactions::TransactionRepository;

use crate::audit::{generate_diff, AuditEntry, AuditLogger, EntityType};
use crate::config::paths::BudgetbookPaths;
use crate::error::BudgetbookResult;

/// Main storage coordinator that provides access to all repositories
pub struct Storage {
    store: Arc<dyn KeyValueStore>,
    audit: Option<AuditLogger>,
    pub transactions: TransactionRepository,
    pub categories: CategoryRepository,
    pub budgets: BudgetRepository,
}

impl Storage {
    /// Open the file-backed store under `paths`, with audit logging
    pub fn open(paths: &BudgetbookPaths) -> BudgetbookResult<Self> {
        paths.ensure_directories()?;

        let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::open(paths.store_file())?);
        let mut storage = Self::with_store(store);
        storage.audit = Some(AuditLogger::new(paths.audit_log()));

        Ok(storage)
    }

    /// Wrap an arbitrary store; no audit log is written
    pub fn with_store(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            transactions: TransactionRepository::new(store.clone()),
            categories: CategoryRepository::new(store.clone()),
            budgets: BudgetRepository::new(store.clone()),
            audit: None,
            store,
        }
    }

    /// A loaded, seeded in-memory storage
    pub fn in_memory() -> BudgetbookResult<Self> {
        let storage = Self::with_store(Arc::new(MemoryStore::new()));
        storage.load_all()?;
        Ok(storage)
    }

    /// The underlying key/value store
    pub fn store(&self) -> &dyn KeyValueStore {
        self.store.as_ref()
    }

    pub fn audit_logger(&self) -> Option<&AuditLogger> {
        self.audit.as_ref()
    }

    /// Load all collections, seed defaults and migrate legacy records
    pub fn load_all(&self) -> BudgetbookResult<()> {
        self.transactions.load()?;
        self.categories.load()?;
        self.budgets.load()?;

        initialize_defaults(&self.categories)?;
        migrate_legacy_transactions(&self.transactions, &self.categories)?;

        Ok(())
    }

    /// Save all collections
    pub fn save_all(&self) -> BudgetbookResult<()> {
        self.transactions.save()?;
        self.categories.save()?;
        self.budgets.save()?;
        Ok(())
    }

    /// Remove every data key and start over with the default categories
    ///
    /// The theme preference is kept.
    pub fn clear_all(&self) -> BudgetbookResult<()> {
        for key in kv::DATA_KEYS {
            self.store.remove(key)?;
        }
        log::info!("Cleared all stored data");
        self.load_all()
    }

    /// Record a create operation in the audit log
    pub fn log_create<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> BudgetbookResult<()> {
        match &self.audit {
            Some(logger) => logger.log(&AuditEntry::create(entity_type, entity_id, entity_name, entity)),
            None => Ok(()),
        }
    }

    /// Record an update, with a field diff between `before` and `after`
    pub fn log_update<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        before: &T,
        after: &T,
    ) -> BudgetbookResult<()> {
        let Some(logger) = &self.audit else {
            return Ok(());
        };

        let diff = match (serde_json::to_value(before), serde_json::to_value(after)) {
            (Ok(b), Ok(a)) => generate_diff(&b, &a),
            _ => None,
        };

        logger.log(&AuditEntry::update(
            entity_type,
            entity_id,
            entity_name,
            before,
            after,
            diff,
        ))
    }

    /// Record a delete operation in the audit log
    pub fn log_delete<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> BudgetbookResult<()> {
        match &self.audit {
            Some(logger) => logger.log(&AuditEntry::delete(entity_type, entity_id, entity_name, entity)),
            None => Ok(()),
        }
    }
}
