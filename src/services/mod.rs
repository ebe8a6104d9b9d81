//! Service layer for budgetbook
//!
//! The service layer provides business logic on top of the storage layer,
//! handling validation, audit logging, and cross-entity operations.

pub mod budget;
pub mod category;
pub mod import;
pub mod maintenance;
pub mod transaction;

pub use budget::{BudgetService, CreateBudgetInput, UpdateBudgetInput};
pub use category::{CategoryService, CreateCategoryInput, DeletedCategory, UpdateCategoryInput};
pub use import::{CollectionSummary, ImportPlan, ImportService, ImportSummary};
pub use maintenance::{Diagnosis, MaintenanceService};
pub use transaction::{
    CreateTransactionInput, TransactionFilter, TransactionService, UpdateTransactionInput,
};
