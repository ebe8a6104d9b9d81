//! Core data models for budgetbook
//!
//! Plain records persisted as JSON arrays: transactions, categories and
//! budgets, plus the value types they are built from.

pub mod budget;
pub mod category;
pub mod ids;
pub mod money;
pub mod period;
pub mod transaction;

pub use budget::{Budget, BudgetScope, BudgetValidationError, ALL_CATEGORIES};
pub use category::{
    default_categories, Category, CategoryValidationError, DEFAULT_CATEGORY_COLOR,
    DEFAULT_CATEGORY_ICON,
};
pub use ids::{BudgetId, CategoryId, TransactionId};
pub use money::{Money, MoneyParseError, MAX_AMOUNT};
pub use period::{first_of_month, parse_date, shift_months, BudgetPeriod, DateRange, StatsRange};
pub use transaction::{Transaction, TransactionType, TransactionValidationError};
