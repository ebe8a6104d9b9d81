//! Configuration module for budgetbook
//!
//! Path resolution and user settings persistence.

pub mod paths;
pub mod settings;

pub use paths::BudgetbookPaths;
pub use settings::Settings;
