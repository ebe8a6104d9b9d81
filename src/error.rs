//! Custom error types for budgetbook
//!
//! Errors fall in two broad families: validation errors, which are caused by
//! bad user input and reported back as messages, and storage errors, which are
//! logged and propagated.

use thiserror::Error;

/// The main error type for budgetbook operations
#[derive(Error, Debug)]
pub enum BudgetbookError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Validation errors for user input
    #[error("Validation error: {0}")]
    Validation(String),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Duplicate entity errors
    #[error("{entity_type} already exists: {identifier}")]
    Duplicate {
        entity_type: &'static str,
        identifier: String,
    },

    /// Import errors
    #[error("Import error: {0}")]
    Import(String),

    /// Export errors
    #[error("Export error: {0}")]
    Export(String),

    /// HTML rendering errors
    #[error("Render error: {0}")]
    Render(String),

    /// Persistent store errors
    #[error("Storage error: {0}")]
    Storage(String),
}

impl BudgetbookError {
    /// Create a "not found" error for categories
    pub fn category_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Category",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for transactions
    pub fn transaction_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Transaction",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for budgets
    pub fn budget_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Budget",
            identifier: identifier.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Errors the user can fix by changing their input
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::Validation(_) | Self::NotFound { .. } | Self::Duplicate { .. } | Self::Import(_)
        )
    }
}

impl From<std::io::Error> for BudgetbookError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for BudgetbookError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<csv::Error> for BudgetbookError {
    fn from(err: csv::Error) -> Self {
        Self::Export(err.to_string())
    }
}

impl From<askama::Error> for BudgetbookError {
    fn from(err: askama::Error) -> Self {
        Self::Render(err.to_string())
    }
}

/// Result type alias for budgetbook operations
pub type BudgetbookResult<T> = Result<T, BudgetbookError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BudgetbookError::Config("test error".into());
        assert_eq!(err.to_string(), "Configuration error: test error");
    }

    #[test]
    fn test_not_found_error() {
        let err = BudgetbookError::category_not_found("food");
        assert_eq!(err.to_string(), "Category not found: food");
        assert!(err.is_not_found());
        assert!(err.is_user_error());
    }

    #[test]
    fn test_storage_error_is_not_user_error() {
        let err = BudgetbookError::Storage("disk full".into());
        assert!(!err.is_user_error());
        assert!(!err.is_validation());
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: BudgetbookError = io_err.into();
        assert!(matches!(err, BudgetbookError::Io(_)));
    }
}
