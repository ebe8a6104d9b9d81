//! Transaction model
//!
//! A transaction is a single income or expense entry. Amounts are always
//! positive; the direction comes from the transaction type.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ids::{CategoryId, TransactionId};
use super::money::Money;

/// Direction of a transaction, shared with categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    #[default]
    Expense,
}

impl TransactionType {
    /// Capitalized label used in CSV and tables
    pub fn label(&self) -> &'static str {
        match self {
            Self::Income => "Income",
            Self::Expense => "Expense",
        }
    }

    /// +1 for income, -1 for expense
    pub fn sign(&self) -> i64 {
        match self {
            Self::Income => 1,
            Self::Expense => -1,
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Income => write!(f, "income"),
            Self::Expense => write!(f, "expense"),
        }
    }
}

impl FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "income" | "in" => Ok(Self::Income),
            "expense" | "out" => Ok(Self::Expense),
            other => Err(format!("Unknown type '{}'. Use income or expense", other)),
        }
    }
}

/// A financial transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: TransactionId,

    /// Always positive
    pub amount: Money,

    #[serde(rename = "type")]
    pub kind: TransactionType,

    /// May point at a category that no longer exists
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<CategoryId>,

    pub date: NaiveDate,

    #[serde(default)]
    pub description: String,

    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,

    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,

    /// Category reference written by old versions, either an id or a name.
    /// Cleared once migrated to `category_id`; kept if it resolves to nothing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl Transaction {
    /// Create a new transaction
    pub fn new(
        amount: Money,
        kind: TransactionType,
        category_id: CategoryId,
        date: NaiveDate,
        description: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: TransactionId::new(),
            amount,
            kind,
            category_id: Some(category_id),
            date,
            description: description.into(),
            created_at: now,
            updated_at: now,
            category: None,
        }
    }

    pub fn is_income(&self) -> bool {
        self.kind == TransactionType::Income
    }

    pub fn is_expense(&self) -> bool {
        self.kind == TransactionType::Expense
    }

    /// Amount with sign applied (expenses negative)
    pub fn signed_amount(&self) -> Money {
        Money::from_cents(self.amount.cents() * self.kind.sign())
    }

    /// Whether the record still uses the pre-`categoryId` layout
    pub fn needs_category_migration(&self) -> bool {
        self.category_id.is_none() && self.category.is_some()
    }

    /// Check input-time invariants
    pub fn validate(&self) -> Result<(), TransactionValidationError> {
        if !self.amount.is_valid_entry_amount() {
            return Err(TransactionValidationError::InvalidAmount(self.amount));
        }

        match &self.category_id {
            Some(id) if !id.as_str().trim().is_empty() => {}
            _ => return Err(TransactionValidationError::MissingCategory),
        }

        Ok(())
    }
}

/// Validation errors for transactions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionValidationError {
    InvalidAmount(Money),
    MissingCategory,
}

impl fmt::Display for TransactionValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidAmount(amount) => write!(
                f,
                "Amount must be greater than 0 and at most 999999999 (got {})",
                amount
            ),
            Self::MissingCategory => write!(f, "Please choose a category"),
        }
    }
}

impl std::error::Error for TransactionValidationError {}
