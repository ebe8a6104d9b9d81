//! Budget model
//!
//! A budget caps expense spending for one category, or for all expenses,
//! over a recurring weekly, monthly or yearly window.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use super::ids::{BudgetId, CategoryId};
use super::money::Money;
use super::period::BudgetPeriod;

/// Literal stored in `categoryId` for budgets covering every expense
pub const ALL_CATEGORIES: &str = "all";

/// Which expenses count against a budget
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BudgetScope {
    All,
    Category(CategoryId),
}

impl BudgetScope {
    /// Parse the stored form: `"all"` or a category id
    pub fn from_stored(value: &str) -> Self {
        if value == ALL_CATEGORIES || value.is_empty() {
            Self::All
        } else {
            Self::Category(CategoryId::from(value))
        }
    }

    pub fn as_stored(&self) -> &str {
        match self {
            Self::All => ALL_CATEGORIES,
            Self::Category(id) => id.as_str(),
        }
    }

    /// Whether an expense in `category_id` counts against this scope
    pub fn covers(&self, category_id: Option<&CategoryId>) -> bool {
        match self {
            Self::All => true,
            Self::Category(id) => category_id == Some(id),
        }
    }

    pub fn category_id(&self) -> Option<&CategoryId> {
        match self {
            Self::All => None,
            Self::Category(id) => Some(id),
        }
    }
}

impl Default for BudgetScope {
    fn default() -> Self {
        Self::All
    }
}

impl fmt::Display for BudgetScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_stored())
    }
}

impl Serialize for BudgetScope {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_stored())
    }
}

impl<'de> Deserialize<'de> for BudgetScope {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Option::<String>::deserialize(deserializer)?;
        Ok(value.map_or(Self::All, |v| Self::from_stored(&v)))
    }
}

/// A spending budget
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    pub id: BudgetId,

    pub name: String,

    /// Spending cap per period
    pub amount: Money,

    #[serde(default)]
    pub category_id: BudgetScope,

    #[serde(default)]
    pub period: BudgetPeriod,

    #[serde(default)]
    pub description: String,

    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,

    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl Budget {
    /// Create a new budget
    pub fn new(
        name: impl Into<String>,
        amount: Money,
        scope: BudgetScope,
        period: BudgetPeriod,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: BudgetId::new(),
            name: name.into(),
            amount,
            category_id: scope,
            period,
            description: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn scope(&self) -> &BudgetScope {
        &self.category_id
    }

    /// Validate the budget
    pub fn validate(&self) -> Result<(), BudgetValidationError> {
        if self.name.trim().is_empty() {
            return Err(BudgetValidationError::EmptyName);
        }

        if !self.amount.is_valid_entry_amount() {
            return Err(BudgetValidationError::InvalidAmount(self.amount));
        }

        Ok(())
    }
}

/// Validation errors for budgets
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BudgetValidationError {
    EmptyName,
    InvalidAmount(Money),
}

impl fmt::Display for BudgetValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Budget name cannot be empty"),
            Self::InvalidAmount(amount) => write!(
                f,
                "Budget amount must be greater than 0 and at most 999999999 (got {})",
                amount
            ),
        }
    }
}

impl std::error::Error for BudgetValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_serialization() {
        let all = serde_json::to_string(&BudgetScope::All).unwrap();
        assert_eq!(all, "\"all\"");

        let food: BudgetScope = serde_json::from_str("\"food\"").unwrap();
        assert_eq!(food, BudgetScope::Category(CategoryId::from("food")));

        let missing: BudgetScope = serde_json::from_str("null").unwrap();
        assert_eq!(missing, BudgetScope::All);
    }

    #[test]
    fn test_scope_covers() {
        let food = CategoryId::from("food");
        let rent = CategoryId::from("housing");

        assert!(BudgetScope::All.covers(Some(&food)));
        assert!(BudgetScope::All.covers(None));
        assert!(BudgetScope::Category(food.clone()).covers(Some(&food)));
        assert!(!BudgetScope::Category(food).covers(Some(&rent)));
    }

    #[test]
    fn test_budget_round_trip_shape() {
        let budget = Budget::new(
            "Groceries",
            Money::from_cents(150000),
            BudgetScope::Category(CategoryId::from("food")),
            BudgetPeriod::Monthly,
        );
        let value = serde_json::to_value(&budget).unwrap();
        assert_eq!(value["categoryId"], "food");
        assert_eq!(value["period"], "monthly");
        assert_eq!(value["amount"], 1500.0);
    }

    #[test]
    fn test_validation() {
        let mut budget = Budget::new("", Money::from_cents(100), BudgetScope::All, BudgetPeriod::Weekly);
        assert_eq!(budget.validate(), Err(BudgetValidationError::EmptyName));

        budget.name = "Weekly cap".into();
        budget.amount = Money::zero();
        assert!(matches!(
            budget.validate(),
            Err(BudgetValidationError::InvalidAmount(_))
        ));
    }
}
