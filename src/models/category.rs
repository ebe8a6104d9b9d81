//! Category model
//!
//! Categories classify transactions as a kind of income or expense and carry
//! the color and icon used when rendering them.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::CategoryId;
use super::transaction::TransactionType;

/// Color given to categories created without one
pub const DEFAULT_CATEGORY_COLOR: &str = "#666666";

/// Icon given to categories created without one
pub const DEFAULT_CATEGORY_ICON: &str = "💰";

/// A transaction category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,

    pub name: String,

    #[serde(rename = "type")]
    pub kind: TransactionType,

    /// CSS color, e.g. `#FF5722`
    #[serde(default = "default_color")]
    pub color: String,

    #[serde(default = "default_icon")]
    pub icon: String,
}

fn default_color() -> String {
    DEFAULT_CATEGORY_COLOR.to_string()
}

fn default_icon() -> String {
    DEFAULT_CATEGORY_ICON.to_string()
}

impl Category {
    /// Create a new category with a fresh id and the default look
    pub fn new(name: impl Into<String>, kind: TransactionType) -> Self {
        Self {
            id: CategoryId::new(),
            name: name.into(),
            kind,
            color: default_color(),
            icon: default_icon(),
        }
    }

    /// Create a category with a fixed id, color and icon
    pub fn with_id(
        id: impl Into<CategoryId>,
        name: impl Into<String>,
        kind: TransactionType,
        color: impl Into<String>,
        icon: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            color: color.into(),
            icon: icon.into(),
        }
    }

    /// Validate the category
    pub fn validate(&self) -> Result<(), CategoryValidationError> {
        if self.name.trim().is_empty() {
            return Err(CategoryValidationError::EmptyName);
        }

        if self.name.len() > 50 {
            return Err(CategoryValidationError::NameTooLong(self.name.len()));
        }

        if !is_css_color(&self.color) {
            return Err(CategoryValidationError::InvalidColor(self.color.clone()));
        }

        Ok(())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.icon, self.name)
    }
}

/// `#rgb` or `#rrggbb`
fn is_css_color(color: &str) -> bool {
    match color.strip_prefix('#') {
        Some(hex) => (hex.len() == 3 || hex.len() == 6) && hex.chars().all(|c| c.is_ascii_hexdigit()),
        None => false,
    }
}

/// Validation errors for categories
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryValidationError {
    EmptyName,
    NameTooLong(usize),
    InvalidColor(String),
}

impl fmt::Display for CategoryValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Category name cannot be empty"),
            Self::NameTooLong(len) => {
                write!(f, "Category name too long ({} chars, max 50)", len)
            }
            Self::InvalidColor(color) => {
                write!(f, "Invalid color '{}'. Use #rgb or #rrggbb", color)
            }
        }
    }
}

impl std::error::Error for CategoryValidationError {}

/// The categories a fresh store starts with
pub fn default_categories() -> Vec<Category> {
    use TransactionType::{Expense, Income};

    vec![
        Category::with_id("salary", "Salary", Income, "#4CAF50", "💰"),
        Category::with_id("bonus", "Bonus", Income, "#8BC34A", "🎁"),
        Category::with_id("investment", "Investment", Income, "#CDDC39", "📈"),
        Category::with_id("other_income", "Other income", Income, "#FFC107", "💵"),
        Category::with_id("food", "Food", Expense, "#FF5722", "🍽️"),
        Category::with_id("transport", "Transport", Expense, "#FF9800", "🚗"),
        Category::with_id("shopping", "Shopping", Expense, "#E91E63", "🛍️"),
        Category::with_id("entertainment", "Entertainment", Expense, "#9C27B0", "🎬"),
        Category::with_id("healthcare", "Healthcare", Expense, "#F44336", "🏥"),
        Category::with_id("education", "Education", Expense, "#3F51B5", "📚"),
        Category::with_id("housing", "Housing", Expense, "#607D8B", "🏠"),
        Category::with_id("other_expense", "Other expense", Expense, "#795548", "💸"),
    ]
}
