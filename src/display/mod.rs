//! Display formatting for terminal output
//!
//! Lists are drawn as tables with `tabled`; single records as aligned
//! `Label: value` blocks.

pub mod budget;
pub mod category;
pub mod transaction;

pub use budget::{format_budget_details, format_budget_list};
pub use category::{format_category_details, format_category_list};
pub use transaction::{format_transaction_details, format_transaction_list};

/// Truncate to `max_len` characters, marking the cut with "..."
pub(crate) fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
