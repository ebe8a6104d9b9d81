//! Category display formatting

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::models::Category;

#[derive(Tabled)]
struct CategoryRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "")]
    icon: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Type")]
    kind: &'static str,
    #[tabled(rename = "Color")]
    color: String,
}

/// Format categories as a table, income first
pub fn format_category_list(categories: &[Category]) -> String {
    if categories.is_empty() {
        return "No categories found.\n".to_string();
    }

    let mut sorted: Vec<&Category> = categories.iter().collect();
    sorted.sort_by_key(|c| c.kind);

    let rows = sorted.into_iter().map(|c| CategoryRow {
        id: c.id.to_string(),
        icon: c.icon.clone(),
        name: c.name.clone(),
        kind: c.kind.label(),
        color: c.color.clone(),
    });

    let mut table = Table::new(rows);
    table.with(Style::modern());
    format!("{}\n", table)
}

/// Format category details for display
pub fn format_category_details(category: &Category, transaction_count: usize) -> String {
    let mut output = String::new();

    output.push_str(&format!("Category:     {} {}\n", category.icon, category.name));
    output.push_str(&format!("ID:           {}\n", category.id));
    output.push_str(&format!("Type:         {}\n", category.kind.label()));
    output.push_str(&format!("Color:        {}\n", category.color));
    output.push_str(&format!("Transactions: {}\n", transaction_count));

    output
}
