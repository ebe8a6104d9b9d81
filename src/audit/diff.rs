//! One-line summaries of what changed between two record snapshots

use serde_json::Value;

const MAX_SHOWN_CHARS: usize = 40;

/// Summarize top-level field changes: `amount: 12.5 -> 14, description: "" -> "Taxi"`
///
/// Returns `None` when nothing changed.
pub fn generate_diff(before: &Value, after: &Value) -> Option<String> {
    let changes = match (before, after) {
        (Value::Object(old), Value::Object(new)) => {
            let mut changes = Vec::new();

            for (key, old_value) in old {
                match new.get(key) {
                    Some(new_value) if new_value == old_value => {}
                    Some(new_value) => changes.push(format!(
                        "{}: {} -> {}",
                        key,
                        format_value(old_value),
                        format_value(new_value)
                    )),
                    None => changes.push(format!("{}: {} -> (removed)", key, format_value(old_value))),
                }
            }

            for (key, new_value) in new {
                if !old.contains_key(key) {
                    changes.push(format!("{}: (added) -> {}", key, format_value(new_value)));
                }
            }

            changes
        }
        _ if before != after => vec![format!("{} -> {}", format_value(before), format_value(after))],
        _ => Vec::new(),
    };

    if changes.is_empty() {
        None
    } else {
        Some(changes.join(", "))
    }
}

fn format_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) if s.chars().count() > MAX_SHOWN_CHARS => {
            let shown: String = s.chars().take(MAX_SHOWN_CHARS - 3).collect();
            format!("\"{}...\"", shown)
        }
        Value::String(s) => format!("\"{}\"", s),
        Value::Array(items) => format!("[{} items]", items.len()),
        Value::Object(fields) => format!("{{{} fields}}", fields.len()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_changed_fields_only() {
        let before = json!({"amount": 12.5, "type": "expense", "description": ""});
        let after = json!({"amount": 14, "type": "expense", "description": "Taxi"});

        let diff = generate_diff(&before, &after).unwrap();
        assert!(diff.contains("amount: 12.5 -> 14"));
        assert!(diff.contains("description: \"\" -> \"Taxi\""));
        assert!(!diff.contains("type"));
    }

    #[test]
    fn test_added_and_removed_fields() {
        let before = json!({"category": "Food"});
        let after = json!({"categoryId": "food"});

        let diff = generate_diff(&before, &after).unwrap();
        assert!(diff.contains("category: \"Food\" -> (removed)"));
        assert!(diff.contains("categoryId: (added) -> \"food\""));
    }

    #[test]
    fn test_no_changes() {
        let value = json!({"name": "Food"});
        assert!(generate_diff(&value, &value).is_none());
    }

    #[test]
    fn test_long_multibyte_strings_are_truncated_safely() {
        let before = json!({"description": "午餐".repeat(40)});
        let after = json!({"description": "晚餐"});

        let diff = generate_diff(&before, &after).unwrap();
        assert!(diff.contains("...\""));
    }

    #[test]
    fn test_scalar_values() {
        assert_eq!(generate_diff(&json!(1), &json!(2)).as_deref(), Some("1 -> 2"));
        assert_eq!(format_value(&json!([1, 2])), "[2 items]");
    }
}
