//! Field-level diffs between record snapshots

use serde_json::Value;

const MAX_TEXT: usize = 40;

/// Summarize top-level field changes between two snapshots
///
/// `None` when nothing changed.
pub fn generate_diff(before: &Value, after: &Value) -> Option<String> {
    let changes = match (before, after) {
        (Value::Object(b), Value::Object(a)) => {
            let mut changes = Vec::new();
            for (key, old) in b {
                match a.get(key) {
                    Some(new) if new != old => changes.push(format!(
                        "{}: {} -> {}",
                        key,
                        format_value(old),
                        format_value(new)
                    )),
                    Some(_) => {}
                    None => changes.push(format!("{}: {} -> (removed)", key, format_value(old))),
                }
            }
            for (key, new) in a {
                if !b.contains_key(key) {
                    changes.push(format!("{}: (added) -> {}", key, format_value(new)));
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
        Value::String(s) if s.chars().count() > MAX_TEXT => {
            let head: String = s.chars().take(MAX_TEXT - 3).collect();
            format!("\"{}...\"", head)
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
    fn test_no_changes() {
        let v = json!({"name": "Amina", "age": 34});
        assert_eq!(generate_diff(&v, &v), None);
    }

    #[test]
    fn test_changed_added_removed() {
        let before = json!({"name": "Amina", "phone": "0600"});
        let after = json!({"name": "Amina B.", "insurance": "CNSS"});
        let diff = generate_diff(&before, &after).unwrap();
        assert!(diff.contains("name: \"Amina\" -> \"Amina B.\""));
        assert!(diff.contains("phone: \"0600\" -> (removed)"));
        assert!(diff.contains("insurance: (added) -> \"CNSS\""));
    }

    #[test]
    fn test_long_text_truncated_on_char_boundary() {
        let before = json!({"description": "é".repeat(60)});
        let after = json!({"description": "short"});
        let diff = generate_diff(&before, &after).unwrap();
        assert!(diff.contains("...\""));
    }

    #[test]
    fn test_collections_summarized() {
        let before = json!({"services": [1, 2]});
        let after = json!({"services": [1, 2, 3]});
        assert_eq!(
            generate_diff(&before, &after).as_deref(),
            Some("services: [2 items] -> [3 items]")
        );
    }

    #[test]
    fn test_scalars() {
        assert_eq!(generate_diff(&json!(1), &json!(2)).as_deref(), Some("1 -> 2"));
    }
}
