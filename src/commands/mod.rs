pub mod due_dates;
pub mod inspect;
pub mod settings;
pub mod upcoming;

use serde_json::Value;

const RULE_WIDTH: usize = 40;

/// Pretty-print a response, followed by its top-level keys for objects
pub fn print_structure(label: &str, data: &Value) {
    let rule = "-".repeat(RULE_WIDTH);
    println!("\n{rule}\n{label}:\n{rule}");
    println!(
        "{}",
        serde_json::to_string_pretty(data).unwrap_or_else(|_| data.to_string())
    );

    if let Value::Object(map) = data {
        println!("\nTop-level keys:");
        for key in map.keys() {
            println!("  - {key}");
        }
    }
    println!("{rule}");
}

/// A string field, or `fallback` when it is absent
pub fn field<'a>(value: &'a Value, key: &str, fallback: &'a str) -> &'a str {
    value.get(key).and_then(Value::as_str).unwrap_or(fallback)
}

/// Any scalar field as display text
pub fn display_field(value: &Value, key: &str, fallback: &str) -> String {
    match value.get(key) {
        None | Some(Value::Null) => fallback.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}
