use serde_json::Value;

use super::scalar_text;

/// Headline fields, most specific first.
const PRIORITY_KEYS: [&str; 3] = ["dscr_ratio", "monthly_savings", "monthly_payment"];

/// Print just the headline value of the result.
///
/// Looks for a known headline field, then falls back to the first field of
/// the result object.
pub fn print_minimal(value: &Value) {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    println!("{}", headline(result_obj));
}

fn headline(result: &Value) -> String {
    let Value::Object(map) = result else {
        return scalar_text(result, "null");
    };

    for key in PRIORITY_KEYS {
        if let Some(val) = map.get(key).filter(|v| !v.is_null()) {
            return scalar_text(val, "null");
        }
    }

    match map.iter().next() {
        Some((key, val)) => format!("{key}: {}", scalar_text(val, "null")),
        None => String::new(),
    }
}
