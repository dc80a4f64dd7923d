use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::{flatten, scalar_text};

/// Render the envelope as tables: the result, the formatted `display`
/// section, then the schedule when one is present.
pub fn print_table(value: &Value) {
    let Value::Object(envelope) = value else {
        println!("{value}");
        return;
    };

    match envelope.get("result") {
        Some(result) => print_field_table(result),
        None => print_field_table(value),
    }

    if let Some(display) = envelope.get("display") {
        println!("\nSummary:");
        print_field_table(display);
    }

    if let Some(Value::Array(rows)) = envelope.get("schedule") {
        println!("\nSchedule:");
        print_row_table(rows);
    }

    print_notes(envelope);
}

fn print_field_table(value: &Value) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in flatten(value) {
        builder.push_record([key, scalar_text(&val, "null")]);
    }
    println!("{}", Table::from(builder));
}

fn print_row_table(rows: &[Value]) {
    let Some(Value::Object(first)) = rows.first() else {
        println!("(empty)");
        return;
    };

    let headers: Vec<String> = first.keys().cloned().collect();
    let mut builder = Builder::default();
    builder.push_record(headers.clone());
    for row in rows {
        if let Value::Object(map) = row {
            builder.push_record(
                headers
                    .iter()
                    .map(|h| map.get(h).map(|v| scalar_text(v, "")).unwrap_or_default()),
            );
        }
    }
    println!("{}", Table::from(builder));
}

fn print_notes(envelope: &Map<String, Value>) {
    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings.iter().filter_map(Value::as_str) {
                println!("  - {w}");
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {meth}");
    }
}
