use serde_json::Value;
use std::io;

use super::{flatten, scalar_text};

type StdoutCsv<'a> = csv::Writer<io::StdoutLock<'a>>;

/// Write output as CSV to stdout. A schedule is written one row per month;
/// anything else as `field,value` pairs of the flattened result.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    let outcome = match value {
        Value::Object(map) => match (map.get("schedule"), map.get("result")) {
            (Some(Value::Array(rows)), _) => write_rows(&mut wtr, rows),
            (_, Some(result)) => write_fields(&mut wtr, result),
            _ => write_fields(&mut wtr, value),
        },
        Value::Array(rows) => write_rows(&mut wtr, rows),
        _ => wtr.write_record([scalar_text(value, "")]),
    };

    if let Err(e) = outcome.and_then(|_| wtr.flush().map_err(csv::Error::from)) {
        eprintln!("CSV write error: {e}");
    }
}

fn write_fields(wtr: &mut StdoutCsv<'_>, value: &Value) -> csv::Result<()> {
    wtr.write_record(["field", "value"])?;
    for (key, val) in flatten(value) {
        wtr.write_record([key, scalar_text(&val, "")])?;
    }
    Ok(())
}

fn write_rows(wtr: &mut StdoutCsv<'_>, rows: &[Value]) -> csv::Result<()> {
    let Some(Value::Object(first)) = rows.first() else {
        return Ok(());
    };

    let headers: Vec<&str> = first.keys().map(String::as_str).collect();
    wtr.write_record(&headers)?;
    for row in rows {
        if let Value::Object(map) = row {
            wtr.write_record(
                headers
                    .iter()
                    .map(|h| map.get(*h).map(|v| scalar_text(v, "")).unwrap_or_default()),
            )?;
        }
    }
    Ok(())
}
