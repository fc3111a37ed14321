use serde_json::Value;
use std::io::{self, Write};

use super::{flatten, payload, scalar_text};

/// Write output as CSV to stdout.
///
/// Series (a bare array, or the `projection` of a full analysis) become one row
/// per element, ready for charting. Anything else becomes a two-column
/// field/value listing with dotted keys for nested sections.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    let result = payload(value);
    match result {
        Value::Array(rows) => write_rows(&mut wtr, rows),
        Value::Object(map) => match map.get("projection") {
            Some(Value::Array(points)) => write_rows(&mut wtr, points),
            _ => write_fields(&mut wtr, result),
        },
        other => {
            let _ = wtr.write_record([scalar_text(other)]);
        }
    }

    let _ = wtr.flush();
}

fn write_fields<W: Write>(wtr: &mut csv::Writer<W>, value: &Value) {
    let mut fields = Vec::new();
    flatten("", value, &mut fields);

    let _ = wtr.write_record(["field", "value"]);
    for (key, val) in fields {
        let _ = wtr.write_record([key, scalar_text(&val)]);
    }
}

fn write_rows<W: Write>(wtr: &mut csv::Writer<W>, rows: &[Value]) {
    let Some(Value::Object(first)) = rows.first() else {
        for item in rows {
            let _ = wtr.write_record([scalar_text(item)]);
        }
        return;
    };

    let headers: Vec<&str> = first.keys().map(|k| k.as_str()).collect();
    let _ = wtr.write_record(&headers);

    for item in rows {
        if let Value::Object(map) = item {
            let row: Vec<String> = headers
                .iter()
                .map(|h| map.get(*h).map(scalar_text).unwrap_or_default())
                .collect();
            let _ = wtr.write_record(&row);
        }
    }
}
