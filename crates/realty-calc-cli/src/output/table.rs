use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::{flatten, payload, scalar_text};

/// Format output as tables using the tabled crate.
///
/// Scalar fields go into one Field/Value table; nested objects are flattened
/// into it with dotted keys, and arrays of records (projection, schedule, risk
/// factors) each get their own table underneath.
pub fn print_table(value: &Value) {
    match payload(value) {
        Value::Array(rows) => print_rows(rows),
        Value::Object(map) => print_sections(map),
        other => println!("{}", scalar_text(other)),
    }

    if let Some(envelope) = value.as_object() {
        print_envelope_notes(envelope);
    }
}

fn print_sections(map: &Map<String, Value>) {
    let mut fields = Vec::new();
    let mut record_lists: Vec<(String, &Vec<Value>)> = Vec::new();
    collect(String::new(), map, &mut fields, &mut record_lists);

    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in &fields {
        builder.push_record([key.as_str(), &scalar_text(val)]);
    }
    println!("{}", Table::from(builder));

    for (name, rows) in record_lists {
        println!("\n{}:", name);
        print_rows(rows);
    }
}

/// Split an object into flat scalar fields and arrays of records.
fn collect<'a>(
    prefix: String,
    map: &'a Map<String, Value>,
    fields: &mut Vec<(String, Value)>,
    record_lists: &mut Vec<(String, &'a Vec<Value>)>,
) {
    for (key, val) in map {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match val {
            Value::Array(items) if items.iter().all(Value::is_object) && !items.is_empty() => {
                record_lists.push((path, items));
            }
            Value::Object(inner) => collect(path, inner, fields, record_lists),
            _ => flatten(&path, val, fields),
        }
    }
}

fn print_rows(rows: &[Value]) {
    if rows.is_empty() {
        println!("(empty)");
        return;
    }

    let Some(Value::Object(first)) = rows.first() else {
        for item in rows {
            println!("{}", scalar_text(item));
        }
        return;
    };

    let headers: Vec<String> = first.keys().cloned().collect();
    let mut builder = Builder::default();
    builder.push_record(headers.clone());

    for item in rows {
        if let Value::Object(map) = item {
            let row: Vec<String> = headers
                .iter()
                .map(|h| map.get(h).map(scalar_text).unwrap_or_default())
                .collect();
            builder.push_record(row);
        }
    }

    println!("{}", Table::from(builder));
}

fn print_envelope_notes(envelope: &Map<String, Value>) {
    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings {
                if let Value::String(s) = w {
                    println!("  - {}", s);
                }
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}
