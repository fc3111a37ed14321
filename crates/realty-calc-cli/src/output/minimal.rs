use serde_json::Value;

use super::{payload, scalar_text};

/// Result fields worth printing on their own, most telling first.
const PRIORITY_KEYS: [&str; 7] = [
    "annual_roi",
    "installment",
    "term_months",
    "estimated_rent",
    "net_monthly_cash_flow",
    "overall_score",
    "total_wealth",
];

/// Print just the key answer value from the output.
///
/// Looks for the priority keys anywhere in the result (nested sections
/// included), falling back to the first field.
pub fn print_minimal(value: &Value) {
    let result = payload(value);

    // A bare series: report its last point
    if let Value::Array(items) = result {
        if let Some(last) = items.last() {
            print_minimal(last);
        }
        return;
    }

    for key in PRIORITY_KEYS {
        if let Some(found) = find_key(result, key) {
            if !found.is_null() {
                println!("{}", scalar_text(found));
                return;
            }
        }
    }

    if let Value::Object(map) = result {
        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, scalar_text(val));
            return;
        }
    }

    println!("{}", scalar_text(result));
}

/// A key on the current level beats the same key in a subsection.
fn find_key<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
    let map = value.as_object()?;
    if let Some(found) = map.get(key) {
        return Some(found);
    }
    map.values()
        .filter(|v| v.is_object())
        .find_map(|v| find_key(v, key))
}
