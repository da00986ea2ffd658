use serde_json::Value;

use super::cell_text;

/// Fields tried in order; the first present non-null one is printed.
/// Dotted paths reach into nested sections.
const PRIORITY_PATHS: [&str; 5] = [
    "irr_pct",
    "metrics.irr_pct",
    "net_to_equity",
    "equity_multiple",
    "capital_structure.equity",
];

/// Print just the headline value from the output.
pub fn print_minimal(value: &Value) {
    println!("{}", headline(value));
}

fn headline(value: &Value) -> String {
    let result = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    for path in PRIORITY_PATHS {
        if let Some(found) = lookup(result, path).filter(|v| !v.is_null()) {
            return cell_text(found);
        }
    }

    match result {
        Value::Object(map) => match map.iter().find(|(_, v)| !v.is_null()) {
            Some((key, val)) => format!("{}: {}", key, cell_text(val)),
            None => String::new(),
        },
        Value::Array(rows) => format!("{} rows", rows.len()),
        other => cell_text(other),
    }
}

fn lookup<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(value, |node, key| node.get(key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_nested_irr_wins() {
        let v = json!({"result": {"net_to_equity": "754013.61", "metrics": {"irr_pct": "16.14"}}});
        assert_eq!(headline(&v), "16.14");
    }

    #[test]
    fn test_failed_irr_falls_through() {
        let v = json!({"result": {"irr_pct": null, "multiple": "0.50"}});
        assert_eq!(headline(&v), "multiple: 0.50");
    }

    #[test]
    fn test_grid_counts_rows() {
        let v = json!({"result": [{"irr_pct": "1"}, {"irr_pct": "2"}]});
        assert_eq!(headline(&v), "2 rows");
    }
}
