pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use serde_json::Value;

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => json::print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

/// Render a scalar cell. Nested values fall back to compact JSON.
pub(crate) fn cell_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}

/// Header row taken from the first object of a row set.
pub(crate) fn row_headers(rows: &[Value]) -> Option<Vec<String>> {
    match rows.first() {
        Some(Value::Object(first)) => Some(first.keys().cloned().collect()),
        _ => None,
    }
}

/// One row of cells in `headers` order; missing keys are blank.
pub(crate) fn row_cells(headers: &[String], row: &Value) -> Vec<String> {
    headers
        .iter()
        .map(|h| row.get(h.as_str()).map(cell_text).unwrap_or_default())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_cell_text() {
        assert_eq!(cell_text(&json!("16.14")), "16.14");
        assert_eq!(cell_text(&json!(5)), "5");
        assert_eq!(cell_text(&json!(null)), "");
        assert_eq!(cell_text(&json!({"a": 1})), r#"{"a":1}"#);
    }

    #[test]
    fn test_row_cells_follow_headers() {
        let rows = vec![
            json!({"period": 1, "noi": "100"}),
            json!({"noi": "110", "period": 2}),
        ];
        let headers = row_headers(&rows).unwrap();
        assert_eq!(headers, vec!["noi", "period"]);
        assert_eq!(row_cells(&headers, &rows[1]), vec!["110", "2"]);
        assert!(row_headers(&[json!(1)]).is_none());
    }
}
