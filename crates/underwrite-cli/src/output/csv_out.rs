use serde_json::{Map, Value};
use std::io::{self, Write};

use super::{cell_text, row_cells, row_headers};

/// Write output as CSV to stdout.
///
/// Row sets (a sensitivity grid, or the `cashflows` of a projection) become
/// one record per row; anything else is a two-column field/value listing.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    if let Err(e) = write_csv(stdout.lock(), value) {
        eprintln!("CSV output error: {}", e);
    }
}

fn write_csv<W: Write>(out: W, value: &Value) -> csv::Result<()> {
    let mut wtr = csv::Writer::from_writer(out);

    let body = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    match body {
        Value::Array(rows) => write_rows(&mut wtr, rows)?,
        Value::Object(map) => match map.get("cashflows") {
            Some(Value::Array(rows)) => write_rows(&mut wtr, rows)?,
            _ => write_fields(&mut wtr, map)?,
        },
        other => wtr.write_record([cell_text(other)])?,
    }

    wtr.flush()?;
    Ok(())
}

fn write_fields<W: Write>(wtr: &mut csv::Writer<W>, map: &Map<String, Value>) -> csv::Result<()> {
    wtr.write_record(["field", "value"])?;
    for (key, val) in map {
        wtr.write_record([key.clone(), cell_text(val)])?;
    }
    Ok(())
}

fn write_rows<W: Write>(wtr: &mut csv::Writer<W>, rows: &[Value]) -> csv::Result<()> {
    let Some(headers) = row_headers(rows) else {
        for item in rows {
            wtr.write_record([cell_text(item)])?;
        }
        return Ok(());
    };

    wtr.write_record(&headers)?;
    for row in rows.iter().filter(|r| r.is_object()) {
        wtr.write_record(row_cells(&headers, row))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn render(value: &Value) -> String {
        let mut buf = Vec::new();
        write_csv(&mut buf, value).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_cashflows_become_rows() {
        let out = render(&json!({
            "result": {
                "capital_structure": {"equity": "360500"},
                "cashflows": [
                    {"period": 1, "noi": "58710"},
                    {"period": 2, "noi": "60471.30"}
                ]
            }
        }));
        // object keys come out sorted
        assert_eq!(out, "noi,period\n58710,1\n60471.30,2\n");
    }

    #[test]
    fn test_grid_array_becomes_rows() {
        let out = render(&json!({
            "result": [
                {"exit_cap_rate": "0.04", "irr_pct": "21.5"},
                {"exit_cap_rate": "0.05", "irr_pct": "16.1"}
            ]
        }));
        assert_eq!(out, "exit_cap_rate,irr_pct\n0.04,21.5\n0.05,16.1\n");
    }

    #[test]
    fn test_flat_result_is_field_value() {
        let out = render(&json!({"result": {"multiple": "1.10"}}));
        assert_eq!(out, "field,value\nmultiple,1.10\n");
    }
}
