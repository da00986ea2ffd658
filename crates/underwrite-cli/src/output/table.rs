use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::{cell_text, row_cells, row_headers};

/// Print the envelope as tables: scalar fields first, then one table per
/// nested section (cashflows, metrics, sensitivity), then warnings.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => match map.get("result") {
            Some(result) => {
                print_result(result);
                print_notes(map);
            }
            None => print_fields(map),
        },
        Value::Array(rows) => print_rows(rows),
        _ => println!("{}", value),
    }
}

fn print_result(result: &Value) {
    let Value::Object(fields) = result else {
        print_rows(std::slice::from_ref(result));
        return;
    };

    let scalars: Map<String, Value> = fields
        .iter()
        .filter(|(_, v)| !v.is_object() && !v.is_array())
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    if !scalars.is_empty() {
        print_fields(&scalars);
    }

    for (key, val) in fields {
        match val {
            Value::Object(section) => {
                println!("\n{}:", key);
                print_fields(section);
            }
            Value::Array(rows) => {
                println!("\n{}:", key);
                print_rows(rows);
            }
            _ => {}
        }
    }
}

fn print_notes(envelope: &Map<String, Value>) {
    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings.iter().filter_map(Value::as_str) {
                println!("  - {}", w);
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

fn print_fields(map: &Map<String, Value>) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in map {
        builder.push_record([key.clone(), cell_text(val)]);
    }
    println!("{}", Table::from(builder));
}

fn print_rows(rows: &[Value]) {
    if rows.is_empty() {
        println!("(empty)");
        return;
    }

    let Some(headers) = row_headers(rows) else {
        for item in rows {
            println!("{}", cell_text(item));
        }
        return;
    };

    let mut builder = Builder::default();
    builder.push_record(headers.clone());
    for row in rows.iter().filter(|r| r.is_object()) {
        builder.push_record(row_cells(&headers, row));
    }
    println!("{}", Table::from(builder));
}
