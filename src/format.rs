use crate::interpreter::{ArrayStore, Cell, Frame, Storage};
use crate::value::{format_number, Value};
use serde_json::{json, Map, Number};

/// How `--memory` renders the final snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoryFormat {
    Table,
    Json,
}

impl std::str::FromStr for MemoryFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(MemoryFormat::Table),
            "json" => Ok(MemoryFormat::Json),
            _ => Err(format!(
                "Invalid memory format: {}. Must be 'table' or 'json'",
                s
            )),
        }
    }
}

pub fn render_memory(memory: &Frame, format: MemoryFormat, compact: bool) -> String {
    match format {
        MemoryFormat::Table => memory_table(memory),
        MemoryFormat::Json => {
            let document = memory_to_json(memory);
            let rendered = if compact {
                serde_json::to_string(&document)
            } else {
                serde_json::to_string_pretty(&document)
            };
            rendered.unwrap_or_else(|_| "{}".to_string())
        }
    }
}

/// Three aligned columns: name, declared type, current value.
pub fn memory_table(memory: &Frame) -> String {
    if memory.is_empty() {
        return "(memory is empty)\n".to_string();
    }

    let rows: Vec<[String; 3]> = memory
        .iter()
        .map(|(name, cell)| [name.clone(), describe_type(cell), describe_value(cell)])
        .collect();

    let mut widths = [4, 4, 5];
    for row in &rows {
        for (width, column) in widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(column.chars().count());
        }
    }

    let mut out = String::new();
    push_row(&mut out, &widths, ["NAME", "TYPE", "VALUE"]);
    push_row(
        &mut out,
        &widths,
        [
            "-".repeat(widths[0]).as_str(),
            "-".repeat(widths[1]).as_str(),
            "-".repeat(widths[2]).as_str(),
        ],
    );
    for row in &rows {
        push_row(&mut out, &widths, [&row[0], &row[1], &row[2]]);
    }
    out
}

fn push_row(out: &mut String, widths: &[usize; 3], columns: [&str; 3]) {
    let line = format!(
        "{:<w0$}  {:<w1$}  {}",
        columns[0],
        columns[1],
        columns[2],
        w0 = widths[0],
        w1 = widths[1],
    );
    out.push_str(line.trim_end());
    out.push('\n');
}

fn describe_type(cell: &Cell) -> String {
    match &cell.storage {
        Storage::Array(store) => format!(
            "ARRAY[{}:{}] OF {}",
            store.lower, store.upper, store.element_type
        ),
        _ => cell.declared_type.to_string(),
    }
}

fn describe_value(cell: &Cell) -> String {
    match &cell.storage {
        Storage::Scalar(value) => quoted(value),
        Storage::Array(store) => {
            let items: Vec<String> = store.elements().map(|(_, v)| quoted(v)).collect();
            format!("[{}]", items.join(", "))
        }
        Storage::Record(fields) => {
            let items: Vec<String> = fields
                .iter()
                .map(|(field, cell)| format!("{}: {}", field, describe_value(cell)))
                .collect();
            format!("{{{}}}", items.join(", "))
        }
    }
}

fn quoted(value: &Value) -> String {
    match value {
        Value::String(s) => format!("\"{}\"", s),
        other => other.to_string(),
    }
}

pub fn memory_to_json(memory: &Frame) -> serde_json::Value {
    let map: Map<String, serde_json::Value> = memory
        .iter()
        .map(|(name, cell)| (name.clone(), cell_to_json(cell)))
        .collect();
    serde_json::Value::Object(map)
}

pub fn cell_to_json(cell: &Cell) -> serde_json::Value {
    match &cell.storage {
        Storage::Scalar(value) => value_to_json(value),
        Storage::Array(store) => array_to_json(store),
        Storage::Record(fields) => {
            let map: Map<String, serde_json::Value> = fields
                .iter()
                .map(|(field, cell)| (field.clone(), cell_to_json(cell)))
                .collect();
            serde_json::Value::Object(map)
        }
    }
}

fn array_to_json(store: &ArrayStore) -> serde_json::Value {
    let elements: Vec<serde_json::Value> = store.elements().map(|(_, v)| value_to_json(v)).collect();
    json!({
        "lower": store.lower,
        "upper": store.upper,
        "elements": elements,
    })
}

/// Non-finite numbers have no JSON form and are written as their rendered text.
pub fn value_to_json(value: &Value) -> serde_json::Value {
    match value {
        Value::Null => serde_json::Value::Null,
        Value::Bool(b) => serde_json::Value::Bool(*b),
        Value::Number(n) if n.is_finite() && n.fract() == 0.0 && n.abs() < 9.0e15 => {
            serde_json::Value::Number(Number::from(*n as i64))
        }
        Value::Number(n) => match Number::from_f64(*n) {
            Some(number) => serde_json::Value::Number(number),
            None => serde_json::Value::String(format_number(*n)),
        },
        Value::String(s) => serde_json::Value::String(s.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::parse_and_run_capturing;

    fn memory(source: &str) -> Frame {
        parse_and_run_capturing(source, &[]).1.expect("program failed")
    }

    #[test]
    fn test_table_lists_every_global_in_declaration_order() {
        let table = memory_table(&memory(
            "DECLARE Name : STRING\nDECLARE Count : INTEGER\nName ← \"Ada\"\nCount ← 3",
        ));
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines[0], "NAME   TYPE     VALUE");
        assert!(lines[2].starts_with("NAME   STRING   \"Ada\""));
        assert!(lines[3].starts_with("COUNT  INTEGER  3"));
    }

    #[test]
    fn test_table_for_empty_memory() {
        assert_eq!(memory_table(&Frame::new()), "(memory is empty)\n");
    }

    #[test]
    fn test_table_shows_arrays_and_records() {
        let table = memory_table(&memory(
            "TYPE Point\nDECLARE X : INTEGER\nDECLARE Y : INTEGER\nENDTYPE\n\
             DECLARE P : Point\nDECLARE A : ARRAY[1:3] OF INTEGER\nP.X ← 4\nA[2] ← 7",
        ));
        assert!(table.contains("Point"));
        assert!(table.contains("{X: 4, Y: 0}"));
        assert!(table.contains("ARRAY[1:3] OF INTEGER"));
        assert!(table.contains("[0, 7, 0]"));
    }

    #[test]
    fn test_json_snapshot() {
        let document = memory_to_json(&memory(
            "CONSTANT Pi ← 3.5\nDECLARE Flag : BOOLEAN\nDECLARE A : ARRAY[0:1] OF STRING\nA[1] ← \"x\"",
        ));
        assert_eq!(
            document,
            json!({
                "PI": 3.5,
                "FLAG": false,
                "A": { "lower": 0, "upper": 1, "elements": ["", "x"] },
            })
        );
    }

    #[test]
    fn test_non_finite_numbers_become_text() {
        assert_eq!(value_to_json(&Value::Number(f64::INFINITY)), json!("Infinity"));
        assert_eq!(value_to_json(&Value::Number(2.0)), json!(2));
        assert_eq!(value_to_json(&Value::Null), serde_json::Value::Null);
    }

    #[test]
    fn test_memory_format_parsing() {
        assert_eq!("JSON".parse::<MemoryFormat>(), Ok(MemoryFormat::Json));
        assert!("xml".parse::<MemoryFormat>().is_err());
    }
}
