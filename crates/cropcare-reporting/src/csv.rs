//! History table to CSV.

use cropcare_core::HistoryTable;

/// Every header and body cell is quoted. Status badges contribute only
/// their text.
pub fn history_csv(table: &HistoryTable) -> String {
    let mut csv = String::new();
    if !table.headers.is_empty() {
        push_line(&mut csv, table.headers.iter().map(String::as_str));
    }
    for row in &table.rows {
        push_line(&mut csv, row.iter().map(|cell| cell.text()));
    }
    csv
}

fn push_line<'a>(csv: &mut String, fields: impl Iterator<Item = &'a str>) {
    let line = fields.map(escape_csv).collect::<Vec<_>>().join(",");
    csv.push_str(&line);
    csv.push('\n');
}

fn escape_csv(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}
