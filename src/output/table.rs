//
//  moysklad-cli
//  output/table.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Table Output
//!
//! [`TableBuilder`] wraps `comfy_table` with the CLI's preset and colored
//! headers; the free functions format individual cells.
//!
//! ```rust,no_run
//! use moysklad::output::TableBuilder;
//!
//! TableBuilder::new()
//!     .headers(["ID", "NAME", "UPDATED"])
//!     .row(["a1b2", "Pencil", "2024-01-05 10:00:00"])
//!     .print();
//! ```

use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};
use serde_json::Value;

/// Creates an empty table with the CLI's preset.
pub fn create_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Builder for tables with optionally colored headers.
pub struct TableBuilder {
    table: Table,
    color: bool,
}

impl TableBuilder {
    /// Creates a builder, detecting color support.
    pub fn new() -> Self {
        Self {
            table: create_table(),
            color: console::colors_enabled(),
        }
    }

    /// Overrides color detection.
    pub fn color(mut self, enabled: bool) -> Self {
        self.color = enabled;
        self
    }

    /// Sets the header row.
    pub fn headers<I, S>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let headers: Vec<String> = headers.into_iter().map(Into::into).collect();
        if self.color {
            let cells: Vec<Cell> = headers.iter().map(|h| Cell::new(h).fg(Color::Cyan)).collect();
            self.table.set_header(cells);
        } else {
            self.table.set_header(headers);
        }
        self
    }

    /// Adds one row.
    pub fn row<I, S>(mut self, cells: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let row: Vec<String> = cells.into_iter().map(Into::into).collect();
        self.table.add_row(row);
        self
    }

    /// Adds several rows.
    pub fn rows<I, R, S>(self, rows: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = S>,
        S: Into<String>,
    {
        rows.into_iter().fold(self, |builder, row| builder.row(row))
    }

    /// Prints the table to stdout.
    pub fn print(self) {
        println!("{}", self.table);
    }

    /// Returns the underlying table.
    pub fn build(self) -> Table {
        self.table
    }
}

impl Default for TableBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Colors an async task state or scope for display.
pub fn format_state(state: &str, color: bool) -> String {
    if !color {
        return state.to_string();
    }

    use console::style;
    match state.to_ascii_uppercase().as_str() {
        "DONE" | "ALL" => style(state).green().to_string(),
        "PENDING" | "PROCESSING" | "OWN" | "OWN_SHARED" | "DEPARTMENT" | "DEPARTMENT_SHARED" => {
            style(state).yellow().to_string()
        }
        "ERROR" | "API_ERROR" | "CANCEL" | "NO" => style(state).red().to_string(),
        _ => style(state).blue().to_string(),
    }
}

/// Formats a boolean as `Yes`/`No`.
pub fn format_bool(value: bool, color: bool) -> String {
    use console::style;
    match (value, color) {
        (true, true) => style("Yes").green().to_string(),
        (false, true) => style("No").dim().to_string(),
        (true, false) => "Yes".to_string(),
        (false, false) => "No".to_string(),
    }
}

/// Renders a JSON scalar for a table cell; `-` for null or missing.
pub fn format_cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => "-".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Bool(b)) => format_bool(*b, false),
        Some(other) => other.to_string(),
    }
}

/// Truncates `s` to `max_len` characters, ending with `...` when cut.
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        return s.to_string();
    }
    if max_len > 3 {
        let kept: String = s.chars().take(max_len - 3).collect();
        format!("{}...", kept)
    } else {
        s.chars().take(max_len).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_truncate_counts_characters() {
        assert_eq!(truncate("Карандаш простой", 8), "Каран...");
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdef", 2), "ab");
    }

    #[test]
    fn test_format_cell() {
        assert_eq!(format_cell(None), "-");
        assert_eq!(format_cell(Some(&Value::Null)), "-");
        assert_eq!(format_cell(Some(&json!("Pencil"))), "Pencil");
        assert_eq!(format_cell(Some(&json!(12.5))), "12.5");
        assert_eq!(format_cell(Some(&json!(true))), "Yes");
    }

    #[test]
    fn test_format_state_without_color() {
        assert_eq!(format_state("DONE", false), "DONE");
    }

    #[test]
    fn test_table_renders_rows() {
        let table = TableBuilder::new()
            .color(false)
            .headers(["ID", "NAME"])
            .rows([["1", "Pencil"], ["2", "Pen"]])
            .build();
        let rendered = table.to_string();
        assert!(rendered.contains("Pencil"));
        assert!(rendered.contains("NAME"));
    }
}
