//
//  moysklad-cli
//  output/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Output Module
//!
//! Output formatting for the `msk` CLI:
//!
//! - **Table format**: Human-readable output for interactive terminal use
//! - **JSON format**: Pretty-printed JSON for scripting and piping into `jq`
//!
//! ## Core Components
//!
//! - [`OutputFormat`]: The available output formats
//! - [`OutputWriter`]: Main entry point for writing formatted output
//! - [`TableOutput`]: Trait for types that know how to print themselves for humans
//!
//! ## Example
//!
//! ```rust,ignore
//! use moysklad::output::{OutputFormat, OutputWriter};
//!
//! let writer = OutputWriter::new(OutputFormat::Json);
//! writer.write(&summary)?;
//! writer.write_success("Logged in to api.moysklad.ru");
//! ```

mod json;
mod table;

pub use json::*;
pub use table::*;

use console::{style, Color, StyledObject};
use serde::Serialize;

/// Represents the available output formats for CLI output.
///
/// # Variants
///
/// * `Table` - Human-readable format, best for interactive terminal sessions
/// * `Json` - Machine-readable JSON, ideal for scripting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable table format with optional color support.
    #[default]
    Table,
    /// Pretty-printed JSON.
    Json,
}

impl OutputFormat {
    /// Resolves the format from the `--json` flag and the configured default.
    ///
    /// The flag wins; otherwise `configured` is honoured when it reads `json`.
    pub fn resolve(json_flag: bool, configured: Option<&str>) -> Self {
        if json_flag || configured.is_some_and(|c| c.eq_ignore_ascii_case("json")) {
            Self::Json
        } else {
            Self::Table
        }
    }
}

/// A unified output writer that handles multiple output formats.
///
/// Data goes to stdout. Errors and warnings go to stderr so that JSON on
/// stdout stays parseable.
///
/// # Example
///
/// ```rust,ignore
/// use moysklad::output::OutputWriter;
///
/// let writer = OutputWriter::table();
/// writer.write_list(&rows)?;
/// writer.write_warning("Showing the first page only");
/// ```
#[derive(Debug, Clone)]
pub struct OutputWriter {
    format: OutputFormat,
    color: bool,
}

impl OutputWriter {
    /// Creates a writer for `format`, detecting terminal color support.
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            color: console::colors_enabled(),
        }
    }

    /// Shorthand for `OutputWriter::new(OutputFormat::Json)`.
    pub fn json() -> Self {
        Self::new(OutputFormat::Json)
    }

    /// Shorthand for `OutputWriter::new(OutputFormat::Table)`.
    pub fn table() -> Self {
        Self::new(OutputFormat::Table)
    }

    /// Returns `true` if colored output is enabled.
    pub fn color_enabled(&self) -> bool {
        self.color
    }

    /// Returns `true` when writing JSON.
    pub fn is_json(&self) -> bool {
        self.format == OutputFormat::Json
    }

    /// Writes a single value.
    pub fn write<T: Serialize + TableOutput>(&self, value: &T) -> anyhow::Result<()> {
        match self.format {
            OutputFormat::Json => write_json(value)?,
            OutputFormat::Table => value.print_table(self.color),
        }
        Ok(())
    }

    /// Writes a list of values.
    ///
    /// JSON output is a single array. Table output prints each item in turn.
    pub fn write_list<T: Serialize + TableOutput>(&self, values: &[T]) -> anyhow::Result<()> {
        match self.format {
            OutputFormat::Json => write_json(&values)?,
            OutputFormat::Table => {
                for value in values {
                    value.print_table(self.color);
                }
            }
        }
        Ok(())
    }

    /// Reports a non-fatal problem on stderr.
    pub fn write_warning(&self, msg: &str) {
        eprintln!("{} {}", self.tag("warning:", Color::Yellow), msg);
    }

    /// Writes a plain informational message.
    pub fn write_info(&self, msg: &str) {
        println!("{}", msg);
    }

    /// Reports a completed change, e.g. a deleted entity.
    pub fn write_success(&self, msg: &str) {
        println!("{} {}", self.tag("✓", Color::Green), msg);
    }

    fn tag(&self, tag: &'static str, color: Color) -> StyledObject<&'static str> {
        style(tag).fg(color).bold().force_styling(self.color)
    }
}

/// Types that can render themselves for a terminal.
pub trait TableOutput {
    /// Prints the value to stdout.
    fn print_table(&self, color: bool);
}

impl TableOutput for serde_json::Value {
    fn print_table(&self, _color: bool) {
        match serde_json::to_string_pretty(self) {
            Ok(json) => println!("{}", json),
            Err(_) => println!("{}", self),
        }
    }
}

/// Prints a bold section header with an underline.
pub fn print_header(text: &str) {
    println!("{}", style(text).bold());
    println!("{}", "-".repeat(text.chars().count()));
}

/// Prints an aligned `key: value` line.
pub fn print_field(key: &str, value: &str, color: bool) {
    let key = format!("{:<12}", format!("{}:", key));
    if color {
        println!("  {} {}", style(key).dim(), value);
    } else {
        println!("  {} {}", key, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_format() {
        assert_eq!(OutputFormat::resolve(true, None), OutputFormat::Json);
        assert_eq!(OutputFormat::resolve(false, Some("JSON")), OutputFormat::Json);
        assert_eq!(OutputFormat::resolve(false, Some("table")), OutputFormat::Table);
        assert_eq!(OutputFormat::resolve(false, None), OutputFormat::Table);
    }

    #[test]
    fn test_writer_format() {
        assert!(OutputWriter::json().is_json());
        assert!(!OutputWriter::table().is_json());
    }
}
