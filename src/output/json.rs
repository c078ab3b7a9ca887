//
//  moysklad-cli
//  output/json.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # JSON Output
//!
//! Helpers for writing JSON to stdout or any writer, plus a small path
//! selector used by `msk api --select`.

use std::io::{self, Write};

use serde::Serialize;
use serde_json::Value;

/// Writes `value` to stdout as pretty JSON.
pub fn write_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    write_json_to(&mut handle, value)
}

/// Writes `value` to `writer` as pretty JSON followed by a newline.
pub fn write_json_to<W: Write, T: Serialize + ?Sized>(
    writer: &mut W,
    value: &T,
) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(&mut *writer, value)?;
    writeln!(writer)?;
    Ok(())
}

/// Writes `value` to stdout as a single JSON line.
pub fn write_json_compact<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string(value)?);
    Ok(())
}

/// Selects a nested value by a dotted path such as `.meta.size` or
/// `rows.0.name`. Numeric segments index arrays.
///
/// `.` and the empty path select the whole value.
///
/// # Example
///
/// ```rust
/// use moysklad::output::select_path;
/// use serde_json::json;
///
/// let page = json!({"meta": {"size": 2}, "rows": [{"name": "a"}, {"name": "b"}]});
/// assert_eq!(select_path(&page, ".meta.size"), Some(&json!(2)));
/// assert_eq!(select_path(&page, "rows.1.name"), Some(&json!("b")));
/// assert_eq!(select_path(&page, ".missing"), None);
/// ```
pub fn select_path<'v>(value: &'v Value, path: &str) -> Option<&'v Value> {
    path.trim_start_matches('.')
        .split('.')
        .filter(|segment| !segment.is_empty())
        .try_fold(value, |current, segment| match current {
            Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            Value::Object(map) => map.get(segment),
            _ => None,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_select_identity() {
        let value = json!({"name": "test"});
        assert_eq!(select_path(&value, "."), Some(&value));
        assert_eq!(select_path(&value, ""), Some(&value));
    }

    #[test]
    fn test_select_through_arrays() {
        let value = json!({"rows": [{"meta": {"type": "product"}}]});
        assert_eq!(select_path(&value, ".rows.0.meta.type"), Some(&json!("product")));
        assert_eq!(select_path(&value, ".rows.x"), None);
        assert_eq!(select_path(&value, ".rows.3"), None);
    }

    #[test]
    fn test_write_json_to_buffer() {
        let mut buffer = Vec::new();
        write_json_to(&mut buffer, &json!({"a": 1})).unwrap();
        assert_eq!(String::from_utf8(buffer).unwrap(), "{\n  \"a\": 1\n}\n");
    }
}
