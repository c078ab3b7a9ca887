//
//  moysklad-cli
//  api/params.rs
//
//  Created by Ngonidzashe Mangudya on 2026/10/16.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Query Parameters
//!
//! [`Params`] is an insertion-ordered list of query parameters. Each key
//! holds either one string or a list of strings; lists are sent by repeating
//! the key.
//!
//! Besides the generic [`set`](Params::set) and [`append`](Params::append),
//! there are helpers for the parameters every MoySklad collection
//! understands. `filter`, `order` and `expand` accumulate: each call adds one
//! clause to the single combined parameter the API expects.
//!
//! ## Example
//!
//! ```rust
//! use moysklad::api::{FilterOp, Params, SortDir};
//!
//! let params = Params::new()
//!     .limit(100)
//!     .filter("archived", FilterOp::Eq, "false")
//!     .filter("name", FilterOp::Like, "coffee")
//!     .order("name", SortDir::Asc)
//!     .expand("productFolder");
//!
//! assert_eq!(params.get("filter"), Some("archived=false;name~coffee"));
//! assert_eq!(params.get("limit"), Some("100"));
//! ```

use std::fmt;

use chrono::NaiveDateTime;
use url::Url;

/// Largest page size the API accepts.
pub const MAX_LIMIT: u32 = 1000;

/// Format of moment filter bounds.
const MOMENT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Value of one query parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    /// Sent once.
    Single(String),
    /// Sent once per element, repeating the key.
    Multi(Vec<String>),
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::Single(value)
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::Single(value.to_string())
    }
}

impl From<Vec<String>> for ParamValue {
    fn from(values: Vec<String>) -> Self {
        Self::Multi(values)
    }
}

/// Comparison operator of a `filter` clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    /// `=`
    Eq,
    /// `!=`
    Ne,
    /// `>`
    Gt,
    /// `<`
    Lt,
    /// `>=`
    Ge,
    /// `<=`
    Le,
    /// `~`, substring match
    Like,
    /// `~=`, prefix match
    StartsWith,
    /// `=~`, suffix match
    EndsWith,
    /// `!~`, substring does not match
    NotLike,
}

impl FilterOp {
    /// The operator as written in a filter clause.
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterOp::Eq => "=",
            FilterOp::Ne => "!=",
            FilterOp::Gt => ">",
            FilterOp::Lt => "<",
            FilterOp::Ge => ">=",
            FilterOp::Le => "<=",
            FilterOp::Like => "~",
            FilterOp::StartsWith => "~=",
            FilterOp::EndsWith => "=~",
            FilterOp::NotLike => "!~",
        }
    }

    /// Splits a textual clause such as `name~coffee` into its parts.
    ///
    /// Two-character operators win over their one-character prefixes.
    pub fn split_clause(clause: &str) -> Option<(&str, FilterOp, &str)> {
        const OPERATORS: [FilterOp; 10] = [
            FilterOp::Ne,
            FilterOp::Ge,
            FilterOp::Le,
            FilterOp::StartsWith,
            FilterOp::EndsWith,
            FilterOp::NotLike,
            FilterOp::Eq,
            FilterOp::Gt,
            FilterOp::Lt,
            FilterOp::Like,
        ];

        // The leftmost operator position wins; at equal positions the longer one.
        let mut best: Option<(usize, FilterOp)> = None;
        for op in OPERATORS {
            if let Some(pos) = clause.find(op.as_str()) {
                let better = match best {
                    None => true,
                    Some((best_pos, best_op)) => {
                        pos < best_pos
                            || (pos == best_pos && op.as_str().len() > best_op.as_str().len())
                    }
                };
                if better {
                    best = Some((pos, op));
                }
            }
        }

        let (pos, op) = best?;
        let field = &clause[..pos];
        if field.is_empty() {
            return None;
        }
        Some((field, op, &clause[pos + op.as_str().len()..]))
    }
}

impl fmt::Display for FilterOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sort direction of an `order` clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDir {
    #[default]
    Asc,
    Desc,
}

impl SortDir {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDir::Asc => "asc",
            SortDir::Desc => "desc",
        }
    }
}

/// Ordered query parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    entries: Vec<(String, ParamValue)>,
}

impl Params {
    /// Creates an empty parameter list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` when no parameter is set.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Sets `key`, replacing an earlier value in place.
    pub fn set(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(key.into(), value.into());
        self
    }

    /// Adds `value` under `key`, turning the entry into a list.
    pub fn append(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => {
                let values = match std::mem::replace(existing, ParamValue::Multi(Vec::new())) {
                    ParamValue::Single(previous) => vec![previous, value],
                    ParamValue::Multi(mut values) => {
                        values.push(value);
                        values
                    }
                };
                *existing = ParamValue::Multi(values);
            }
            None => self.entries.push((key, ParamValue::Multi(vec![value]))),
        }
        self
    }

    /// Returns the single value of `key`, or the first value of a list.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .and_then(|(_, v)| match v {
                ParamValue::Single(s) => Some(s.as_str()),
                ParamValue::Multi(values) => values.first().map(String::as_str),
            })
    }

    /// Returns the raw value of `key`.
    pub fn value(&self, key: &str) -> Option<&ParamValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Iterates over the entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Page size, capped at [`MAX_LIMIT`].
    pub fn limit(self, limit: u32) -> Self {
        self.set("limit", limit.min(MAX_LIMIT).to_string())
    }

    /// Number of rows to skip.
    pub fn offset(self, offset: u32) -> Self {
        self.set("offset", offset.to_string())
    }

    /// Full-text search over the kind's searchable attributes.
    pub fn search(self, text: impl Into<String>) -> Self {
        self.set("search", text.into())
    }

    /// Adds a `filter` clause.
    pub fn filter(self, field: &str, op: FilterOp, value: &str) -> Self {
        self.join("filter", format!("{field}{op}{value}"), ';')
    }

    /// Adds an `order` clause.
    pub fn order(self, field: &str, dir: SortDir) -> Self {
        self.join("order", format!("{field},{}", dir.as_str()), ';')
    }

    /// Asks the server to inline a referenced entity.
    pub fn expand(self, field: &str) -> Self {
        self.join("expand", field.to_string(), ',')
    }

    /// Lower bound for reports and `moment`-based filters.
    pub fn moment_from(self, moment: NaiveDateTime) -> Self {
        self.set("momentFrom", moment.format(MOMENT_FORMAT).to_string())
    }

    /// Upper bound for reports and `moment`-based filters.
    pub fn moment_to(self, moment: NaiveDateTime) -> Self {
        self.set("momentTo", moment.format(MOMENT_FORMAT).to_string())
    }

    /// Report grouping (`product`, `variant`, `consignment`).
    pub fn group_by(self, group: impl Into<String>) -> Self {
        self.set("groupBy", group.into())
    }

    /// Appends every entry to the query of `url`, percent-encoded.
    pub fn append_to(&self, url: &mut Url) {
        if self.entries.is_empty() {
            return;
        }
        let mut pairs = url.query_pairs_mut();
        for (key, value) in &self.entries {
            match value {
                ParamValue::Single(v) => {
                    pairs.append_pair(key, v);
                }
                ParamValue::Multi(values) => {
                    for v in values {
                        pairs.append_pair(key, v);
                    }
                }
            }
        }
    }

    fn insert(&mut self, key: String, value: ParamValue) {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = value,
            None => self.entries.push((key, value)),
        }
    }

    fn join(mut self, key: &str, clause: String, separator: char) -> Self {
        let value = match self.get(key) {
            Some(existing) if !existing.is_empty() => format!("{existing}{separator}{clause}"),
            _ => clause,
        };
        self.insert(key.to_string(), ParamValue::Single(value));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_insertion_order_and_encoding() {
        let params = Params::new()
            .set("search", "кофе зерно")
            .limit(10)
            .filter("name", FilterOp::Eq, "a;b");

        let mut url = Url::parse("https://api.moysklad.ru/api/remap/1.2/entity/product").unwrap();
        params.append_to(&mut url);

        assert_eq!(
            url.query(),
            Some("search=%D0%BA%D0%BE%D1%84%D0%B5+%D0%B7%D0%B5%D1%80%D0%BD%D0%BE&limit=10&filter=name%3Da%3Bb")
        );
    }

    #[test]
    fn test_set_replaces_in_place() {
        let params = Params::new().set("a", "1").set("b", "2").set("a", "3");
        let keys: Vec<&str> = params.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(params.get("a"), Some("3"));
    }

    #[test]
    fn test_append_repeats_key() {
        let params = Params::new().set("id", "1").append("id", "2").append("tag", "x");
        assert_eq!(
            params.value("id"),
            Some(&ParamValue::Multi(vec!["1".into(), "2".into()]))
        );

        let mut url = Url::parse("https://h/p").unwrap();
        params.append_to(&mut url);
        assert_eq!(url.query(), Some("id=1&id=2&tag=x"));
    }

    #[test]
    fn test_empty_params_leave_query_untouched() {
        let mut url = Url::parse("https://h/p").unwrap();
        Params::new().append_to(&mut url);
        assert_eq!(url.as_str(), "https://h/p");
        assert_eq!(url.query(), None);
    }

    #[test]
    fn test_limit_is_capped() {
        assert_eq!(Params::new().limit(5000).get("limit"), Some("1000"));
    }

    #[test]
    fn test_order_and_expand_accumulate() {
        let params = Params::new()
            .order("name", SortDir::Asc)
            .order("updated", SortDir::Desc)
            .expand("agent")
            .expand("positions");
        assert_eq!(params.get("order"), Some("name,asc;updated,desc"));
        assert_eq!(params.get("expand"), Some("agent,positions"));
    }

    #[test]
    fn test_moment_bounds() {
        let from = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let params = Params::new().moment_from(from).group_by("product");
        assert_eq!(params.get("momentFrom"), Some("2024-01-01 00:00:00"));
        assert_eq!(params.get("groupBy"), Some("product"));
    }

    #[test]
    fn test_split_clause() {
        assert_eq!(
            FilterOp::split_clause("name~coffee"),
            Some(("name", FilterOp::Like, "coffee"))
        );
        assert_eq!(
            FilterOp::split_clause("sum>=100"),
            Some(("sum", FilterOp::Ge, "100"))
        );
        assert_eq!(
            FilterOp::split_clause("name=~beans"),
            Some(("name", FilterOp::EndsWith, "beans"))
        );
        assert_eq!(
            FilterOp::split_clause("archived!=true"),
            Some(("archived", FilterOp::Ne, "true"))
        );
        assert_eq!(FilterOp::split_clause("=x"), None);
        assert_eq!(FilterOp::split_clause("plain"), None);
    }
}
