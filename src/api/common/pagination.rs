//
//  moysklad-cli
//  api/common/pagination.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Pagination Types for MoySklad Collection Responses
//!
//! Every collection endpoint (`GET /entity/<kind>`) answers with the same
//! envelope: a list-level `meta` describing the page, the `rows` themselves,
//! and an optional `context` naming the employee who made the request.
//!
//! MoySklad uses offset-based pagination with `limit` (max 1000) and `offset`.
//! The list `meta` additionally carries `nextHref`/`previousHref` links, so a
//! full scan can simply follow `nextHref` until it disappears.
//!
//! # Example
//!
//! ```rust
//! use moysklad::api::common::EntityList;
//! use serde_json::Value;
//!
//! let json = r#"{
//!     "meta": {
//!         "href": "https://api.moysklad.ru/api/remap/1.2/entity/product",
//!         "type": "product",
//!         "size": 1500,
//!         "limit": 1000,
//!         "offset": 0,
//!         "nextHref": "https://api.moysklad.ru/api/remap/1.2/entity/product?offset=1000"
//!     },
//!     "rows": []
//! }"#;
//!
//! let page: EntityList<Value> = serde_json::from_str(json).unwrap();
//! assert!(page.has_next());
//! assert_eq!(page.total(), Some(1500));
//! ```

use serde::{Deserialize, Serialize};

use crate::api::model::Meta;

/// One page of a MoySklad collection.
///
/// # Type Parameters
///
/// - `T` - The row type, usually an [`Entity`](crate::api::model::Entity)
///   or `serde_json::Value` for untyped access
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityList<T> {
    /// Request context; carries the employee on whose behalf the list was built.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<ListContext>,

    /// Page metadata: total `size`, `limit`, `offset` and navigation links.
    pub meta: Meta,

    /// Rows of the current page. May be empty.
    #[serde(default = "Vec::new")]
    pub rows: Vec<T>,
}

/// Context block of a collection response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListContext {
    /// Reference to the employee who issued the request.
    pub employee: crate::api::model::MetaWrapper,
}

impl<T> EntityList<T> {
    /// Checks if another page can be fetched.
    pub fn has_next(&self) -> bool {
        self.meta.next_href.is_some()
    }

    /// Returns the absolute URL of the next page.
    pub fn next_url(&self) -> Option<&str> {
        self.meta.next_href.as_deref()
    }

    /// Returns the absolute URL of the previous page.
    pub fn previous_url(&self) -> Option<&str> {
        self.meta.previous_href.as_deref()
    }

    /// Total number of rows matching the query across all pages.
    pub fn total(&self) -> Option<u64> {
        self.meta.size
    }

    /// Number of rows on this page.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` when the page has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
