//
//  moysklad-cli
//  config/hosts.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Host Configuration Module
//!
//! Constants for the public API and helpers to turn a user-supplied host
//! into a stable configuration key and an API root URL.
//!
//! ## Usage
//!
//! ```rust
//! use moysklad::config::{api_base_url, normalize_host};
//!
//! assert_eq!(normalize_host("https://API.MoySklad.ru/"), "api.moysklad.ru");
//! assert_eq!(normalize_host("http://127.0.0.1:8080"), "http://127.0.0.1:8080");
//!
//! assert_eq!(
//!     api_base_url("api.moysklad.ru", "1.2"),
//!     "https://api.moysklad.ru/api/remap/1.2"
//! );
//! ```

/// Host of the public MoySklad API.
pub const DEFAULT_HOST: &str = "api.moysklad.ru";

/// JSON API version this SDK models.
pub const DEFAULT_API_VERSION: &str = "1.2";

/// Normalizes a host for use as a configuration and keyring key.
///
/// Trims whitespace and trailing slashes and lowercases. The default
/// `https://` scheme is dropped; any other scheme is kept so that plain
/// HTTP test servers remain addressable.
pub fn normalize_host(host: &str) -> String {
    let host = host.trim().trim_end_matches('/').to_lowercase();
    match host.strip_prefix("https://") {
        Some(rest) => rest.to_string(),
        None => host,
    }
}

/// Root URL of the JSON API for `host` and `version`.
///
/// A host given with a scheme keeps it; a bare host gets `https://`.
pub fn api_base_url(host: &str, version: &str) -> String {
    let host = normalize_host(host);
    let origin = if host.contains("://") {
        host
    } else {
        format!("https://{}", host)
    };
    format!("{}/api/remap/{}", origin, version)
}
