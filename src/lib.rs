//
//  moysklad-cli
//  lib.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # MoySklad SDK and CLI Library
//!
//! A typed client for the MoySklad JSON API 1.2 and the library behind the
//! `msk` command-line tool.
//!
//! ## Overview
//!
//! The SDK is built around three ideas:
//!
//! - **Request builder**: [`api::Request`] composes a path, query
//!   parameters and a JSON body, then runs as GET/POST/PUT/DELETE or as a
//!   server-side async task
//! - **Async tasks**: [`api::AsyncTask`] polls, fetches and cancels a task
//!   through the locators the server returns
//! - **Entity model**: [`api::model`] types with three-state fields
//!   (absent, null, value) and a lazily decoded retail operation envelope
//!
//! ## Module Structure
//!
//! - [`api`]: HTTP client, request builder, entity model and services
//! - [`auth`]: Credentials and keyring storage
//! - [`config`]: Configuration file management
//! - [`output`]: Output formatting (Table, JSON)
//! - [`cli`]: Command-line interface definitions using clap
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use moysklad::api::{MoySkladClient, Params};
//! use moysklad::api::model::Product;
//! use moysklad::auth::AuthCredential;
//!
//! # async fn example() -> Result<(), moysklad::api::ApiError> {
//! let client = MoySkladClient::new()?.with_auth(AuthCredential::bearer("token"));
//!
//! let page = client
//!     .entity::<Product>()
//!     .list(Params::new().limit(10).search("pencil"))
//!     .await?;
//! for product in &page.data.rows {
//!     println!("{:?}", product.name.value());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Logging
//!
//! The library emits `tracing` events at debug level and never installs a
//! subscriber; the `msk` binary does, filtered by `MSK_DEBUG`.

pub mod api;

pub mod auth;

pub mod cli;

pub mod config;

pub mod output;

pub use api::{ApiError, MoySkladClient};

pub use cli::Cli;

pub use config::Config;

/// Name of the binary, also used for the configuration directory.
pub const APP_NAME: &str = "msk";

/// Crate version, sent in the `User-Agent` header.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Process exit codes used by the `msk` binary.
pub mod exit_codes {
    /// The command succeeded.
    pub const SUCCESS: i32 = 0;

    /// Any failure without a more specific code.
    pub const ERROR: i32 = 1;

    /// Invalid command-line usage.
    pub const USAGE: i32 = 2;

    /// The server rejected the credential (401/403), or none is configured.
    pub const AUTH_ERROR: i32 = 4;

    /// The requested resource does not exist (404).
    pub const NOT_FOUND: i32 = 8;

    /// The server is throttling requests (429).
    pub const RATE_LIMIT: i32 = 32;

    /// Maps a command failure onto an exit code.
    pub fn for_error(error: &anyhow::Error) -> i32 {
        use reqwest::StatusCode;

        if error
            .chain()
            .any(|cause| cause.is::<crate::cli::NotAuthenticated>())
        {
            return AUTH_ERROR;
        }
        let status = error
            .chain()
            .find_map(|cause| cause.downcast_ref::<crate::ApiError>())
            .and_then(crate::ApiError::status);
        match status {
            Some(StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) => AUTH_ERROR,
            Some(StatusCode::NOT_FOUND) => NOT_FOUND,
            Some(StatusCode::TOO_MANY_REQUESTS) => RATE_LIMIT,
            _ => ERROR,
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use crate::api::{ApiError, RawResponse};
        use crate::cli::NotAuthenticated;
        use anyhow::Context;
        use reqwest::header::HeaderMap;
        use reqwest::StatusCode;

        fn api_error(status: u16) -> anyhow::Error {
            let response =
                RawResponse::new(StatusCode::from_u16(status).unwrap(), HeaderMap::new(), "");
            ApiError::from_response(response).into()
        }

        #[test]
        fn test_missing_credential_is_auth_error() {
            let error: anyhow::Error = NotAuthenticated {
                host: "api.moysklad.ru".to_string(),
            }
            .into();
            assert_eq!(for_error(&error), AUTH_ERROR);

            let wrapped = Err::<(), _>(error).context("Listing products").unwrap_err();
            assert_eq!(for_error(&wrapped), AUTH_ERROR);
        }

        #[test]
        fn test_message_text_does_not_decide_code() {
            let error = anyhow::anyhow!("Not authenticated, says the proxy");
            assert_eq!(for_error(&error), ERROR);
        }

        #[test]
        fn test_status_codes() {
            assert_eq!(for_error(&api_error(403)), AUTH_ERROR);
            assert_eq!(for_error(&api_error(404)), NOT_FOUND);
            assert_eq!(for_error(&api_error(429)), RATE_LIMIT);
            assert_eq!(for_error(&api_error(500)), ERROR);
        }
    }
}
