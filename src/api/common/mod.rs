//
//  moysklad-cli
//  api/common/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Common API Types
//!
//! This module provides the types shared by every request made through the SDK:
//! the unified error type, the server diagnostic format, and the list envelope
//! used by all collection endpoints.
//!
//! # Overview
//!
//! - [`ApiError`] - Unified error type for all API operations
//! - [`ApiErrorDetail`] - One entry of the MoySklad `errors` array
//! - [`EntityList`] - Paged collection response (re-exported from [`pagination`])
//!
//! # Example
//!
//! ```rust
//! use moysklad::api::common::ApiError;
//!
//! fn handle_result<T>(result: Result<T, ApiError>) {
//!     match result {
//!         Ok(_) => println!("Success!"),
//!         Err(ApiError::Status { status, message, .. }) => {
//!             println!("Server answered {}: {}", status, message)
//!         }
//!         Err(e) => println!("Error: {}", e),
//!     }
//! }
//! ```
//!
//! # Notes
//!
//! - Errors that received a response always carry it, see [`ApiError::response`]
//! - Status errors are not classified further; inspect the status code instead

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::transport::{RawResponse, TransportError};

mod pagination;

pub use pagination::*;

/// Unified error type for all MoySklad API operations.
///
/// # Variants
///
/// | Variant | Description | Response kept |
/// |---------|-------------|---------------|
/// | `Transport` | Connection failure, timeout, cancellation | No |
/// | `Status` | Any non-2xx status | Yes |
/// | `Decode` | Body does not match the expected shape | Yes |
/// | `Encode` | Request body could not be serialized | No |
/// | `InvalidUrl` | Target or locator is not a valid URL | No |
/// | `InvalidHeader` | Credential is not a valid header value | No |
/// | `MissingLocator` | Async response without `Location`/`Content-Location` | Yes |
///
/// # Example
///
/// ```rust
/// use moysklad::api::ApiError;
///
/// fn describe(error: &ApiError) -> String {
///     match error.status() {
///         Some(status) => format!("HTTP {}", status.as_u16()),
///         None => "no response".to_string(),
///     }
/// }
/// ```
#[derive(Error, Debug)]
pub enum ApiError {
    /// No response was received.
    #[error("Network error: {0}")]
    Transport(#[from] TransportError),

    /// The server answered with a non-success status.
    ///
    /// `message` is the first server diagnostic, or the raw body when the
    /// body carries none.
    #[error("API error ({status}): {message}")]
    Status {
        /// HTTP status code.
        status: StatusCode,
        /// Human readable summary.
        message: String,
        /// Parsed server diagnostics, possibly empty.
        errors: Vec<ApiErrorDetail>,
        /// The full response.
        response: RawResponse,
    },

    /// The response body could not be decoded into the expected type.
    #[error("Failed to decode response: {source}")]
    Decode {
        /// The JSON error.
        source: serde_json::Error,
        /// The response whose body failed to decode.
        response: RawResponse,
    },

    /// The request body could not be serialized to JSON.
    #[error("Failed to encode request body: {0}")]
    Encode(serde_json::Error),

    /// A target URL or locator could not be parsed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// A credential could not be encoded as a header value.
    #[error("Invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),

    /// An async response lacked one of its locator headers.
    #[error("Async response is missing a valid '{header}' header")]
    MissingLocator {
        /// Name of the missing header.
        header: &'static str,
        /// The accepted response.
        response: RawResponse,
    },
}

impl ApiError {
    /// Returns the response that caused the error, if one was received.
    pub fn response(&self) -> Option<&RawResponse> {
        match self {
            Self::Status { response, .. }
            | Self::Decode { response, .. }
            | Self::MissingLocator { response, .. } => Some(response),
            _ => None,
        }
    }

    /// Returns the HTTP status of the failing response, if any.
    pub fn status(&self) -> Option<StatusCode> {
        self.response().map(|r| r.status)
    }

    /// Returns the server diagnostics for status errors.
    pub fn details(&self) -> &[ApiErrorDetail] {
        match self {
            Self::Status { errors, .. } => errors,
            _ => &[],
        }
    }

    /// Builds a [`ApiError::Status`] from a failed response.
    pub fn from_response(response: RawResponse) -> Self {
        let errors = parse_error_details(&response.body);
        let message = errors
            .first()
            .map(|e| e.error.clone())
            .unwrap_or_else(|| {
                let text = response.text();
                if text.trim().is_empty() {
                    response
                        .status
                        .canonical_reason()
                        .unwrap_or("Unknown status")
                        .to_string()
                } else {
                    text
                }
            });

        Self::Status {
            status: response.status,
            message,
            errors,
            response,
        }
    }
}

/// One diagnostic from a MoySklad error body.
///
/// MoySklad returns errors in the format:
/// ```json
/// {"errors": [{"error": "Human readable message", "code": 1021, "moreInfo": "https://..."}]}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiErrorDetail {
    /// Human readable message.
    pub error: String,

    /// Numeric MoySklad error code.
    #[serde(default)]
    pub code: Option<i64>,

    /// Offending parameter, when the server names one.
    #[serde(default)]
    pub parameter: Option<String>,

    /// Documentation link for the error code.
    #[serde(default)]
    pub more_info: Option<String>,

    /// Line of the offending JSON, for body parse errors.
    #[serde(default)]
    pub line: Option<u32>,

    /// Column of the offending JSON, for body parse errors.
    #[serde(default)]
    pub column: Option<u32>,
}

impl std::fmt::Display for ApiErrorDetail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.code {
            Some(code) => write!(f, "{} (code {})", self.error, code),
            None => f.write_str(&self.error),
        }
    }
}

/// Extracts server diagnostics from an error body.
///
/// Accepts both the list form (`{"errors": [...]}`) and a bare single error
/// object. Returns an empty list if the body is not a recognised error.
pub fn parse_error_details(body: &[u8]) -> Vec<ApiErrorDetail> {
    #[derive(Deserialize)]
    struct ErrorBody {
        errors: Vec<ApiErrorDetail>,
    }

    if let Ok(parsed) = serde_json::from_slice::<ErrorBody>(body) {
        return parsed.errors;
    }
    if let Ok(single) = serde_json::from_slice::<ApiErrorDetail>(body) {
        return vec![single];
    }
    Vec::new()
}
