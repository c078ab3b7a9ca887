//
//  moysklad-cli
//  api/transport.rs
//
//  Created by Ngonidzashe Mangudya on 2026/10/16.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # HTTP Transport
//!
//! The transport is the only piece of the SDK that touches the network. Every
//! [`Request`](super::request::Request) hands a fully prepared [`HttpRequest`] to
//! a [`Transport`] and gets back a [`RawResponse`] holding the status line,
//! headers and body bytes.
//!
//! The default implementation, [`ReqwestTransport`], wraps a pooled
//! `reqwest::Client`. Tests and embedders can inject their own implementation
//! through [`MoySkladClient::with_transport`](super::MoySkladClient::with_transport).
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use moysklad::api::{MoySkladClient, ReqwestTransport};
//!
//! let transport = ReqwestTransport::new("msk/0.1.0", Some(Duration::from_secs(30)))?;
//! let client = MoySkladClient::new()?.with_transport(Arc::new(transport));
//! # Ok::<(), moysklad::api::ApiError>(())
//! ```

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::{Client, Method, StatusCode};
use thiserror::Error;
use url::Url;

/// Errors raised below the HTTP layer: no response was received.
#[derive(Error, Debug)]
pub enum TransportError {
    /// The underlying HTTP client failed (connect, TLS, body read).
    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    /// The request did not complete before its deadline.
    #[error("Request timed out")]
    Timeout,

    /// Any other transport failure, used by custom transports.
    #[error("{0}")]
    Other(String),
}

impl TransportError {
    /// Returns `true` when the failure was a deadline expiry.
    pub fn is_timeout(&self) -> bool {
        match self {
            Self::Timeout => true,
            Self::Http(e) => e.is_timeout(),
            Self::Other(_) => false,
        }
    }
}

/// A fully resolved HTTP request, ready to be sent.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    /// HTTP verb.
    pub method: Method,
    /// Absolute target URL including the query string.
    pub url: Url,
    /// Request headers (authorization, accept, content type).
    pub headers: HeaderMap,
    /// Serialized JSON body, if any.
    pub body: Option<Vec<u8>>,
    /// Per-request deadline overriding the transport default.
    pub timeout: Option<Duration>,
}

impl HttpRequest {
    /// Creates a request with no headers, body or timeout.
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            headers: HeaderMap::new(),
            body: None,
            timeout: None,
        }
    }
}

/// Status, headers and body of an HTTP response.
///
/// A `RawResponse` is returned alongside every decoded result and is carried
/// by every [`ApiError`](super::ApiError) that received a response, so callers
/// can always inspect what the server actually said.
#[derive(Debug, Clone)]
pub struct RawResponse {
    /// HTTP status code.
    pub status: StatusCode,
    /// Response headers.
    pub headers: HeaderMap,
    /// Undecoded response body.
    pub body: Vec<u8>,
}

impl RawResponse {
    /// Creates a response from its parts.
    pub fn new(status: StatusCode, headers: HeaderMap, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers,
            body: body.into(),
        }
    }

    /// Returns `true` for any 2xx status.
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Returns the body as UTF-8 text, replacing invalid sequences.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Returns a header value as a string, if present and valid ASCII.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// An HTTP client capable of executing one request and returning its response.
///
/// Implementations must be shareable between tasks; the SDK holds a single
/// transport behind an `Arc` for the lifetime of a client.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Executes `request` and returns the response, whatever its status.
    ///
    /// Non-2xx statuses are not errors at this level; only failures to obtain
    /// a response are.
    async fn send(&self, request: HttpRequest) -> Result<RawResponse, TransportError>;
}

/// Default [`Transport`] backed by `reqwest` with rustls and gzip support.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http: Client,
}

impl ReqwestTransport {
    /// Builds a pooled client with the given user agent and optional
    /// default timeout.
    pub fn new(user_agent: &str, timeout: Option<Duration>) -> Result<Self, TransportError> {
        let mut builder = Client::builder().user_agent(user_agent).gzip(true);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            http: builder.build()?,
        })
    }

    /// Wraps an existing `reqwest::Client`.
    pub fn from_client(http: Client) -> Self {
        Self { http }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<RawResponse, TransportError> {
        let mut builder = self
            .http
            .request(request.method, request.url)
            .headers(request.headers);

        if let Some(body) = request.body {
            builder = builder.body(body);
        }
        if let Some(timeout) = request.timeout {
            builder = builder.timeout(timeout);
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                TransportError::Timeout
            } else {
                TransportError::Http(e)
            }
        })?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?.to_vec();

        Ok(RawResponse {
            status,
            headers,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    #[test]
    fn test_raw_response_accessors() {
        let mut headers = HeaderMap::new();
        headers.insert("location", HeaderValue::from_static("/status/1"));
        let response = RawResponse::new(StatusCode::ACCEPTED, headers, b"{}".to_vec());

        assert!(response.is_success());
        assert_eq!(response.header("location"), Some("/status/1"));
        assert_eq!(response.header("content-location"), None);
        assert_eq!(response.text(), "{}");
    }

    #[test]
    fn test_transport_error_timeout() {
        assert!(TransportError::Timeout.is_timeout());
        assert!(!TransportError::Other("boom".into()).is_timeout());
    }
}
