//
//  moysklad-cli
//  api/request.rs
//
//  Created by Ngonidzashe Mangudya on 2026/10/16.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Generic Request Builder
//!
//! Every call the SDK makes goes through [`Request`]: a single-use builder
//! that accumulates a target (a path below the API root, or an explicit URL
//! handed out by the server), query parameters and an optional JSON body,
//! then performs exactly one HTTP round trip and decodes the body into `T`.
//!
//! Per-resource services are thin wrappers choosing a path and a result type;
//! there is no per-resource request code.
//!
//! ## Example
//!
//! ```rust,no_run
//! use moysklad::api::{MoySkladClient, Params};
//! use moysklad::api::common::EntityList;
//! use moysklad::api::model::Product;
//!
//! # async fn example() -> Result<(), moysklad::api::ApiError> {
//! let client = MoySkladClient::new()?;
//! let page = client
//!     .request::<EntityList<Product>>("entity/product")
//!     .with_params(Params::new().limit(10).search("coffee"))
//!     .get()
//!     .await?;
//!
//! println!("{} of {:?}", page.data.rows.len(), page.data.total());
//! # Ok(())
//! # }
//! ```
//!
//! ## Outcomes
//!
//! - Success yields a [`Response`] holding the decoded value and the
//!   [`RawResponse`].
//! - A non-2xx status yields [`ApiError::Status`], carrying the response.
//! - A body that does not decode as `T` yields [`ApiError::Decode`], carrying
//!   the response.
//!
//! Nothing is retried.

use std::marker::PhantomData;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

use super::client::MoySkladClient;
use super::common::ApiError;
use super::params::Params;
use super::task::AsyncTask;
use super::transport::{HttpRequest, RawResponse};

/// `Accept` value required by the JSON API.
pub const ACCEPT_JSON: &str = "application/json;charset=utf-8";

/// A decoded response body together with the raw response.
#[derive(Debug, Clone)]
pub struct Response<T> {
    /// The decoded body.
    pub data: T,
    /// Status, headers and undecoded body.
    pub raw: RawResponse,
}

impl<T> Response<T> {
    /// Discards the raw response.
    pub fn into_data(self) -> T {
        self.data
    }
}

enum Target {
    Path(String),
    Url(String),
}

/// Single-use request builder, created by [`MoySkladClient::request`].
///
/// # Type Parameters
///
/// - `T` - The type the response body decodes into
pub struct Request<'c, T> {
    client: &'c MoySkladClient,
    target: Target,
    params: Params,
    body: Option<Result<Vec<u8>, serde_json::Error>>,
    headers: HeaderMap,
    timeout: Option<Duration>,
    _result: PhantomData<fn() -> T>,
}

impl<'c, T> Request<'c, T> {
    pub(crate) fn new(client: &'c MoySkladClient, path: impl Into<String>) -> Self {
        Self {
            client,
            target: Target::Path(path.into()),
            params: Params::new(),
            body: None,
            headers: HeaderMap::new(),
            timeout: None,
            _result: PhantomData,
        }
    }

    /// Appends `/suffix` to the path.
    ///
    /// The suffix is used as is; escaping is the caller's business.
    pub fn with_path(mut self, suffix: &str) -> Self {
        if let Target::Path(path) = &mut self.target {
            let suffix = suffix.trim_start_matches('/');
            if !suffix.is_empty() {
                if !path.is_empty() && !path.ends_with('/') {
                    path.push('/');
                }
                path.push_str(suffix);
            }
        }
        self
    }

    /// Adds query parameters. Later values replace earlier ones per key.
    pub fn with_params(mut self, params: Params) -> Self {
        for (key, value) in params.iter() {
            self.params = std::mem::take(&mut self.params).set(key, value.clone());
        }
        self
    }

    /// Attaches a JSON body. Ignored by GET and DELETE.
    ///
    /// Serialization errors surface from the terminal call.
    pub fn with_body<B: Serialize + ?Sized>(mut self, body: &B) -> Self {
        self.body = Some(serde_json::to_vec(body));
        self
    }

    /// Targets an explicit URL instead of the path, ignoring path and params.
    ///
    /// Used for server-supplied links such as `nextHref` or async locators.
    /// A relative URL is resolved against the client base URL.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.target = Target::Url(url.into());
        self
    }

    /// Overrides the transport timeout for this request.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Adds a request header.
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Returns the URL the request will be sent to.
    pub fn target(&self) -> Result<Url, ApiError> {
        match &self.target {
            Target::Url(url) => self.client.resolve_url(url),
            Target::Path(path) => {
                let mut url = self.client.endpoint(path)?;
                self.params.append_to(&mut url);
                Ok(url)
            }
        }
    }

    /// Performs the request and returns the raw response, failing on
    /// transport errors and non-2xx statuses.
    pub async fn send(self, method: Method) -> Result<RawResponse, ApiError> {
        let url = self.target()?;
        self.dispatch(method, url).await
    }

    /// Performs a DELETE. The body, if any, is not decoded.
    ///
    /// `data` is `true` for any 2xx status; other statuses are errors.
    pub async fn delete(self) -> Result<Response<bool>, ApiError> {
        let raw = self.send(Method::DELETE).await?;
        Ok(Response {
            data: raw.is_success(),
            raw,
        })
    }

    async fn dispatch(self, method: Method, url: Url) -> Result<RawResponse, ApiError> {
        let mut request = HttpRequest::new(method.clone(), url);
        request.timeout = self.timeout;
        request
            .headers
            .insert(ACCEPT, HeaderValue::from_static(ACCEPT_JSON));
        if let Some(value) = self.client.authorization()? {
            request.headers.insert(AUTHORIZATION, value);
        }

        if method != Method::GET && method != Method::DELETE {
            if let Some(body) = self.body {
                request.body = Some(body.map_err(ApiError::Encode)?);
                request
                    .headers
                    .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
            }
        }
        request.headers.extend(self.headers);

        tracing::debug!(method = %request.method, url = %request.url, "Sending request");
        let response = self.client.transport().send(request).await?;
        tracing::debug!(status = %response.status, bytes = response.body.len(), "Received response");

        if !response.is_success() {
            return Err(ApiError::from_response(response));
        }
        Ok(response)
    }
}

impl<'c, T: DeserializeOwned> Request<'c, T> {
    /// Performs a GET and decodes the body.
    pub async fn get(self) -> Result<Response<T>, ApiError> {
        self.call(Method::GET).await
    }

    /// Performs a POST with the attached body and decodes the response.
    pub async fn post(self) -> Result<Response<T>, ApiError> {
        self.call(Method::POST).await
    }

    /// Performs a PUT with the attached body and decodes the response.
    pub async fn put(self) -> Result<Response<T>, ApiError> {
        self.call(Method::PUT).await
    }

    /// Starts the request as a server-side async task.
    ///
    /// A path target gets `async=true` added to its query. The request is a
    /// POST when a body is attached, a GET otherwise. The server must accept
    /// it (any 2xx, normally 202) and name the status and result locators in
    /// `Location` and `Content-Location`; a missing or unparseable locator is
    /// [`ApiError::MissingLocator`].
    pub async fn run_async(mut self) -> Result<AsyncTask<T>, ApiError> {
        if matches!(self.target, Target::Path(_)) {
            self.params = std::mem::take(&mut self.params).set("async", "true");
        }
        let method = if self.body.is_some() {
            Method::POST
        } else {
            Method::GET
        };

        let client = self.client.clone();
        let response = self.send(method).await?;

        let status_url = match locator(&client, &response, "Location") {
            Some(url) => url,
            None => {
                return Err(ApiError::MissingLocator {
                    header: "Location",
                    response,
                })
            }
        };
        let result_url = match locator(&client, &response, "Content-Location") {
            Some(url) => url,
            None => {
                return Err(ApiError::MissingLocator {
                    header: "Content-Location",
                    response,
                })
            }
        };

        tracing::debug!(status = %status_url, result = %result_url, "Async task accepted");
        Ok(AsyncTask::from_locators(client, status_url, result_url))
    }

    async fn call(self, method: Method) -> Result<Response<T>, ApiError> {
        let raw = self.send(method).await?;
        match serde_json::from_slice(&raw.body) {
            Ok(data) => Ok(Response { data, raw }),
            Err(source) => Err(ApiError::Decode {
                source,
                response: raw,
            }),
        }
    }
}

fn locator(client: &MoySkladClient, response: &RawResponse, header: &str) -> Option<Url> {
    response
        .header(header)
        .filter(|value| !value.trim().is_empty())
        .and_then(|value| client.resolve_url(value.trim()).ok())
}
