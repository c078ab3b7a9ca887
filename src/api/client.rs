//
//  moysklad-cli
//  api/client.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # MoySklad API Client
//!
//! This module provides the client every request starts from. It holds the
//! shared transport, the API base URL and the credential, and hands out
//! [`Request`] builders and typed [`EntityService`]s.
//!
//! ## Features
//!
//! - Pluggable transport (reqwest by default)
//! - Bearer or Basic authorization on every request
//! - Relative locator resolution for pagination links and async tasks
//! - Cheap to clone; clones share the transport

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::HeaderValue;
use url::Url;

use super::common::ApiError;
use super::model::{EmployeeContext, Entity, Slot, StoreZone};
use super::request::{Request, Response};
use super::service::EntityService;
use super::transport::{ReqwestTransport, Transport};
use crate::auth::{AuthCredential, IssuedToken};
use crate::config::{self, HostConfig};

/// The main client for the MoySklad JSON API.
///
/// # Creating a Client
///
/// ```rust,no_run
/// use moysklad::api::MoySkladClient;
/// use moysklad::auth::AuthCredential;
///
/// // Public API at api.moysklad.ru
/// let client = MoySkladClient::new()?
///     .with_auth(AuthCredential::bearer("your-token"));
///
/// // Any other root, e.g. a test server
/// let local = MoySkladClient::with_base_url("http://127.0.0.1:8080/api/remap/1.2")?;
/// # Ok::<(), moysklad::api::ApiError>(())
/// ```
///
/// # Sharing
///
/// Cloning is cheap: clones share one transport (and so one connection
/// pool). The client itself has no other mutable state.
#[derive(Clone)]
pub struct MoySkladClient {
    /// Executes HTTP requests
    transport: Arc<dyn Transport>,
    /// API root, e.g. `https://api.moysklad.ru/api/remap/1.2`
    base_url: Url,
    /// Optional authentication credentials
    auth: Option<AuthCredential>,
}

impl MoySkladClient {
    /// Creates a client for the public API at
    /// `https://api.moysklad.ru/api/remap/1.2`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client could not be created.
    pub fn new() -> Result<Self, ApiError> {
        Self::with_base_url(&config::api_base_url(
            config::DEFAULT_HOST,
            config::DEFAULT_API_VERSION,
        ))
    }

    /// Creates a client for an explicit API root.
    ///
    /// # Parameters
    ///
    /// * `base_url` - Absolute URL of the API root, with or without a
    ///   trailing slash
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidUrl`] if `base_url` is not an absolute URL.
    ///
    /// # Example
    ///
    /// ```rust
    /// use moysklad::api::MoySkladClient;
    ///
    /// let client = MoySkladClient::with_base_url("https://api.moysklad.ru/api/remap/1.2/")?;
    /// assert_eq!(client.base_url().as_str(), "https://api.moysklad.ru/api/remap/1.2");
    /// # Ok::<(), moysklad::api::ApiError>(())
    /// ```
    pub fn with_base_url(base_url: &str) -> Result<Self, ApiError> {
        let transport = ReqwestTransport::new(&user_agent(), None)?;
        Ok(Self {
            transport: Arc::new(transport),
            base_url: parse_base(base_url)?,
            auth: None,
        })
    }

    /// Creates a client from a host configuration.
    ///
    /// # Parameters
    ///
    /// * `config` - The host entry (host and API version)
    /// * `timeout` - Default per-request timeout, if any
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use std::time::Duration;
    /// use moysklad::api::MoySkladClient;
    /// use moysklad::config::HostConfig;
    ///
    /// let config = HostConfig {
    ///     host: "api.moysklad.ru".to_string(),
    ///     ..Default::default()
    /// };
    /// let client = MoySkladClient::from_config(&config, Some(Duration::from_secs(30)))?;
    /// # Ok::<(), moysklad::api::ApiError>(())
    /// ```
    pub fn from_config(config: &HostConfig, timeout: Option<Duration>) -> Result<Self, ApiError> {
        let transport = ReqwestTransport::new(&user_agent(), timeout)?;
        Ok(Self {
            transport: Arc::new(transport),
            base_url: parse_base(&config.base_url())?,
            auth: None,
        })
    }

    /// Replaces the transport. Used to inject test doubles.
    pub fn with_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = transport;
        self
    }

    /// Sets the credential sent with every request.
    pub fn with_auth(mut self, auth: AuthCredential) -> Self {
        self.auth = Some(auth);
        self
    }

    /// Returns the configured credential.
    pub fn auth(&self) -> Option<&AuthCredential> {
        self.auth.as_ref()
    }

    /// Returns the API root, without a trailing slash.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Starts a request to `path`, relative to the API root.
    ///
    /// # Type Parameters
    ///
    /// * `T` - The type to decode the response body into
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use moysklad::api::MoySkladClient;
    /// use moysklad::api::model::Currency;
    ///
    /// # async fn example() -> Result<(), moysklad::api::ApiError> {
    /// let client = MoySkladClient::new()?;
    /// let rub = client
    ///     .request::<Currency>("entity/currency")
    ///     .with_path("7f6b4a6e-1d2c-11e6-9464-e4de00000053")
    ///     .get()
    ///     .await?;
    /// println!("{:?}", rub.data.iso_code);
    /// # Ok(())
    /// # }
    /// ```
    pub fn request<T>(&self, path: impl Into<String>) -> Request<'_, T> {
        Request::new(self, path)
    }

    /// Returns the CRUD service of `E`'s collection.
    pub fn entity<E: Entity>(&self) -> EntityService<'_, E> {
        EntityService::new(self)
    }

    /// Returns the zones of store `store_id`.
    pub fn store_zones(&self, store_id: &str) -> EntityService<'_, StoreZone> {
        EntityService::at(self, format!("entity/store/{store_id}/zones"))
    }

    /// Returns the slots of store `store_id`.
    pub fn store_slots(&self, store_id: &str) -> EntityService<'_, Slot> {
        EntityService::at(self, format!("entity/store/{store_id}/slots"))
    }

    /// Fetches the authenticated employee and their permissions.
    ///
    /// The result is not cached; every call asks the server.
    pub async fn employee_context(&self) -> Result<Response<EmployeeContext>, ApiError> {
        self.request("context/employee").get().await
    }

    /// Exchanges the configured Basic credential for an access token.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use moysklad::api::MoySkladClient;
    /// use moysklad::auth::AuthCredential;
    ///
    /// # async fn example() -> Result<(), moysklad::api::ApiError> {
    /// let client = MoySkladClient::new()?
    ///     .with_auth(AuthCredential::basic("admin@shop", "secret"));
    /// let token = client.issue_token().await?.data;
    /// let client = client.with_auth(AuthCredential::bearer(token.access_token));
    /// # Ok(())
    /// # }
    /// ```
    pub async fn issue_token(&self) -> Result<Response<IssuedToken>, ApiError> {
        self.request("security/token").post().await
    }

    pub(crate) fn transport(&self) -> &Arc<dyn Transport> {
        &self.transport
    }

    /// Absolute URL of `path` below the API root.
    pub(crate) fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        let path = path.trim_start_matches('/');
        if path.is_empty() {
            return Ok(self.base_url.clone());
        }
        Ok(Url::parse(&format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path
        ))?)
    }

    /// Resolves a server-supplied locator.
    ///
    /// Absolute URLs are taken as is, host-relative ones (`/status/1`) are
    /// joined to the host, anything else is taken as a path below the root.
    pub(crate) fn resolve_url(&self, locator: &str) -> Result<Url, ApiError> {
        match Url::parse(locator) {
            Ok(url) => Ok(url),
            Err(url::ParseError::RelativeUrlWithoutBase) if locator.starts_with('/') => {
                Ok(self.base_url.join(locator)?)
            }
            Err(url::ParseError::RelativeUrlWithoutBase) => self.endpoint(locator),
            Err(e) => Err(e.into()),
        }
    }

    pub(crate) fn authorization(&self) -> Result<Option<HeaderValue>, ApiError> {
        match &self.auth {
            Some(auth) => {
                let mut value = HeaderValue::from_str(&auth.authorization())?;
                value.set_sensitive(true);
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }
}

impl std::fmt::Debug for MoySkladClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MoySkladClient")
            .field("base_url", &self.base_url.as_str())
            .field("authenticated", &self.auth.is_some())
            .finish()
    }
}

fn user_agent() -> String {
    format!("{}/{}", crate::APP_NAME, crate::VERSION)
}

fn parse_base(base_url: &str) -> Result<Url, ApiError> {
    Ok(Url::parse(base_url.trim_end_matches('/'))?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> MoySkladClient {
        MoySkladClient::with_base_url("https://api.moysklad.ru/api/remap/1.2/").unwrap()
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        assert_eq!(
            client().base_url().as_str(),
            "https://api.moysklad.ru/api/remap/1.2"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(
            MoySkladClient::with_base_url("not a url"),
            Err(ApiError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_resolve_url() {
        let client = client();
        assert_eq!(
            client.resolve_url("/api/remap/1.2/async/9/result").unwrap().as_str(),
            "https://api.moysklad.ru/api/remap/1.2/async/9/result"
        );
        assert_eq!(
            client.resolve_url("entity/product").unwrap().as_str(),
            "https://api.moysklad.ru/api/remap/1.2/entity/product"
        );
        assert_eq!(
            client.resolve_url("https://other.example/x").unwrap().as_str(),
            "https://other.example/x"
        );
    }

    #[test]
    fn test_nested_collection_paths() {
        let client = client();
        assert_eq!(client.store_zones("s1").path(), "entity/store/s1/zones");
        assert_eq!(client.store_slots("s1").path(), "entity/store/s1/slots");
        assert_eq!(
            client.entity::<crate::api::model::Product>().path(),
            "entity/product"
        );
    }

    #[test]
    fn test_authorization_header() {
        let client = client().with_auth(AuthCredential::bearer("abc"));
        let value = client.authorization().unwrap().unwrap();
        assert_eq!(value.to_str().unwrap(), "Bearer abc");
        assert!(value.is_sensitive());

        assert!(MoySkladClient::with_base_url("https://h/api")
            .unwrap()
            .authorization()
            .unwrap()
            .is_none());
    }
}
