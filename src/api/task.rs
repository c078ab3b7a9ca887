//
//  moysklad-cli
//  api/task.rs
//
//  Created by Ngonidzashe Mangudya on 2026/10/16.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Async Task Handle
//!
//! Heavy requests (large lists, reports) can run as server-side tasks. The
//! server accepts the request with `202 Accepted` and answers with two
//! locators: `Location` for the task status and `Content-Location` for the
//! result. [`AsyncTask`] wraps both.
//!
//! The handle holds no state of its own: every call is an independent
//! request, so it may be polled as often as needed and dropped at any time.
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use moysklad::api::MoySkladClient;
//! use moysklad::api::common::EntityList;
//! use moysklad::api::model::Product;
//!
//! # async fn example() -> Result<(), moysklad::api::ApiError> {
//! let client = MoySkladClient::new()?;
//! let task = client
//!     .request::<EntityList<Product>>("entity/product")
//!     .run_async()
//!     .await?;
//!
//! while !task.check().await? {
//!     tokio::time::sleep(Duration::from_secs(2)).await;
//! }
//! let products = task.result().await?.data;
//! println!("{} products", products.rows.len());
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::marker::PhantomData;

use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use url::Url;

use super::client::MoySkladClient;
use super::common::{ApiError, ApiErrorDetail};
use super::request::Response;

/// Server-side state of an async task.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TaskState {
    /// Queued.
    Pending,
    /// Running.
    Processing,
    /// Finished; the result is available.
    Done,
    /// Failed.
    Error,
    /// Cancelled.
    Cancel,
    /// Failed with an API error.
    ApiError,
    /// A state name this client does not know.
    Unknown(String),
}

impl TaskState {
    /// Returns `true` once the task can no longer change state.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TaskState::Done | TaskState::Error | TaskState::Cancel | TaskState::ApiError
        )
    }

    /// Wire name of the state.
    pub fn as_str(&self) -> &str {
        match self {
            TaskState::Pending => "PENDING",
            TaskState::Processing => "PROCESSING",
            TaskState::Done => "DONE",
            TaskState::Error => "ERROR",
            TaskState::Cancel => "CANCEL",
            TaskState::ApiError => "API_ERROR",
            TaskState::Unknown(name) => name,
        }
    }
}

impl From<&str> for TaskState {
    fn from(name: &str) -> Self {
        match name {
            "PENDING" => TaskState::Pending,
            "PROCESSING" => TaskState::Processing,
            "DONE" => TaskState::Done,
            "ERROR" => TaskState::Error,
            "CANCEL" => TaskState::Cancel,
            "API_ERROR" => TaskState::ApiError,
            other => TaskState::Unknown(other.to_string()),
        }
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for TaskState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for TaskState {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(TaskState::from(name.as_str()))
    }
}

/// Body of the status locator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStatus {
    /// Current state.
    pub state: TaskState,

    /// Kind of request the task runs, e.g. `entity_product`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_type: Option<String>,

    /// Diagnostics of a failed task.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<ApiErrorDetail>>,
}

/// Handle to a server-side async task whose result decodes as `T`.
pub struct AsyncTask<T> {
    client: MoySkladClient,
    status_url: Url,
    result_url: Url,
    _result: PhantomData<fn() -> T>,
}

impl<T> AsyncTask<T> {
    /// Builds a handle from known locators, e.g. ones saved by an earlier run.
    pub fn from_locators(client: MoySkladClient, status_url: Url, result_url: Url) -> Self {
        Self {
            client,
            status_url,
            result_url,
            _result: PhantomData,
        }
    }

    /// The status locator (`Location`).
    pub fn status_url(&self) -> &Url {
        &self.status_url
    }

    /// The result locator (`Content-Location`).
    pub fn result_url(&self) -> &Url {
        &self.result_url
    }

    /// Fetches the task status.
    pub async fn status(&self) -> Result<TaskStatus, ApiError> {
        let response = self
            .client
            .request::<TaskStatus>("")
            .with_url(self.status_url.as_str())
            .get()
            .await?;
        Ok(response.data)
    }

    /// Returns `true` iff the task is done.
    pub async fn check(&self) -> Result<bool, ApiError> {
        Ok(self.status().await?.state == TaskState::Done)
    }

    /// Asks the server to cancel the task.
    ///
    /// Returns `true` iff the server answered `204 No Content`.
    pub async fn cancel(&self) -> Result<bool, ApiError> {
        let url = cancel_url(&self.status_url)?;
        let response = self
            .client
            .request::<()>("")
            .with_url(url.as_str())
            .send(Method::PUT)
            .await?;
        Ok(response.status == StatusCode::NO_CONTENT)
    }
}

impl<T: DeserializeOwned> AsyncTask<T> {
    /// Fetches and decodes the task result.
    pub async fn result(&self) -> Result<Response<T>, ApiError> {
        self.client
            .request::<T>("")
            .with_url(self.result_url.as_str())
            .get()
            .await
    }
}

/// `<status path>/cancel`, keeping any query of the status locator.
fn cancel_url(status_url: &Url) -> Result<Url, ApiError> {
    let mut url = status_url.clone();
    url.set_fragment(None);
    url.path_segments_mut()
        .map_err(|()| ApiError::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
        .pop_if_empty()
        .push("cancel");
    Ok(url)
}

impl<T> Clone for AsyncTask<T> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            status_url: self.status_url.clone(),
            result_url: self.result_url.clone(),
            _result: PhantomData,
        }
    }
}

impl<T> fmt::Debug for AsyncTask<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AsyncTask")
            .field("status_url", &self.status_url.as_str())
            .field("result_url", &self.result_url.as_str())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_decodes() {
        let status: TaskStatus =
            serde_json::from_str(r#"{"state":"PROCESSING","requestType":"entity_product"}"#).unwrap();
        assert_eq!(status.state, TaskState::Processing);
        assert!(!status.state.is_terminal());

        let status: TaskStatus = serde_json::from_str(r#"{"state":"SLEEPING"}"#).unwrap();
        assert_eq!(status.state, TaskState::Unknown("SLEEPING".into()));
        assert!(!status.state.is_terminal());
    }

    #[test]
    fn test_terminal_states() {
        for name in ["DONE", "ERROR", "CANCEL", "API_ERROR"] {
            assert!(TaskState::from(name).is_terminal(), "{name}");
        }
        assert!(!TaskState::Pending.is_terminal());
    }

    #[test]
    fn test_failed_status_keeps_errors() {
        let status: TaskStatus = serde_json::from_str(
            r#"{"state":"API_ERROR","errors":[{"error":"Too many rows","code":1000}]}"#,
        )
        .unwrap();
        assert_eq!(status.state.to_string(), "API_ERROR");
        assert_eq!(status.errors.unwrap()[0].code, Some(1000));
    }

    #[test]
    fn test_cancel_url_appends_segment_to_path() {
        let cancel = |status: &str| cancel_url(&Url::parse(status).unwrap()).unwrap().to_string();

        assert_eq!(
            cancel("https://api.moysklad.ru/api/remap/1.2/async/7"),
            "https://api.moysklad.ru/api/remap/1.2/async/7/cancel"
        );
        assert_eq!(cancel("https://h/status/123/"), "https://h/status/123/cancel");
        assert_eq!(
            cancel("https://h/status/123?lang=ru#top"),
            "https://h/status/123/cancel?lang=ru"
        );
    }
}
