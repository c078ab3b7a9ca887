//
//  moysklad-cli
//  api/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # API Client Layer
//!
//! This module provides the SDK for the MoySklad JSON API 1.2
//! (`https://api.moysklad.ru/api/remap/1.2`).
//!
//! ## Architecture
//!
//! The API layer is organized as follows:
//!
//! - [`client`]: The client holding transport, base URL and credential
//! - [`request`]: The generic request builder used by every call
//! - [`params`]: Ordered query parameters and MoySklad filter helpers
//! - [`task`]: Handles to server-side async tasks
//! - [`service`]: Generic CRUD over any entity collection
//! - [`model`]: Entity types, metadata headers and the retail operation envelope
//! - [`transport`]: The HTTP seam, with a reqwest implementation
//! - [`common`]: Shared types (errors, list envelopes)
//!
//! ## Usage
//!
//! ```rust,no_run
//! use moysklad::api::{MoySkladClient, Params};
//! use moysklad::api::model::Product;
//! use moysklad::auth::AuthCredential;
//!
//! # async fn example() -> Result<(), moysklad::api::ApiError> {
//! let client = MoySkladClient::new()?.with_auth(AuthCredential::bearer("your-token"));
//!
//! let products = client
//!     .entity::<Product>()
//!     .list(Params::new().limit(100))
//!     .await?;
//! for product in &products.data.rows {
//!     println!("{:?}", product.name);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! All operations return [`ApiError`]. Any error that received a response
//! keeps it; see [`ApiError::response`].

/// Core client: transport, base URL, credential.
pub mod client;

/// Shared error and list envelope types.
pub mod common;

/// Entity model.
pub mod model;

pub mod params;
pub mod request;
pub mod service;
pub mod task;
pub mod transport;

pub use client::MoySkladClient;
pub use common::{ApiError, ApiErrorDetail, EntityList};
pub use params::{FilterOp, ParamValue, Params, SortDir};
pub use request::{Request, Response};
pub use service::{follow_pages, EntityService, PageScan};
pub use task::{AsyncTask, TaskState, TaskStatus};
pub use transport::{HttpRequest, RawResponse, ReqwestTransport, Transport, TransportError};
