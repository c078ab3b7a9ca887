//
//  moysklad-cli
//  api/service.rs
//
//  Created by Ngonidzashe Mangudya on 2026/10/16.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Entity Service
//!
//! [`EntityService`] exposes the CRUD operations every MoySklad collection
//! shares, for any [`Entity`] kind. It is a thin layer over
//! [`Request`](super::request::Request): each method picks a path suffix and a
//! result type and performs one call (or one call per page for
//! [`list_all`](EntityService::list_all)).
//!
//! ## Example
//!
//! ```rust,no_run
//! use moysklad::api::{MoySkladClient, Params};
//! use moysklad::api::model::{Counterparty, Entity};
//!
//! # async fn example() -> Result<(), moysklad::api::ApiError> {
//! let client = MoySkladClient::new()?;
//! let agents = client.entity::<Counterparty>();
//!
//! let mut agent = Counterparty::default();
//! agent.set_name("ООО Ромашка").set_inn("7701234567");
//! let created = agents.create(&agent).await?.data;
//!
//! let id = created.id.value().cloned().unwrap_or_default();
//! agents.delete(&id).await?;
//! # Ok(())
//! # }
//! ```

use std::marker::PhantomData;

use serde::de::DeserializeOwned;

use super::client::MoySkladClient;
use super::common::{ApiError, EntityList};
use super::model::Entity;
use super::params::Params;
use super::request::{Request, Response};
use super::task::AsyncTask;

/// CRUD operations on one collection.
///
/// # Type Parameters
///
/// - `E` - The entity kind stored in the collection
pub struct EntityService<'c, E> {
    client: &'c MoySkladClient,
    path: String,
    _entity: PhantomData<fn() -> E>,
}

impl<'c, E: Entity> EntityService<'c, E> {
    /// A service over `E`'s default collection path.
    pub fn new(client: &'c MoySkladClient) -> Self {
        Self::at(client, E::path())
    }

    /// A service over an explicit collection path, for nested collections.
    pub fn at(client: &'c MoySkladClient, path: impl Into<String>) -> Self {
        Self {
            client,
            path: path.into(),
            _entity: PhantomData,
        }
    }

    /// The collection path relative to the API root.
    pub fn path(&self) -> &str {
        &self.path
    }

    fn request<T>(&self) -> Request<'c, T> {
        self.client.request(self.path.clone())
    }

    /// Fetches one page.
    pub async fn list(&self, params: Params) -> Result<Response<EntityList<E>>, ApiError> {
        self.request().with_params(params).get().await
    }

    /// Fetches every page, following `nextHref` until it disappears.
    pub async fn list_all(&self, params: Params) -> Result<Vec<E>, ApiError> {
        let first = self.list(params).await?.data;
        Ok(follow_pages(self.client, first, None).await?.rows)
    }

    /// Fetches one entity by id.
    pub async fn get(&self, id: &str, params: Params) -> Result<Response<E>, ApiError> {
        self.request().with_path(id).with_params(params).get().await
    }

    /// Creates an entity.
    pub async fn create(&self, entity: &E) -> Result<Response<E>, ApiError> {
        self.request().with_body(entity).post().await
    }

    /// Creates or updates several entities in one call.
    ///
    /// Entities carrying a `meta` header are updated, the others created.
    pub async fn create_many(&self, entities: &[E]) -> Result<Response<Vec<E>>, ApiError> {
        self.request().with_body(entities).post().await
    }

    /// Updates the entity `id` with the attributes set on `entity`.
    ///
    /// Absent attributes are left untouched; cleared ones are nulled.
    pub async fn update(&self, id: &str, entity: &E) -> Result<Response<E>, ApiError> {
        self.request().with_path(id).with_body(entity).put().await
    }

    /// Deletes the entity `id`.
    pub async fn delete(&self, id: &str) -> Result<Response<bool>, ApiError> {
        self.request::<()>().with_path(id).delete().await
    }

    /// Starts a full listing as a server-side async task.
    pub async fn list_async(&self, params: Params) -> Result<AsyncTask<EntityList<E>>, ApiError> {
        self.request().with_params(params).run_async().await
    }
}

/// Rows gathered by [`follow_pages`].
#[derive(Debug, Clone)]
pub struct PageScan<T> {
    /// Rows of every fetched page, in server order.
    pub rows: Vec<T>,
    /// `meta.size` of the first page.
    pub total: Option<u64>,
    /// `true` when the page limit was reached before the last page.
    pub truncated: bool,
}

/// Collects the rows of `first` and of every page after it.
///
/// Follows `nextHref` until it disappears or `max_pages` pages (counting
/// `first`) have been read.
pub async fn follow_pages<T: DeserializeOwned>(
    client: &MoySkladClient,
    first: EntityList<T>,
    max_pages: Option<usize>,
) -> Result<PageScan<T>, ApiError> {
    let total = first.total();
    let mut page = first;
    let mut rows = Vec::new();
    let mut pages = 1;

    loop {
        let next = page.next_url().map(str::to_string);
        rows.append(&mut page.rows);

        let Some(next) = next else {
            return Ok(PageScan {
                rows,
                total,
                truncated: false,
            });
        };
        if max_pages.is_some_and(|max| pages >= max) {
            return Ok(PageScan {
                rows,
                total,
                truncated: true,
            });
        }

        tracing::debug!(next = %next, fetched = rows.len(), "Fetching next page");
        page = client
            .request::<EntityList<T>>("")
            .with_url(next)
            .get()
            .await?
            .data;
        pages += 1;
    }
}
