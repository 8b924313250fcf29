//! Fetch-by-id contract for related entities

use anyhow::Result;
use async_trait::async_trait;
use cg_core::{EntityId, Record};
use serde::{Deserialize, Serialize};
use std::future::Future;

/// Backend response envelope for a single entity
///
/// `success: false`, or `success: true` without `data`, is a soft miss.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FetchResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Record>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl FetchResponse {
    /// Successful response carrying an entity
    pub fn ok(data: Record) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }

    /// Successful response without a body (e.g. a PATCH acknowledgement)
    pub fn accepted() -> Self {
        Self {
            success: true,
            data: None,
            message: None,
        }
    }

    /// Non-success response with a reason
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message.into()),
        }
    }

    /// The entity, if this response carries one
    pub fn into_entity(self) -> Option<Record> {
        if self.success {
            self.data
        } else {
            None
        }
    }
}

/// Fetches one related entity by id
///
/// An `Err` means the request itself failed (transport, decoding). The
/// hydrator treats both that and a non-success response as a soft miss.
#[async_trait]
pub trait EntityFetcher: Send + Sync {
    async fn fetch(&self, id: &EntityId) -> Result<FetchResponse>;
}

/// Adapter turning an async closure into an [`EntityFetcher`]
pub struct FnFetcher<F> {
    f: F,
}

/// Wrap an async closure as a fetcher
///
/// ```ignore
/// let users = fetch_fn(move |id| {
///     let api = api.clone();
///     async move { api.get_user(&id).await }
/// });
/// ```
pub fn fetch_fn<F, Fut>(f: F) -> FnFetcher<F>
where
    F: Fn(EntityId) -> Fut + Send + Sync,
    Fut: Future<Output = Result<FetchResponse>> + Send + 'static,
{
    FnFetcher { f }
}

#[async_trait]
impl<F, Fut> EntityFetcher for FnFetcher<F>
where
    F: Fn(EntityId) -> Fut + Send + Sync,
    Fut: Future<Output = Result<FetchResponse>> + Send + 'static,
{
    async fn fetch(&self, id: &EntityId) -> Result<FetchResponse> {
        (self.f)(id.clone()).await
    }
}
