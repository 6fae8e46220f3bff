//! Typed calls for the RabbitMQ management HTTP API.
//!
//! Every method picks a verb, builds a path with percent-encoded segments and
//! hands off to [`ApiClient`]. Failures are the transport's failures,
//! unchanged.

mod connections;
mod exchanges;
mod nodes;
mod overview;
mod policies;
mod queues;
mod users;
mod vhosts;

pub mod types;

pub use queues::QueuePages;
pub use rabbitmq_admin_api::pagination::{collect_pages, PagedResponse, Paginator};
pub use rabbitmq_admin_api::{
    ApiClient, ApiError, AuthMethod, CallOptions, ClientConfig, PostResponse, Result, Scheme,
    TlsVerification,
};

use std::borrow::Cow;

use serde::Serialize;
use serde_json::Value;

#[derive(Clone, Debug)]
pub struct AdminClient {
    api: ApiClient,
}

impl AdminClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        Ok(Self {
            api: ApiClient::new(config)?,
        })
    }

    pub fn from_api(api: ApiClient) -> Self {
        Self { api }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    async fn get_value(&self, path: &str) -> Result<Value> {
        self.api.get(path, &CallOptions::default()).await
    }

    async fn put_value<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<()> {
        self.api.put(path, Some(body), &CallOptions::default()).await
    }

    async fn delete_value(&self, path: &str) -> Result<()> {
        self.api.delete(path, &CallOptions::default()).await
    }
}

/// Percent-encodes one path segment, so vhost `/` becomes `%2F`.
///
/// `.` and `..` are rejected: URL parsing folds them away even when escaped,
/// which would address a different resource.
pub fn segment(value: &str) -> Result<Cow<'_, str>> {
    if value == "." || value == ".." {
        return Err(ApiError::InvalidPathSegment(value.to_string()));
    }
    Ok(urlencoding::encode(value))
}
