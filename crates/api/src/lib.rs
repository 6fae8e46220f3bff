pub mod config;
pub mod error;
pub mod options;
pub mod pagination;

pub use config::{AuthMethod, ClientConfig, Scheme, TlsVerification, DEFAULT_TIMEOUT};
pub use error::{ApiError, Result};
pub use options::{CallOptions, PostResponse};

use std::time::Duration;

use reqwest::header::HeaderMap;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;
use url::Url;

/// Authenticated client for the RabbitMQ management HTTP API.
///
/// Each call is a single attempt: nothing is retried, cached or queued. A
/// call that times out fails with [`ApiError::Transport`] and the broker may
/// or may not have applied it, so retrying PUT/POST/DELETE is the caller's
/// decision.
///
/// The client is read-only after construction and cheap to clone, so it can
/// be shared across tasks.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    config: ClientConfig,
    base_url: String,
}

impl ApiClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let client = config.tls().build_client()?;
        let base_url = config.base_url();

        Ok(Self {
            client,
            config,
            base_url,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// A fresh copy of the default headers with `overrides` laid on top.
    ///
    /// The shared template is never touched. Every value of an overridden
    /// name replaces all default values for that name.
    pub fn merged_headers(&self, overrides: &HeaderMap) -> HeaderMap {
        let mut headers = self.config.default_headers().clone();
        for name in overrides.keys() {
            headers.remove(name);
            for value in overrides.get_all(name) {
                headers.append(name.clone(), value.clone());
            }
        }
        headers
    }

    pub fn effective_timeout(&self, options: &CallOptions) -> Duration {
        options.timeout.unwrap_or_else(|| self.config.timeout())
    }

    /// Joins `path` onto the base URL by concatenation. Parsing the result
    /// still removes `.` and `..` segments, escaped or not, so identifiers
    /// must never be passed as either.
    pub fn url_for(&self, path: &str) -> Result<Url> {
        Url::parse(&format!("{}{}", self.base_url, path)).map_err(ApiError::InvalidUrl)
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str, options: &CallOptions) -> Result<T> {
        let response = self.send(Method::GET, path, None, options).await?;
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(ApiError::Decode)
    }

    /// The broker answers PUT with an empty body, so nothing is decoded.
    pub async fn put<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: Option<&B>,
        options: &CallOptions,
    ) -> Result<()> {
        let payload = encode_body(body)?;
        self.send(Method::PUT, path, payload, options).await?;
        Ok(())
    }

    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: Option<&B>,
        options: &CallOptions,
    ) -> Result<PostResponse<T>> {
        let payload = encode_body(body)?;
        let response = self.send(Method::POST, path, payload, options).await?;
        let bytes = response.bytes().await?;

        if bytes.is_empty() {
            return Ok(PostResponse::NoContent);
        }

        serde_json::from_slice(&bytes)
            .map(PostResponse::Body)
            .map_err(ApiError::Decode)
    }

    pub async fn delete(&self, path: &str, options: &CallOptions) -> Result<()> {
        self.send(Method::DELETE, path, None, options).await?;
        Ok(())
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<Vec<u8>>,
        options: &CallOptions,
    ) -> Result<Response> {
        let url = self.url_for(path)?;
        let timeout = self.effective_timeout(options);

        let client = match &options.tls {
            Some(tls) if tls != self.config.tls() => tls.build_client()?,
            _ => self.client.clone(),
        };

        debug!(method = %method, url = %url, timeout = ?timeout, "Sending request");

        let mut request = client
            .request(method.clone(), url)
            .headers(self.merged_headers(&options.headers))
            .timeout(timeout);

        if !options.query.is_empty() {
            request = request.query(&options.query);
        }

        request = self.apply_auth(request);

        if let Some(body) = body {
            request = request.body(body);
        }

        let response = request.send().await?;
        let status = response.status();

        debug!(method = %method, status = status.as_u16(), "Received response");

        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(ApiError::Status {
            status: status.as_u16(),
            body,
        })
    }

    fn apply_auth(&self, request: RequestBuilder) -> RequestBuilder {
        match self.config.auth() {
            AuthMethod::Basic { username, password } => request.basic_auth(username, Some(password)),
            AuthMethod::Bearer { token } => request.bearer_auth(token),
        }
    }
}

fn encode_body<B: Serialize + ?Sized>(body: Option<&B>) -> Result<Option<Vec<u8>>> {
    body.map(serde_json::to_vec)
        .transpose()
        .map_err(ApiError::Encode)
}
