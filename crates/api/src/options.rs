use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

use crate::config::TlsVerification;

/// Per-call overrides. Every field is optional; an empty value leaves the
/// client configuration in charge.
#[derive(Clone, Debug, Default)]
pub struct CallOptions {
    /// Merged over a copy of the client's default headers. Entries here win
    /// when a name appears in both.
    pub headers: HeaderMap,
    /// Query string pairs, appended in order.
    pub query: Vec<(String, String)>,
    /// Replaces the client timeout for this call only.
    pub timeout: Option<Duration>,
    /// Replaces the client TLS policy for this call only.
    pub tls: Option<TlsVerification>,
}

impl CallOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_tls_verification(mut self, tls: TlsVerification) -> Self {
        self.tls = Some(tls);
        self
    }
}

/// Outcome of a successful POST.
///
/// The broker answers many POSTs with an empty body; that case is kept apart
/// from a body that decodes to an empty object.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PostResponse<T> {
    Body(T),
    NoContent,
}

impl<T> PostResponse<T> {
    pub fn is_no_content(&self) -> bool {
        matches!(self, PostResponse::NoContent)
    }

    pub fn into_body(self) -> Option<T> {
        match self {
            PostResponse::Body(body) => Some(body),
            PostResponse::NoContent => None,
        }
    }
}
