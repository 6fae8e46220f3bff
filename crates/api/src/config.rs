use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::{redirect, Certificate, Client};
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, Result};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scheme {
    #[default]
    Http,
    Https,
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scheme::Http => f.write_str("http"),
            Scheme::Https => f.write_str("https"),
        }
    }
}

/// Credential attached to every request.
#[derive(Clone)]
pub enum AuthMethod {
    Basic { username: String, password: String },
    Bearer { token: String },
}

impl AuthMethod {
    pub fn basic(username: impl Into<String>, password: impl Into<String>) -> Self {
        AuthMethod::Basic {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn bearer(token: impl Into<String>) -> Self {
        AuthMethod::Bearer {
            token: token.into(),
        }
    }
}

impl fmt::Debug for AuthMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthMethod::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .field("password", &"<redacted>")
                .finish(),
            AuthMethod::Bearer { .. } => f
                .debug_struct("Bearer")
                .field("token", &"<redacted>")
                .finish(),
        }
    }
}

/// Certificate verification policy for HTTPS endpoints.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// Verify against the platform trust store.
    #[default]
    Enabled,
    /// Accept any certificate. Only meant for local brokers with self-signed certs.
    Disabled,
    /// Additionally trust the PEM encoded CA certificate(s) at this path.
    CaBundle(PathBuf),
}

impl TlsVerification {
    pub(crate) fn build_client(&self) -> Result<Client> {
        let mut builder = Client::builder()
            .user_agent(format!("rabbitmq-admin/{}", env!("CARGO_PKG_VERSION")))
            .redirect(redirect::Policy::none());

        match self {
            TlsVerification::Enabled => {}
            TlsVerification::Disabled => {
                builder = builder.danger_accept_invalid_certs(true);
            }
            TlsVerification::CaBundle(path) => {
                let pem = std::fs::read(path).map_err(|err| ApiError::CaBundle {
                    path: path.clone(),
                    message: err.to_string(),
                })?;
                let certificate = Certificate::from_pem(&pem).map_err(|err| ApiError::CaBundle {
                    path: path.clone(),
                    message: err.to_string(),
                })?;
                builder = builder.add_root_certificate(certificate);
            }
        }

        builder.build().map_err(ApiError::Transport)
    }
}

/// Connection parameters shared by every call a client makes.
///
/// Built once and never mutated by a request. The default headers act as a
/// template: each call works on its own copy.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    scheme: Scheme,
    host: String,
    port: u16,
    auth: AuthMethod,
    timeout: Duration,
    tls: TlsVerification,
    default_headers: HeaderMap,
}

impl ClientConfig {
    pub fn new(host: impl Into<String>, port: u16, auth: AuthMethod) -> Self {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        Self {
            scheme: Scheme::default(),
            host: host.into(),
            port,
            auth,
            timeout: DEFAULT_TIMEOUT,
            tls: TlsVerification::default(),
            default_headers,
        }
    }

    pub fn with_scheme(mut self, scheme: Scheme) -> Self {
        self.scheme = scheme;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_tls_verification(mut self, tls: TlsVerification) -> Self {
        self.tls = tls;
        self
    }

    /// Adds or replaces a header in the default template.
    pub fn with_default_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.default_headers.insert(name, value);
        self
    }

    /// `scheme://host:port`, without a trailing slash.
    pub fn base_url(&self) -> String {
        format!("{}://{}:{}", self.scheme, self.host, self.port)
    }

    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn auth(&self) -> &AuthMethod {
        &self.auth
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn tls(&self) -> &TlsVerification {
        &self.tls
    }

    pub fn default_headers(&self) -> &HeaderMap {
        &self.default_headers
    }
}
