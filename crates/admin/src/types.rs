use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Extra sections requested from `GET /api/nodes/{name}`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NodeDetails {
    pub memory: bool,
    pub binary: bool,
}

/// Body of `PUT /api/exchanges/{vhost}/{name}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExchangeSpec {
    #[serde(rename = "type")]
    pub kind: String,
    pub auto_delete: bool,
    pub durable: bool,
    pub internal: bool,
    #[serde(default)]
    pub arguments: Map<String, Value>,
}

impl Default for ExchangeSpec {
    fn default() -> Self {
        Self {
            kind: "direct".to_string(),
            auto_delete: false,
            durable: true,
            internal: false,
            arguments: Map::new(),
        }
    }
}

/// Body of `PUT /api/queues/{vhost}/{name}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QueueSpec {
    pub auto_delete: bool,
    pub durable: bool,
    #[serde(default)]
    pub arguments: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node: Option<String>,
}

impl Default for QueueSpec {
    fn default() -> Self {
        Self {
            auto_delete: false,
            durable: true,
            arguments: Map::new(),
            node: None,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AckMode {
    #[default]
    AckRequeueTrue,
    AckRequeueFalse,
    RejectRequeueTrue,
    RejectRequeueFalse,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageEncoding {
    #[default]
    Auto,
    Base64,
}

/// Body of `POST /api/queues/{vhost}/{name}/get`. The default peeks at one
/// message and puts it back.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetMessages {
    pub count: u32,
    pub ackmode: AckMode,
    pub encoding: MessageEncoding,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub truncate: Option<u32>,
}

impl Default for GetMessages {
    fn default() -> Self {
        Self {
            count: 1,
            ackmode: AckMode::default(),
            encoding: MessageEncoding::default(),
            truncate: None,
        }
    }
}

/// Body of `PUT /api/users/{name}`.
///
/// The broker needs either a password or a password hash. An empty
/// `password_hash` creates a user that cannot log in with a password.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_hash: Option<String>,
    #[serde(default)]
    pub tags: String,
}

impl UserSpec {
    pub fn with_password(password: impl Into<String>) -> Self {
        Self {
            password: Some(password.into()),
            ..Default::default()
        }
    }

    pub fn with_password_hash(password_hash: impl Into<String>) -> Self {
        Self {
            password_hash: Some(password_hash.into()),
            ..Default::default()
        }
    }

    /// Comma separated, e.g. `administrator` or `monitoring,policymaker`.
    pub fn tags(mut self, tags: impl Into<String>) -> Self {
        self.tags = tags.into();
        self
    }
}

/// Body of `PUT /api/permissions/{vhost}/{user}`. Each field is a regex.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionSpec {
    pub configure: String,
    pub write: String,
    pub read: String,
}

impl Default for PermissionSpec {
    fn default() -> Self {
        Self {
            configure: ".*".to_string(),
            write: ".*".to_string(),
            read: ".*".to_string(),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PolicyTarget {
    #[default]
    All,
    Queues,
    Exchanges,
}

/// Body of `PUT /api/policies/{vhost}/{name}`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PolicySpec {
    pub pattern: String,
    pub definition: Map<String, Value>,
    #[serde(default)]
    pub priority: i32,
    #[serde(rename = "apply-to", default)]
    pub apply_to: PolicyTarget,
}
