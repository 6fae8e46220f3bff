use serde_json::Value;

use crate::{segment, AdminClient, CallOptions, PostResponse, Result};

impl AdminClient {
    /// Cluster-wide statistics and versions.
    pub async fn overview(&self) -> Result<Value> {
        self.get_value("/api/overview").await
    }

    pub async fn cluster_name(&self) -> Result<Value> {
        self.get_value("/api/cluster-name").await
    }

    /// Management UI extensions registered with the broker.
    pub async fn list_extensions(&self) -> Result<Value> {
        self.get_value("/api/extensions").await
    }

    /// The user the client authenticates as.
    pub async fn whoami(&self) -> Result<Value> {
        self.get_value("/api/whoami").await
    }

    /// Declares a test queue in `vhost`, publishes to it and consumes the
    /// message back. Answers `{"status": "ok"}` on a healthy vhost.
    pub async fn is_vhost_alive(&self, vhost: &str) -> Result<Value> {
        self.get_value(&format!("/api/aliveness-test/{}", segment(vhost)?))
            .await
    }

    /// Server definitions: users, vhosts, permissions, queues, exchanges,
    /// bindings and policies.
    pub async fn get_definitions(&self) -> Result<Value> {
        self.get_value("/api/definitions").await
    }

    /// Uploads a definitions document, merging it into the running broker.
    pub async fn post_definitions(&self, definitions: &Value) -> Result<PostResponse<Value>> {
        self.api
            .post("/api/definitions", Some(definitions), &CallOptions::default())
            .await
    }
}
