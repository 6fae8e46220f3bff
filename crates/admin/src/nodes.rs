use serde_json::Value;

use crate::types::NodeDetails;
use crate::{segment, AdminClient, CallOptions, Result};

impl AdminClient {
    pub async fn list_nodes(&self) -> Result<Value> {
        self.get_value("/api/nodes").await
    }

    pub async fn get_node(&self, name: &str, details: NodeDetails) -> Result<Value> {
        let mut options = CallOptions::new();
        if details.memory {
            options = options.with_query("memory", true);
        }
        if details.binary {
            options = options.with_query("binary", true);
        }

        self.api
            .get(&format!("/api/nodes/{}", segment(name)?), &options)
            .await
    }
}
