use serde_json::{json, Value};

use crate::{segment, AdminClient, Result};

impl AdminClient {
    pub async fn list_vhosts(&self) -> Result<Value> {
        self.get_value("/api/vhosts").await
    }

    pub async fn get_vhost(&self, name: &str) -> Result<Value> {
        self.get_value(&format!("/api/vhosts/{}", segment(name)?))
            .await
    }

    /// `tracing` turns on the firehose tracer for the new vhost.
    pub async fn create_vhost(&self, name: &str, tracing: bool) -> Result<()> {
        self.put_value(
            &format!("/api/vhosts/{}", segment(name)?),
            &json!({ "tracing": tracing }),
        )
        .await
    }

    /// Deleting a vhost also deletes every exchange, queue, binding, user
    /// permission and policy in it.
    pub async fn delete_vhost(&self, name: &str) -> Result<()> {
        self.delete_value(&format!("/api/vhosts/{}", segment(name)?))
            .await
    }
}
