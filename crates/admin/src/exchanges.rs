use serde_json::Value;

use crate::types::ExchangeSpec;
use crate::{segment, AdminClient, Result};

impl AdminClient {
    pub async fn list_exchanges(&self) -> Result<Value> {
        self.get_value("/api/exchanges").await
    }

    pub async fn list_exchanges_for_vhost(&self, vhost: &str) -> Result<Value> {
        self.get_value(&format!("/api/exchanges/{}", segment(vhost)?))
            .await
    }

    pub async fn get_exchange_for_vhost(&self, name: &str, vhost: &str) -> Result<Value> {
        self.get_value(&exchange_path(name, vhost)?).await
    }

    /// Declares an exchange. Redeclaring with identical settings is a no-op;
    /// different settings fail with a status error.
    pub async fn create_exchange_for_vhost(
        &self,
        name: &str,
        vhost: &str,
        spec: &ExchangeSpec,
    ) -> Result<()> {
        self.put_value(&exchange_path(name, vhost)?, spec).await
    }

    pub async fn delete_exchange_for_vhost(&self, name: &str, vhost: &str) -> Result<()> {
        self.delete_value(&exchange_path(name, vhost)?).await
    }

    pub async fn list_bindings(&self) -> Result<Value> {
        self.get_value("/api/bindings").await
    }

    pub async fn list_bindings_for_vhost(&self, vhost: &str) -> Result<Value> {
        self.get_value(&format!("/api/bindings/{}", segment(vhost)?))
            .await
    }

    pub async fn list_bindings_by_queue(&self, queue: &str, vhost: &str) -> Result<Value> {
        self.get_value(&format!(
            "/api/queues/{}/{}/bindings",
            segment(vhost)?,
            segment(queue)?
        ))
        .await
    }
}

fn exchange_path(name: &str, vhost: &str) -> Result<String> {
    Ok(format!("/api/exchanges/{}/{}", segment(vhost)?, segment(name)?))
}
