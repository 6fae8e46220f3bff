use serde_json::Value;

use crate::types::PolicySpec;
use crate::{segment, AdminClient, Result};

impl AdminClient {
    pub async fn list_policies(&self) -> Result<Value> {
        self.get_value("/api/policies").await
    }

    pub async fn list_policies_for_vhost(&self, vhost: &str) -> Result<Value> {
        self.get_value(&format!("/api/policies/{}", segment(vhost)?))
            .await
    }

    pub async fn get_policy_for_vhost(&self, vhost: &str, name: &str) -> Result<Value> {
        self.get_value(&policy_path(vhost, name)?).await
    }

    /// Creates or replaces the policy `name` in `vhost`.
    pub async fn create_policy_for_vhost(
        &self,
        vhost: &str,
        name: &str,
        spec: &PolicySpec,
    ) -> Result<()> {
        self.put_value(&policy_path(vhost, name)?, spec).await
    }

    pub async fn delete_policy_for_vhost(&self, vhost: &str, name: &str) -> Result<()> {
        self.delete_value(&policy_path(vhost, name)?).await
    }
}

fn policy_path(vhost: &str, name: &str) -> Result<String> {
    Ok(format!("/api/policies/{}/{}", segment(vhost)?, segment(name)?))
}
