use serde_json::Value;

use crate::types::{PermissionSpec, UserSpec};
use crate::{segment, AdminClient, Result};

impl AdminClient {
    pub async fn list_users(&self) -> Result<Value> {
        self.get_value("/api/users").await
    }

    pub async fn get_user(&self, name: &str) -> Result<Value> {
        self.get_value(&format!("/api/users/{}", segment(name)?))
            .await
    }

    pub async fn create_user(&self, name: &str, spec: &UserSpec) -> Result<()> {
        self.put_value(&format!("/api/users/{}", segment(name)?), spec)
            .await
    }

    pub async fn delete_user(&self, name: &str) -> Result<()> {
        self.delete_value(&format!("/api/users/{}", segment(name)?))
            .await
    }

    pub async fn list_permissions(&self) -> Result<Value> {
        self.get_value("/api/permissions").await
    }

    pub async fn list_user_permissions(&self, name: &str) -> Result<Value> {
        self.get_value(&format!("/api/users/{}/permissions", segment(name)?))
            .await
    }

    pub async fn get_user_permission(&self, vhost: &str, user: &str) -> Result<Value> {
        self.get_value(&permission_path(vhost, user)?).await
    }

    pub async fn create_user_permission(
        &self,
        user: &str,
        vhost: &str,
        spec: &PermissionSpec,
    ) -> Result<()> {
        self.put_value(&permission_path(vhost, user)?, spec).await
    }

    pub async fn delete_user_permission(&self, user: &str, vhost: &str) -> Result<()> {
        self.delete_value(&permission_path(vhost, user)?).await
    }
}

fn permission_path(vhost: &str, user: &str) -> Result<String> {
    Ok(format!("/api/permissions/{}/{}", segment(vhost)?, segment(user)?))
}
