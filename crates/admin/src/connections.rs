use reqwest::header::{HeaderName, HeaderValue};
use serde_json::Value;

use crate::{segment, AdminClient, CallOptions, Result};

const REASON_HEADER: &str = "x-reason";

impl AdminClient {
    pub async fn list_connections(&self) -> Result<Value> {
        self.get_value("/api/connections").await
    }

    pub async fn get_connection(&self, name: &str) -> Result<Value> {
        self.get_value(&format!("/api/connections/{}", segment(name)?))
            .await
    }

    /// Closes a client connection. `reason` is shown to the client in the
    /// connection.close frame.
    pub async fn delete_connection(&self, name: &str, reason: Option<&str>) -> Result<()> {
        let mut options = CallOptions::new();
        if let Some(reason) = reason {
            options = options.with_header(
                HeaderName::from_static(REASON_HEADER),
                HeaderValue::from_str(reason)?,
            );
        }

        self.api
            .delete(&format!("/api/connections/{}", segment(name)?), &options)
            .await
    }

    pub async fn list_connection_channels(&self, name: &str) -> Result<Value> {
        self.get_value(&format!("/api/connections/{}/channels", segment(name)?))
            .await
    }

    pub async fn list_channels(&self) -> Result<Value> {
        self.get_value("/api/channels").await
    }

    pub async fn get_channel(&self, name: &str) -> Result<Value> {
        self.get_value(&format!("/api/channels/{}", segment(name)?))
            .await
    }

    pub async fn list_consumers(&self) -> Result<Value> {
        self.get_value("/api/consumers").await
    }

    pub async fn list_consumers_for_vhost(&self, vhost: &str) -> Result<Value> {
        self.get_value(&format!("/api/consumers/{}", segment(vhost)?))
            .await
    }
}
