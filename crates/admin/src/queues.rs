use async_trait::async_trait;
use rabbitmq_admin_api::pagination::{page_options, PagedResponse, Paginator};
use serde_json::Value;
use tracing::debug;

use crate::types::{GetMessages, QueueSpec};
use crate::{segment, AdminClient, CallOptions, PostResponse, Result};

impl AdminClient {
    pub async fn list_queues(&self) -> Result<Value> {
        self.get_value("/api/queues").await
    }

    pub async fn list_queues_for_vhost(&self, vhost: &str) -> Result<Value> {
        self.get_value(&format!("/api/queues/{}", segment(vhost)?))
            .await
    }

    pub async fn get_queue_for_vhost(&self, name: &str, vhost: &str) -> Result<Value> {
        self.get_value(&queue_path(name, vhost)?).await
    }

    pub async fn create_queue_for_vhost(
        &self,
        name: &str,
        vhost: &str,
        spec: &QueueSpec,
    ) -> Result<()> {
        self.put_value(&queue_path(name, vhost)?, spec).await
    }

    pub async fn delete_queue_for_vhost(&self, name: &str, vhost: &str) -> Result<()> {
        self.delete_value(&queue_path(name, vhost)?).await
    }

    /// Fetches messages from a queue over HTTP. With the default ack mode the
    /// messages are requeued, which still marks them redelivered.
    pub async fn extract_messages(
        &self,
        queue: &str,
        vhost: &str,
        request: &GetMessages,
    ) -> Result<PostResponse<Value>> {
        self.api
            .post(
                &format!("{}/get", queue_path(queue, vhost)?),
                Some(request),
                &CallOptions::default(),
            )
            .await
    }

    /// Pages through queues, across all vhosts or just `vhost`.
    pub fn queue_pages(&self, vhost: Option<&str>) -> QueuePages<'_> {
        QueuePages {
            client: self,
            vhost: vhost.map(str::to_string),
        }
    }
}

fn queue_path(name: &str, vhost: &str) -> Result<String> {
    Ok(format!("/api/queues/{}/{}", segment(vhost)?, segment(name)?))
}

pub struct QueuePages<'a> {
    client: &'a AdminClient,
    vhost: Option<String>,
}

#[async_trait]
impl<'a> Paginator<Value> for QueuePages<'a> {
    async fn fetch_page(&self, page: u32, page_size: u32) -> Result<PagedResponse<Value>> {
        let path = match &self.vhost {
            Some(vhost) => format!("/api/queues/{}", segment(vhost)?),
            None => "/api/queues".to_string(),
        };

        debug!(path = %path, page, "Fetching queue page");
        self.client
            .api
            .get(&path, &page_options(page, page_size))
            .await
    }
}
