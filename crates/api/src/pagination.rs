use crate::error::Result;
use crate::options::CallOptions;
use async_trait::async_trait;
use futures::stream::{Stream, StreamExt};
use serde::{Deserialize, Serialize};
use std::pin::Pin;
use tracing::debug;

/// Largest page the management API will serve.
pub const MAX_PAGE_SIZE: u32 = 500;

/// One page of a list endpoint queried with `page`/`page_size`. Pages are
/// numbered from 1.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PagedResponse<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub page_count: u32,
    pub page_size: u32,
    #[serde(default)]
    pub item_count: u32,
    #[serde(default)]
    pub filtered_count: u32,
    #[serde(default)]
    pub total_count: u32,
}

impl<T> PagedResponse<T> {
    pub fn has_next(&self) -> bool {
        self.page < self.page_count
    }

    pub fn next_page(&self) -> Option<u32> {
        self.has_next().then_some(self.page + 1)
    }
}

/// Query options selecting one page. `page_size` is clamped to
/// `1..=MAX_PAGE_SIZE`.
pub fn page_options(page: u32, page_size: u32) -> CallOptions {
    CallOptions::new()
        .with_query("page", page.max(1))
        .with_query("page_size", page_size.clamp(1, MAX_PAGE_SIZE))
}

#[async_trait]
pub trait Paginator<T>: Sync {
    async fn fetch_page(&self, page: u32, page_size: u32) -> Result<PagedResponse<T>>;

    async fn fetch_all(&self, page_size: u32) -> Result<Vec<T>>
    where
        T: Send,
    {
        let mut all_items = Vec::new();
        let mut page = 1;

        loop {
            debug!(page, page_size, "Fetching page");
            let response = self.fetch_page(page, page_size).await?;
            let item_count = response.items.len();
            let next_page = response.next_page();

            all_items.extend(response.items);

            match next_page {
                Some(next) if item_count > 0 => page = next,
                _ => {
                    debug!(total_items = all_items.len(), "Finished pagination");
                    break;
                }
            }
        }

        Ok(all_items)
    }

    fn stream<'a>(&'a self, page_size: u32) -> Pin<Box<dyn Stream<Item = Result<Vec<T>>> + Send + 'a>>
    where
        T: Send + 'a,
    {
        Box::pin(async_stream::stream! {
            let mut page = 1;

            loop {
                debug!(page, page_size, "Fetching page in stream");

                match self.fetch_page(page, page_size).await {
                    Ok(response) => {
                        let item_count = response.items.len();
                        let next_page = response.next_page();

                        yield Ok(response.items);

                        match next_page {
                            Some(next) if item_count > 0 => page = next,
                            _ => break,
                        }
                    }
                    Err(err) => {
                        yield Err(err);
                        break;
                    }
                }
            }
        })
    }
}

pub async fn collect_pages<T, P: Paginator<T>>(
    paginator: &P,
    page_size: u32,
    limit: Option<usize>,
) -> Result<Vec<T>>
where
    T: Send,
{
    let mut stream = paginator.stream(page_size);
    let mut all_items = Vec::new();

    while let Some(result) = stream.next().await {
        let items = result?;
        all_items.extend(items);

        if let Some(limit) = limit {
            if all_items.len() >= limit {
                all_items.truncate(limit);
                break;
            }
        }
    }

    Ok(all_items)
}
