//! Webflow CMS client and collection pagination

use super::error::{Result, SyncError};
use super::item::CollectionItem;
use crate::config::SyncConfig;
use crate::logger;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::Deserialize;
use std::future::Future;
use std::time::Duration;

/// A paged source of collection items
pub trait ItemSource {
    fn fetch_page(
        &self,
        collection_id: &str,
        offset: usize,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<CollectionItem>>>;
}

/// Response body of the items endpoint
#[derive(Debug, Default, Deserialize)]
struct ItemsPage {
    items: Option<Vec<CollectionItem>>,
    #[serde(rename = "collectionItems")]
    collection_items: Option<Vec<CollectionItem>>,
}

impl ItemsPage {
    fn into_items(self) -> Vec<CollectionItem> {
        self.items.or(self.collection_items).unwrap_or_default()
    }
}

pub struct WebflowClient {
    http: reqwest::Client,
    api_base: String,
}

impl WebflowClient {
    pub fn new(config: &SyncConfig, token: &str) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {token}"))?,
        );
        headers.insert("accept-version", HeaderValue::from_str(&config.api_version)?);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            api_base: config.api_base.trim_end_matches('/').to_string(),
        })
    }

    fn items_url(&self, collection_id: &str, offset: usize, limit: usize) -> String {
        format!(
            "{}/collections/{collection_id}/items?limit={limit}&offset={offset}",
            self.api_base
        )
    }
}

impl ItemSource for WebflowClient {
    async fn fetch_page(
        &self,
        collection_id: &str,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<CollectionItem>> {
        let url = self.items_url(collection_id, offset, limit);
        logger::log_debug(&format!("GET {url}"));

        let response = self.http.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SyncError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let page: ItemsPage = response.json().await?;
        Ok(page.into_items())
    }
}

/// Fetch every item, page by page, until a page comes back short
pub async fn fetch_all_items<S: ItemSource>(
    source: &S,
    collection_id: &str,
    page_size: usize,
) -> Result<Vec<CollectionItem>> {
    let limit = page_size.max(1);
    let mut all = Vec::new();
    let mut offset = 0;

    loop {
        let page = source.fetch_page(collection_id, offset, limit).await?;
        let count = page.len();
        all.extend(page);
        if count < limit {
            break;
        }
        offset += limit;
    }

    Ok(all)
}
