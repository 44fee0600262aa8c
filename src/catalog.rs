use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::report::DatasetRecord;

/// Timeout applied to catalog search calls.
const SEARCH_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub data: Vec<DatasetRecord>,
}

/// Client for the data.gouv.fr open-data catalog.
///
/// Transport failures never escape: `search` degrades to an empty result set
/// and `fetch` to `None`, logged at warn level. The pipeline treats both as
/// "no data for this query".
pub struct CatalogClient {
    client: reqwest::Client,
    base_url: String,
}

impl CatalogClient {
    pub fn from_env() -> Result<Self> {
        let base_url = dotenv::var("CATALOG_BASE_URL")
            .unwrap_or_else(|_| "https://www.data.gouv.fr/api/1".to_string());
        Self::new(base_url)
    }

    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(SEARCH_TIMEOUT)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Search the catalog for datasets matching `query`.
    /// Returns an empty list on timeout or any transport error.
    pub async fn search(&self, query: &str, page_size: usize) -> Vec<DatasetRecord> {
        let url = format!("{}/datasets/", self.base_url.trim_end_matches('/'));
        let page_size = page_size.to_string();
        let result = self
            .client
            .get(&url)
            .query(&[("q", query), ("page_size", page_size.as_str())])
            .send()
            .await;

        let resp = match result {
            Ok(resp) => resp,
            Err(e) => {
                warn!(query, error = %e, "catalog search failed");
                return Vec::new();
            }
        };

        if !resp.status().is_success() {
            warn!(query, status = %resp.status(), "catalog search returned error status");
            return Vec::new();
        }

        match resp.json::<SearchResponse>().await {
            Ok(body) => body.data,
            Err(e) => {
                warn!(query, error = %e, "catalog search response unreadable");
                Vec::new()
            }
        }
    }

    /// Fetch a single dataset by id. Absent on any failure.
    pub async fn fetch(&self, dataset_id: &str) -> Option<DatasetRecord> {
        let url = format!(
            "{}/datasets/{}/",
            self.base_url.trim_end_matches('/'),
            dataset_id
        );

        let resp = match self.client.get(&url).send().await {
            Ok(resp) => resp,
            Err(e) => {
                warn!(dataset_id, error = %e, "dataset fetch failed");
                return None;
            }
        };

        if !resp.status().is_success() {
            warn!(dataset_id, status = %resp.status(), "dataset fetch returned error status");
            return None;
        }

        match resp.json::<DatasetRecord>().await {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(dataset_id, error = %e, "dataset fetch response unreadable");
                None
            }
        }
    }
}
