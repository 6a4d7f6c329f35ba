//! `DataSource` backed by the real remote API over HTTP.

use async_trait::async_trait;
use serde_json::Value;
use url::Url;

use super::{ApiQuery, DataSource};
use crate::errors::AppError;

/// Issues GET requests against the configured API base URL.
pub struct HttpDataSource {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpDataSource {
    pub fn new(base_url: &str) -> Result<Self, AppError> {
        let mut base_url = Url::parse(base_url)
            .map_err(|e| AppError::Config(format!("Invalid API URL {}: {}", base_url, e)))?;
        // Resources are joined relative to the base, which must end in a slash.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self {
            client: reqwest::Client::new(),
            base_url,
        })
    }

    /// Absolute URL for a resource and query.
    pub fn url_for(&self, resource: &str, query: &ApiQuery) -> Result<Url, AppError> {
        let mut url = self
            .base_url
            .join(resource)
            .map_err(|e| AppError::NotFound(format!("Invalid resource {}: {}", resource, e)))?;
        if !query.is_empty() {
            url.set_query(Some(&query.to_query_string()));
        }
        Ok(url)
    }

    async fn get(&self, resource: &str, query: &ApiQuery) -> Result<reqwest::Response, AppError> {
        let url = self.url_for(resource, query)?;
        tracing::debug!(%url, "Fetching remote resource");

        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            tracing::warn!(%url, status = status.as_u16(), "Remote API returned an error status");
            return Err(AppError::NotFound(format!(
                "Remote resource {} returned status {}",
                resource,
                status.as_u16()
            )));
        }
        Ok(response)
    }
}

#[async_trait]
impl DataSource for HttpDataSource {
    async fn fetch_text(&self, resource: &str, query: &ApiQuery) -> Result<String, AppError> {
        let response = self.get(resource, query).await?;
        Ok(response.text().await?)
    }

    async fn fetch_json(&self, resource: &str, query: &ApiQuery) -> Result<Value, AppError> {
        let response = self.get(resource, query).await?;
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}
