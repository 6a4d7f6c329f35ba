//! Remote data gateway.
//!
//! All domain data lives behind the remote activity API. This module turns
//! typed queries into API calls and decodes the responses; the unfiltered
//! activity list is served through the [`SnapshotCache`].

mod http;
mod query;

pub use http::HttpDataSource;
pub use query::ApiQuery;

use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::cache::SnapshotCache;
use crate::errors::AppError;
use crate::models::{Activity, Organisation, PolicyMarker, Transaction};

pub const RESOURCE_ACTIVITY: &str = "activity";
pub const RESOURCE_LAST_UPDATED: &str = "last_updated/";
const RESOURCE_TRANSACTION: &str = "transaction";
const RESOURCE_POLICY_MARKER: &str = "policymarker";

/// Transport to the remote API.
///
/// Implementations must report every transport failure (unreachable host,
/// non-2xx status) as [`AppError::NotFound`].
#[async_trait]
pub trait DataSource: Send + Sync {
    /// GET a resource and return the raw body.
    async fn fetch_text(&self, resource: &str, query: &ApiQuery) -> Result<String, AppError>;

    /// GET a resource and parse the body as JSON.
    async fn fetch_json(&self, resource: &str, query: &ApiQuery) -> Result<Value, AppError>;
}

/// Decode a JSON payload into a typed record.
pub(crate) fn decode<T: DeserializeOwned>(value: Value) -> Result<T, AppError> {
    Ok(serde_json::from_value(value)?)
}

/// Read the remote "last updated" marker, trimmed.
pub(crate) async fn last_updated(source: &dyn DataSource) -> Result<String, AppError> {
    let marker = source
        .fetch_text(RESOURCE_LAST_UPDATED, &ApiQuery::new())
        .await?;
    Ok(marker.trim().to_string())
}

/// Typed access to the remote API resources.
pub struct Gateway {
    source: Arc<dyn DataSource>,
    cache: Arc<SnapshotCache>,
}

impl Gateway {
    pub fn new(source: Arc<dyn DataSource>, cache: Arc<SnapshotCache>) -> Self {
        Self { source, cache }
    }

    /// Activities matching `query`. The unfiltered list comes from the cache.
    pub async fn activities(&self, query: &ApiQuery) -> Result<Arc<Vec<Activity>>, AppError> {
        if query.is_empty() {
            return self.cache.get_or_fetch(self.source.as_ref()).await;
        }

        let payload = self.source.fetch_json(RESOURCE_ACTIVITY, query).await?;
        Ok(Arc::new(decode(payload)?))
    }

    /// A single activity by numeric id.
    pub async fn activity(&self, id: u64) -> Result<Activity, AppError> {
        let payload = self
            .source
            .fetch_json(&format!("{}/{}/", RESOURCE_ACTIVITY, id), &ApiQuery::new())
            .await?;
        decode(payload)
    }

    /// A single organisation by id.
    pub async fn organisation(&self, id: &str) -> Result<Organisation, AppError> {
        let payload = self
            .source
            .fetch_json(&format!("organisation/{}/", id), &ApiQuery::new())
            .await?;
        decode(payload)
    }

    /// Transactions booked against an activity.
    pub async fn transactions(&self, activity_id: u64) -> Result<Vec<Transaction>, AppError> {
        let query = ApiQuery::new().eq("activity__id", activity_id.to_string());
        let payload = self.source.fetch_json(RESOURCE_TRANSACTION, &query).await?;
        decode(payload)
    }

    /// Policy markers with a non-zero significance, ordered by code.
    pub async fn policy_markers(&self, activity_id: u64) -> Result<Vec<PolicyMarker>, AppError> {
        let query = ApiQuery::new()
            .eq("activity__id", activity_id.to_string())
            .gt("significance", Some(0))
            .order_by(Some("code"));
        let payload = self
            .source
            .fetch_json(RESOURCE_POLICY_MARKER, &query)
            .await?;
        decode(payload)
    }
}
