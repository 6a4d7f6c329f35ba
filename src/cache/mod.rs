//! Snapshot cache for the unfiltered activity list.
//!
//! The full list is the common case (an empty search page) and the most
//! expensive call. It is kept together with the remote "last updated"
//! marker it was fetched under and is trusted only while that marker is
//! unchanged and the snapshot has not expired.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;

use crate::errors::AppError;
use crate::gateway::{decode, last_updated, ApiQuery, DataSource, RESOURCE_ACTIVITY};
use crate::models::Activity;

/// Default snapshot lifetime.
pub const DEFAULT_TTL_SECS: u64 = 60 * 60 * 24;

/// Source of the current time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

struct Snapshot {
    marker: String,
    activities: Arc<Vec<Activity>>,
    expires_at: DateTime<Utc>,
}

/// Single-slot cache of the unfiltered activity list.
///
/// The lock is held only to read or overwrite the slot, never across a
/// network call. Two concurrent misses may both fetch; the later store wins.
pub struct SnapshotCache {
    slot: RwLock<Option<Snapshot>>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl Default for SnapshotCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL_SECS, Arc::new(SystemClock))
    }
}

impl SnapshotCache {
    pub fn new(ttl_secs: u64, clock: Arc<dyn Clock>) -> Self {
        let ttl = i64::try_from(ttl_secs)
            .ok()
            .and_then(Duration::try_seconds)
            .unwrap_or(Duration::MAX);
        Self {
            slot: RwLock::new(None),
            ttl,
            clock,
        }
    }

    /// Return the unfiltered activity list, refreshing it when the remote
    /// marker moved or the snapshot expired.
    ///
    /// The marker is read on every call; a failure to read it propagates.
    pub async fn get_or_fetch(
        &self,
        source: &dyn DataSource,
    ) -> Result<Arc<Vec<Activity>>, AppError> {
        let marker = last_updated(source).await?;

        if let Some(activities) = self.lookup(&marker).await {
            tracing::debug!(%marker, "Activity snapshot hit");
            return Ok(activities);
        }

        tracing::info!(%marker, "Activity snapshot stale or missing, fetching full list");
        let payload = source
            .fetch_json(RESOURCE_ACTIVITY, &ApiQuery::new())
            .await?;
        let activities: Arc<Vec<Activity>> = match decode(payload) {
            Ok(list) => Arc::new(list),
            Err(e) => {
                self.clear().await;
                return Err(e);
            }
        };
        self.store(marker, activities.clone()).await;

        Ok(activities)
    }

    /// The cached list, if it was fetched under `marker` and is still fresh.
    pub async fn lookup(&self, marker: &str) -> Option<Arc<Vec<Activity>>> {
        let slot = self.slot.read().await;
        slot.as_ref()
            .filter(|s| s.marker == marker && self.clock.now() < s.expires_at)
            .map(|s| s.activities.clone())
    }

    /// Overwrite the slot.
    pub async fn store(&self, marker: String, activities: Arc<Vec<Activity>>) {
        let now = self.clock.now();
        let expires_at = now
            .checked_add_signed(self.ttl)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        *self.slot.write().await = Some(Snapshot {
            marker,
            activities,
            expires_at,
        });
    }

    /// Empty the slot.
    pub async fn clear(&self) {
        *self.slot.write().await = None;
    }
}
