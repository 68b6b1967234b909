//! Time-to-live snapshot cache for the scraped fund list.
//!
//! Holds at most one [`CacheEntry`]. The entry is only ever replaced as a
//! whole, and readers receive an `Arc` to it, so a concurrent refresh can
//! show a reader the old snapshot or the new one but never a mix of both.

use crate::types::FundRecord;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

/// Default list TTL: 15 minutes.
pub const DEFAULT_TTL: Duration = Duration::from_secs(15 * 60);

/// A captured fund list and when it was captured.
#[derive(Debug)]
pub struct CacheEntry {
    records: Vec<FundRecord>,
    /// Monotonic capture time, used for expiry.
    captured_at: Instant,
    /// Wall-clock capture time, for reporting.
    captured_at_utc: DateTime<Utc>,
}

impl CacheEntry {
    pub fn new(records: Vec<FundRecord>) -> Self {
        Self {
            records,
            captured_at: Instant::now(),
            captured_at_utc: Utc::now(),
        }
    }

    pub fn records(&self) -> &[FundRecord] {
        &self.records
    }

    pub fn captured_at(&self) -> DateTime<Utc> {
        self.captured_at_utc
    }

    /// Whether the entry is still fresh at `now`. An age equal to the TTL
    /// already counts as stale.
    pub fn is_fresh_at(&self, now: Instant, ttl: Duration) -> bool {
        now.saturating_duration_since(self.captured_at) < ttl
    }

    pub fn is_fresh(&self, ttl: Duration) -> bool {
        self.is_fresh_at(Instant::now(), ttl)
    }
}

/// Single-slot list cache, owned by a [`ListFetcher`](crate::ListFetcher).
#[derive(Debug)]
pub struct ListCache {
    slot: RwLock<Option<Arc<CacheEntry>>>,
    ttl: Duration,
}

impl ListCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            slot: RwLock::new(None),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// The current snapshot, if one exists and has not expired.
    pub async fn get_fresh(&self) -> Option<Arc<CacheEntry>> {
        let slot = self.slot.read().await;
        slot.as_ref()
            .filter(|entry| entry.is_fresh(self.ttl))
            .map(Arc::clone)
    }

    /// Replace the snapshot wholesale and return the new entry.
    pub async fn replace(&self, records: Vec<FundRecord>) -> Arc<CacheEntry> {
        let entry = Arc::new(CacheEntry::new(records));
        *self.slot.write().await = Some(Arc::clone(&entry));
        entry
    }
}

impl Default for ListCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}
