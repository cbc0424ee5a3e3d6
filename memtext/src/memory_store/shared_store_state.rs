use crate::cache::cache::CacheEntry;
use crate::server::timer;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Largest relative expiration time, larger values are treated
/// as absolute Unix timestamps
pub const SECONDS_IN_30_DAYS: i64 = 60 * 60 * 24 * 30;

/// State shared between all shards of a store: the time source and
/// the cas token sequence
pub struct SharedStoreState {
    timer: Arc<dyn timer::Timer + Send + Sync>,
    cas_id: AtomicU64,
}

impl SharedStoreState {
    pub fn new(timer: Arc<dyn timer::Timer + Send + Sync>) -> SharedStoreState {
        SharedStoreState {
            timer,
            cas_id: AtomicU64::new(1),
        }
    }

    /// Allocates the next cas token, tokens are never reused
    pub fn next_cas_token(&self) -> u64 {
        self.cas_id.fetch_add(1, Ordering::Release)
    }

    /// Assigns a fresh cas token and the current store time to an entry
    pub fn stamp_entry(&self, entry: &mut CacheEntry) -> u64 {
        let cas = self.next_cas_token();
        entry.header.cas = cas;
        entry.header.stored_time = self.timer.timestamp();
        cas
    }

    pub fn timestamp(&self) -> u64 {
        self.timer.timestamp()
    }

    /// An exptime of 0 never expires and a negative one is already
    /// expired. Values above SECONDS_IN_30_DAYS are absolute Unix
    /// timestamps, anything else counts from the time the entry was
    /// stored. Both comparisons are strict, an entry is still alive
    /// at the exact second it was given.
    pub fn check_if_expired(&self, entry: &CacheEntry) -> bool {
        let exptime = entry.header.exptime;
        if exptime == 0 {
            return false;
        }
        if exptime < 0 {
            return true;
        }
        let now = self.timer.timestamp();
        if exptime > SECONDS_IN_30_DAYS {
            return now as i64 > exptime;
        }
        now.saturating_sub(entry.header.stored_time) as i64 > exptime
    }
}
