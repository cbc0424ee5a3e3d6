use crate::cache::cache::Cache;
use crate::memcache::store::MemcStore;
use crate::memory_store::dash_map_store::DashMapMemoryStore;
use crate::server::timer;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Timer controlled from tests
pub struct MockSystemTimer {
    pub current_time: AtomicU64,
}

pub trait SetableTimer: timer::Timer {
    fn set(&self, time: u64);
    fn add_seconds(&self, seconds: u64);
}

impl MockSystemTimer {
    pub fn new() -> Self {
        MockSystemTimer {
            current_time: AtomicU64::new(0),
        }
    }
}

impl Default for MockSystemTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl timer::Timer for MockSystemTimer {
    fn timestamp(&self) -> u64 {
        self.current_time.load(Ordering::Acquire)
    }
}

impl SetableTimer for MockSystemTimer {
    fn set(&self, time: u64) {
        self.current_time.store(time, Ordering::Release)
    }

    fn add_seconds(&self, seconds: u64) {
        self.current_time.fetch_add(seconds, Ordering::Release);
    }
}

pub struct MockServer {
    pub timer: Arc<MockSystemTimer>,
    pub storage: MemcStore,
}

impl MockServer {
    pub fn new(store: Arc<dyn Cache + Send + Sync>, timer: Arc<MockSystemTimer>) -> Self {
        MockServer {
            timer,
            storage: MemcStore::new(store),
        }
    }
}

pub fn create_dash_map_server() -> MockServer {
    let timer = Arc::new(MockSystemTimer::new());
    MockServer::new(Arc::new(DashMapMemoryStore::new(timer.clone())), timer)
}

pub struct StoreWithMockTimer {
    pub timer: Arc<MockSystemTimer>,
    pub memc_store: Arc<MemcStore>,
}

pub fn create_dash_map_storage() -> StoreWithMockTimer {
    let timer = Arc::new(MockSystemTimer::new());
    let memc_store = Arc::new(MemcStore::new(Arc::new(DashMapMemoryStore::new(
        timer.clone(),
    ))));
    StoreWithMockTimer { timer, memc_store }
}
