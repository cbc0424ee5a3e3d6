use crate::cache::cache::Cache;
use crate::memory_store::dash_map_store::DashMapMemoryStore;
use crate::server::timer;
use std::sync::Arc;

pub struct MemcacheStoreBuilder {}

impl MemcacheStoreBuilder {
    pub fn from_timer(
        timer: Arc<dyn timer::Timer + Send + Sync>,
    ) -> Arc<dyn Cache + Send + Sync> {
        Arc::new(DashMapMemoryStore::new(timer))
    }
}
