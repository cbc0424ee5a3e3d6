use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::{cache::cache::Cache, memcache, server::timer};

pub struct ServerContext {
    cancellation_token: CancellationToken,
    system_timer: Arc<timer::SystemTimer>,
    store: Arc<dyn Cache + Send + Sync>,
}

impl ServerContext {
    pub fn get_default_server_context() -> Self {
        let cancellation_token = CancellationToken::new();
        let system_timer = Arc::new(timer::SystemTimer::new(cancellation_token.clone()));
        let store = memcache::builder::MemcacheStoreBuilder::from_timer(system_timer.clone());
        Self {
            cancellation_token,
            system_timer,
            store,
        }
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancellation_token.clone()
    }

    pub fn system_timer(&self) -> Arc<timer::SystemTimer> {
        self.system_timer.clone()
    }

    pub fn store(&self) -> Arc<dyn Cache + Send + Sync> {
        self.store.clone()
    }
}
