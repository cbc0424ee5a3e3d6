use crate::cache::cache::{Cache, CacheEntry, KeyType, SetStatus};
use crate::cache::error::{CacheError, Result};
use crate::memory_store::shared_store_state::SharedStoreState;
use crate::server::timer;

use bytes::BytesMut;
use dashmap::DashMap;
use std::sync::Arc;

type Storage = DashMap<KeyType, CacheEntry>;
pub struct DashMapMemoryStore {
    memory: Storage,
    store_state: SharedStoreState,
}

impl DashMapMemoryStore {
    pub fn new(timer: Arc<dyn timer::Timer + Send + Sync>) -> DashMapMemoryStore {
        let parallelism = std::thread::available_parallelism().map_or(1, usize::from);
        let shards = Self::get_number_of_shards(parallelism);
        info!("Number of shards: {}", shards);
        let store_state = SharedStoreState::new(timer);
        DashMapMemoryStore {
            memory: DashMap::with_shard_amount(shards),
            store_state,
        }
    }

    // Scales the shard count with the square of the available
    // parallelism divided by 4, clamped to the closest power of 2
    // as required by the map.
    fn get_number_of_shards(parallelism: usize) -> usize {
        let parallelism = parallelism.max(2);
        let parallelism = parallelism.min(192);

        let optimal_number_shards = parallelism.pow(2) / 4;
        if optimal_number_shards < 2 {
            return 2;
        }

        let closest_power_of_2 = optimal_number_shards.ilog2();
        let shards_power_of_2 = 2usize.pow(closest_power_of_2);
        info!("Available parallelism: {}", parallelism);
        info!("Optimal number of shards: {}", optimal_number_shards);

        if shards_power_of_2 > 1 {
            shards_power_of_2
        } else {
            2
        }
    }

    fn append_prepend_common(
        &self,
        key: KeyType,
        new_entry: CacheEntry,
        is_append: bool,
    ) -> Result<SetStatus> {
        // token is consumed even when the operation fails
        let cas = self.store_state.next_cas_token();
        match self.memory.entry(key) {
            dashmap::mapref::entry::Entry::Occupied(mut entry) => {
                if self.store_state.check_if_expired(entry.get()) {
                    entry.remove();
                    return Err(CacheError::NotStored);
                }
                let prev_entry = entry.get_mut();
                let mut new_data =
                    BytesMut::with_capacity(prev_entry.data.len() + new_entry.data.len());
                if is_append {
                    new_data.extend_from_slice(&prev_entry.data);
                    new_data.extend_from_slice(&new_entry.data);
                } else {
                    new_data.extend_from_slice(&new_entry.data);
                    new_data.extend_from_slice(&prev_entry.data);
                }
                // flags, exptime and stored time of the old entry survive
                prev_entry.data = new_data.freeze();
                prev_entry.header.cas = cas;
                Ok(SetStatus { cas })
            }
            dashmap::mapref::entry::Entry::Vacant(_) => Err(CacheError::NotStored),
        }
    }
}

impl Cache for DashMapMemoryStore {
    /// Returns the entry associated with a key, an expired entry is
    /// removed at the moment it is discovered
    fn get(&self, key: &KeyType) -> Result<CacheEntry> {
        match self.memory.entry(key.clone()) {
            dashmap::mapref::entry::Entry::Occupied(entry) => {
                let value = entry.get();
                if self.store_state.check_if_expired(value) {
                    entry.remove();
                    return Err(CacheError::NotFound);
                }
                Ok(value.clone())
            }
            dashmap::mapref::entry::Entry::Vacant(_) => Err(CacheError::NotFound),
        }
    }

    fn set(&self, key: KeyType, mut entry: CacheEntry) -> Result<SetStatus> {
        let cas = self.store_state.stamp_entry(&mut entry);
        self.memory.insert(key, entry);
        Ok(SetStatus { cas })
    }

    /// Stores the entry only if the key holds no live entry, an
    /// expired one counts as absent and is overwritten
    fn add(&self, key: KeyType, mut entry: CacheEntry) -> Result<SetStatus> {
        let cas = self.store_state.stamp_entry(&mut entry);
        match self.memory.entry(key) {
            dashmap::mapref::entry::Entry::Occupied(mut occupied) => {
                if self.store_state.check_if_expired(occupied.get()) {
                    occupied.insert(entry);
                    return Ok(SetStatus { cas });
                }
                Err(CacheError::NotStored)
            }
            dashmap::mapref::entry::Entry::Vacant(vacant) => {
                vacant.insert(entry);
                Ok(SetStatus { cas })
            }
        }
    }

    /// Stores the entry only if the key holds a live entry
    fn replace(&self, key: KeyType, mut entry: CacheEntry) -> Result<SetStatus> {
        let cas = self.store_state.stamp_entry(&mut entry);
        match self.memory.entry(key) {
            dashmap::mapref::entry::Entry::Occupied(mut occupied) => {
                if self.store_state.check_if_expired(occupied.get()) {
                    occupied.remove();
                    return Err(CacheError::NotStored);
                }
                occupied.insert(entry);
                Ok(SetStatus { cas })
            }
            dashmap::mapref::entry::Entry::Vacant(_) => Err(CacheError::NotStored),
        }
    }

    fn append(&self, key: KeyType, new_entry: CacheEntry) -> Result<SetStatus> {
        self.append_prepend_common(key, new_entry, true)
    }

    fn prepend(&self, key: KeyType, new_entry: CacheEntry) -> Result<SetStatus> {
        self.append_prepend_common(key, new_entry, false)
    }

    /// Stores the entry only if cas matches the token of the live
    /// entry under the key
    fn cas(&self, key: KeyType, mut entry: CacheEntry, cas: u64) -> Result<SetStatus> {
        let new_cas = self.store_state.stamp_entry(&mut entry);
        match self.memory.entry(key) {
            dashmap::mapref::entry::Entry::Occupied(mut occupied) => {
                if self.store_state.check_if_expired(occupied.get()) {
                    occupied.remove();
                    return Err(CacheError::NotFound);
                }
                if occupied.get().header.cas != cas {
                    return Err(CacheError::KeyExists);
                }
                occupied.insert(entry);
                Ok(SetStatus { cas: new_cas })
            }
            dashmap::mapref::entry::Entry::Vacant(_) => Err(CacheError::NotFound),
        }
    }
}
