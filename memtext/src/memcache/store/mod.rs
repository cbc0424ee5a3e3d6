use crate::cache::cache::{
    Cache, CacheEntry, EntryHeader, KeyType as CacheKeyType, SetStatus as CacheSetStatus,
};
use crate::cache::error::Result;
use std::sync::Arc;

pub type Entry = CacheEntry;
pub type Header = EntryHeader;
pub type SetStatus = CacheSetStatus;
pub type KeyType = CacheKeyType;

/**
 * Implements the storage side of the memcached text protocol
 * commands on top of a generic key value store
 */
pub struct MemcStore {
    store: Arc<dyn Cache + Send + Sync>,
}

impl MemcStore {
    pub fn new(store: Arc<dyn Cache + Send + Sync>) -> MemcStore {
        MemcStore { store }
    }

    pub fn get(&self, key: &KeyType) -> Result<Entry> {
        self.store.get(key)
    }

    pub fn set(&self, key: KeyType, entry: Entry) -> Result<SetStatus> {
        self.store.set(key, entry)
    }

    pub fn add(&self, key: KeyType, entry: Entry) -> Result<SetStatus> {
        self.store.add(key, entry)
    }

    pub fn replace(&self, key: KeyType, entry: Entry) -> Result<SetStatus> {
        self.store.replace(key, entry)
    }

    pub fn append(&self, key: KeyType, entry: Entry) -> Result<SetStatus> {
        self.store.append(key, entry)
    }

    pub fn prepend(&self, key: KeyType, entry: Entry) -> Result<SetStatus> {
        self.store.prepend(key, entry)
    }

    pub fn cas(&self, key: KeyType, entry: Entry, cas: u64) -> Result<SetStatus> {
        self.store.cas(key, entry, cas)
    }
}


#[cfg(test)]
mod append_prepend_tests;
