use super::error::Result;
use bytes::Bytes;

/// Cache key type
pub type KeyType = Bytes;

/// Cache value type
pub type ValueType = Bytes;

/// Meta data stored with every cache value
#[derive(Clone, Debug)]
pub struct EntryHeader {
    pub(crate) cas: u64,
    pub(crate) flags: u16,
    pub(crate) exptime: i64,
    pub(crate) stored_time: u64,
}

impl EntryHeader {
    pub fn new(cas: u64, flags: u16, exptime: i64) -> EntryHeader {
        EntryHeader {
            cas,
            flags,
            exptime,
            stored_time: 0,
        }
    }

    pub fn get_expiration(&self) -> i64 {
        self.exptime
    }

    pub const fn len(&self) -> usize {
        std::mem::size_of::<EntryHeader>()
    }

    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Value and its meta data as kept in the cache
#[derive(Clone, Debug)]
pub struct CacheEntry {
    pub(crate) header: EntryHeader,
    pub(crate) data: ValueType,
}

impl CacheEntry {
    pub fn new(data: ValueType, flags: u16, exptime: i64) -> CacheEntry {
        let header = EntryHeader::new(0, flags, exptime);
        CacheEntry { header, data }
    }

    pub fn len(&self) -> usize {
        self.header.len() + self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl PartialEq for CacheEntry {
    fn eq(&self, other: &Self) -> bool {
        self.data == other.data
    }
}

/// Outcome of a successful store operation, cas is the
/// token assigned to the stored entry
#[derive(Debug)]
pub struct SetStatus {
    pub cas: u64,
}

// An abstraction over a generic key <=> entry store
pub trait Cache {
    /// Returns the entry associated with a key, missing and
    /// expired keys report NotFound
    fn get(&self, key: &KeyType) -> Result<CacheEntry>;

    /// Stores an entry unconditionally, overwriting any previous one
    fn set(&self, key: KeyType, entry: CacheEntry) -> Result<SetStatus>;

    /// Stores an entry only if the key holds no live entry,
    /// fails with NotStored otherwise
    fn add(&self, key: KeyType, entry: CacheEntry) -> Result<SetStatus>;

    /// Stores an entry only if the key holds a live entry,
    /// fails with NotStored otherwise
    fn replace(&self, key: KeyType, entry: CacheEntry) -> Result<SetStatus>;

    /// Concatenates the new data after the stored one, keeping the
    /// stored flags and expiration, fails with NotStored for
    /// missing keys
    fn append(&self, key: KeyType, new_entry: CacheEntry) -> Result<SetStatus>;

    /// Concatenates the new data before the stored one, fails with
    /// NotStored for missing keys
    fn prepend(&self, key: KeyType, new_entry: CacheEntry) -> Result<SetStatus>;

    /// Stores an entry only if cas matches the token of the stored
    /// entry, fails with KeyExists on a mismatch and NotFound for
    /// missing keys
    fn cas(&self, key: KeyType, entry: CacheEntry, cas: u64) -> Result<SetStatus>;
}
