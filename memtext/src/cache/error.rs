/// Errors reported by the storage layer
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum CacheError {
    NotFound,
    KeyExists,
    NotStored,
}

impl CacheError {
    /// Protocol token sent to the client for this error
    pub fn to_static_string(&self) -> &'static str {
        match self {
            CacheError::NotFound => "NOT_FOUND",
            CacheError::KeyExists => "EXISTS",
            CacheError::NotStored => "NOT_STORED",
        }
    }
}

pub type Result<T> = std::result::Result<T, CacheError>;
