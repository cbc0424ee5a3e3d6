use crate::cache::cache::ValueType;
use bytes::Bytes;

pub fn from_string(value: &str) -> ValueType {
    Bytes::copy_from_slice(value.as_bytes())
}

pub fn from_slice(value: &[u8]) -> ValueType {
    Bytes::copy_from_slice(value)
}
