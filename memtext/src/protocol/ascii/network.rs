use super::validator::ProtocolViolation;
use bytes::Bytes;
use serde_derive::{Deserialize, Serialize};

/// Line terminator for command lines, data blocks and responses
pub const CRLF: &[u8] = b"\r\n";

/// Write command carrying a data block
#[derive(Clone, Debug, PartialEq)]
pub struct StoreRequest {
    pub(crate) key: Bytes,
    pub(crate) flags: u16,
    pub(crate) exptime: i64,
    pub(crate) data: Bytes,
    pub(crate) noreply: bool,
}

pub type SetRequest = StoreRequest;
pub type AddRequest = StoreRequest;
pub type ReplaceRequest = StoreRequest;
pub type AppendRequest = StoreRequest;
pub type PrependRequest = StoreRequest;

/// Conditional write, stored only when cas matches the live entry
#[derive(Clone, Debug, PartialEq)]
pub struct CasRequest {
    pub(crate) key: Bytes,
    pub(crate) flags: u16,
    pub(crate) exptime: i64,
    pub(crate) data: Bytes,
    pub(crate) cas: u64,
    pub(crate) noreply: bool,
}

/// Multi key read
#[derive(Clone, Debug, PartialEq)]
pub struct RetrievalRequest {
    pub(crate) keys: Vec<Bytes>,
}

pub type GetRequest = RetrievalRequest;
pub type GetsRequest = RetrievalRequest;

/// Write command that failed validation, its data block has
/// already been drained off the stream
#[derive(Clone, Debug, PartialEq)]
pub struct MalformedRequest {
    pub(crate) violation: ProtocolViolation,
    pub(crate) noreply: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct UnknownRequest {
    pub(crate) command: Bytes,
}

#[derive(Clone, Debug, PartialEq)]
pub struct QuitRequest {}

/// Response with nothing but a status line
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct StatusResponse {}

pub type StoredResponse = StatusResponse;
pub type NotStoredResponse = StatusResponse;
pub type ExistsResponse = StatusResponse;
pub type NotFoundResponse = StatusResponse;
pub type ErrorResponse = StatusResponse;

#[derive(Clone, Debug, PartialEq)]
pub struct ClientErrorResponse {
    pub(crate) error: &'static str,
}

/// One VALUE block of a retrieval response
#[derive(Clone, Debug, PartialEq)]
pub struct ValueItem {
    pub(crate) key: Bytes,
    pub(crate) flags: u16,
    pub(crate) cas: u64,
    pub(crate) data: Bytes,
}

/// Retrieval response, an empty values list still terminates
/// with END on the wire
#[derive(Clone, Debug, PartialEq)]
pub struct ValuesResponse {
    pub(crate) values: Vec<ValueItem>,
    pub(crate) with_cas: bool,
}
