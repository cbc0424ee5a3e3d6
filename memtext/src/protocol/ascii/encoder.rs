use crate::cache::error::CacheError;
use crate::protocol::ascii::network;
use bytes::{BufMut, Bytes, BytesMut};

/// Server response
#[derive(Debug, PartialEq)]
pub enum AsciiResponse {
    Values(network::ValuesResponse),
    Stored(network::StoredResponse),
    NotStored(network::NotStoredResponse),
    Exists(network::ExistsResponse),
    NotFound(network::NotFoundResponse),
    ClientError(network::ClientErrorResponse),
    Error(network::ErrorResponse),
}

/// Maps a storage error onto the response the command reports
pub fn storage_error_to_response(error: CacheError) -> AsciiResponse {
    match error {
        CacheError::NotFound => AsciiResponse::NotFound(network::NotFoundResponse {}),
        CacheError::KeyExists => AsciiResponse::Exists(network::ExistsResponse {}),
        CacheError::NotStored => AsciiResponse::NotStored(network::NotStoredResponse {}),
    }
}

pub struct ResponseMessage {
    pub(crate) data: Bytes,
}

pub struct MemcacheAsciiEncoder {}

impl Default for MemcacheAsciiEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl MemcacheAsciiEncoder {
    const CLIENT_ERROR_PREFIX: &'static str = "CLIENT_ERROR Incorrect protocol input: ";

    pub fn new() -> MemcacheAsciiEncoder {
        MemcacheAsciiEncoder {}
    }

    pub fn encode_message(&self, msg: &AsciiResponse) -> ResponseMessage {
        match msg {
            AsciiResponse::Values(response) => self.encode_values(response),
            AsciiResponse::Stored(_response) => Self::status_line("STORED"),
            AsciiResponse::NotStored(_response) => {
                Self::status_line(CacheError::NotStored.to_static_string())
            }
            AsciiResponse::Exists(_response) => {
                Self::status_line(CacheError::KeyExists.to_static_string())
            }
            AsciiResponse::NotFound(_response) => {
                Self::status_line(CacheError::NotFound.to_static_string())
            }
            AsciiResponse::ClientError(response) => Self::client_error(response.error),
            AsciiResponse::Error(_response) => Self::status_line("ERROR"),
        }
    }

    fn status_line(token: &str) -> ResponseMessage {
        let mut message = BytesMut::with_capacity(token.len() + network::CRLF.len());
        message.put_slice(token.as_bytes());
        message.put_slice(network::CRLF);
        ResponseMessage {
            data: message.freeze(),
        }
    }

    fn client_error(reason: &str) -> ResponseMessage {
        let mut message = BytesMut::with_capacity(
            Self::CLIENT_ERROR_PREFIX.len() + reason.len() + network::CRLF.len(),
        );
        message.put_slice(Self::CLIENT_ERROR_PREFIX.as_bytes());
        message.put_slice(reason.as_bytes());
        message.put_slice(network::CRLF);
        ResponseMessage {
            data: message.freeze(),
        }
    }

    fn encode_values(&self, response: &network::ValuesResponse) -> ResponseMessage {
        // VALUE line and data block per item, numeric fields estimated
        let estimated: usize = response
            .values
            .iter()
            .map(|item| item.key.len() + item.data.len() + 64)
            .sum();
        let mut message = BytesMut::with_capacity(estimated + 5);
        for item in &response.values {
            message.put_slice(b"VALUE ");
            message.put_slice(&item.key);
            if response.with_cas {
                message.put_slice(
                    format!(" {} {} {}", item.flags, item.data.len(), item.cas).as_bytes(),
                );
            } else {
                message.put_slice(format!(" {} {}", item.flags, item.data.len()).as_bytes());
            }
            message.put_slice(network::CRLF);
            message.put_slice(&item.data);
            message.put_slice(network::CRLF);
        }
        message.put_slice(b"END");
        message.put_slice(network::CRLF);
        ResponseMessage {
            data: message.freeze(),
        }
    }
}
