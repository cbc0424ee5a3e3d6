use crate::memcache::store;
use crate::protocol::ascii::encoder::storage_error_to_response;
use crate::protocol::ascii::{decoder, encoder, network};
use std::sync::Arc;

fn into_noreply(
    response: encoder::AsciiResponse,
    noreply: bool,
) -> Option<encoder::AsciiResponse> {
    if noreply {
        return None;
    }
    Some(response)
}

/// Maps decoded requests onto storage operations and picks the
/// response line each outcome gets
pub struct AsciiHandler {
    storage: Arc<store::MemcStore>,
}

impl AsciiHandler {
    pub fn new(store: Arc<store::MemcStore>) -> AsciiHandler {
        AsciiHandler { storage: store }
    }

    /// Returns None when the command asked for silence, a suppressed
    /// response covers errors too
    pub fn handle_request(&self, req: decoder::AsciiRequest) -> Option<encoder::AsciiResponse> {
        match req {
            decoder::AsciiRequest::Get(request) => Some(self.get(request, false)),
            decoder::AsciiRequest::Gets(request) => Some(self.get(request, true)),
            decoder::AsciiRequest::Set(request) => {
                let noreply = request.noreply;
                into_noreply(self.set(request), noreply)
            }
            decoder::AsciiRequest::Add(request) => {
                let noreply = request.noreply;
                into_noreply(self.add_replace(request, true), noreply)
            }
            decoder::AsciiRequest::Replace(request) => {
                let noreply = request.noreply;
                into_noreply(self.add_replace(request, false), noreply)
            }
            decoder::AsciiRequest::Append(request) => {
                let noreply = request.noreply;
                into_noreply(self.append_prepend(request, true), noreply)
            }
            decoder::AsciiRequest::Prepend(request) => {
                let noreply = request.noreply;
                into_noreply(self.append_prepend(request, false), noreply)
            }
            decoder::AsciiRequest::Cas(request) => {
                let noreply = request.noreply;
                into_noreply(self.cas(request), noreply)
            }
            decoder::AsciiRequest::MalformedStorage(request) => into_noreply(
                encoder::AsciiResponse::ClientError(network::ClientErrorResponse {
                    error: request.violation.to_static_string(),
                }),
                request.noreply,
            ),
            decoder::AsciiRequest::Quit(_request) => None,
            decoder::AsciiRequest::Unknown(request) => {
                debug!("Unknown command: {:?}", request.command);
                Some(encoder::AsciiResponse::Error(network::ErrorResponse {}))
            }
        }
    }

    fn get(&self, request: network::RetrievalRequest, with_cas: bool) -> encoder::AsciiResponse {
        if request.keys.is_empty() {
            debug!("No keys submitted");
        }
        let mut values = Vec::with_capacity(request.keys.len());
        for key in request.keys {
            // missing and expired keys are skipped, not reported
            if let Ok(entry) = self.storage.get(&key) {
                values.push(network::ValueItem {
                    key,
                    flags: entry.header.flags,
                    cas: entry.header.cas,
                    data: entry.data,
                });
            }
        }
        encoder::AsciiResponse::Values(network::ValuesResponse { values, with_cas })
    }

    fn set(&self, request: network::SetRequest) -> encoder::AsciiResponse {
        let entry = store::Entry::new(request.data, request.flags, request.exptime);
        match self.storage.set(request.key, entry) {
            Ok(_status) => encoder::AsciiResponse::Stored(network::StoredResponse {}),
            Err(err) => storage_error_to_response(err),
        }
    }

    fn add_replace(&self, request: network::StoreRequest, is_add: bool) -> encoder::AsciiResponse {
        let entry = store::Entry::new(request.data, request.flags, request.exptime);
        let result = if is_add {
            self.storage.add(request.key, entry)
        } else {
            self.storage.replace(request.key, entry)
        };
        match result {
            Ok(_status) => encoder::AsciiResponse::Stored(network::StoredResponse {}),
            Err(err) => storage_error_to_response(err),
        }
    }

    fn append_prepend(
        &self,
        request: network::AppendRequest,
        is_append: bool,
    ) -> encoder::AsciiResponse {
        let entry = store::Entry::new(request.data, request.flags, request.exptime);
        let result = if is_append {
            self.storage.append(request.key, entry)
        } else {
            self.storage.prepend(request.key, entry)
        };
        match result {
            Ok(_status) => encoder::AsciiResponse::Stored(network::StoredResponse {}),
            Err(err) => storage_error_to_response(err),
        }
    }

    fn cas(&self, request: network::CasRequest) -> encoder::AsciiResponse {
        let entry = store::Entry::new(request.data, request.flags, request.exptime);
        match self.storage.cas(request.key, entry, request.cas) {
            Ok(_status) => encoder::AsciiResponse::Stored(network::StoredResponse {}),
            Err(err) => storage_error_to_response(err),
        }
    }
}

#[cfg(any(test, feature = "criterion"))]
pub mod mock {
    use super::*;
    use crate::mock::mock_server::create_dash_map_storage;
    use bytes::Bytes;

    const TEST_FLAGS: u16 = 0xBEEF;

    pub fn create_dash_map_handler() -> AsciiHandler {
        AsciiHandler::new(create_dash_map_storage().memc_store)
    }

    pub fn create_get_request(key: Bytes) -> decoder::AsciiRequest {
        decoder::AsciiRequest::Get(network::GetRequest { keys: vec![key] })
    }

    pub fn create_set_request(key: Bytes, data: Bytes) -> decoder::AsciiRequest {
        decoder::AsciiRequest::Set(network::SetRequest {
            key,
            flags: TEST_FLAGS,
            exptime: 0,
            data,
            noreply: false,
        })
    }

    /// Stores through a noreply set, asserting the silent outcome
    pub fn insert_value(handler: &AsciiHandler, key: Bytes, data: Bytes) {
        let request = decoder::AsciiRequest::Set(network::SetRequest {
            key,
            flags: TEST_FLAGS,
            exptime: 0,
            data,
            noreply: true,
        });
        let result = handler.handle_request(request);
        assert!(result.is_none());
    }

    pub fn get_value(handler: &AsciiHandler, key: Bytes) -> Bytes {
        let request = create_get_request(key);
        match handler.handle_request(request) {
            Some(encoder::AsciiResponse::Values(response)) => {
                assert_eq!(response.values.len(), 1);
                assert_ne!(response.values[0].cas, 0);
                response.values[0].data.clone()
            }
            _ => unreachable!(),
        }
    }
}
