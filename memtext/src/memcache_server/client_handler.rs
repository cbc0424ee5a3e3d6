use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io;
use tokio::net::TcpStream;
use tracing::{debug, error};
use tracing_attributes::instrument;

use super::handler;
use crate::memcache::store as storage;
use crate::protocol::ascii::connection::MemcacheAsciiConnection;
use crate::protocol::ascii::decoder::AsciiRequest;

pub struct Client {
    stream: MemcacheAsciiConnection,
    addr: SocketAddr,
    handler: handler::AsciiHandler,
}

impl Client {
    pub fn new(store: Arc<storage::MemcStore>, socket: TcpStream, addr: SocketAddr) -> Self {
        Client {
            stream: MemcacheAsciiConnection::new(socket),
            addr,
            handler: handler::AsciiHandler::new(store),
        }
    }

    #[instrument(skip(self), fields(peer = %self.addr))]
    pub async fn handle(&mut self) {
        debug!("New client connected: {}", self.addr);

        // Here for every request we get back from the decoder we generate
        // a response based on the values in the storage.
        loop {
            let req_or_none = self.stream.read_frame().await;
            let client_close = self.handle_frame(req_or_none).await;
            if client_close {
                return;
            }
        }
    }

    async fn handle_frame(&mut self, req: Result<Option<AsciiRequest>, io::Error>) -> bool {
        match req {
            Ok(re) => {
                match re {
                    Some(request) => self.handle_request(request).await,
                    None => {
                        // The connection will be closed at this point as `read_frame()` has returned `None`.
                        debug!("Connection closed: {}", self.addr);
                        true
                    }
                }
            }
            Err(err) => {
                error!("Error when reading frame; error = {:?}", err);
                true
            }
        }
    }

    /// Handles single memcached text request
    /// Returns true if we should leave client receive loop
    async fn handle_request(&mut self, request: AsciiRequest) -> bool {
        debug!("Got request {}", request.name());

        if let AsciiRequest::Quit(_req) = request {
            debug!("Closing client socket, quit received");
            if let Err(_e) = self.stream.shutdown().await.map_err(log_error) {}
            return true;
        }

        let resp = self.handler.handle_request(request);
        match resp {
            Some(response) => {
                debug!("Sending response {:?}", response);
                if let Err(e) = self.stream.write(&response).await {
                    error!("error on sending response; error = {:?}", e);
                    return true;
                }
                false
            }
            None => false,
        }
    }
}

fn log_error(e: io::Error) {
    // in most cases its not an error
    // client may just drop connection i.e. like
    // php client does
    if e.kind() == io::ErrorKind::NotConnected {
        info!("Error: {}", e);
    } else {
        error!("Error: {}", e);
    }
}
