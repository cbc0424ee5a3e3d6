use socket2::{Domain, SockAddr, Socket, Type};
use std::net::SocketAddr;
use std::sync::Arc;

use tokio::io;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use tracing::{debug, error};
use tracing_attributes::instrument;

use crate::cache::cache::Cache;
use crate::memcache::store as storage;
use crate::memcache_server::client_handler;

#[derive(Clone, Copy)]
pub struct MemcacheServerConfig {
    listen_backlog: u32,
}

impl MemcacheServerConfig {
    pub fn new(listen_backlog: u32) -> Self {
        MemcacheServerConfig { listen_backlog }
    }
}

pub struct MemcacheTcpServer {
    storage: Arc<storage::MemcStore>,
    cancellation_token: CancellationToken,
    config: MemcacheServerConfig,
}

impl MemcacheTcpServer {
    pub fn new(
        config: MemcacheServerConfig,
        store: Arc<dyn Cache + Send + Sync>,
        cancellation_token: CancellationToken,
    ) -> MemcacheTcpServer {
        MemcacheTcpServer {
            storage: Arc::new(storage::MemcStore::new(store)),
            cancellation_token,
            config,
        }
    }

    #[instrument(skip(self))]
    pub async fn run(&mut self, addr: SocketAddr) -> io::Result<()> {
        let listener = match self.get_tcp_listener(addr) {
            Ok(listener) => listener,
            Err(err) => {
                error!("Cannot listen on {}: {}", addr, err);
                // startup cannot proceed, stop the whole server
                self.cancellation_token.cancel();
                return Err(err);
            }
        };
        loop {
            tokio::select! {
                connection = listener.accept() => {
                    match connection {
                        Ok((socket, peer_addr)) => {
                            socket.set_nodelay(true)?;
                            socket.set_linger(None)?;
                            let mut client = client_handler::Client::new(
                                Arc::clone(&self.storage),
                                socket,
                                peer_addr,
                            );

                            // Like with other small servers, we'll `spawn` this client to ensure it
                            // runs concurrently with all other clients. The `move` keyword is used
                            // here to move ownership of our store handle into the async closure.
                            tokio::spawn(async move { client.handle().await });
                        },
                        Err(err) => {
                            error!("Accept error: {}", err);
                        }
                    }
                },
                _ = self.cancellation_token.cancelled() => {
                    debug!("Stopping server listening on: {}", addr);
                    return Ok(());
                }
            }
        }
    }

    fn get_tcp_listener(&mut self, addr: SocketAddr) -> Result<TcpListener, std::io::Error> {
        let socket = Socket::new(Domain::for_address(addr), Type::STREAM, None)?;
        socket.set_reuse_address(true)?;
        socket.set_reuse_port(true)?;
        socket.set_nonblocking(true)?;
        debug!("Binding to addr: {:?}", addr);
        let sock_addr = SockAddr::from(addr);
        if let Err(err) = socket.bind(&sock_addr) {
            error!("Can't bind to: {:?}, err {:?}", sock_addr, err);
            return Err(err);
        }

        if let Err(err) = socket.listen(self.config.listen_backlog as i32) {
            error!("Listen error: {:?}", err);
            return Err(err);
        }

        let std_listener: std::net::TcpListener = socket.into();
        TcpListener::from_std(std_listener)
    }
}
