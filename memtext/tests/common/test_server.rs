use std::net::TcpStream;
use std::process;
use std::time::Duration;

use memtext::memcache::cli::parser;
use memtext::memcache_server::{
    runtime_builder::start_memtextd_server_with_ctxt, server_context::ServerContext,
};
use tokio_util::sync::CancellationToken;

use crate::common::params_builder::MemtextdServerParamsBuilder;
use crate::common::random_port::PSEUDO_RANDOM_PORT;

pub struct MemtextdTestServer {
    thread_join_handle: Option<std::thread::JoinHandle<()>>,
    cancellation_token: CancellationToken,
    port: u16,
}

impl MemtextdTestServer {
    fn new(
        thread_join_handle: std::thread::JoinHandle<()>,
        cancellation_token: CancellationToken,
        port: u16,
    ) -> MemtextdTestServer {
        MemtextdTestServer {
            thread_join_handle: Some(thread_join_handle),
            cancellation_token,
            port,
        }
    }

    fn kill(&mut self) {
        self.cancellation_token.cancel();
        if let Some(thread_join_handle) = self.thread_join_handle.take() {
            if let Err(err) = thread_join_handle.join() {
                eprintln!("Problem when joining server thread: {:?}", err);
            }
        }
    }

    #[allow(dead_code)]
    pub fn get_connection_string(&self) -> String {
        format!(
            "memcache://127.0.0.1:{}?timeout=5&tcp_nodelay=true&protocol=ascii",
            self.port
        )
    }

    #[allow(dead_code)]
    pub fn get_port(&self) -> u16 {
        self.port
    }
}

impl Drop for MemtextdTestServer {
    fn drop(&mut self) {
        self.kill();
    }
}

fn wait_for_listener(port: u16) {
    for _ in 0..50 {
        if TcpStream::connect(("127.0.0.1", port)).is_ok() {
            return;
        }
        std::thread::sleep(Duration::from_millis(100));
    }
    panic!("Server did not start listening on port {}", port);
}

fn spawn_server_args(args: Vec<String>) -> MemtextdTestServer {
    let config = match parser::parse(args) {
        Ok(config) => config,
        Err(err) => {
            eprint!("{}", err);
            process::exit(1);
        }
    };
    let ctxt = ServerContext::get_default_server_context();
    let cancellation_token = ctxt.cancellation_token();
    let port = config.port;
    let handle = std::thread::spawn(move || {
        if let Err(err) = start_memtextd_server_with_ctxt(config, ctxt) {
            eprintln!("Server error: {}", err);
        }
    });
    wait_for_listener(port);
    MemtextdTestServer::new(handle, cancellation_token, port)
}

pub fn spawn_server(mut params: MemtextdServerParamsBuilder) -> MemtextdTestServer {
    let port = PSEUDO_RANDOM_PORT.lock().unwrap().get_next_port();
    params.with_port(port);
    let args = params.build();
    spawn_server_args(args)
}
