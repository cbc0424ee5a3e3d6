use std::net::TcpListener;

use memtext::memcache::cli::parser;
use memtext::memcache_server::runtime_builder::start_memtextd_server_with_ctxt;
use memtext::memcache_server::server_context::ServerContext;

fn server_args(port: u16, runtime: &str) -> Vec<String> {
    vec![
        String::from("./target/debug/memtextd"),
        String::from("--runtime-type"),
        String::from(runtime),
        String::from("--threads"),
        String::from("2"),
        String::from("--port"),
        port.to_string(),
    ]
}

// A plain listener does not set SO_REUSEPORT, so the server cannot
// share the port with it and every bind fails.
fn start_on_occupied_port(runtime: &str) -> std::io::Result<()> {
    let listener = TcpListener::bind(("127.0.0.1", 0)).unwrap();
    let port = listener.local_addr().unwrap().port();

    let config = parser::parse(server_args(port, runtime)).unwrap();
    let ctxt = ServerContext::get_default_server_context();
    start_memtextd_server_with_ctxt(config, ctxt)
}

#[test]
fn bind_failure_stops_threadpool_server_with_error_check() {
    assert!(start_on_occupied_port("multi-thread").is_err());
}

#[test]
fn bind_failure_stops_current_thread_server_with_error_check() {
    assert!(start_on_occupied_port("current-thread").is_err());
}
