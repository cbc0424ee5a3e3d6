extern crate core_affinity;
use crate::memcache::cli::parser::RuntimeType;
use crate::memcache_server::server_context::ServerContext;
use crate::server;
use std::io;
use std::net::SocketAddr;
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};
use tokio::runtime::Builder;
use tokio::sync::mpsc;

use crate::memcache::cli::parser::MemtextdConfig;

fn get_worker_thread_name() -> String {
    static ATOMIC_ID: AtomicUsize = AtomicUsize::new(0);
    let id = ATOMIC_ID.fetch_add(1, Ordering::SeqCst);
    let str = format!("memtextd-wrk-{}", id);
    str
}

fn create_multi_thread_runtime(worker_threads: usize) -> tokio::runtime::Runtime {
    let runtime = Builder::new_multi_thread()
        .thread_name_fn(get_worker_thread_name)
        .worker_threads(worker_threads)
        .enable_all()
        .build()
        .unwrap();
    runtime
}

fn create_current_thread_runtime() -> tokio::runtime::Runtime {
    let runtime = Builder::new_current_thread()
        //.worker_threads(threads as usize)
        .thread_name_fn(get_worker_thread_name)
        //.max_blocking_threads(2)
        .enable_all()
        .build()
        .unwrap();
    runtime
}

fn create_current_thread_server(
    config: MemtextdConfig,
    ctxt: &ServerContext,
    listener_errors: mpsc::UnboundedSender<io::Error>,
) -> tokio::runtime::Runtime {
    let addr = SocketAddr::new(config.listen_address, config.port);
    let memc_config = server::memc_tcp::MemcacheServerConfig::new(config.backlog_limit);
    let store = ctxt.store();
    let cancellation_token = ctxt.cancellation_token();

    let core_ids = core_affinity::get_core_ids().unwrap();
    for i in 0..config.threads {
        let store_rc = Arc::clone(&store);
        let token_clone = cancellation_token.clone();
        let core_ids_clone = core_ids.clone();
        let error_tx = listener_errors.clone();
        std::thread::spawn(move || {
            debug!("Creating runtime {}", i);
            let core_id = core_ids_clone[i % core_ids_clone.len()];
            let res = core_affinity::set_for_current(core_id);
            let create_runtime = || {
                let child_runtime = create_current_thread_runtime();
                let mut tcp_server =
                    server::memc_tcp::MemcacheTcpServer::new(memc_config, store_rc, token_clone);
                if let Err(err) = child_runtime.block_on(tcp_server.run(addr)) {
                    let _ = error_tx.send(err);
                }
            };
            if res {
                debug!(
                    "Thread pinned {:?} to core {:?}",
                    std::thread::current().id(),
                    core_id.id
                );
                create_runtime();
            } else {
                warn!("Cannot pin thread to core {}", core_id.id);
                create_runtime();
            }
        });
    }
    create_current_thread_runtime()
}

fn create_threadpool_server(
    config: MemtextdConfig,
    ctxt: &ServerContext,
    listener_errors: mpsc::UnboundedSender<io::Error>,
) -> tokio::runtime::Runtime {
    let addr = SocketAddr::new(config.listen_address, config.port);
    let memc_config = server::memc_tcp::MemcacheServerConfig::new(config.backlog_limit);
    let runtime = create_multi_thread_runtime(config.threads);
    let mut tcp_server = server::memc_tcp::MemcacheTcpServer::new(
        memc_config,
        ctxt.store(),
        ctxt.cancellation_token(),
    );
    runtime.spawn(async move {
        if let Err(err) = tcp_server.run(addr).await {
            let _ = listener_errors.send(err);
        }
    });
    runtime
}

pub fn create_memtextd_server(
    config: MemtextdConfig,
    ctxt: &ServerContext,
    listener_errors: mpsc::UnboundedSender<io::Error>,
) -> tokio::runtime::Runtime {
    match config.runtime_type {
        RuntimeType::CurrentThread => create_current_thread_server(config, ctxt, listener_errors),
        RuntimeType::MultiThread => create_threadpool_server(config, ctxt, listener_errors),
    }
}

/// Runs the server until the system timer stops, which happens when the
/// cancellation token held by the context fires. A listener that cannot
/// bind cancels the token, so its error surfaces here as `Err`.
pub fn start_memtextd_server_with_ctxt(
    config: MemtextdConfig,
    ctxt: ServerContext,
) -> io::Result<()> {
    let (error_tx, mut error_rx) = mpsc::unbounded_channel();
    let parent_runtime = create_memtextd_server(config, &ctxt, error_tx);
    parent_runtime.block_on(ctxt.system_timer().run());
    // every listener holds a sender, a clean shutdown drops them all
    match error_rx.blocking_recv() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
