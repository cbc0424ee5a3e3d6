use crate::memcache;
use crate::memcache_server;
use crate::version::MEMTEXT_VERSION;
use log::info;
use std::process;
use tracing_log::LogTracer;
extern crate clap;

#[cfg(feature = "jemallocator")]
use jemallocator::Jemalloc;

#[cfg(feature = "jemallocator")]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

fn get_log_level(verbose: u8) -> tracing::Level {
    // Vary the output based on how many times the user used the "verbose" flag
    // (i.e. 'myprog -v -v -v' or 'myprog -vvv' vs 'myprog -v'
    match verbose {
        0 => tracing::Level::ERROR,
        1 => tracing::Level::WARN,
        2 => tracing::Level::INFO,
        3 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    }
}

pub fn run(args: Vec<String>) {
    LogTracer::init().expect("Cannot initialize logger");

    let cli_config = match memcache::cli::parser::parse(args) {
        Ok(config) => config,
        Err(err) => {
            eprint!("{}", err);
            process::exit(1);
        }
    };
    tracing_subscriber::fmt()
        .with_max_level(get_log_level(cli_config.verbose))
        .init();

    info!("Version: {}", MEMTEXT_VERSION);
    info!("Listen address: {}", cli_config.listen_address);
    info!("Listen port: {}", cli_config.port);
    info!("Listen backlog: {}", cli_config.backlog_limit);
    info!("Number of threads: {}", cli_config.threads);
    info!("Runtime type: {}", cli_config.runtime_type.as_str());

    let ctxt = memcache_server::server_context::ServerContext::get_default_server_context();
    let result =
        memcache_server::runtime_builder::start_memtextd_server_with_ctxt(cli_config, ctxt);
    if let Err(err) = result {
        error!("Server error: {}", err);
        process::exit(1);
    }
}
