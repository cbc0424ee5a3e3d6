use crate::version::MEMTEXT_VERSION;
use clap::{command, crate_authors, value_parser, Arg, ArgAction, ValueEnum};
use std::net::IpAddr;

const DEFAULT_PORT: u16 = 11211;
const DEFAULT_ADDRESS: &str = "127.0.0.1";
const DEFAULT_BACKLOG_LIMIT: u32 = 1024;
const DEFAULT_NUMBER_OF_THREADS: usize = 4;

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum RuntimeType {
    /// one listener runtime per worker thread, sharing the port
    CurrentThread,
    /// a single work stealing threadpool runtime
    MultiThread,
}

impl RuntimeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuntimeType::CurrentThread => "Current thread runtime per core",
            RuntimeType::MultiThread => "Work stealing threadpool runtime",
        }
    }
}

pub struct MemtextdConfig {
    pub port: u16,
    pub backlog_limit: u32,
    pub threads: usize,
    pub verbose: u8,
    pub listen_address: IpAddr,
    pub runtime_type: RuntimeType,
}

fn cli_args() -> clap::Command {
    command!()
        .version(MEMTEXT_VERSION)
        .author(crate_authors!("\n"))
        .about("memtextd - memcached text protocol server")
        .arg(
            Arg::new("port")
                .short('p')
                .long("port")
                .default_value("11211")
                .value_parser(value_parser!(u16))
                .help("TCP port to listen on"),
        )
        .arg(
            Arg::new("listen")
                .short('l')
                .long("listen")
                .default_value(DEFAULT_ADDRESS)
                .help("interface to listen on"),
        )
        .arg(
            Arg::new("listen-backlog")
                .short('b')
                .long("listen-backlog")
                .default_value("1024")
                .value_parser(value_parser!(u32))
                .help("set the backlog queue limit"),
        )
        .arg(
            Arg::new("threads")
                .short('t')
                .long("threads")
                .default_value(num_cpus::get().to_string())
                .value_parser(value_parser!(usize))
                .help("number of threads to use"),
        )
        .arg(
            Arg::new("runtime-type")
                .short('r')
                .long("runtime-type")
                .default_value("current-thread")
                .value_parser(value_parser!(RuntimeType))
                .help("runtime type to use"),
        )
        .arg(
            Arg::new("v")
                .short('v')
                .action(ArgAction::Count)
                .help("sets the level of verbosity"),
        )
}

impl MemtextdConfig {
    fn from_args(args: Vec<String>) -> Result<MemtextdConfig, String> {
        let matches = cli_args().get_matches_from(args);

        let port: u16 = *matches.get_one::<u16>("port").unwrap_or(&DEFAULT_PORT);
        let backlog_limit: u32 = *matches
            .get_one::<u32>("listen-backlog")
            .unwrap_or(&DEFAULT_BACKLOG_LIMIT);
        let threads: usize = *matches
            .get_one::<usize>("threads")
            .unwrap_or(&DEFAULT_NUMBER_OF_THREADS);

        let listen_address = match matches
            .get_one::<String>("listen")
            .unwrap_or(&String::from(DEFAULT_ADDRESS))
            .parse::<IpAddr>()
        {
            Ok(ip_addr) => ip_addr,
            Err(err) => return Err(format!("Invalid ip address: {}", err)),
        };

        let runtime_type = *matches
            .get_one::<RuntimeType>("runtime-type")
            .unwrap_or(&RuntimeType::CurrentThread);

        let verbose = matches.get_count("v");

        Ok(MemtextdConfig {
            port,
            backlog_limit,
            threads,
            verbose,
            listen_address,
            runtime_type,
        })
    }
}

pub fn parse(args: Vec<String>) -> Result<MemtextdConfig, String> {
    MemtextdConfig::from_args(args)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn verify_cli() {
        cli_args().debug_assert();
    }

    #[test]
    fn parse_uses_defaults() {
        let config = parse(args(&["memtextd"])).unwrap();
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.backlog_limit, DEFAULT_BACKLOG_LIMIT);
        assert_eq!(config.verbose, 0);
        assert_eq!(
            config.listen_address,
            DEFAULT_ADDRESS.parse::<IpAddr>().unwrap()
        );
        assert_eq!(config.runtime_type, RuntimeType::CurrentThread);
    }

    #[test]
    fn parse_reads_port_runtime_and_verbosity() {
        let config = parse(args(&[
            "memtextd",
            "-p",
            "11311",
            "--runtime-type",
            "multi-thread",
            "-vv",
        ]))
        .unwrap();
        assert_eq!(config.port, 11311);
        assert_eq!(config.runtime_type, RuntimeType::MultiThread);
        assert_eq!(config.verbose, 2);
    }

    #[test]
    fn parse_reads_listen_address() {
        let config = parse(args(&["memtextd", "-l", "0.0.0.0"])).unwrap();
        assert_eq!(config.listen_address, "0.0.0.0".parse::<IpAddr>().unwrap());
    }
}
