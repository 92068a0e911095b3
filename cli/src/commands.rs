pub mod query;
pub mod serve;

use std::net::SocketAddr;
use std::time::Duration;

use clap::{ArgAction, Args, Parser, Subcommand};
use hostsweep_common::config::{self, Config};

#[derive(Parser)]
#[command(name = "hostsweep")]
#[command(about = "Finds active hosts in a CIDR range using SNMP and ping.")]
pub struct CommandLine {
    /// Raise log verbosity (-v debug, -vv trace); RUST_LOG wins when set
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Answer discovery requests over TCP
    #[command(alias = "s")]
    Serve(ServeArgs),
    /// Send one request to a running server and print the answer
    #[command(alias = "q")]
    Query(QueryArgs),
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Address to listen on
    #[arg(long, env = "HOSTSWEEP_LISTEN", default_value_t = config::DEFAULT_LISTEN)]
    pub listen: SocketAddr,

    /// Community used when a request carries none
    #[arg(long, env = "HOSTSWEEP_COMMUNITY", default_value = config::DEFAULT_COMMUNITY)]
    pub community: String,

    /// Object identifier to query, in priority order (repeatable)
    #[arg(long = "oid", env = "HOSTSWEEP_OIDS", value_delimiter = ',')]
    pub oids: Vec<String>,

    /// Maximum number of hosts probed at the same time
    #[arg(long, env = "HOSTSWEEP_MAX_IN_FLIGHT", default_value_t = config::DEFAULT_MAX_IN_FLIGHT)]
    pub max_in_flight: usize,

    /// Largest number of hosts a single request may cover
    #[arg(long, env = "HOSTSWEEP_MAX_HOSTS", default_value_t = config::DEFAULT_MAX_HOSTS)]
    pub max_hosts: usize,

    #[arg(long, env = "HOSTSWEEP_SNMP_PORT", default_value_t = config::DEFAULT_SNMP_PORT)]
    pub snmp_port: u16,

    /// SNMP window in milliseconds, shared by every identifier
    #[arg(long, env = "HOSTSWEEP_SNMP_TIMEOUT_MS", default_value_t = millis(config::DEFAULT_SNMP_TIMEOUT))]
    pub snmp_timeout_ms: u64,

    /// Hard limit for one ping process in milliseconds
    #[arg(long, env = "HOSTSWEEP_PING_TIMEOUT_MS", default_value_t = millis(config::DEFAULT_PING_TIMEOUT))]
    pub ping_timeout_ms: u64,

    /// Reply wait passed to ping in milliseconds
    #[arg(long, env = "HOSTSWEEP_PING_WAIT_MS", default_value_t = millis(config::DEFAULT_PING_WAIT))]
    pub ping_wait_ms: u64,

    /// Request payload limit in bytes
    #[arg(long, env = "HOSTSWEEP_RECV_BUFFER", default_value_t = config::DEFAULT_RECV_BUFFER)]
    pub recv_buffer: usize,

    /// How long a client may stay silent before it is dropped, in milliseconds
    #[arg(long, env = "HOSTSWEEP_READ_TIMEOUT_MS", default_value_t = millis(config::DEFAULT_READ_TIMEOUT))]
    pub read_timeout_ms: u64,
}

impl ServeArgs {
    pub fn into_config(self) -> Config {
        let defaults = Config::default();
        let oids = if self.oids.is_empty() {
            defaults.oids
        } else {
            self.oids
        };

        Config {
            listen: self.listen,
            recv_buffer: self.recv_buffer,
            read_timeout: Duration::from_millis(self.read_timeout_ms),
            default_community: self.community,
            oids,
            snmp_port: self.snmp_port,
            snmp_timeout: Duration::from_millis(self.snmp_timeout_ms),
            ping_timeout: Duration::from_millis(self.ping_timeout_ms),
            ping_wait: Duration::from_millis(self.ping_wait_ms),
            max_in_flight: self.max_in_flight,
            max_hosts: self.max_hosts,
        }
    }
}

#[derive(Args, Debug)]
pub struct QueryArgs {
    /// Range to scan, e.g. 192.168.1.0/24
    pub target: String,

    /// Community sent along with the range
    #[arg(short, long)]
    pub community: Option<String>,

    /// Server to ask
    #[arg(short, long, env = "HOSTSWEEP_SERVER", default_value = "127.0.0.1:35640")]
    pub server: SocketAddr,
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

const fn millis(duration: Duration) -> u64 {
    duration.as_millis() as u64
}
