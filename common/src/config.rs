//! # Service Configuration
//!
//! A single immutable [`Config`] value is built at startup and shared by
//! reference with the scanner, the probes and the request server.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use thiserror::Error;

pub const DEFAULT_LISTEN: SocketAddr =
    SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 35640);
pub const DEFAULT_RECV_BUFFER: usize = 1024;
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_COMMUNITY: &str = "public";

/// sysName.0 followed by sysDescr.0
pub const DEFAULT_OIDS: &[&str] = &["1.3.6.1.2.1.1.5.0", "1.3.6.1.2.1.1.1.0"];

pub const DEFAULT_SNMP_PORT: u16 = 161;
pub const DEFAULT_SNMP_TIMEOUT: Duration = Duration::from_secs(1);
pub const DEFAULT_PING_TIMEOUT: Duration = Duration::from_secs(1);
pub const DEFAULT_PING_WAIT: Duration = Duration::from_millis(200);
pub const DEFAULT_MAX_IN_FLIGHT: usize = 32;

/// A /16 worth of hosts.
pub const DEFAULT_MAX_HOSTS: usize = 65_536;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("the concurrency cap must be at least 1")]
    ZeroConcurrency,
    #[error("the receive buffer must be at least 1 byte")]
    ZeroBuffer,
    #[error("the host limit must be at least 1")]
    ZeroHostLimit,
    #[error("at least one SNMP object identifier is required")]
    NoIdentifiers,
    #[error("'{0}' is not a dotted numeric object identifier")]
    BadIdentifier(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Address the request server binds to.
    pub listen: SocketAddr,
    /// Upper bound for the single read of a request payload.
    pub recv_buffer: usize,
    /// How long a connection may stay silent before it is dropped.
    pub read_timeout: Duration,
    /// Community used when a request carries none.
    pub default_community: String,
    /// Identifiers queried in order; the first answer wins.
    pub oids: Vec<String>,
    pub snmp_port: u16,
    /// One window for the whole identifier list.
    pub snmp_timeout: Duration,
    /// Hard limit for a ping process, spawn included.
    pub ping_timeout: Duration,
    /// Reply wait handed to the ping command itself.
    pub ping_wait: Duration,
    /// Maximum number of host probes running at once within a scan.
    pub max_in_flight: usize,
    /// Largest number of hosts a single request may expand to.
    pub max_hosts: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen: DEFAULT_LISTEN,
            recv_buffer: DEFAULT_RECV_BUFFER,
            read_timeout: DEFAULT_READ_TIMEOUT,
            default_community: DEFAULT_COMMUNITY.to_string(),
            oids: DEFAULT_OIDS.iter().map(|oid| oid.to_string()).collect(),
            snmp_port: DEFAULT_SNMP_PORT,
            snmp_timeout: DEFAULT_SNMP_TIMEOUT,
            ping_timeout: DEFAULT_PING_TIMEOUT,
            ping_wait: DEFAULT_PING_WAIT,
            max_in_flight: DEFAULT_MAX_IN_FLIGHT,
            max_hosts: DEFAULT_MAX_HOSTS,
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_in_flight == 0 {
            return Err(ConfigError::ZeroConcurrency);
        }
        if self.recv_buffer == 0 {
            return Err(ConfigError::ZeroBuffer);
        }
        if self.max_hosts == 0 {
            return Err(ConfigError::ZeroHostLimit);
        }
        if self.oids.is_empty() {
            return Err(ConfigError::NoIdentifiers);
        }
        if let Some(bad) = self.oids.iter().find(|oid| !is_dotted_oid(oid)) {
            return Err(ConfigError::BadIdentifier(bad.clone()));
        }
        Ok(())
    }
}

fn is_dotted_oid(oid: &str) -> bool {
    let mut arcs = 0;
    for arc in oid.split('.') {
        if arc.is_empty() || !arc.bytes().all(|b| b.is_ascii_digit()) {
            return false;
        }
        arcs += 1;
    }
    arcs >= 2
}
