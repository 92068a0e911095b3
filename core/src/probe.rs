//! Probe adapters.
//!
//! The two leaf probes of a host check. Both swallow every network fault and
//! answer with "no evidence" instead, so callers compose them by plain
//! fallback order.

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use async_trait::async_trait;
use hostsweep_common::config::Config;
use hostsweep_protocols::{ping, snmp};
use tracing::debug;

/// Yes/no reachability check for one address.
#[async_trait]
pub trait LivenessProbe: Send + Sync {
    async fn probe_liveness(&self, addr: IpAddr) -> bool;
}

/// Query-based check returning the first `(identifier, value)` that answered.
#[async_trait]
pub trait InformationProbe: Send + Sync {
    async fn probe_information(&self, addr: IpAddr, community: &str) -> Option<(String, String)>;
}

/// Liveness through the system `ping` command.
#[derive(Debug, Clone)]
pub struct SystemPing {
    wait: Duration,
    limit: Duration,
}

impl SystemPing {
    pub fn new(wait: Duration, limit: Duration) -> Self {
        Self { wait, limit }
    }

    pub fn from_config(cfg: &Config) -> Self {
        Self::new(cfg.ping_wait, cfg.ping_timeout)
    }
}

#[async_trait]
impl LivenessProbe for SystemPing {
    async fn probe_liveness(&self, addr: IpAddr) -> bool {
        ping::ping(addr, self.wait, self.limit).await
    }
}

/// Information through SNMPv2c GET requests.
#[derive(Debug, Clone)]
pub struct SnmpProbe {
    port: u16,
    identifiers: Vec<String>,
    window: Duration,
}

impl SnmpProbe {
    pub fn new(port: u16, identifiers: Vec<String>, window: Duration) -> Self {
        Self {
            port,
            identifiers,
            window,
        }
    }

    pub fn from_config(cfg: &Config) -> Self {
        Self::new(cfg.snmp_port, cfg.oids.clone(), cfg.snmp_timeout)
    }
}

#[async_trait]
impl InformationProbe for SnmpProbe {
    async fn probe_information(&self, addr: IpAddr, community: &str) -> Option<(String, String)> {
        let target = SocketAddr::new(addr, self.port);
        probe_information(target, community, &self.identifiers, self.window).await
    }
}

/// Queries `identifiers` once within `window` and keeps the first answer.
pub async fn probe_information(
    target: SocketAddr,
    community: &str,
    identifiers: &[String],
    window: Duration,
) -> Option<(String, String)> {
    let answers = snmp::get_many(target, community, identifiers, window).await;
    first_answer(identifiers, answers)
}

/// Pairs the first successful answer with its identifier, in list order.
pub fn first_answer<E: std::fmt::Display>(
    identifiers: &[String],
    answers: Vec<Result<String, E>>,
) -> Option<(String, String)> {
    for (identifier, answer) in identifiers.iter().zip(answers) {
        match answer {
            Ok(value) => return Some((identifier.clone(), value)),
            Err(e) => debug!("{identifier}: {e}"),
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use hostsweep_protocols::snmp::SnmpError;

    fn oids() -> Vec<String> {
        vec!["1.3.6.1.2.1.1.5.0".to_string(), "1.3.6.1.2.1.1.1.0".to_string()]
    }

    #[test]
    fn first_success_in_list_order_wins() {
        let answers: Vec<Result<String, SnmpError>> =
            vec![Ok("edge-01".to_string()), Ok("Linux".to_string())];
        assert_eq!(
            first_answer(&oids(), answers),
            Some(("1.3.6.1.2.1.1.5.0".to_string(), "edge-01".to_string()))
        );
    }

    #[test]
    fn falls_through_to_second_identifier() {
        let answers = vec![Err(SnmpError::NoSuchObject), Ok("Cisco IOS".to_string())];
        assert_eq!(
            first_answer(&oids(), answers),
            Some(("1.3.6.1.2.1.1.1.0".to_string(), "Cisco IOS".to_string()))
        );
    }

    #[test]
    fn every_failure_is_no_answer() {
        let answers: Vec<Result<String, SnmpError>> =
            vec![Err(SnmpError::Timeout), Err(SnmpError::Timeout)];
        assert_eq!(first_answer(&oids(), answers), None);
    }

    #[tokio::test]
    async fn unanswered_query_is_absorbed() {
        let silent = tokio::net::UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let port = silent.local_addr().unwrap().port();
        let probe = SnmpProbe::new(port, oids(), Duration::from_millis(100));

        let found = probe
            .probe_information(IpAddr::from([127, 0, 0, 1]), "public")
            .await;
        assert_eq!(found, None);
    }
}
