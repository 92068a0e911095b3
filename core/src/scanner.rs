//! The **range scanner**.
//!
//! Expands a CIDR range into its usable hosts and runs one [`Prober`] call per
//! host, with at most `max_in_flight` probes alive at any time. Every host gets
//! a determinate outcome before a scan returns, and results are assembled in
//! the address order of the range, never in completion order.
//!
//! A probe task that panics only costs its own host, which is reported as
//! silent. A malformed range is the one failure that reaches the caller.

use std::net::IpAddr;
use std::sync::Arc;
use std::time::Instant;

use hostsweep_common::config::Config;
use hostsweep_common::network::outcome::{ProbeOutcome, ScanResultSet};
use hostsweep_common::network::range::{AddressRange, RangeError};
use thiserror::Error;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::prober::Prober;

#[derive(Debug, Error)]
pub enum ScanError {
    #[error(transparent)]
    InvalidRange(#[from] RangeError),
    /// The permit semaphore was closed. `probe_all` owns it and never closes
    /// it, so this only surfaces if that changes.
    #[error("probe dispatch failed: {0}")]
    Dispatch(String),
}

pub struct RangeScanner<P> {
    prober: Arc<P>,
    max_in_flight: usize,
    max_hosts: usize,
}

impl<P: Prober> RangeScanner<P> {
    /// `max_in_flight` is raised to 1 when zero.
    pub fn new(prober: P, max_in_flight: usize, max_hosts: usize) -> Self {
        Self {
            prober: Arc::new(prober),
            max_in_flight: max_in_flight.max(1),
            max_hosts,
        }
    }

    pub fn from_config(prober: P, cfg: &Config) -> Self {
        Self::new(prober, cfg.max_in_flight, cfg.max_hosts)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight
    }

    pub fn prober(&self) -> &P {
        &self.prober
    }

    /// Scans `range` and returns the active hosts in ascending address order.
    pub async fn scan(&self, range: &str, community: &str) -> Result<ScanResultSet, ScanError> {
        let range = AddressRange::parse(range)?;
        range.ensure_within(self.max_hosts)?;

        let started = Instant::now();
        let outcomes = self.probe_all(range.hosts(), community).await?;
        let probed = outcomes.len();
        let results = ScanResultSet::from_ordered(outcomes);

        info!(
            "Scanned {} ({probed} hosts): {} active in {:.2}s",
            range.input(),
            results.len(),
            started.elapsed().as_secs_f64()
        );

        Ok(results)
    }

    /// Probes every address and returns one outcome per address, in input order.
    pub async fn probe_all<I>(&self, addrs: I, community: &str) -> Result<Vec<ProbeOutcome>, ScanError>
    where
        I: IntoIterator<Item = IpAddr>,
    {
        let semaphore = Arc::new(Semaphore::new(self.max_in_flight));
        let community: Arc<str> = Arc::from(community);
        let mut handles: Vec<(IpAddr, JoinHandle<ProbeOutcome>)> = Vec::new();

        for addr in addrs {
            // Waiting here keeps the number of spawned probes at the cap.
            let permit = Arc::clone(&semaphore)
                .acquire_owned()
                .await
                .map_err(|e| ScanError::Dispatch(e.to_string()))?;

            let prober = Arc::clone(&self.prober);
            let community = Arc::clone(&community);

            let handle = tokio::spawn(async move {
                let outcome = prober.probe_host(addr, &community).await;
                drop(permit);
                outcome
            });
            handles.push((addr, handle));
        }

        let mut outcomes = Vec::with_capacity(handles.len());
        for (addr, handle) in handles {
            match handle.await {
                Ok(outcome) => outcomes.push(outcome),
                Err(e) => {
                    warn!("Probe task for {addr} failed: {e}");
                    outcomes.push(ProbeOutcome::Silent { address: addr });
                }
            }
        }

        Ok(outcomes)
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
