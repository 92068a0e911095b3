use std::net::IpAddr;

use async_trait::async_trait;
use hostsweep_common::config::Config;
use hostsweep_common::network::outcome::ProbeOutcome;
use tracing::debug;

use crate::probe::{InformationProbe, LivenessProbe, SnmpProbe, SystemPing};

/// Decides the outcome for a single address.
#[async_trait]
pub trait Prober: Send + Sync + 'static {
    async fn probe_host(&self, addr: IpAddr, community: &str) -> ProbeOutcome;
}

/// Information first, liveness as the fallback.
///
/// An information answer carries more for the caller than a bare echo reply,
/// so the liveness probe only runs once the information probe came back empty.
pub struct HostProber<I, L> {
    information: I,
    liveness: L,
}

impl<I, L> HostProber<I, L>
where
    I: InformationProbe,
    L: LivenessProbe,
{
    pub fn new(information: I, liveness: L) -> Self {
        Self {
            information,
            liveness,
        }
    }
}

impl HostProber<SnmpProbe, SystemPing> {
    pub fn from_config(cfg: &Config) -> Self {
        Self::new(SnmpProbe::from_config(cfg), SystemPing::from_config(cfg))
    }
}

#[async_trait]
impl<I, L> Prober for HostProber<I, L>
where
    I: InformationProbe + 'static,
    L: LivenessProbe + 'static,
{
    async fn probe_host(&self, addr: IpAddr, community: &str) -> ProbeOutcome {
        if let Some((identifier, value)) = self.information.probe_information(addr, community).await {
            debug!("{addr} answered {identifier}");
            return ProbeOutcome::InformationFound {
                address: addr,
                identifier,
                value,
            };
        }

        if self.liveness.probe_liveness(addr).await {
            debug!("{addr} answered ping");
            return ProbeOutcome::AliveByLiveness { address: addr };
        }

        ProbeOutcome::Silent { address: addr }
    }
}
