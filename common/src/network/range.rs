//! # Address Ranges
//!
//! Parses CIDR text into an [`AddressRange`] and enumerates its usable hosts.
//!
//! Host bits set in the base address are accepted (`10.0.0.7/24` is the
//! `10.0.0.0/24` network) and a bare address is a single-host range.
//! Network and broadcast addresses are skipped, except for `/31` and `/32`
//! (`/127` and `/128` for IPv6) where every address is a host. IPv6 has no
//! broadcast, so only the subnet-router anycast address is skipped there.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

use pnet::ipnetwork::IpNetwork;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RangeError {
    #[error("CIDR '{input}' is invalid ({reason})")]
    Malformed { input: String, reason: String },
    #[error("CIDR '{input}' covers {hosts} hosts, above the limit of {limit}")]
    TooLarge {
        input: String,
        hosts: u128,
        limit: usize,
    },
}

impl RangeError {
    /// The text the client sent.
    pub fn input(&self) -> &str {
        match self {
            RangeError::Malformed { input, .. } | RangeError::TooLarge { input, .. } => input,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressRange {
    input: String,
    network: IpNetwork,
}

impl AddressRange {
    pub fn parse(input: &str) -> Result<Self, RangeError> {
        let malformed = |reason: String| RangeError::Malformed {
            input: input.to_string(),
            reason,
        };

        if input.is_empty() {
            return Err(malformed("empty range".to_string()));
        }

        let network = IpNetwork::from_str(input).map_err(|e| malformed(e.to_string()))?;

        Ok(Self {
            input: input.to_string(),
            network,
        })
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    /// The base address with the host bits cleared.
    pub fn network_addr(&self) -> IpAddr {
        self.network.network()
    }

    pub fn host_count(&self) -> u128 {
        let (first, last) = self.host_bounds();
        last - first + 1
    }

    /// Fails with [`RangeError::TooLarge`] when the range expands past `limit`.
    pub fn ensure_within(&self, limit: usize) -> Result<(), RangeError> {
        let hosts = self.host_count();
        if hosts > limit as u128 {
            return Err(RangeError::TooLarge {
                input: self.input.clone(),
                hosts,
                limit,
            });
        }
        Ok(())
    }

    /// Usable hosts in ascending numeric order.
    pub fn hosts(&self) -> impl Iterator<Item = IpAddr> + use<> {
        let (first, last) = self.host_bounds();
        let is_v6 = self.network.is_ipv6();
        (first..=last).map(move |raw| to_addr(raw, is_v6))
    }

    /// Inclusive numeric bounds of the usable hosts. Never empty.
    fn host_bounds(&self) -> (u128, u128) {
        match self.network {
            IpNetwork::V4(net) => {
                let prefix = u32::from(net.prefix());
                let base = u32::from(net.network());
                let host_mask = u32::MAX.checked_shr(prefix).unwrap_or(0);
                let last = base | host_mask;
                match prefix {
                    31 | 32 => (u128::from(base), u128::from(last)),
                    _ => (u128::from(base) + 1, u128::from(last) - 1),
                }
            }
            IpNetwork::V6(net) => {
                let prefix = u32::from(net.prefix());
                let base = u128::from(net.network());
                let host_mask = u128::MAX.checked_shr(prefix).unwrap_or(0);
                let last = base | host_mask;
                match prefix {
                    127 | 128 => (base, last),
                    _ => (base + 1, last),
                }
            }
        }
    }
}

fn to_addr(raw: u128, is_v6: bool) -> IpAddr {
    if is_v6 {
        IpAddr::V6(Ipv6Addr::from(raw))
    } else {
        // Bounds of a v4 range always fit in 32 bits.
        IpAddr::V4(Ipv4Addr::from(raw as u32))
    }
}
