use std::fmt;
use std::net::IpAddr;

/// What a host probe learned about one address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// An information query answered for `identifier`.
    InformationFound {
        address: IpAddr,
        identifier: String,
        value: String,
    },
    /// Only the reachability check answered.
    AliveByLiveness { address: IpAddr },
    /// Neither probe answered.
    Silent { address: IpAddr },
}

impl ProbeOutcome {
    pub fn address(&self) -> IpAddr {
        match self {
            ProbeOutcome::InformationFound { address, .. }
            | ProbeOutcome::AliveByLiveness { address }
            | ProbeOutcome::Silent { address } => *address,
        }
    }

    pub fn is_silent(&self) -> bool {
        matches!(self, ProbeOutcome::Silent { .. })
    }
}

impl fmt::Display for ProbeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeOutcome::InformationFound {
                address,
                identifier,
                value,
            } => write!(f, "{address} (INFO - {identifier}): {value}"),
            ProbeOutcome::AliveByLiveness { address } => write!(f, "{address} (LIVE)"),
            ProbeOutcome::Silent { address } => write!(f, "{address} (SILENT)"),
        }
    }
}

/// Active hosts of one scan, in the address order of the scanned range.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanResultSet {
    outcomes: Vec<ProbeOutcome>,
}

impl ScanResultSet {
    /// Keeps the given order and drops every [`ProbeOutcome::Silent`] entry.
    pub fn from_ordered<I>(outcomes: I) -> Self
    where
        I: IntoIterator<Item = ProbeOutcome>,
    {
        Self {
            outcomes: outcomes.into_iter().filter(|o| !o.is_silent()).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ProbeOutcome> {
        self.outcomes.iter()
    }
}
