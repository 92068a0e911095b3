//! # Network Discovery Service
//!
//! Turns one raw request payload into the [`Response`] sent back to the
//! client: decode, split into range and community, scan, classify failures.

use hostsweep_common::config::Config;
use hostsweep_common::network::request::ScanRequest;
use hostsweep_common::response::Response;
use tracing::{debug, info, warn};

use crate::prober::Prober;
use crate::scanner::{RangeScanner, ScanError};

pub struct DiscoveryService<P> {
    scanner: RangeScanner<P>,
    default_community: String,
}

impl<P: Prober> DiscoveryService<P> {
    pub fn new(scanner: RangeScanner<P>, default_community: impl Into<String>) -> Self {
        Self {
            scanner,
            default_community: default_community.into(),
        }
    }

    pub fn from_config(prober: P, cfg: &Config) -> Self {
        Self::new(RangeScanner::from_config(prober, cfg), cfg.default_community.clone())
    }

    /// Handles a single request payload.
    ///
    /// An invalid range maps to [`Response::InvalidRange`]; every other failure
    /// maps to [`Response::Fault`]. Per-host probe faults never show up here.
    pub async fn respond(&self, payload: &[u8]) -> Response {
        let text = match std::str::from_utf8(payload) {
            Ok(text) => text,
            Err(e) => {
                warn!("Rejecting payload that is not UTF-8: {e}");
                return Response::Fault(format!("request is not valid UTF-8 ({e})"));
            }
        };

        let request = ScanRequest::parse(text, &self.default_community);
        info!("Received range '{}'", request.range);
        debug!("Using community '{}'", request.community);

        match self.scanner.scan(&request.range, &request.community).await {
            Ok(results) => Response::Devices(results),
            Err(ScanError::InvalidRange(e)) => {
                info!("{e}");
                Response::InvalidRange(e)
            }
            Err(e) => {
                warn!("Scan of '{}' failed: {e}", request.range);
                Response::Fault(e.to_string())
            }
        }
    }
}
