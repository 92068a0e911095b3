//! # Scan Request
//!
//! A request payload is `<CIDR>` or `<CIDR>;<community>`.

pub const FIELD_DELIMITER: char = ';';

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanRequest {
    /// Range text, not yet validated.
    pub range: String,
    pub community: String,
}

impl ScanRequest {
    /// Splits a decoded payload into range and community.
    ///
    /// Anything after a second delimiter is ignored. A missing or empty
    /// community falls back to `default_community`.
    pub fn parse(payload: &str, default_community: &str) -> Self {
        let mut fields = payload.trim().split(FIELD_DELIMITER);
        let range = fields.next().unwrap_or_default().trim().to_string();
        let community = match fields.next().map(str::trim) {
            Some(community) if !community.is_empty() => community.to_string(),
            _ => default_community.to_string(),
        };

        Self { range, community }
    }
}
