//! # Response Rendering
//!
//! Turns the result of handling one request into the text written back to
//! the client. Every response ends with a newline and the server closes the
//! connection right after it.

use crate::network::outcome::ScanResultSet;
use crate::network::range::RangeError;

pub const NO_ACTIVE_DEVICES: &str = "No active devices found in the specified range.";
pub const ERROR_PREFIX: &str = "Error: ";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    Devices(ScanResultSet),
    InvalidRange(RangeError),
    /// Anything else that went wrong while handling the request.
    Fault(String),
}

impl Response {
    pub fn is_error(&self) -> bool {
        !matches!(self, Response::Devices(_))
    }

    pub fn render(&self) -> String {
        match self {
            Response::Devices(set) if set.is_empty() => format!("{NO_ACTIVE_DEVICES}\n"),
            Response::Devices(set) => {
                let mut out = set
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<String>>()
                    .join("\n");
                out.push('\n');
                out
            }
            Response::InvalidRange(err) => format!("{ERROR_PREFIX}{err}.\n"),
            Response::Fault(detail) => {
                format!("{ERROR_PREFIX}the server failed to process the request: {detail}\n")
            }
        }
    }
}
