//! Low-level probe primitives.
//!
//! Each primitive talks to exactly one address, owns its socket or child
//! process, and releases it on every exit path. Neither returns an error for
//! network-level failures: [`ping::ping`] answers `false` and
//! [`snmp::get_many`] reports a failure per identifier.

pub mod ping;
pub mod snmp;
