//! SNMPv2c queries against a list of object identifiers.
//!
//! [`get_many`] asks for every identifier in order over one session and
//! reports an answer or a failure for each, aligned with the input list. The
//! whole exchange shares a single time window; identifiers still pending when
//! it closes are reported as [`SnmpError::Timeout`].

use std::net::SocketAddr;
use std::time::Duration;

use snmp2::{AsyncSession, Oid, Value};
use thiserror::Error;
use tokio::time::timeout;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SnmpError {
    #[error("no answer within the query window")]
    Timeout,
    #[error("could not open a session: {0}")]
    Session(String),
    #[error("request failed: {0}")]
    Request(String),
    #[error("the agent holds no value for this identifier")]
    NoSuchObject,
    #[error("'{0}' is not a valid object identifier")]
    BadOid(String),
}

/// Queries `oids` in order on `target`. The result has one entry per identifier.
pub async fn get_many(
    target: SocketAddr,
    community: &str,
    oids: &[String],
    window: Duration,
) -> Vec<Result<String, SnmpError>> {
    let mut answers: Vec<Result<String, SnmpError>> =
        oids.iter().map(|_| Err(SnmpError::Timeout)).collect();

    if timeout(window, query_in_order(target, community, oids, &mut answers))
        .await
        .is_err()
    {
        debug!("{target}: SNMP window of {}ms closed", window.as_millis());
    }

    answers
}

async fn query_in_order(
    target: SocketAddr,
    community: &str,
    oids: &[String],
    answers: &mut [Result<String, SnmpError>],
) {
    let request_id: i32 = rand::random_range(1..i32::MAX);
    let mut session = match AsyncSession::new_v2c(target, community.as_bytes(), request_id).await {
        Ok(session) => session,
        Err(e) => {
            let reason = e.to_string();
            for answer in answers.iter_mut() {
                *answer = Err(SnmpError::Session(reason.clone()));
            }
            return;
        }
    };

    for (oid, answer) in oids.iter().zip(answers.iter_mut()) {
        *answer = get_one(&mut session, oid).await;
    }
}

async fn get_one(session: &mut AsyncSession, oid: &str) -> Result<String, SnmpError> {
    let arcs: Vec<u64> = parse_oid(oid)?;
    let name = Oid::from(&arcs[..]).map_err(|_| SnmpError::BadOid(oid.to_string()))?;

    let mut response = session
        .get(&name)
        .await
        .map_err(|e| SnmpError::Request(format!("{e:?}")))?;

    match response.varbinds.next() {
        Some((_, value)) => render_value(&value).ok_or(SnmpError::NoSuchObject),
        None => Err(SnmpError::NoSuchObject),
    }
}

/// Parses dotted notation (`1.3.6.1.2.1.1.5.0`) into its arcs.
pub fn parse_oid(oid: &str) -> Result<Vec<u64>, SnmpError> {
    let arcs = oid
        .trim()
        .split('.')
        .map(str::parse::<u64>)
        .collect::<Result<Vec<u64>, _>>()
        .map_err(|_| SnmpError::BadOid(oid.to_string()))?;

    if arcs.len() < 2 {
        return Err(SnmpError::BadOid(oid.to_string()));
    }
    Ok(arcs)
}

/// Text form of a returned value, `None` for SNMP exception values.
///
/// Octet strings are decoded as UTF-8 with replacement characters for
/// invalid sequences.
pub fn render_value(value: &Value<'_>) -> Option<String> {
    match value {
        Value::NoSuchObject | Value::NoSuchInstance | Value::EndOfMibView | Value::Null => None,
        Value::OctetString(bytes) => Some(String::from_utf8_lossy(bytes).into_owned()),
        Value::Integer(n) => Some(n.to_string()),
        Value::Counter32(n) | Value::Unsigned32(n) | Value::Timeticks(n) => Some(n.to_string()),
        Value::Counter64(n) => Some(n.to_string()),
        Value::IpAddress(octets) => Some(std::net::Ipv4Addr::from(*octets).to_string()),
        other => Some(format!("{other:?}")),
    }
}
