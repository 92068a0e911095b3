//! A small client for a running server.
//!
//! Sends `<range>[;<community>]`, closes its write side and prints whatever
//! comes back before the server hangs up.

use anyhow::Context;
use hostsweep_common::network::request::FIELD_DELIMITER;
use hostsweep_common::response::{ERROR_PREFIX, NO_ACTIVE_DEVICES};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::debug;

use crate::commands::QueryArgs;
use crate::terminal::print;

#[derive(Debug, PartialEq, Eq)]
enum Answer<'a> {
    Error(&'a str),
    NoDevices,
    Devices(Vec<&'a str>),
}

pub async fn query(args: QueryArgs) -> anyhow::Result<()> {
    let payload = request_payload(&args.target, args.community.as_deref());

    let mut stream = TcpStream::connect(args.server)
        .await
        .with_context(|| format!("could not reach a server at {}", args.server))?;
    debug!("Connected to {}", args.server);

    stream.write_all(payload.as_bytes()).await?;
    stream.shutdown().await?;

    let mut raw = Vec::new();
    stream
        .read_to_end(&mut raw)
        .await
        .context("connection dropped while reading the answer")?;
    let text = String::from_utf8_lossy(&raw);

    match classify(&text) {
        Answer::Error(line) => {
            print::header("server error");
            print::error_line(line);
        }
        Answer::NoDevices => print::no_results(),
        Answer::Devices(lines) => {
            print::header(&format!("{} active devices", lines.len()));
            for line in lines {
                print::print_status(line);
            }
        }
    }

    Ok(())
}

fn request_payload(target: &str, community: Option<&str>) -> String {
    match community {
        Some(community) => format!("{}{FIELD_DELIMITER}{community}", target.trim()),
        None => target.trim().to_string(),
    }
}

fn classify(text: &str) -> Answer<'_> {
    let text = text.trim();
    if text.starts_with(ERROR_PREFIX) {
        return Answer::Error(text);
    }
    if text.is_empty() || text == NO_ACTIVE_DEVICES {
        return Answer::NoDevices;
    }
    Answer::Devices(text.lines().collect())
}
