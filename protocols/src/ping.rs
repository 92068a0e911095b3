use std::net::IpAddr;
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tokio::time::timeout;
use tracing::debug;

const PING_PROGRAM: &str = "ping";

/// Sends one echo request through the system `ping` command.
///
/// `wait` is the reply wait handed to the command and `limit` bounds the whole
/// process. A child still running when `limit` elapses is killed.
pub async fn ping(addr: IpAddr, wait: Duration, limit: Duration) -> bool {
    let mut command = Command::new(PING_PROGRAM);
    command
        .args(ping_args(addr, wait))
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .kill_on_drop(true);

    match timeout(limit, command.status()).await {
        Ok(Ok(status)) => status.success(),
        Ok(Err(e)) => {
            debug!("{addr}: could not run {PING_PROGRAM}: {e}");
            false
        }
        Err(_) => {
            debug!("{addr}: {PING_PROGRAM} exceeded {}ms", limit.as_millis());
            false
        }
    }
}

/// Arguments for a single echo request with the platform's flag syntax.
pub fn ping_args(addr: IpAddr, wait: Duration) -> Vec<String> {
    let mut args: Vec<String> = Vec::with_capacity(5);

    if cfg!(target_os = "windows") {
        args.extend(["-n", "1", "-w"].map(String::from));
        args.push(wait.as_millis().to_string());
    } else if cfg!(target_os = "macos") {
        // -W is milliseconds on macOS
        args.extend(["-c", "1", "-W"].map(String::from));
        args.push(wait.as_millis().to_string());
    } else {
        args.extend(["-c", "1", "-W"].map(String::from));
        args.push(format_seconds(wait));
    }

    args.push(addr.to_string());
    args
}

fn format_seconds(wait: Duration) -> String {
    let secs = wait.as_secs_f64();
    if secs.fract() == 0.0 {
        format!("{}", secs as u64)
    } else {
        format!("{secs:.1}")
    }
}
