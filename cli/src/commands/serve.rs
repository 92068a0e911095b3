use anyhow::Context;
use colored::*;
use hostsweep_common::config::Config;
use hostsweep_core::discovery::DiscoveryService;
use hostsweep_core::prober::HostProber;
use hostsweep_core::server::RequestServer;
use tracing::{info, warn};

use crate::terminal::print;

pub async fn serve(cfg: Config) -> anyhow::Result<()> {
    cfg.validate().context("invalid configuration")?;

    let service = DiscoveryService::from_config(HostProber::from_config(&cfg), &cfg);
    let server = RequestServer::bind(&cfg, service)
        .await
        .with_context(|| format!("could not listen on {}", cfg.listen))?;

    print_settings(&cfg, server.local_addr()?);

    server.run_until(shutdown_signal()).await?;
    info!("Server shut down");
    Ok(())
}

fn print_settings(cfg: &Config, bound: std::net::SocketAddr) {
    let rows: Vec<(&str, ColoredString)> = vec![
        ("Listening", bound.to_string().green().bold()),
        ("Community", cfg.default_community.normal()),
        ("OIDs", cfg.oids.join(", ").normal()),
        ("Parallel", cfg.max_in_flight.to_string().yellow()),
        ("Host cap", cfg.max_hosts.to_string().normal()),
        (
            "Timeouts",
            format!(
                "snmp {}ms, ping {}ms",
                cfg.snmp_timeout.as_millis(),
                cfg.ping_timeout.as_millis()
            )
            .normal(),
        ),
    ];

    for (key, value) in rows {
        print::aligned_line(key, value, 9);
    }
    print::fat_separator();
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Could not listen for Ctrl-C: {e}");
        std::future::pending::<()>().await;
    }
    info!("Interrupted, stopping");
}
