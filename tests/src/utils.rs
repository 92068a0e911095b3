//! Fake probes and a throwaway server for the integration tests.

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use hostsweep_common::config::Config;
use hostsweep_common::network::outcome::ProbeOutcome;
use hostsweep_core::discovery::DiscoveryService;
use hostsweep_core::probe::{InformationProbe, LivenessProbe, first_answer};
use hostsweep_core::prober::Prober;
use hostsweep_core::server::RequestServer;
use rand::Rng;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

pub const SYS_NAME: &str = "1.3.6.1.2.1.1.5.0";
pub const SYS_DESCR: &str = "1.3.6.1.2.1.1.1.0";

/// Answers per address, aligned with `identifiers`. Unknown addresses time out.
pub struct FakeAgents {
    pub identifiers: Vec<String>,
    pub answers: HashMap<IpAddr, Vec<Result<String, String>>>,
    pub calls: Arc<AtomicUsize>,
    pub communities: Arc<Mutex<Vec<String>>>,
}

impl FakeAgents {
    pub fn new() -> Self {
        Self {
            identifiers: vec![SYS_NAME.to_string(), SYS_DESCR.to_string()],
            answers: HashMap::new(),
            calls: Arc::new(AtomicUsize::new(0)),
            communities: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_agent(mut self, addr: IpAddr, answers: Vec<Result<String, String>>) -> Self {
        self.answers.insert(addr, answers);
        self
    }
}

#[async_trait]
impl InformationProbe for FakeAgents {
    async fn probe_information(&self, addr: IpAddr, community: &str) -> Option<(String, String)> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut seen) = self.communities.lock() {
            seen.push(community.to_string());
        }
        let answers = self.answers.get(&addr)?.clone();
        first_answer(&self.identifiers, answers)
    }
}

/// Replies to ping for the listed addresses only.
pub struct FakePing {
    pub alive: Vec<IpAddr>,
    pub calls: Arc<AtomicUsize>,
}

impl FakePing {
    pub fn answering(alive: Vec<IpAddr>) -> Self {
        Self {
            alive,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }
}

#[async_trait]
impl LivenessProbe for FakePing {
    async fn probe_liveness(&self, addr: IpAddr) -> bool {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.alive.contains(&addr)
    }
}

/// Every host is alive after a random delay; tracks how many probes overlap.
#[derive(Default)]
pub struct JitteryProber {
    pub max_delay_ms: u64,
    pub running: AtomicUsize,
    pub peak: AtomicUsize,
    pub calls: AtomicUsize,
}

impl JitteryProber {
    pub fn new(max_delay_ms: u64) -> Self {
        Self {
            max_delay_ms,
            ..Self::default()
        }
    }
}

#[async_trait]
impl Prober for JitteryProber {
    async fn probe_host(&self, addr: IpAddr, _community: &str) -> ProbeOutcome {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.running.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);

        let delay = { rand::rng().random_range(0..=self.max_delay_ms) };
        tokio::time::sleep(Duration::from_millis(delay)).await;

        self.running.fetch_sub(1, Ordering::SeqCst);
        ProbeOutcome::AliveByLiveness { address: addr }
    }
}

/// Starts a server on an ephemeral loopback port and returns its address.
pub async fn spawn_server<P: Prober>(prober: P) -> SocketAddr {
    let cfg = Config {
        listen: "127.0.0.1:0".parse().unwrap(),
        read_timeout: Duration::from_secs(2),
        ..Config::default()
    };
    let service = DiscoveryService::from_config(prober, &cfg);
    let server = RequestServer::bind(&cfg, service).await.unwrap();
    let addr = server.local_addr().unwrap();
    tokio::spawn(server.run());
    addr
}

/// Sends one payload and reads until the server hangs up.
pub async fn request(server: SocketAddr, payload: &str) -> String {
    let mut stream = TcpStream::connect(server).await.unwrap();
    stream.write_all(payload.as_bytes()).await.unwrap();
    stream.shutdown().await.unwrap();

    let mut answer = String::new();
    stream.read_to_string(&mut answer).await.unwrap();
    answer
}
