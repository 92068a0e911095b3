use std::net::{IpAddr, Ipv4Addr};
use std::sync::atomic::Ordering;

use hostsweep_core::prober::HostProber;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;

use crate::utils::{FakeAgents, FakePing, SYS_DESCR, JitteryProber, request, spawn_server};

fn v4(a: u8, b: u8, c: u8, d: u8) -> IpAddr {
    IpAddr::V4(Ipv4Addr::new(a, b, c, d))
}

/// Nothing answers in 192.168.1.0/30, so only the placeholder comes back.
#[tokio::test]
async fn silent_range_yields_placeholder() {
    let agents = FakeAgents::new();
    let communities = agents.communities.clone();
    let server = spawn_server(HostProber::new(agents, FakePing::answering(vec![]))).await;

    let answer = request(server, "192.168.1.0/30").await;

    assert_eq!(answer, "No active devices found in the specified range.\n");
    assert_eq!(*communities.lock().unwrap(), vec!["public", "public"]);
}

/// The agent only knows sysDescr, so the second identifier is reported.
#[tokio::test]
async fn second_identifier_answers() {
    let target = v4(10, 0, 0, 5);
    let agents = FakeAgents::new().with_agent(
        target,
        vec![Err("noSuchObject".to_string()), Ok("Linux edge-01 6.1.0".to_string())],
    );
    let server = spawn_server(HostProber::new(agents, FakePing::answering(vec![]))).await;

    let answer = request(server, "10.0.0.5/32;public").await;

    assert_eq!(answer, format!("10.0.0.5 (INFO - {SYS_DESCR}): Linux edge-01 6.1.0\n"));
}

#[tokio::test]
async fn information_wins_over_ping() {
    let agents = FakeAgents::new().with_agent(v4(10, 0, 0, 2), vec![Ok("nas".to_string())]);
    let ping = FakePing::answering(vec![v4(10, 0, 0, 1), v4(10, 0, 0, 2)]);
    let pings = ping.calls.clone();
    let server = spawn_server(HostProber::new(agents, ping)).await;

    let answer = request(server, "10.0.0.0/29;community").await;

    assert_eq!(
        answer,
        "10.0.0.1 (LIVE)\n10.0.0.2 (INFO - 1.3.6.1.2.1.1.5.0): nas\n"
    );
    // every host but the one with an agent fell back to ping
    assert_eq!(pings.load(Ordering::SeqCst), 5);
}

#[tokio::test]
async fn malformed_range_is_reported_without_probing() {
    let agents = FakeAgents::new();
    let lookups = agents.calls.clone();
    let ping = FakePing::answering(vec![]);
    let pings = ping.calls.clone();
    let server = spawn_server(HostProber::new(agents, ping)).await;

    for bad in ["999.0.0.0/24", "not-a-cidr"] {
        let answer = request(server, bad).await;
        assert!(
            answer.starts_with(&format!("Error: CIDR '{bad}' is invalid")),
            "unexpected answer: {answer}"
        );
    }

    assert_eq!(lookups.load(Ordering::SeqCst), 0);
    assert_eq!(pings.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn oversized_range_is_an_error() {
    let server = spawn_server(JitteryProber::new(0)).await;
    let answer = request(server, "10.0.0.0/8").await;
    assert!(answer.starts_with("Error: CIDR '10.0.0.0/8' covers 16777214 hosts"));
}

#[tokio::test]
async fn connections_are_isolated() {
    let server = spawn_server(JitteryProber::new(5)).await;

    // a client that leaves without a request
    let mut quitter = TcpStream::connect(server).await.unwrap();
    quitter.shutdown().await.unwrap();
    drop(quitter);

    let (good, bad, other) = tokio::join!(
        request(server, "172.16.0.0/29"),
        request(server, "172.16.0.0/99"),
        request(server, "172.16.1.1"),
    );

    assert_eq!(good.lines().count(), 6);
    assert!(good.lines().all(|line| line.ends_with("(LIVE)")));
    assert!(bad.starts_with("Error: "));
    assert_eq!(other, "172.16.1.1 (LIVE)\n");
}
