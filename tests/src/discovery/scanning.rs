use std::collections::HashSet;
use std::net::IpAddr;
use std::sync::atomic::Ordering;

use hostsweep_common::network::outcome::ProbeOutcome;
use hostsweep_common::network::range::AddressRange;
use hostsweep_core::scanner::RangeScanner;

use crate::utils::JitteryProber;

#[tokio::test]
async fn covers_exactly_the_usable_hosts() {
    for cidr in ["10.9.8.0/26", "10.9.8.7/32", "10.9.8.6/31", "fd00::/124"] {
        let scanner = RangeScanner::new(JitteryProber::new(2), 16, 4096);

        let results = scanner.scan(cidr, "public").await.unwrap();

        let expected: Vec<IpAddr> = AddressRange::parse(cidr).unwrap().hosts().collect();
        let found: Vec<IpAddr> = results.iter().map(ProbeOutcome::address).collect();
        let unique: HashSet<IpAddr> = found.iter().copied().collect();

        assert_eq!(found, expected, "{cidr}");
        assert_eq!(unique.len(), found.len(), "{cidr} reported a host twice");
    }
}

#[tokio::test]
async fn order_ignores_completion_timing() {
    let scanner = RangeScanner::new(JitteryProber::new(15), 64, 4096);

    let results = scanner.scan("192.168.7.0/24", "public").await.unwrap();

    let found: Vec<IpAddr> = results.iter().map(ProbeOutcome::address).collect();
    assert_eq!(found.len(), 254);
    assert!(found.windows(2).all(|pair| pair[0] < pair[1]));
}

#[tokio::test]
async fn concurrency_cap_holds_for_a_slash_22() {
    let scanner = RangeScanner::new(JitteryProber::new(3), 32, 4096);

    let results = scanner.scan("10.20.0.0/22", "public").await.unwrap();

    let prober = scanner.prober();
    let peak = prober.peak.load(Ordering::SeqCst);
    assert_eq!(results.len(), 1022);
    assert_eq!(prober.calls.load(Ordering::SeqCst), 1022);
    assert!(peak <= 32, "{peak} probes ran at once");
    assert!(peak > 1, "probes never overlapped");
    assert_eq!(prober.running.load(Ordering::SeqCst), 0);
}
