#![cfg(test)]
//! Daemon and manager lifecycle through the public API only.

use std::collections::HashSet;
use std::net::IpAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use lanwatch_common::error::ManagerError;
use lanwatch_common::event::{ScanEvent, ServerStatus};
use lanwatch_common::network::NetworkPrefix;
use lanwatch_common::protocol::Protocol;
use lanwatch_core::probe::Prober;
use lanwatch_core::resolver::HostnameResolver;
use lanwatch_core::{DaemonManager, ScanDaemonBuilder};

fn test_prefix() -> NetworkPrefix {
    NetworkPrefix::new([10, 0, 0])
}

/// Probe stand-in answering `true` for a fixed set of addresses.
struct FakeSubnet {
    up: HashSet<IpAddr>,
    probes: Arc<Mutex<usize>>,
}

#[async_trait]
impl Prober for FakeSubnet {
    async fn probe(&self, addr: IpAddr) -> bool {
        *self.probes.lock().unwrap() += 1;
        self.up.contains(&addr)
    }
}

struct FixedResolver(&'static str);

#[async_trait]
impl HostnameResolver for FixedResolver {
    async fn reverse_lookup(&self, _addr: IpAddr) -> String {
        self.0.to_string()
    }
}

async fn wait_until(mut condition: impl FnMut() -> bool) {
    for _ in 0..200 {
        if condition() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("condition not reached within 2 s");
}

#[tokio::test]
async fn a_daemon_reports_appearing_servers_exactly_once() {
    let probes = Arc::new(Mutex::new(0));
    let up: HashSet<IpAddr> = [test_prefix().host(5), test_prefix().host(77)]
        .into_iter()
        .map(IpAddr::V4)
        .collect();

    let daemon = ScanDaemonBuilder::new(Protocol::Http)
        .network_prefix(test_prefix())
        .idle_interval_ms(1)
        .prober(Box::new(FakeSubnet {
            up: up.clone(),
            probes: Arc::clone(&probes),
        }))
        .resolver(Box::new(FixedResolver("web.lan")))
        .build()
        .unwrap();

    let events: Arc<Mutex<Vec<ScanEvent>>> = Arc::new(Mutex::new(Vec::new()));
    let events_ref = Arc::clone(&events);
    daemon.on_server_updated(Arc::new(move |event| {
        events_ref.lock().unwrap().push(event.clone());
    }));

    assert!(daemon.start());
    // Wait for more than two full passes over the subnet.
    let probes_ref = Arc::clone(&probes);
    wait_until(move || *probes_ref.lock().unwrap() >= 600).await;
    assert!(daemon.stop());

    let events = events.lock().unwrap();
    assert_eq!(events.len(), 2, "steady hosts must notify exactly once");
    for event in events.iter() {
        assert!(up.contains(&event.addr));
        assert_eq!(event.hostname, "web.lan");
        assert_eq!(event.protocol, Protocol::Http);
        assert_eq!(event.status, ServerStatus::Online);
    }
}

#[tokio::test]
async fn the_manager_runs_daemons_it_was_handed() {
    let daemon = ScanDaemonBuilder::new(Protocol::Ftp)
        .network_prefix(test_prefix())
        .idle_interval_ms(1)
        .prober(Box::new(FakeSubnet {
            up: HashSet::new(),
            probes: Arc::new(Mutex::new(0)),
        }))
        .resolver(Box::new(FixedResolver("")))
        .build()
        .unwrap();
    let id = daemon.id();

    let mut manager = DaemonManager::new();
    assert!(manager.add(daemon));

    let snapshots = manager.find_all_daemons();
    assert_eq!(snapshots.len(), 1);
    assert_eq!(snapshots[0].id, id);
    assert!(snapshots[0].running);

    assert_eq!(manager.stop(id), Ok(true));
    assert_eq!(manager.resume(id), Ok(true));
    assert_eq!(manager.remove(id), Ok(true));
    assert!(manager.is_empty());
}

#[tokio::test]
async fn the_manager_rejects_unknown_ids() {
    let mut manager = DaemonManager::new();

    assert_eq!(manager.stop(99), Err(ManagerError::NotFound(99)));
    assert_eq!(manager.remove(99), Err(ManagerError::NotFound(99)));
}
