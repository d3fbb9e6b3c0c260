//! # Scan Daemon
//!
//! The polling engine: one long-lived task per daemon, cycling the 254
//! host addresses of the local subnet, probing each and diffing the
//! outcome against a liveness cache. Cache transitions are the only
//! thing that leaves the loop, as ONLINE/OFFLINE events.
//!
//! The run flag is the only state shared across execution contexts;
//! everything else (cache, cursor) is touched exclusively by the
//! daemon's own task.

use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::info;

use lanwatch_common::error::BuildError;
use lanwatch_common::event::{ScanEvent, ServerStatus};
use lanwatch_common::network::NetworkPrefix;
use lanwatch_common::protocol::Protocol;
use lanwatch_common::snapshot::DaemonSnapshot;

use crate::listeners::{Listener, ListenerRegistry};
use crate::probe::{self, Prober};
use crate::resolver::{DnsPtrResolver, HostnameResolver};

const FIRST_HOST: u8 = 1;
const LAST_HOST: u8 = 254;

const DEFAULT_TIMEOUT_MS: u64 = 10;
const DEFAULT_IDLE_INTERVAL_MS: u64 = 15_000;

/// Process-wide id source. Ids are unique for the lifetime of the
/// process, assigned once at construction, and do not survive restarts.
static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Scan cursor and liveness cache.
///
/// Locked only from the daemon's own task, and never across an await;
/// the mutex exists so the owning handle stays shareable.
struct ScanState {
    cursor: u8,
    cache: HashMap<IpAddr, String>,
}

struct DaemonInner {
    id: u64,
    protocol: Protocol,
    prefix: NetworkPrefix,
    port: u16,
    timeout: Duration,
    idle_interval: Duration,
    running: AtomicBool,
    prober: Box<dyn Prober>,
    resolver: Box<dyn HostnameResolver>,
    listeners: ListenerRegistry,
    state: Mutex<ScanState>,
}

impl DaemonInner {
    /// Advances the cursor and reports whether a full cycle completed.
    ///
    /// The walk is a pure round-robin over hosts 1..=254: no skipping,
    /// no randomization.
    fn next_host(&self) -> (IpAddr, bool) {
        let mut state = self.state.lock().unwrap();
        let host: u8 = state.cursor;
        let wrapped: bool = host == LAST_HOST;
        state.cursor = if wrapped { FIRST_HOST } else { host + 1 };
        (IpAddr::V4(self.prefix.host(host)), wrapped)
    }

    /// Registers a responding address, notifying listeners when it is
    /// new to the cache or its hostname changed.
    async fn mark_online(&self, addr: IpAddr) {
        let hostname: String = self.resolver.reverse_lookup(addr).await;

        let changed: bool = {
            let mut state = self.state.lock().unwrap();
            match state.cache.get(&addr) {
                Some(cached) if *cached == hostname => false,
                _ => {
                    state.cache.insert(addr, hostname.clone());
                    true
                }
            }
        };

        if changed {
            info!(
                "{} response from {addr} ({hostname}) on port {} (max timeout: {} ms)",
                self.protocol,
                self.port,
                self.timeout.as_millis()
            );
            self.listeners
                .notify_server_updated(&self.event(addr, hostname, ServerStatus::Online));
        }
    }

    /// Drops a silent address from the cache, notifying listeners with
    /// the hostname that was cached for it.
    fn mark_offline(&self, addr: IpAddr) {
        let cached: Option<String> = self.state.lock().unwrap().cache.remove(&addr);

        if let Some(hostname) = cached {
            info!(
                "no response from {addr} ({hostname}) on port {}, removed from cache",
                self.port
            );
            self.listeners
                .notify_server_removed(&self.event(addr, hostname, ServerStatus::Offline));
        }
    }

    fn event(&self, addr: IpAddr, hostname: String, status: ServerStatus) -> ScanEvent {
        ScanEvent::new(addr, hostname, self.protocol, self.port, status)
    }
}

/// Polling loop body. Runs until the flag is cleared or the task is
/// aborted; the flag is consulted once per iteration, so an in-flight
/// probe always finishes under a soft stop.
async fn scan_loop(inner: Arc<DaemonInner>) {
    while inner.running.load(Ordering::SeqCst) {
        let (addr, cycle_done) = inner.next_host();

        if inner.prober.probe(addr).await {
            inner.mark_online(addr).await;
        } else {
            inner.mark_offline(addr);
        }

        // Probes within a cycle run back to back; the idle interval
        // applies once per completed pass over the subnet.
        if cycle_done {
            tokio::time::sleep(inner.idle_interval).await;
        }
    }
}

/// A long-lived subnet watcher for one protocol.
///
/// Starts `Stopped`, is reusable after a stop, and keeps its identity
/// and liveness cache for its whole lifetime.
pub struct ScanDaemon {
    inner: Arc<DaemonInner>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl ScanDaemon {
    pub fn builder(protocol: Protocol) -> ScanDaemonBuilder {
        ScanDaemonBuilder::new(protocol)
    }

    /// The process-unique daemon id.
    pub fn id(&self) -> u64 {
        self.inner.id
    }

    pub fn protocol(&self) -> Protocol {
        self.inner.protocol
    }

    pub fn is_running(&self) -> bool {
        self.inner.running.load(Ordering::SeqCst)
    }

    pub fn is_stopped(&self) -> bool {
        !self.is_running()
    }

    /// Starts the polling loop on the current tokio runtime.
    ///
    /// Returns `false` without spawning anything when the daemon is
    /// already running.
    pub fn start(&self) -> bool {
        if self.inner.running.swap(true, Ordering::SeqCst) {
            return false;
        }

        let inner: Arc<DaemonInner> = Arc::clone(&self.inner);
        *self.worker.lock().unwrap() = Some(tokio::spawn(scan_loop(inner)));
        true
    }

    /// Soft stop: clears the run flag and lets the in-flight probe
    /// finish before the loop exits. `false` when already stopped.
    pub fn stop(&self) -> bool {
        self.inner.running.swap(false, Ordering::SeqCst)
    }

    /// Hard stop: clears the run flag and aborts the polling task,
    /// cancelling a probe blocked on the network. `false` when already
    /// stopped.
    pub fn interrupt(&self) -> bool {
        if !self.inner.running.swap(false, Ordering::SeqCst) {
            return false;
        }

        if let Some(worker) = self.worker.lock().unwrap().take() {
            worker.abort();
        }
        true
    }

    /// Subscribes to server appearance/hostname-change events.
    /// Registration is append-only.
    pub fn on_server_updated(&self, listener: Listener) {
        self.inner.listeners.add_server_updated(listener);
    }

    /// Subscribes to server disappearance events.
    pub fn on_server_removed(&self, listener: Listener) {
        self.inner.listeners.add_server_removed(listener);
    }

    /// Materializes a point-in-time configuration snapshot.
    pub fn snapshot(&self) -> DaemonSnapshot {
        DaemonSnapshot {
            id: self.inner.id,
            protocol: self.inner.protocol,
            network_prefix: self.inner.prefix.to_string(),
            port: self.inner.port,
            timeout_ms: self.inner.timeout.as_millis() as u64,
            idle_interval_ms: self.inner.idle_interval.as_millis() as u64,
            running: self.is_running(),
        }
    }
}

/// Consuming builder for [`ScanDaemon`].
///
/// Validation is fatal: any violated constraint aborts construction and
/// no daemon is produced.
pub struct ScanDaemonBuilder {
    protocol: Protocol,
    port: Option<u16>,
    timeout_ms: u64,
    idle_interval_ms: u64,
    prefix: Option<NetworkPrefix>,
    prober: Option<Box<dyn Prober>>,
    resolver: Option<Box<dyn HostnameResolver>>,
}

impl ScanDaemonBuilder {
    pub fn new(protocol: Protocol) -> Self {
        Self {
            protocol,
            port: None,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            idle_interval_ms: DEFAULT_IDLE_INTERVAL_MS,
            prefix: None,
            prober: None,
            resolver: None,
        }
    }

    /// Port to probe. Must be the protocol's default or exceed 1023.
    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Probe connect timeout in milliseconds.
    pub fn timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Pause after each completed pass over the subnet, in milliseconds.
    pub fn idle_interval_ms(mut self, idle_interval_ms: u64) -> Self {
        self.idle_interval_ms = idle_interval_ms;
        self
    }

    /// Watches this subnet instead of detecting one from the local
    /// host's own address.
    pub fn network_prefix(mut self, prefix: NetworkPrefix) -> Self {
        self.prefix = Some(prefix);
        self
    }

    /// Replaces the protocol-selected prober.
    pub fn prober(mut self, prober: Box<dyn Prober>) -> Self {
        self.prober = Some(prober);
        self
    }

    /// Replaces the default PTR resolver.
    pub fn resolver(mut self, resolver: Box<dyn HostnameResolver>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    pub fn build(self) -> Result<ScanDaemon, BuildError> {
        let default_port: u16 = self.protocol.default_port();
        let requested_port: u16 = self.port.unwrap_or(default_port);

        if requested_port != default_port && requested_port < 1024 {
            return Err(BuildError::InvalidPort {
                protocol: self.protocol,
                port: requested_port,
                default_port,
            });
        }
        if self.timeout_ms < 1 {
            return Err(BuildError::InvalidTimeout);
        }
        if self.idle_interval_ms < 1 {
            return Err(BuildError::InvalidIdleInterval);
        }

        let prefix: NetworkPrefix = match self.prefix {
            Some(prefix) => prefix,
            None => NetworkPrefix::discover().map_err(BuildError::SubnetDiscovery)?,
        };

        // ICMP has no transport-layer port: whatever was requested, the
        // reserved port is what probes use and snapshots report.
        let port: u16 = if self.protocol == Protocol::Icmp {
            default_port
        } else {
            requested_port
        };

        let timeout: Duration = Duration::from_millis(self.timeout_ms);
        let prober: Box<dyn Prober> = match self.prober {
            Some(prober) => prober,
            None => probe::for_protocol(self.protocol, port, timeout).map_err(|source| {
                BuildError::ProbeSetup {
                    protocol: self.protocol,
                    source,
                }
            })?,
        };
        let resolver: Box<dyn HostnameResolver> = self
            .resolver
            .unwrap_or_else(|| Box::new(DnsPtrResolver::new()));

        Ok(ScanDaemon {
            inner: Arc::new(DaemonInner {
                id: NEXT_ID.fetch_add(1, Ordering::Relaxed),
                protocol: self.protocol,
                prefix,
                port,
                timeout,
                idle_interval: Duration::from_millis(self.idle_interval_ms),
                running: AtomicBool::new(false),
                prober,
                resolver,
                listeners: ListenerRegistry::new(),
                state: Mutex::new(ScanState {
                    cursor: FIRST_HOST,
                    cache: HashMap::new(),
                }),
            }),
            worker: Mutex::new(None),
        })
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
