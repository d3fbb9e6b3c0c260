//! Read-only projections of daemon configuration.

use serde::Serialize;

use crate::protocol::Protocol;

/// Point-in-time copy of a daemon's configuration and run state, for
/// introspection. Not a live view; `running` is whatever the flag read
/// at materialization time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DaemonSnapshot {
    pub id: u64,
    pub protocol: Protocol,
    /// First three octets of the watched subnet, e.g. `"192.168.1"`.
    pub network_prefix: String,
    pub port: u16,
    pub timeout_ms: u64,
    pub idle_interval_ms: u64,
    pub running: bool,
}
