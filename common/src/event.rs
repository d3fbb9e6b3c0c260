//! Scan events emitted on liveness-cache transitions.

use std::fmt;
use std::net::IpAddr;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::protocol::Protocol;

/// Status of a server as observed by the most recent probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ServerStatus {
    Online,
    Offline,
}

impl fmt::Display for ServerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServerStatus::Online => f.write_str("online"),
            ServerStatus::Offline => f.write_str("offline"),
        }
    }
}

/// Immutable record produced exactly once per cache transition: a server
/// appeared (or changed hostname), or a previously cached server
/// disappeared.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScanEvent {
    pub addr: IpAddr,
    /// Reverse-resolved hostname; empty when resolution failed. OFFLINE
    /// events carry the hostname that was cached at removal time.
    pub hostname: String,
    pub protocol: Protocol,
    pub port: u16,
    pub status: ServerStatus,
    pub timestamp: DateTime<Utc>,
}

impl ScanEvent {
    pub fn new(
        addr: IpAddr,
        hostname: String,
        protocol: Protocol,
        port: u16,
        status: ServerStatus,
    ) -> Self {
        Self {
            addr,
            hostname,
            protocol,
            port,
            status,
            timestamp: Utc::now(),
        }
    }
}
