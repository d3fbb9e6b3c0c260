//! Error types crossing the public API boundary.

use thiserror::Error;

use crate::protocol::Protocol;

/// Fatal daemon-construction errors. When any of these fire, no daemon
/// object is produced.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error(
        "port {port} is neither the default {protocol} port ({default_port}) \
         nor a user registered port greater than 1023"
    )]
    InvalidPort {
        protocol: Protocol,
        port: u16,
        default_port: u16,
    },

    #[error("timeout must be greater than 0 ms")]
    InvalidTimeout,

    #[error("idle interval must be greater than 0 ms")]
    InvalidIdleInterval,

    #[error("could not discover the local subnet prefix")]
    SubnetDiscovery(#[source] anyhow::Error),

    #[error("failed to set up the {protocol} prober")]
    ProbeSetup {
        protocol: Protocol,
        #[source]
        source: anyhow::Error,
    },
}

/// Errors surfaced by the daemon manager.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ManagerError {
    #[error("no scan daemon registered under id {0}")]
    NotFound(u64),
}
