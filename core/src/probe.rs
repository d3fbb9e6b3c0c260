//! The central **abstraction** for per-protocol liveness checks.
//!
//! One implementation exists per supported protocol. The scan daemon
//! selects the implementation by protocol at construction time and only
//! ever talks to the [`Prober`] trait, so probing strategies stay
//! swappable without touching the polling loop.

use std::net::IpAddr;
use std::time::Duration;

use async_trait::async_trait;
use lanwatch_common::protocol::Protocol;

mod ftp;
mod http;
mod icmp;

pub use ftp::FtpProber;
pub use http::HttpProber;
pub use icmp::IcmpProber;

/// Reads on an established connection are bounded by this ceiling,
/// independent of the configured connect timeout.
pub(crate) const READ_TIMEOUT: Duration = Duration::from_millis(10_000);

/// A single liveness check against a single address.
///
/// Implementations must collapse every transport failure (timeout,
/// refused connection, malformed response) to `false` and release all
/// transport resources on every exit path. Nothing propagates past this
/// boundary.
#[async_trait]
pub trait Prober: Send + Sync {
    async fn probe(&self, addr: IpAddr) -> bool;
}

/// Instantiates the prober for `protocol`.
pub fn for_protocol(
    protocol: Protocol,
    port: u16,
    timeout: Duration,
) -> anyhow::Result<Box<dyn Prober>> {
    let prober: Box<dyn Prober> = match protocol {
        Protocol::Icmp => Box::new(IcmpProber::new(timeout)),
        Protocol::Http | Protocol::Https => Box::new(HttpProber::new(protocol, port, timeout)?),
        Protocol::Ftp => Box::new(FtpProber::new(port, timeout)),
    };
    Ok(prober)
}
