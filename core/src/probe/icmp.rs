use std::net::IpAddr;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::timeout;

use super::Prober;

const ECHO_PAYLOAD: [u8; 8] = [0; 8];

/// Probes hosts with a single ICMP echo request bounded by the
/// configured timeout.
pub struct IcmpProber {
    timeout: Duration,
}

impl IcmpProber {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

#[async_trait]
impl Prober for IcmpProber {
    async fn probe(&self, addr: IpAddr) -> bool {
        matches!(
            timeout(self.timeout, surge_ping::ping(addr, &ECHO_PAYLOAD)).await,
            Ok(Ok(_))
        )
    }
}
