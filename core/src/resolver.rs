//! Reverse hostname resolution for discovered servers.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use anyhow::{Context, ensure};
use async_trait::async_trait;
use tokio::net::UdpSocket;
use tokio::time::timeout;

use lanwatch_protocols::dns;

const DNS_PORT: u16 = 53;
const RESOLVE_TIMEOUT: Duration = Duration::from_millis(2_000);
/// Queried when no nameserver can be read from the system configuration.
const FALLBACK_NAMESERVER: IpAddr = IpAddr::V4(Ipv4Addr::new(1, 1, 1, 1));

/// Maps an address back to a hostname.
///
/// Resolution is best-effort: an unresolved address yields the empty
/// string, never an error.
#[async_trait]
pub trait HostnameResolver: Send + Sync {
    async fn reverse_lookup(&self, addr: IpAddr) -> String;
}

/// PTR-query resolver talking to the system's configured nameserver
/// over an ephemeral UDP socket.
pub struct DnsPtrResolver {
    nameserver: SocketAddr,
}

impl DnsPtrResolver {
    pub fn new() -> Self {
        let nameserver: IpAddr = system_nameserver().unwrap_or(FALLBACK_NAMESERVER);
        Self {
            nameserver: SocketAddr::new(nameserver, DNS_PORT),
        }
    }

    async fn query(&self, addr: IpAddr) -> anyhow::Result<String> {
        let id: u16 = rand::random();
        let packet: Vec<u8> = dns::create_ptr_packet(&addr, id);

        let socket = UdpSocket::bind("0.0.0.0:0")
            .await
            .context("binding resolver socket")?;
        socket.send_to(&packet, self.nameserver).await?;

        let mut buffer = [0u8; 512];
        let (len, _source) = timeout(RESOLVE_TIMEOUT, socket.recv_from(&mut buffer)).await??;

        let (response_id, hostname) = dns::parse_ptr_response(&buffer[..len])?;
        ensure!(response_id == id, "transaction id mismatch");

        Ok(hostname)
    }
}

impl Default for DnsPtrResolver {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HostnameResolver for DnsPtrResolver {
    async fn reverse_lookup(&self, addr: IpAddr) -> String {
        self.query(addr).await.unwrap_or_default()
    }
}

/// First `nameserver` entry of the resolver configuration.
fn system_nameserver() -> Option<IpAddr> {
    let contents: String = std::fs::read_to_string("/etc/resolv.conf").ok()?;
    first_nameserver(&contents)
}

fn first_nameserver(conf: &str) -> Option<IpAddr> {
    conf.lines().find_map(|line| {
        let rest = line.trim().strip_prefix("nameserver")?;
        rest.trim().parse().ok()
    })
}
