//! # Network Prefix Model
//!
//! The first three octets of the watched /24, detected from the local
//! host's own address.
//!
//! Known limitation: discovery assumes a single class-C-style subnet
//! derived from one local address. Multi-homed hosts and non-/24
//! topologies are not handled; callers that need a different subnet can
//! supply a prefix explicitly instead of relying on detection.

use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

use anyhow::Context;
use pnet::datalink::{self, NetworkInterface};
use pnet::ipnetwork::IpNetwork;

/// First three octets of an IPv4 subnet, displayed as `"a.b.c"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NetworkPrefix([u8; 3]);

impl NetworkPrefix {
    pub fn new(octets: [u8; 3]) -> Self {
        Self(octets)
    }

    /// Prefix of the subnet `addr` lives in.
    ///
    /// Example: for the host address `192.168.1.52` the prefix is
    /// `192.168.1`.
    pub fn of(addr: Ipv4Addr) -> Self {
        let [a, b, c, _] = addr.octets();
        Self([a, b, c])
    }

    /// Synthesizes the address of host number `host` inside the subnet.
    pub fn host(&self, host: u8) -> Ipv4Addr {
        let [a, b, c] = self.0;
        Ipv4Addr::new(a, b, c, host)
    }

    /// Derives the prefix from the current host's own address.
    ///
    /// Enumerates the local interfaces and takes the first three octets
    /// of a private IPv4 address when one exists, falling back to any
    /// usable IPv4. Failure to find one is fatal to daemon construction.
    pub fn discover() -> anyhow::Result<Self> {
        let addr: Ipv4Addr =
            local_ipv4().context("no usable IPv4 address on any network interface")?;
        Ok(Self::of(addr))
    }
}

impl fmt::Display for NetworkPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c] = self.0;
        write!(f, "{a}.{b}.{c}")
    }
}

impl FromStr for NetworkPrefix {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let octets: Vec<u8> = s
            .split('.')
            .map(|octet| octet.parse::<u8>())
            .collect::<Result<Vec<u8>, _>>()
            .map_err(|e| format!("invalid network prefix '{s}': {e}"))?;

        match octets[..] {
            [a, b, c] => Ok(Self([a, b, c])),
            _ => Err(format!(
                "invalid network prefix '{s}': expected exactly three octets"
            )),
        }
    }
}

/// Picks the address the scanned subnet is derived from.
fn local_ipv4() -> Option<Ipv4Addr> {
    let interfaces: Vec<NetworkInterface> = datalink::interfaces()
        .into_iter()
        .filter(is_viable)
        .collect();

    let candidates: Vec<Ipv4Addr> = interfaces
        .iter()
        .flat_map(|interface| interface.ips.iter())
        .filter_map(|net| match net {
            IpNetwork::V4(v4) => Some(v4.ip()),
            IpNetwork::V6(_) => None,
        })
        .collect();

    candidates
        .iter()
        .copied()
        .find(Ipv4Addr::is_private)
        .or_else(|| candidates.first().copied())
}

fn is_viable(interface: &NetworkInterface) -> bool {
    interface.is_up() && !interface.is_loopback() && !interface.ips.is_empty()
}
