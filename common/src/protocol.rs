//! # Protocol Table
//!
//! The fixed set of protocols a scan daemon can watch for.
//!
//! Each variant carries its wire name, URI scheme separator and default
//! port. The table is never extended or mutated at runtime; everything
//! else in the system dispatches on it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    /// ICMP has no transport-layer port. Port `1` is reported for it as
    /// the reserved port of RFC 792; it is never put on the wire.
    Icmp,
    Http,
    Https,
    Ftp,
}

impl Protocol {
    pub const ALL: [Protocol; 4] = [
        Protocol::Icmp,
        Protocol::Http,
        Protocol::Https,
        Protocol::Ftp,
    ];

    /// Lowercase wire name, e.g. `"https"`.
    pub fn name(&self) -> &'static str {
        match self {
            Protocol::Icmp => "icmp",
            Protocol::Http => "http",
            Protocol::Https => "https",
            Protocol::Ftp => "ftp",
        }
    }

    /// Fully qualified URI scheme, e.g. `"http://"`.
    ///
    /// ICMP is not URI-addressable and has no separator, so its scheme
    /// is just the name.
    pub fn scheme(&self) -> String {
        format!("{}{}", self.name(), self.separator())
    }

    pub fn default_port(&self) -> u16 {
        match self {
            Protocol::Icmp => 1,
            Protocol::Http => 80,
            Protocol::Https => 443,
            Protocol::Ftp => 21,
        }
    }

    /// Inverse of [`Protocol::name`]. Unknown names yield `None`.
    pub fn from_name(name: &str) -> Option<Protocol> {
        Protocol::ALL.into_iter().find(|p| p.name() == name)
    }

    fn separator(&self) -> &'static str {
        match self {
            Protocol::Icmp => "",
            _ => "://",
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Protocol {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Protocol::from_name(&s.to_ascii_lowercase())
            .ok_or_else(|| format!("unknown protocol: {s}"))
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_ports_match_the_table() {
        assert_eq!(Protocol::Icmp.default_port(), 1);
        assert_eq!(Protocol::Http.default_port(), 80);
        assert_eq!(Protocol::Https.default_port(), 443);
        assert_eq!(Protocol::Ftp.default_port(), 21);
    }

    #[test]
    fn schemes_only_carry_a_separator_when_uri_addressable() {
        assert_eq!(Protocol::Icmp.scheme(), "icmp");
        assert_eq!(Protocol::Http.scheme(), "http://");
        assert_eq!(Protocol::Https.scheme(), "https://");
        assert_eq!(Protocol::Ftp.scheme(), "ftp://");
    }

    #[test]
    fn from_name_round_trips_every_variant() {
        for protocol in Protocol::ALL {
            assert_eq!(Protocol::from_name(protocol.name()), Some(protocol));
        }
        assert_eq!(Protocol::from_name("gopher"), None);
    }

    #[test]
    fn from_str_is_case_insensitive() {
        assert_eq!("HTTP".parse::<Protocol>(), Ok(Protocol::Http));
        assert!("telnet".parse::<Protocol>().is_err());
    }
}
