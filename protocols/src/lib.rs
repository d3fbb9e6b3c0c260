//! Wire-level helpers shared by the probes: a minimal DNS PTR codec for
//! reverse hostname lookups and FTP control-channel reply parsing.

pub mod dns;
pub mod ftp;
