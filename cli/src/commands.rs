pub mod protocols;
pub mod watch;

use clap::{Parser, Subcommand};
use lanwatch_common::network::NetworkPrefix;
use lanwatch_common::protocol::Protocol;

#[derive(Parser)]
#[command(name = "lanwatch")]
#[command(about = "Watches the local subnet for appearing and disappearing services.")]
pub struct CommandLine {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Poll the subnet with one daemon per protocol until interrupted
    #[command(alias = "w")]
    Watch {
        /// Protocol to watch (icmp, http, https, ftp); repeatable
        #[arg(long = "protocol", short = 'P', required = true)]
        protocols: Vec<Protocol>,
        /// Port override, applied to every selected protocol
        #[arg(long)]
        port: Option<u16>,
        /// Probe timeout in milliseconds
        #[arg(long, default_value_t = 10)]
        timeout: u64,
        /// Pause between full subnet passes, in milliseconds
        #[arg(long = "idle-interval", default_value_t = 15_000)]
        idle_interval: u64,
        /// Network prefix override, e.g. 192.168.1 (default: detected)
        #[arg(long)]
        prefix: Option<NetworkPrefix>,
    },
    /// List the supported protocols and their default ports
    #[command(alias = "p")]
    Protocols,
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
