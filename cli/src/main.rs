mod commands;
mod terminal;

use commands::{CommandLine, Commands, protocols, watch};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let commands = CommandLine::parse_args();

    terminal::logging::init();

    match commands.command {
        Commands::Watch {
            protocols,
            port,
            timeout,
            idle_interval,
            prefix,
        } => {
            watch::watch(watch::WatchOptions {
                protocols,
                port,
                timeout,
                idle_interval,
                prefix,
            })
            .await
        }
        Commands::Protocols => Ok(protocols::list()),
    }
}
