use std::sync::Arc;

use anyhow::Context;
use colored::*;
use tracing::info;

use lanwatch_common::event::ScanEvent;
use lanwatch_common::network::NetworkPrefix;
use lanwatch_common::protocol::Protocol;
use lanwatch_core::daemon::ScanDaemonBuilder;
use lanwatch_core::manager::DaemonManager;

pub struct WatchOptions {
    pub protocols: Vec<Protocol>,
    pub port: Option<u16>,
    pub timeout: u64,
    pub idle_interval: u64,
    pub prefix: Option<NetworkPrefix>,
}

/// Builds one daemon per requested protocol, hands them to the manager
/// (which starts them) and watches until Ctrl-C.
pub async fn watch(opts: WatchOptions) -> anyhow::Result<()> {
    let mut manager = DaemonManager::new();

    for protocol in opts.protocols {
        let mut builder = ScanDaemonBuilder::new(protocol)
            .timeout_ms(opts.timeout)
            .idle_interval_ms(opts.idle_interval);
        if let Some(port) = opts.port {
            builder = builder.port(port);
        }
        if let Some(prefix) = opts.prefix {
            builder = builder.network_prefix(prefix);
        }

        let daemon = builder
            .build()
            .with_context(|| format!("building the {protocol} daemon"))?;

        daemon.on_server_updated(Arc::new(print_online));
        daemon.on_server_removed(Arc::new(print_offline));

        manager.add(daemon);
    }

    for snapshot in manager.find_all_daemons() {
        info!(
            "daemon #{} watching {}.0/24 for {} on port {}",
            snapshot.id, snapshot.network_prefix, snapshot.protocol, snapshot.port
        );
    }

    tokio::signal::ctrl_c()
        .await
        .context("waiting for the interrupt signal")?;

    manager.interrupt_all();
    manager.remove_all();
    Ok(())
}

fn print_online(event: &ScanEvent) {
    println!(
        "{} {} {} ({}) on port {}",
        "[+]".green().bold(),
        event.addr,
        "online".green(),
        display_hostname(event),
        event.port
    );
}

fn print_offline(event: &ScanEvent) {
    println!(
        "{} {} {} ({}) on port {}",
        "[-]".red().bold(),
        event.addr,
        "offline".red(),
        display_hostname(event),
        event.port
    );
}

fn display_hostname(event: &ScanEvent) -> &str {
    if event.hostname.is_empty() {
        "unresolved"
    } else {
        &event.hostname
    }
}
