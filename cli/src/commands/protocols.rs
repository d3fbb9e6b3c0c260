use colored::*;

use lanwatch_common::protocol::Protocol;

/// Prints the protocol table.
pub fn list() {
    for protocol in Protocol::ALL {
        println!(
            "{:<8} default port {}",
            protocol.name().bold(),
            protocol.default_port()
        );
    }
}
