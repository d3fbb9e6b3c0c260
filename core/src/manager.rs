//! Keyed lifecycle management for scan daemons.
//!
//! The manager lets callers act on daemons knowing nothing about them
//! but the id: individually, or massively across every registered
//! daemon. Adding a daemon also starts it; removing one also stops it.

use std::collections::HashMap;

use lanwatch_common::error::ManagerError;
use lanwatch_common::snapshot::DaemonSnapshot;

use crate::daemon::ScanDaemon;

#[derive(Default)]
pub struct DaemonManager {
    daemons: HashMap<u64, ScanDaemon>,
}

impl DaemonManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the daemon under its own id and starts it, returning
    /// the start outcome.
    pub fn add(&mut self, daemon: ScanDaemon) -> bool {
        let started: bool = daemon.start();
        self.daemons.insert(daemon.id(), daemon);
        started
    }

    /// Resumes a stopped daemon.
    pub fn resume(&self, id: u64) -> Result<bool, ManagerError> {
        Ok(self.get(id)?.start())
    }

    /// Soft-stops a running daemon.
    pub fn stop(&self, id: u64) -> Result<bool, ManagerError> {
        Ok(self.get(id)?.stop())
    }

    /// Hard-stops a running daemon, aborting its in-flight probe.
    pub fn interrupt(&self, id: u64) -> Result<bool, ManagerError> {
        Ok(self.get(id)?.interrupt())
    }

    /// Stops the daemon whatever its state, then deregisters it.
    pub fn remove(&mut self, id: u64) -> Result<bool, ManagerError> {
        let daemon: ScanDaemon = self.daemons.remove(&id).ok_or(ManagerError::NotFound(id))?;
        daemon.stop();
        Ok(true)
    }

    /// Resumes every registered daemon. `true` when any of them was
    /// actually started.
    pub fn resume_all(&self) -> bool {
        let mut result = false;
        for daemon in self.daemons.values() {
            result |= daemon.start();
        }
        result
    }

    /// Soft-stops every registered daemon.
    pub fn stop_all(&self) -> bool {
        let mut result = false;
        for daemon in self.daemons.values() {
            result |= daemon.stop();
        }
        result
    }

    /// Hard-stops every registered daemon.
    pub fn interrupt_all(&self) -> bool {
        let mut result = false;
        for daemon in self.daemons.values() {
            result |= daemon.interrupt();
        }
        result
    }

    /// Stops and deregisters every daemon. The aggregate reflects
    /// whether any individual stop changed state, regardless of how
    /// many daemons were deregistered.
    pub fn remove_all(&mut self) -> bool {
        let mut result = false;
        for (_, daemon) in self.daemons.drain() {
            result |= daemon.stop();
        }
        result
    }

    pub fn contains(&self, id: u64) -> bool {
        self.daemons.contains_key(&id)
    }

    /// Snapshot of one daemon, `None` when the id is unregistered.
    pub fn find(&self, id: u64) -> Option<DaemonSnapshot> {
        self.daemons.get(&id).map(ScanDaemon::snapshot)
    }

    /// One snapshot per registered daemon; order is not significant.
    pub fn find_all_daemons(&self) -> Vec<DaemonSnapshot> {
        self.daemons.values().map(ScanDaemon::snapshot).collect()
    }

    pub fn len(&self) -> usize {
        self.daemons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.daemons.is_empty()
    }

    fn get(&self, id: u64) -> Result<&ScanDaemon, ManagerError> {
        self.daemons.get(&id).ok_or(ManagerError::NotFound(id))
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
