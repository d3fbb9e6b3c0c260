//! Synchronous fan-out of scan events to registered subscribers.

use std::sync::{Arc, RwLock};

use lanwatch_common::event::ScanEvent;

/// A subscriber callback, invoked inline on the daemon's own task.
pub type Listener = Arc<dyn Fn(&ScanEvent) + Send + Sync>;

/// Append-only registry with independent lanes for server-updated
/// (ONLINE) and server-removed (OFFLINE) notifications.
///
/// Delivery is synchronous and in registration order; a slow subscriber
/// delays the ones after it. Notification iterates over a snapshot of
/// the lane, so registering during a delivery never invalidates the
/// iteration in progress.
#[derive(Default)]
pub struct ListenerRegistry {
    server_updated: RwLock<Vec<Listener>>,
    server_removed: RwLock<Vec<Listener>>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_server_updated(&self, listener: Listener) {
        self.server_updated.write().unwrap().push(listener);
    }

    pub fn add_server_removed(&self, listener: Listener) {
        self.server_removed.write().unwrap().push(listener);
    }

    pub fn notify_server_updated(&self, event: &ScanEvent) {
        Self::notify(&self.server_updated, event);
    }

    pub fn notify_server_removed(&self, event: &ScanEvent) {
        Self::notify(&self.server_removed, event);
    }

    fn notify(lane: &RwLock<Vec<Listener>>, event: &ScanEvent) {
        let listeners: Vec<Listener> = lane.read().unwrap().clone();
        for listener in &listeners {
            listener(event);
        }
    }
}
