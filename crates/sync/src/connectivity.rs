// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Connectivity signal.
//!
//! The sync manager never talks to platform reachability APIs directly;
//! it consumes a [`ConnectivityProvider`], which platform glue (or a
//! test) drives. A watch channel carries the boolean state, so repeated
//! identical sets produce no notification: subscribers observe exactly
//! one wakeup per actual transition.

use tokio::sync::watch;

/// Source of the online/offline signal.
pub trait ConnectivityProvider: Send + Sync {
    /// Current reachability state.
    fn is_online(&self) -> bool;

    /// Subscribe to state changes. The receiver wakes once per
    /// transition; the current value is available immediately.
    fn subscribe(&self) -> watch::Receiver<bool>;
}

/// Watch-channel backed connectivity monitor.
///
/// Platform code calls [`ConnectivityMonitor::set_online`] whenever the
/// network signal changes; duplicate states are dropped on the floor.
pub struct ConnectivityMonitor {
    tx: watch::Sender<bool>,
}

impl ConnectivityMonitor {
    /// Create a monitor with the given initial state.
    pub fn new(initially_online: bool) -> Self {
        let (tx, _rx) = watch::channel(initially_online);
        ConnectivityMonitor { tx }
    }

    /// Report the current reachability state.
    ///
    /// Returns true if this call was a transition (and notified
    /// subscribers), false if the state was already current.
    pub fn set_online(&self, online: bool) -> bool {
        let changed = self.tx.send_if_modified(|state| {
            if *state != online {
                *state = online;
                true
            } else {
                false
            }
        });
        if changed {
            tracing::info!("connectivity changed: {}", if online { "online" } else { "offline" });
        }
        changed
    }
}

impl Default for ConnectivityMonitor {
    fn default() -> Self {
        Self::new(true)
    }
}

impl ConnectivityProvider for ConnectivityMonitor {
    fn is_online(&self) -> bool {
        *self.tx.borrow()
    }

    fn subscribe(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }
}

#[cfg(test)]
#[path = "connectivity_tests.rs"]
mod tests;
