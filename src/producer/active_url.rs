//! Shared cell holding the active broker URL
//!
//! The URL is stored as an immutable snapshot behind an `RwLock` and
//! replaced wholesale on refresh, so readers only ever see a complete
//! value. Each installed snapshot gets a new generation number; a publisher
//! that failed against generation `g` only re-resolves if `g` is still
//! current, otherwise another caller has already refreshed.

use crate::broker::template::ActiveBrokerUrl;
use crate::core::sync::{read_recovering, write_recovering};
use std::sync::{Arc, RwLock};

/// One installed value of the active URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveSnapshot {
    pub url: ActiveBrokerUrl,
    pub generation: u64,
}

#[derive(Debug, Default)]
pub struct ActiveUrlCell {
    current: RwLock<Option<Arc<ActiveSnapshot>>>,
}

impl ActiveUrlCell {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current snapshot, or `None` before the first successful resolution
    pub fn load(&self) -> Option<Arc<ActiveSnapshot>> {
        read_recovering(self.current.read(), "active broker URL").clone()
    }

    /// Replace the current value and return the new snapshot
    pub fn install(&self, url: ActiveBrokerUrl) -> Arc<ActiveSnapshot> {
        let mut guard = write_recovering(self.current.write(), "active broker URL");
        let generation = guard.as_ref().map_or(1, |s| s.generation + 1);
        let snapshot = Arc::new(ActiveSnapshot { url, generation });
        *guard = Some(Arc::clone(&snapshot));
        snapshot
    }

    /// True when `generation` is the one currently installed
    pub fn is_current(&self, generation: u64) -> bool {
        self.load().is_some_and(|s| s.generation == generation)
    }
}
