// ManualClock - A block height the host (or a test) advances explicitly

use crate::ledger::Clock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Shared, non-decreasing height counter.
///
/// Clones observe the same height, so a test can keep one handle while the
/// marketplace owns another.
#[derive(Clone, Debug, Default)]
pub struct ManualClock {
    height: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new(height: u64) -> Self {
        Self {
            height: Arc::new(AtomicU64::new(height)),
        }
    }

    /// Move the height forward by `blocks`, stopping at `u64::MAX`
    pub fn advance(&self, blocks: u64) -> u64 {
        let previous = self
            .height
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |h| Some(h.saturating_add(blocks)))
            .unwrap_or_else(|h| h);
        previous.saturating_add(blocks)
    }

    /// Jump to `height`. Never moves backwards.
    pub fn set(&self, height: u64) -> u64 {
        let previous = self.height.fetch_max(height, Ordering::SeqCst);
        previous.max(height)
    }
}

impl Clock for ManualClock {
    fn current_height(&self) -> u64 {
        self.height.load(Ordering::SeqCst)
    }
}
