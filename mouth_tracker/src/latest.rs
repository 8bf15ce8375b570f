//! Latest-value handoff between the detector thread and the frame loop.
//!
//! Not a queue: the detector overwrites the slot and the frame loop reads
//! whatever is newest.  Results the frame loop never saw are replaced.

use std::sync::Arc;

use parking_lot::Mutex;

/// Single-slot cell holding the newest published value.
///
/// Values are stored behind an [`Arc`], so a reader holds the lock only
/// long enough to clone the pointer and never observes a half-written
/// value.
#[derive(Debug)]
pub struct LatestCell<T> {
    slot: Mutex<Slot<T>>,
}

#[derive(Debug)]
struct Slot<T> {
    value:      Option<Arc<T>>,
    /// Bumped on every publish.
    generation: u64,
}

impl<T> Default for LatestCell<T> {
    fn default() -> Self { Self::new() }
}

impl<T> LatestCell<T> {
    pub fn new() -> Self {
        LatestCell { slot: Mutex::new(Slot { value: None, generation: 0 }) }
    }

    /// Replace the current value.
    pub fn publish(&self, value: T) {
        let value = Arc::new(value);
        let mut slot = self.slot.lock();
        slot.value = Some(value);
        slot.generation += 1;
    }

    /// Newest value, if anything was published yet.  Reading does not
    /// consume: the same value is returned until the next publish.
    pub fn latest(&self) -> Option<Arc<T>> {
        self.slot.lock().value.clone()
    }

    /// Number of publishes so far.
    pub fn generation(&self) -> u64 {
        self.slot.lock().generation
    }
}
