use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

/// A shared generation counter for connection cancellation.
///
/// Every connect/disconnect cycle of a channel runs under its own epoch.
/// Work started under one epoch carries that value with it; once the epoch
/// has been advanced, the work is stale and its result must be dropped.
#[derive(Clone, Debug)]
pub struct Epoch {
    value: Arc<AtomicU64>,
}

impl Default for Epoch {
    fn default() -> Self {
        Self::new()
    }
}

impl Epoch {
    pub fn new() -> Self {
        Self {
            value: Arc::new(AtomicU64::new(1)),
        }
    }

    /// Get the current epoch value.
    pub fn current(&self) -> u64 {
        self.value.load(Ordering::Acquire)
    }

    /// Advance to the next epoch. Returns the new epoch value.
    /// Everything stamped with an older value is invalid from here on.
    pub fn advance(&self) -> u64 {
        self.value.fetch_add(1, Ordering::AcqRel) + 1
    }

    /// Check if the given epoch is still current.
    pub fn is_current(&self, epoch: u64) -> bool {
        epoch == self.current()
    }
}

/// A value stamped with the epoch it was created in.
#[derive(Clone, Debug)]
pub struct Stamped<T> {
    pub epoch: u64,
    pub inner: T,
}

impl<T> Stamped<T> {
    pub fn new(epoch: u64, inner: T) -> Self {
        Self { epoch, inner }
    }

    /// Unwrap the value if it was produced under the current epoch.
    pub fn take_if_current(self, epoch: &Epoch) -> Option<T> {
        if epoch.is_current(self.epoch) {
            Some(self.inner)
        } else {
            None
        }
    }
}
