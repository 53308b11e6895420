use std::sync::atomic::{AtomicBool, Ordering};

/// Write-once completion flag shared by the producer and its consumers.
#[derive(Debug, Default)]
pub struct DoneFlag {
    set: AtomicBool,
}

impl DoneFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flips the flag to `true`. Returns `false` if it was already set.
    pub fn set(&self) -> bool {
        !self.set.swap(true, Ordering::AcqRel)
    }

    pub fn is_set(&self) -> bool {
        self.set.load(Ordering::Acquire)
    }
}
