use std::sync::atomic::{AtomicUsize, Ordering};

/// Per-split id source. Ids are strictly increasing and never reused,
/// even when the item that drew one later fails.
#[derive(Debug, Default)]
pub struct SequenceAllocator {
    last: AtomicUsize,
}

impl SequenceAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next id; the first call on a fresh allocator returns 1.
    /// `None` once the id space is exhausted.
    pub fn next_id(&self) -> Option<usize> {
        self.last
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| last.checked_add(1))
            .ok()
            .map(|last| last + 1)
    }

    /// Make sure every future id is greater than `used`.
    pub fn advance_past(&self, used: usize) {
        self.last.fetch_max(used, Ordering::SeqCst);
    }
}
