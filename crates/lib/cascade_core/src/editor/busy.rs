//! In-flight call counting for the editor's busy flag.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

/// Shared count of calls in flight.
#[derive(Debug, Clone, Default)]
pub struct BusyCounter(Arc<AtomicU32>);

impl BusyCounter {
    /// Count one more call until the returned guard is dropped.
    pub fn enter(&self) -> BusyGuard {
        self.0.fetch_add(1, Ordering::SeqCst);
        BusyGuard(Arc::clone(&self.0))
    }

    pub fn is_busy(&self) -> bool {
        self.0.load(Ordering::SeqCst) > 0
    }
}

/// One call in flight. Settling, failing, being discarded as stale and being
/// cancelled all end with the guard dropped.
#[derive(Debug)]
pub struct BusyGuard(Arc<AtomicU32>);

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}
