//! Advisory process-wide gate counter.

use std::sync::atomic::{AtomicUsize, Ordering};

use crate::math::N;

static COUNTER: AtomicUsize = AtomicUsize::new(0);

/// Increase the counter by `inc` and return the new value.
pub fn add(inc: N) -> N {
    COUNTER.fetch_add(inc, Ordering::Relaxed) + inc
}

/// Reset the counter to zero.
pub fn reset() {
    COUNTER.store(0, Ordering::Relaxed);
}

pub fn get() -> N {
    COUNTER.load(Ordering::Relaxed)
}
