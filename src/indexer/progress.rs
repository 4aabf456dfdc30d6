//! Progress reporting for the parallel load phases.

use std::sync::atomic::{AtomicUsize, Ordering};

use tracing::info;

/// Log progress every this many items.
pub const PROGRESS_INTERVAL: usize = 10_000;

/// Counts finished items across rayon workers.
#[derive(Debug)]
pub struct Progress {
    phase: &'static str,
    total: usize,
    done: AtomicUsize,
}

impl Progress {
    pub fn new(phase: &'static str, total: usize) -> Self {
        Self { phase, total, done: AtomicUsize::new(0) }
    }

    /// Record one finished item, logging when the count reaches a multiple of
    /// [`PROGRESS_INTERVAL`]. Returns the count that was logged, if any.
    pub fn tick(&self) -> Option<usize> {
        let done = self.done.fetch_add(1, Ordering::Relaxed) + 1;
        if done % PROGRESS_INTERVAL != 0 {
            return None;
        }
        info!("{}: {}/{}", self.phase, done, self.total);
        Some(done)
    }

    pub fn done(&self) -> usize {
        self.done.load(Ordering::Relaxed)
    }
}
