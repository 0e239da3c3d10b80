// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[derive(Debug, Default)]
struct Counters {
    pulls: AtomicUsize,
    stops: AtomicUsize,
    aborts: AtomicUsize,
}

/// Shared view on the activity of a test source.
///
/// The source keeps one clone and the test keeps another, so the counters can still be
/// read after the source has been moved into a pipeline or a tee group.
#[derive(Debug, Clone, Default)]
pub struct SourceProbe {
    counters: Arc<Counters>,
}

impl SourceProbe {
    /// Creates a probe with every counter at zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of times the source was pulled, including pulls that returned `Done`.
    #[must_use]
    pub fn pulls(&self) -> usize {
        self.counters.pulls.load(Ordering::SeqCst)
    }

    /// Number of times the source was stopped.
    #[must_use]
    pub fn stops(&self) -> usize {
        self.counters.stops.load(Ordering::SeqCst)
    }

    /// Number of times the source was aborted.
    #[must_use]
    pub fn aborts(&self) -> usize {
        self.counters.aborts.load(Ordering::SeqCst)
    }

    pub(crate) fn record_pull(&self) {
        self.counters.pulls.fetch_add(1, Ordering::SeqCst);
    }

    pub(crate) fn record_stop(&self) {
        self.counters.stops.fetch_add(1, Ordering::SeqCst);
    }

    pub(crate) fn record_abort(&self) {
        self.counters.aborts.fetch_add(1, Ordering::SeqCst);
    }
}
