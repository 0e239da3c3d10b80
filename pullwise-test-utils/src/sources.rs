// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Instrumented sources for tests.

use crate::probe::SourceProbe;
use async_trait::async_trait;
use pullwise_core::{AsyncPull, Pull, PullwiseError, Result, Step};
use std::collections::VecDeque;

/// A synchronous source over a fixed list of values that counts its pulls.
///
/// Stopping or aborting the source ends it: later pulls report `Done`.
pub struct CountingSource<T> {
    items: VecDeque<T>,
    probe: SourceProbe,
}

impl<T> CountingSource<T> {
    /// Creates the source and the probe observing it.
    pub fn new(items: impl IntoIterator<Item = T>) -> (Self, SourceProbe) {
        let probe = SourceProbe::new();
        let source = Self {
            items: items.into_iter().collect(),
            probe: probe.clone(),
        };
        (source, probe)
    }
}

impl<T> Pull for CountingSource<T> {
    type Item = T;

    fn pull(&mut self) -> Result<Step<T>> {
        self.probe.record_pull();
        Ok(self.items.pop_front().into())
    }

    fn stop(&mut self) {
        self.probe.record_stop();
        self.items.clear();
    }

    fn abort(&mut self, _error: &PullwiseError) {
        self.probe.record_abort();
        self.items.clear();
    }
}

/// A synchronous source that fails at chosen pull positions.
///
/// Position `n` refers to the n-th pull (zero based). A failing pull consumes no
/// value: the value that would have been produced is returned by the next pull.
pub struct FailingSource<T> {
    items: VecDeque<T>,
    fail_at: Vec<usize>,
    position: usize,
    probe: SourceProbe,
}

impl<T> FailingSource<T> {
    /// Creates the source and the probe observing it.
    pub fn new(items: impl IntoIterator<Item = T>, fail_at: &[usize]) -> (Self, SourceProbe) {
        let probe = SourceProbe::new();
        let source = Self {
            items: items.into_iter().collect(),
            fail_at: fail_at.to_vec(),
            position: 0,
            probe: probe.clone(),
        };
        (source, probe)
    }
}

impl<T> Pull for FailingSource<T> {
    type Item = T;

    fn pull(&mut self) -> Result<Step<T>> {
        self.probe.record_pull();
        let position = self.position;
        self.position += 1;
        if self.fail_at.contains(&position) {
            return Err(PullwiseError::source_error(format!(
                "injected failure at pull {position}"
            )));
        }
        Ok(self.items.pop_front().into())
    }

    fn stop(&mut self) {
        self.probe.record_stop();
        self.items.clear();
    }
}

/// An asynchronous source that yields to the scheduler before producing each element.
pub struct YieldingSource<T> {
    items: VecDeque<T>,
    probe: SourceProbe,
}

impl<T> YieldingSource<T> {
    /// Creates the source and the probe observing it.
    pub fn new(items: impl IntoIterator<Item = T>) -> (Self, SourceProbe) {
        let probe = SourceProbe::new();
        let source = Self {
            items: items.into_iter().collect(),
            probe: probe.clone(),
        };
        (source, probe)
    }
}

#[async_trait]
impl<T: Send> AsyncPull for YieldingSource<T> {
    type Item = T;

    async fn pull(&mut self) -> Result<Step<T>> {
        self.probe.record_pull();
        tokio::task::yield_now().await;
        Ok(self.items.pop_front().into())
    }

    async fn stop(&mut self) {
        self.probe.record_stop();
        self.items.clear();
    }

    async fn abort(&mut self, _error: &PullwiseError) {
        self.probe.record_abort();
        self.items.clear();
    }
}
