// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Synchronous tee: fork one [`Pull`] source into independent cursors.
//!
//! Every cursor yields the same values, and the same errors, as the source, in the
//! same order, each at its own pace. The source is pulled exactly once per element no
//! matter how many forks read it, and the shared buffer only holds the elements the
//! slowest live fork has not read yet.
//!
//! # Examples
//!
//! ```
//! use pullwise_core::{IterSource, Pull, Step};
//! use pullwise_tee::TeeExt;
//!
//! # fn main() -> pullwise_core::Result<()> {
//! let mut forks = IterSource::new(vec![1, 2]).tee(2)?;
//! let mut right = forks.pop().unwrap();
//! let mut left = forks.pop().unwrap();
//!
//! assert_eq!(left.pull()?, Step::Value(1));
//! assert_eq!(left.pull()?, Step::Value(2));
//! assert_eq!(right.pull()?, Step::Value(1));
//! assert_eq!(left.pull()?, Step::Done);
//! # Ok(())
//! # }
//! ```
//!
//! # Stopping a fork
//!
//! [`TeeCursor::stop`] (or dropping the cursor) only retires that fork. The source and
//! sibling forks are untouched, and a stopped fork no longer holds back buffer trimming.

use crate::fork_buffer::ForkBuffer;
use core::fmt::Debug;
use pullwise_core::args::fork_count;
use pullwise_core::sync::Mutex;
use pullwise_core::{BoxPull, Pull, PullwiseError, Result, Step};
use std::sync::Arc;

struct TeeGroup<T> {
    buffer: Mutex<ForkBuffer<T>>,
    source: Mutex<BoxPull<T>>,
}

/// One fork of a synchronous tee group.
pub struct TeeCursor<T> {
    group: Arc<TeeGroup<T>>,
    index: usize,
}

/// Forks `source` into `count` cursors.
///
/// # Errors
/// Returns `InvalidArgument` if `count` is not a positive integer. The source is not
/// pulled in that case.
pub fn tee<P, N>(source: P, count: N) -> Result<Vec<TeeCursor<P::Item>>>
where
    P: Pull + Send + 'static,
    P::Item: Clone,
    N: TryInto<usize> + Copy + Debug,
{
    let count = fork_count("tee", count)?;
    debug!("tee: forking source into {} cursors", count);

    let group = Arc::new(TeeGroup {
        buffer: Mutex::new(ForkBuffer::new(count)),
        source: Mutex::new(Box::new(source) as BoxPull<P::Item>),
    });

    Ok((0..count)
        .map(|index| TeeCursor {
            group: Arc::clone(&group),
            index,
        })
        .collect())
}

/// Extension trait providing [`tee`](TeeExt::tee) on every synchronous source.
pub trait TeeExt: Pull + Sized {
    /// Forks this source into `count` independent cursors.
    ///
    /// # Errors
    /// Returns `InvalidArgument` if `count` is not a positive integer.
    fn tee<N>(self, count: N) -> Result<Vec<TeeCursor<Self::Item>>>
    where
        N: TryInto<usize> + Copy + Debug;
}

impl<P> TeeExt for P
where
    P: Pull + Send + 'static,
    P::Item: Clone,
{
    fn tee<N>(self, count: N) -> Result<Vec<TeeCursor<Self::Item>>>
    where
        N: TryInto<usize> + Copy + Debug,
    {
        tee(self, count)
    }
}

impl<T> TeeCursor<T> {
    /// Position of this fork within its group.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Returns `true` once this fork reached the end of the sequence or was stopped.
    #[must_use]
    pub fn is_done(&self) -> bool {
        !self.group.buffer.lock().is_live(self.index)
    }

    /// Number of elements currently held in the buffer shared by the group.
    #[must_use]
    pub fn buffered_len(&self) -> usize {
        self.group.buffer.lock().len()
    }
}

impl<T: Clone> Pull for TeeCursor<T> {
    type Item = T;

    fn pull(&mut self) -> Result<Step<T>> {
        if let Some(answer) = self.group.buffer.lock().read(self.index) {
            return answer;
        }

        let mut source = self.group.source.lock();
        // Another fork may have pulled while we waited for the source.
        if let Some(answer) = self.group.buffer.lock().read(self.index) {
            return answer;
        }
        let pulled = source.pull();
        self.group.buffer.lock().record(self.index, pulled)
    }

    fn stop(&mut self) {
        self.group.buffer.lock().stop(self.index);
    }

    fn abort(&mut self, error: &PullwiseError) {
        warn!("tee: fork {} aborted: {}", self.index, error);
        self.group.buffer.lock().stop(self.index);
    }
}

impl<T> Drop for TeeCursor<T> {
    fn drop(&mut self) {
        self.group.buffer.lock().stop(self.index);
    }
}
