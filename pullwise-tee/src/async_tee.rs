// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Asynchronous tee: fork one [`AsyncPull`] source into independent cursors.
//!
//! Buffer bookkeeping is identical to the synchronous [`tee`](crate::tee()) and never
//! suspends. Only the source pull suspends, and it is single-flight: the source sits
//! behind an async mutex held across the pull, so when several forks miss the buffer
//! at the same time exactly one of them pulls the source while the others wait and
//! then read the freshly buffered element.
//!
//! # Examples
//!
//! ```
//! use futures::stream;
//! use pullwise_core::{AsyncPull, Step, StreamSource};
//! use pullwise_tee::AsyncTeeExt;
//!
//! # #[tokio::main]
//! # async fn main() -> pullwise_core::Result<()> {
//! let mut forks = StreamSource::new(stream::iter(vec!["a", "b"])).tee(2)?;
//! let mut second = forks.pop().unwrap();
//! let mut first = forks.pop().unwrap();
//!
//! assert_eq!(first.pull().await?, Step::Value("a"));
//! assert_eq!(second.pull().await?, Step::Value("a"));
//! assert_eq!(second.pull().await?, Step::Value("b"));
//! # Ok(())
//! # }
//! ```

use crate::fork_buffer::ForkBuffer;
use async_trait::async_trait;
use core::fmt::Debug;
use pullwise_core::args::fork_count;
use pullwise_core::sync::{AsyncMutex, Mutex};
use pullwise_core::{AsyncPull, BoxAsyncPull, PullwiseError, Result, Step};
use std::sync::Arc;

struct AsyncTeeGroup<T> {
    buffer: Mutex<ForkBuffer<T>>,
    source: AsyncMutex<BoxAsyncPull<T>>,
}

/// One fork of an asynchronous tee group.
pub struct AsyncTeeCursor<T> {
    group: Arc<AsyncTeeGroup<T>>,
    index: usize,
}

/// Forks an asynchronous `source` into `count` cursors.
///
/// # Errors
/// Returns `InvalidArgument` if `count` is not a positive integer. The source is not
/// pulled in that case.
pub fn async_tee<P, N>(source: P, count: N) -> Result<Vec<AsyncTeeCursor<P::Item>>>
where
    P: AsyncPull + 'static,
    P::Item: Clone,
    N: TryInto<usize> + Copy + Debug,
{
    let count = fork_count("tee", count)?;
    debug!("async tee: forking source into {} cursors", count);

    let group = Arc::new(AsyncTeeGroup {
        buffer: Mutex::new(ForkBuffer::new(count)),
        source: AsyncMutex::new(Box::new(source) as BoxAsyncPull<P::Item>),
    });

    Ok((0..count)
        .map(|index| AsyncTeeCursor {
            group: Arc::clone(&group),
            index,
        })
        .collect())
}

/// Extension trait providing [`tee`](AsyncTeeExt::tee) on every asynchronous source.
pub trait AsyncTeeExt: AsyncPull + Sized {
    /// Forks this source into `count` independent cursors.
    ///
    /// # Errors
    /// Returns `InvalidArgument` if `count` is not a positive integer.
    fn tee<N>(self, count: N) -> Result<Vec<AsyncTeeCursor<Self::Item>>>
    where
        N: TryInto<usize> + Copy + Debug;
}

impl<P> AsyncTeeExt for P
where
    P: AsyncPull + 'static,
    P::Item: Clone,
{
    fn tee<N>(self, count: N) -> Result<Vec<AsyncTeeCursor<Self::Item>>>
    where
        N: TryInto<usize> + Copy + Debug,
    {
        async_tee(self, count)
    }
}

impl<T> AsyncTeeCursor<T> {
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

    fn read(&self) -> Option<Result<Step<T>>>
    where
        T: Clone,
    {
        self.group.buffer.lock().read(self.index)
    }
}

#[async_trait]
impl<T: Clone + Send> AsyncPull for AsyncTeeCursor<T> {
    type Item = T;

    async fn pull(&mut self) -> Result<Step<T>> {
        if let Some(answer) = self.read() {
            return answer;
        }

        let mut source = self.group.source.lock().await;
        // The fork holding the source before us may have buffered our element.
        if let Some(answer) = self.read() {
            return answer;
        }
        let pulled = source.pull().await;
        let answer = self.group.buffer.lock().record(self.index, pulled);
        answer
    }

    async fn stop(&mut self) {
        self.group.buffer.lock().stop(self.index);
    }

    async fn abort(&mut self, error: &PullwiseError) {
        warn!("async tee: fork {} aborted: {}", self.index, error);
        self.group.buffer.lock().stop(self.index);
    }
}

impl<T> Drop for AsyncTeeCursor<T> {
    fn drop(&mut self) {
        self.group.buffer.lock().stop(self.index);
    }
}
