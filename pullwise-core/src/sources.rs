// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Adapters turning ordinary Rust sequences into pull-based sources.
//!
//! | Adapter | Wraps | Capability |
//! |---------|-------|------------|
//! | [`IterSource`] | any `Iterator` | [`Pull`] |
//! | [`FnSource`] | a closure returning `Result<Step<T>>` | [`Pull`] |
//! | [`SyncSource`] | any [`Pull`] | [`AsyncPull`] |
//! | [`StreamSource`] | any `Stream<Item = T>` | [`AsyncPull`] |
//! | [`TryStreamSource`] | any `Stream<Item = Result<T>>` | [`AsyncPull`] |
//!
//! Every adapter is fused: once it reported `Done` it keeps reporting `Done`, even if
//! the wrapped sequence would resume.

use crate::{AsyncPull, Pull, Step};
use async_trait::async_trait;
use core::pin::Pin;
use futures::{Stream, StreamExt};
use pullwise_error::{PullwiseError, Result};

/// A [`Pull`] over any iterator. Never fails.
#[derive(Debug, Clone)]
pub struct IterSource<I> {
    iter: core::iter::Fuse<I>,
}

impl<I: Iterator> IterSource<I> {
    /// Wraps anything iterable.
    pub fn new<S>(iterable: S) -> Self
    where
        S: IntoIterator<IntoIter = I>,
    {
        Self {
            iter: iterable.into_iter().fuse(),
        }
    }
}

impl<I: Iterator> Pull for IterSource<I> {
    type Item = I::Item;

    fn pull(&mut self) -> Result<Step<Self::Item>> {
        Ok(self.iter.next().into())
    }
}

/// A [`Pull`] driven by a closure.
///
/// The closure is never called again once it returned `Done` or the source was stopped.
pub struct FnSource<F> {
    f: F,
    finished: bool,
}

/// Creates a [`FnSource`] from a closure producing one step per call.
///
/// ```
/// use pullwise_core::{from_fn, Pull, Step};
///
/// let mut n = 0;
/// let mut source = from_fn(move || {
///     n += 1;
///     Ok(if n <= 2 { Step::Value(n) } else { Step::Done })
/// });
/// assert_eq!(source.pull().unwrap(), Step::Value(1));
/// assert_eq!(source.pull().unwrap(), Step::Value(2));
/// assert_eq!(source.pull().unwrap(), Step::Done);
/// ```
pub fn from_fn<T, F>(f: F) -> FnSource<F>
where
    F: FnMut() -> Result<Step<T>>,
{
    FnSource { f, finished: false }
}

impl<T, F> Pull for FnSource<F>
where
    F: FnMut() -> Result<Step<T>>,
{
    type Item = T;

    fn pull(&mut self) -> Result<Step<T>> {
        if self.finished {
            return Ok(Step::Done);
        }
        let step = (self.f)()?;
        if step.is_done() {
            self.finished = true;
        }
        Ok(step)
    }

    fn stop(&mut self) {
        self.finished = true;
    }

    fn abort(&mut self, _error: &PullwiseError) {
        self.finished = true;
    }
}

/// Lifts a synchronous [`Pull`] into an [`AsyncPull`] that never suspends.
#[derive(Debug)]
pub struct SyncSource<P> {
    inner: P,
}

impl<P> SyncSource<P> {
    /// Wraps a synchronous source.
    pub const fn new(inner: P) -> Self {
        Self { inner }
    }

    /// Returns the wrapped source.
    pub fn into_inner(self) -> P {
        self.inner
    }
}

#[async_trait]
impl<P> AsyncPull for SyncSource<P>
where
    P: Pull + Send,
    P::Item: Send,
{
    type Item = P::Item;

    async fn pull(&mut self) -> Result<Step<Self::Item>> {
        self.inner.pull()
    }

    async fn stop(&mut self) {
        self.inner.stop();
    }

    async fn abort(&mut self, error: &PullwiseError) {
        self.inner.abort(error);
    }
}

/// An [`AsyncPull`] over a `futures::Stream` of plain values.
pub struct StreamSource<S> {
    stream: Pin<Box<S>>,
    finished: bool,
}

impl<S: Stream> StreamSource<S> {
    /// Wraps a stream; the stream does not need to be `Unpin`.
    pub fn new(stream: S) -> Self {
        Self {
            stream: Box::pin(stream),
            finished: false,
        }
    }
}

#[async_trait]
impl<S> AsyncPull for StreamSource<S>
where
    S: Stream + Send,
    S::Item: Send,
{
    type Item = S::Item;

    async fn pull(&mut self) -> Result<Step<Self::Item>> {
        if self.finished {
            return Ok(Step::Done);
        }
        match self.stream.next().await {
            Some(value) => Ok(Step::Value(value)),
            None => {
                self.finished = true;
                Ok(Step::Done)
            }
        }
    }

    async fn stop(&mut self) {
        self.finished = true;
    }

    async fn abort(&mut self, _error: &PullwiseError) {
        self.finished = true;
    }
}

/// An [`AsyncPull`] over a `futures::Stream` of `Result`s.
///
/// An `Err` item is reported as a failed pull; the stream is polled again on the
/// next pull, so a stream may recover after a failure.
pub struct TryStreamSource<S> {
    stream: Pin<Box<S>>,
    finished: bool,
}

impl<S: Stream> TryStreamSource<S> {
    /// Wraps a fallible stream.
    pub fn new(stream: S) -> Self {
        Self {
            stream: Box::pin(stream),
            finished: false,
        }
    }
}

#[async_trait]
impl<S, T> AsyncPull for TryStreamSource<S>
where
    S: Stream<Item = Result<T>> + Send,
    T: Send,
{
    type Item = T;

    async fn pull(&mut self) -> Result<Step<T>> {
        if self.finished {
            return Ok(Step::Done);
        }
        match self.stream.next().await {
            Some(Ok(value)) => Ok(Step::Value(value)),
            Some(Err(error)) => Err(error),
            None => {
                self.finished = true;
                Ok(Step::Done)
            }
        }
    }

    async fn stop(&mut self) {
        self.finished = true;
    }

    async fn abort(&mut self, _error: &PullwiseError) {
        self.finished = true;
    }
}
