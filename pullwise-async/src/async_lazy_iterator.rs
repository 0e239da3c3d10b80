// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::operation::AsyncOperation;
use crate::reduce::AsyncReduce;
use async_trait::async_trait;
use core::fmt::Debug;
use core::future::Future;
use core::ops::ControlFlow;
use core::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use futures::future::{join_all, BoxFuture};
use futures::stream::{self, Stream};
use pullwise_core::args::{self, element_count, fork_count};
use pullwise_core::sync::AsyncMutex;
use pullwise_core::{
    AsyncPull, BoxAsyncPull, IterSource, Pull, PullwiseError, Result, Settled, Step,
    StreamSource, SyncSource, TryStreamSource,
};
use pullwise_tee::async_tee;

/// Batch width used when a caller has no reason to pull concurrently.
pub const DEFAULT_CONCURRENCY: usize = 1;

/// A lazy, chainable pipeline over an asynchronous pull-based source.
///
/// Steps may be synchronous (`map`, `filter`, `for_each`) or asynchronous (`map_async`,
/// `filter_async`, `for_each_async`); both kinds are awaited uniformly, in attach order,
/// for every element.
///
/// Every terminal operation takes a `concurrency` width `W` and drives the pipeline with
/// the batch [`pump`](Self::pump): `W` pulls are issued together, all of them are awaited,
/// and their outcomes are processed in issue order before the next batch starts. With
/// `W > 1` up to `W - 1` elements past a stop condition may be pulled and discarded.
///
/// Throwing terminals (`collect`, `take`, ...) return the first rejection of a batch and
/// leave the pipeline exhausted. Their `_settled` counterparts never fail because of an
/// element: each failure is reported as a [`Settled::Rejected`] entry.
///
/// # Examples
///
/// ```
/// use pullwise_async::{AsyncLazyIterator, DEFAULT_CONCURRENCY};
///
/// # #[tokio::main]
/// # async fn main() -> pullwise_core::Result<()> {
/// let mut pipeline = AsyncLazyIterator::from_iterable(1..=6);
/// pipeline
///     .filter(|n| n % 2 == 0)
///     .map_async(|n| async move { n * 100 });
///
/// assert_eq!(pipeline.collect(DEFAULT_CONCURRENCY).await?, vec![200, 400, 600]);
/// # Ok(())
/// # }
/// ```
pub struct AsyncLazyIterator<T> {
    source: AsyncMutex<BoxAsyncPull<T>>,
    operations: Vec<AsyncOperation<T>>,
    exhausted: AtomicBool,
    // Raw source pulls so far; taken under the source lock to order batch outcomes.
    pulls: AtomicUsize,
}

impl<T: Send + 'static> AsyncLazyIterator<T> {
    /// Creates a pipeline over any asynchronous pull source.
    pub fn new<P>(source: P) -> Self
    where
        P: AsyncPull<Item = T> + 'static,
    {
        Self {
            source: AsyncMutex::new(Box::new(source)),
            operations: Vec::new(),
            exhausted: AtomicBool::new(false),
            pulls: AtomicUsize::new(0),
        }
    }

    /// Creates a pipeline over a synchronous pull source.
    pub fn from_pull<P>(source: P) -> Self
    where
        P: Pull<Item = T> + Send + 'static,
    {
        Self::new(SyncSource::new(source))
    }

    /// Creates a pipeline over anything iterable.
    pub fn from_iterable<I>(iterable: I) -> Self
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: Send + 'static,
    {
        Self::from_pull(IterSource::new(iterable))
    }

    /// Creates a pipeline over a stream of values.
    pub fn from_stream<S>(stream: S) -> Self
    where
        S: Stream<Item = T> + Send + 'static,
    {
        Self::new(StreamSource::new(stream))
    }

    /// Creates a pipeline over a stream of results. An `Err` item is a failed pull.
    pub fn from_try_stream<S>(stream: S) -> Self
    where
        S: Stream<Item = Result<T>> + Send + 'static,
    {
        Self::new(TryStreamSource::new(stream))
    }

    /// Appends a synchronous transformation.
    pub fn map<F>(&mut self, f: F) -> &mut Self
    where
        F: Fn(T) -> T + Send + Sync + 'static,
    {
        self.try_map(move |value| Ok(f(value)))
    }

    /// Appends a synchronous transformation that may fail.
    pub fn try_map<F>(&mut self, f: F) -> &mut Self
    where
        F: Fn(T) -> Result<T> + Send + Sync + 'static,
    {
        self.push(AsyncOperation::Map(Box::new(f)))
    }

    /// Appends a synchronous filter.
    pub fn filter<P>(&mut self, predicate: P) -> &mut Self
    where
        P: Fn(&T) -> bool + Send + Sync + 'static,
    {
        self.try_filter(move |value| Ok(predicate(value)))
    }

    /// Appends a synchronous filter whose predicate may fail.
    pub fn try_filter<P>(&mut self, predicate: P) -> &mut Self
    where
        P: Fn(&T) -> Result<bool> + Send + Sync + 'static,
    {
        self.push(AsyncOperation::Filter(Box::new(predicate)))
    }

    /// Appends a synchronous side effect.
    pub fn for_each<F>(&mut self, f: F) -> &mut Self
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        self.try_for_each(move |value| {
            f(value);
            Ok(())
        })
    }

    /// Appends a synchronous side effect that may fail.
    pub fn try_for_each<F>(&mut self, f: F) -> &mut Self
    where
        F: Fn(&T) -> Result<()> + Send + Sync + 'static,
    {
        self.push(AsyncOperation::ForEach(Box::new(f)))
    }

    /// Appends an asynchronous transformation.
    pub fn map_async<F, Fut>(&mut self, f: F) -> &mut Self
    where
        F: Fn(T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = T> + Send + 'static,
    {
        self.try_map_async(move |value| {
            let pending = f(value);
            async move { Ok(pending.await) }
        })
    }

    /// Appends an asynchronous transformation that may fail.
    pub fn try_map_async<F, Fut>(&mut self, f: F) -> &mut Self
    where
        F: Fn(T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        self.push(AsyncOperation::MapAsync(Box::new(
            move |value: T| -> BoxFuture<'static, Result<T>> { Box::pin(f(value)) },
        )))
    }

    /// Appends an asynchronous filter.
    ///
    /// The returned future must own what it needs; copy or clone out of the reference.
    pub fn filter_async<P, Fut>(&mut self, predicate: P) -> &mut Self
    where
        P: Fn(&T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = bool> + Send + 'static,
    {
        self.try_filter_async(move |value: &T| {
            let pending = predicate(value);
            async move { Ok(pending.await) }
        })
    }

    /// Appends an asynchronous filter whose predicate may fail.
    pub fn try_filter_async<P, Fut>(&mut self, predicate: P) -> &mut Self
    where
        P: Fn(&T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<bool>> + Send + 'static,
    {
        self.push(AsyncOperation::FilterAsync(Box::new(
            move |value: &T| -> BoxFuture<'static, Result<bool>> { Box::pin(predicate(value)) },
        )))
    }

    /// Appends an asynchronous side effect.
    pub fn for_each_async<F, Fut>(&mut self, f: F) -> &mut Self
    where
        F: Fn(&T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.try_for_each_async(move |value: &T| {
            let pending = f(value);
            async move {
                pending.await;
                Ok(())
            }
        })
    }

    /// Appends an asynchronous side effect that may fail.
    pub fn try_for_each_async<F, Fut>(&mut self, f: F) -> &mut Self
    where
        F: Fn(&T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        self.push(AsyncOperation::ForEachAsync(Box::new(
            move |value: &T| -> BoxFuture<'static, Result<()>> { Box::pin(f(value)) },
        )))
    }

    fn push(&mut self, operation: AsyncOperation<T>) -> &mut Self {
        self.operations.push(operation);
        self
    }

    /// Pulls the next element that survives the whole chain.
    ///
    /// Several calls may be in flight at once: only the raw source pull is serialized,
    /// the steps of different elements interleave at their await points.
    ///
    /// # Errors
    /// Returns the first error raised by the source or by a step. The pipeline stays
    /// usable; terminal operations mark it exhausted on error.
    pub async fn next_step(&self) -> Result<Step<T>> {
        let mut ticket = usize::MAX;
        self.next_ticketed(&mut ticket).await
    }

    /// Same as [`next_step`](Self::next_step); `ticket` receives the position of the raw
    /// source pull behind the outcome, and stays untouched if the source was not pulled.
    async fn next_ticketed(&self, ticket: &mut usize) -> Result<Step<T>> {
        'pull: loop {
            if self.is_exhausted() {
                return Ok(Step::Done);
            }

            let mut value = {
                let mut source = self.source.lock().await;
                // A concurrent pull may have reached the end while we waited.
                if self.is_exhausted() {
                    return Ok(Step::Done);
                }
                *ticket = self.pulls.fetch_add(1, Ordering::Relaxed);
                match source.pull().await? {
                    Step::Value(value) => value,
                    Step::Done => {
                        trace!("async pipeline: source exhausted");
                        self.exhausted.store(true, Ordering::Release);
                        return Ok(Step::Done);
                    }
                }
            };

            for operation in &self.operations {
                match operation.apply(value).await? {
                    Some(next) => value = next,
                    None => continue 'pull,
                }
            }

            return Ok(Step::Value(value));
        }
    }

    /// Issues `width` pulls at once, awaits all of them and returns their outcomes in
    /// source order. No outcome masks another: each one is reported.
    ///
    /// Slots may win the source lock in any order, so outcomes are sorted by the raw
    /// source pull that produced them before they are returned.
    ///
    /// # Errors
    /// Returns `InvalidArgument` if `width` is zero.
    pub async fn pump(&self, width: usize) -> Result<Vec<Settled<Step<T>>>> {
        let width = args::concurrency("pump", width)?;
        trace!("async pipeline: pumping batch of {}", width);
        let mut batch = join_all((0..width).map(|_| async move {
            let mut ticket = usize::MAX;
            let outcome = self.next_ticketed(&mut ticket).await;
            (ticket, outcome)
        }))
        .await;
        batch.sort_by_key(|(ticket, _)| *ticket);
        Ok(batch
            .into_iter()
            .map(|(_, outcome)| Settled::from(outcome))
            .collect())
    }

    /// Drains the pipeline into a vector.
    ///
    /// # Errors
    /// Returns `InvalidArgument` if `concurrency` is zero. Otherwise propagates the first
    /// rejection and marks the pipeline exhausted.
    pub async fn collect(&self, concurrency: usize) -> Result<Vec<T>> {
        let width = args::concurrency("collect", concurrency)?;
        let mut values = Vec::new();
        self.terminal(
            "collect",
            self.drain_values(width, |value| {
                values.push(value);
                ControlFlow::Continue(())
            }),
        )
        .await?;
        Ok(values)
    }

    /// Drains the pipeline, reporting every pull outcome instead of failing.
    ///
    /// Runs until the source reports the end. A source that keeps failing, like a tee
    /// fork whose group cached an error, keeps adding rejected entries and the drain
    /// never returns.
    ///
    /// # Errors
    /// Returns `InvalidArgument` if `concurrency` is zero.
    pub async fn collect_settled(&self, concurrency: usize) -> Result<Vec<Settled<T>>> {
        let width = args::concurrency("collect_settled", concurrency)?;
        let mut entries = Vec::new();
        self.drain(width, |entry| {
            entries.push(entry);
            Ok(ControlFlow::Continue(()))
        })
        .await?;
        Ok(entries)
    }

    /// Collects at most `n` elements.
    ///
    /// # Errors
    /// Returns `InvalidArgument` if `n` is negative or `concurrency` is zero, before any
    /// element is pulled. Otherwise behaves like [`collect`](Self::collect).
    pub async fn take<N>(&self, n: N, concurrency: usize) -> Result<Vec<T>>
    where
        N: TryInto<usize> + Copy + Debug,
    {
        let n = element_count("take", n)?;
        let width = args::concurrency("take", concurrency)?;
        let mut values = Vec::new();
        if n > 0 {
            self.terminal(
                "take",
                self.drain_values(width, |value| {
                    values.push(value);
                    until(values.len() >= n)
                }),
            )
            .await?;
        }
        values.truncate(n);
        Ok(values)
    }

    /// Collects at most `n` settled entries; rejections count towards `n`.
    ///
    /// # Errors
    /// Returns `InvalidArgument` if `n` is negative or `concurrency` is zero.
    pub async fn take_settled<N>(&self, n: N, concurrency: usize) -> Result<Vec<Settled<T>>>
    where
        N: TryInto<usize> + Copy + Debug,
    {
        let n = element_count("take_settled", n)?;
        let width = args::concurrency("take_settled", concurrency)?;
        let mut entries = Vec::new();
        if n > 0 {
            self.drain(width, |entry| {
                entries.push(entry);
                Ok(until(entries.len() >= n))
            })
            .await?;
        }
        entries.truncate(n);
        Ok(entries)
    }

    /// Skips `n` elements and collects the rest.
    ///
    /// # Errors
    /// Returns `InvalidArgument` if `n` is negative or `concurrency` is zero. Otherwise
    /// behaves like [`collect`](Self::collect).
    #[allow(clippy::should_implement_trait)]
    pub async fn drop<N>(&self, n: N, concurrency: usize) -> Result<Vec<T>>
    where
        N: TryInto<usize> + Copy + Debug,
    {
        let n = element_count("drop", n)?;
        let width = args::concurrency("drop", concurrency)?;
        let mut skipped = 0;
        let mut values = Vec::new();
        self.terminal(
            "drop",
            self.drain_values(width, |value| {
                if skipped < n {
                    skipped += 1;
                } else {
                    values.push(value);
                }
                ControlFlow::Continue(())
            }),
        )
        .await?;
        Ok(values)
    }

    /// Skips `n` fulfilled elements and reports every remaining outcome.
    ///
    /// Rejections seen while skipping are reported too.
    ///
    /// # Errors
    /// Returns `InvalidArgument` if `n` is negative or `concurrency` is zero.
    pub async fn drop_settled<N>(&self, n: N, concurrency: usize) -> Result<Vec<Settled<T>>>
    where
        N: TryInto<usize> + Copy + Debug,
    {
        let n = element_count("drop_settled", n)?;
        let width = args::concurrency("drop_settled", concurrency)?;
        let mut skipped = 0;
        let mut entries = Vec::new();
        self.drain(width, |entry| {
            match entry {
                Settled::Fulfilled(_) if skipped < n => skipped += 1,
                entry => entries.push(entry),
            }
            Ok(ControlFlow::Continue(()))
        })
        .await?;
        Ok(entries)
    }

    /// Collects elements up to, and excluding, the first one failing `predicate`.
    ///
    /// # Errors
    /// Returns `InvalidArgument` if `concurrency` is zero. Otherwise behaves like
    /// [`collect`](Self::collect).
    pub async fn take_while<P>(&self, mut predicate: P, concurrency: usize) -> Result<Vec<T>>
    where
        P: FnMut(&T) -> bool,
    {
        let width = args::concurrency("take_while", concurrency)?;
        let mut values = Vec::new();
        self.terminal(
            "take_while",
            self.drain_values(width, |value| {
                if !predicate(&value) {
                    return ControlFlow::Break(());
                }
                values.push(value);
                ControlFlow::Continue(())
            }),
        )
        .await?;
        Ok(values)
    }

    /// Reports outcomes up to, and excluding, the first fulfilled value failing
    /// `predicate`.
    ///
    /// # Errors
    /// Returns `InvalidArgument` if `concurrency` is zero.
    pub async fn take_while_settled<P>(
        &self,
        mut predicate: P,
        concurrency: usize,
    ) -> Result<Vec<Settled<T>>>
    where
        P: FnMut(&T) -> bool,
    {
        let width = args::concurrency("take_while_settled", concurrency)?;
        let mut entries = Vec::new();
        self.drain(width, |entry| {
            if let Settled::Fulfilled(value) = &entry {
                if !predicate(value) {
                    return Ok(ControlFlow::Break(()));
                }
            }
            entries.push(entry);
            Ok(ControlFlow::Continue(()))
        })
        .await?;
        Ok(entries)
    }

    /// Skips elements while `predicate` holds, then collects everything from the first
    /// failing element onward. Dropping never resumes.
    ///
    /// # Errors
    /// Returns `InvalidArgument` if `concurrency` is zero. Otherwise behaves like
    /// [`collect`](Self::collect).
    pub async fn drop_while<P>(&self, mut predicate: P, concurrency: usize) -> Result<Vec<T>>
    where
        P: FnMut(&T) -> bool,
    {
        let width = args::concurrency("drop_while", concurrency)?;
        let mut dropping = true;
        let mut values = Vec::new();
        self.terminal(
            "drop_while",
            self.drain_values(width, |value| {
                dropping = dropping && predicate(&value);
                if !dropping {
                    values.push(value);
                }
                ControlFlow::Continue(())
            }),
        )
        .await?;
        Ok(values)
    }

    /// Skips fulfilled values while `predicate` holds, then reports every remaining
    /// outcome. Rejections are always reported.
    ///
    /// # Errors
    /// Returns `InvalidArgument` if `concurrency` is zero.
    pub async fn drop_while_settled<P>(
        &self,
        mut predicate: P,
        concurrency: usize,
    ) -> Result<Vec<Settled<T>>>
    where
        P: FnMut(&T) -> bool,
    {
        let width = args::concurrency("drop_while_settled", concurrency)?;
        let mut dropping = true;
        let mut entries = Vec::new();
        self.drain(width, |entry| {
            if let Settled::Fulfilled(value) = &entry {
                dropping = dropping && predicate(value);
            }
            if !(dropping && entry.is_fulfilled()) {
                entries.push(entry);
            }
            Ok(ControlFlow::Continue(()))
        })
        .await?;
        Ok(entries)
    }

    /// Returns a one-shot executor folding every element into `init` with `f`.
    pub fn reduce<A, F>(
        &self,
        mut f: F,
        init: A,
    ) -> AsyncReduce<'_, T, A, impl FnMut(A, T) -> Result<A>>
    where
        F: FnMut(A, T) -> A,
    {
        AsyncReduce::new(self, move |acc, value| Ok(f(acc, value)), init)
    }

    /// Fallible form of [`reduce`](Self::reduce).
    pub fn try_reduce<A, F>(&self, f: F, init: A) -> AsyncReduce<'_, T, A, F>
    where
        F: FnMut(A, T) -> Result<A>,
    {
        AsyncReduce::new(self, f, init)
    }

    /// Forks the pipeline into `count` independent pipelines over one async tee group.
    ///
    /// `self` is left exhausted.
    ///
    /// Errors raised upstream of the fork are cached by the group: every later pull of
    /// every fork reports the same error and no fork reaches the end. A settled drain
    /// such as [`collect_settled`](Self::collect_settled) over such a fork never returns;
    /// bound it with [`take_settled`](Self::take_settled), or attach fallible steps to the
    /// forks instead.
    ///
    /// # Errors
    /// Returns `InvalidArgument` if `count` is not a positive integer. The pipeline is
    /// left untouched in that case.
    pub fn tee<N>(&mut self, count: N) -> Result<Vec<AsyncLazyIterator<T>>>
    where
        T: Clone,
        N: TryInto<usize> + Copy + Debug,
    {
        let count = fork_count("tee", count)?;
        let forks = async_tee(self.detach(), count)?;
        Ok(forks.into_iter().map(AsyncLazyIterator::new).collect())
    }

    /// Ends the pipeline early and stops the source. Idempotent.
    pub async fn stop(&self) {
        if !self.exhausted.swap(true, Ordering::AcqRel) {
            debug!("async pipeline: stopped");
            self.source.lock().await.stop().await;
        }
    }

    /// Ends the pipeline because of an external error. The source is left as is.
    pub fn abort(&self, error: &PullwiseError) {
        warn!("async pipeline: aborted: {}", error);
        self.exhausted.store(true, Ordering::Release);
    }

    /// Converts the pipeline into a `Stream` of results, one per surviving element.
    pub fn into_stream(self) -> impl Stream<Item = Result<T>> + Send {
        stream::unfold(self, |pipeline| async move {
            match pipeline.next_step().await {
                Ok(Step::Value(value)) => Some((Ok(value), pipeline)),
                Ok(Step::Done) => None,
                Err(error) => Some((Err(error), pipeline)),
            }
        })
    }

    async fn terminal<F>(&self, operation: &'static str, run: F) -> Result<()>
    where
        F: Future<Output = Result<()>>,
    {
        run.await.inspect_err(|error| {
            warn!("async pipeline: {} failed: {}", operation, error);
            self.exhausted.store(true, Ordering::Release);
        })
    }

    /// Feeds every non-`Done` outcome to `visit`, batch after batch, until the source
    /// is done, `visit` breaks or `visit` fails.
    async fn drain<V>(&self, width: usize, mut visit: V) -> Result<()>
    where
        V: FnMut(Settled<T>) -> Result<ControlFlow<()>>,
    {
        loop {
            for outcome in self.pump(width).await? {
                let entry = match outcome {
                    Settled::Fulfilled(Step::Done) => return Ok(()),
                    Settled::Fulfilled(Step::Value(value)) => Settled::Fulfilled(value),
                    Settled::Rejected(error) => Settled::Rejected(error),
                };
                if visit(entry)?.is_break() {
                    return Ok(());
                }
            }
        }
    }

    async fn drain_values<V>(&self, width: usize, mut visit: V) -> Result<()>
    where
        V: FnMut(T) -> ControlFlow<()>,
    {
        self.drain(width, |entry| match entry {
            Settled::Fulfilled(value) => Ok(visit(value)),
            Settled::Rejected(error) => Err(error),
        })
        .await
    }

    fn detach(&mut self) -> Self {
        let empty: BoxAsyncPull<T> =
            Box::new(SyncSource::new(IterSource::new(core::iter::empty())));
        Self {
            source: core::mem::replace(&mut self.source, AsyncMutex::new(empty)),
            operations: core::mem::take(&mut self.operations),
            exhausted: AtomicBool::new(self.exhausted.swap(true, Ordering::AcqRel)),
            pulls: AtomicUsize::new(0),
        }
    }
}

impl<T> AsyncLazyIterator<T> {
    /// Returns `true` once the pipeline will never produce another element.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.exhausted.load(Ordering::Acquire)
    }
}

#[async_trait]
impl<T: Send + 'static> AsyncPull for AsyncLazyIterator<T> {
    type Item = T;

    async fn pull(&mut self) -> Result<Step<T>> {
        self.next_step().await
    }

    async fn stop(&mut self) {
        AsyncLazyIterator::stop(self).await;
    }

    async fn abort(&mut self, error: &PullwiseError) {
        AsyncLazyIterator::abort(self, error);
    }
}

impl<T: Send + 'static> From<Vec<T>> for AsyncLazyIterator<T> {
    fn from(values: Vec<T>) -> Self {
        Self::from_iterable(values)
    }
}

const fn until(done: bool) -> ControlFlow<()> {
    if done {
        ControlFlow::Break(())
    } else {
        ControlFlow::Continue(())
    }
}
