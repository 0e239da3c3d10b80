// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::operation::Operation;
use crate::reduce::Reduce;
use core::fmt::Debug;
use pullwise_core::args::{element_count, fork_count};
use pullwise_core::{BoxPull, IterSource, Pull, PullwiseError, Result, Step};

/// A lazy, chainable pipeline over a synchronous pull-based source.
///
/// Attaching a step (`map`, `filter`, `for_each` and their `try_` forms) records it and
/// returns the same pipeline; nothing is pulled until a terminal operation runs. Each
/// pulled element goes through the whole chain in attach order before the next one is
/// pulled.
///
/// Once the source reports `Done`, or the pipeline is stopped, every later pull reports
/// `Done` without touching the source again.
///
/// A pipeline is a single-owner builder: attach calls take `&mut self`, so two call
/// sites can never attach to the same pipeline concurrently.
///
/// # Examples
///
/// ```
/// use pullwise_iter::LazyIterator;
///
/// # fn main() -> pullwise_core::Result<()> {
/// let mut pipeline = LazyIterator::from_iterable(1..=10);
/// let evens = pipeline
///     .filter(|n| n % 2 == 0)
///     .map(|n| n * 10)
///     .take(3)?;
///
/// assert_eq!(evens, vec![20, 40, 60]);
/// # Ok(())
/// # }
/// ```
pub struct LazyIterator<T> {
    source: BoxPull<T>,
    operations: Vec<Operation<T>>,
    exhausted: bool,
}

impl<T: Send + 'static> LazyIterator<T> {
    /// Creates a pipeline over any synchronous pull source.
    pub fn new<P>(source: P) -> Self
    where
        P: Pull<Item = T> + Send + 'static,
    {
        Self {
            source: Box::new(source),
            operations: Vec::new(),
            exhausted: false,
        }
    }

    /// Creates a pipeline over anything iterable.
    pub fn from_iterable<I>(iterable: I) -> Self
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: Send + 'static,
    {
        Self::new(IterSource::new(iterable))
    }

    /// Appends an infallible transformation.
    pub fn map<F>(&mut self, mut f: F) -> &mut Self
    where
        F: FnMut(T) -> T + Send + 'static,
    {
        self.try_map(move |value| Ok(f(value)))
    }

    /// Appends a transformation that may fail.
    pub fn try_map<F>(&mut self, f: F) -> &mut Self
    where
        F: FnMut(T) -> Result<T> + Send + 'static,
    {
        self.operations.push(Operation::Map(Box::new(f)));
        self
    }

    /// Appends a filter. A rejected element is skipped, iteration continues.
    pub fn filter<P>(&mut self, mut predicate: P) -> &mut Self
    where
        P: FnMut(&T) -> bool + Send + 'static,
    {
        self.try_filter(move |value| Ok(predicate(value)))
    }

    /// Appends a filter whose predicate may fail.
    pub fn try_filter<P>(&mut self, predicate: P) -> &mut Self
    where
        P: FnMut(&T) -> Result<bool> + Send + 'static,
    {
        self.operations.push(Operation::Filter(Box::new(predicate)));
        self
    }

    /// Appends a side effect. The element passes through unchanged.
    pub fn for_each<F>(&mut self, mut f: F) -> &mut Self
    where
        F: FnMut(&T) + Send + 'static,
    {
        self.try_for_each(move |value| {
            f(value);
            Ok(())
        })
    }

    /// Appends a side effect that may fail.
    pub fn try_for_each<F>(&mut self, f: F) -> &mut Self
    where
        F: FnMut(&T) -> Result<()> + Send + 'static,
    {
        self.operations.push(Operation::ForEach(Box::new(f)));
        self
    }

    /// Continues the pipeline with a type-changing transformation.
    ///
    /// The source and every step attached so far move into the returned pipeline;
    /// `self` is left exhausted.
    pub fn map_into<U, F>(&mut self, mut f: F) -> LazyIterator<U>
    where
        U: Send + 'static,
        F: FnMut(T) -> U + Send + 'static,
    {
        self.try_map_into(move |value| Ok(f(value)))
    }

    /// Fallible form of [`map_into`](Self::map_into).
    pub fn try_map_into<U, F>(&mut self, f: F) -> LazyIterator<U>
    where
        U: Send + 'static,
        F: FnMut(T) -> Result<U> + Send + 'static,
    {
        LazyIterator::new(MapInto {
            inner: self.detach(),
            f,
        })
    }

    /// Pulls the next element that survives the whole chain.
    ///
    /// # Errors
    /// Returns the first error raised by the source or by a step. The pipeline stays
    /// usable; terminal operations mark it exhausted on error.
    pub fn next_step(&mut self) -> Result<Step<T>> {
        'pull: loop {
            if self.exhausted {
                return Ok(Step::Done);
            }

            let mut value = match self.source.pull()? {
                Step::Value(value) => value,
                Step::Done => {
                    trace!("pipeline: source exhausted");
                    self.exhausted = true;
                    return Ok(Step::Done);
                }
            };

            for operation in &mut self.operations {
                match operation.apply(value)? {
                    Some(next) => value = next,
                    None => continue 'pull,
                }
            }

            return Ok(Step::Value(value));
        }
    }

    /// Drains the pipeline into a vector.
    ///
    /// # Errors
    /// Propagates the first error and marks the pipeline exhausted. No partial result is
    /// returned.
    pub fn collect(&mut self) -> Result<Vec<T>> {
        self.terminal("collect", |pipeline| {
            let mut values = Vec::new();
            while let Step::Value(value) = pipeline.next_step()? {
                values.push(value);
            }
            Ok(values)
        })
    }

    /// Alias of [`collect`](Self::collect).
    ///
    /// # Errors
    /// See [`collect`](Self::collect).
    pub fn to_array(&mut self) -> Result<Vec<T>> {
        self.collect()
    }

    /// Collects at most `n` elements.
    ///
    /// # Errors
    /// Returns `InvalidArgument` if `n` is negative, before any element is pulled.
    /// Otherwise behaves like [`collect`](Self::collect).
    pub fn take<N>(&mut self, n: N) -> Result<Vec<T>>
    where
        N: TryInto<usize> + Copy + Debug,
    {
        let n = element_count("take", n)?;
        self.terminal("take", |pipeline| {
            let mut values = Vec::with_capacity(n.min(1024));
            while values.len() < n {
                match pipeline.next_step()? {
                    Step::Value(value) => values.push(value),
                    Step::Done => break,
                }
            }
            Ok(values)
        })
    }

    /// Skips `n` elements and collects the rest.
    ///
    /// # Errors
    /// Returns `InvalidArgument` if `n` is negative, before any element is pulled.
    /// Otherwise behaves like [`collect`](Self::collect).
    #[allow(clippy::should_implement_trait)]
    pub fn drop<N>(&mut self, n: N) -> Result<Vec<T>>
    where
        N: TryInto<usize> + Copy + Debug,
    {
        let n = element_count("drop", n)?;
        self.terminal("drop", |pipeline| {
            for _ in 0..n {
                if pipeline.next_step()?.is_done() {
                    return Ok(Vec::new());
                }
            }
            pipeline.collect()
        })
    }

    /// Collects elements up to, and excluding, the first one failing `predicate`.
    ///
    /// # Errors
    /// See [`collect`](Self::collect).
    pub fn take_while<P>(&mut self, mut predicate: P) -> Result<Vec<T>>
    where
        P: FnMut(&T) -> bool,
    {
        self.terminal("take_while", |pipeline| {
            let mut values = Vec::new();
            while let Step::Value(value) = pipeline.next_step()? {
                if !predicate(&value) {
                    break;
                }
                values.push(value);
            }
            Ok(values)
        })
    }

    /// Skips elements while `predicate` holds, then collects everything from the first
    /// failing element onward. Dropping never resumes.
    ///
    /// # Errors
    /// See [`collect`](Self::collect).
    pub fn drop_while<P>(&mut self, mut predicate: P) -> Result<Vec<T>>
    where
        P: FnMut(&T) -> bool,
    {
        self.terminal("drop_while", |pipeline| {
            let first = loop {
                match pipeline.next_step()? {
                    Step::Value(value) if predicate(&value) => continue,
                    Step::Value(value) => break value,
                    Step::Done => return Ok(Vec::new()),
                }
            };
            let mut values = vec![first];
            values.extend(pipeline.collect()?);
            Ok(values)
        })
    }

    /// Returns a one-shot executor folding every element into `init` with `f`.
    ///
    /// Nothing is pulled until [`Reduce::execute`] runs.
    pub fn reduce<A, F>(
        &mut self,
        mut f: F,
        init: A,
    ) -> Reduce<'_, T, A, impl FnMut(A, T) -> Result<A>>
    where
        F: FnMut(A, T) -> A,
    {
        Reduce::new(self, move |acc, value| Ok(f(acc, value)), init)
    }

    /// Fallible form of [`reduce`](Self::reduce).
    pub fn try_reduce<A, F>(&mut self, f: F, init: A) -> Reduce<'_, T, A, F>
    where
        F: FnMut(A, T) -> Result<A>,
    {
        Reduce::new(self, f, init)
    }

    /// Forks the pipeline into `count` independent pipelines.
    ///
    /// The source and every step attached so far feed a tee group; each fork is a fresh
    /// pipeline without steps of its own. `self` is left exhausted.
    ///
    /// An error raised by the source or by an attached step is cached by the group and
    /// reported by every later pull of every fork.
    ///
    /// # Errors
    /// Returns `InvalidArgument` if `count` is not a positive integer. The pipeline is
    /// left untouched in that case.
    pub fn tee<N>(&mut self, count: N) -> Result<Vec<LazyIterator<T>>>
    where
        T: Clone,
        N: TryInto<usize> + Copy + Debug,
    {
        let count = fork_count("tee", count)?;
        let forks = pullwise_tee::tee(self.detach(), count)?;
        Ok(forks.into_iter().map(LazyIterator::new).collect())
    }

    /// Ends the pipeline early and stops the source. Idempotent.
    pub fn stop(&mut self) {
        if !self.exhausted {
            debug!("pipeline: stopped");
            self.exhausted = true;
            self.source.stop();
        }
    }

    /// Ends the pipeline because of an external error. The source is left as is.
    pub fn abort(&mut self, error: &PullwiseError) {
        warn!("pipeline: aborted: {}", error);
        self.exhausted = true;
    }

    /// Borrowing iterator over the remaining elements.
    pub fn iter(&mut self) -> Iter<'_, T> {
        Iter { pipeline: self }
    }

    fn terminal<R, F>(&mut self, operation: &'static str, run: F) -> Result<R>
    where
        F: FnOnce(&mut Self) -> Result<R>,
    {
        run(self).inspect_err(|error| {
            warn!("pipeline: {} failed: {}", operation, error);
            self.exhausted = true;
        })
    }

    fn detach(&mut self) -> Self {
        let source = core::mem::replace(
            &mut self.source,
            Box::new(IterSource::new(core::iter::empty())),
        );
        Self {
            source,
            operations: core::mem::take(&mut self.operations),
            exhausted: core::mem::replace(&mut self.exhausted, true),
        }
    }
}

impl<T> LazyIterator<T> {
    /// Returns `true` once the pipeline will never produce another element.
    #[must_use]
    pub const fn is_exhausted(&self) -> bool {
        self.exhausted
    }
}

impl<T: Send + 'static> Pull for LazyIterator<T> {
    type Item = T;

    fn pull(&mut self) -> Result<Step<T>> {
        self.next_step()
    }

    fn stop(&mut self) {
        LazyIterator::stop(self);
    }

    fn abort(&mut self, error: &PullwiseError) {
        LazyIterator::abort(self, error);
    }
}

impl<T: Send + 'static> From<Vec<T>> for LazyIterator<T> {
    fn from(values: Vec<T>) -> Self {
        Self::from_iterable(values)
    }
}

/// Borrowing iterator returned by [`LazyIterator::iter`].
pub struct Iter<'a, T> {
    pipeline: &'a mut LazyIterator<T>,
}

impl<T: Send + 'static> Iterator for Iter<'_, T> {
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        self.pipeline.next_step().map(Step::into_option).transpose()
    }
}

/// Owning iterator returned by `LazyIterator::into_iter`.
pub struct IntoIter<T> {
    pipeline: LazyIterator<T>,
}

impl<T: Send + 'static> Iterator for IntoIter<T> {
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        self.pipeline.next_step().map(Step::into_option).transpose()
    }
}

impl<T: Send + 'static> IntoIterator for LazyIterator<T> {
    type Item = Result<T>;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter { pipeline: self }
    }
}

struct MapInto<T, F> {
    inner: LazyIterator<T>,
    f: F,
}

impl<T, U, F> Pull for MapInto<T, F>
where
    T: Send + 'static,
    F: FnMut(T) -> Result<U>,
{
    type Item = U;

    fn pull(&mut self) -> Result<Step<U>> {
        match self.inner.next_step()? {
            Step::Value(value) => (self.f)(value).map(Step::Value),
            Step::Done => Ok(Step::Done),
        }
    }

    fn stop(&mut self) {
        self.inner.stop();
    }

    fn abort(&mut self, error: &PullwiseError) {
        self.inner.abort(error);
    }
}
