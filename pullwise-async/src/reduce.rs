// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::async_lazy_iterator::{AsyncLazyIterator, DEFAULT_CONCURRENCY};
use pullwise_core::Result;

/// One-shot fold bound to an [`AsyncLazyIterator`].
///
/// Created by [`AsyncLazyIterator::reduce`] and [`AsyncLazyIterator::try_reduce`].
/// Nothing is pulled until [`execute`](Self::execute) drains the pipeline.
#[must_use = "a reduce does nothing until `execute` is awaited"]
pub struct AsyncReduce<'a, T, A, F> {
    pipeline: &'a AsyncLazyIterator<T>,
    f: F,
    init: A,
}

impl<'a, T, A, F> AsyncReduce<'a, T, A, F>
where
    T: Send + 'static,
    F: FnMut(A, T) -> Result<A>,
{
    pub(crate) fn new(pipeline: &'a AsyncLazyIterator<T>, f: F, init: A) -> Self {
        Self { pipeline, f, init }
    }

    /// Drains the pipeline with `collect(DEFAULT_CONCURRENCY)` and folds the elements.
    ///
    /// # Errors
    /// Propagates the first pipeline error or the first error of the fold function.
    pub async fn execute(self) -> Result<A> {
        let Self {
            pipeline,
            mut f,
            init,
        } = self;
        let values = pipeline.collect(DEFAULT_CONCURRENCY).await?;
        values.into_iter().try_fold(init, &mut f)
    }
}
