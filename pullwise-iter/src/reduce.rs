// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::lazy_iterator::LazyIterator;
use pullwise_core::Result;

/// One-shot fold bound to a [`LazyIterator`].
///
/// Created by [`LazyIterator::reduce`] and [`LazyIterator::try_reduce`]. Nothing is
/// pulled until [`execute`](Self::execute) drains the pipeline.
#[must_use = "a reduce does nothing until `execute` is called"]
pub struct Reduce<'a, T, A, F> {
    pipeline: &'a mut LazyIterator<T>,
    f: F,
    init: A,
}

impl<'a, T, A, F> Reduce<'a, T, A, F>
where
    T: Send + 'static,
    F: FnMut(A, T) -> Result<A>,
{
    pub(crate) fn new(pipeline: &'a mut LazyIterator<T>, f: F, init: A) -> Self {
        Self { pipeline, f, init }
    }

    /// Drains the pipeline with [`LazyIterator::collect`] and folds the elements.
    ///
    /// # Errors
    /// Propagates the first pipeline error or the first error of the fold function.
    pub fn execute(self) -> Result<A> {
        let Self {
            pipeline,
            mut f,
            init,
        } = self;
        pipeline.collect()?.into_iter().try_fold(init, &mut f)
    }
}
