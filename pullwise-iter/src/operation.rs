// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use pullwise_core::Result;

pub(crate) type MapFn<T> = Box<dyn FnMut(T) -> Result<T> + Send>;
pub(crate) type FilterFn<T> = Box<dyn FnMut(&T) -> Result<bool> + Send>;
pub(crate) type ForEachFn<T> = Box<dyn FnMut(&T) -> Result<()> + Send>;

/// One lazy step attached to a [`LazyIterator`](crate::LazyIterator).
pub(crate) enum Operation<T> {
    Map(MapFn<T>),
    Filter(FilterFn<T>),
    ForEach(ForEachFn<T>),
}

impl<T> Operation<T> {
    /// Runs `value` through this step. `None` means a filter rejected the element.
    pub(crate) fn apply(&mut self, value: T) -> Result<Option<T>> {
        match self {
            Operation::Map(f) => f(value).map(Some),
            Operation::Filter(predicate) => Ok(predicate(&value)?.then_some(value)),
            Operation::ForEach(f) => {
                f(&value)?;
                Ok(Some(value))
            }
        }
    }
}
