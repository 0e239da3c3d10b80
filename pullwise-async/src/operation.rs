// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use futures::future::BoxFuture;
use pullwise_core::Result;

pub(crate) type MapFn<T> = Box<dyn Fn(T) -> Result<T> + Send + Sync>;
pub(crate) type FilterFn<T> = Box<dyn Fn(&T) -> Result<bool> + Send + Sync>;
pub(crate) type ForEachFn<T> = Box<dyn Fn(&T) -> Result<()> + Send + Sync>;
pub(crate) type AsyncMapFn<T> = Box<dyn Fn(T) -> BoxFuture<'static, Result<T>> + Send + Sync>;
pub(crate) type AsyncFilterFn<T> =
    Box<dyn Fn(&T) -> BoxFuture<'static, Result<bool>> + Send + Sync>;
pub(crate) type AsyncForEachFn<T> =
    Box<dyn Fn(&T) -> BoxFuture<'static, Result<()>> + Send + Sync>;

/// One lazy step attached to an [`AsyncLazyIterator`](crate::AsyncLazyIterator).
///
/// Steps are shared by every in-flight pull of a batch, hence `Fn` rather than `FnMut`.
pub(crate) enum AsyncOperation<T> {
    Map(MapFn<T>),
    Filter(FilterFn<T>),
    ForEach(ForEachFn<T>),
    MapAsync(AsyncMapFn<T>),
    FilterAsync(AsyncFilterFn<T>),
    ForEachAsync(AsyncForEachFn<T>),
}

impl<T: Send> AsyncOperation<T> {
    /// Runs `value` through this step. `None` means a filter rejected the element.
    pub(crate) async fn apply(&self, value: T) -> Result<Option<T>> {
        match self {
            AsyncOperation::Map(f) => f(value).map(Some),
            AsyncOperation::Filter(predicate) => Ok(predicate(&value)?.then_some(value)),
            AsyncOperation::ForEach(f) => {
                f(&value)?;
                Ok(Some(value))
            }
            AsyncOperation::MapAsync(f) => f(value).await.map(Some),
            AsyncOperation::FilterAsync(predicate) => {
                let keep = predicate(&value).await?;
                Ok(keep.then_some(value))
            }
            AsyncOperation::ForEachAsync(f) => {
                f(&value).await?;
                Ok(Some(value))
            }
        }
    }
}
