// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Source capabilities consumed by pipelines and tee groups.
//!
//! A source exposes three verbs: `pull` (produce the next element or report the end),
//! `stop` (voluntary early termination) and `abort` (an external error is propagated
//! into the source). Only `pull` is mandatory.

use crate::Step;
use async_trait::async_trait;
use pullwise_error::{PullwiseError, Result};

/// A synchronous pull-based sequence.
///
/// After `pull` has returned `Ok(Step::Done)` every further call must return
/// `Ok(Step::Done)` as well.
pub trait Pull {
    /// Element type
    type Item;

    /// Produce the next element, or `Step::Done` once the sequence is exhausted.
    ///
    /// # Errors
    /// Returns an error if the source fails to produce its next element.
    fn pull(&mut self) -> Result<Step<Self::Item>>;

    /// Voluntarily terminate the sequence early.
    fn stop(&mut self) {}

    /// Propagate an external error into the sequence.
    fn abort(&mut self, _error: &PullwiseError) {}
}

/// An asynchronous pull-based sequence.
///
/// Same contract as [`Pull`], each verb may suspend.
#[async_trait]
pub trait AsyncPull: Send {
    /// Element type
    type Item: Send;

    /// Produce the next element, or `Step::Done` once the sequence is exhausted.
    ///
    /// # Errors
    /// Returns an error if the source fails to produce its next element.
    async fn pull(&mut self) -> Result<Step<Self::Item>>;

    /// Voluntarily terminate the sequence early.
    async fn stop(&mut self) {}

    /// Propagate an external error into the sequence.
    async fn abort(&mut self, _error: &PullwiseError) {}
}

/// Boxed synchronous source
pub type BoxPull<T> = Box<dyn Pull<Item = T> + Send>;

/// Boxed asynchronous source
pub type BoxAsyncPull<T> = Box<dyn AsyncPull<Item = T>>;

impl<P: Pull + ?Sized> Pull for Box<P> {
    type Item = P::Item;

    fn pull(&mut self) -> Result<Step<Self::Item>> {
        (**self).pull()
    }

    fn stop(&mut self) {
        (**self).stop();
    }

    fn abort(&mut self, error: &PullwiseError) {
        (**self).abort(error);
    }
}

#[async_trait]
impl<P: AsyncPull + ?Sized> AsyncPull for Box<P> {
    type Item = P::Item;

    async fn pull(&mut self) -> Result<Step<Self::Item>> {
        (**self).pull().await
    }

    async fn stop(&mut self) {
        (**self).stop().await;
    }

    async fn abort(&mut self, error: &PullwiseError) {
        (**self).abort(error).await;
    }
}
