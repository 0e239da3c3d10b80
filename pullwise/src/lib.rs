// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! # Pullwise
//!
//! Lazy, chainable processing of pull-based sequences.
//!
//! ## Overview
//!
//! - [`LazyIterator`]: synchronous pipeline of `map` / `filter` / `for_each` steps with
//!   `collect`, `take`, `drop`, `take_while`, `drop_while` and `reduce` terminals
//! - [`AsyncLazyIterator`]: the asynchronous counterpart, mixing sync and async steps,
//!   pulling in bounded-concurrency batches and offering `_settled` terminals that
//!   report every failure instead of stopping at the first one
//! - [`tee`] / [`async_tee`]: fork one consumable sequence into independent cursors over
//!   a shared buffer bounded by the spread between the fastest and the slowest cursor
//! - [`FanOutExt`]: run several consumers over one slice in a single pass
//!
//! Sources are anything implementing [`Pull`] or [`AsyncPull`]; adapters cover
//! iterators, closures and `futures::Stream`s.
//!
//! ## Quick Start
//!
//! ```rust
//! use pullwise::prelude::*;
//!
//! # #[tokio::main]
//! # async fn main() -> pullwise::Result<()> {
//! let mut words = LazyIterator::from_iterable(vec!["tee", "pull", "lazy", "fork"]);
//! words.filter(|w| w.len() == 4);
//! let mut forks = words.tee(2)?;
//!
//! let upper = forks[0].map_into(str::to_uppercase).collect()?;
//! let first = forks[1].take(1)?;
//! assert_eq!(upper, vec!["PULL", "LAZY", "FORK"]);
//! assert_eq!(first, vec!["pull"]);
//!
//! let mut lengths = AsyncLazyIterator::from_iterable(vec![1, 2, 3]);
//! lengths.map_async(|n| async move { n * 2 });
//! assert_eq!(lengths.collect(DEFAULT_CONCURRENCY).await?, vec![2, 4, 6]);
//! # Ok(())
//! # }
//! ```

pub use pullwise_async::{AsyncLazyIterator, AsyncReduce, DEFAULT_CONCURRENCY};
pub use pullwise_core::{
    from_fn, AsyncPull, BoxAsyncPull, BoxPull, FnSource, IntoPullwiseError, IterSource, Pull,
    PullwiseError, Result, ResultExt, Settled, Step, StreamSource, SyncSource,
    TryStreamSource,
};
pub use pullwise_iter::{Consumer, FanOutExt, FanOutResult, LazyIterator, Reduce};
pub use pullwise_tee::{async_tee, tee, AsyncTeeCursor, AsyncTeeExt, TeeCursor, TeeExt};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        AsyncLazyIterator, AsyncPull, Consumer, FanOutExt, FanOutResult, LazyIterator, Pull,
        PullwiseError, Settled, Step, DEFAULT_CONCURRENCY,
    };
}
