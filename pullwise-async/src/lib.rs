// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Asynchronous lazy pipelines over pull-based sources.
//!
//! [`AsyncLazyIterator`] mixes synchronous and asynchronous steps in one ordered chain
//! and drives it with a bounded-concurrency batch pump. Every terminal operation exists
//! in two flavors:
//!
//! | Throwing | Settled |
//! |----------|---------|
//! | `collect` | `collect_settled` |
//! | `take` | `take_settled` |
//! | `drop` | `drop_settled` |
//! | `take_while` | `take_while_settled` |
//! | `drop_while` | `drop_while_settled` |
//!
//! A throwing terminal returns either its complete result or the first rejection. A
//! settled terminal returns every outcome as a [`Settled`](pullwise_core::Settled) entry
//! and only fails on invalid arguments.

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]
#[macro_use]
mod logging;
mod operation;

pub mod async_lazy_iterator;
pub mod reduce;

pub use async_lazy_iterator::{AsyncLazyIterator, DEFAULT_CONCURRENCY};
pub use reduce::AsyncReduce;
