// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Synchronous lazy pipelines over pull-based sources.
//!
//! A [`LazyIterator`] owns one [`Pull`](pullwise_core::Pull) source and an ordered list
//! of lazy steps (`map`, `filter`, `for_each`). Terminal operations (`collect`, `take`,
//! `drop`, `take_while`, `drop_while`, `reduce`) drive the pipeline one element at a
//! time; `tee` forks it into independent pipelines over a bounded shared buffer.
//!
//! # Error semantics
//!
//! - a terminal either returns its complete result or the first error, never both
//! - a terminal that fails leaves the pipeline exhausted
//! - negative counts are rejected with `InvalidArgument` before anything is pulled

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]
#[macro_use]
mod logging;
mod operation;

pub mod fan_out;
pub mod lazy_iterator;
pub mod reduce;

pub use fan_out::{Consumer, FanOutExt, FanOutResult};
pub use lazy_iterator::{IntoIter, Iter, LazyIterator};
pub use reduce::Reduce;
