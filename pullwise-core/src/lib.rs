// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]
//! Core traits and types shared by every pullwise crate.
//!
//! - [`Step`]: the two-variant result of a single pull (`Value` or `Done`)
//! - [`Settled`]: fulfilled/rejected outcome used by the settled terminal operations
//! - [`Pull`] / [`AsyncPull`]: the source capability every pipeline consumes
//! - [`sources`]: adapters from iterators, closures and `futures::Stream`s
//! - [`args`]: argument validation shared by constructors and terminals

pub mod args;
pub mod pull;
pub mod settled;
pub mod sources;
pub mod step;
pub mod sync;

pub use self::pull::{AsyncPull, BoxAsyncPull, BoxPull, Pull};
pub use self::settled::Settled;
pub use self::sources::{
    from_fn, FnSource, IterSource, StreamSource, SyncSource, TryStreamSource,
};
pub use self::step::Step;
pub use pullwise_error::{IntoPullwiseError, PullwiseError, Result, ResultExt};
