// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Sequence forking for pull-based sources.
//!
//! A tee splits one consumable, non-replayable sequence into N cursors that can be
//! read independently and at different rates:
//!
//! - the source is pulled once per element (plus one trailing `Done`), whatever N is
//! - every cursor observes the same values in the same order
//! - memory is bounded by the distance between the fastest and the slowest live cursor,
//!   not by the length of the sequence
//! - the first source error is cached and re-raised to every cursor that reaches it
//!
//! [`tee`](crate::tee()) / [`TeeExt`] work on synchronous [`Pull`](pullwise_core::Pull)
//! sources, [`async_tee`] / [`AsyncTeeExt`] on [`AsyncPull`](pullwise_core::AsyncPull)
//! sources.

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]
#[macro_use]
mod logging;
mod fork_buffer;

pub mod async_tee;
pub mod tee;

pub use async_tee::{async_tee, AsyncTeeCursor, AsyncTeeExt};
pub use tee::{tee, TeeCursor, TeeExt};
