// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Test utilities and fixtures for the pullwise workspace.
//!
//! Designed for development and testing only, not for production code.
//!
//! # Key Types
//!
//! - [`CountingSource`]: synchronous source that records how often it was pulled,
//!   stopped and aborted through a shared [`SourceProbe`]
//! - [`FailingSource`]: synchronous source that fails at chosen positions
//! - [`YieldingSource`]: asynchronous source that yields to the scheduler before every
//!   element, so concurrent pulls really interleave
//! - [`TestError`] / [`test_error`]: a callback error for failure-path tests
//!
//! # Examples
//!
//! ```rust
//! use pullwise_core::{Pull, Step};
//! use pullwise_test_utils::CountingSource;
//!
//! let (mut source, probe) = CountingSource::new(vec![1]);
//! assert_eq!(source.pull().unwrap(), Step::Value(1));
//! assert_eq!(source.pull().unwrap(), Step::Done);
//! assert_eq!(probe.pulls(), 2);
//! ```

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]
pub mod error;
pub mod helpers;
pub mod probe;
pub mod sources;

pub use error::{test_error, TestError};
pub use helpers::{partition_settled, settled_values};
pub use probe::SourceProbe;
pub use sources::{CountingSource, FailingSource, YieldingSource};
