// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

#![allow(clippy::multiple_crate_versions)]
//! Error types for the pullwise lazy sequence library
//!
//! Every fallible operation in the workspace returns [`PullwiseError`]. Errors are
//! `Clone` because a forked sequence re-raises the same cached failure to every fork
//! that reaches it.
//!
//! # Examples
//!
//! ```
//! use pullwise_error::{PullwiseError, Result};
//!
//! fn take_count(n: i64) -> Result<usize> {
//!     usize::try_from(n)
//!         .map_err(|_| PullwiseError::invalid_argument("take", "count must not be negative"))
//! }
//!
//! assert!(take_count(-1).is_err());
//! ```

use std::sync::Arc;

/// Root error type for all pullwise operations
#[derive(Debug, Clone, thiserror::Error)]
pub enum PullwiseError {
    /// An argument passed to a constructor or terminal operation was rejected
    ///
    /// Raised before any element is pulled from the source.
    #[error("Invalid argument to `{operation}`: {reason}")]
    InvalidArgument {
        /// Operation that rejected the argument
        operation: &'static str,
        /// Why the argument was rejected
        reason: String,
    },

    /// A user supplied callback (map, filter, for-each, reduce body) failed
    #[error("Callback failed: {0}")]
    Callback(#[source] Arc<dyn std::error::Error + Send + Sync>),

    /// Pulling from the underlying source failed
    #[error("Source error: {context}")]
    Source {
        /// Description of the source failure
        context: String,
    },

    /// An external error was propagated into the sequence via `abort`
    #[error("Sequence aborted: {context}")]
    Aborted {
        /// Description of the abort reason
        context: String,
    },

    /// Stream processing encountered an error
    ///
    /// General purpose variant, also produced when context is attached to a
    /// callback error.
    #[error("Stream processing error: {context}")]
    StreamProcessingError {
        /// Description of what went wrong during processing
        context: String,
    },
}

impl PullwiseError {
    /// Create an invalid argument error for the given operation
    pub fn invalid_argument(operation: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            operation,
            reason: reason.into(),
        }
    }

    /// Wrap a user callback error
    pub fn callback(error: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Callback(Arc::new(error))
    }

    /// Create a source error with the given context
    pub fn source_error(context: impl Into<String>) -> Self {
        Self::Source {
            context: context.into(),
        }
    }

    /// Create an abort error with the given context
    pub fn aborted(context: impl Into<String>) -> Self {
        Self::Aborted {
            context: context.into(),
        }
    }

    /// Create a stream processing error with the given context
    pub fn stream_error(context: impl Into<String>) -> Self {
        Self::StreamProcessingError {
            context: context.into(),
        }
    }

    /// Returns `true` for argument errors, which are raised before any work is done.
    #[must_use]
    pub const fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument { .. })
    }

    /// Returns `true` if the error came from a user callback
    #[must_use]
    pub const fn is_callback(&self) -> bool {
        matches!(self, Self::Callback(_))
    }
}

/// Specialized Result type for pullwise operations
pub type Result<T> = std::result::Result<T, PullwiseError>;

/// Extension trait for converting errors into `PullwiseError`
///
/// Implemented for every `std::error::Error + Send + Sync + 'static`, so fallible
/// callbacks can bubble their own error types with `?` after a single conversion.
pub trait IntoPullwiseError {
    /// Convert this error into a callback `PullwiseError`
    fn into_pullwise(self) -> PullwiseError;
}

impl<E: std::error::Error + Send + Sync + 'static> IntoPullwiseError for E {
    fn into_pullwise(self) -> PullwiseError {
        PullwiseError::callback(self)
    }
}

/// Helper trait for adding context to `Result`s
pub trait ResultExt<T> {
    /// Add context to an error
    ///
    /// The context is prefixed to the error's message. Argument, source and abort errors
    /// keep their kind; a callback error becomes a `StreamProcessingError`.
    ///
    /// # Errors
    /// Returns `Err(PullwiseError)` if the underlying result is `Err`.
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context to an error using a closure (lazy evaluation)
    ///
    /// # Errors
    /// Returns `Err(PullwiseError)` if the underlying result is `Err`.
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<PullwiseError>,
{
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| attach_context(e.into(), context.into()))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| attach_context(e.into(), f()))
    }
}

fn attach_context(error: PullwiseError, context: String) -> PullwiseError {
    match error {
        PullwiseError::InvalidArgument { operation, reason } => {
            PullwiseError::InvalidArgument {
                operation,
                reason: format!("{context}: {reason}"),
            }
        }
        PullwiseError::Callback(inner) => PullwiseError::StreamProcessingError {
            context: format!("{context}: {inner}"),
        },
        PullwiseError::Source { context: inner } => PullwiseError::Source {
            context: format!("{context}: {inner}"),
        },
        PullwiseError::Aborted { context: inner } => PullwiseError::Aborted {
            context: format!("{context}: {inner}"),
        },
        PullwiseError::StreamProcessingError { context: inner } => {
            PullwiseError::StreamProcessingError {
                context: format!("{context}: {inner}"),
            }
        }
    }
}
