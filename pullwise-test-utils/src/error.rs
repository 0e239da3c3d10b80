// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use pullwise_core::PullwiseError;

/// Error raised by test callbacks.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("test error: {0}")]
pub struct TestError(pub String);

/// Builds a callback [`PullwiseError`] wrapping a [`TestError`].
///
/// ```rust
/// use pullwise_test_utils::test_error;
///
/// let err = test_error("even value");
/// assert!(err.is_callback());
/// assert!(err.to_string().contains("even value"));
/// ```
pub fn test_error(message: impl Into<String>) -> PullwiseError {
    PullwiseError::callback(TestError(message.into()))
}
