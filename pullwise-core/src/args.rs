// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Argument validation shared by constructors and terminal operations.
//!
//! Counts are accepted as any integer type so a negative count reaches the library and
//! is rejected with [`PullwiseError::InvalidArgument`] instead of wrapping around.

use core::fmt::Debug;
use pullwise_error::{PullwiseError, Result};

/// Validates an element count (`take`, `drop`).
///
/// # Errors
/// Returns `InvalidArgument` if `n` is negative or does not fit in `usize`.
pub fn element_count<N>(operation: &'static str, n: N) -> Result<usize>
where
    N: TryInto<usize> + Copy + Debug,
{
    n.try_into().map_err(|_| {
        PullwiseError::invalid_argument(
            operation,
            format!("expected a non-negative element count, got {n:?}"),
        )
    })
}

/// Validates a fork count (`tee`). Zero forks is rejected.
///
/// # Errors
/// Returns `InvalidArgument` if `n` is not a positive integer.
pub fn fork_count<N>(operation: &'static str, n: N) -> Result<usize>
where
    N: TryInto<usize> + Copy + Debug,
{
    match n.try_into() {
        Ok(count) if count > 0 => Ok(count),
        _ => Err(PullwiseError::invalid_argument(
            operation,
            format!("expected a positive fork count, got {n:?}"),
        )),
    }
}

/// Validates a batch width (`concurrency`). Zero is rejected.
///
/// # Errors
/// Returns `InvalidArgument` if `width` is zero.
pub fn concurrency(operation: &'static str, width: usize) -> Result<usize> {
    if width == 0 {
        return Err(PullwiseError::invalid_argument(
            operation,
            "concurrency must be at least 1",
        ));
    }
    Ok(width)
}
