// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use pullwise_error::{PullwiseError, Result};

/// The outcome of one pull as observed by a settled terminal operation.
///
/// Settled operations never fail because of an element: each failure is kept as a
/// `Rejected` entry next to the `Fulfilled` ones, in pull order.
#[derive(Debug, Clone)]
pub enum Settled<T> {
    /// The pull succeeded
    Fulfilled(T),
    /// The pull failed
    Rejected(PullwiseError),
}

impl<T: PartialEq> PartialEq for Settled<T> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Settled::Fulfilled(a), Settled::Fulfilled(b)) => a == b,
            _ => false, // Rejections are never equal
        }
    }
}

impl<T> Settled<T> {
    /// Returns `true` if this is `Fulfilled`.
    pub const fn is_fulfilled(&self) -> bool {
        matches!(self, Settled::Fulfilled(_))
    }

    /// Returns `true` if this is `Rejected`.
    pub const fn is_rejected(&self) -> bool {
        matches!(self, Settled::Rejected(_))
    }

    /// Converts to `Option<T>`, discarding the rejection reason.
    pub fn ok(self) -> Option<T> {
        match self {
            Settled::Fulfilled(v) => Some(v),
            Settled::Rejected(_) => None,
        }
    }

    /// Converts to `Option<PullwiseError>`, discarding the value.
    pub fn err(self) -> Option<PullwiseError> {
        match self {
            Settled::Fulfilled(_) => None,
            Settled::Rejected(e) => Some(e),
        }
    }

    /// Maps the fulfilled value, rejections pass through unchanged.
    pub fn map<U, F>(self, f: F) -> Settled<U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            Settled::Fulfilled(v) => Settled::Fulfilled(f(v)),
            Settled::Rejected(e) => Settled::Rejected(e),
        }
    }

    /// Converts back into a `Result`.
    ///
    /// # Errors
    /// Returns the rejection reason for `Rejected`.
    pub fn into_result(self) -> Result<T> {
        self.into()
    }
}

impl<T> From<Result<T>> for Settled<T> {
    fn from(result: Result<T>) -> Self {
        match result {
            Ok(v) => Settled::Fulfilled(v),
            Err(e) => Settled::Rejected(e),
        }
    }
}

impl<T> From<Settled<T>> for Result<T> {
    fn from(settled: Settled<T>) -> Self {
        match settled {
            Settled::Fulfilled(v) => Ok(v),
            Settled::Rejected(e) => Err(e),
        }
    }
}
