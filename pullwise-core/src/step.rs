// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

/// The outcome of a single successful pull: either a value or the end of the sequence.
///
/// `Done` is a distinct variant rather than a flag next to an optional value, so the
/// end of a sequence can never be mistaken for a legitimate value. Once a source has
/// produced `Done` it never produces a value again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step<T> {
    /// The next element of the sequence
    Value(T),
    /// The sequence is exhausted
    Done,
}

impl<T> Step<T> {
    /// Returns `true` if this is a `Value`.
    pub const fn is_value(&self) -> bool {
        matches!(self, Step::Value(_))
    }

    /// Returns `true` if this is `Done`.
    pub const fn is_done(&self) -> bool {
        matches!(self, Step::Done)
    }

    /// Converts from `Step<T>` to `Option<T>`.
    pub fn into_option(self) -> Option<T> {
        match self {
            Step::Value(v) => Some(v),
            Step::Done => None,
        }
    }

    /// Converts from `&Step<T>` to `Step<&T>`.
    pub const fn as_ref(&self) -> Step<&T> {
        match self {
            Step::Value(v) => Step::Value(v),
            Step::Done => Step::Done,
        }
    }

    /// Maps the contained value, leaving `Done` untouched.
    pub fn map<U, F>(self, f: F) -> Step<U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            Step::Value(v) => Step::Value(f(v)),
            Step::Done => Step::Done,
        }
    }
}

impl<T> From<Option<T>> for Step<T> {
    fn from(option: Option<T>) -> Self {
        option.map_or(Step::Done, Step::Value)
    }
}

impl<T> From<Step<T>> for Option<T> {
    fn from(step: Step<T>) -> Self {
        step.into_option()
    }
}
