// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Apply several independent consumers to one slice in a single pass.
//!
//! Each consumer reads its own tee fork. The forks are advanced in lockstep, one element
//! per fork per round, so the shared buffer never holds more than one element.
//!
//! ```
//! use pullwise_iter::{Consumer, FanOutExt, FanOutResult};
//!
//! # fn main() -> pullwise_core::Result<()> {
//! let results = [1, 2, 3, 4].fan_out(vec![
//!     Consumer::map(|n: i32| n * n),
//!     Consumer::filter(|n: &i32| n % 2 == 1),
//!     Consumer::reduce(|acc: i32, n: i32| acc + n, None),
//! ])?;
//!
//! assert_eq!(results[0], FanOutResult::Mapped(vec![1, 4, 9, 16]));
//! assert_eq!(results[1], FanOutResult::Filtered(vec![1, 3]));
//! assert_eq!(results[2], FanOutResult::Reduced(Some(10)));
//! # Ok(())
//! # }
//! ```
//!
//! Consumers may borrow local state for the duration of the call, which is how a
//! fan-out folds into a type other than the element type:
//!
//! ```
//! use pullwise_iter::{Consumer, FanOutExt};
//!
//! # fn main() -> pullwise_core::Result<()> {
//! let mut letters = 0usize;
//! ["ab", "cde", "f"].fan_out(vec![Consumer::for_each(|s: &&str| letters += s.len())])?;
//!
//! assert_eq!(letters, 6);
//! # Ok(())
//! # }
//! ```

use pullwise_core::{IterSource, Pull, PullwiseError, Result, Step};
use pullwise_tee::tee;

/// One consumer of a fan-out.
pub enum Consumer<'a, T> {
    /// Transforms every element.
    Map(Box<dyn FnMut(T) -> T + 'a>),
    /// Keeps the elements matching the predicate.
    Filter(Box<dyn FnMut(&T) -> bool + 'a>),
    /// Observes every element.
    ForEach(Box<dyn FnMut(&T) + 'a>),
    /// Folds every element into an accumulator of the element type.
    ///
    /// Without `init` the first element seeds the accumulator. To fold into another
    /// type, borrow the accumulator from a [`ForEach`](Consumer::ForEach) consumer, or
    /// use [`LazyIterator::reduce`](crate::LazyIterator::reduce).
    Reduce {
        f: Box<dyn FnMut(T, T) -> T + 'a>,
        init: Option<T>,
    },
}

impl<'a, T> Consumer<'a, T> {
    pub fn map(f: impl FnMut(T) -> T + 'a) -> Self {
        Self::Map(Box::new(f))
    }

    pub fn filter(predicate: impl FnMut(&T) -> bool + 'a) -> Self {
        Self::Filter(Box::new(predicate))
    }

    pub fn for_each(f: impl FnMut(&T) + 'a) -> Self {
        Self::ForEach(Box::new(f))
    }

    pub fn reduce(f: impl FnMut(T, T) -> T + 'a, init: Option<T>) -> Self {
        Self::Reduce {
            f: Box::new(f),
            init,
        }
    }
}

/// Result of one fan-out consumer, in the order the consumers were given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FanOutResult<T> {
    Mapped(Vec<T>),
    Filtered(Vec<T>),
    Visited,
    Reduced(Option<T>),
}

/// Extension trait providing [`fan_out`](FanOutExt::fan_out) on slices.
pub trait FanOutExt<T> {
    /// Runs every consumer over the elements, one tee fork per consumer.
    ///
    /// # Errors
    /// Returns `InvalidArgument` if `consumers` is empty.
    fn fan_out(&self, consumers: Vec<Consumer<'_, T>>) -> Result<Vec<FanOutResult<T>>>;
}

impl<T> FanOutExt<T> for [T]
where
    T: Clone + Send + 'static,
{
    fn fan_out(&self, consumers: Vec<Consumer<'_, T>>) -> Result<Vec<FanOutResult<T>>> {
        if consumers.is_empty() {
            return Err(PullwiseError::invalid_argument(
                "fan_out",
                "expected at least one consumer",
            ));
        }

        let mut forks = tee(IterSource::new(self.to_vec()), consumers.len())?;
        let mut states: Vec<State<'_, T>> = consumers.into_iter().map(State::new).collect();
        let mut live = forks.len();

        while live > 0 {
            for (fork, state) in forks.iter_mut().zip(&mut states) {
                if state.done {
                    continue;
                }
                match fork.pull()? {
                    Step::Value(value) => state.feed(value),
                    Step::Done => {
                        state.done = true;
                        live -= 1;
                    }
                }
            }
        }

        debug!("fan_out: {} consumers completed", states.len());
        Ok(states.into_iter().map(State::finish).collect())
    }
}

struct State<'a, T> {
    consumer: Consumer<'a, T>,
    values: Vec<T>,
    acc: Option<T>,
    done: bool,
}

impl<'a, T> State<'a, T> {
    fn new(consumer: Consumer<'a, T>) -> Self {
        Self {
            consumer,
            values: Vec::new(),
            acc: None,
            done: false,
        }
    }

    fn feed(&mut self, value: T) {
        match &mut self.consumer {
            Consumer::Map(f) => self.values.push(f(value)),
            Consumer::Filter(predicate) => {
                if predicate(&value) {
                    self.values.push(value);
                }
            }
            Consumer::ForEach(f) => f(&value),
            Consumer::Reduce { f, init } => {
                self.acc = Some(match self.acc.take().or_else(|| init.take()) {
                    Some(acc) => f(acc, value),
                    None => value,
                });
            }
        }
    }

    fn finish(self) -> FanOutResult<T> {
        match self.consumer {
            Consumer::Map(_) => FanOutResult::Mapped(self.values),
            Consumer::Filter(_) => FanOutResult::Filtered(self.values),
            Consumer::ForEach(_) => FanOutResult::Visited,
            Consumer::Reduce { init, .. } => FanOutResult::Reduced(self.acc.or(init)),
        }
    }
}
