// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use pullwise_core::{PullwiseError, Result, Step};
use std::collections::VecDeque;

/// Buffer and read positions shared by every fork of one tee group.
///
/// Holds exactly the elements pulled from the source that the slowest live fork has
/// not read yet. Positions are relative to the buffer head, so the buffer length is
/// always `max(position) - min(position)` over live forks.
#[derive(Debug)]
pub(crate) struct ForkBuffer<T> {
    buffer: VecDeque<T>,
    positions: Vec<usize>,
    live: Vec<bool>,
    exhausted: bool,
    error: Option<PullwiseError>,
}

impl<T: Clone> ForkBuffer<T> {
    pub(crate) fn new(count: usize) -> Self {
        Self {
            buffer: VecDeque::new(),
            positions: vec![0; count],
            live: vec![true; count],
            exhausted: false,
            error: None,
        }
    }

    /// Answers a read without the source when possible.
    ///
    /// `None` means fork `index` is at the buffer tail and the source has to be pulled.
    pub(crate) fn read(&mut self, index: usize) -> Option<Result<Step<T>>> {
        if !self.live[index] {
            return Some(Ok(Step::Done));
        }

        if let Some(value) = self.buffer.get(self.positions[index]).cloned() {
            self.advance(index);
            return Some(Ok(Step::Value(value)));
        }

        if self.exhausted {
            self.finish(index);
            return Some(Ok(Step::Done));
        }

        self.error.clone().map(Err)
    }

    /// Records the outcome of a source pull performed on behalf of fork `index`.
    pub(crate) fn record(&mut self, index: usize, pulled: Result<Step<T>>) -> Result<Step<T>> {
        match pulled {
            Ok(Step::Value(value)) => {
                self.buffer.push_back(value.clone());
                self.advance(index);
                Ok(Step::Value(value))
            }
            Ok(Step::Done) => {
                debug!("tee: source exhausted");
                self.exhausted = true;
                self.finish(index);
                Ok(Step::Done)
            }
            Err(error) => {
                warn!("tee: source failed, error cached for every fork: {}", error);
                self.error = Some(error.clone());
                Err(error)
            }
        }
    }

    fn advance(&mut self, index: usize) {
        self.positions[index] += 1;
        self.trim();
    }
}

impl<T> ForkBuffer<T> {
    /// Marks fork `index` as stopped. Idempotent.
    pub(crate) fn stop(&mut self, index: usize) {
        if self.live[index] {
            debug!("tee: fork {} stopped", index);
            self.finish(index);
        }
    }

    pub(crate) fn is_live(&self, index: usize) -> bool {
        self.live[index]
    }

    pub(crate) fn len(&self) -> usize {
        self.buffer.len()
    }

    fn finish(&mut self, index: usize) {
        self.live[index] = false;
        self.trim();
    }

    // Stopped and finished forks are ignored so they never pin the buffer.
    fn trim(&mut self) {
        let slowest = self
            .positions
            .iter()
            .zip(&self.live)
            .filter(|(_, live)| **live)
            .map(|(position, _)| *position)
            .min();

        match slowest {
            Some(0) => {}
            Some(shift) => {
                self.buffer.drain(..shift);
                for position in &mut self.positions {
                    *position = position.saturating_sub(shift);
                }
            }
            None => {
                self.buffer.clear();
                self.positions.fill(0);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trim_keeps_spread_between_fastest_and_slowest() {
        let mut buffer = ForkBuffer::new(2);

        for n in 0..3 {
            assert!(buffer.read(0).is_none());
            buffer.record(0, Ok(Step::Value(n))).unwrap();
        }
        assert_eq!(buffer.len(), 3);

        assert_eq!(buffer.read(1).unwrap().unwrap(), Step::Value(0));
        assert_eq!(buffer.len(), 2);
    }

    #[test]
    fn test_stopped_fork_does_not_pin_buffer() {
        let mut buffer = ForkBuffer::new(3);
        buffer.stop(2);

        assert!(buffer.read(0).is_none());
        buffer.record(0, Ok(Step::Value('a'))).unwrap();
        assert_eq!(buffer.read(1).unwrap().unwrap(), Step::Value('a'));

        assert_eq!(buffer.len(), 0);
        assert!(!buffer.is_live(2));
    }

    #[test]
    fn test_no_live_forks_clears_buffer() {
        let mut buffer = ForkBuffer::new(2);
        assert!(buffer.read(0).is_none());
        buffer.record(0, Ok(Step::Value(1))).unwrap();

        buffer.stop(0);
        buffer.stop(1);

        assert_eq!(buffer.len(), 0);
    }

    #[test]
    fn test_cached_error_is_sticky_at_tail() {
        let mut buffer: ForkBuffer<i32> = ForkBuffer::new(2);
        assert!(buffer.read(0).is_none());
        assert!(buffer
            .record(0, Err(PullwiseError::source_error("gone")))
            .is_err());

        assert!(buffer.read(0).unwrap().is_err());
        assert!(buffer.read(1).unwrap().is_err());
    }
}
