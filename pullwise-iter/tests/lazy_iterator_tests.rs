// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use pullwise_core::{from_fn, Pull, PullwiseError, Step};
use pullwise_iter::LazyIterator;
use pullwise_test_utils::{test_error, CountingSource, FailingSource};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

#[test]
fn test_attaching_steps_pulls_nothing() -> anyhow::Result<()> {
    // Arrange
    let (source, probe) = CountingSource::new(vec![1, 2, 3]);
    let calls = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&calls);

    // Act
    let mut pipeline = LazyIterator::new(source);
    pipeline
        .map(move |n| {
            seen.fetch_add(1, Ordering::SeqCst);
            n + 1
        })
        .filter(|n| *n > 0);

    // Assert
    assert_eq!(probe.pulls(), 0);
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    assert_eq!(pipeline.collect()?, vec![2, 3, 4]);
    assert_eq!(calls.load(Ordering::SeqCst), 3);
    Ok(())
}

#[test]
fn test_steps_run_in_attach_order_per_element() -> anyhow::Result<()> {
    // Arrange
    let log = Arc::new(Mutex::new(Vec::new()));
    let (first, second) = (Arc::clone(&log), Arc::clone(&log));
    let mut pipeline = LazyIterator::from_iterable(vec![1, 2]);

    // Act
    let values = pipeline
        .for_each(move |n| first.lock().unwrap().push(format!("a{n}")))
        .map(|n| n * 10)
        .for_each(move |n| second.lock().unwrap().push(format!("b{n}")))
        .collect()?;

    // Assert
    assert_eq!(values, vec![10, 20]);
    assert_eq!(*log.lock().unwrap(), vec!["a1", "b10", "a2", "b20"]);
    Ok(())
}

#[test]
fn test_filter_rejection_does_not_end_iteration() -> anyhow::Result<()> {
    let mut pipeline = LazyIterator::from_iterable(vec![1, 2, 3, 4]);

    let values = pipeline.filter(|n| n % 2 == 0).collect()?;

    assert_eq!(values, vec![2, 4]);
    Ok(())
}

#[test]
fn test_for_each_passes_values_through() -> anyhow::Result<()> {
    // Arrange
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let mut pipeline = LazyIterator::from_iterable(vec!['x', 'y']);

    // Act
    let values = pipeline
        .for_each(move |c| sink.lock().unwrap().push(*c))
        .collect()?;

    // Assert
    assert_eq!(values, vec!['x', 'y']);
    assert_eq!(*seen.lock().unwrap(), vec!['x', 'y']);
    Ok(())
}

#[test]
fn test_take_while_excludes_first_failing_element() -> anyhow::Result<()> {
    let mut pipeline = LazyIterator::from_iterable(vec![1, 2, 3, 2, 1]);

    let values = pipeline.take_while(|n| *n < 3)?;

    assert_eq!(values, vec![1, 2]);
    Ok(())
}

#[test]
fn test_drop_while_never_resumes_dropping() -> anyhow::Result<()> {
    let mut pipeline = LazyIterator::from_iterable(vec![1, 2, 3, 2, 1]);

    let values = pipeline.drop_while(|n| *n < 3)?;

    assert_eq!(values, vec![3, 2, 1]);
    Ok(())
}

#[test]
fn test_take_stops_pulling_at_n() -> anyhow::Result<()> {
    // Arrange
    let (source, probe) = CountingSource::new(1..=100);
    let mut pipeline = LazyIterator::new(source);

    // Act
    let values = pipeline.take(3)?;

    // Assert
    assert_eq!(values, vec![1, 2, 3]);
    assert_eq!(probe.pulls(), 3);
    assert_eq!(pipeline.take(2)?, vec![4, 5]);
    Ok(())
}

#[test]
fn test_drop_skips_prefix() -> anyhow::Result<()> {
    let mut pipeline = LazyIterator::from_iterable(vec![1, 2, 3, 4, 5]);

    assert_eq!(pipeline.drop(2)?, vec![3, 4, 5]);

    let mut short = LazyIterator::from_iterable(vec![1]);
    assert!(short.drop(5)?.is_empty());
    Ok(())
}

#[test]
fn test_negative_counts_are_rejected_without_pulling() {
    // Arrange
    let (source, probe) = CountingSource::new(vec![1, 2, 3]);
    let mut pipeline = LazyIterator::new(source);

    // Act
    let take = pipeline.take(-1);
    let drop = pipeline.drop(-5i64);

    // Assert
    assert!(matches!(
        take,
        Err(PullwiseError::InvalidArgument {
            operation: "take",
            ..
        })
    ));
    assert!(drop.err().is_some_and(|e| e.is_invalid_argument()));
    assert_eq!(probe.pulls(), 0);
    assert!(!pipeline.is_exhausted());
}

#[test]
fn test_empty_source_yields_empty_results() -> anyhow::Result<()> {
    let empty = || LazyIterator::from(Vec::<i32>::new());

    assert!(empty().collect()?.is_empty());
    assert!(empty().to_array()?.is_empty());
    assert!(empty().take(0)?.is_empty());
    assert!(empty().take(10)?.is_empty());
    assert!(empty().drop(3)?.is_empty());
    assert!(empty().take_while(|_| true)?.is_empty());
    assert!(empty().drop_while(|_| false)?.is_empty());
    Ok(())
}

#[test]
fn test_exhaustion_is_permanent() -> anyhow::Result<()> {
    // Arrange - a source that would resume after reporting done
    let (source, probe) = CountingSource::new(vec![1]);
    let mut calls = 0;
    let resuming = from_fn(move || {
        calls += 1;
        Ok(match calls {
            2 => Step::Done,
            _ => Step::Value(calls),
        })
    });
    let mut pipeline = LazyIterator::new(resuming);
    let mut counted = LazyIterator::new(source);

    // Act
    let first = pipeline.collect()?;
    let second = pipeline.collect()?;
    counted.collect()?;
    counted.collect()?;

    // Assert
    assert_eq!(first, vec![1]);
    assert!(second.is_empty());
    assert!(pipeline.is_exhausted());
    assert_eq!(probe.pulls(), 2);
    Ok(())
}

#[test]
fn test_callback_error_propagates_and_exhausts() {
    // Arrange
    let (source, probe) = CountingSource::new(vec![1, 2, 3, 4]);
    let mut pipeline = LazyIterator::new(source);
    pipeline.try_map(|n| {
        if n == 2 {
            Err(test_error("two is not allowed"))
        } else {
            Ok(n)
        }
    });

    // Act
    let result = pipeline.collect();

    // Assert
    assert!(result.err().is_some_and(|e| e.is_callback()));
    assert!(pipeline.is_exhausted());
    assert_eq!(probe.pulls(), 2);
}

#[test]
fn test_source_error_propagates_from_terminal() {
    let (source, _probe) = FailingSource::new(vec![1, 2], &[1]);
    let mut pipeline = LazyIterator::new(source);

    let result = pipeline.take(2);

    assert!(matches!(result, Err(PullwiseError::Source { .. })));
    assert!(pipeline.is_exhausted());
}

#[test]
fn test_next_step_error_leaves_pipeline_usable() -> anyhow::Result<()> {
    // Arrange
    let (source, _probe) = FailingSource::new(vec![1, 2], &[0]);
    let mut pipeline = LazyIterator::new(source);

    // Act & Assert
    assert!(pipeline.next_step().is_err());
    assert!(!pipeline.is_exhausted());
    assert_eq!(pipeline.next_step()?, Step::Value(1));
    Ok(())
}

#[test]
fn test_try_filter_and_try_for_each_errors() {
    let mut filtered = LazyIterator::from_iterable(vec![1, 2]);
    filtered.try_filter(|_| Err(test_error("predicate")));
    assert!(filtered.collect().is_err());

    let mut visited = LazyIterator::from_iterable(vec![1, 2]);
    visited.try_for_each(|_| Err(test_error("observer")));
    assert!(visited.collect().is_err());
}

#[test]
fn test_stop_forwards_to_source_once() -> anyhow::Result<()> {
    // Arrange
    let (source, probe) = CountingSource::new(vec![1, 2, 3]);
    let mut pipeline = LazyIterator::new(source);
    assert_eq!(pipeline.next_step()?, Step::Value(1));

    // Act
    pipeline.stop();
    pipeline.stop();

    // Assert
    assert_eq!(pipeline.next_step()?, Step::Done);
    assert!(pipeline.collect()?.is_empty());
    assert_eq!(probe.stops(), 1);
    assert_eq!(probe.pulls(), 1);
    Ok(())
}

#[test]
fn test_abort_exhausts_without_touching_source() -> anyhow::Result<()> {
    let (source, probe) = CountingSource::new(vec![1, 2, 3]);
    let mut pipeline = LazyIterator::new(source);

    pipeline.abort(&PullwiseError::aborted("caller gave up"));

    assert_eq!(pipeline.next_step()?, Step::Done);
    assert_eq!(probe.stops(), 0);
    assert_eq!(probe.aborts(), 0);
    assert_eq!(probe.pulls(), 0);
    Ok(())
}

#[test]
fn test_map_into_changes_element_type() -> anyhow::Result<()> {
    // Arrange
    let mut numbers = LazyIterator::from_iterable(vec![1, 2, 3]);
    numbers.filter(|n| *n != 2);

    // Act
    let mut labels = numbers.map_into(|n| format!("#{n}"));
    labels.map(|s| s.to_uppercase());

    // Assert
    assert_eq!(labels.collect()?, vec!["#1", "#3"]);
    assert!(numbers.is_exhausted());
    assert!(numbers.collect()?.is_empty());
    Ok(())
}

#[test]
fn test_try_map_into_propagates_errors() {
    let mut numbers = LazyIterator::from_iterable(vec!["1", "x"]);

    let mut parsed = numbers.try_map_into(|s| {
        s.parse::<u32>()
            .map_err(pullwise_core::IntoPullwiseError::into_pullwise)
    });

    assert!(parsed.collect().is_err());
}

#[test]
fn test_pipeline_is_a_pull_source() -> anyhow::Result<()> {
    // Arrange
    let mut inner = LazyIterator::from_iterable(0..5);
    inner.map(|n| n * 2);

    // Act
    let mut outer = LazyIterator::new(inner);
    outer.filter(|n| *n > 2);

    // Assert
    assert_eq!(outer.collect()?, vec![4, 6, 8]);
    Ok(())
}

#[test]
fn test_iter_yields_results() -> anyhow::Result<()> {
    let mut pipeline = LazyIterator::from_iterable(vec![1, 2, 3]);
    pipeline.map(|n| n + 1);

    let first_two: Vec<i32> = pipeline.iter().take(2).collect::<Result<_, _>>()?;
    let rest: Vec<i32> = pipeline.into_iter().collect::<Result<_, _>>()?;

    assert_eq!(first_two, vec![2, 3]);
    assert_eq!(rest, vec![4]);
    Ok(())
}

#[test]
fn test_pull_trait_on_pipeline_forwards_stop() -> anyhow::Result<()> {
    let (source, probe) = CountingSource::new(vec![1]);
    let mut pipeline = LazyIterator::new(source);

    Pull::stop(&mut pipeline);

    assert_eq!(Pull::pull(&mut pipeline)?, Step::Done);
    assert_eq!(probe.stops(), 1);
    Ok(())
}
