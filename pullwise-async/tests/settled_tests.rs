// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use pullwise_async::{AsyncLazyIterator, DEFAULT_CONCURRENCY};
use pullwise_core::Settled;
use pullwise_test_utils::{
    partition_settled, settled_values, test_error, FailingSource, YieldingSource,
};

/// A pipeline over `values` whose async step rejects every even value.
fn odd_only(values: Vec<i32>) -> AsyncLazyIterator<i32> {
    let mut pipeline = AsyncLazyIterator::from_iterable(values);
    pipeline.try_map_async(|n| async move {
        if n % 2 == 0 {
            Err(test_error(format!("{n} is even")))
        } else {
            Ok(n)
        }
    });
    pipeline
}

#[tokio::test]
async fn test_collect_settled_partitions_outcomes() -> anyhow::Result<()> {
    for concurrency in [1, 2, 3, 8] {
        // Arrange
        let pipeline = odd_only(vec![1, 2, 3, 4]);

        // Act
        let entries = pipeline.collect_settled(concurrency).await?;

        // Assert
        assert_eq!(entries.len(), 4, "concurrency {concurrency}");
        let (values, errors) = partition_settled(entries);
        assert_eq!(values, vec![1, 3]);
        assert_eq!(errors.len(), 2);
        assert!(errors.iter().all(|e| e.is_callback()));
    }
    Ok(())
}

#[tokio::test]
async fn test_collect_settled_keeps_issue_order() -> anyhow::Result<()> {
    let pipeline = odd_only(vec![1, 2, 3, 4]);

    let entries = pipeline.collect_settled(2).await?;

    let shape: Vec<bool> = entries.iter().map(Settled::is_fulfilled).collect();
    assert_eq!(shape, vec![true, false, true, false]);
    Ok(())
}

#[tokio::test]
async fn test_settled_drain_does_not_stop_pipeline_on_rejection() -> anyhow::Result<()> {
    let pipeline = odd_only(vec![2, 4, 5]);

    let entries = pipeline.collect_settled(DEFAULT_CONCURRENCY).await?;

    assert_eq!(settled_values(entries), vec![5]);
    assert!(pipeline.is_exhausted());
    Ok(())
}

#[tokio::test]
async fn test_take_settled_counts_rejections() -> anyhow::Result<()> {
    // Arrange
    let pipeline = odd_only(vec![1, 2, 3, 4, 5, 6]);

    // Act
    let entries = pipeline.take_settled(3, 2).await?;

    // Assert - exactly three entries even though the batch pulled four
    assert_eq!(entries.len(), 3);
    assert!(entries[1].is_rejected());
    assert_eq!(settled_values(entries), vec![1, 3]);
    Ok(())
}

#[tokio::test]
async fn test_drop_settled_keeps_rejections_from_drop_window() -> anyhow::Result<()> {
    // Arrange
    let pipeline = odd_only(vec![1, 2, 3, 5, 7]);

    // Act - skip two fulfilled values (1 and 3); the rejection of 2 is kept
    let entries = pipeline.drop_settled(2, DEFAULT_CONCURRENCY).await?;

    // Assert
    assert_eq!(entries.len(), 3);
    assert!(entries[0].is_rejected());
    assert_eq!(settled_values(entries), vec![5, 7]);
    Ok(())
}

#[tokio::test]
async fn test_take_while_settled_stops_at_first_failing_value() -> anyhow::Result<()> {
    let pipeline = odd_only(vec![1, 2, 3, 9, 5]);

    let entries = pipeline.take_while_settled(|n| *n < 5, 2).await?;

    let (values, errors) = partition_settled(entries);
    assert_eq!(values, vec![1, 3]);
    assert_eq!(errors.len(), 1);
    Ok(())
}

#[tokio::test]
async fn test_drop_while_settled_never_resumes_dropping() -> anyhow::Result<()> {
    // Arrange
    let pipeline = odd_only(vec![1, 2, 7, 3, 4, 1]);

    // Act
    let entries = pipeline.drop_while_settled(|n| *n < 5, 3).await?;

    // Assert - rejections are reported inside and after the dropped prefix
    let shape: Vec<bool> = entries.iter().map(Settled::is_fulfilled).collect();
    assert_eq!(shape, vec![false, true, true, false, true]);
    assert_eq!(settled_values(entries), vec![7, 3, 1]);
    Ok(())
}

#[tokio::test]
async fn test_non_settled_variants_reject_same_pipeline() {
    let pipeline = odd_only(vec![1, 2, 3, 4]);

    assert!(pipeline.take_while(|_| true, 2).await.is_err());
    assert!(pipeline.is_exhausted());
    assert!(pipeline.collect_settled(2).await.is_ok_and(|e| e.is_empty()));
}

#[tokio::test]
async fn test_settled_terminals_over_yielding_source() -> anyhow::Result<()> {
    // Arrange
    let (source, probe) = YieldingSource::new(1..=5);
    let mut pipeline = AsyncLazyIterator::new(source);
    pipeline.try_map(|n| {
        if n == 4 {
            Err(test_error("four"))
        } else {
            Ok(n * 10)
        }
    });

    // Act
    let entries = pipeline.collect_settled(2).await?;

    // Assert
    assert_eq!(entries.len(), 5);
    assert_eq!(settled_values(entries), vec![10, 20, 30, 50]);
    assert_eq!(probe.pulls(), 6);
    Ok(())
}

#[tokio::test]
async fn test_take_settled_bounds_fork_with_cached_error() -> anyhow::Result<()> {
    // Arrange
    let (source, probe) = FailingSource::new(vec![1, 2, 3], &[1]);
    let mut pipeline = AsyncLazyIterator::from_pull(source);
    let forks = pipeline.tee(2)?;

    // Act
    let leader = forks[0].take_settled(4, DEFAULT_CONCURRENCY).await?;
    let follower = forks[1].take_settled(2, 2).await?;

    // Assert - the cached error repeats instead of ending the fork
    let shape: Vec<bool> = leader.iter().map(Settled::is_fulfilled).collect();
    assert_eq!(shape, vec![true, false, false, false]);
    assert!(leader[1..]
        .iter()
        .all(|e| e.clone().err().is_some_and(|err| err.to_string().contains("pull 1"))));
    assert_eq!(settled_values(follower), vec![1]);
    assert_eq!(probe.pulls(), 2);
    Ok(())
}
