// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use pullwise_core::{AsyncPull, Pull, PullwiseError, Settled, Step};
use pullwise_test_utils::{
    partition_settled, settled_values, test_error, CountingSource, FailingSource, YieldingSource,
};

#[test]
fn test_counting_source_counts_every_pull() -> anyhow::Result<()> {
    // Arrange
    let (mut source, probe) = CountingSource::new(vec!['a', 'b']);

    // Act
    while source.pull()?.is_value() {}
    source.pull()?;

    // Assert
    assert_eq!(probe.pulls(), 4);
    Ok(())
}

#[test]
fn test_counting_source_stop_ends_sequence() -> anyhow::Result<()> {
    let (mut source, probe) = CountingSource::new(1..=5);

    source.stop();

    assert_eq!(source.pull()?, Step::Done);
    assert_eq!(probe.stops(), 1);
    Ok(())
}

#[test]
fn test_failing_source_fails_without_consuming() -> anyhow::Result<()> {
    // Arrange
    let (mut source, probe) = FailingSource::new(vec![1, 2], &[1]);

    // Act & Assert
    assert_eq!(source.pull()?, Step::Value(1));
    assert!(matches!(source.pull(), Err(PullwiseError::Source { .. })));
    assert_eq!(source.pull()?, Step::Value(2));
    assert_eq!(source.pull()?, Step::Done);
    assert_eq!(probe.pulls(), 4);
    Ok(())
}

#[tokio::test]
async fn test_yielding_source_produces_in_order() -> anyhow::Result<()> {
    let (mut source, probe) = YieldingSource::new(vec![3, 4]);

    assert_eq!(source.pull().await?, Step::Value(3));
    assert_eq!(source.pull().await?, Step::Value(4));
    assert_eq!(source.pull().await?, Step::Done);
    assert_eq!(probe.pulls(), 3);
    Ok(())
}

#[test]
fn test_partition_settled_keeps_order() {
    let entries = vec![
        Settled::Fulfilled(1),
        Settled::Rejected(test_error("two")),
        Settled::Fulfilled(3),
    ];

    let (values, errors) = partition_settled(entries.clone());

    assert_eq!(values, vec![1, 3]);
    assert_eq!(errors.len(), 1);
    assert_eq!(settled_values(entries), vec![1, 3]);
}
