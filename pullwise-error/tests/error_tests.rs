// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use pullwise_error::{IntoPullwiseError, PullwiseError, Result, ResultExt};
use std::io;

#[test]
fn test_error_display() {
    let err = PullwiseError::invalid_argument("take", "count must not be negative");
    assert_eq!(
        err.to_string(),
        "Invalid argument to `take`: count must not be negative"
    );

    let err = PullwiseError::source_error("disk gone");
    assert_eq!(err.to_string(), "Source error: disk gone");

    let err = PullwiseError::stream_error("processing failed");
    assert_eq!(
        err.to_string(),
        "Stream processing error: processing failed"
    );
}

#[test]
fn test_error_constructors() {
    assert!(matches!(
        PullwiseError::invalid_argument("tee", "zero"),
        PullwiseError::InvalidArgument {
            operation: "tee",
            ..
        }
    ));
    assert!(matches!(
        PullwiseError::aborted("caller gave up"),
        PullwiseError::Aborted { .. }
    ));
    assert!(matches!(
        PullwiseError::callback(io::Error::other("boom")),
        PullwiseError::Callback(_)
    ));
}

#[test]
fn test_predicates() {
    assert!(PullwiseError::invalid_argument("drop", "negative").is_invalid_argument());
    assert!(!PullwiseError::stream_error("x").is_invalid_argument());
    assert!(PullwiseError::callback(io::Error::other("x")).is_callback());
    assert!(!PullwiseError::source_error("x").is_callback());
}

#[test]
fn test_clone_preserves_callback_message() {
    let err = PullwiseError::callback(io::Error::other("even value"));
    let cloned = err.clone();
    assert_eq!(err.to_string(), cloned.to_string());
}

#[test]
fn test_into_pullwise_wraps_as_callback() {
    let err = io::Error::other("custom").into_pullwise();
    assert!(err.is_callback());
    assert!(err.to_string().contains("custom"));
}

#[test]
fn test_result_context_wraps_callback_errors() {
    let result: Result<()> = Err(PullwiseError::callback(io::Error::other("inner")));

    let err = result.context("mapping element").unwrap_err();
    assert!(matches!(err, PullwiseError::StreamProcessingError { .. }));
    assert!(err.to_string().contains("mapping element"));
    assert!(err.to_string().contains("inner"));
}

#[test]
fn test_result_context_prefixes_source_errors() {
    let result: Result<()> = Err(PullwiseError::source_error("eof"));

    let err = result.context("reading batch").unwrap_err();
    assert!(matches!(err, PullwiseError::Source { .. }));
    assert_eq!(err.to_string(), "Source error: reading batch: eof");
}

#[test]
fn test_result_context_keeps_error_kind() {
    let invalid: Result<()> = Err(PullwiseError::invalid_argument("take", "negative"));
    let aborted: Result<()> = Err(PullwiseError::aborted("shutdown"));

    let invalid = invalid.context("first call").unwrap_err();
    let aborted = aborted.with_context(|| "worker 3".to_string()).unwrap_err();

    assert!(invalid.is_invalid_argument());
    assert!(invalid.to_string().contains("first call: negative"));
    assert!(matches!(aborted, PullwiseError::Aborted { .. }));
    assert_eq!(aborted.to_string(), "Sequence aborted: worker 3: shutdown");
}

#[test]
fn test_result_with_context_is_lazy_on_ok() {
    let result: Result<i32> = Ok(7);
    let value = result
        .with_context(|| panic!("context must not be built for Ok"))
        .unwrap();
    assert_eq!(value, 7);
}
