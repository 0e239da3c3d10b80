// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use pullwise_core::{PullwiseError, Settled};

/// Splits settled entries into fulfilled values and rejection reasons, keeping order.
pub fn partition_settled<T>(entries: Vec<Settled<T>>) -> (Vec<T>, Vec<PullwiseError>) {
    let mut values = Vec::new();
    let mut errors = Vec::new();
    for entry in entries {
        match entry {
            Settled::Fulfilled(value) => values.push(value),
            Settled::Rejected(error) => errors.push(error),
        }
    }
    (values, errors)
}

/// Fulfilled values only, in order.
pub fn settled_values<T>(entries: Vec<Settled<T>>) -> Vec<T> {
    partition_settled(entries).0
}
