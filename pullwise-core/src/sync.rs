// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Synchronization primitives used for state shared between forks.
//!
//! `Mutex` never suspends and is used when every critical section is synchronous.
//! `AsyncMutex` may be held across an `.await`.

pub use futures::lock::Mutex as AsyncMutex;
pub use parking_lot::Mutex;
