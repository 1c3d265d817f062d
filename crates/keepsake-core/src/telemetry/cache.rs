// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The statistics collaborator of the resource cache.

use std::fmt::Debug;
use std::sync::atomic::{AtomicU64, Ordering};

/// Receives the fetch statistics of a resource cache.
///
/// Both counters only ever increase. Implementations must not fail: a
/// statistics problem never changes what the cache does.
pub trait CacheStatsSink: Send + Sync + Debug + 'static {
    /// Called once for every fetch attempt, hit or miss.
    fn record_try(&self);

    /// Called once for every fetch that found no entry.
    fn record_miss(&self);
}

/// A point-in-time copy of the cache counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStatsSnapshot {
    /// Number of fetch attempts.
    pub tries: u64,
    /// Number of fetches that missed.
    pub misses: u64,
}

impl CacheStatsSnapshot {
    /// Number of fetches that found an entry.
    pub fn hits(&self) -> u64 {
        self.tries.saturating_sub(self.misses)
    }

    /// The cache coherence ratio `(tries - misses) / tries`.
    ///
    /// Returns `None` before the first fetch.
    pub fn coherence(&self) -> Option<f64> {
        if self.tries == 0 {
            None
        } else {
            Some(self.hits() as f64 / self.tries as f64)
        }
    }
}

/// A lock-free, in-process statistics sink.
#[derive(Debug, Default)]
pub struct CacheCounters {
    tries: AtomicU64,
    misses: AtomicU64,
}

impl CacheCounters {
    /// Creates a sink with both counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads both counters.
    pub fn snapshot(&self) -> CacheStatsSnapshot {
        CacheStatsSnapshot {
            tries: self.tries.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}

impl CacheStatsSink for CacheCounters {
    fn record_try(&self) {
        self.tries.fetch_add(1, Ordering::Relaxed);
    }

    fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }
}
