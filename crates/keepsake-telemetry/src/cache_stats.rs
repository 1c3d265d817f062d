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

//! Publishes resource cache statistics into a [`MetricsRegistry`].

use crate::metrics::registry::{CounterHandle, GaugeHandle, MetricsRegistry};
use keepsake_core::telemetry::{CacheStatsSink, CacheStatsSnapshot, MetricsResult};

/// Namespace of every metric registered by [`MetricsCacheStats`].
pub const CACHE_NAMESPACE: &str = "cache";

/// A [`CacheStatsSink`] backed by registry metrics.
///
/// Registers `cache:tries` and `cache:misses` counters plus a
/// `cache:coherence` gauge that is refreshed on every recorded event.
#[derive(Debug, Clone)]
pub struct MetricsCacheStats {
    tries: CounterHandle,
    misses: CounterHandle,
    coherence: GaugeHandle,
}

impl MetricsCacheStats {
    /// Registers the cache metrics in `registry`.
    pub fn register(registry: &MetricsRegistry) -> MetricsResult<Self> {
        Ok(Self {
            tries: registry.register_counter(CACHE_NAMESPACE, "tries", "Resource cache fetch attempts")?,
            misses: registry.register_counter(CACHE_NAMESPACE, "misses", "Resource cache fetch misses")?,
            coherence: registry.register_gauge(
                CACHE_NAMESPACE,
                "coherence",
                "Share of fetches served from the cache",
                "ratio",
            )?,
        })
    }

    /// Reads the current counter values.
    pub fn snapshot(&self) -> MetricsResult<CacheStatsSnapshot> {
        Ok(CacheStatsSnapshot {
            tries: self.tries.get()?,
            misses: self.misses.get()?,
        })
    }

    fn refresh_coherence(&self) -> MetricsResult<()> {
        if let Some(ratio) = self.snapshot()?.coherence() {
            self.coherence.set(ratio)?;
        }
        Ok(())
    }
}

impl CacheStatsSink for MetricsCacheStats {
    fn record_try(&self) {
        if let Err(e) = self.tries.increment().and_then(|_| self.refresh_coherence()) {
            log::warn!("[MetricsCacheStats] Failed to record cache try: {e}");
        }
    }

    fn record_miss(&self) {
        if let Err(e) = self.misses.increment().and_then(|_| self.refresh_coherence()) {
            log::warn!("[MetricsCacheStats] Failed to record cache miss: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use keepsake_core::telemetry::MetricId;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_register_creates_three_metrics() {
        let registry = MetricsRegistry::new();
        MetricsCacheStats::register(&registry).unwrap();

        assert_eq!(registry.namespace_metrics(CACHE_NAMESPACE).len(), 3);
    }

    #[test]
    fn test_coherence_gauge_follows_counters() {
        let registry = MetricsRegistry::new();
        let stats = MetricsCacheStats::register(&registry).unwrap();

        stats.record_try();
        stats.record_try();
        stats.record_miss();

        let coherence = registry
            .get_metric(&MetricId::new(CACHE_NAMESPACE, "coherence"))
            .unwrap();
        assert_eq!(coherence.value.as_gauge(), Some(0.5));
        assert_eq!(
            stats.snapshot().unwrap(),
            CacheStatsSnapshot { tries: 2, misses: 1 }
        );
    }

    #[test]
    fn test_cleared_registry_does_not_panic() {
        let registry = MetricsRegistry::new();
        let stats = MetricsCacheStats::register(&registry).unwrap();
        registry.clear_all().unwrap();

        // Failures are logged and swallowed.
        stats.record_try();
        stats.record_miss();
        assert!(stats.snapshot().is_err());
    }

    #[test]
    fn test_shared_sink_counts_every_thread() {
        let registry = MetricsRegistry::new();
        let stats = Arc::new(MetricsCacheStats::register(&registry).unwrap());

        let workers: Vec<_> = (0..4)
            .map(|_| {
                let stats = Arc::clone(&stats);
                thread::spawn(move || {
                    for i in 0..5000 {
                        stats.record_try();
                        if i % 4 == 0 {
                            stats.record_miss();
                        }
                    }
                })
            })
            .collect();
        for worker in workers {
            worker.join().unwrap();
        }

        assert_eq!(
            stats.snapshot().unwrap(),
            CacheStatsSnapshot { tries: 20_000, misses: 5_000 }
        );
    }
}
