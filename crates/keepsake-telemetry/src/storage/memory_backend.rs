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

//! The default, in-process metrics backend.

use crate::storage::backend::MetricsBackend;
use keepsake_core::telemetry::{Metric, MetricId, MetricType, MetricValue, MetricsError, MetricsResult};
use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Keeps every metric in a `HashMap` behind an `RwLock`.
#[derive(Debug, Default)]
pub struct InMemoryBackend {
    storage: RwLock<HashMap<MetricId, Metric>>,
}

impl InMemoryBackend {
    /// Create a new in-memory backend
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> MetricsResult<RwLockReadGuard<'_, HashMap<MetricId, Metric>>> {
        self.storage
            .read()
            .map_err(|_| MetricsError::StorageError("Failed to acquire read lock".to_owned()))
    }

    fn write(&self) -> MetricsResult<RwLockWriteGuard<'_, HashMap<MetricId, Metric>>> {
        self.storage
            .write()
            .map_err(|_| MetricsError::StorageError("Failed to acquire write lock".to_owned()))
    }
}

impl MetricsBackend for InMemoryBackend {
    fn put_metric(&self, metric: Metric) -> MetricsResult<()> {
        self.write()?.insert(metric.id.clone(), metric);
        Ok(())
    }

    fn get_metric(&self, id: &MetricId) -> MetricsResult<Metric> {
        self.read()?
            .get(id)
            .cloned()
            .ok_or_else(|| MetricsError::MetricNotFound(id.clone()))
    }

    fn contains_metric(&self, id: &MetricId) -> bool {
        self.read().map(|s| s.contains_key(id)).unwrap_or(false)
    }

    fn list_all_metrics(&self) -> Vec<Metric> {
        self.read()
            .map(|s| s.values().cloned().collect())
            .unwrap_or_default()
    }

    fn metrics_in_namespace(&self, namespace: &str) -> Vec<Metric> {
        self.read()
            .map(|s| {
                s.values()
                    .filter(|metric| metric.id.namespace == namespace)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    fn clear_all(&self) -> MetricsResult<()> {
        self.write()?.clear();
        Ok(())
    }

    fn metric_count(&self) -> usize {
        self.read().map(|s| s.len()).unwrap_or(0)
    }

    // Both updates hold the write lock across the read-modify-write.
    fn increment_counter(&self, id: &MetricId, delta: u64) -> MetricsResult<u64> {
        let mut storage = self.write()?;
        let metric = storage
            .get_mut(id)
            .ok_or_else(|| MetricsError::MetricNotFound(id.clone()))?;
        match metric.value {
            MetricValue::Counter(value) => {
                let value = value.saturating_add(delta);
                metric.value = MetricValue::Counter(value);
                metric.touch();
                Ok(value)
            }
            MetricValue::Gauge(_) => Err(MetricsError::TypeMismatch {
                expected: MetricType::Counter,
                found: MetricType::Gauge,
            }),
        }
    }

    fn set_gauge(&self, id: &MetricId, value: f64) -> MetricsResult<()> {
        let mut storage = self.write()?;
        let metric = storage
            .get_mut(id)
            .ok_or_else(|| MetricsError::MetricNotFound(id.clone()))?;
        match metric.value {
            MetricValue::Gauge(_) => {
                metric.value = MetricValue::Gauge(value);
                metric.touch();
                Ok(())
            }
            MetricValue::Counter(_) => Err(MetricsError::TypeMismatch {
                expected: MetricType::Gauge,
                found: MetricType::Counter,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_put_get_and_clear() {
        let backend = InMemoryBackend::new();
        let id = MetricId::new("cache", "tries");

        backend
            .put_metric(Metric::new_counter(id.clone(), "Fetch attempts", 3))
            .unwrap();
        assert!(backend.contains_metric(&id));
        assert_eq!(backend.get_metric(&id).unwrap().value.as_counter(), Some(3));

        backend.clear_all().unwrap();
        assert_eq!(backend.metric_count(), 0);
    }

    #[test]
    fn test_counter_increment() {
        let backend = InMemoryBackend::new();
        let id = MetricId::new("cache", "misses");
        backend
            .put_metric(Metric::new_counter(id.clone(), "Misses", 0))
            .unwrap();

        assert_eq!(backend.increment_counter(&id, 2).unwrap(), 2);
        assert_eq!(backend.increment_counter(&id, 1).unwrap(), 3);
    }

    #[test]
    fn test_type_mismatch() {
        let backend = InMemoryBackend::new();
        let id = MetricId::new("cache", "coherence");
        backend
            .put_metric(Metric::new_gauge(id.clone(), "Hit ratio", "ratio", 0.0))
            .unwrap();

        let err = backend.increment_counter(&id, 1).unwrap_err();
        assert_eq!(
            err,
            MetricsError::TypeMismatch {
                expected: MetricType::Counter,
                found: MetricType::Gauge,
            }
        );
    }

    #[test]
    fn test_missing_metric() {
        let backend = InMemoryBackend::new();
        let id = MetricId::new("cache", "nope");
        assert_eq!(
            backend.set_gauge(&id, 1.0),
            Err(MetricsError::MetricNotFound(id))
        );
    }

    #[test]
    fn test_namespace_filter() {
        let backend = InMemoryBackend::new();
        backend
            .put_metric(Metric::new_counter(MetricId::new("cache", "tries"), "", 0))
            .unwrap();
        backend
            .put_metric(Metric::new_counter(MetricId::new("renderer", "draws"), "", 0))
            .unwrap();

        assert_eq!(backend.metrics_in_namespace("cache").len(), 1);
    }

    #[test]
    fn test_concurrent_increments_are_not_lost() {
        let backend = Arc::new(InMemoryBackend::new());
        let id = MetricId::new("cache", "tries");
        backend
            .put_metric(Metric::new_counter(id.clone(), "Fetch attempts", 0))
            .unwrap();

        let workers: Vec<_> = (0..4)
            .map(|_| {
                let backend = Arc::clone(&backend);
                let id = id.clone();
                thread::spawn(move || {
                    for _ in 0..5000 {
                        backend.increment_counter(&id, 1).unwrap();
                    }
                })
            })
            .collect();
        for worker in workers {
            worker.join().unwrap();
        }

        assert_eq!(backend.get_metric(&id).unwrap().value.as_counter(), Some(20_000));
    }
}
