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

//! The storage contract behind a [`MetricsRegistry`](crate::MetricsRegistry).

use keepsake_core::telemetry::{Metric, MetricId, MetricType, MetricValue, MetricsError, MetricsResult};
use std::fmt::Debug;

/// Stores metrics by id. Implementations use interior mutability so handles
/// can share one backend.
pub trait MetricsBackend: Send + Sync + Debug + 'static {
    /// Store or replace a metric
    fn put_metric(&self, metric: Metric) -> MetricsResult<()>;

    /// Retrieve a metric by ID
    fn get_metric(&self, id: &MetricId) -> MetricsResult<Metric>;

    /// Check if a metric exists
    fn contains_metric(&self, id: &MetricId) -> bool;

    /// Get all metrics currently stored
    fn list_all_metrics(&self) -> Vec<Metric>;

    /// Get all metrics in a namespace
    fn metrics_in_namespace(&self, namespace: &str) -> Vec<Metric> {
        self.list_all_metrics()
            .into_iter()
            .filter(|metric| metric.id.namespace == namespace)
            .collect()
    }

    /// Clear all metrics
    fn clear_all(&self) -> MetricsResult<()>;

    /// Get the number of metrics stored
    fn metric_count(&self) -> usize;

    /// Increment a counter by the given amount, returning the new value.
    ///
    /// The default reads then writes back, so concurrent callers can lose
    /// increments. Backends shared across threads should override it.
    fn increment_counter(&self, id: &MetricId, delta: u64) -> MetricsResult<u64> {
        let mut metric = self.get_metric(id)?;
        match metric.value {
            MetricValue::Counter(value) => {
                let value = value.saturating_add(delta);
                metric.value = MetricValue::Counter(value);
                metric.touch();
                self.put_metric(metric)?;
                Ok(value)
            }
            MetricValue::Gauge(_) => Err(MetricsError::TypeMismatch {
                expected: MetricType::Counter,
                found: MetricType::Gauge,
            }),
        }
    }

    /// Set a gauge value
    fn set_gauge(&self, id: &MetricId, value: f64) -> MetricsResult<()> {
        let mut metric = self.get_metric(id)?;
        match metric.value {
            MetricValue::Gauge(_) => {
                metric.value = MetricValue::Gauge(value);
                metric.touch();
                self.put_metric(metric)
            }
            MetricValue::Counter(_) => Err(MetricsError::TypeMismatch {
                expected: MetricType::Gauge,
                found: MetricType::Counter,
            }),
        }
    }
}
