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

//! Telemetry contracts for the resource cache.
//!
//! This module defines the abstract "what" of cache observability: the
//! metric data model, the statistics sink the cache reports its tries and
//! misses to, and the warning sink for recovered failures. `keepsake-telemetry`
//! provides the registry that aggregates metrics.

pub mod cache;
pub mod metrics;
pub mod report;

pub use self::cache::{CacheCounters, CacheStatsSink, CacheStatsSnapshot};
pub use self::metrics::{Metric, MetricId, MetricType, MetricValue, MetricsError, MetricsResult};
pub use self::report::{LogReporter, WarningReporter};
