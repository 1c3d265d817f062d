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

//! # Keepsake Telemetry
//!
//! Aggregates the metrics the cache emits and bootstraps logging.
//!
//! - [`MetricsRegistry`]: registration and typed handles over a storage backend.
//! - [`MetricsCacheStats`]: a [`CacheStatsSink`](keepsake_core::telemetry::CacheStatsSink)
//!   that publishes cache tries, misses, and coherence into a registry.
//! - [`logging::init`]: `env_logger` setup for binaries and tests.

#![warn(missing_docs)]

pub mod cache_stats;
pub mod logging;
pub mod metrics;
pub mod storage;

pub use cache_stats::MetricsCacheStats;
pub use metrics::registry::{CounterHandle, GaugeHandle, MetricsRegistry};
pub use storage::{backend::MetricsBackend, memory_backend::InMemoryBackend};
