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

//! Metric handles used by the sprite agent.

use sigil_core::telemetry::MetricsResult;
use sigil_telemetry::{CounterHandle, GaugeHandle, HistogramHandle, MetricsRegistry};

/// Namespace of every sprite metric.
pub const NAMESPACE: &str = "sprites";

/// A collection of metric handles updated by the [`LoadCoordinator`](super::LoadCoordinator).
#[derive(Debug, Clone)]
pub struct SpriteMetrics {
    /// Histogram of whole-category load times in milliseconds.
    pub load_time_ms: HistogramHandle,
    /// Total number of chunk fetches issued.
    pub chunk_fetches_total: CounterHandle,
    /// Total number of category loads started.
    pub loads_started_total: CounterHandle,
    /// Total number of category loads that failed.
    pub loads_failed_total: CounterHandle,
    /// Total number of requests served from the cache.
    pub cache_hits_total: CounterHandle,
    /// Number of categories currently cached.
    pub cached_categories: GaugeHandle,
}

impl SpriteMetrics {
    /// Registers the sprite metrics in `registry`.
    pub fn register(registry: &MetricsRegistry) -> MetricsResult<Self> {
        Ok(Self {
            load_time_ms: registry.register_histogram(
                NAMESPACE,
                "load_time",
                "Time to fetch and combine every chunk of a category",
                "ms",
                vec![5.0, 16.0, 50.0, 100.0, 250.0, 1000.0],
            )?,
            chunk_fetches_total: registry.register_counter(
                NAMESPACE,
                "chunk_fetches_total",
                "Total number of chunk fetches issued",
            )?,
            loads_started_total: registry.register_counter(
                NAMESPACE,
                "loads_started_total",
                "Total number of category loads started",
            )?,
            loads_failed_total: registry.register_counter(
                NAMESPACE,
                "loads_failed_total",
                "Total number of category loads that failed",
            )?,
            cache_hits_total: registry.register_counter(
                NAMESPACE,
                "cache_hits_total",
                "Total number of requests served from the cache",
            )?,
            cached_categories: registry.register_gauge(
                NAMESPACE,
                "cached_categories",
                "Number of categories held in the sprite cache",
                "categories",
            )?,
        })
    }

    /// Bumps a counter, logging instead of failing.
    pub(crate) fn bump(counter: &CounterHandle) {
        if let Err(e) = counter.increment() {
            log::warn!("Failed to update metric {}: {e}", counter.id());
        }
    }

    pub(crate) fn set_cached(&self, count: usize) {
        if let Err(e) = self.cached_categories.set(count as f64) {
            log::warn!("Failed to update metric {}: {e}", self.cached_categories.id());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registers_all_sprite_metrics() {
        let registry = MetricsRegistry::new();
        let metrics = SpriteMetrics::register(&registry).unwrap();

        assert_eq!(registry.namespace_metrics(NAMESPACE).len(), 6);

        SpriteMetrics::bump(&metrics.chunk_fetches_total);
        SpriteMetrics::bump(&metrics.chunk_fetches_total);
        metrics.set_cached(3);

        assert_eq!(registry.counter_value(NAMESPACE, "chunk_fetches_total").unwrap(), 2);
        assert_eq!(metrics.cached_categories.get().unwrap(), 3.0);
    }
}
