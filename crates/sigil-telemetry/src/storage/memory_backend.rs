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

use crate::storage::backend::MetricsBackend;
use sigil_core::telemetry::{Metric, MetricId, MetricType, MetricValue, MetricsError, MetricsResult};
use std::collections::HashMap;
use std::sync::RwLock;

/// In-memory metrics backend behind a `RwLock<HashMap>`.
#[derive(Debug, Default)]
pub struct InMemoryBackend {
    storage: RwLock<HashMap<MetricId, Metric>>,
}

impl InMemoryBackend {
    /// Creates an empty backend.
    pub fn new() -> Self {
        Self::default()
    }
}

impl MetricsBackend for InMemoryBackend {
    fn put_metric(&self, metric: Metric) -> MetricsResult<()> {
        let mut storage = self
            .storage
            .write()
            .map_err(|_| MetricsError::StorageError("Failed to acquire write lock".to_string()))?;
        storage.insert(metric.id.clone(), metric);
        Ok(())
    }

    fn get_metric(&self, id: &MetricId) -> MetricsResult<Metric> {
        let storage = self
            .storage
            .read()
            .map_err(|_| MetricsError::StorageError("Failed to acquire read lock".to_string()))?;
        storage
            .get(id)
            .cloned()
            .ok_or_else(|| MetricsError::MetricNotFound(id.clone()))
    }

    fn contains_metric(&self, id: &MetricId) -> bool {
        self.storage
            .read()
            .map(|storage| storage.contains_key(id))
            .unwrap_or(false)
    }

    fn list_all_metrics(&self) -> Vec<Metric> {
        self.storage
            .read()
            .map(|storage| storage.values().cloned().collect())
            .unwrap_or_default()
    }

    fn metric_count(&self) -> usize {
        self.storage.read().map(|s| s.len()).unwrap_or(0)
    }

    // Updated in place under the write lock so concurrent increments are not lost.
    fn increment_counter(&self, id: &MetricId, delta: u64) -> MetricsResult<u64> {
        let mut storage = self
            .storage
            .write()
            .map_err(|_| MetricsError::StorageError("Failed to acquire write lock".to_string()))?;
        let metric = storage
            .get_mut(id)
            .ok_or_else(|| MetricsError::MetricNotFound(id.clone()))?;
        let found = metric.value.metric_type();
        let MetricValue::Counter(value) = &mut metric.value else {
            return Err(MetricsError::TypeMismatch {
                expected: MetricType::Counter,
                found,
            });
        };
        *value = value.saturating_add(delta);
        let result = *value;
        metric.touch();
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counter_increments_saturate() {
        let backend = InMemoryBackend::new();
        let id = MetricId::new("sprites", "fetches");
        backend.put_metric(Metric::counter(id.clone(), "fetches")).unwrap();

        assert_eq!(backend.increment_counter(&id, 3).unwrap(), 3);
        assert_eq!(backend.increment_counter(&id, u64::MAX).unwrap(), u64::MAX);
    }

    #[test]
    fn histogram_buckets_are_cumulative() {
        let backend = InMemoryBackend::new();
        let id = MetricId::new("sprites", "load_time");
        backend
            .put_metric(Metric::histogram(id.clone(), "t", "ms", vec![5.0, 50.0]))
            .unwrap();

        backend.record_histogram_sample(&id, 2.0).unwrap();
        backend.record_histogram_sample(&id, 20.0).unwrap();

        let MetricValue::Histogram { bucket_counts, samples, .. } = backend.get_metric(&id).unwrap().value
        else {
            panic!("expected histogram");
        };
        assert_eq!(samples, vec![2.0, 20.0]);
        assert_eq!(bucket_counts, vec![1, 2]);
    }

    #[test]
    fn wrong_type_is_rejected() {
        let backend = InMemoryBackend::new();
        let id = MetricId::new("sprites", "cached");
        backend.put_metric(Metric::gauge(id.clone(), "cached", "categories")).unwrap();

        let err = backend.increment_counter(&id, 1).unwrap_err();
        assert_eq!(
            err,
            MetricsError::TypeMismatch {
                expected: MetricType::Counter,
                found: MetricType::Gauge
            }
        );
    }

    #[test]
    fn metrics_are_listed_and_looked_up_by_id() {
        let backend = InMemoryBackend::new();
        backend.put_metric(Metric::counter(MetricId::new("sprites", "a"), "a")).unwrap();
        backend.put_metric(Metric::counter(MetricId::new("sprites", "b"), "b")).unwrap();
        backend.put_metric(Metric::counter(MetricId::new("other", "c"), "c")).unwrap();

        assert_eq!(backend.list_all_metrics().len(), 3);
        assert_eq!(backend.metric_count(), 3);
        assert!(!backend.contains_metric(&MetricId::new("sprites", "c")));
    }
}
