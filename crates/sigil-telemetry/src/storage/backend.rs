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

use sigil_core::telemetry::{Metric, MetricId, MetricType, MetricValue, MetricsError, MetricsResult};
use std::fmt::Debug;

/// Interface of a metrics storage backend.
///
/// Backends only need to provide the primitive get/put operations; typed
/// updates are implemented on top of them.
pub trait MetricsBackend: Send + Sync + Debug + 'static {
    /// Stores or replaces a metric.
    fn put_metric(&self, metric: Metric) -> MetricsResult<()>;

    /// Retrieves a copy of a metric.
    fn get_metric(&self, id: &MetricId) -> MetricsResult<Metric>;

    /// Returns `true` if a metric is registered under `id`.
    fn contains_metric(&self, id: &MetricId) -> bool;

    /// Copies of every stored metric.
    fn list_all_metrics(&self) -> Vec<Metric>;

    /// Number of stored metrics.
    fn metric_count(&self) -> usize;

    /// Adds `delta` to a counter and returns the new value.
    fn increment_counter(&self, id: &MetricId, delta: u64) -> MetricsResult<u64> {
        let mut metric = self.get_metric(id)?;
        let MetricValue::Counter(ref mut value) = metric.value else {
            return Err(MetricsError::TypeMismatch {
                expected: MetricType::Counter,
                found: metric.value.metric_type(),
            });
        };
        *value = value.saturating_add(delta);
        let result = *value;
        metric.touch();
        self.put_metric(metric)?;
        Ok(result)
    }

    /// Sets a gauge.
    fn set_gauge(&self, id: &MetricId, new_value: f64) -> MetricsResult<()> {
        let mut metric = self.get_metric(id)?;
        let MetricValue::Gauge(ref mut value) = metric.value else {
            return Err(MetricsError::TypeMismatch {
                expected: MetricType::Gauge,
                found: metric.value.metric_type(),
            });
        };
        *value = new_value;
        metric.touch();
        self.put_metric(metric)
    }

    /// Records one histogram sample.
    fn record_histogram_sample(&self, id: &MetricId, sample: f64) -> MetricsResult<()> {
        let mut metric = self.get_metric(id)?;
        let MetricValue::Histogram {
            ref mut samples,
            ref bucket_bounds,
            ref mut bucket_counts,
        } = metric.value
        else {
            return Err(MetricsError::TypeMismatch {
                expected: MetricType::Histogram,
                found: metric.value.metric_type(),
            });
        };
        samples.push(sample);
        for (count, &bound) in bucket_counts.iter_mut().zip(bucket_bounds) {
            if sample <= bound {
                *count += 1;
            }
        }
        metric.touch();
        self.put_metric(metric)
    }
}
