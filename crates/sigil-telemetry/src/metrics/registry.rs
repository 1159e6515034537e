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

//! Registry for sprite metrics.

use crate::storage::{backend::MetricsBackend, memory_backend::InMemoryBackend};
use sigil_core::telemetry::{Metric, MetricId, MetricType, MetricsError, MetricsResult};
use std::sync::Arc;

/// Central registry of metrics.
///
/// Registration returns a typed handle that updates the shared backend, so
/// hot paths never look metrics up by name.
#[derive(Debug, Clone)]
pub struct MetricsRegistry {
    backend: Arc<dyn MetricsBackend>,
}

impl MetricsRegistry {
    /// Creates a registry over a fresh in-memory backend.
    pub fn new() -> Self {
        Self {
            backend: Arc::new(InMemoryBackend::new()),
        }
    }

    /// Creates a registry over a custom backend.
    pub fn with_backend(backend: Arc<dyn MetricsBackend>) -> Self {
        Self { backend }
    }

    /// Registers a counter.
    pub fn register_counter(
        &self,
        namespace: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> MetricsResult<CounterHandle> {
        let id = MetricId::new(namespace, name);
        self.backend.put_metric(Metric::counter(id.clone(), description))?;
        Ok(CounterHandle {
            id,
            backend: self.backend.clone(),
        })
    }

    /// Registers a gauge.
    pub fn register_gauge(
        &self,
        namespace: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        unit: impl Into<String>,
    ) -> MetricsResult<GaugeHandle> {
        let id = MetricId::new(namespace, name);
        self.backend
            .put_metric(Metric::gauge(id.clone(), description, unit))?;
        Ok(GaugeHandle {
            id,
            backend: self.backend.clone(),
        })
    }

    /// Registers a histogram with the given bucket upper bounds.
    pub fn register_histogram(
        &self,
        namespace: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        unit: impl Into<String>,
        buckets: Vec<f64>,
    ) -> MetricsResult<HistogramHandle> {
        let id = MetricId::new(namespace, name);
        self.backend
            .put_metric(Metric::histogram(id.clone(), description, unit, buckets))?;
        Ok(HistogramHandle {
            id,
            backend: self.backend.clone(),
        })
    }

    /// Retrieves a metric by id.
    pub fn get_metric(&self, id: &MetricId) -> MetricsResult<Metric> {
        self.backend.get_metric(id)
    }

    /// Reads a counter by namespace and name, e.g. from tests or a status page.
    pub fn counter_value(&self, namespace: &str, name: &str) -> MetricsResult<u64> {
        let metric = self.backend.get_metric(&MetricId::new(namespace, name))?;
        metric
            .value
            .as_counter()
            .ok_or(MetricsError::TypeMismatch {
                expected: MetricType::Counter,
                found: metric.value.metric_type(),
            })
    }

    /// All metrics in a namespace.
    pub fn namespace_metrics(&self, namespace: &str) -> Vec<Metric> {
        self.backend
            .list_all_metrics()
            .into_iter()
            .filter(|metric| metric.id.namespace == namespace)
            .collect()
    }

    /// Number of registered metrics.
    pub fn metric_count(&self) -> usize {
        self.backend.metric_count()
    }
}

impl Default for MetricsRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle for counter updates.
#[derive(Debug, Clone)]
pub struct CounterHandle {
    id: MetricId,
    backend: Arc<dyn MetricsBackend>,
}

impl CounterHandle {
    /// Increments by one, returning the new value.
    pub fn increment(&self) -> MetricsResult<u64> {
        self.backend.increment_counter(&self.id, 1)
    }

    /// Current value.
    pub fn get(&self) -> MetricsResult<u64> {
        let metric = self.backend.get_metric(&self.id)?;
        metric
            .value
            .as_counter()
            .ok_or(MetricsError::TypeMismatch {
                expected: MetricType::Counter,
                found: metric.value.metric_type(),
            })
    }

    /// The metric id.
    pub fn id(&self) -> &MetricId {
        &self.id
    }
}

/// Handle for gauge updates.
#[derive(Debug, Clone)]
pub struct GaugeHandle {
    id: MetricId,
    backend: Arc<dyn MetricsBackend>,
}

impl GaugeHandle {
    /// Sets the gauge.
    pub fn set(&self, value: f64) -> MetricsResult<()> {
        self.backend.set_gauge(&self.id, value)
    }

    /// Current value.
    pub fn get(&self) -> MetricsResult<f64> {
        let metric = self.backend.get_metric(&self.id)?;
        metric.value.as_gauge().ok_or(MetricsError::TypeMismatch {
            expected: MetricType::Gauge,
            found: metric.value.metric_type(),
        })
    }

    /// The metric id.
    pub fn id(&self) -> &MetricId {
        &self.id
    }
}

/// Handle for histogram samples.
#[derive(Debug, Clone)]
pub struct HistogramHandle {
    id: MetricId,
    backend: Arc<dyn MetricsBackend>,
}

impl HistogramHandle {
    /// Records a sample.
    pub fn observe(&self, value: f64) -> MetricsResult<()> {
        self.backend.record_histogram_sample(&self.id, value)
    }

    /// The full histogram metric.
    pub fn get_metric(&self) -> MetricsResult<Metric> {
        self.backend.get_metric(&self.id)
    }

    /// The metric id.
    pub fn id(&self) -> &MetricId {
        &self.id
    }
}
