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

//! Metric identifiers, values and errors.

use std::fmt::{self, Display};
use std::time::Instant;
use thiserror::Error;

/// A structured metric identifier: namespace and name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MetricId {
    /// Broad area of the metric (e.g. "sprites").
    pub namespace: String,
    /// Specific name of the metric (e.g. "chunk_fetches_total").
    pub name: String,
}

impl MetricId {
    /// Creates an id.
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }
}

impl Display for MetricId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.name)
    }
}

/// The kind of a metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricType {
    /// Monotonically increasing count.
    Counter,
    /// Value that can go up and down.
    Gauge,
    /// Distribution of observed samples.
    Histogram,
}

/// The current value of a metric.
#[derive(Debug, Clone, PartialEq)]
pub enum MetricValue {
    /// Counter value.
    Counter(u64),
    /// Gauge value.
    Gauge(f64),
    /// Raw samples and cumulative bucket counts.
    Histogram {
        /// Every observed sample.
        samples: Vec<f64>,
        /// Upper bounds of the buckets.
        bucket_bounds: Vec<f64>,
        /// Number of samples `<=` each bound.
        bucket_counts: Vec<u64>,
    },
}

impl MetricValue {
    /// The [`MetricType`] of this value.
    pub fn metric_type(&self) -> MetricType {
        match self {
            MetricValue::Counter(_) => MetricType::Counter,
            MetricValue::Gauge(_) => MetricType::Gauge,
            MetricValue::Histogram { .. } => MetricType::Histogram,
        }
    }

    /// The counter value, if this is a counter.
    pub fn as_counter(&self) -> Option<u64> {
        match self {
            MetricValue::Counter(v) => Some(*v),
            _ => None,
        }
    }

    /// The gauge value, if this is a gauge.
    pub fn as_gauge(&self) -> Option<f64> {
        match self {
            MetricValue::Gauge(v) => Some(*v),
            _ => None,
        }
    }
}

/// A registered metric with its description.
#[derive(Debug, Clone)]
pub struct Metric {
    /// Identifier.
    pub id: MetricId,
    /// Human-readable description.
    pub description: String,
    /// Unit of measurement ("count", "ms", ...).
    pub unit: String,
    /// Current value.
    pub value: MetricValue,
    /// When the value last changed.
    pub last_updated: Instant,
}

impl Metric {
    fn new(id: MetricId, description: String, unit: String, value: MetricValue) -> Self {
        Self {
            id,
            description,
            unit,
            value,
            last_updated: Instant::now(),
        }
    }

    /// A counter starting at zero.
    pub fn counter(id: MetricId, description: impl Into<String>) -> Self {
        Self::new(id, description.into(), "count".into(), MetricValue::Counter(0))
    }

    /// A gauge starting at zero.
    pub fn gauge(id: MetricId, description: impl Into<String>, unit: impl Into<String>) -> Self {
        Self::new(id, description.into(), unit.into(), MetricValue::Gauge(0.0))
    }

    /// An empty histogram with the given bucket bounds.
    pub fn histogram(
        id: MetricId,
        description: impl Into<String>,
        unit: impl Into<String>,
        bucket_bounds: Vec<f64>,
    ) -> Self {
        let bucket_counts = vec![0; bucket_bounds.len()];
        Self::new(
            id,
            description.into(),
            unit.into(),
            MetricValue::Histogram {
                samples: Vec::new(),
                bucket_bounds,
                bucket_counts,
            },
        )
    }

    /// Refreshes [`last_updated`](Metric::last_updated).
    pub fn touch(&mut self) {
        self.last_updated = Instant::now();
    }
}

/// Result alias for metric operations.
pub type MetricsResult<T> = Result<T, MetricsError>;

/// An error raised by the metrics system.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MetricsError {
    /// No metric is registered under this id.
    #[error("metric not found: {0}")]
    MetricNotFound(MetricId),
    /// The operation does not apply to the metric's type.
    #[error("type mismatch: expected {expected:?}, found {found:?}")]
    TypeMismatch {
        /// Type the operation needs.
        expected: MetricType,
        /// Type actually registered.
        found: MetricType,
    },
    /// The storage backend failed (e.g. a poisoned lock).
    #[error("storage error: {0}")]
    StorageError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_is_displayed_as_namespace_and_name() {
        assert_eq!(MetricId::new("sprites", "loads").to_string(), "sprites:loads");
    }

    #[test]
    fn constructors_pick_types() {
        let counter = Metric::counter(MetricId::new("t", "c"), "c");
        assert_eq!(counter.value.as_counter(), Some(0));
        assert_eq!(counter.unit, "count");

        let histogram = Metric::histogram(MetricId::new("t", "h"), "h", "ms", vec![1.0, 10.0]);
        assert_eq!(histogram.value.metric_type(), MetricType::Histogram);
        assert_eq!(histogram.value.as_gauge(), None);
    }
}
