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

//! RAII timers that record into histograms.

use crate::metrics::registry::HistogramHandle;
use std::time::{Duration, Instant};

/// A started wall-clock stopwatch.
#[derive(Debug, Clone, Copy)]
pub struct Stopwatch {
    started: Instant,
}

impl Stopwatch {
    /// Starts a stopwatch now.
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
        }
    }

    /// Time since the stopwatch started.
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Time since the stopwatch started, in milliseconds.
    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed().as_secs_f64() * 1000.0
    }
}

impl Default for Stopwatch {
    fn default() -> Self {
        Self::new()
    }
}

/// Times a scope and records the elapsed milliseconds into a histogram when
/// dropped, including on early return.
pub struct ScopedMetricTimer<'a> {
    stopwatch: Stopwatch,
    histogram: &'a HistogramHandle,
}

impl<'a> ScopedMetricTimer<'a> {
    /// Starts timing into `histogram`.
    pub fn new(histogram: &'a HistogramHandle) -> Self {
        Self {
            stopwatch: Stopwatch::new(),
            histogram,
        }
    }
}

impl Drop for ScopedMetricTimer<'_> {
    fn drop(&mut self) {
        if let Err(e) = self.histogram.observe(self.stopwatch.elapsed_ms()) {
            log::warn!("[ScopedMetricTimer] Failed to record metric: {e}");
        }
    }
}
