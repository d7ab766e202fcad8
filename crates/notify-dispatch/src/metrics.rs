//! Execution timing samples and aggregate stats.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct ExecutionSample {
    pub at: DateTime<Utc>,
    pub elapsed_ms: u64,
    pub success: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PerformanceStats {
    pub total: usize,
    pub average_ms: f64,
    pub min_ms: u64,
    pub max_ms: u64,
    /// Fraction in `0.0..=1.0`.
    pub success_rate: f64,
}

/// Ring buffer of the most recent executions.
#[derive(Debug)]
pub struct PerformanceMonitor {
    retention: usize,
    slow_threshold: Duration,
    samples: Mutex<VecDeque<ExecutionSample>>,
}

impl PerformanceMonitor {
    pub fn new(retention: usize, slow_threshold: Duration) -> Self {
        let retention = retention.max(1);
        Self {
            retention,
            slow_threshold,
            samples: Mutex::new(VecDeque::with_capacity(retention)),
        }
    }

    pub fn record(&self, elapsed: Duration, success: bool) {
        let elapsed_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
        if elapsed > self.slow_threshold {
            tracing::warn!(
                elapsed_ms,
                threshold_ms = u64::try_from(self.slow_threshold.as_millis()).unwrap_or(u64::MAX),
                "Slow notification execution"
            );
        }

        let Ok(mut samples) = self.samples.lock() else {
            return;
        };
        if samples.len() >= self.retention {
            samples.pop_front();
        }
        samples.push_back(ExecutionSample {
            at: Utc::now(),
            elapsed_ms,
            success,
        });
    }

    pub fn stats(&self) -> PerformanceStats {
        let Ok(samples) = self.samples.lock() else {
            return PerformanceStats::default();
        };
        if samples.is_empty() {
            return PerformanceStats::default();
        }

        let total = samples.len();
        let sum: u64 = samples.iter().map(|s| s.elapsed_ms).sum();
        let successes = samples.iter().filter(|s| s.success).count();
        PerformanceStats {
            total,
            average_ms: sum as f64 / total as f64,
            min_ms: samples.iter().map(|s| s.elapsed_ms).min().unwrap_or(0),
            max_ms: samples.iter().map(|s| s.elapsed_ms).max().unwrap_or(0),
            success_rate: successes as f64 / total as f64,
        }
    }

    pub fn recent(&self, limit: usize) -> Vec<ExecutionSample> {
        let Ok(samples) = self.samples.lock() else {
            return Vec::new();
        };
        let skip = samples.len().saturating_sub(limit);
        samples.iter().skip(skip).cloned().collect()
    }

    pub fn clear(&self) {
        if let Ok(mut samples) = self.samples.lock() {
            samples.clear();
        }
    }
}
