//! Request performance metrics for the AI boundary.
//!
//! Constructed once at startup and shared by handle — deliberately not
//! a module-level singleton.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use serde::Serialize;

/// Only the most recent window of latencies is kept.
const LATENCY_WINDOW: usize = 100;
const SLOW_RESPONSE_MS: u64 = 5000;
const FAST_RESPONSE_MS: u64 = 2000;

#[derive(Debug, Default)]
struct MetricsInner {
    latencies_ms: VecDeque<u64>,
    total_requests: u64,
    errors: u64,
}

#[derive(Debug, Default)]
pub struct PerformanceMetrics {
    inner: Mutex<MetricsInner>,
}

/// Point-in-time view reported by the status endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub total_requests: u64,
    pub error_rate: f64,
    pub average_response_ms: u64,
    pub p95_response_ms: u64,
    pub fast_responses: usize,
    pub slow_responses: usize,
}

impl PerformanceMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, latency: Duration, error: bool) {
        let Ok(mut inner) = self.inner.lock() else {
            return;
        };
        inner.total_requests += 1;
        if error {
            inner.errors += 1;
        }
        inner.latencies_ms.push_back(latency.as_millis() as u64);
        while inner.latencies_ms.len() > LATENCY_WINDOW {
            inner.latencies_ms.pop_front();
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let Ok(inner) = self.inner.lock() else {
            return MetricsSnapshot {
                total_requests: 0,
                error_rate: 0.0,
                average_response_ms: 0,
                p95_response_ms: 0,
                fast_responses: 0,
                slow_responses: 0,
            };
        };

        let average = if inner.latencies_ms.is_empty() {
            0
        } else {
            inner.latencies_ms.iter().sum::<u64>() / inner.latencies_ms.len() as u64
        };

        let error_rate = if inner.total_requests == 0 {
            0.0
        } else {
            (inner.errors as f64 / inner.total_requests as f64) * 100.0
        };

        MetricsSnapshot {
            total_requests: inner.total_requests,
            error_rate,
            average_response_ms: average,
            p95_response_ms: percentile(&inner.latencies_ms, 95),
            fast_responses: inner
                .latencies_ms
                .iter()
                .filter(|&&ms| ms < FAST_RESPONSE_MS)
                .count(),
            slow_responses: inner
                .latencies_ms
                .iter()
                .filter(|&&ms| ms > SLOW_RESPONSE_MS)
                .count(),
        }
    }
}

fn percentile(values: &VecDeque<u64>, pct: usize) -> u64 {
    if values.is_empty() {
        return 0;
    }
    let mut sorted: Vec<u64> = values.iter().copied().collect();
    sorted.sort_unstable();
    let rank = (pct * sorted.len()).div_ceil(100);
    sorted[rank.saturating_sub(1).min(sorted.len() - 1)]
}
