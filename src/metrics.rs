//! Client metrics collection and reporting
//!
//! Tracks live request latency, cache effectiveness and how often the
//! synthetic fallback answered.

use std::collections::VecDeque;
use std::time::Duration;
use tokio::sync::RwLock;

/// Maximum number of samples to keep for metrics calculation
const MAX_SAMPLES: usize = 100;

/// Snapshot of client metrics
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClientMetrics {
    /// 50th percentile live latency in milliseconds
    pub latency_p50_ms: f64,
    /// 99th percentile live latency in milliseconds
    pub latency_p99_ms: f64,
    /// Live requests attempted (lifetime)
    pub live_requests: u64,
    /// Live requests that failed (lifetime)
    pub live_failures: u64,
    /// Responses served from the cache
    pub cache_hits: u64,
    /// Lookups that missed or found a stale entry
    pub cache_misses: u64,
    /// Responses served by the synthetic fallback
    pub fallback_responses: u64,
}

impl ClientMetrics {
    /// Share of live requests that succeeded (1.0 with no requests)
    pub fn success_rate(&self) -> f64 {
        if self.live_requests == 0 {
            return 1.0;
        }
        (self.live_requests - self.live_failures) as f64 / self.live_requests as f64
    }
}

#[derive(Debug, Default)]
struct Counters {
    samples: VecDeque<f64>,
    live_requests: u64,
    live_failures: u64,
    cache_hits: u64,
    cache_misses: u64,
    fallback_responses: u64,
}

/// Collects client metrics
#[derive(Debug, Default)]
pub struct MetricsCollector {
    counters: RwLock<Counters>,
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a live request with its duration and outcome
    pub async fn record_live(&self, duration: Duration, success: bool) {
        let mut counters = self.counters.write().await;
        counters.live_requests += 1;

        if !success {
            counters.live_failures += 1;
            return;
        }

        if counters.samples.len() >= MAX_SAMPLES {
            counters.samples.pop_front();
        }
        counters.samples.push_back(duration.as_secs_f64() * 1000.0);
    }

    pub async fn record_cache(&self, hit: bool) {
        let mut counters = self.counters.write().await;
        if hit {
            counters.cache_hits += 1;
        } else {
            counters.cache_misses += 1;
        }
    }

    pub async fn record_fallback(&self) {
        self.counters.write().await.fallback_responses += 1;
    }

    /// Computes current metrics from collected samples
    pub async fn snapshot(&self) -> ClientMetrics {
        let counters = self.counters.read().await;

        let mut latencies: Vec<f64> = counters.samples.iter().copied().collect();
        latencies.sort_by(|a, b| a.total_cmp(b));

        ClientMetrics {
            latency_p50_ms: percentile(&latencies, 50.0),
            latency_p99_ms: percentile(&latencies, 99.0),
            live_requests: counters.live_requests,
            live_failures: counters.live_failures,
            cache_hits: counters.cache_hits,
            cache_misses: counters.cache_misses,
            fallback_responses: counters.fallback_responses,
        }
    }
}

/// Nearest-rank percentile of sorted values
fn percentile(sorted_values: &[f64], p: f64) -> f64 {
    if sorted_values.is_empty() {
        return 0.0;
    }

    let rank = (p / 100.0 * sorted_values.len() as f64).ceil() as usize;
    sorted_values[rank.saturating_sub(1).min(sorted_values.len() - 1)]
}
