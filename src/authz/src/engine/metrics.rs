//! Decision metrics for operator dashboards

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::engine::decision::DenialReason;

/// Engine counters and latency percentiles
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EngineMetrics {
    /// Total number of authorization calls
    pub total_requests: u64,

    /// Number of allowed decisions
    pub allowed_decisions: u64,

    /// Number of denied decisions, all reasons
    pub denied_decisions: u64,

    /// Denials by reason
    pub unauthenticated: u64,
    pub missing_policy: u64,
    pub no_matching_rule: u64,
    pub context_failures: u64,

    /// Latency percentiles (p50, p90, p95, p99, p99.9)
    pub latency_p50_ms: f64,
    pub latency_p90_ms: f64,
    pub latency_p95_ms: f64,
    pub latency_p99_ms: f64,
    pub latency_p999_ms: f64,

    /// Average latency
    pub avg_latency_ms: f64,
}

impl EngineMetrics {
    /// Calculate allow rate
    pub fn allow_rate(&self) -> f64 {
        let total = self.allowed_decisions + self.denied_decisions;
        if total == 0 {
            0.0
        } else {
            self.allowed_decisions as f64 / total as f64
        }
    }
}

/// Counters and raw latency samples, guarded together
#[derive(Debug, Default)]
struct MetricsState {
    counters: EngineMetrics,
    latency_samples: VecDeque<f64>,
}

/// Metrics collector with Prometheus-compatible export
///
/// Recording only bumps counters and appends a sample. Percentiles are
/// computed when a snapshot is taken.
pub struct MetricsCollector {
    state: Arc<RwLock<MetricsState>>,

    /// Maximum latency samples to keep
    max_samples: usize,
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self::with_max_samples(10_000)
    }

    pub fn with_max_samples(max_samples: usize) -> Self {
        Self {
            state: Arc::new(RwLock::new(MetricsState {
                counters: EngineMetrics::default(),
                latency_samples: VecDeque::with_capacity(max_samples),
            })),
            max_samples: max_samples.max(1),
        }
    }

    /// Record one authorization outcome and its latency; `None` means allowed
    pub async fn record(&self, denial: Option<DenialReason>, latency: Duration) {
        let latency_ms = latency.as_secs_f64() * 1000.0;
        let mut state = self.state.write().await;

        if state.latency_samples.len() >= self.max_samples {
            state.latency_samples.pop_front();
        }
        state.latency_samples.push_back(latency_ms);

        let counters = &mut state.counters;
        counters.total_requests += 1;

        let Some(reason) = denial else {
            counters.allowed_decisions += 1;
            return;
        };

        counters.denied_decisions += 1;
        match reason {
            DenialReason::Unauthenticated => counters.unauthenticated += 1,
            DenialReason::NoPolicyRegistered(_) => counters.missing_policy += 1,
            DenialReason::NoMatchingRule => counters.no_matching_rule += 1,
            DenialReason::ContextUnavailable => counters.context_failures += 1,
        }
    }

    /// Get current metrics snapshot with percentiles computed from the retained samples
    pub async fn get_metrics(&self) -> EngineMetrics {
        let (mut metrics, mut sorted) = {
            let state = self.state.read().await;
            (
                state.counters.clone(),
                state.latency_samples.iter().copied().collect::<Vec<f64>>(),
            )
        };

        if sorted.is_empty() {
            return metrics;
        }

        sorted.sort_by(|a, b| a.total_cmp(b));

        let sum: f64 = sorted.iter().sum();
        metrics.avg_latency_ms = sum / sorted.len() as f64;
        metrics.latency_p50_ms = Self::percentile(&sorted, 0.50);
        metrics.latency_p90_ms = Self::percentile(&sorted, 0.90);
        metrics.latency_p95_ms = Self::percentile(&sorted, 0.95);
        metrics.latency_p99_ms = Self::percentile(&sorted, 0.99);
        metrics.latency_p999_ms = Self::percentile(&sorted, 0.999);
        metrics
    }

    /// Reset all metrics
    pub async fn reset(&self) {
        let mut state = self.state.write().await;
        state.counters = EngineMetrics::default();
        state.latency_samples.clear();
    }

    /// Export metrics in Prometheus text format
    pub async fn export_prometheus(&self) -> String {
        let metrics = self.get_metrics().await;

        format!(
            r#"# HELP authz_requests_total Total number of authorization requests
# TYPE authz_requests_total counter
authz_requests_total {}

# HELP authz_allowed_total Number of allowed decisions
# TYPE authz_allowed_total counter
authz_allowed_total {}

# HELP authz_denied_total Number of denied decisions by reason
# TYPE authz_denied_total counter
authz_denied_total{{reason="unauthenticated"}} {}
authz_denied_total{{reason="no_policy_registered"}} {}
authz_denied_total{{reason="no_matching_rule"}} {}
authz_denied_total{{reason="context_unavailable"}} {}

# HELP authz_latency_seconds Request latency percentiles
# TYPE authz_latency_seconds summary
authz_latency_seconds{{quantile="0.5"}} {}
authz_latency_seconds{{quantile="0.9"}} {}
authz_latency_seconds{{quantile="0.95"}} {}
authz_latency_seconds{{quantile="0.99"}} {}
authz_latency_seconds{{quantile="0.999"}} {}
"#,
            metrics.total_requests,
            metrics.allowed_decisions,
            metrics.unauthenticated,
            metrics.missing_policy,
            metrics.no_matching_rule,
            metrics.context_failures,
            metrics.latency_p50_ms / 1000.0,
            metrics.latency_p90_ms / 1000.0,
            metrics.latency_p95_ms / 1000.0,
            metrics.latency_p99_ms / 1000.0,
            metrics.latency_p999_ms / 1000.0,
        )
    }

    /// Calculate percentile from sorted data
    fn percentile(sorted: &[f64], p: f64) -> f64 {
        if sorted.is_empty() {
            return 0.0;
        }

        let idx = ((sorted.len() as f64) * p) as usize;
        let idx = idx.min(sorted.len() - 1);
        sorted[idx]
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::subject::SubjectType;

    #[tokio::test]
    async fn test_record_by_reason() {
        let collector = MetricsCollector::new();
        let latency = Duration::from_millis(1);

        collector.record(None, latency).await;
        collector.record(Some(DenialReason::NoMatchingRule), latency).await;
        collector
            .record(Some(DenialReason::NoPolicyRegistered(SubjectType::Media)), latency)
            .await;
        collector.record(None, latency).await;

        let metrics = collector.get_metrics().await;
        assert_eq!(metrics.total_requests, 4);
        assert_eq!(metrics.allowed_decisions, 2);
        assert_eq!(metrics.denied_decisions, 2);
        assert_eq!(metrics.missing_policy, 1);
        assert_eq!(metrics.no_matching_rule, 1);
        assert!((metrics.allow_rate() - 0.5).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_percentiles_computed_on_snapshot() {
        let collector = MetricsCollector::new();

        collector.record(None, Duration::from_millis(15)).await;
        collector.record(None, Duration::from_millis(5)).await;
        collector.record(None, Duration::from_millis(10)).await;

        let metrics = collector.get_metrics().await;
        assert!((metrics.avg_latency_ms - 10.0).abs() < 1.0);
        assert!((metrics.latency_p50_ms - 10.0).abs() < 1.0);
        assert!(metrics.latency_p99_ms >= metrics.latency_p50_ms);
    }

    #[tokio::test]
    async fn test_sample_window_is_bounded() {
        let collector = MetricsCollector::with_max_samples(3);

        for ms in [100, 1, 2, 3] {
            collector.record(None, Duration::from_millis(ms)).await;
        }

        let metrics = collector.get_metrics().await;
        assert_eq!(metrics.total_requests, 4);
        // The 100ms sample was evicted
        assert!(metrics.latency_p999_ms < 50.0);
    }

    #[tokio::test]
    async fn test_prometheus_export() {
        let collector = MetricsCollector::new();

        collector.record(None, Duration::from_millis(1)).await;
        collector
            .record(Some(DenialReason::Unauthenticated), Duration::from_millis(1))
            .await;

        let prometheus = collector.export_prometheus().await;
        assert!(prometheus.contains("authz_requests_total 2"));
        assert!(prometheus.contains("authz_allowed_total 1"));
        assert!(prometheus.contains(r#"authz_denied_total{reason="unauthenticated"} 1"#));
    }

    #[tokio::test]
    async fn test_reset() {
        let collector = MetricsCollector::new();

        collector
            .record(Some(DenialReason::ContextUnavailable), Duration::from_millis(1))
            .await;
        collector.reset().await;

        assert_eq!(collector.get_metrics().await, EngineMetrics::default());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_record_and_reset_complete() {
        let collector = Arc::new(MetricsCollector::with_max_samples(100));
        let mut handles = Vec::new();

        for i in 0..2_000u64 {
            let collector = collector.clone();
            handles.push(tokio::spawn(async move {
                if i % 2 == 0 {
                    collector.record(None, Duration::from_micros(i)).await;
                } else {
                    collector.reset().await;
                }
                collector.get_metrics().await;
            }));
        }

        let finished = tokio::time::timeout(Duration::from_secs(10), async {
            for handle in handles {
                handle.await.unwrap();
            }
        })
        .await;

        assert!(finished.is_ok(), "record and reset did not complete");
    }
}
