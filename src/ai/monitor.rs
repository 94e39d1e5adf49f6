//! Background health monitor for the external AI endpoint.
//!
//! One probe per tick on a fixed interval (default 60 s). The monitor
//! task owns its probe loop; handlers only read the shared stats.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use serde::Serialize;
use tokio::sync::oneshot;

use super::colab::ModelClient;
use super::AiError;

/// Accumulated health-check statistics.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MonitorStats {
    pub total_checks: u64,
    pub successful_checks: u64,
    pub failed_checks: u64,
    pub timeouts: u64,
    pub average_response_ms: u64,
    pub last_success: Option<String>,
    pub last_failure: Option<String>,
}

impl MonitorStats {
    fn record_success(&mut self, elapsed: Duration) {
        self.total_checks += 1;
        self.successful_checks += 1;
        // Rolling mean over successful probes only
        let elapsed_ms = elapsed.as_millis() as u64;
        self.average_response_ms = (self.average_response_ms
            * (self.successful_checks - 1)
            + elapsed_ms)
            / self.successful_checks;
        self.last_success = Some(chrono::Utc::now().to_rfc3339());
    }

    fn record_failure(&mut self, error: &AiError) {
        self.total_checks += 1;
        self.failed_checks += 1;
        if matches!(error, AiError::Timeout { .. }) {
            self.timeouts += 1;
        }
        self.last_failure = Some(chrono::Utc::now().to_rfc3339());
    }
}

/// Handle to the running monitor task. Dropping it (or calling
/// `shutdown`) stops the loop.
pub struct HealthMonitor {
    stats: Arc<Mutex<MonitorStats>>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl HealthMonitor {
    /// Spawn the monitor loop against the given client.
    pub fn spawn(client: Arc<dyn ModelClient>, interval: Duration) -> Self {
        let stats = Arc::new(Mutex::new(MonitorStats::default()));
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel::<()>();

        let loop_stats = Arc::clone(&stats);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // First tick fires immediately — that is the initial check
            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => {
                        tracing::info!("AI health monitor stopped");
                        break;
                    }
                    _ = ticker.tick() => {
                        perform_health_check(client.as_ref(), &loop_stats).await;
                    }
                }
            }
        });

        Self {
            stats,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    /// A monitor that never probes, for configurations with the AI
    /// service disabled. Stats stay at zero.
    pub fn disabled() -> Self {
        Self {
            stats: Arc::new(Mutex::new(MonitorStats::default())),
            shutdown_tx: None,
        }
    }

    pub fn stats(&self) -> MonitorStats {
        self.stats
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    pub fn shutdown(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for HealthMonitor {
    fn drop(&mut self) {
        self.shutdown();
    }
}

async fn perform_health_check(client: &dyn ModelClient, stats: &Arc<Mutex<MonitorStats>>) {
    let start = Instant::now();
    match client.health_check().await {
        Ok(()) => {
            let elapsed = start.elapsed();
            tracing::debug!(elapsed_ms = elapsed.as_millis() as u64, "AI endpoint healthy");
            if let Ok(mut guard) = stats.lock() {
                guard.record_success(elapsed);
            }
        }
        Err(error) => {
            tracing::warn!(%error, "AI health check failed");
            if let Ok(mut guard) = stats.lock() {
                guard.record_failure(&error);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::colab::{MockBehavior, MockModelClient};

    #[test]
    fn stats_record_success_updates_average() {
        let mut stats = MonitorStats::default();
        stats.record_success(Duration::from_millis(100));
        stats.record_success(Duration::from_millis(300));

        assert_eq!(stats.total_checks, 2);
        assert_eq!(stats.successful_checks, 2);
        assert_eq!(stats.average_response_ms, 200);
        assert!(stats.last_success.is_some());
        assert!(stats.last_failure.is_none());
    }

    #[test]
    fn stats_record_failure_counts_timeouts() {
        let mut stats = MonitorStats::default();
        stats.record_failure(&AiError::Timeout { seconds: 5 });
        stats.record_failure(&AiError::Connection("http://x".into()));

        assert_eq!(stats.total_checks, 2);
        assert_eq!(stats.failed_checks, 2);
        assert_eq!(stats.timeouts, 1);
        assert!(stats.last_failure.is_some());
    }

    #[tokio::test]
    async fn monitor_probes_healthy_endpoint() {
        let client: Arc<dyn ModelClient> = Arc::new(MockModelClient::replying("ok"));
        let monitor = HealthMonitor::spawn(client, Duration::from_millis(10));

        tokio::time::sleep(Duration::from_millis(50)).await;
        let stats = monitor.stats();
        assert!(stats.total_checks >= 1);
        assert_eq!(stats.failed_checks, 0);
    }

    #[tokio::test]
    async fn monitor_records_failures() {
        let client: Arc<dyn ModelClient> =
            Arc::new(MockModelClient::failing(MockBehavior::Connection));
        let monitor = HealthMonitor::spawn(client, Duration::from_millis(10));

        tokio::time::sleep(Duration::from_millis(50)).await;
        let stats = monitor.stats();
        assert!(stats.failed_checks >= 1);
        assert_eq!(stats.successful_checks, 0);
    }

    #[tokio::test]
    async fn shutdown_stops_probing() {
        let client: Arc<dyn ModelClient> = Arc::new(MockModelClient::replying("ok"));
        let mut monitor = HealthMonitor::spawn(client, Duration::from_millis(10));

        tokio::time::sleep(Duration::from_millis(30)).await;
        monitor.shutdown();
        let after_shutdown = monitor.stats().total_checks;

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(monitor.stats().total_checks, after_shutdown);
    }

    #[tokio::test]
    async fn disabled_monitor_stays_idle() {
        let monitor = HealthMonitor::disabled();
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(monitor.stats().total_checks, 0);
    }
}
