use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing::{info, warn};

use crate::entities::DeviceStatus;

/// Workflow counters
#[derive(Debug, Default)]
pub struct WorkflowMetrics {
    pub transitions: AtomicU64,
    pub approvals: AtomicU64,
    pub rejections: AtomicU64,
    pub invalid_attempts: AtomicU64,
    pub orders_placed: AtomicU64,
    arrivals: Mutex<BTreeMap<DeviceStatus, u64>>,
}

impl WorkflowMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_transition(&self, to: DeviceStatus) {
        self.transitions.fetch_add(1, Ordering::Relaxed);
        let mut arrivals = self.arrivals.lock().unwrap_or_else(|p| p.into_inner());
        *arrivals.entry(to).or_default() += 1;
    }

    pub fn record_approval(&self) {
        self.approvals.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_rejection(&self) {
        self.rejections.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_invalid_attempt(&self) {
        self.invalid_attempts.fetch_add(1, Ordering::Relaxed);
        warn!("Invalid workflow transition attempted");
    }

    pub fn record_order(&self) {
        self.orders_placed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn get_stats(&self) -> WorkflowStats {
        WorkflowStats {
            transitions: self.transitions.load(Ordering::Relaxed),
            approvals: self.approvals.load(Ordering::Relaxed),
            rejections: self.rejections.load(Ordering::Relaxed),
            invalid_attempts: self.invalid_attempts.load(Ordering::Relaxed),
            orders_placed: self.orders_placed.load(Ordering::Relaxed),
            arrivals: self
                .arrivals
                .lock()
                .unwrap_or_else(|p| p.into_inner())
                .clone(),
        }
    }

    pub fn log_stats(&self) {
        let stats = self.get_stats();
        info!(
            "Workflow metrics: transitions={}, approvals={}, rejections={}, invalid={}, orders={}",
            stats.transitions,
            stats.approvals,
            stats.rejections,
            stats.invalid_attempts,
            stats.orders_placed
        );
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowStats {
    pub transitions: u64,
    pub approvals: u64,
    pub rejections: u64,
    pub invalid_attempts: u64,
    pub orders_placed: u64,
    /// Transitions into each status
    pub arrivals: BTreeMap<DeviceStatus, u64>,
}

/// Global metrics instance
static WORKFLOW_METRICS: std::sync::LazyLock<WorkflowMetrics> =
    std::sync::LazyLock::new(WorkflowMetrics::new);

pub fn workflow_metrics() -> &'static WorkflowMetrics {
    &WORKFLOW_METRICS
}

/// Time an operation; the duration is logged when the timer is dropped
pub struct OperationTimer {
    operation: String,
    start: Instant,
}

impl OperationTimer {
    pub fn new(operation: &str) -> Self {
        Self {
            operation: operation.to_string(),
            start: Instant::now(),
        }
    }

    pub fn finish(self) -> Duration {
        self.start.elapsed()
    }
}

impl Drop for OperationTimer {
    fn drop(&mut self) {
        let duration = self.start.elapsed();
        info!(
            operation = %self.operation,
            duration_ms = duration.as_millis(),
            "Operation completed"
        );
    }
}

#[macro_export]
macro_rules! time_operation {
    ($operation:expr) => {
        let _timer = $crate::observability::OperationTimer::new($operation);
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters() {
        let metrics = WorkflowMetrics::new();
        metrics.record_transition(DeviceStatus::Qc);
        metrics.record_transition(DeviceStatus::Qc);
        metrics.record_transition(DeviceStatus::Clearance);
        metrics.record_approval();
        metrics.record_invalid_attempt();

        let stats = metrics.get_stats();
        assert_eq!(stats.transitions, 3);
        assert_eq!(stats.approvals, 1);
        assert_eq!(stats.rejections, 0);
        assert_eq!(stats.invalid_attempts, 1);
        assert_eq!(stats.arrivals[&DeviceStatus::Qc], 2);
    }

    #[test]
    fn test_timer_finishes() {
        time_operation!("noop");
        let elapsed = OperationTimer::new("explicit").finish();
        assert!(elapsed < Duration::from_secs(5));
    }
}
