//! Metrics collection and Prometheus export.
//!
//! Each application owns a [`MetricsRegistry`] instead of relying on the
//! process-global recorder, so several instances can share a process (as
//! integration tests do) without mixing their counters.

use super::process::ProcessCollector;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle, PrometheusRecorder};
use std::sync::Arc;

/// Content type of the Prometheus text exposition format.
pub const PROMETHEUS_CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

#[derive(Clone)]
pub struct MetricsRegistry {
    recorder: Arc<PrometheusRecorder>,
    handle: PrometheusHandle,
    process: Option<Arc<ProcessCollector>>,
}

impl MetricsRegistry {
    pub fn new() -> Self {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();

        Self {
            recorder: Arc::new(recorder),
            handle,
            process: None,
        }
    }

    /// Also expose `process_*` gauges, refreshed on every render.
    ///
    /// Left unchanged on platforms `sysinfo` cannot inspect.
    pub fn with_process_metrics(mut self) -> Self {
        if let Some(collector) = ProcessCollector::new() {
            self.record(ProcessCollector::describe);
            self.process = Some(Arc::new(collector));
        }
        self
    }

    /// Run `f` with this registry as the active recorder.
    ///
    /// The `metrics` macros (`counter!`, `describe_counter!`, ...) invoked
    /// inside `f` register against this registry. Handles they return stay
    /// bound to it after `f` returns.
    pub fn record<T>(&self, f: impl FnOnce() -> T) -> T {
        metrics::with_local_recorder(self.recorder.as_ref(), f)
    }

    /// Current metrics in Prometheus text format.
    pub fn render(&self) -> String {
        if let Some(process) = &self.process {
            self.record(|| process.collect());
        }
        self.handle.render()
    }
}

impl Default for MetricsRegistry {
    fn default() -> Self {
        Self::new()
    }
}
