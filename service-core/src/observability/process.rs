//! Process gauges in the shape Prometheus client libraries export by default.

use metrics::{describe_gauge, gauge, Unit};
use std::sync::Mutex;
use sysinfo::{Pid, ProcessRefreshKind, ProcessesToUpdate, System};

pub struct ProcessCollector {
    pid: Pid,
    system: Mutex<System>,
}

impl ProcessCollector {
    /// `None` when the current process cannot be inspected.
    pub fn new() -> Option<Self> {
        if !sysinfo::IS_SUPPORTED_SYSTEM {
            return None;
        }
        let pid = sysinfo::get_current_pid().ok()?;

        Some(Self {
            pid,
            system: Mutex::new(System::new()),
        })
    }

    pub fn describe() {
        describe_gauge!(
            "process_resident_memory_bytes",
            Unit::Bytes,
            "Resident memory size in bytes."
        );
        describe_gauge!(
            "process_virtual_memory_bytes",
            Unit::Bytes,
            "Virtual memory size in bytes."
        );
        describe_gauge!(
            "process_start_time_seconds",
            Unit::Seconds,
            "Start time of the process since unix epoch in seconds."
        );
    }

    /// Refresh the process and set the gauges on the active recorder.
    pub fn collect(&self) {
        let Ok(mut system) = self.system.lock() else {
            return;
        };

        system.refresh_processes_specifics(
            ProcessesToUpdate::Some(&[self.pid]),
            true,
            ProcessRefreshKind::nothing().with_memory(),
        );

        let Some(process) = system.process(self.pid) else {
            tracing::debug!(pid = %self.pid, "Process not visible to sysinfo");
            return;
        };

        gauge!("process_resident_memory_bytes").set(process.memory() as f64);
        gauge!("process_virtual_memory_bytes").set(process.virtual_memory() as f64);
        gauge!("process_start_time_seconds").set(process.start_time() as f64);
    }
}
