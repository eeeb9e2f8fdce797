use std::time::{Duration, Instant};
#[cfg(feature = "cli")]
use sysinfo::{Pid, RefreshKind, System};

#[derive(Debug, Clone)]
pub struct ResourceSnapshot {
    pub phase: String,
    pub cpu_usage: f32,
    pub memory_usage_mb: u64,
    pub elapsed: Duration,
}

/// Logs CPU and memory usage at named checkpoints of a run.
#[cfg(feature = "cli")]
pub struct ResourceMonitor {
    system: Option<(System, Pid)>,
    started: Instant,
    peak_memory_mb: u64,
    snapshots: Vec<ResourceSnapshot>,
}

#[cfg(feature = "cli")]
impl ResourceMonitor {
    pub fn new(enabled: bool) -> Self {
        let system = if enabled {
            match sysinfo::get_current_pid() {
                Ok(pid) => {
                    let mut system = System::new_with_specifics(RefreshKind::everything());
                    system.refresh_all();
                    Some((system, pid))
                }
                Err(e) => {
                    tracing::warn!("Resource monitoring disabled: {}", e);
                    None
                }
            }
        } else {
            None
        };

        Self {
            system,
            started: Instant::now(),
            peak_memory_mb: 0,
            snapshots: Vec::new(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.system.is_some()
    }

    pub fn checkpoint(&mut self, phase: &str) {
        let Some((system, pid)) = self.system.as_mut() else {
            return;
        };
        system.refresh_all();
        let Some(process) = system.process(*pid) else {
            return;
        };

        let snapshot = ResourceSnapshot {
            phase: phase.to_string(),
            cpu_usage: process.cpu_usage(),
            memory_usage_mb: process.memory() / 1024 / 1024,
            elapsed: self.started.elapsed(),
        };
        self.peak_memory_mb = self.peak_memory_mb.max(snapshot.memory_usage_mb);

        tracing::info!(
            "📊 {} - CPU: {:.1}%, Memory: {}MB, Time: {:?}",
            snapshot.phase,
            snapshot.cpu_usage,
            snapshot.memory_usage_mb,
            snapshot.elapsed
        );
        self.snapshots.push(snapshot);
    }

    pub fn log_summary(&self) {
        if self.is_enabled() {
            tracing::info!(
                "📊 Final Stats - Total Time: {:?}, Peak Memory: {}MB, Checkpoints: {}",
                self.started.elapsed(),
                self.peak_memory_mb,
                self.snapshots.len()
            );
        }
    }
}

// Without the cli feature there is no sysinfo; only timings are kept.
#[cfg(not(feature = "cli"))]
pub struct ResourceMonitor {
    started: Instant,
}

#[cfg(not(feature = "cli"))]
impl ResourceMonitor {
    pub fn new(_enabled: bool) -> Self {
        Self {
            started: Instant::now(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        false
    }

    pub fn checkpoint(&mut self, _phase: &str) {}

    pub fn log_summary(&self) {
        tracing::debug!("Run finished after {:?}", self.started.elapsed());
    }
}
