use super::{SampleError, SampleSource};
use sysinfo::System;

pub struct SysinfoSource {
    sys: System,
    core_count: usize,
}

impl SysinfoSource {
    pub fn new() -> Self {
        let mut sys = System::new();
        // The first refresh only records the counters; usage is a delta
        // against it, so the first tick already has something to compare to.
        sys.refresh_cpu_usage();
        let core_count = sys.cpus().len();
        if core_count == 0 {
            log::warn!("sysinfo reported no CPUs, history disabled");
        }
        Self { sys, core_count }
    }
}

impl Default for SysinfoSource {
    fn default() -> Self {
        Self::new()
    }
}

impl SampleSource for SysinfoSource {
    fn core_count(&self) -> usize {
        self.core_count
    }

    fn sample_all_cores(&mut self, _now_us: i64) -> Result<Vec<f32>, SampleError> {
        self.sys.refresh_cpu_usage();
        let cpus = self.sys.cpus();
        if cpus.is_empty() {
            return Err(SampleError::NoCores);
        }
        if cpus.len() != self.core_count {
            return Err(SampleError::CoreCountChanged {
                expected: self.core_count,
                got: cpus.len(),
            });
        }

        let mut loads = Vec::with_capacity(cpus.len() + 1);
        loads.push(normalize(self.sys.global_cpu_usage()));
        loads.extend(cpus.iter().map(|cpu| normalize(cpu.cpu_usage())));
        Ok(loads)
    }

    fn load_average(&self) -> Option<[f64; 3]> {
        read_load_average()
    }
}

/// sysinfo reports percentages.
fn normalize(percent: f32) -> f32 {
    if percent.is_finite() {
        (percent / 100.0).clamp(0.0, 1.0)
    } else {
        0.0
    }
}

#[cfg(unix)]
fn read_load_average() -> Option<[f64; 3]> {
    let mut loadavg = [0.0_f64; 3];
    let n = unsafe { libc::getloadavg(loadavg.as_mut_ptr(), 3) };
    (n == 3).then_some(loadavg)
}

#[cfg(not(unix))]
fn read_load_average() -> Option<[f64; 3]> {
    None
}
