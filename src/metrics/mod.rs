pub mod cpu;
pub mod history;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SampleError {
    #[error("no CPU cores reported")]
    NoCores,
    #[error("core count changed from {expected} to {got}")]
    CoreCountChanged { expected: usize, got: usize },
}

/// Anything that can report one load per core for the current tick.
///
/// The returned vector holds the aggregate at index 0 followed by one entry
/// per real core, each in `0.0..=1.0`.
pub trait SampleSource {
    /// Real cores, not counting the aggregate.
    fn core_count(&self) -> usize;

    fn sample_all_cores(&mut self, now_us: i64) -> Result<Vec<f32>, SampleError>;

    /// One-, five- and fifteen-minute load averages, where the platform has them.
    fn load_average(&self) -> Option<[f64; 3]> {
        None
    }
}

/// Wall clock in microseconds since the Unix epoch.
pub fn now_micros() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_micros() as i64)
        .unwrap_or_default()
}
