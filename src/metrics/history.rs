use thiserror::Error;

/// Floor for the physical history length, in columns, whatever the UI asks for.
pub const MAX_VISIBLE_COLUMNS: usize = 256;
/// Upper clamp on a requested logical history length.
pub const MAX_HISTORY_SIZE: usize = 100 * 1000;
/// Ceiling on the physical ring length per core. Holds `MAX_HISTORY_SIZE`
/// columns at a 20x cadence spread.
pub const MAX_CAPACITY: usize = 1 << 21;

/// One timestamped load reading for one core.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Sample {
    /// Microseconds since the Unix epoch, or zero when the slot was never written.
    pub timestamp: i64,
    /// Load in `0.0..=1.0`.
    pub value: f32,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum HistoryError {
    #[error("history is disabled: no cores are tracked")]
    NoCores,
    #[error("core {core} out of range ({cores} tracked)")]
    CoreOutOfRange { core: usize, cores: usize },
    #[error("age {age} out of range ({filled} samples held)")]
    AgeOutOfRange { age: usize, filled: usize },
    #[error("expected {expected} values per tick, got {got}")]
    ValueCount { expected: usize, got: usize },
}

/// Per-core circular sample buffers sharing one cursor.
///
/// Index 0 is the aggregate pseudo-core. The sample `k` ticks older than the
/// newest one lives at `buffers[core][(cursor + k) & mask]`, so appending
/// moves the cursor backwards and never shifts data.
pub struct HistoryStore {
    buffers: Vec<Vec<Sample>>,
    capacity: usize,
    filled: usize,
    cursor: usize,
    visible_len: usize,
    max_visible_columns: usize,
}

impl HistoryStore {
    /// `core_count` includes the aggregate pseudo-core. Zero leaves the store
    /// disabled until it is rebuilt.
    pub fn new(core_count: usize) -> Self {
        Self::with_visible_columns(core_count, MAX_VISIBLE_COLUMNS)
    }

    pub fn with_visible_columns(core_count: usize, max_visible_columns: usize) -> Self {
        Self {
            buffers: vec![vec![Sample::default(); 1]; core_count],
            capacity: 1,
            filled: 0,
            cursor: 0,
            visible_len: 1,
            max_visible_columns: max_visible_columns.max(1),
        }
    }

    pub fn core_count(&self) -> usize {
        self.buffers.len()
    }

    pub fn is_enabled(&self) -> bool {
        !self.buffers.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn filled(&self) -> usize {
        self.filled
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn visible_len(&self) -> usize {
        self.visible_len
    }

    fn mask(&self) -> usize {
        self.capacity - 1
    }

    /// Smallest power of two that holds `columns` samples at the slowest
    /// cadence when ticking at the fastest one.
    pub fn target_capacity(
        &self,
        requested: usize,
        fastest_interval_ms: u64,
        slowest_interval_ms: u64,
    ) -> usize {
        let fastest = usize::try_from(fastest_interval_ms.max(1)).unwrap_or(usize::MAX);
        let slowest = usize::try_from(slowest_interval_ms)
            .unwrap_or(usize::MAX)
            .max(fastest);
        let floor = self.max_visible_columns.saturating_mul(slowest) / fastest;
        let wanted = requested.saturating_mul(slowest) / fastest;
        floor
            .max(wanted)
            .clamp(1, MAX_CAPACITY)
            .checked_next_power_of_two()
            .unwrap_or(MAX_CAPACITY)
    }

    pub fn resize(
        &mut self,
        requested_logical_length: usize,
        fastest_interval_ms: u64,
        slowest_interval_ms: u64,
    ) {
        let requested = requested_logical_length.clamp(1, MAX_HISTORY_SIZE);
        let target = self.target_capacity(requested, fastest_interval_ms, slowest_interval_ms);

        if target != self.capacity {
            let old_mask = self.mask();
            let old_cursor = self.cursor;
            let keep = self.capacity.min(target);

            let resized: Vec<Vec<Sample>> = self
                .buffers
                .iter()
                .map(|old| {
                    let mut fresh = vec![Sample::default(); target];
                    for (i, slot) in fresh.iter_mut().take(keep).enumerate() {
                        *slot = old[(old_cursor + i) & old_mask];
                    }
                    fresh
                })
                .collect();

            log::info!(
                "history capacity {} -> {} ({} cores, {} samples kept)",
                self.capacity,
                target,
                self.buffers.len(),
                self.filled.min(keep)
            );

            self.buffers = resized;
            self.capacity = target;
            self.cursor = 0;
            self.filled = self.filled.min(keep);
        }

        self.visible_len = requested;
    }

    /// Prepends one tick. `values` must hold one load per tracked core.
    pub fn append(&mut self, timestamp: i64, values: &[f32]) -> Result<(), HistoryError> {
        if self.buffers.is_empty() {
            return Ok(());
        }
        if values.len() != self.buffers.len() {
            return Err(HistoryError::ValueCount {
                expected: self.buffers.len(),
                got: values.len(),
            });
        }

        self.cursor = self.cursor.wrapping_sub(1) & self.mask();
        for (buffer, &value) in self.buffers.iter_mut().zip(values) {
            buffer[self.cursor] = Sample {
                timestamp,
                value: value.clamp(0.0, 1.0),
            };
        }
        self.filled = (self.filled + 1).min(self.capacity);
        Ok(())
    }

    fn check_core(&self, core: usize) -> Result<&[Sample], HistoryError> {
        if self.buffers.is_empty() {
            return Err(HistoryError::NoCores);
        }
        self.buffers
            .get(core)
            .map(Vec::as_slice)
            .ok_or(HistoryError::CoreOutOfRange {
                core,
                cores: self.buffers.len(),
            })
    }

    pub fn latest(&self, core: usize) -> Result<Sample, HistoryError> {
        let buffer = self.check_core(core)?;
        Ok(buffer[self.cursor])
    }

    pub fn at(&self, core: usize, age: usize) -> Result<Sample, HistoryError> {
        let buffer = self.check_core(core)?;
        if age >= self.filled {
            return Err(HistoryError::AgeOutOfRange {
                age,
                filled: self.filled,
            });
        }
        Ok(buffer[(self.cursor + age) & self.mask()])
    }
}
