use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::metrics::history::HistoryStore;
use crate::metrics::SampleSource;
use crate::ui::palette::Palette;
use crate::ui::waterfall::ScrollingRenderer;

/// Sampling cadence. Persisted as its index.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(try_from = "u8", into = "u8")]
pub enum UpdateRate {
    #[value(name = "100ms")]
    Rate100ms,
    #[default]
    #[value(name = "200ms")]
    Rate200ms,
    #[value(name = "500ms")]
    Rate500ms,
    #[value(name = "1s")]
    Rate1s,
    #[value(name = "2s")]
    Rate2s,
}

impl UpdateRate {
    pub const ALL: [UpdateRate; 5] = [
        UpdateRate::Rate100ms,
        UpdateRate::Rate200ms,
        UpdateRate::Rate500ms,
        UpdateRate::Rate1s,
        UpdateRate::Rate2s,
    ];
    pub const FASTEST: UpdateRate = UpdateRate::Rate100ms;
    pub const SLOWEST: UpdateRate = UpdateRate::Rate2s;

    pub fn interval_ms(self) -> u64 {
        match self {
            UpdateRate::Rate100ms => 100,
            UpdateRate::Rate200ms => 200,
            UpdateRate::Rate500ms => 500,
            UpdateRate::Rate1s => 1000,
            UpdateRate::Rate2s => 2000,
        }
    }

    pub fn interval(self) -> Duration {
        Duration::from_millis(self.interval_ms())
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn faster(self) -> Self {
        Self::ALL[self.index().saturating_sub(1)]
    }

    pub fn slower(self) -> Self {
        Self::ALL[(self.index() + 1).min(Self::ALL.len() - 1)]
    }
}

impl TryFrom<u8> for UpdateRate {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::ALL
            .get(value as usize)
            .copied()
            .ok_or_else(|| format!("unknown update rate {value}"))
    }
}

impl From<UpdateRate> for u8 {
    fn from(value: UpdateRate) -> Self {
        value as u8
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Mode {
    Disabled,
    #[default]
    Waterfall,
}

impl Mode {
    pub fn toggle(self) -> Self {
        match self {
            Mode::Disabled => Mode::Waterfall,
            Mode::Waterfall => Mode::Disabled,
        }
    }
}

impl TryFrom<u8> for Mode {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Mode::Disabled),
            1 => Ok(Mode::Waterfall),
            other => Err(format!("unknown mode {other}")),
        }
    }
}

impl From<Mode> for u8 {
    fn from(value: Mode) -> Self {
        value as u8
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    Painted,
    /// The source failed; nothing was appended or drawn.
    Skipped,
    Disabled,
    /// No cores are tracked, so there is nothing to sample or draw.
    NoCores,
}

/// Timer-driven glue between the source, the history and the renderer.
pub struct UpdateCycle {
    pub rate: UpdateRate,
    pub mode: Mode,
    last_tick: Option<Instant>,
    skipped: u64,
}

impl UpdateCycle {
    pub fn new(rate: UpdateRate, mode: Mode) -> Self {
        Self {
            rate,
            mode,
            last_tick: None,
            skipped: 0,
        }
    }

    pub fn is_due(&self, now: Instant) -> bool {
        match self.last_tick {
            Some(last) => now.duration_since(last) >= self.rate.interval(),
            None => true,
        }
    }

    /// Time left until the next tick is due.
    pub fn time_until_due(&self, now: Instant) -> Duration {
        match self.last_tick {
            Some(last) => self.rate.interval().saturating_sub(now.duration_since(last)),
            None => Duration::ZERO,
        }
    }

    pub fn skipped(&self) -> u64 {
        self.skipped
    }

    pub fn tick(
        &mut self,
        now: Instant,
        now_us: i64,
        source: &mut dyn SampleSource,
        history: &mut HistoryStore,
        renderer: &mut ScrollingRenderer,
        palette: &Palette,
    ) -> TickOutcome {
        self.last_tick = Some(now);
        if self.mode == Mode::Disabled {
            return TickOutcome::Disabled;
        }
        if !history.is_enabled() {
            return TickOutcome::NoCores;
        }

        let loads = match source.sample_all_cores(now_us) {
            Ok(loads) => loads,
            Err(e) => {
                self.skipped += 1;
                log::warn!("skipping tick: {e}");
                return TickOutcome::Skipped;
            }
        };
        if let Err(e) = history.append(now_us, &loads) {
            self.skipped += 1;
            log::warn!("skipping tick: {e}");
            return TickOutcome::Skipped;
        }

        renderer.paint_column(history, palette);
        TickOutcome::Painted
    }
}
