//! Free-running clock generator.
//!
//! The clock starts low at time zero. With period `P`, the low phase lasts
//! `P - P/2` and the high phase `P/2`, so rising edges fall at
//! `P - P/2 + k*P` and falling edges at `k*P`.

use lifo_common::Frequency;

use crate::error::SimError;
use crate::time::FS_PER_NS;

/// A periodic clock with a fixed period in femtoseconds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Clock {
    period_fs: u64,
}

impl Clock {
    /// Creates a clock with the given period.
    ///
    /// The period must be at least 2 fs so both phases are non-empty.
    pub fn new(period_fs: u64) -> Result<Self, SimError> {
        if period_fs < 2 {
            return Err(SimError::InvalidClock {
                reason: format!("period of {period_fs} fs is shorter than 2 fs"),
            });
        }
        Ok(Self { period_fs })
    }

    /// Creates a clock with a period given in nanoseconds.
    pub fn from_ns(ns: u64) -> Result<Self, SimError> {
        Self::new(ns.saturating_mul(FS_PER_NS))
    }

    /// Creates a clock running at the given frequency.
    pub fn from_frequency(freq: Frequency) -> Result<Self, SimError> {
        let period = freq.period_fs().ok_or_else(|| SimError::InvalidClock {
            reason: format!("frequency {freq} has no representable period"),
        })?;
        Self::new(period)
    }

    /// The clock period in femtoseconds.
    pub fn period_fs(&self) -> u64 {
        self.period_fs
    }

    /// Length of the low phase, which is also the time of the first rising edge.
    pub fn low_fs(&self) -> u64 {
        self.period_fs - self.period_fs / 2
    }

    /// The first rising edge strictly after `t`, or `None` if it lies past
    /// the end of representable time.
    pub fn next_rising_after(&self, t: u64) -> Option<u64> {
        let first = self.low_fs();
        if t < first {
            return Some(first);
        }
        let k = (t - first) / self.period_fs + 1;
        k.checked_mul(self.period_fs)?.checked_add(first)
    }

    /// The falling edge immediately preceding the rising edge at `rising`.
    pub fn falling_before(&self, rising: u64) -> u64 {
        rising - self.low_fs()
    }

    /// The clock level at time `t`.
    pub fn level_at(&self, t: u64) -> bool {
        t % self.period_fs >= self.low_fs()
    }
}

impl Default for Clock {
    /// A 10 ns (100 MHz) clock.
    fn default() -> Self {
        Self {
            period_fs: 10 * FS_PER_NS,
        }
    }
}
