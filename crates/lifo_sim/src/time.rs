//! Simulation time with femtosecond precision.
//!
//! The kernel is cycle based, so there are no delta cycles: [`SimTime`] is a
//! plain femtosecond timestamp with unit-aware display and parsing.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::SimError;

/// Femtoseconds per picosecond.
pub const FS_PER_PS: u64 = 1_000;
/// Femtoseconds per nanosecond.
pub const FS_PER_NS: u64 = 1_000_000;
/// Femtoseconds per microsecond.
pub const FS_PER_US: u64 = 1_000_000_000;
/// Femtoseconds per millisecond.
pub const FS_PER_MS: u64 = 1_000_000_000_000;
/// Femtoseconds per second.
pub const FS_PER_S: u64 = 1_000_000_000_000_000;

/// A simulation time point in femtoseconds.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct SimTime {
    /// Simulation time in femtoseconds.
    pub fs: u64,
}

impl SimTime {
    /// Time zero.
    pub fn zero() -> Self {
        Self { fs: 0 }
    }

    /// Creates a time from a nanosecond value.
    ///
    /// Saturates at `u64::MAX` femtoseconds.
    pub fn from_ns(ns: u64) -> Self {
        Self {
            fs: ns.saturating_mul(FS_PER_NS),
        }
    }

    /// Creates a time from a picosecond value.
    ///
    /// Saturates at `u64::MAX` femtoseconds.
    pub fn from_ps(ps: u64) -> Self {
        Self {
            fs: ps.saturating_mul(FS_PER_PS),
        }
    }

    /// Creates a time from a femtosecond value.
    pub fn from_fs(fs: u64) -> Self {
        Self { fs }
    }

    /// Converts to nanoseconds (truncated).
    pub fn to_ns(&self) -> u64 {
        self.fs / FS_PER_NS
    }
}

impl fmt::Display for SimTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fs = self.fs;
        if fs == 0 {
            return write!(f, "0 fs");
        }
        for (unit, scale) in [
            ("ms", FS_PER_MS),
            ("us", FS_PER_US),
            ("ns", FS_PER_NS),
            ("ps", FS_PER_PS),
        ] {
            if fs >= scale && fs % scale == 0 {
                return write!(f, "{} {unit}", fs / scale);
            }
        }
        write!(f, "{fs} fs")
    }
}

/// Parses a duration string like `"100ns"` or `"1 us"` into femtoseconds.
pub fn parse_duration(s: &str) -> Result<u64, SimError> {
    let s = s.trim();
    let invalid = |reason: &str| SimError::InvalidDuration {
        input: s.to_string(),
        reason: reason.to_string(),
    };

    let digit_end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    if digit_end == 0 {
        return Err(invalid("no numeric value"));
    }
    let number: u64 = s[..digit_end]
        .parse()
        .map_err(|_| invalid("number out of range"))?;

    let multiplier = match s[digit_end..].trim() {
        "fs" => 1,
        "ps" => FS_PER_PS,
        "ns" => FS_PER_NS,
        "us" => FS_PER_US,
        "ms" => FS_PER_MS,
        "s" => FS_PER_S,
        "" => return Err(invalid("missing unit (use fs, ps, ns, us, ms, or s)")),
        _ => return Err(invalid("unknown unit (use fs, ps, ns, us, ms, or s)")),
    };

    number
        .checked_mul(multiplier)
        .ok_or_else(|| invalid("duration overflows u64 femtoseconds"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors() {
        assert_eq!(SimTime::zero().fs, 0);
        assert_eq!(SimTime::from_ns(10).fs, 10_000_000);
        assert_eq!(SimTime::from_ps(500).fs, 500_000);
        assert_eq!(SimTime::from_fs(42).fs, 42);
    }

    #[test]
    fn constructors_saturate() {
        assert_eq!(SimTime::from_ns(u64::MAX).fs, u64::MAX);
        assert_eq!(SimTime::from_ps(u64::MAX / 10).fs, u64::MAX);
    }

    #[test]
    fn to_ns_truncates() {
        assert_eq!(SimTime::from_ns(42).to_ns(), 42);
        assert_eq!(SimTime::from_fs(1_500_000).to_ns(), 1);
    }

    #[test]
    fn ordering() {
        assert!(SimTime::from_ns(1) < SimTime::from_ns(2));
        assert_eq!(SimTime::default(), SimTime::zero());
    }

    #[test]
    fn display_picks_exact_unit() {
        assert_eq!(SimTime::zero().to_string(), "0 fs");
        assert_eq!(SimTime::from_ns(15).to_string(), "15 ns");
        assert_eq!(SimTime::from_ps(500).to_string(), "500 ps");
        assert_eq!(SimTime::from_fs(5 * FS_PER_US).to_string(), "5 us");
        assert_eq!(SimTime::from_fs(2 * FS_PER_MS).to_string(), "2 ms");
        assert_eq!(SimTime::from_fs(1500).to_string(), "1500 fs");
    }

    #[test]
    fn parse_duration_units() {
        assert_eq!(parse_duration("100ns").unwrap(), 100 * FS_PER_NS);
        assert_eq!(parse_duration("5 us").unwrap(), 5 * FS_PER_US);
        assert_eq!(parse_duration("250ps").unwrap(), 250 * FS_PER_PS);
        assert_eq!(parse_duration("42fs").unwrap(), 42);
        assert_eq!(parse_duration("1s").unwrap(), FS_PER_S);
        assert_eq!(parse_duration("0ns").unwrap(), 0);
    }

    #[test]
    fn parse_duration_errors() {
        assert!(matches!(
            parse_duration("ns"),
            Err(SimError::InvalidDuration { .. })
        ));
        assert!(parse_duration("100").is_err());
        assert!(parse_duration("10 parsecs").is_err());
        assert!(parse_duration("99999999999s").is_err());
    }

    #[test]
    fn serde_roundtrip() {
        let t = SimTime::from_fs(12345);
        let json = serde_json::to_string(&t).unwrap();
        let back: SimTime = serde_json::from_str(&json).unwrap();
        assert_eq!(t, back);
    }
}
