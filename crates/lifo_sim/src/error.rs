//! Simulation error types.
//!
//! The stack model itself never fails; every variant here comes from the
//! simulator around it: bad signal access, bad configuration, waveform I/O,
//! and malformed stimulus scripts.

use std::io;

/// Errors that can occur during simulation setup or execution.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    /// No port with this name exists.
    #[error("unknown signal '{0}'")]
    UnknownSignal(String),

    /// The signal is an output or the clock and cannot be driven.
    #[error("signal '{signal}' cannot be driven")]
    NotDrivable {
        /// The signal name.
        signal: String,
    },

    /// A driven value does not fit the port width.
    #[error("value {value:#x} does not fit {width}-bit signal '{signal}'")]
    ValueTooWide {
        /// The signal name.
        signal: String,
        /// The rejected value.
        value: u64,
        /// The port width in bits.
        width: u32,
    },

    /// The clock configuration is unusable.
    #[error("invalid clock: {reason}")]
    InvalidClock {
        /// Why the clock was rejected.
        reason: String,
    },

    /// A duration string could not be parsed.
    #[error("invalid duration '{input}': {reason}")]
    InvalidDuration {
        /// The input string.
        input: String,
        /// Why it was rejected.
        reason: String,
    },

    /// An I/O error occurred while writing waveform data or reading a script.
    #[error("waveform I/O error: {0}")]
    WaveformIo(#[from] io::Error),

    /// The next clock edge lies beyond the configured time limit.
    #[error("time limit exceeded: {limit_fs} fs")]
    TimeLimitExceeded {
        /// The time limit in femtoseconds.
        limit_fs: u64,
    },

    /// The next clock edge lies past the largest representable time.
    #[error("simulation time overflow after {at_fs} fs")]
    TimeOverflow {
        /// The time at which the clock could not advance.
        at_fs: u64,
    },

    /// A stimulus script is malformed.
    #[error("stimulus error: {reason}")]
    Stimulus {
        /// Description of the problem, including the step where known.
        reason: String,
    },
}
