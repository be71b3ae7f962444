//! Configuration types deserialized from `lifo.toml`.

use std::str::FromStr;

use lifo_common::Frequency;
use lifo_model::StackPolicy;
use lifo_sim::{parse_duration, Clock};
use serde::Deserialize;

use crate::error::ConfigError;

/// The top-level project configuration parsed from `lifo.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectConfig {
    /// Core project metadata.
    pub project: ProjectMeta,
    /// Clock period or frequency.
    #[serde(default)]
    pub clock: ClockConfig,
    /// Stack behavior for pop-at-empty and idle reads.
    #[serde(default)]
    pub model: StackPolicy,
    /// Simulation settings.
    #[serde(default)]
    pub sim: SimSettings,
    /// Waveform output settings.
    #[serde(default)]
    pub waveform: WaveformConfig,
}

/// Core project metadata required in every `lifo.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectMeta {
    /// The project name.
    pub name: String,
    /// The project version string.
    pub version: String,
    /// A brief description of the project.
    #[serde(default)]
    pub description: String,
}

/// The simulation clock. At most one of `period` and `frequency` may be set;
/// with neither, the clock runs at 10 ns.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClockConfig {
    /// Clock period as a duration string (e.g. `"10ns"`).
    pub period: Option<String>,
    /// Clock frequency as a string (e.g. `"100MHz"`).
    pub frequency: Option<String>,
}

impl ClockConfig {
    /// Builds the clock this section describes.
    pub fn to_clock(&self) -> Result<Clock, ConfigError> {
        match (&self.period, &self.frequency) {
            (Some(_), Some(_)) => Err(ConfigError::invalid(
                "clock",
                "period and frequency are mutually exclusive",
            )),
            (Some(period), None) => parse_duration(period)
                .and_then(Clock::new)
                .map_err(|e| ConfigError::invalid("clock.period", e)),
            (None, Some(freq)) => Frequency::from_str(freq)
                .map_err(|e| ConfigError::invalid("clock.frequency", e))
                .and_then(|f| {
                    Clock::from_frequency(f).map_err(|e| ConfigError::invalid("clock.frequency", e))
                }),
            (None, None) => Ok(Clock::default()),
        }
    }
}

/// Simulation settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SimSettings {
    /// Optional time limit as a duration string (e.g. `"1ms"`).
    #[serde(default)]
    pub time_limit: Option<String>,
    /// Directory holding stimulus scripts, relative to the project root.
    #[serde(default = "default_stimulus_dir")]
    pub stimulus_dir: String,
}

impl SimSettings {
    /// The time limit in femtoseconds, if one is set.
    pub fn time_limit_fs(&self) -> Result<Option<u64>, ConfigError> {
        self.time_limit
            .as_deref()
            .map(parse_duration)
            .transpose()
            .map_err(|e| ConfigError::invalid("sim.time_limit", e))
    }
}

impl Default for SimSettings {
    fn default() -> Self {
        Self {
            time_limit: None,
            stimulus_dir: default_stimulus_dir(),
        }
    }
}

fn default_stimulus_dir() -> String {
    "stimulus".to_string()
}

/// Waveform output settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WaveformConfig {
    /// Whether runs write a VCD file.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Directory for waveform files, relative to the project root.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
}

impl Default for WaveformConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            output_dir: default_output_dir(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_output_dir() -> String {
    "out".to_string()
}
