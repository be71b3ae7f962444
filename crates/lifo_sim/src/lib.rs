//! Cycle simulator for the LIFO stack model.
//!
//! A [`SimKernel`] owns a [`lifo_model::LifoStack`], a free-running
//! [`Clock`] and the values driven onto the stack's input ports. Inputs
//! are set by name between clock edges and sampled at the next rising
//! edge; outputs are read back by name after the edge. Value changes can
//! be recorded to a VCD file.
//!
//! Two front ends drive the kernel: TOML [`Stimulus`] scripts and the
//! built-in [`harness`] testbenches.
//!
//! # Usage
//!
//! ```
//! use lifo_sim::{SimKernel, Stimulus};
//!
//! let script = Stimulus::parse(r#"
//! [[step]]
//! drive = { stack_reset = 1 }
//! cycles = 1
//! expect = { stack_addr_w = 0, empty_o = 1 }
//! "#)?;
//! let mut kernel = SimKernel::default();
//! script.run(&mut kernel)?;
//! let result = kernel.finish()?;
//! assert!(result.check_failures.is_empty());
//! # Ok::<(), lifo_sim::SimError>(())
//! ```
//!
//! # Modules
//!
//! - `error` — Simulation error types
//! - `time` — Femtosecond simulation time and duration parsing
//! - `clock` — Clock generator
//! - `signal` — The stack's port list
//! - `kernel` — Simulation kernel
//! - `waveform` — Waveform recording (VCD format)
//! - `stimulus` — TOML stimulus scripts
//! - `harness` — Built-in testbenches

#![warn(missing_docs)]

pub mod clock;
pub mod error;
pub mod harness;
pub mod kernel;
pub mod signal;
pub mod stimulus;
pub mod time;
pub mod waveform;

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use lifo_model::StackPolicy;

pub use clock::Clock;
pub use error::SimError;
pub use harness::{run_testbenches, testbenches, TestOutcome, TestSelector, Testbench};
pub use kernel::{SimKernel, SimResult};
pub use signal::{Direction, Port};
pub use stimulus::{Expected, Step, Stimulus};
pub use time::{parse_duration, SimTime};
pub use waveform::{VcdRecorder, WaveformRecorder};

/// Configuration for a simulation run.
#[derive(Debug, Clone, Default)]
pub struct SimConfig {
    /// The clock driving the stack.
    pub clock: Clock,
    /// Pop-at-empty and idle-read behavior of the stack.
    pub policy: StackPolicy,
    /// Optional simulation time limit in femtoseconds.
    pub time_limit: Option<u64>,
    /// Optional path for waveform output.
    pub waveform_path: Option<PathBuf>,
    /// Whether to record waveform data. Ignored if `waveform_path` is `None`.
    pub record_waveform: bool,
}

/// Builds a kernel from a configuration, attaching a VCD recorder when
/// waveform output is requested.
pub fn build_kernel(config: &SimConfig) -> Result<SimKernel, SimError> {
    let mut kernel = SimKernel::new(config.clock, config.policy);

    if let Some(limit) = config.time_limit {
        kernel.set_time_limit(limit);
    }

    if config.record_waveform {
        if let Some(path) = &config.waveform_path {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            let writer = BufWriter::new(File::create(path)?);
            kernel.set_recorder(Box::new(VcdRecorder::new(writer)))?;
        }
    }

    Ok(kernel)
}

/// High-level entry point: runs a stimulus script to completion.
pub fn simulate(stimulus: &Stimulus, config: &SimConfig) -> Result<SimResult, SimError> {
    let mut kernel = build_kernel(config)?;
    stimulus.run(&mut kernel)?;
    kernel.finish()
}

/// Runs the selected built-in testbenches, returning their outcomes and
/// the overall run summary.
pub fn run_harness(
    selector: &TestSelector,
    config: &SimConfig,
) -> Result<(Vec<TestOutcome>, SimResult), SimError> {
    let mut kernel = build_kernel(config)?;
    let outcomes = run_testbenches(&mut kernel, selector);
    let result = kernel.finish()?;
    Ok((outcomes, result))
}
