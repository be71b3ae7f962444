//! TOML stimulus scripts.
//!
//! A script is a list of steps. Each step optionally logs a message, drives
//! some inputs, waits a number of rising edges, then checks expected output
//! values:
//!
//! ```toml
//! name = "push_one"
//!
//! [[step]]
//! log = "reset"
//! drive = { stack_reset = 1 }
//! cycles = 2
//!
//! [[step]]
//! drive = { stack_reset = 0, stack_mux_sel = 1, stack_data_1_in = 0xA, stack_we = 1 }
//! cycles = 1
//! expect = { stack_addr_w = 0, stack_data_in_w = 0xA, full_o = 0 }
//! ```
//!
//! Expected values are integers or bit patterns such as `"xxxx"`; `"x"`
//! alone means every bit of the port is unknown. Failed expectations are
//! recorded on the kernel and do not stop the script.

use std::collections::BTreeMap;
use std::path::Path;

use lifo_common::LogicVec;
use serde::Deserialize;

use crate::error::SimError;
use crate::kernel::SimKernel;
use crate::signal::Port;

/// A parsed and validated stimulus script.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Stimulus {
    /// Optional display name.
    #[serde(default)]
    pub name: Option<String>,
    /// The steps, in order.
    #[serde(default, rename = "step")]
    pub steps: Vec<Step>,
}

/// One step of a stimulus script.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Step {
    /// Message logged when the step starts.
    #[serde(default)]
    pub log: Option<String>,
    /// Input values to drive before waiting.
    #[serde(default)]
    pub drive: BTreeMap<String, u64>,
    /// Rising edges to wait after driving.
    #[serde(default)]
    pub cycles: u32,
    /// Port values checked after waiting.
    #[serde(default)]
    pub expect: BTreeMap<String, Expected>,
}

/// An expected port value.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Expected {
    /// A fully known integer value.
    Value(u64),
    /// A bit pattern, MSB first, optionally prefixed with `0b`.
    Pattern(String),
}

impl Expected {
    /// Resolves the expectation to a value of the port's width.
    pub fn resolve(&self, port: Port) -> Result<LogicVec, String> {
        let width = port.width();
        match self {
            Expected::Value(v) => {
                if width < 64 && v >> width != 0 {
                    return Err(format!("value {v:#x} does not fit {width}-bit '{port}'"));
                }
                Ok(LogicVec::from_u64(*v, width))
            }
            Expected::Pattern(p) => {
                if p.eq_ignore_ascii_case("x") {
                    return Ok(LogicVec::unknown(width));
                }
                let bits = p.strip_prefix("0b").unwrap_or(p);
                let value = LogicVec::from_binary_str(bits)
                    .ok_or_else(|| format!("invalid bit pattern '{p}' for '{port}'"))?;
                if value.width() != width {
                    return Err(format!(
                        "pattern '{p}' has {} bits but '{port}' is {width} bits wide",
                        value.width()
                    ));
                }
                Ok(value)
            }
        }
    }
}

impl Stimulus {
    /// Parses and validates a script from TOML text.
    pub fn parse(content: &str) -> Result<Self, SimError> {
        let stimulus: Stimulus = toml::from_str(content).map_err(|e| SimError::Stimulus {
            reason: e.to_string(),
        })?;
        stimulus.validate()?;
        Ok(stimulus)
    }

    /// Reads and parses a script file.
    pub fn load(path: &Path) -> Result<Self, SimError> {
        let content = std::fs::read_to_string(path).map_err(|e| SimError::Stimulus {
            reason: format!("cannot read {}: {e}", path.display()),
        })?;
        Self::parse(&content)
    }

    /// Total rising edges the script waits.
    pub fn total_cycles(&self) -> u64 {
        self.steps.iter().map(|s| s.cycles as u64).sum()
    }

    /// Checks every signal name, drive width and expectation up front so a
    /// script never fails halfway through a run.
    fn validate(&self) -> Result<(), SimError> {
        for (i, step) in self.steps.iter().enumerate() {
            let bad = |reason: String| SimError::Stimulus {
                reason: format!("step {}: {reason}", i + 1),
            };
            for (name, value) in &step.drive {
                let port =
                    Port::from_name(name).ok_or_else(|| bad(format!("unknown signal '{name}'")))?;
                if !port.is_drivable() {
                    return Err(bad(format!("signal '{name}' cannot be driven")));
                }
                let width = port.width();
                if width < 64 && value >> width != 0 {
                    return Err(bad(format!(
                        "value {value:#x} does not fit {width}-bit '{name}'"
                    )));
                }
            }
            for (name, expected) in &step.expect {
                let port =
                    Port::from_name(name).ok_or_else(|| bad(format!("unknown signal '{name}'")))?;
                expected.resolve(port).map_err(bad)?;
            }
        }
        Ok(())
    }

    /// Runs the script against a kernel.
    pub fn run(&self, kernel: &mut SimKernel) -> Result<(), SimError> {
        if let Some(name) = &self.name {
            log::info!("running stimulus '{name}' ({} steps)", self.steps.len());
        }
        for (i, step) in self.steps.iter().enumerate() {
            if let Some(message) = &step.log {
                log::info!("{message}");
            }
            for (name, value) in &step.drive {
                kernel.set(name, *value)?;
            }
            kernel.rising_edges(step.cycles)?;
            for (name, expected) in &step.expect {
                let port = Port::from_name(name)
                    .ok_or_else(|| SimError::UnknownSignal(name.clone()))?;
                let value = expected
                    .resolve(port)
                    .map_err(|reason| SimError::Stimulus { reason })?;
                kernel.expect_value(port, &value, &format!("step {}", i + 1));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PUSH_ONE: &str = r#"
name = "push_one"

[[step]]
log = "reset"
drive = { stack_reset = 1 }
cycles = 2

[[step]]
drive = { stack_reset = 0, stack_mux_sel = 1, stack_data_1_in = 0xA, stack_we = 1 }
cycles = 1

[[step]]
drive = { stack_we = 0, stack_push = 1 }
cycles = 1
expect = { stack_addr_w = 1, stack_data_in_w = 0xA, empty_o = 0, full_o = 0 }
"#;

    #[test]
    fn parse_script() {
        let s = Stimulus::parse(PUSH_ONE).unwrap();
        assert_eq!(s.name.as_deref(), Some("push_one"));
        assert_eq!(s.steps.len(), 3);
        assert_eq!(s.steps[1].drive["stack_data_1_in"], 0xA);
        assert_eq!(s.total_cycles(), 4);
    }

    #[test]
    fn run_script_passes() {
        let s = Stimulus::parse(PUSH_ONE).unwrap();
        let mut k = SimKernel::default();
        s.run(&mut k).unwrap();
        assert!(k.failures().is_empty(), "{:?}", k.failures());
        assert_eq!(k.cycles(), 4);
    }

    #[test]
    fn failed_expectation_is_collected() {
        let s = Stimulus::parse(
            r#"
[[step]]
drive = { stack_reset = 1 }
cycles = 1
expect = { full_o = 1, empty_o = 1 }
"#,
        )
        .unwrap();
        let mut k = SimKernel::default();
        s.run(&mut k).unwrap();
        assert_eq!(k.failures().len(), 1);
        assert!(k.failures()[0].contains("step 1"));
        assert!(k.failures()[0].contains("full_o"));
    }

    #[test]
    fn unknown_pattern_before_reset() {
        let s = Stimulus::parse(
            r#"
[[step]]
cycles = 1
expect = { stack_addr_w = "x", stack_data_in_w = "0bxxxx", empty_o = "X" }
"#,
        )
        .unwrap();
        let mut k = SimKernel::default();
        s.run(&mut k).unwrap();
        assert!(k.failures().is_empty(), "{:?}", k.failures());
    }

    #[test]
    fn rejects_unknown_signal() {
        let err = Stimulus::parse(
            r#"
[[step]]
drive = { stack_bogus = 1 }
"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("step 1: unknown signal 'stack_bogus'"));
    }

    #[test]
    fn rejects_driving_output() {
        let err = Stimulus::parse(
            r#"
[[step]]
drive = { full_o = 1 }
"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("cannot be driven"));
    }

    #[test]
    fn rejects_too_wide_drive() {
        let err = Stimulus::parse(
            r#"
[[step]]
drive = { stack_data_2_in = 16 }
"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("does not fit 4-bit"));
    }

    #[test]
    fn rejects_pattern_width_mismatch() {
        let err = Stimulus::parse(
            r#"
[[step]]
expect = { stack_data_out = "101" }
"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("has 3 bits"));
    }

    #[test]
    fn rejects_unknown_fields() {
        assert!(Stimulus::parse("[[step]]\nwait = 3\n").is_err());
    }

    #[test]
    fn load_missing_file() {
        let err = Stimulus::load(Path::new("/nonexistent/stim.toml")).unwrap_err();
        assert!(matches!(err, SimError::Stimulus { .. }));
    }

    #[test]
    fn expected_resolve() {
        assert_eq!(
            Expected::Value(16).resolve(Port::StackAddrW).unwrap(),
            LogicVec::from_u64(16, 5)
        );
        assert!(Expected::Value(32).resolve(Port::StackAddrW).is_err());
        assert!(Expected::Pattern("1x1y".into())
            .resolve(Port::StackDataOut)
            .is_err());
    }
}
