//! Cycle-based simulation kernel around one [`LifoStack`].
//!
//! [`SimKernel`] stands in for an HDL simulator:
//! a testbench drives input ports by name, waits for rising clock edges and
//! samples output ports. Driven values are sampled at the next rising edge;
//! outputs sampled after [`SimKernel::rising_edge`] returns show the state
//! after that edge.

use lifo_common::LogicVec;
use lifo_model::{LifoStack, MuxSel, StackInputs, StackPolicy};

use crate::clock::Clock;
use crate::error::SimError;
use crate::signal::{Direction, Port, PORT_COUNT};
use crate::time::SimTime;
use crate::waveform::WaveformRecorder;

/// Scope name used for the stack in waveform output.
pub const TOP_SCOPE: &str = "lifo_stack";

/// The result of a completed simulation run.
#[derive(Debug, Clone)]
pub struct SimResult {
    /// Simulation time when the run ended.
    pub final_time: SimTime,
    /// Number of rising edges applied.
    pub cycles: u64,
    /// Failed checks collected during the run.
    pub check_failures: Vec<String>,
}

/// The simulation kernel: clock, driven inputs, the stack and a recorder.
pub struct SimKernel {
    stack: LifoStack,
    clock: Clock,
    current_time: SimTime,
    /// Driven value per input port, indexed by [`Port::index`].
    driven: [u64; PORT_COUNT],
    /// Last value handed to the recorder per port.
    recorded: [Option<LogicVec>; PORT_COUNT],
    recorder: Option<Box<dyn WaveformRecorder>>,
    time_limit: Option<u64>,
    cycles: u64,
    check_failures: Vec<String>,
}

impl SimKernel {
    /// Creates a kernel at time zero with every input driven to 0.
    pub fn new(clock: Clock, policy: StackPolicy) -> Self {
        Self {
            stack: LifoStack::with_policy(policy),
            clock,
            current_time: SimTime::zero(),
            driven: [0; PORT_COUNT],
            recorded: [None; PORT_COUNT],
            recorder: None,
            time_limit: None,
            cycles: 0,
            check_failures: Vec::new(),
        }
    }

    /// Sets an absolute time limit; edges beyond it fail with
    /// [`SimError::TimeLimitExceeded`].
    pub fn set_time_limit(&mut self, limit_fs: u64) {
        self.time_limit = Some(limit_fs);
    }

    /// Attaches a waveform recorder, declaring every port and dumping the
    /// current values.
    pub fn set_recorder(&mut self, mut recorder: Box<dyn WaveformRecorder>) -> Result<(), SimError> {
        recorder.begin_scope(TOP_SCOPE)?;
        for port in Port::ALL {
            recorder.register_port(port)?;
        }
        recorder.end_scope()?;
        self.recorder = Some(recorder);
        self.recorded = [None; PORT_COUNT];
        let now = self.current_time.fs;
        for port in Port::ALL {
            self.record(now, port)?;
        }
        Ok(())
    }

    /// Returns the current simulation time.
    pub fn current_time(&self) -> SimTime {
        self.current_time
    }

    /// Number of rising edges applied so far.
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// The clock driving this kernel.
    pub fn clock(&self) -> Clock {
        self.clock
    }

    /// The simulated stack.
    pub fn stack(&self) -> &LifoStack {
        &self.stack
    }

    /// Drives an input port by name.
    pub fn set(&mut self, name: &str, value: u64) -> Result<(), SimError> {
        self.set_port(lookup(name)?, value)
    }

    /// Drives an input port. The value is sampled at the next rising edge.
    pub fn set_port(&mut self, port: Port, value: u64) -> Result<(), SimError> {
        if !port.is_drivable() {
            return Err(SimError::NotDrivable {
                signal: port.name().to_string(),
            });
        }
        let width = port.width();
        if width < 64 && value >> width != 0 {
            return Err(SimError::ValueTooWide {
                signal: port.name().to_string(),
                value,
                width,
            });
        }
        self.driven[port.index()] = value;
        Ok(())
    }

    /// Samples a port by name.
    pub fn get(&self, name: &str) -> Result<LogicVec, SimError> {
        Ok(self.port_value(lookup(name)?))
    }

    /// Samples a port by name as an integer; `None` if any bit is unknown.
    pub fn get_u64(&self, name: &str) -> Result<Option<u64>, SimError> {
        Ok(self.get(name)?.to_u64())
    }

    /// Samples a port.
    pub fn port_value(&self, port: Port) -> LogicVec {
        match port {
            Port::Clk => LogicVec::from_bool(self.clock.level_at(self.current_time.fs)),
            p if p.direction() == Direction::Input => {
                LogicVec::from_u64(self.driven[p.index()], p.width())
            }
            p => {
                let out = self.stack.outputs();
                match p {
                    Port::StackAddrW => out.addr_w,
                    Port::StackDataInW => out.data_in_w,
                    Port::StackDataOut => out.data_out,
                    Port::EmptyO => out.empty,
                    _ => out.full,
                }
            }
        }
    }

    /// Advances to the next rising clock edge and applies it to the stack.
    pub fn rising_edge(&mut self) -> Result<(), SimError> {
        let now = self.current_time.fs;
        let next = self
            .clock
            .next_rising_after(now)
            .ok_or(SimError::TimeOverflow { at_fs: now })?;
        if let Some(limit) = self.time_limit {
            if next > limit {
                return Err(SimError::TimeLimitExceeded { limit_fs: limit });
            }
        }

        self.record_inputs(now)?;
        let falling = self.clock.falling_before(next);
        if falling > now {
            self.current_time = SimTime::from_fs(falling);
            self.record(falling, Port::Clk)?;
        }

        self.current_time = SimTime::from_fs(next);
        let inputs = self.stack_inputs();
        let out = self.stack.apply_edge(&inputs);
        self.cycles += 1;
        log::trace!(
            "cycle {} @ {}: sp={} empty={} full={} data_out={}",
            self.cycles,
            self.current_time,
            out.addr_w,
            out.empty,
            out.full,
            out.data_out
        );

        for port in Port::ALL {
            if port == Port::Clk || port.direction() == Direction::Output {
                self.record(next, port)?;
            }
        }
        Ok(())
    }

    /// Advances `n` rising edges.
    pub fn rising_edges(&mut self, n: u32) -> Result<(), SimError> {
        for _ in 0..n {
            self.rising_edge()?;
        }
        Ok(())
    }

    /// Records a failed check unless `condition` holds.
    pub fn check(&mut self, condition: bool, message: &str) -> bool {
        if !condition {
            self.fail(message.to_string());
        }
        condition
    }

    /// Checks that a port currently reads as `expected`.
    pub fn expect(&mut self, name: &str, expected: u64, message: &str) -> Result<bool, SimError> {
        let port = lookup(name)?;
        let expected = LogicVec::from_u64(expected, port.width());
        Ok(self.expect_value(port, &expected, message))
    }

    /// Checks that a port currently reads as exactly `expected`, including
    /// unknown bits.
    pub fn expect_value(&mut self, port: Port, expected: &LogicVec, message: &str) -> bool {
        let actual = self.port_value(port);
        let ok = actual == *expected;
        if !ok {
            self.fail(format!(
                "{message} ({port} = {actual}, expected {expected})"
            ));
        }
        ok
    }

    /// Failed checks recorded so far.
    pub fn failures(&self) -> &[String] {
        &self.check_failures
    }

    /// Removes and returns the failed checks recorded so far.
    pub fn take_failures(&mut self) -> Vec<String> {
        std::mem::take(&mut self.check_failures)
    }

    /// Flushes pending input changes, finalizes the waveform and returns
    /// the run summary.
    pub fn finish(mut self) -> Result<SimResult, SimError> {
        let now = self.current_time.fs;
        self.record_inputs(now)?;
        if let Some(recorder) = self.recorder.as_mut() {
            recorder.finalize()?;
        }
        Ok(SimResult {
            final_time: self.current_time,
            cycles: self.cycles,
            check_failures: self.check_failures,
        })
    }

    fn fail(&mut self, message: String) {
        let entry = format!("at {}: {message}", self.current_time);
        log::warn!("check failed {entry}");
        self.check_failures.push(entry);
    }

    fn stack_inputs(&self) -> StackInputs {
        let level = |p: Port| self.driven[p.index()] != 0;
        let word = |p: Port| self.driven[p.index()] as u8;
        StackInputs {
            reset: level(Port::StackReset),
            push: level(Port::StackPush),
            pop: level(Port::StackPop),
            write_enable: level(Port::StackWe),
            read_enable: level(Port::StackRe),
            mux_sel: MuxSel::from(level(Port::StackMuxSel)),
            data_1: word(Port::StackData1In),
            data_2: word(Port::StackData2In),
        }
    }

    /// Records every drivable input whose value changed since last recorded.
    fn record_inputs(&mut self, time_fs: u64) -> Result<(), SimError> {
        for port in Port::ALL {
            if port.is_drivable() {
                self.record(time_fs, port)?;
            }
        }
        Ok(())
    }

    /// Hands `port`'s current value to the recorder if it changed.
    fn record(&mut self, time_fs: u64, port: Port) -> Result<(), SimError> {
        if self.recorder.is_none() {
            return Ok(());
        }
        let value = self.port_value(port);
        if self.recorded[port.index()] == Some(value) {
            return Ok(());
        }
        if let Some(recorder) = self.recorder.as_mut() {
            recorder.record_change(time_fs, port, &value)?;
        }
        self.recorded[port.index()] = Some(value);
        Ok(())
    }
}

impl Default for SimKernel {
    fn default() -> Self {
        Self::new(Clock::default(), StackPolicy::default())
    }
}

fn lookup(name: &str) -> Result<Port, SimError> {
    Port::from_name(name).ok_or_else(|| SimError::UnknownSignal(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::waveform::VcdRecorder;
    use std::io::Read;

    #[test]
    fn inputs_start_low() {
        let k = SimKernel::default();
        assert_eq!(k.get_u64("stack_push").unwrap(), Some(0));
        assert_eq!(k.get_u64("clk").unwrap(), Some(0));
        assert_eq!(k.current_time(), SimTime::zero());
    }

    #[test]
    fn outputs_unknown_before_reset() {
        let mut k = SimKernel::default();
        k.rising_edge().unwrap();
        assert_eq!(k.get_u64("stack_addr_w").unwrap(), None);
        assert!(k.get("empty_o").unwrap().has_unknown());
    }

    #[test]
    fn edge_times_follow_clock() {
        let mut k = SimKernel::default();
        k.rising_edge().unwrap();
        assert_eq!(k.current_time(), SimTime::from_ns(5));
        assert_eq!(k.get_u64("clk").unwrap(), Some(1));
        k.rising_edges(2).unwrap();
        assert_eq!(k.current_time(), SimTime::from_ns(25));
        assert_eq!(k.cycles(), 3);
    }

    #[test]
    fn driven_value_sampled_at_next_edge() {
        let mut k = SimKernel::default();
        k.set("stack_reset", 1).unwrap();
        assert_eq!(k.get_u64("stack_addr_w").unwrap(), None);
        k.rising_edge().unwrap();
        assert_eq!(k.get_u64("stack_addr_w").unwrap(), Some(0));
        assert_eq!(k.get_u64("empty_o").unwrap(), Some(1));
    }

    #[test]
    fn set_rejects_bad_access() {
        let mut k = SimKernel::default();
        assert!(matches!(
            k.set("stack_nope", 1),
            Err(SimError::UnknownSignal(_))
        ));
        assert!(matches!(
            k.set("full_o", 1),
            Err(SimError::NotDrivable { .. })
        ));
        assert!(matches!(k.set("clk", 1), Err(SimError::NotDrivable { .. })));
        assert!(matches!(
            k.set("stack_data_1_in", 0x10),
            Err(SimError::ValueTooWide { width: 4, .. })
        ));
        assert!(matches!(
            k.set("stack_push", 2),
            Err(SimError::ValueTooWide { width: 1, .. })
        ));
    }

    #[test]
    fn time_limit_stops_edges() {
        let mut k = SimKernel::default();
        k.set_time_limit(20_000_000);
        k.rising_edges(2).unwrap();
        let err = k.rising_edge().unwrap_err();
        assert!(matches!(
            err,
            SimError::TimeLimitExceeded {
                limit_fs: 20_000_000
            }
        ));
    }

    #[test]
    fn huge_period_reports_time_overflow() {
        let period = crate::time::parse_duration("18000s").unwrap();
        let mut k = SimKernel::new(Clock::new(period).unwrap(), StackPolicy::default());
        k.rising_edge().unwrap();
        let at = k.current_time().fs;
        let err = k.rising_edge().unwrap_err();
        assert!(matches!(err, SimError::TimeOverflow { at_fs } if at_fs == at));
        assert_eq!(k.cycles(), 1);
        assert!(k.rising_edge().is_err());
    }

    #[test]
    fn expect_records_failures() {
        let mut k = SimKernel::default();
        k.set("stack_reset", 1).unwrap();
        k.rising_edge().unwrap();
        assert!(k.expect("empty_o", 1, "empty after reset").unwrap());
        assert!(!k.expect("full_o", 1, "deliberately wrong").unwrap());
        assert_eq!(k.failures().len(), 1);
        assert!(k.failures()[0].contains("deliberately wrong"));
        assert!(k.failures()[0].contains("full_o = 0"));
        assert_eq!(k.take_failures().len(), 1);
        assert!(k.failures().is_empty());
    }

    #[test]
    fn mux_sel_routes_data() {
        let mut k = SimKernel::default();
        k.set("stack_reset", 1).unwrap();
        k.rising_edge().unwrap();
        k.set("stack_reset", 0).unwrap();
        k.set("stack_data_1_in", 0x3).unwrap();
        k.set("stack_data_2_in", 0xC).unwrap();
        k.set("stack_we", 1).unwrap();
        k.rising_edge().unwrap();
        assert_eq!(k.get_u64("stack_data_in_w").unwrap(), Some(0xC));
        k.set("stack_mux_sel", 1).unwrap();
        k.rising_edge().unwrap();
        assert_eq!(k.get_u64("stack_data_in_w").unwrap(), Some(0x3));
    }

    #[test]
    fn waveform_records_changes_only() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        let file = tmp.reopen().unwrap();
        let mut k = SimKernel::default();
        k.set_recorder(Box::new(VcdRecorder::new(file))).unwrap();
        k.set("stack_reset", 1).unwrap();
        k.rising_edges(3).unwrap();
        let result = k.finish().unwrap();
        assert_eq!(result.cycles, 3);

        let mut vcd = String::new();
        tmp.reopen().unwrap().read_to_string(&mut vcd).unwrap();
        assert!(vcd.contains("$var wire 1 ! clk $end"));
        assert!(vcd.contains("$var reg 5 * stack_addr_w $end"));
        // Initial dump at time 0 shows the unknown pointer.
        assert!(vcd.contains("bxxxxx *"));
        // First edge at 5 ns resets the pointer; later edges leave it alone.
        assert!(vcd.contains("#5000000\n1!\nb00000 *"));
        assert_eq!(vcd.matches("b00000 *").count(), 1);
        // Falling edges between rising edges.
        assert!(vcd.contains("#10000000\n0!"));
    }
}
