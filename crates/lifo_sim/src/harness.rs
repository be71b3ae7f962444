//! Built-in verification testbenches.
//!
//! The five testbenches share one kernel and run in a fixed order: later
//! ones start from the state the earlier ones leave behind (`pop_operation`
//! pops the entry `push_operation` pushed, `empty_flag` starts from the full
//! stack `full_flag` built). Checks are not fatal; every failed check is
//! collected into the testbench's [`TestOutcome`].

use lifo_common::LogicVec;

use crate::error::SimError;
use crate::kernel::SimKernel;
use crate::signal::Port;
use crate::time::SimTime;

/// Body of a testbench.
pub type TestFn = fn(&mut SimKernel) -> Result<(), SimError>;

/// A named testbench.
#[derive(Clone, Copy)]
pub struct Testbench {
    /// Name used for selection and reporting.
    pub name: &'static str,
    /// One-line description.
    pub description: &'static str,
    /// The testbench body.
    pub run: TestFn,
}

impl std::fmt::Debug for Testbench {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Testbench")
            .field("name", &self.name)
            .field("description", &self.description)
            .finish()
    }
}

static TESTBENCHES: [Testbench; 5] = [
    Testbench {
        name: "reset_operation",
        description: "reset clears the pointer and raises empty_o",
        run: reset_operation,
    },
    Testbench {
        name: "push_operation",
        description: "write 0xA then push moves the pointer to 1",
        run: push_operation,
    },
    Testbench {
        name: "pop_operation",
        description: "pop returns to 0 and reads back 0xA",
        run: pop_operation,
    },
    Testbench {
        name: "full_flag",
        description: "17 pushes saturate at 16 and raise full_o",
        run: full_flag,
    },
    Testbench {
        name: "empty_flag",
        description: "17 read+pop pairs drain a full stack",
        run: empty_flag,
    },
];

/// The testbenches in execution order.
pub fn testbenches() -> &'static [Testbench] {
    &TESTBENCHES
}

/// Which testbenches to report.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TestSelector {
    /// Every testbench.
    #[default]
    All,
    /// The testbench with exactly this name.
    Exact(String),
    /// Every testbench whose name contains this string.
    Contains(String),
}

impl TestSelector {
    /// Whether `name` is selected.
    pub fn matches(&self, name: &str) -> bool {
        match self {
            TestSelector::All => true,
            TestSelector::Exact(n) => n == name,
            TestSelector::Contains(s) => name.contains(s.as_str()),
        }
    }
}

/// The result of one testbench.
#[derive(Debug, Clone)]
pub struct TestOutcome {
    /// Testbench name.
    pub name: &'static str,
    /// Whether every check passed and the body returned normally.
    pub passed: bool,
    /// Failed checks, in order.
    pub failures: Vec<String>,
    /// Simulation error that aborted the testbench, if any.
    pub error: Option<String>,
    /// Simulation time when the testbench ended.
    pub end_time: SimTime,
}

/// Runs the selected testbenches on `kernel`.
///
/// Unselected testbenches that come before the last selected one still run,
/// silently, so the shared stack state matches a full-suite run. A
/// simulation error aborts the run after recording it on the current
/// testbench.
pub fn run_testbenches(kernel: &mut SimKernel, selector: &TestSelector) -> Vec<TestOutcome> {
    let Some(last) = TESTBENCHES.iter().rposition(|t| selector.matches(t.name)) else {
        return Vec::new();
    };

    let mut outcomes = Vec::new();
    for tb in &TESTBENCHES[..=last] {
        let selected = selector.matches(tb.name);
        if selected {
            log::info!("running {}: {}", tb.name, tb.description);
        } else {
            log::debug!("running prerequisite {}", tb.name);
        }
        kernel.take_failures();
        let result = (tb.run)(kernel);
        let failures = kernel.take_failures();
        let error = result.err().map(|e| e.to_string());
        let aborted = error.is_some();

        if selected {
            outcomes.push(TestOutcome {
                name: tb.name,
                passed: failures.is_empty() && error.is_none(),
                failures,
                error,
                end_time: kernel.current_time(),
            });
        } else if let Some(e) = &error {
            log::warn!("prerequisite {} aborted: {e}", tb.name);
        }
        if aborted {
            break;
        }
    }
    outcomes
}

fn expect(k: &mut SimKernel, port: Port, value: u64, message: &str) {
    let expected = LogicVec::from_u64(value, port.width());
    k.expect_value(port, &expected, message);
}

fn sp(k: &SimKernel) -> LogicVec {
    k.port_value(Port::StackAddrW)
}

fn idle_controls(k: &mut SimKernel) -> Result<(), SimError> {
    k.set_port(Port::StackPush, 0)?;
    k.set_port(Port::StackPop, 0)?;
    k.set_port(Port::StackWe, 0)?;
    k.set_port(Port::StackRe, 0)
}

/// Writes `value` at the pointer, pushes, then idles one cycle.
fn write_then_push(k: &mut SimKernel, value: u64) -> Result<(), SimError> {
    k.set_port(Port::StackData1In, value)?;
    k.set_port(Port::StackWe, 1)?;
    k.rising_edge()?;
    k.set_port(Port::StackWe, 0)?;

    k.set_port(Port::StackPush, 1)?;
    k.rising_edge()?;
    k.set_port(Port::StackPush, 0)?;

    k.rising_edge()
}

fn fill(k: &mut SimKernel, log_each: bool) -> Result<(), SimError> {
    for i in 0..=16u64 {
        write_then_push(k, i & 0xF)?;
        if log_each {
            log::info!("PUSH #{i}: SP = {}", sp(k));
        }
    }
    Ok(())
}

fn passed(k: &SimKernel, message: &str) {
    if k.failures().is_empty() {
        log::info!("{message}");
    }
}

fn reset_operation(k: &mut SimKernel) -> Result<(), SimError> {
    idle_controls(k)?;
    k.set_port(Port::StackReset, 0)?;
    k.set_port(Port::StackMuxSel, 0)?;
    k.set_port(Port::StackData1In, 0)?;
    k.set_port(Port::StackData2In, 0)?;

    k.rising_edges(2)?;

    k.set_port(Port::StackReset, 1)?;
    k.rising_edges(2)?;
    k.set_port(Port::StackReset, 0)?;

    k.rising_edge()?;

    expect(k, Port::EmptyO, 1, "After reset, empty_o must be 1");
    expect(k, Port::FullO, 0, "After reset, full_o must be 0");
    expect(k, Port::StackDataOut, 0, "Data_out must be 0 when stack_re=0");

    passed(k, "Reset operation test PASSED.");
    Ok(())
}

fn push_operation(k: &mut SimKernel) -> Result<(), SimError> {
    idle_controls(k)?;
    k.set_port(Port::StackReset, 1)?;
    k.set_port(Port::StackMuxSel, 1)?;
    k.set_port(Port::StackData1In, 0)?;
    k.set_port(Port::StackData2In, 0)?;

    k.rising_edges(2)?;
    k.set_port(Port::StackReset, 0)?;
    k.rising_edge()?;

    // Write into storage at the current pointer.
    k.set_port(Port::StackData1In, 0xA)?;
    k.set_port(Port::StackWe, 1)?;
    k.rising_edge()?;
    k.set_port(Port::StackWe, 0)?;

    // Then move the pointer.
    k.set_port(Port::StackPush, 1)?;
    k.rising_edge()?;
    k.set_port(Port::StackPush, 0)?;

    k.rising_edge()?;

    expect(k, Port::EmptyO, 0, "Stack must NOT be empty after one push");
    expect(k, Port::FullO, 0, "Stack should NOT be full after one push");
    expect(
        k,
        Port::StackAddrW,
        1,
        "Stack address should be incremented after a push operation",
    );
    expect(k, Port::StackDataInW, 0xA, "Invalid data given");

    passed(k, "Push operation test PASSED.");
    Ok(())
}

fn pop_operation(k: &mut SimKernel) -> Result<(), SimError> {
    // No reset: starts from the entry pushed by push_operation.
    idle_controls(k)?;
    k.rising_edge()?;

    log::info!("Initial stack_addr_w = {}", sp(k));
    expect(
        k,
        Port::StackAddrW,
        1,
        "Stack pointer must be 1 before pop (one push should have occurred)",
    );
    expect(k, Port::EmptyO, 0, "Stack must NOT be empty before pop");

    k.set_port(Port::StackPop, 1)?;
    k.rising_edge()?;
    k.set_port(Port::StackPop, 0)?;

    k.rising_edge()?;
    log::info!("After POP stack_addr_w = {}", sp(k));

    k.set_port(Port::StackRe, 1)?;
    k.rising_edges(2)?;
    k.set_port(Port::StackRe, 0)?;

    expect(k, Port::StackAddrW, 0, "Stack pointer should decrement to 0 after pop");
    expect(k, Port::EmptyO, 1, "Stack must be EMPTY after popping the last entry");
    expect(k, Port::FullO, 0, "Stack must NOT be full after pop");
    expect(k, Port::StackDataOut, 0xA, "Invalid data fetched");

    passed(k, "Pop operation test PASSED.");
    Ok(())
}

fn full_flag(k: &mut SimKernel) -> Result<(), SimError> {
    idle_controls(k)?;
    k.set_port(Port::StackMuxSel, 1)?;
    k.rising_edge()?;

    log::info!("Initial SP = {}", sp(k));
    expect(k, Port::StackAddrW, 0, "Stack pointer must be 0 before FULL test");

    fill(k, true)?;

    expect(k, Port::StackAddrW, 16, "Stack pointer must be 16 when FULL");
    expect(k, Port::FullO, 1, "FULL flag must be 1 when stack pointer reaches 16");
    expect(k, Port::EmptyO, 0, "EMPTY must be 0 when stack is full");

    // One more push must not move the pointer.
    let before = sp(k);
    write_then_push(k, 0xF)?;
    let after = sp(k);
    log::info!("SP after extra push attempt = {after}");
    k.check(after == before, "SP must NOT increment when FULL");

    passed(k, "FULL FLAG test PASSED.");
    Ok(())
}

fn empty_flag(k: &mut SimKernel) -> Result<(), SimError> {
    idle_controls(k)?;
    k.set_port(Port::StackMuxSel, 1)?;
    k.rising_edge()?;

    fill(k, false)?;

    expect(k, Port::StackAddrW, 16, "Stack pointer must be 16 after filling");
    expect(k, Port::FullO, 1, "FULL flag must be 1 after filling");
    expect(k, Port::EmptyO, 0, "EMPTY must be 0 after filling");
    log::info!("Stack filled to FULL. Starting EMPTY test...");

    for slot in (0..=16u32).rev() {
        // Read first, then pop.
        k.set_port(Port::StackRe, 1)?;
        k.rising_edge()?;
        let data = k.port_value(Port::StackDataOut);
        k.set_port(Port::StackRe, 0)?;
        log::info!("Read @ SP={slot} -> data={data}");

        k.set_port(Port::StackPop, 1)?;
        k.rising_edge()?;
        k.set_port(Port::StackPop, 0)?;

        k.rising_edge()?;
        log::info!("After POP: SP = {}", sp(k));
    }

    expect(k, Port::StackAddrW, 0, "SP must be 0 when EMPTY");
    expect(k, Port::EmptyO, 1, "EMPTY flag must be 1");
    expect(k, Port::FullO, 0, "FULL must be 0 when EMPTY");

    passed(k, "EMPTY FLAG test PASSED.");
    Ok(())
}
