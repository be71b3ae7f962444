//! The stack's port list.
//!
//! Every signal a testbench can touch is a [`Port`]. Names follow the
//! hardware module's port list so stimulus scripts and waveforms use the
//! same identifiers as the RTL.

use std::fmt;

use lifo_model::{ADDR_WIDTH, DATA_WIDTH};

/// Number of ports on the stack, including the clock.
pub const PORT_COUNT: usize = 14;

/// Direction of a port as seen from the stack.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Driven by the testbench (or the clock generator).
    Input,
    /// Driven by the stack.
    Output,
}

/// A port of the LIFO stack.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Port {
    /// `clk`
    Clk,
    /// `stack_reset`
    StackReset,
    /// `stack_push`
    StackPush,
    /// `stack_pop`
    StackPop,
    /// `stack_we`
    StackWe,
    /// `stack_re`
    StackRe,
    /// `stack_mux_sel`
    StackMuxSel,
    /// `stack_data_1_in`
    StackData1In,
    /// `stack_data_2_in`
    StackData2In,
    /// `stack_addr_w`
    StackAddrW,
    /// `stack_data_in_w`
    StackDataInW,
    /// `stack_data_out`
    StackDataOut,
    /// `empty_o`
    EmptyO,
    /// `full_o`
    FullO,
}

impl Port {
    /// Every port, inputs first, in declaration order.
    pub const ALL: [Port; PORT_COUNT] = [
        Port::Clk,
        Port::StackReset,
        Port::StackPush,
        Port::StackPop,
        Port::StackWe,
        Port::StackRe,
        Port::StackMuxSel,
        Port::StackData1In,
        Port::StackData2In,
        Port::StackAddrW,
        Port::StackDataInW,
        Port::StackDataOut,
        Port::EmptyO,
        Port::FullO,
    ];

    /// The RTL name of the port.
    pub fn name(self) -> &'static str {
        match self {
            Port::Clk => "clk",
            Port::StackReset => "stack_reset",
            Port::StackPush => "stack_push",
            Port::StackPop => "stack_pop",
            Port::StackWe => "stack_we",
            Port::StackRe => "stack_re",
            Port::StackMuxSel => "stack_mux_sel",
            Port::StackData1In => "stack_data_1_in",
            Port::StackData2In => "stack_data_2_in",
            Port::StackAddrW => "stack_addr_w",
            Port::StackDataInW => "stack_data_in_w",
            Port::StackDataOut => "stack_data_out",
            Port::EmptyO => "empty_o",
            Port::FullO => "full_o",
        }
    }

    /// Looks a port up by its RTL name.
    pub fn from_name(name: &str) -> Option<Port> {
        Port::ALL.into_iter().find(|p| p.name() == name)
    }

    /// The port direction.
    pub fn direction(self) -> Direction {
        match self {
            Port::StackAddrW
            | Port::StackDataInW
            | Port::StackDataOut
            | Port::EmptyO
            | Port::FullO => Direction::Output,
            _ => Direction::Input,
        }
    }

    /// The port width in bits.
    pub fn width(self) -> u32 {
        match self {
            Port::StackData1In | Port::StackData2In | Port::StackDataInW | Port::StackDataOut => {
                DATA_WIDTH
            }
            Port::StackAddrW => ADDR_WIDTH,
            _ => 1,
        }
    }

    /// Whether a testbench may drive this port.
    pub fn is_drivable(self) -> bool {
        self.direction() == Direction::Input && self != Port::Clk
    }

    /// Position in [`Port::ALL`], used to index per-port tables.
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
