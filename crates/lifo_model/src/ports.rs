//! Per-edge control inputs and observable outputs of the stack.

use lifo_common::LogicVec;

use crate::{ADDR_WIDTH, DATA_MASK, DATA_WIDTH, DEPTH};

/// Selects which data input feeds the write port.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum MuxSel {
    /// `stack_mux_sel = 1`: write `stack_data_1_in`.
    Data1,
    /// `stack_mux_sel = 0`: write `stack_data_2_in`.
    #[default]
    Data2,
}

impl From<bool> for MuxSel {
    fn from(sel: bool) -> Self {
        if sel {
            MuxSel::Data1
        } else {
            MuxSel::Data2
        }
    }
}

/// Input values sampled at one rising edge.
///
/// The default is every control low with `stack_mux_sel = 0` and both data
/// inputs 0.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StackInputs {
    /// `stack_reset`: synchronous reset of the pointer.
    pub reset: bool,
    /// `stack_push`: request a pointer increment.
    pub push: bool,
    /// `stack_pop`: request a pointer decrement.
    pub pop: bool,
    /// `stack_we`: write the selected input at the current pointer.
    pub write_enable: bool,
    /// `stack_re`: load `stack_data_out` from the current pointer.
    pub read_enable: bool,
    /// `stack_mux_sel`: write data source.
    pub mux_sel: MuxSel,
    /// `stack_data_1_in`. Only the low [`DATA_WIDTH`] bits are used.
    pub data_1: u8,
    /// `stack_data_2_in`. Only the low [`DATA_WIDTH`] bits are used.
    pub data_2: u8,
}

impl StackInputs {
    /// The word the input mux presents to the write port.
    pub fn selected_data(&self) -> u8 {
        let raw = match self.mux_sel {
            MuxSel::Data1 => self.data_1,
            MuxSel::Data2 => self.data_2,
        };
        raw & DATA_MASK
    }
}

/// Output values visible after an edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StackOutputs {
    /// `stack_addr_w`: the stack pointer.
    pub addr_w: LogicVec,
    /// `stack_data_in_w`: the last word latched for writing.
    pub data_in_w: LogicVec,
    /// `stack_data_out`: the read-path register.
    pub data_out: LogicVec,
    /// `empty_o`.
    pub empty: LogicVec,
    /// `full_o`.
    pub full: LogicVec,
}

impl StackOutputs {
    pub(crate) fn build(
        pointer: Option<u8>,
        data_in_w: Option<u8>,
        data_out: LogicVec,
    ) -> Self {
        let flag = |f: fn(u8) -> bool| match pointer {
            Some(p) => LogicVec::from_bool(f(p)),
            None => LogicVec::unknown(1),
        };
        Self {
            addr_w: word(pointer, ADDR_WIDTH),
            data_in_w: word(data_in_w, DATA_WIDTH),
            data_out,
            empty: flag(|p| p == 0),
            full: flag(|p| p == DEPTH),
        }
    }

    /// The pointer, or `None` while it is unknown.
    pub fn pointer(&self) -> Option<u64> {
        self.addr_w.to_u64()
    }

    /// `empty_o` as a boolean, or `None` while unknown.
    pub fn is_empty(&self) -> Option<bool> {
        self.empty.to_bool()
    }

    /// `full_o` as a boolean, or `None` while unknown.
    pub fn is_full(&self) -> Option<bool> {
        self.full.to_bool()
    }
}

/// Converts an optional register value to a port value, `X` when unset.
pub(crate) fn word(value: Option<u8>, width: u32) -> LogicVec {
    match value {
        Some(v) => LogicVec::from_u64(v as u64, width),
        None => LogicVec::unknown(width),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_inputs_are_idle() {
        let i = StackInputs::default();
        assert!(!i.reset && !i.push && !i.pop && !i.write_enable && !i.read_enable);
        assert_eq!(i.mux_sel, MuxSel::Data2);
    }

    #[test]
    fn mux_selects_source() {
        let mut i = StackInputs {
            data_1: 0x3,
            data_2: 0xC,
            ..Default::default()
        };
        assert_eq!(i.selected_data(), 0xC);
        i.mux_sel = MuxSel::from(true);
        assert_eq!(i.selected_data(), 0x3);
    }

    #[test]
    fn selected_data_truncated_to_word() {
        let i = StackInputs {
            mux_sel: MuxSel::Data1,
            data_1: 0x1F,
            ..Default::default()
        };
        assert_eq!(i.selected_data(), 0xF);
    }

    #[test]
    fn flags_follow_pointer() {
        let empty = StackOutputs::build(Some(0), None, LogicVec::new(4));
        assert_eq!(empty.is_empty(), Some(true));
        assert_eq!(empty.is_full(), Some(false));

        let full = StackOutputs::build(Some(16), None, LogicVec::new(4));
        assert_eq!(full.is_empty(), Some(false));
        assert_eq!(full.is_full(), Some(true));
        assert_eq!(full.pointer(), Some(16));
    }

    #[test]
    fn unknown_pointer_gives_unknown_flags() {
        let out = StackOutputs::build(None, None, LogicVec::unknown(4));
        assert_eq!(out.pointer(), None);
        assert_eq!(out.is_empty(), None);
        assert_eq!(out.is_full(), None);
        assert!(out.data_in_w.has_unknown());
    }
}
