//! The stack's backing register file.

use lifo_common::LogicVec;

use crate::ports::word;
use crate::{DATA_MASK, DATA_WIDTH, DEPTH};

/// Number of addressable slots: one per pointer value in `0..=DEPTH`.
pub const SLOTS: usize = DEPTH as usize + 1;

/// Seventeen 4-bit word slots addressed by the stack pointer.
///
/// A slot that was never written holds no value and reads back as all-X.
/// Reset does not clear the pool.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoragePool {
    slots: [Option<u8>; SLOTS],
}

impl StoragePool {
    /// Creates a pool with every slot unwritten.
    pub fn new() -> Self {
        Self {
            slots: [None; SLOTS],
        }
    }

    /// Stores `value` (truncated to a data word) at `addr`.
    ///
    /// Addresses outside `0..=DEPTH` are ignored.
    pub fn write(&mut self, addr: u8, value: u8) {
        if let Some(slot) = self.slots.get_mut(addr as usize) {
            *slot = Some(value & DATA_MASK);
        }
    }

    /// Returns the word at `addr`, or `None` if it was never written or
    /// `addr` is out of range.
    pub fn get(&self, addr: u8) -> Option<u8> {
        self.slots.get(addr as usize).copied().flatten()
    }

    /// Reads a slot as a port value. An unknown address reads as all-X.
    pub fn read(&self, addr: Option<u8>) -> LogicVec {
        word(addr.and_then(|a| self.get(a)), DATA_WIDTH)
    }
}

impl Default for StoragePool {
    fn default() -> Self {
        Self::new()
    }
}
