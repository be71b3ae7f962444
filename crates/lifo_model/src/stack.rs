//! The LIFO stack state machine.
//!
//! [`LifoStack`] holds the pointer, the storage pool and the two output
//! registers. [`LifoStack::apply_edge`] evaluates one rising clock edge with
//! non-blocking semantics: the write port and the read port both address the
//! pointer value from *before* the edge, and the pointer update is computed
//! in fixed priority order (reset, push, pop).

use lifo_common::LogicVec;

use crate::policy::{ReadIdlePolicy, StackPolicy, UnderflowPolicy};
use crate::ports::{StackInputs, StackOutputs};
use crate::storage::StoragePool;
use crate::{DATA_WIDTH, DEPTH};

/// A 16-deep synchronous LIFO stack of 4-bit words.
///
/// State is undefined until the first reset: the pointer and both output
/// registers read as `X`, and writes are dropped because their address is
/// unknown.
#[derive(Clone, Debug)]
pub struct LifoStack {
    /// Stack pointer in `0..=DEPTH`, `None` while unknown.
    pointer: Option<u8>,
    storage: StoragePool,
    /// `stack_data_in_w` register.
    data_in_w: Option<u8>,
    /// `stack_data_out` register.
    data_out: LogicVec,
    policy: StackPolicy,
}

impl LifoStack {
    /// Creates a stack with the default policy.
    pub fn new() -> Self {
        Self::with_policy(StackPolicy::default())
    }

    /// Creates a stack with the given open-behavior policy.
    pub fn with_policy(policy: StackPolicy) -> Self {
        Self {
            pointer: None,
            storage: StoragePool::new(),
            data_in_w: None,
            data_out: LogicVec::unknown(DATA_WIDTH),
            policy,
        }
    }

    /// Returns the policy this stack was built with.
    pub fn policy(&self) -> StackPolicy {
        self.policy
    }

    /// Returns the pointer, or `None` before the first reset.
    pub fn pointer(&self) -> Option<u8> {
        self.pointer
    }

    /// Returns the stored word at `addr` without going through the read port.
    pub fn peek_slot(&self, addr: u8) -> Option<u8> {
        self.storage.get(addr)
    }

    /// Current output values, without advancing the clock.
    pub fn outputs(&self) -> StackOutputs {
        StackOutputs::build(self.pointer, self.data_in_w, self.data_out)
    }

    /// Applies one rising clock edge and returns the outputs after it.
    pub fn apply_edge(&mut self, inputs: &StackInputs) -> StackOutputs {
        let current = self.pointer;

        if inputs.write_enable {
            let word = inputs.selected_data();
            self.data_in_w = Some(word);
            match current {
                Some(addr) => self.storage.write(addr, word),
                None => log::debug!("write of {word:#x} dropped: pointer unknown"),
            }
        }

        // Reset clears the read register under every idle policy.
        if inputs.read_enable {
            self.data_out = self.storage.read(current);
        } else if inputs.reset || self.policy.read_idle == ReadIdlePolicy::Zero {
            self.data_out = LogicVec::new(DATA_WIDTH);
        }

        self.pointer = self.next_pointer(current, inputs);

        if self.pointer != current {
            log::trace!(
                "pointer {} -> {}",
                fmt_pointer(current),
                fmt_pointer(self.pointer)
            );
        }

        self.outputs()
    }

    /// Computes the post-edge pointer in priority order.
    fn next_pointer(&self, current: Option<u8>, inputs: &StackInputs) -> Option<u8> {
        if inputs.reset {
            return Some(0);
        }
        let p = current?;
        if inputs.push {
            if p < DEPTH {
                return Some(p + 1);
            }
            log::debug!("push ignored: stack full");
            return Some(p);
        }
        if inputs.pop {
            if p > 0 {
                return Some(p - 1);
            }
            return match self.policy.underflow {
                UnderflowPolicy::Ignore => {
                    log::debug!("pop ignored: stack empty");
                    Some(0)
                }
                UnderflowPolicy::Poison => {
                    log::debug!("pop at empty: pointer poisoned until reset");
                    None
                }
            };
        }
        Some(p)
    }
}

impl Default for LifoStack {
    fn default() -> Self {
        Self::new()
    }
}

fn fmt_pointer(p: Option<u8>) -> String {
    p.map_or_else(|| "X".to_string(), |v| v.to_string())
}
