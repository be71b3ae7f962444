//! Cycle-accurate behavioral model of a synchronous LIFO stack.
//!
//! The modeled unit is a 16-deep stack of 4-bit words with an explicit
//! address pointer. The pointer ranges over `0..=16`: 0 means empty and 16
//! means full, so the backing storage has 17 addressable slots. Push, pop,
//! write-enable and read-enable are independent control inputs sampled on
//! the rising clock edge.
//!
//! # Usage
//!
//! ```
//! use lifo_model::{LifoStack, MuxSel, StackInputs};
//!
//! let mut stack = LifoStack::new();
//! stack.apply_edge(&StackInputs { reset: true, ..Default::default() });
//!
//! let write = StackInputs {
//!     write_enable: true,
//!     mux_sel: MuxSel::Data1,
//!     data_1: 0xA,
//!     ..Default::default()
//! };
//! stack.apply_edge(&write);
//! let out = stack.apply_edge(&StackInputs { push: true, ..Default::default() });
//! assert_eq!(out.pointer(), Some(1));
//! assert_eq!(out.data_in_w.to_u64(), Some(0xA));
//! ```
//!
//! # Modules
//!
//! - `ports` — per-edge inputs and observable outputs
//! - `policy` — behavior for requests the hardware leaves open
//! - `storage` — the 17-slot register file
//! - `stack` — the edge-update state machine

#![warn(missing_docs)]

pub mod policy;
pub mod ports;
pub mod stack;
pub mod storage;

pub use policy::{ReadIdlePolicy, StackPolicy, UnderflowPolicy};
pub use ports::{MuxSel, StackInputs, StackOutputs};
pub use stack::LifoStack;
pub use storage::StoragePool;

/// Number of entries the stack holds; also the pointer value when full.
pub const DEPTH: u8 = 16;

/// Width of `stack_addr_w` in bits (enough for `0..=DEPTH`).
pub const ADDR_WIDTH: u32 = 5;

/// Width of a stored data word in bits.
pub const DATA_WIDTH: u32 = 4;

/// Mask selecting the bits of a data word.
pub const DATA_MASK: u8 = (1 << DATA_WIDTH) - 1;
