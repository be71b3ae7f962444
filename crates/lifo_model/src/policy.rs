//! Behavior for requests whose outcome the hardware leaves open.

use serde::{Deserialize, Serialize};

/// What a pop does when the pointer is already 0.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnderflowPolicy {
    /// The pointer stays at 0, mirroring push-at-full.
    #[default]
    Ignore,
    /// The pointer becomes unknown until the next reset, so a harness
    /// sampling `stack_addr_w` sees `X` after an illegal pop.
    Poison,
}

/// What `stack_data_out` shows on edges where read-enable is low.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadIdlePolicy {
    /// The output register is cleared to 0.
    #[default]
    Zero,
    /// The output register keeps the last value read until the next reset.
    Hold,
}

/// The full set of open-behavior choices for one [`LifoStack`](crate::LifoStack).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StackPolicy {
    /// Pop-at-empty handling.
    #[serde(default)]
    pub underflow: UnderflowPolicy,
    /// Read-disabled output handling.
    #[serde(default)]
    pub read_idle: ReadIdlePolicy,
}
