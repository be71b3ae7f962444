//! Narrow vectors of 4-state logic values used as port values.

use crate::logic::Logic;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum width of a [`LogicVec`].
pub const MAX_WIDTH: u32 = 64;

/// A vector of up to 64 [`Logic`] values.
///
/// Stored as two bit planes in the style of the Verilog VPI: `aval` holds the
/// level and `bval` marks bits that are not driven to a known level.
///
/// | aval | bval | value |
/// |------|------|-------|
/// | 0    | 0    | 0     |
/// | 1    | 0    | 1     |
/// | 0    | 1    | Z     |
/// | 1    | 1    | X     |
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LogicVec {
    width: u32,
    aval: u64,
    bval: u64,
}

impl LogicVec {
    /// Creates a new `LogicVec` of the given width, initialized to all `Zero`.
    ///
    /// # Panics
    ///
    /// Panics if `width` is zero or exceeds [`MAX_WIDTH`].
    pub fn new(width: u32) -> Self {
        assert!(
            width > 0 && width <= MAX_WIDTH,
            "LogicVec width {width} out of range 1..={MAX_WIDTH}"
        );
        Self {
            width,
            aval: 0,
            bval: 0,
        }
    }

    /// Creates a `LogicVec` with every bit unknown (`X`).
    pub fn unknown(width: u32) -> Self {
        let mut v = Self::new(width);
        v.aval = v.mask();
        v.bval = v.mask();
        v
    }

    /// Creates a single-bit `LogicVec` from a boolean value.
    pub fn from_bool(value: bool) -> Self {
        Self::from_u64(value as u64, 1)
    }

    /// Creates a `LogicVec` from a `u64` value with the given width.
    ///
    /// Bits beyond the given width are dropped.
    pub fn from_u64(value: u64, width: u32) -> Self {
        let mut v = Self::new(width);
        v.aval = value & v.mask();
        v
    }

    /// Returns the number of logic values in this vector.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Gets the logic value at the given index.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.width()`.
    pub fn get(&self, index: u32) -> Logic {
        assert!(
            index < self.width,
            "index {index} out of bounds for width {}",
            self.width
        );
        let a = (self.aval >> index) & 1;
        let b = (self.bval >> index) & 1;
        match (a, b) {
            (0, 0) => Logic::Zero,
            (1, 0) => Logic::One,
            (0, _) => Logic::Z,
            _ => Logic::X,
        }
    }

    /// Sets the logic value at the given index.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.width()`.
    pub fn set(&mut self, index: u32, value: Logic) {
        assert!(
            index < self.width,
            "index {index} out of bounds for width {}",
            self.width
        );
        let bit = 1u64 << index;
        let (a, b) = match value {
            Logic::Zero => (false, false),
            Logic::One => (true, false),
            Logic::Z => (false, true),
            Logic::X => (true, true),
        };
        self.aval = if a { self.aval | bit } else { self.aval & !bit };
        self.bval = if b { self.bval | bit } else { self.bval & !bit };
    }

    /// Converts to a `u64` if every bit is a known level.
    pub fn to_u64(&self) -> Option<u64> {
        if self.bval != 0 {
            return None;
        }
        Some(self.aval)
    }

    /// Converts a single-bit vector to a boolean if it is a known level.
    pub fn to_bool(&self) -> Option<bool> {
        if self.width != 1 {
            return None;
        }
        self.to_u64().map(|v| v != 0)
    }

    /// Returns true if any bit is `X` or `Z`.
    pub fn has_unknown(&self) -> bool {
        self.bval != 0
    }

    /// Parses a binary string like `"10XZ"` into a `LogicVec`.
    ///
    /// The leftmost character is the most significant bit. Returns `None` for
    /// invalid characters, an empty string, or more than [`MAX_WIDTH`] digits.
    pub fn from_binary_str(s: &str) -> Option<Self> {
        let width = s.chars().count() as u32;
        if width == 0 || width > MAX_WIDTH {
            return None;
        }
        let mut v = Self::new(width);
        for (i, c) in s.chars().rev().enumerate() {
            v.set(i as u32, Logic::from_char(c)?);
        }
        Some(v)
    }

    fn mask(&self) -> u64 {
        if self.width == MAX_WIDTH {
            u64::MAX
        } else {
            (1u64 << self.width) - 1
        }
    }
}

impl fmt::Display for LogicVec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for i in (0..self.width).rev() {
            write!(f, "{}", self.get(i))?;
        }
        Ok(())
    }
}

impl fmt::Debug for LogicVec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LogicVec({self})")
    }
}
