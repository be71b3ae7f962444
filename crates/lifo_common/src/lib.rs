//! Shared foundational types for the LIFO stack model and its simulator.
//!
//! This crate provides 4-state logic values, narrow logic vectors used as
//! port values, and clock frequency parsing.

#![warn(missing_docs)]

pub mod frequency;
pub mod logic;
pub mod logic_vec;

pub use frequency::{Frequency, ParseFrequencyError};
pub use logic::Logic;
pub use logic_vec::LogicVec;
