//! Shared types for the TO2 tooling: source positions, ranges and the
//! line index used to derive them from byte offsets.

pub mod span;

pub use span::{InputPosition, InputRange, LineIndex};
