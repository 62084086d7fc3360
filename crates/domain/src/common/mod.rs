//! Small pure helpers shared by the value objects and the engine.
//!
//! - **Pure functions only** - no side effects, no I/O
//! - **No dependencies** beyond std

pub mod number;
pub mod string;

pub use number::{format_decimal, format_f32};
pub use string::{eq_ignore_case, none_if_empty, strip_prefix_ignore_case};
