//! Primitives for manipulating nested store data.
//!
//! - [`set_path`]: write a value at a dot-delimited path
//! - [`omit`]: drop top-level keys from a mapping

mod omit;
mod set;

pub use omit::omit;
pub use set::{set_path, MAX_ARRAY_PADDING};
