//! Common utility for extended `std` types
//!
//! These are left public for convenience.
//!
//! For example, C-style scientific formatting and line-by-line reading of the
//! FFEA text formats are useful everywhere.

// Alias for the format! macro
pub use std::format as f;

// Modules
mod error;
mod float_ext;
mod line_reader;
mod permute_ext;

// Flatten
pub use error::{Error, Result};
pub use float_ext::FloatExt;
pub use line_reader::LineReader;
pub use permute_ext::PermuteExt;
