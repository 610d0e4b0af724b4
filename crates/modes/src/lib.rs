//! Principal component mode comparison
#![doc = include_str!("../readme.md")]

mod eigen;
mod error;
mod reader;

#[doc(inline)]
pub use eigen::{compare, parse_swap, write_comparison, Eigensystem};

#[doc(inline)]
pub use reader::{parse_evals, parse_evecs, read_evals, read_evecs, THERMAL_ENERGY};

#[doc(inline)]
pub use error::{Error, Result};
