//! Auxiliary input files describing an FFEA blob
#![doc = include_str!("../readme.md")]

mod error;
mod force;
mod io;
mod material;
mod pin;
mod region;
mod stokes;
mod vdw;

#[doc(inline)]
pub use force::{Force, ForceSet};

#[doc(inline)]
pub use material::{Material, MaterialParams, NUM_PARAMETERS};

#[doc(inline)]
pub use pin::PinFile;

#[doc(inline)]
pub use region::Region;

#[doc(inline)]
pub use stokes::StokesRadii;

#[doc(inline)]
pub use vdw::{VdwFile, INACTIVE};

#[doc(inline)]
pub use error::{Error, Result};
