//! `ffeatools` is a set of libraries and a command line tool for preparing
//! and analysing FFEA simulations
//!
#![doc = include_str!("../readme.md")]
#![deny(missing_docs, missing_debug_implementations)]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

// Re-exports of toolkit crates.
#[doc(inline)]
pub use ffeatools_mesh as mesh;

#[doc(inline)]
pub use ffeatools_utils as utils;

#[cfg(feature = "blob")]
#[cfg_attr(docsrs, doc(cfg(feature = "blob")))]
#[doc(inline)]
pub use ffeatools_blob as blob;

#[cfg(feature = "modes")]
#[cfg_attr(docsrs, doc(cfg(feature = "modes")))]
#[doc(inline)]
pub use ffeatools_modes as modes;

#[cfg(feature = "traj")]
#[cfg_attr(docsrs, doc(cfg(feature = "traj")))]
#[doc(inline)]
pub use ffeatools_traj as traj;
