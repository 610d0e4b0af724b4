//! FFEA trajectory reading and equilibration checks
#![doc = include_str!("../readme.md")]

mod equilibration;
mod error;
mod parsers;
mod reader;

#[doc(inline)]
pub use reader::{extract_positions, read_trajectory, Frame, TrajectoryReader};

#[doc(inline)]
pub use equilibration::{
    running_mean, EnergyCheck, Equilibration, EquilibrationReport, Measurements,
    ROOM_TEMPERATURE_KT,
};

#[doc(inline)]
pub use error::{Error, Result};
