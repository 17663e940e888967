pub mod common;

#[cfg(feature = "rpi")]
pub mod rpi;

#[cfg(feature = "simulator")]
pub mod simulator;

pub use common::*;
