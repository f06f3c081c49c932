//! Driver for the AMS AS7341 10-channel spectral sensor.
//!
//! Configures timing and gain, routes the F1..F8, Clear and NIR photodiodes
//! through the SMUX, runs a measurement with a bounded data-ready poll and
//! hands back raw 16-bit counts. [`classify()`] turns a reading into a coarse
//! colour label.

#![no_std]

#[cfg(feature = "std")]
extern crate std;

mod bus;
mod channel;
pub mod classify;
pub mod constants;
mod driver;
mod error;
pub mod smux;

pub use channel::{Channel, ChannelReading};
pub use classify::{classify, dominant_channel, ripeness_index, ColorLabel, DominantChannel};
pub use constants::Gain;
pub use driver::{As7341, DeviceConfig, Diagnostics, MeasurementState, PollBudget};
pub use error::{As7341Error, Warning};
pub use smux::{build_table, AssignmentError, SmuxStatus, SmuxTable};
