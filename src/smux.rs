//! SMUX programming.
//!
//! The SMUX routes photodiodes to the ten ADC slots. Its configuration is
//! written through a RAM window while CONFIG is in SMUX mode and latched by
//! pulsing ENABLE.SMUXEN, which the device clears again on its own.

use core::fmt;

use embedded_hal::{delay::DelayNs, i2c::I2c};

use crate::bus::{modify_register, read_register, write_register};
use crate::channel::Channel;
use crate::constants::*;
use crate::error::As7341Error;

/// Channel routed into each ADC slot, slot 0 first
pub type ChannelAssignment<'a> = &'a [Channel];

/// The one-to-one routing F1..F8, Clear, NIR into slots 0..9
pub const STANDARD_ASSIGNMENT: [Channel; 10] = Channel::ALL;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignmentError {
    /// The assignment did not have exactly ten entries
    WrongLength(usize),
    /// A channel was routed into more than one slot
    Duplicate(Channel),
}

impl fmt::Display for AssignmentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssignmentError::WrongLength(len) => {
                write!(f, "expected 10 channel slots, got {}", len)
            }
            AssignmentError::Duplicate(channel) => {
                write!(f, "channel {} assigned to more than one slot", channel.name())
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for AssignmentError {}

/// Validated ten-slot routing table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SmuxTable {
    slots: [Channel; 10],
}

impl SmuxTable {
    pub const fn standard() -> Self {
        Self {
            slots: STANDARD_ASSIGNMENT,
        }
    }

    /// Routing code written to each SMUX RAM location
    pub fn codes(&self) -> [u8; 10] {
        self.slots.map(Channel::smux_code)
    }

    /// Channel whose data lands in ADC slot `slot`, `None` past the last slot
    pub fn channel_at(&self, slot: usize) -> Option<Channel> {
        self.slots.get(slot).copied()
    }

    pub fn slots(&self) -> &[Channel; 10] {
        &self.slots
    }
}

impl Default for SmuxTable {
    fn default() -> Self {
        Self::standard()
    }
}

/// Outcome of an apply pulse as reported by the SMUX status register
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmuxStatus {
    Valid,
    NotConfirmed,
}

/// Builds the routing table for `assignment`.
///
/// Every logical channel must appear exactly once.
pub fn build_table(assignment: ChannelAssignment<'_>) -> Result<SmuxTable, AssignmentError> {
    if assignment.len() != Channel::ALL.len() {
        return Err(AssignmentError::WrongLength(assignment.len()));
    }

    let mut seen = [false; 10];
    let mut slots = STANDARD_ASSIGNMENT;
    for (slot, &channel) in assignment.iter().enumerate() {
        if seen[channel.index()] {
            return Err(AssignmentError::Duplicate(channel));
        }
        seen[channel.index()] = true;
        slots[slot] = channel;
    }

    Ok(SmuxTable { slots })
}

/// Pushes `table` into SMUX RAM and latches it.
///
/// The spectral engine is stopped first; reconfiguring the SMUX while it
/// runs is undefined. A missing SMUX-valid bit is reported, not raised.
pub fn apply<I2C, DELAY>(
    i2c: &mut I2C,
    delay: &mut DELAY,
    table: &SmuxTable,
) -> Result<SmuxStatus, As7341Error<I2C::Error>>
where
    I2C: I2c,
    DELAY: DelayNs,
{
    modify_register(i2c, REG_ENABLE, ENABLE_SP_EN, false).map_err(As7341Error::Bus)?;

    write_register(i2c, REG_CONFIG, CONFIG_SMUX_RAM).map_err(As7341Error::Bus)?;
    write_register(i2c, REG_SMUX_CMD, SMUX_CMD_WRITE).map_err(As7341Error::Bus)?;

    for (offset, code) in table.codes().iter().enumerate() {
        write_register(i2c, REG_SMUX_RAM + offset as u8, *code).map_err(As7341Error::Bus)?;
    }

    modify_register(i2c, REG_ENABLE, ENABLE_SMUXEN, true).map_err(As7341Error::Bus)?;
    delay.delay_ms(SMUX_SETTLE_MS);

    let smux_status = read_register(i2c, REG_SMUX_STATUS).map_err(As7341Error::Bus)?;
    write_register(i2c, REG_CONFIG, CONFIG_NORMAL).map_err(As7341Error::Bus)?;

    if smux_status & SMUX_STATUS_VALID != 0 {
        Ok(SmuxStatus::Valid)
    } else {
        Ok(SmuxStatus::NotConfirmed)
    }
}
