//! Register access over I2C.
//!
//! Every access is traced here so the rest of the driver never logs raw
//! register traffic itself.

use embedded_hal::i2c::I2c;

use crate::constants::I2C_ADDRESS;

/// Reads a single register
pub(crate) fn read_register<I2C: I2c>(i2c: &mut I2C, reg: u8) -> Result<u8, I2C::Error> {
    let mut buffer = [0u8; 1];
    i2c.write_read(I2C_ADDRESS, &[reg], &mut buffer)?;
    log::trace!("read  reg 0x{:02X} = 0x{:02X}", reg, buffer[0]);
    Ok(buffer[0])
}

/// Writes a single register
pub(crate) fn write_register<I2C: I2c>(
    i2c: &mut I2C,
    reg: u8,
    value: u8,
) -> Result<(), I2C::Error> {
    log::trace!("write reg 0x{:02X} = 0x{:02X}", reg, value);
    i2c.write(I2C_ADDRESS, &[reg, value])
}

/// Sets or clears `mask` in a register, leaving every other bit as read back
pub(crate) fn modify_register<I2C: I2c>(
    i2c: &mut I2C,
    reg: u8,
    mask: u8,
    set: bool,
) -> Result<u8, I2C::Error> {
    let current = read_register(i2c, reg)?;
    let value = if set { current | mask } else { current & !mask };
    write_register(i2c, reg, value)?;
    Ok(value)
}

/// Reads a little-endian 16-bit value starting at `reg`
pub(crate) fn read_u16_le<I2C: I2c>(i2c: &mut I2C, reg: u8) -> Result<u16, I2C::Error> {
    let mut buffer = [0u8; 2];
    i2c.write_read(I2C_ADDRESS, &[reg], &mut buffer)?;
    let value = u16::from_le_bytes(buffer);
    log::trace!("read  reg 0x{:02X} = {} ({:02X} {:02X})", reg, value, buffer[0], buffer[1]);
    Ok(value)
}
