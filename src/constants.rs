//! AS7341 register map, bit masks and timing constants.

/// Fixed 7-bit I2C address of the AS7341
pub const I2C_ADDRESS: u8 = 0x39;

/// AS7341 Registers
pub const REG_SMUX_RAM: u8 = 0x00;
pub const REG_CONFIG: u8 = 0x70;
pub const REG_SMUX_STATUS: u8 = 0x73;
pub const REG_SMUX_CMD: u8 = 0x7F;
pub const REG_ENABLE: u8 = 0x80;
pub const REG_ATIME: u8 = 0x81;
pub const REG_ID: u8 = 0x92;
pub const REG_STATUS: u8 = 0x93;
/// F1 low byte. The ten channels follow as consecutive little-endian pairs.
pub const REG_DATA0: u8 = 0x94;
pub const REG_CFG0: u8 = 0xA9;
pub const REG_AGAIN: u8 = 0xAA;
pub const REG_ASTEP_L: u8 = 0xCA;
pub const REG_ASTEP_H: u8 = 0xCB;

/// ENABLE register bits
pub const ENABLE_PON: u8 = 0x01;
pub const ENABLE_SP_EN: u8 = 0x02;
pub const ENABLE_WEN: u8 = 0x08;
/// Self-clears once the device has latched the SMUX configuration.
pub const ENABLE_SMUXEN: u8 = 0x10;
pub const ENABLE_FDEN: u8 = 0x40;

/// STATUS register data-valid bit
pub const STATUS_AVALID: u8 = 0x08;

pub const SMUX_STATUS_VALID: u8 = 0x01;
pub const SMUX_CMD_WRITE: u8 = 0x10;

pub const CONFIG_NORMAL: u8 = 0x00;
pub const CONFIG_SMUX_RAM: u8 = 0x01;

/// Waits, in milliseconds
pub const RESET_DELAY_MS: u32 = 10;
pub const SMUX_SETTLE_MS: u32 = 50;
pub const POLL_INTERVAL_MS: u32 = 10;
pub const POLL_ATTEMPTS: u16 = 200;

/// Duration of one integration step in microseconds
pub const ASTEP_UNIT_US: f32 = 2.78;

/// Analog gain settings (AGAIN register values)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Gain {
    X0_5 = 0,
    X1 = 1,
    X2 = 2,
    X4 = 3,
    X8 = 4,
    X16 = 5,
    X32 = 6,
    X64 = 7,
    X128 = 8,
    X256 = 9,
    X512 = 10,
}

impl Gain {
    /// Returns the gain for a raw register code, `None` above 10
    pub fn from_code(code: u8) -> Option<Gain> {
        let gain = match code {
            0 => Gain::X0_5,
            1 => Gain::X1,
            2 => Gain::X2,
            3 => Gain::X4,
            4 => Gain::X8,
            5 => Gain::X16,
            6 => Gain::X32,
            7 => Gain::X64,
            8 => Gain::X128,
            9 => Gain::X256,
            10 => Gain::X512,
            _ => return None,
        };
        Some(gain)
    }

    pub fn code(self) -> u8 {
        self as u8
    }

    /// Returns the gain value as a floating-point multiplier
    pub fn multiplier(self) -> f32 {
        0.5 * (1u32 << self.code()) as f32
    }
}
