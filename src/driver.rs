use crate::bus::{modify_register, read_register, read_u16_le, write_register};
use crate::channel::ChannelReading;
use crate::constants::*;
use crate::error::{As7341Error, Warning};
use crate::smux::{self, build_table, ChannelAssignment, SmuxStatus, SmuxTable};
use core::result::Result;
use core::result::Result::Ok;

use embedded_hal::{delay::DelayNs, i2c::I2c};

/// Timing and gain settings written during setup
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DeviceConfig {
    /// Integration steps minus one
    pub atime: u8,
    /// Step length in 2.78 µs units, minus one
    pub astep: u16,
    pub gain: Gain,
}

impl DeviceConfig {
    /// Effective integration time: (ATIME + 1) x (ASTEP + 1) x 2.78 µs
    pub fn integration_time_us(&self) -> f32 {
        (self.atime as f32 + 1.0) * (self.astep as f32 + 1.0) * ASTEP_UNIT_US
    }
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            atime: 0x10,
            astep: 0x00FF,
            gain: Gain::X4,
        }
    }
}

/// How long to wait for the data-valid bit
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PollBudget {
    pub attempts: u16,
    pub interval_ms: u32,
}

impl Default for PollBudget {
    fn default() -> Self {
        Self {
            attempts: POLL_ATTEMPTS,
            interval_ms: POLL_INTERVAL_MS,
        }
    }
}

/// Where the measurement sequence currently is
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MeasurementState {
    Idle,
    PoweredOn,
    SmuxConfigured,
    Measuring,
    DataReady,
    TimedOut,
}

/// Register snapshot read back for troubleshooting
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Diagnostics {
    pub enable: u8,
    pub device_id: u8,
    pub status: u8,
    pub again: u8,
    pub atime: u8,
    pub astep: u16,
    pub smux_status: u8,
}

impl Diagnostics {
    pub fn powered_on(&self) -> bool {
        self.enable & ENABLE_PON != 0
    }

    pub fn data_valid(&self) -> bool {
        self.status & STATUS_AVALID != 0
    }

    pub fn smux_valid(&self) -> bool {
        self.smux_status & SMUX_STATUS_VALID != 0
    }
}

/// AS7341 driver
///
/// Owns the bus for its whole lifetime. Each operation is a multi-register
/// sequence, so callers sharing a sensor must serialize access to one
/// instance.
pub struct As7341<I2C, DELAY> {
    i2c: I2C,
    delay: DELAY,
    config: DeviceConfig,
    poll: PollBudget,
    table: SmuxTable,
    state: MeasurementState,
    last_warning: Option<Warning>,
}

impl<I2C, DELAY, E> As7341<I2C, DELAY>
where
    I2C: I2c<Error = E>,
    DELAY: DelayNs,
{
    /// Creates a new AS7341 driver instance with the default configuration
    pub fn new(i2c: I2C, delay: DELAY) -> Self {
        Self::with_config(i2c, delay, DeviceConfig::default())
    }

    pub fn with_config(i2c: I2C, delay: DELAY, config: DeviceConfig) -> Self {
        As7341 {
            i2c,
            delay,
            config,
            poll: PollBudget::default(),
            table: SmuxTable::standard(),
            state: MeasurementState::Idle,
            last_warning: None,
        }
    }

    /// Probes for the sensor, power-cycles it and applies the configured
    /// timing and gain. Safe to call again at any time to recover the device.
    pub fn initialize(&mut self) -> Result<(), As7341Error<E>> {
        self.probe()?;

        // Power cycle
        write_register(&mut self.i2c, REG_ENABLE, 0x00).map_err(As7341Error::Bus)?;
        self.delay.delay_ms(RESET_DELAY_MS);
        write_register(&mut self.i2c, REG_ENABLE, ENABLE_PON).map_err(As7341Error::Bus)?;
        self.delay.delay_ms(RESET_DELAY_MS);

        // Register bank select back to the default bank
        write_register(&mut self.i2c, REG_CFG0, 0x00).map_err(As7341Error::Bus)?;

        let config = self.config;
        self.set_timing(config.atime, config.astep)?;
        self.set_gain(config.gain.code())?;

        self.state = MeasurementState::Idle;
        log::debug!(
            "AS7341 initialized: ATIME={} ASTEP={} gain={}x ({} us)",
            config.atime,
            config.astep,
            config.gain.multiplier(),
            config.integration_time_us()
        );
        Ok(())
    }

    fn probe(&mut self) -> Result<(), As7341Error<E>> {
        match read_register(&mut self.i2c, REG_ID) {
            Ok(id) => {
                log::debug!("AS7341 found at 0x{:02X}, ID 0x{:02X}", I2C_ADDRESS, id);
                Ok(())
            }
            Err(_) => {
                log::error!("AS7341 not found at 0x{:02X}", I2C_ADDRESS);
                Err(As7341Error::DeviceNotFound)
            }
        }
    }

    /// Sets the integration time registers.
    ///
    /// Values are not range checked; the effective exposure is
    /// (ATIME + 1) x (ASTEP + 1) x 2.78 µs.
    pub fn set_timing(&mut self, atime: u8, astep: u16) -> Result<(), As7341Error<E>> {
        let [astep_l, astep_h] = astep.to_le_bytes();
        write_register(&mut self.i2c, REG_ATIME, atime).map_err(As7341Error::Bus)?;
        write_register(&mut self.i2c, REG_ASTEP_L, astep_l).map_err(As7341Error::Bus)?;
        write_register(&mut self.i2c, REG_ASTEP_H, astep_h).map_err(As7341Error::Bus)?;
        self.config.atime = atime;
        self.config.astep = astep;
        Ok(())
    }

    /// Sets the analog gain from its register code (0 = 0.5x ... 10 = 512x)
    pub fn set_gain(&mut self, code: u8) -> Result<(), As7341Error<E>> {
        let gain = Gain::from_code(code).ok_or(As7341Error::InvalidParameter)?;
        write_register(&mut self.i2c, REG_AGAIN, gain.code()).map_err(As7341Error::Bus)?;
        self.config.gain = gain;
        Ok(())
    }

    /// Routes channels to ADC slots for subsequent measurements
    pub fn set_channel_assignment(
        &mut self,
        assignment: ChannelAssignment<'_>,
    ) -> Result<(), As7341Error<E>> {
        self.table = build_table(assignment).map_err(|e| {
            log::error!("Rejected channel assignment: {}", e);
            As7341Error::InvalidParameter
        })?;
        Ok(())
    }

    pub fn set_poll_budget(&mut self, poll: PollBudget) {
        self.poll = poll;
    }

    pub fn config(&self) -> DeviceConfig {
        self.config
    }

    pub fn gain(&self) -> Gain {
        self.config.gain
    }

    pub fn state(&self) -> MeasurementState {
        self.state
    }

    /// Warning raised by the most recent measurement, if any
    pub fn last_warning(&self) -> Option<Warning> {
        self.last_warning
    }

    /// Runs one full measurement and returns the raw channel counts.
    ///
    /// The spectral engine is switched off again afterwards whatever the
    /// outcome. A timeout is reported as [`As7341Error::MeasurementTimeout`],
    /// never as a zero reading.
    pub fn read_channels(&mut self) -> Result<ChannelReading, As7341Error<E>> {
        self.last_warning = None;
        let result = self.measure();

        let idle = modify_register(&mut self.i2c, REG_ENABLE, ENABLE_SP_EN, false);
        self.transition(MeasurementState::Idle);

        let reading = result?;
        idle.map_err(As7341Error::Bus)?;
        Ok(reading)
    }

    /// Averages `count` consecutive measurements channel by channel
    pub fn read_averaged(&mut self, count: u8) -> Result<ChannelReading, As7341Error<E>> {
        if count == 0 {
            return Err(As7341Error::InvalidParameter);
        }

        let mut sums = [0u32; 10];
        let mut warning = None;
        for i in 0..count {
            log::debug!("Burst measurement {}/{}", i + 1, count);
            let reading = self.read_channels()?;
            warning = warning.or(self.last_warning);
            for (sum, value) in sums.iter_mut().zip(reading.counts()) {
                *sum += value as u32;
            }
        }
        self.last_warning = warning;

        Ok(ChannelReading::from_counts(
            sums.map(|sum| (sum / count as u32) as u16),
        ))
    }

    fn measure(&mut self) -> Result<ChannelReading, As7341Error<E>> {
        modify_register(&mut self.i2c, REG_ENABLE, ENABLE_PON, true).map_err(As7341Error::Bus)?;
        self.transition(MeasurementState::PoweredOn);

        if smux::apply(&mut self.i2c, &mut self.delay, &self.table)? == SmuxStatus::NotConfirmed {
            log::warn!("SMUX configuration not confirmed valid, continuing");
            self.last_warning = Some(Warning::SmuxApplyNotConfirmed);
        }
        self.transition(MeasurementState::SmuxConfigured);

        modify_register(&mut self.i2c, REG_ENABLE, ENABLE_SP_EN, true)
            .map_err(As7341Error::Bus)?;
        self.transition(MeasurementState::Measuring);

        self.wait_for_data()?;
        self.transition(MeasurementState::DataReady);

        self.harvest()
    }

    /// Polls STATUS until data is valid or the budget runs out
    fn wait_for_data(&mut self) -> Result<(), As7341Error<E>> {
        let mut status = 0;
        for attempt in 0..self.poll.attempts {
            status = read_register(&mut self.i2c, REG_STATUS).map_err(As7341Error::Bus)?;
            if status & STATUS_AVALID != 0 {
                log::debug!("Data ready after {} polls", attempt + 1);
                return Ok(());
            }
            if attempt + 1 < self.poll.attempts {
                self.delay.delay_ms(self.poll.interval_ms);
            }
        }
        self.transition(MeasurementState::TimedOut);
        log::error!(
            "Timed out waiting for data after {} polls, STATUS=0x{:02X}",
            self.poll.attempts,
            status
        );
        Err(As7341Error::MeasurementTimeout)
    }

    fn harvest(&mut self) -> Result<ChannelReading, As7341Error<E>> {
        let mut reading = ChannelReading::default();
        for (slot, &channel) in self.table.slots().iter().enumerate() {
            let reg = REG_DATA0 + 2 * slot as u8;
            let value = read_u16_le(&mut self.i2c, reg).map_err(As7341Error::Bus)?;
            reading.set(channel, value);
        }
        Ok(reading)
    }

    fn transition(&mut self, next: MeasurementState) {
        log::trace!("{:?} -> {:?}", self.state, next);
        self.state = next;
    }

    /// Reads back the configuration and status registers
    pub fn diagnostics(&mut self) -> Result<Diagnostics, As7341Error<E>> {
        let registers = [
            (REG_ENABLE, "ENABLE"),
            (REG_ID, "ID"),
            (REG_STATUS, "STATUS"),
            (REG_AGAIN, "AGAIN"),
            (REG_ATIME, "ATIME"),
            (REG_ASTEP_L, "ASTEP_L"),
            (REG_ASTEP_H, "ASTEP_H"),
            (REG_SMUX_STATUS, "SMUX_STATUS"),
        ];

        let mut values = [0u8; 8];
        for ((reg, name), value) in registers.iter().zip(values.iter_mut()) {
            *value = read_register(&mut self.i2c, *reg).map_err(As7341Error::Bus)?;
            log::debug!("Register {}: 0x{:02X}", name, *value);
        }

        let [enable, device_id, status, again, atime, astep_l, astep_h, smux_status] = values;
        Ok(Diagnostics {
            enable,
            device_id,
            status,
            again,
            atime,
            astep: u16::from_le_bytes([astep_l, astep_h]),
            smux_status,
        })
    }

    /// Destroys the driver and returns the bus and delay
    pub fn release(self) -> (I2C, DELAY) {
        (self.i2c, self.delay)
    }
}
