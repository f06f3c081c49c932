#![allow(dead_code)]

use std::collections::VecDeque;

use as7341::constants::*;
use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::{ErrorKind, ErrorType, I2c, NoAcknowledgeSource, Operation};

/// Register-level stand-in for an AS7341 on the bus
pub struct FakeAs7341 {
    pub regs: [u8; 256],
    pub present: bool,
    /// Poll (1-based, per measurement) on which AVALID asserts
    pub ready_after: Option<usize>,
    /// Counts loaded when each successive measurement starts
    pub measurements: VecDeque<[u16; 10]>,
    /// Per-measurement override of `ready_after`, consumed in order
    pub readiness: VecDeque<Option<usize>>,
    pub measurements_started: usize,
    pub smux_confirms: bool,
    pub fail_write_to: Option<u8>,
    pub status_polls: usize,
    pub enable_writes: Vec<u8>,
    pub writes: Vec<(u8, u8)>,
    polls_this_measurement: usize,
    pointer: u8,
}

impl FakeAs7341 {
    pub fn new() -> Self {
        Self {
            regs: [0; 256],
            present: true,
            ready_after: Some(1),
            measurements: VecDeque::new(),
            readiness: VecDeque::new(),
            measurements_started: 0,
            smux_confirms: true,
            fail_write_to: None,
            status_polls: 0,
            enable_writes: Vec::new(),
            writes: Vec::new(),
            polls_this_measurement: 0,
            pointer: 0,
        }
    }

    pub fn never_ready() -> Self {
        Self {
            ready_after: None,
            ..Self::new()
        }
    }

    /// Loads data registers, slot 0 first
    pub fn set_counts(&mut self, counts: [u16; 10]) {
        for (slot, count) in counts.iter().enumerate() {
            let [low, high] = count.to_le_bytes();
            let reg = REG_DATA0 as usize + 2 * slot;
            self.regs[reg] = low;
            self.regs[reg + 1] = high;
        }
    }

    pub fn enable(&self) -> u8 {
        self.regs[REG_ENABLE as usize]
    }

    fn store(&mut self, reg: u8, value: u8) -> Result<(), ErrorKind> {
        if self.fail_write_to == Some(reg) {
            return Err(ErrorKind::Other);
        }
        self.writes.push((reg, value));

        if reg == REG_ENABLE {
            self.enable_writes.push(value);
            let was_running = self.enable() & ENABLE_SP_EN != 0;
            if value & ENABLE_SP_EN != 0 && !was_running {
                self.start_measurement();
            }
            let mut latched = value;
            if value & ENABLE_SMUXEN != 0 {
                self.regs[REG_SMUX_STATUS as usize] = if self.smux_confirms {
                    SMUX_STATUS_VALID
                } else {
                    0
                };
                latched &= !ENABLE_SMUXEN;
            }
            self.regs[REG_ENABLE as usize] = latched;
        } else {
            self.regs[reg as usize] = value;
        }
        Ok(())
    }

    fn start_measurement(&mut self) {
        self.measurements_started += 1;
        self.polls_this_measurement = 0;
        if let Some(counts) = self.measurements.pop_front() {
            self.set_counts(counts);
        }
        if let Some(ready_after) = self.readiness.pop_front() {
            self.ready_after = ready_after;
        }
    }

    fn load(&mut self, reg: u8) -> u8 {
        if reg == REG_STATUS {
            self.status_polls += 1;
            self.polls_this_measurement += 1;
            let running = self.enable() & ENABLE_SP_EN != 0;
            let ready = matches!(self.ready_after, Some(n) if self.polls_this_measurement >= n);
            if running && ready {
                return self.regs[reg as usize] | STATUS_AVALID;
            }
            return self.regs[reg as usize] & !STATUS_AVALID;
        }
        self.regs[reg as usize]
    }
}

impl ErrorType for FakeAs7341 {
    type Error = ErrorKind;
}

impl I2c for FakeAs7341 {
    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        if address != I2C_ADDRESS || !self.present {
            return Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address));
        }

        for operation in operations.iter_mut() {
            match operation {
                Operation::Write(bytes) => {
                    let Some((&reg, data)) = bytes.split_first() else {
                        continue;
                    };
                    self.pointer = reg;
                    for &value in data {
                        self.store(self.pointer, value)?;
                        self.pointer = self.pointer.wrapping_add(1);
                    }
                }
                Operation::Read(buffer) => {
                    for byte in buffer.iter_mut() {
                        *byte = self.load(self.pointer);
                        self.pointer = self.pointer.wrapping_add(1);
                    }
                }
            }
        }
        Ok(())
    }
}

/// Delay that only adds up how long it was asked to wait
#[derive(Default)]
pub struct RecordingDelay {
    pub total_ns: u64,
}

impl RecordingDelay {
    pub fn total_ms(&self) -> u64 {
        self.total_ns / 1_000_000
    }
}

impl DelayNs for RecordingDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.total_ns += ns as u64;
    }
}
