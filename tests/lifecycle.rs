mod common;

use as7341::constants::*;
use as7341::{As7341, As7341Error, DeviceConfig, Gain};
use common::{FakeAs7341, RecordingDelay};

#[test]
fn missing_device_is_not_found() {
    let mut fake = FakeAs7341::new();
    fake.present = false;
    let mut sensor = As7341::new(fake, RecordingDelay::default());

    assert_eq!(sensor.initialize(), Err(As7341Error::DeviceNotFound));

    let (fake, _) = sensor.release();
    assert!(fake.writes.is_empty());
}

#[test]
fn initialize_power_cycles_with_settle_delays() {
    let mut fake = FakeAs7341::new();
    fake.regs[REG_ENABLE as usize] = ENABLE_PON | ENABLE_SP_EN | ENABLE_FDEN;
    let mut sensor = As7341::new(fake, RecordingDelay::default());

    sensor.initialize().unwrap();

    let (fake, delay) = sensor.release();
    assert_eq!(&fake.enable_writes[..], &[0x00, ENABLE_PON]);
    assert_eq!(fake.enable(), ENABLE_PON);
    assert_eq!(delay.total_ms(), 2 * RESET_DELAY_MS as u64);
}

#[test]
fn initialize_is_idempotent() {
    let config = DeviceConfig {
        atime: 0x64,
        astep: 999,
        gain: Gain::X256,
    };
    let mut sensor = As7341::with_config(FakeAs7341::new(), RecordingDelay::default(), config);

    sensor.initialize().unwrap();
    sensor.initialize().unwrap();
    assert_eq!(sensor.config(), config);

    let (fake, _) = sensor.release();
    assert_eq!(fake.regs[REG_ATIME as usize], 0x64);
    assert_eq!(fake.regs[REG_ASTEP_L as usize], 0xE7);
    assert_eq!(fake.regs[REG_ASTEP_H as usize], 0x03);
    assert_eq!(fake.regs[REG_AGAIN as usize], Gain::X256.code());
    assert_eq!(fake.regs[REG_CFG0 as usize], 0x00);
    assert_eq!(fake.enable(), ENABLE_PON);
}

#[test]
fn initialize_reapplies_gain_set_earlier() {
    let mut sensor = As7341::new(FakeAs7341::new(), RecordingDelay::default());

    sensor.set_gain(10).unwrap();
    sensor.initialize().unwrap();

    assert_eq!(sensor.gain(), Gain::X512);
    let (fake, _) = sensor.release();
    assert_eq!(fake.regs[REG_AGAIN as usize], 10);
}

#[test]
fn rejected_gain_leaves_bus_untouched() {
    let mut sensor = As7341::new(FakeAs7341::new(), RecordingDelay::default());

    assert_eq!(sensor.set_gain(11), Err(As7341Error::InvalidParameter));

    let (fake, _) = sensor.release();
    assert!(fake.writes.is_empty());
}

#[test]
fn diagnostics_read_back_configuration() {
    let mut sensor = As7341::new(FakeAs7341::new(), RecordingDelay::default());
    sensor.initialize().unwrap();
    sensor.set_timing(0x20, 0x0203).unwrap();

    let diagnostics = sensor.diagnostics().unwrap();
    assert!(diagnostics.powered_on());
    assert!(!diagnostics.data_valid());
    assert_eq!(diagnostics.atime, 0x20);
    assert_eq!(diagnostics.astep, 0x0203);
    assert_eq!(diagnostics.again, Gain::X4.code());
}
