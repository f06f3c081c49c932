use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum As7341Error<BusError> {
    /// Nothing answered at the sensor's address
    DeviceNotFound,
    Bus(BusError),
    InvalidParameter,
    /// The data-valid bit never asserted within the poll budget
    MeasurementTimeout,
}

impl<BusError: fmt::Debug> fmt::Display for As7341Error<BusError> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            As7341Error::DeviceNotFound => write!(f, "AS7341 not found on the I2C bus"),
            As7341Error::Bus(e) => write!(f, "I2C bus error: {:?}", e),
            As7341Error::InvalidParameter => write!(f, "invalid parameter"),
            As7341Error::MeasurementTimeout => write!(f, "timed out waiting for spectral data"),
        }
    }
}

#[cfg(feature = "std")]
impl<BusError: fmt::Debug> std::error::Error for As7341Error<BusError> {}

/// Non-fatal conditions raised during a measurement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Warning {
    /// SMUX-valid bit did not assert after the apply pulse
    SmuxApplyNotConfirmed,
}
