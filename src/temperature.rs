//! Temperature sensor access.
//!
//! The DS3231 measures its own die temperature to steer the oscillator
//! compensation, and exposes the result as a 10-bit two's-complement
//! value split across two registers, in units of 0.25 degrees Celsius.

use embedded_hal::i2c::I2c;

cfg_if::cfg_if! {
    if #[cfg(feature = "defmt")] {
        use defmt::debug;
    } else if #[cfg(feature = "log")] {
        use log::debug;
    }
}

use crate::registers::RegAddr;
use crate::{Ds3231, Error};

/// Assembles a temperature in degrees Celsius from the two temperature
/// registers.
///
/// The MSB register holds the sign and integer part; the top two bits of
/// the LSB register hold the quarter-degree fraction. Negative values are
/// two's complement across the combined 10 bits.
pub fn decode_temperature(msb: u8, lsb: u8) -> f32 {
    let raw = (u16::from(msb) << 2) | u16::from(lsb >> 6);
    if msb & 0x80 != 0 {
        -(f32::from((!raw & 0x3FF) + 1) * 0.25)
    } else {
        f32::from(raw) * 0.25
    }
}

impl<I2C: I2c> Ds3231<I2C> {
    /// Forces a temperature conversion and returns the result in degrees
    /// Celsius.
    ///
    /// Sets the convert bit, then polls the status register until the busy
    /// flag drops. The poll has no timeout, so a device that never clears
    /// the flag blocks the caller. The decoded value lands in the shadow
    /// as the last-read temperature.
    pub fn read_temperature(&mut self) -> Result<f32, Error<I2C::Error>> {
        let mut control = self.control()?;
        control.set_convert_temperature(true);
        self.set_control(control)?;
        while self.status()?.busy() {}
        let msb = self.read_register(RegAddr::TempMsb)?;
        let lsb = self.read_register(RegAddr::TempLsb)?;
        let temperature = decode_temperature(msb, lsb);
        self.shadow.temperature = temperature;
        #[cfg(any(feature = "log", feature = "defmt"))]
        debug!("DS3231: temperature {}", temperature);
        Ok(temperature)
    }

    /// Returns the last temperature read from the device without touching
    /// the bus. Zero until [`Ds3231::read_temperature`] has run.
    pub fn temperature_cached(&self) -> f32 {
        self.shadow.temperature
    }
}
