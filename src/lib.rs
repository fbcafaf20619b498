#![no_std]
//! Platform-agnostic driver for the DS3231 precision real-time clock.
//!
//! The driver talks to the chip one register at a time over `embedded-hal`
//! I2C and keeps a shadow copy of every value it writes or reads, so hosts
//! can render the last known time without touching the bus. Alarms, the
//! square-wave and 32kHz outputs, and the temperature sensor are exposed
//! alongside the clock and calendar fields.
//!
//! # Example
//!
//! ```rust,ignore
//! use ds3231_shadow::{Ds3231, RegisterTarget, DEFAULT_ADDRESS};
//!
//! let mut rtc = Ds3231::new(i2c, DEFAULT_ADDRESS);
//! rtc.initialize()?;
//!
//! // Set the running clock
//! rtc.set_time_and_date(15, 30, 0, 14, 3, 2024)?;
//!
//! // Render the current time and date
//! let snapshot = rtc.time_and_date()?;
//! println!("{}", snapshot);
//! ```

use core::fmt;

use embedded_hal::i2c::I2c;
use paste::paste;

cfg_if::cfg_if! {
    if #[cfg(feature = "defmt")] {
        use defmt::{debug, error};
    } else if #[cfg(feature = "log")] {
        use log::{debug, error};
    }
}

mod alarm;
mod bcd;
mod clock;
mod indicator;
pub mod registers;
mod temperature;

pub use crate::alarm::{AlarmConfig, AlarmId, AlarmMatch};
pub use crate::clock::{Meridiem, TimeAndDate};
pub use crate::indicator::AlarmIndicator;
pub use crate::registers::{
    AgingOffset, Control, DayDateSelect, Field, HourMode, Hours, InterruptControl, Oscillator,
    RegAddr, RegisterTarget, SquareWaveFrequency, Status,
};
pub use crate::temperature::decode_temperature;

use crate::clock::ShadowState;
use crate::registers::{POWER_ON_DEFAULTS, REGISTER_COUNT};

/// Factory-fixed I2C bus address of the DS3231.
pub const DEFAULT_ADDRESS: u8 = 0x68;

/// Errors returned by the driver.
#[derive(Debug, PartialEq)]
pub enum Error<E> {
    /// The underlying bus transfer failed
    I2c(E),
    /// Value outside the valid range for the field
    Range(Field),
    /// The field has no physical register for the requested target
    InvalidTarget(Field, RegisterTarget),
    /// The match mode is not supported by the selected alarm
    InvalidMatchMode(AlarmMatch),
    /// The shadowed month is not a calendar month, so the days-in-month
    /// table cannot be consulted
    UnknownMonth(u8),
    /// Value has no packed BCD encoding
    Bcd(u8),
    /// Register contents do not form a representable date and time
    InvalidDateTime,
    /// Number of register writes that failed during initialization
    Init(usize),
}

impl<E> From<E> for Error<E> {
    fn from(e: E) -> Self {
        Error::I2c(e)
    }
}

/// DS3231 Real-Time Clock driver with shadowed registers.
///
/// Every write goes through a read-modify-write of the single affected
/// register followed by a readback into the shadow, and every getter
/// refreshes its shadow field, so the shadow tracks the device as closely
/// as the transaction log allows.
pub struct Ds3231<I2C: I2c> {
    pub(crate) i2c: I2C,
    pub(crate) address: u8,
    pub(crate) shadow: ShadowState,
    pub(crate) alarm1: AlarmConfig,
    pub(crate) alarm2: AlarmConfig,
}

impl<I2C: I2c> Ds3231<I2C> {
    /// Creates a new driver instance. Performs no bus traffic.
    ///
    /// # Arguments
    /// * `i2c` - The I2C bus implementation
    /// * `address` - The I2C address of the device (typically [`DEFAULT_ADDRESS`])
    pub fn new(i2c: I2C, address: u8) -> Self {
        Self {
            i2c,
            address,
            shadow: ShadowState::default(),
            alarm1: AlarmConfig::default(),
            alarm2: AlarmConfig::default(),
        }
    }

    /// Brings the device to its power-on state.
    ///
    /// Writes every writable register with its default value, carrying on
    /// past individual failures, then refreshes the shadow from the device.
    ///
    /// # Returns
    /// * `Ok(())` on success
    /// * `Err(Error::Init(n))` when `n` register writes failed
    pub fn initialize(&mut self) -> Result<(), Error<I2C::Error>> {
        #[cfg(any(feature = "log", feature = "defmt"))]
        debug!("DS3231: writing power-on defaults");
        let mut failed = 0;
        for (reg, value) in POWER_ON_DEFAULTS {
            if self.write_register(reg, value).is_err() {
                failed += 1;
            }
        }
        if failed > 0 {
            #[cfg(any(feature = "log", feature = "defmt"))]
            error!("DS3231: {} register writes failed during initialization", failed);
            return Err(Error::Init(failed));
        }
        self.alarm1 = AlarmConfig::default();
        self.alarm2 = AlarmConfig::default();
        self.refresh_shadow()
    }

    /// Releases the underlying I2C bus.
    pub fn release(self) -> I2C {
        self.i2c
    }

    pub(crate) fn read_register(&mut self, reg: RegAddr) -> Result<u8, Error<I2C::Error>> {
        self.read_register_raw(reg as u8)
    }

    pub(crate) fn read_register_raw(&mut self, reg: u8) -> Result<u8, Error<I2C::Error>> {
        let mut data = [0];
        self.i2c.write_read(self.address, &[reg], &mut data)?;
        Ok(data[0])
    }

    pub(crate) fn write_register(&mut self, reg: RegAddr, value: u8) -> Result<(), Error<I2C::Error>> {
        self.i2c.write(self.address, &[reg as u8, value])?;
        Ok(())
    }

    /// Reads the first `count` registers (all of them when `None`), one
    /// register per bus transaction.
    pub fn dump_registers(
        &mut self,
        count: Option<usize>,
    ) -> Result<RegisterDump, Error<I2C::Error>> {
        let count = count.unwrap_or(REGISTER_COUNT).min(REGISTER_COUNT);
        let mut dump = RegisterDump {
            registers: [0; REGISTER_COUNT],
            count,
        };
        for reg in 0..count {
            dump.registers[reg] = self.read_register_raw(reg as u8)?;
        }
        Ok(dump)
    }

    /// Routes the INT/SQW pin to the square-wave output at the given
    /// frequency, keeping the output alive on battery power.
    pub fn start_square_wave(
        &mut self,
        frequency: SquareWaveFrequency,
    ) -> Result<(), Error<I2C::Error>> {
        let mut control = self.control()?;
        control.set_battery_backed_square_wave(true);
        control.set_square_wave_frequency(frequency);
        control.set_interrupt_control(InterruptControl::SquareWave);
        self.set_control(control)
    }

    /// Stops the square-wave output.
    ///
    /// Clears only the square-wave enable bit; the frequency select and
    /// interrupt-control bits keep their values.
    pub fn stop_square_wave(&mut self) -> Result<(), Error<I2C::Error>> {
        let mut control = self.control()?;
        control.set_battery_backed_square_wave(false);
        self.set_control(control)
    }

    /// Enables the 32kHz output pin.
    pub fn start_32khz(&mut self) -> Result<(), Error<I2C::Error>> {
        let mut status = self.status()?;
        status.set_enable_32khz_output(true);
        self.set_status(status)
    }

    /// Disables the 32kHz output pin.
    pub fn stop_32khz(&mut self) -> Result<(), Error<I2C::Error>> {
        let mut status = self.status()?;
        status.set_enable_32khz_output(false);
        self.set_status(status)
    }
}

// Raw register access implementations
macro_rules! impl_register_access {
    ($(($name:ident, $regaddr:expr, $typ:ident)),+) => {
        impl<I2C: I2c> Ds3231<I2C> {
            $(
                paste! {
                    #[doc = concat!("Gets the value of the ", stringify!($name), " register.")]
                    #[doc = "\n\n# Returns"]
                    #[doc = concat!("* `Ok(", stringify!($typ), ")` - The register value on success")]
                    #[doc = "* `Err(Error)` on error"]
                    pub fn $name(&mut self) -> Result<$typ, Error<I2C::Error>> {
                        Ok($typ(self.read_register($regaddr)?))
                    }

                    #[doc = concat!("Sets the value of the ", stringify!($name), " register.")]
                    #[doc = "\n\n# Arguments"]
                    #[doc = concat!("* `value` - The value to write to the ", stringify!($name), " register")]
                    #[doc = "\n\n# Returns"]
                    #[doc = "* `Ok(())` on success"]
                    #[doc = "* `Err(Error)` on error"]
                    pub fn [<set_ $name>](&mut self, value: $typ) -> Result<(), Error<I2C::Error>> {
                        self.write_register($regaddr, value.into())
                    }
                }
            )+
        }
    }
}

impl_register_access!(
    (control, RegAddr::Control, Control),
    (status, RegAddr::ControlStatus, Status),
    (aging_offset, RegAddr::AgingOffset, AgingOffset)
);

/// A point-in-time copy of the register file, produced by
/// [`Ds3231::dump_registers`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RegisterDump {
    registers: [u8; REGISTER_COUNT],
    count: usize,
}

impl RegisterDump {
    /// The captured register values, in address order.
    pub fn registers(&self) -> &[u8] {
        &self.registers[..self.count]
    }
}

impl fmt::Display for RegisterDump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (addr, value) in self.registers().iter().enumerate() {
            writeln!(f, "0x{:02X}: 0x{:02X}", addr, value)?;
        }
        Ok(())
    }
}
