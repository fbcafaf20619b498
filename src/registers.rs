//! Register map and bitfield structures for the DS3231 RTC.
//!
//! The chip exposes nineteen byte-wide registers at addresses
//! `0x00..=0x12`. Registers with several independent sub-fields (hours,
//! control, status, aging offset) get a [`bitfield`] wrapper; plain BCD
//! value registers are handled with the mask constants below and the
//! [`crate::bcd`] codec.

use bitfield::bitfield;

/// Number of addressable registers (`0x00..=0x12`).
pub const REGISTER_COUNT: usize = 0x13;

/// Register addresses for the DS3231 RTC.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RegAddr {
    /// Seconds register (0-59)
    Seconds = 0x00,
    /// Minutes register (0-59)
    Minutes = 0x01,
    /// Hours register (1-12 + AM/PM or 0-23)
    Hours = 0x02,
    /// Day of week register (1-7)
    Day = 0x03,
    /// Date register (1-31)
    Date = 0x04,
    /// Month register (1-12) sharing the century bit
    MonthCentury = 0x05,
    /// Year register (0-99)
    Year = 0x06,
    /// Alarm 1 seconds register
    Alarm1Seconds = 0x07,
    /// Alarm 1 minutes register
    Alarm1Minutes = 0x08,
    /// Alarm 1 hours register
    Alarm1Hours = 0x09,
    /// Alarm 1 day/date register
    Alarm1DayDate = 0x0A,
    /// Alarm 2 minutes register
    Alarm2Minutes = 0x0B,
    /// Alarm 2 hours register
    Alarm2Hours = 0x0C,
    /// Alarm 2 day/date register
    Alarm2DayDate = 0x0D,
    /// Control register
    Control = 0x0E,
    /// Control/Status register
    ControlStatus = 0x0F,
    /// Aging offset register
    AgingOffset = 0x10,
    /// Temperature MSB register
    TempMsb = 0x11,
    /// Temperature LSB register
    TempLsb = 0x12,
}

/// Value bits of a seconds register.
pub const SECONDS_MASK: u8 = 0x7F;
/// Value bits of a minutes register.
pub const MINUTES_MASK: u8 = 0x7F;
/// Value bits of the day-of-week register.
pub const DAY_MASK: u8 = 0x07;
/// Value bits of a date register.
pub const DATE_MASK: u8 = 0x3F;
/// Value bits of the month register.
pub const MONTH_MASK: u8 = 0x1F;
/// Century flag, co-located with the month value.
pub const CENTURY_BIT: u8 = 0x80;
/// Alarm match gate in the MSB of every alarm register.
pub const ALARM_MASK_BIT: u8 = 0x80;
/// Day/date interpretation select (DY/DT) in the alarm day/date registers.
pub const DAY_DATE_SELECT_BIT: u8 = 0x40;

/// A time or date component addressable through [`field_register`].
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Field {
    /// Seconds (0-59)
    Seconds,
    /// Minutes (0-59)
    Minutes,
    /// Hours (0-23, layout depends on the hour mode)
    Hours,
    /// Day of week (1-7, where 1=Monday)
    Day,
    /// Date of month (1-31)
    Date,
    /// Month (1-12)
    Month,
    /// Year (2000-2099)
    Year,
}

/// Register bank a field accessor operates on.
///
/// The clock and both alarms share one setter implementation per field;
/// this tag selects the physical register that implementation writes.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RegisterTarget {
    /// The running clock/calendar registers
    Rtc,
    /// Alarm 1 registers
    Alarm1,
    /// Alarm 2 registers
    Alarm2,
}

/// Resolves a field/target pair to its register address.
///
/// Returns `None` where the chip has no register for the combination:
/// alarm 2 has no seconds register, and month/year exist only on the clock.
pub fn field_register(field: Field, target: RegisterTarget) -> Option<RegAddr> {
    use RegisterTarget::{Alarm1, Alarm2, Rtc};
    match (field, target) {
        (Field::Seconds, Rtc) => Some(RegAddr::Seconds),
        (Field::Seconds, Alarm1) => Some(RegAddr::Alarm1Seconds),
        (Field::Seconds, Alarm2) => None,
        (Field::Minutes, Rtc) => Some(RegAddr::Minutes),
        (Field::Minutes, Alarm1) => Some(RegAddr::Alarm1Minutes),
        (Field::Minutes, Alarm2) => Some(RegAddr::Alarm2Minutes),
        (Field::Hours, Rtc) => Some(RegAddr::Hours),
        (Field::Hours, Alarm1) => Some(RegAddr::Alarm1Hours),
        (Field::Hours, Alarm2) => Some(RegAddr::Alarm2Hours),
        (Field::Day, Rtc) => Some(RegAddr::Day),
        (Field::Date, Rtc) => Some(RegAddr::Date),
        (Field::Day | Field::Date, Alarm1) => Some(RegAddr::Alarm1DayDate),
        (Field::Day | Field::Date, Alarm2) => Some(RegAddr::Alarm2DayDate),
        (Field::Month, Rtc) => Some(RegAddr::MonthCentury),
        (Field::Year, Rtc) => Some(RegAddr::Year),
        (Field::Month | Field::Year, Alarm1 | Alarm2) => None,
    }
}

/// Hour representation format.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HourMode {
    /// 24-hour format (0-23)
    TwentyFourHour = 0,
    /// 12-hour format (1-12 + AM/PM)
    TwelveHour = 1,
}
impl From<u8> for HourMode {
    /// Creates an `HourMode` from a raw register value.
    ///
    /// # Panics
    /// Panics if the value is not 0 or 1.
    fn from(v: u8) -> Self {
        match v {
            0 => HourMode::TwentyFourHour,
            1 => HourMode::TwelveHour,
            _ => panic!("Invalid value for HourMode: {}", v),
        }
    }
}
impl From<HourMode> for u8 {
    /// Converts an `HourMode` to its raw register value.
    fn from(v: HourMode) -> Self {
        v as u8
    }
}

/// Oscillator control for the DS3231.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Oscillator {
    /// Oscillator is enabled
    Enabled = 0,
    /// Oscillator is disabled
    Disabled = 1,
}
impl From<u8> for Oscillator {
    /// Creates an `Oscillator` from a raw register value.
    ///
    /// # Panics
    /// Panics if the value is not 0 or 1.
    fn from(v: u8) -> Self {
        match v {
            0 => Oscillator::Enabled,
            1 => Oscillator::Disabled,
            _ => panic!("Invalid value for Oscillator: {}", v),
        }
    }
}
impl From<Oscillator> for u8 {
    /// Converts an `Oscillator` to its raw register value.
    fn from(v: Oscillator) -> Self {
        v as u8
    }
}

/// Interrupt control mode for the DS3231.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InterruptControl {
    /// Output square wave on INT/SQW pin
    SquareWave = 0,
    /// Output interrupt signal on INT/SQW pin
    Interrupt = 1,
}
impl From<u8> for InterruptControl {
    /// Creates an `InterruptControl` from a raw register value.
    ///
    /// # Panics
    /// Panics if the value is not 0 or 1.
    fn from(v: u8) -> Self {
        match v {
            0 => InterruptControl::SquareWave,
            1 => InterruptControl::Interrupt,
            _ => panic!("Invalid value for InterruptControl: {}", v),
        }
    }
}
impl From<InterruptControl> for u8 {
    /// Converts an `InterruptControl` to its raw register value.
    fn from(v: InterruptControl) -> Self {
        v as u8
    }
}

/// Square wave output frequency options.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SquareWaveFrequency {
    /// 1 Hz square wave output
    Hz1 = 0b00,
    /// 1.024 kHz square wave output
    Hz1024 = 0b01,
    /// 4.096 kHz square wave output
    Hz4096 = 0b10,
    /// 8.192 kHz square wave output
    Hz8192 = 0b11,
}
impl From<u8> for SquareWaveFrequency {
    /// Creates a `SquareWaveFrequency` from a raw register value.
    ///
    /// # Panics
    /// Panics if the value is not 0b00, 0b01, 0b10, or 0b11.
    fn from(v: u8) -> Self {
        match v {
            0b00 => SquareWaveFrequency::Hz1,
            0b01 => SquareWaveFrequency::Hz1024,
            0b10 => SquareWaveFrequency::Hz4096,
            0b11 => SquareWaveFrequency::Hz8192,
            _ => panic!("Invalid value for SquareWaveFrequency: {}", v),
        }
    }
}
impl From<SquareWaveFrequency> for u8 {
    /// Converts a `SquareWaveFrequency` to its raw register value.
    fn from(v: SquareWaveFrequency) -> Self {
        v as u8
    }
}

/// Day/Date select for alarm registers (DY/DT bit).
///
/// This controls whether the alarm day/date register matches against
/// the day of the week or the date of the month.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DayDateSelect {
    /// Match against date of the month (1-31)
    Date = 0,
    /// Match against day of the week (1-7, where 1=Monday)
    Day = 1,
}

impl From<u8> for DayDateSelect {
    /// Creates a `DayDateSelect` from a raw register value.
    ///
    /// # Panics
    /// Panics if the value is not 0 or 1.
    fn from(v: u8) -> Self {
        match v {
            0 => DayDateSelect::Date,
            1 => DayDateSelect::Day,
            _ => panic!("Invalid value for DayDateSelect: {}", v),
        }
    }
}

impl From<DayDateSelect> for u8 {
    /// Converts a `DayDateSelect` to its raw register value.
    fn from(v: DayDateSelect) -> Self {
        v as u8
    }
}

// This macro generates the From<u8> and Into<u8> implementations for the
// register type
macro_rules! from_register_u8 {
    ($typ:ty) => {
        impl From<u8> for $typ {
            fn from(v: u8) -> Self {
                paste::paste!([< $typ >](v))
            }
        }
        impl From<$typ> for u8 {
            fn from(v: $typ) -> Self {
                v.0
            }
        }
    };
}

bitfield! {
    /// Hours register layout, shared by the clock and both alarm banks.
    ///
    /// Bit 6 selects the interpretation of the low bits: in 24-hour mode
    /// bit 5 is the twenty-hours digit, in 12-hour mode it is the PM flag.
    /// Bit 7 is the alarm match gate and reads zero on the clock register.
    #[derive(Clone, Copy, Default, PartialEq)]
    pub struct Hours(u8);
    impl Debug;
    /// Alarm match gate (A1M3/A2M3); unused on the clock register
    pub match_gate, set_match_gate: 7;
    /// Hour representation format (12/24 hour)
    pub from into HourMode, mode, set_mode: 6, 6;
    /// PM flag (12-hour) or 20-hour bit (24-hour)
    pub pm_or_twenty_hours, set_pm_or_twenty_hours: 5, 5;
    /// Tens place of hours
    pub ten_hours, set_ten_hours: 4, 4;
    /// Ones place of hours
    pub hours, set_hours: 3, 0;
}
from_register_u8!(Hours);

#[cfg(feature = "defmt")]
impl defmt::Format for Hours {
    fn format(&self, f: defmt::Formatter) {
        let hours = 10 * self.ten_hours() + self.hours();
        match self.mode() {
            HourMode::TwentyFourHour => {
                let hours = hours + 20 * self.pm_or_twenty_hours();
                defmt::write!(f, "Hours({}h 24h)", hours);
            }
            HourMode::TwelveHour => {
                let is_pm = self.pm_or_twenty_hours() != 0;
                defmt::write!(f, "Hours({}h {})", hours, if is_pm { "PM" } else { "AM" });
            }
        }
    }
}

bitfield! {
    /// Control register (0x0E).
    #[derive(Clone, Copy, Default, PartialEq)]
    pub struct Control(u8);
    impl Debug;
    /// Oscillator enable (active low)
    pub from into Oscillator, oscillator_enable, set_oscillator_enable: 7, 7;
    /// Square-wave output enable, kept while battery powered
    pub battery_backed_square_wave, set_battery_backed_square_wave: 6;
    /// Starts a temperature conversion; cleared by the chip when done
    pub convert_temperature, set_convert_temperature: 5;
    /// Square-wave output frequency select
    pub from into SquareWaveFrequency, square_wave_frequency, set_square_wave_frequency: 4, 3;
    /// INT/SQW pin routing
    pub from into InterruptControl, interrupt_control, set_interrupt_control: 2, 2;
    /// Alarm 2 interrupt enable
    pub alarm2_interrupt_enable, set_alarm2_interrupt_enable: 1;
    /// Alarm 1 interrupt enable
    pub alarm1_interrupt_enable, set_alarm1_interrupt_enable: 0;
}
from_register_u8!(Control);

#[cfg(feature = "defmt")]
impl defmt::Format for Control {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "Control {{ eosc: {}, bbsqw: {}, conv: {}, freq: {}, intcn: {}, a2ie: {}, a1ie: {} }}",
            self.oscillator_enable(),
            self.battery_backed_square_wave(),
            self.convert_temperature(),
            self.square_wave_frequency(),
            self.interrupt_control(),
            self.alarm2_interrupt_enable(),
            self.alarm1_interrupt_enable(),
        );
    }
}

bitfield! {
    /// Control/Status register (0x0F).
    #[derive(Clone, Copy, Default, PartialEq)]
    pub struct Status(u8);
    impl Debug;
    /// Oscillator stop flag; set when timekeeping was interrupted
    pub oscillator_stop_flag, set_oscillator_stop_flag: 7;
    /// 32kHz output enable
    pub enable_32khz_output, set_enable_32khz_output: 3;
    /// Set while a temperature conversion is executing
    pub busy, set_busy: 2;
    /// Alarm 2 triggered flag; sticky until cleared
    pub alarm2_flag, set_alarm2_flag: 1;
    /// Alarm 1 triggered flag; sticky until cleared
    pub alarm1_flag, set_alarm1_flag: 0;
}
from_register_u8!(Status);

#[cfg(feature = "defmt")]
impl defmt::Format for Status {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "Status {{ osf: {}, en32khz: {}, busy: {}, a2f: {}, a1f: {} }}",
            self.oscillator_stop_flag(),
            self.enable_32khz_output(),
            self.busy(),
            self.alarm2_flag(),
            self.alarm1_flag(),
        );
    }
}

bitfield! {
    /// Aging offset register (0x10), a signed oscillator trim.
    #[derive(Clone, Copy, Default, PartialEq)]
    pub struct AgingOffset(u8);
    impl Debug;
    /// Offset in datasheet trim steps
    pub i8, aging_offset, set_aging_offset: 7, 0;
}
from_register_u8!(AgingOffset);

#[cfg(feature = "defmt")]
impl defmt::Format for AgingOffset {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "AgingOffset({})", self.aging_offset());
    }
}

/// Values written to every writable register at device open.
///
/// Midnight, Monday 2000-01-01, alarms cleared, control at its reset value
/// (8.192kHz select, pin in interrupt mode, both alarms disabled).
pub const POWER_ON_DEFAULTS: [(RegAddr, u8); 17] = [
    (RegAddr::Seconds, 0x00),
    (RegAddr::Minutes, 0x00),
    (RegAddr::Hours, 0x00),
    (RegAddr::Day, 0x01),
    (RegAddr::Date, 0x01),
    (RegAddr::MonthCentury, 0x01),
    (RegAddr::Year, 0x00),
    (RegAddr::Alarm1Seconds, 0x00),
    (RegAddr::Alarm1Minutes, 0x00),
    (RegAddr::Alarm1Hours, 0x00),
    (RegAddr::Alarm1DayDate, 0x00),
    (RegAddr::Alarm2Minutes, 0x00),
    (RegAddr::Alarm2Hours, 0x00),
    (RegAddr::Alarm2DayDate, 0x00),
    (RegAddr::Control, 0x1C),
    (RegAddr::ControlStatus, 0x00),
    (RegAddr::AgingOffset, 0x00),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hours_register_conversions() {
        // 24-hour mode
        let hours = Hours::from(0x23); // 23:00
        assert!(!hours.match_gate());
        assert_eq!(hours.mode(), HourMode::TwentyFourHour);
        assert_eq!(hours.pm_or_twenty_hours(), 1); // 20-hour bit set
        assert_eq!(hours.ten_hours(), 0);
        assert_eq!(hours.hours(), 3);
        assert_eq!(u8::from(hours), 0x23);

        // 12-hour mode PM
        let hours = Hours::from(0x72); // 12 PM
        assert_eq!(hours.mode(), HourMode::TwelveHour);
        assert_eq!(hours.pm_or_twenty_hours(), 1); // PM bit set
        assert_eq!(hours.ten_hours(), 1);
        assert_eq!(hours.hours(), 2);

        // 12-hour mode AM
        let hours = Hours::from(0x48); // 8 AM
        assert_eq!(hours.mode(), HourMode::TwelveHour);
        assert_eq!(hours.pm_or_twenty_hours(), 0);
        assert_eq!(hours.hours(), 8);
    }

    #[test]
    fn test_hours_register_preserves_match_gate() {
        let mut hours = Hours::from(0x80);
        hours.set_mode(HourMode::TwentyFourHour);
        hours.set_ten_hours(1);
        hours.set_hours(4);
        assert!(hours.match_gate());
        assert_eq!(u8::from(hours), 0x94);
    }

    #[test]
    fn test_control_register_reset_value() {
        let control = Control::from(0x1C);
        assert_eq!(control.oscillator_enable(), Oscillator::Enabled);
        assert!(!control.battery_backed_square_wave());
        assert!(!control.convert_temperature());
        assert_eq!(control.square_wave_frequency(), SquareWaveFrequency::Hz8192);
        assert_eq!(control.interrupt_control(), InterruptControl::Interrupt);
        assert!(!control.alarm2_interrupt_enable());
        assert!(!control.alarm1_interrupt_enable());
    }

    #[test]
    fn test_control_register_round_trip() {
        let mut control = Control::default();
        control.set_battery_backed_square_wave(true);
        control.set_square_wave_frequency(SquareWaveFrequency::Hz1024);
        control.set_interrupt_control(InterruptControl::SquareWave);
        control.set_alarm1_interrupt_enable(true);
        assert_eq!(u8::from(control), 0b0100_1001);
    }

    #[test]
    fn test_status_register_flags() {
        let status = Status::from(0b0000_0111);
        assert!(!status.oscillator_stop_flag());
        assert!(!status.enable_32khz_output());
        assert!(status.busy());
        assert!(status.alarm2_flag());
        assert!(status.alarm1_flag());

        let mut status = Status::from(0x0B);
        status.set_alarm1_flag(false);
        assert_eq!(u8::from(status), 0x0A);
    }

    #[test]
    fn test_aging_offset_is_signed() {
        assert_eq!(AgingOffset::from(0xFF).aging_offset(), -1);
        assert_eq!(AgingOffset::from(0x7F).aging_offset(), 127);
        let mut aging = AgingOffset::default();
        aging.set_aging_offset(-3);
        assert_eq!(u8::from(aging), 0xFD);
    }

    #[test]
    fn test_field_register_resolves_clock_fields() {
        assert_eq!(
            field_register(Field::Seconds, RegisterTarget::Rtc),
            Some(RegAddr::Seconds)
        );
        assert_eq!(
            field_register(Field::Hours, RegisterTarget::Rtc),
            Some(RegAddr::Hours)
        );
        assert_eq!(
            field_register(Field::Month, RegisterTarget::Rtc),
            Some(RegAddr::MonthCentury)
        );
        assert_eq!(
            field_register(Field::Year, RegisterTarget::Rtc),
            Some(RegAddr::Year)
        );
    }

    #[test]
    fn test_field_register_resolves_alarm_fields() {
        assert_eq!(
            field_register(Field::Seconds, RegisterTarget::Alarm1),
            Some(RegAddr::Alarm1Seconds)
        );
        assert_eq!(
            field_register(Field::Hours, RegisterTarget::Alarm2),
            Some(RegAddr::Alarm2Hours)
        );
        assert_eq!(
            field_register(Field::Day, RegisterTarget::Alarm1),
            Some(RegAddr::Alarm1DayDate)
        );
        assert_eq!(
            field_register(Field::Date, RegisterTarget::Alarm2),
            Some(RegAddr::Alarm2DayDate)
        );
    }

    #[test]
    fn test_field_register_rejects_missing_registers() {
        assert_eq!(field_register(Field::Seconds, RegisterTarget::Alarm2), None);
        assert_eq!(field_register(Field::Month, RegisterTarget::Alarm1), None);
        assert_eq!(field_register(Field::Year, RegisterTarget::Alarm2), None);
    }

    #[test]
    fn test_power_on_defaults_cover_writable_registers() {
        assert_eq!(POWER_ON_DEFAULTS.len(), 17);
        assert_eq!(POWER_ON_DEFAULTS[0], (RegAddr::Seconds, 0x00));
        assert_eq!(POWER_ON_DEFAULTS[14], (RegAddr::Control, 0x1C));
        assert_eq!(POWER_ON_DEFAULTS[16], (RegAddr::AgingOffset, 0x00));
    }

    #[test]
    fn test_day_date_select_conversions() {
        assert_eq!(DayDateSelect::from(0), DayDateSelect::Date);
        assert_eq!(DayDateSelect::from(1), DayDateSelect::Day);
        assert_eq!(u8::from(DayDateSelect::Date), 0);
        assert_eq!(u8::from(DayDateSelect::Day), 1);
    }

    #[test]
    #[should_panic(expected = "Invalid value for DayDateSelect: 2")]
    fn test_invalid_day_date_select_conversion() {
        let _ = DayDateSelect::from(2);
    }

    #[test]
    #[should_panic(expected = "Invalid value for HourMode: 2")]
    fn test_invalid_hour_mode_conversion() {
        let _ = HourMode::from(2);
    }

    #[test]
    #[should_panic(expected = "Invalid value for SquareWaveFrequency: 4")]
    fn test_invalid_square_wave_frequency_conversion() {
        let _ = SquareWaveFrequency::from(4);
    }
}
