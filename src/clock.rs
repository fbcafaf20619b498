//! Clock and calendar access for the DS3231 RTC driver.
//!
//! This module implements the per-field getters and setters, the grouped
//! time/date operations with their rollback behavior, and the conversion
//! between the register file and chrono's `NaiveDateTime`. Every getter
//! refreshes the shadow copy of its field and every setter reads the
//! register back after writing, so the shadow follows the device.

use core::fmt;

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use embedded_hal::i2c::I2c;

cfg_if::cfg_if! {
    if #[cfg(feature = "defmt")] {
        use defmt::error;
    } else if #[cfg(feature = "log")] {
        use log::error;
    }
}

use crate::bcd;
use crate::registers::{
    field_register, DayDateSelect, Field, HourMode, Hours, RegAddr, RegisterTarget,
    ALARM_MASK_BIT, CENTURY_BIT, DATE_MASK, DAY_DATE_SELECT_BIT, DAY_MASK, MINUTES_MASK,
    MONTH_MASK, SECONDS_MASK,
};
use crate::{Ds3231, Error};

/// AM/PM half of the day in 12-hour mode.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Meridiem {
    /// Before noon
    Am,
    /// Noon and after
    Pm,
}

/// Last known value of every clock register, refreshed on each access.
#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) struct ShadowState {
    pub seconds: u8,
    pub minutes: u8,
    pub hours: u8,
    pub mode: HourMode,
    pub meridiem: Option<Meridiem>,
    pub day: u8,
    pub date: u8,
    pub month: u8,
    pub year: u16,
    pub leap_year: bool,
    pub temperature: f32,
}

impl Default for ShadowState {
    fn default() -> Self {
        // Mirrors the power-on defaults: midnight, Monday 2000-01-01
        Self {
            seconds: 0,
            minutes: 0,
            hours: 0,
            mode: HourMode::TwentyFourHour,
            meridiem: None,
            day: 1,
            date: 1,
            month: 1,
            year: 2000,
            leap_year: true,
            temperature: 0.0,
        }
    }
}

/// Snapshot of the clock and calendar fields.
///
/// Rendered by `Display` as `HH:MM:SS   DD/MM/YYYY`, with ` AM`/` PM`
/// after the time when the clock runs in 12-hour mode.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TimeAndDate {
    /// Hours, 0-23 in 24-hour mode or 1-12 in 12-hour mode
    pub hours: u8,
    /// Minutes (0-59)
    pub minutes: u8,
    /// Seconds (0-59)
    pub seconds: u8,
    /// Hour representation the hours value uses
    pub mode: HourMode,
    /// AM/PM half, present only in 12-hour mode
    pub meridiem: Option<Meridiem>,
    /// Day of week (1-7, where 1=Monday)
    pub day: u8,
    /// Date of month (1-31)
    pub date: u8,
    /// Month (1-12)
    pub month: u8,
    /// Full year (2000-2199)
    pub year: u16,
}

impl fmt::Display for TimeAndDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}:{:02}", self.hours, self.minutes, self.seconds)?;
        if self.mode == HourMode::TwelveHour {
            match self.meridiem {
                Some(Meridiem::Pm) => write!(f, " PM")?,
                _ => write!(f, " AM")?,
            }
        }
        write!(f, "   {:02}/{:02}/{:04}", self.date, self.month, self.year)
    }
}

/// Days in the given month, `None` for values outside 1-12.
fn days_in_month(month: u8, leap_year: bool) -> Option<u8> {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => Some(31),
        4 | 6 | 9 | 11 => Some(30),
        2 => Some(if leap_year { 29 } else { 28 }),
        _ => None,
    }
}

pub(crate) fn is_leap_year(year: u16) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Splits a raw hours register into its numeric value, mode, and meridiem.
pub(crate) fn decode_hours(raw: Hours) -> (u8, HourMode, Option<Meridiem>) {
    let base = 10 * raw.ten_hours() + raw.hours();
    match raw.mode() {
        HourMode::TwentyFourHour => (
            base + 20 * raw.pm_or_twenty_hours(),
            HourMode::TwentyFourHour,
            None,
        ),
        HourMode::TwelveHour => {
            let meridiem = if raw.pm_or_twenty_hours() == 0 {
                Meridiem::Am
            } else {
                Meridiem::Pm
            };
            (base, HourMode::TwelveHour, Some(meridiem))
        }
    }
}

/// Builds the low seven bits of an hours register from a 0-23 value.
///
/// The representation follows the value: 0 stays 24-hour midnight,
/// 1-12 selects 12-hour AM, and 13-23 selects 24-hour.
pub(crate) fn encode_hours(value: u8) -> Hours {
    let mut hours = Hours::default();
    match value {
        0 => hours.set_mode(HourMode::TwentyFourHour),
        1..=12 => {
            hours.set_mode(HourMode::TwelveHour);
            hours.set_ten_hours(value / 10);
            hours.set_hours(value % 10);
        }
        _ => {
            hours.set_mode(HourMode::TwentyFourHour);
            hours.set_pm_or_twenty_hours(value / 20);
            hours.set_ten_hours((value / 10) % 2);
            hours.set_hours(value % 10);
        }
    }
    hours
}

impl<I2C: I2c> Ds3231<I2C> {
    /// Read-modify-write of a value field, returning the readback.
    ///
    /// `keep` names the flag bits of the old register content that survive
    /// the write (alarm match gate, century flag).
    fn write_field(
        &mut self,
        field: Field,
        target: RegisterTarget,
        bits: u8,
        keep: u8,
    ) -> Result<u8, Error<I2C::Error>> {
        let reg = field_register(field, target).ok_or(Error::InvalidTarget(field, target))?;
        let old = self.read_register(reg)?;
        self.write_register(reg, (old & keep) | bits)?;
        self.read_register(reg)
    }

    /// Reads the seconds (0-59) from the device.
    pub fn seconds(&mut self) -> Result<u8, Error<I2C::Error>> {
        let raw = self.read_register(RegAddr::Seconds)?;
        let value = bcd::decode(raw & SECONDS_MASK);
        self.shadow.seconds = value;
        Ok(value)
    }

    /// Reads the minutes (0-59) from the device.
    pub fn minutes(&mut self) -> Result<u8, Error<I2C::Error>> {
        let raw = self.read_register(RegAddr::Minutes)?;
        let value = bcd::decode(raw & MINUTES_MASK);
        self.shadow.minutes = value;
        Ok(value)
    }

    /// Reads the hours from the device.
    ///
    /// # Returns
    /// * `Ok(u8)` - 0-23 in 24-hour mode, 1-12 in 12-hour mode
    /// * `Err(Error)` on error
    pub fn hours(&mut self) -> Result<u8, Error<I2C::Error>> {
        let raw = Hours(self.read_register(RegAddr::Hours)?);
        let (value, mode, meridiem) = decode_hours(raw);
        self.shadow.hours = value;
        self.shadow.mode = mode;
        self.shadow.meridiem = meridiem;
        Ok(value)
    }

    /// Reads the day of week (1-7, where 1=Monday) from the device.
    pub fn day(&mut self) -> Result<u8, Error<I2C::Error>> {
        let raw = self.read_register(RegAddr::Day)?;
        let value = bcd::decode(raw & DAY_MASK);
        self.shadow.day = value;
        Ok(value)
    }

    /// Reads the date of month (1-31) from the device.
    pub fn date(&mut self) -> Result<u8, Error<I2C::Error>> {
        let raw = self.read_register(RegAddr::Date)?;
        let value = bcd::decode(raw & DATE_MASK);
        self.shadow.date = value;
        Ok(value)
    }

    /// Reads the month (1-12) from the device, ignoring the century flag.
    pub fn month(&mut self) -> Result<u8, Error<I2C::Error>> {
        let raw = self.read_register(RegAddr::MonthCentury)?;
        let value = bcd::decode(raw & MONTH_MASK);
        self.shadow.month = value;
        Ok(value)
    }

    /// Reads the full year from the device.
    ///
    /// The year register holds two digits; the century flag in the month
    /// register selects 20xx or 21xx.
    pub fn year(&mut self) -> Result<u16, Error<I2C::Error>> {
        let raw_year = self.read_register(RegAddr::Year)?;
        let raw_month = self.read_register(RegAddr::MonthCentury)?;
        let mut year = 2000 + u16::from(bcd::decode(raw_year));
        if raw_month & CENTURY_BIT != 0 {
            year += 100;
        }
        self.shadow.year = year;
        self.shadow.leap_year = is_leap_year(year);
        Ok(year)
    }

    /// Writes the seconds of the clock or an alarm.
    ///
    /// # Arguments
    /// * `value` - Seconds, 0-59
    /// * `target` - The register bank to write
    pub fn set_seconds(&mut self, value: u8, target: RegisterTarget) -> Result<(), Error<I2C::Error>> {
        if value > 59 {
            return Err(Error::Range(Field::Seconds));
        }
        let encoded = bcd::encode(value).ok_or(Error::Bcd(value))?;
        let raw = self.write_field(Field::Seconds, target, encoded, ALARM_MASK_BIT)?;
        let value = bcd::decode(raw & SECONDS_MASK);
        match target {
            RegisterTarget::Rtc => self.shadow.seconds = value,
            RegisterTarget::Alarm1 => self.alarm1.seconds = value,
            RegisterTarget::Alarm2 => self.alarm2.seconds = value,
        }
        Ok(())
    }

    /// Writes the minutes of the clock or an alarm.
    ///
    /// # Arguments
    /// * `value` - Minutes, 0-59
    /// * `target` - The register bank to write
    pub fn set_minutes(&mut self, value: u8, target: RegisterTarget) -> Result<(), Error<I2C::Error>> {
        if value > 59 {
            return Err(Error::Range(Field::Minutes));
        }
        let encoded = bcd::encode(value).ok_or(Error::Bcd(value))?;
        let raw = self.write_field(Field::Minutes, target, encoded, ALARM_MASK_BIT)?;
        let value = bcd::decode(raw & MINUTES_MASK);
        match target {
            RegisterTarget::Rtc => self.shadow.minutes = value,
            RegisterTarget::Alarm1 => self.alarm1.minutes = value,
            RegisterTarget::Alarm2 => self.alarm2.minutes = value,
        }
        Ok(())
    }

    /// Writes the hours of the clock or an alarm.
    ///
    /// The stored representation follows the value (see [`encode_hours`]):
    /// 0 is 24-hour midnight, 1-12 lands in 12-hour AM, 13-23 in 24-hour.
    /// Use [`Ds3231::change_hour_mode`] to flip the representation of a
    /// value already on the device.
    ///
    /// # Arguments
    /// * `value` - Hours, 0-23
    /// * `target` - The register bank to write
    pub fn set_hours(&mut self, value: u8, target: RegisterTarget) -> Result<(), Error<I2C::Error>> {
        if value > 23 {
            return Err(Error::Range(Field::Hours));
        }
        let encoded = encode_hours(value);
        let raw = Hours(self.write_field(Field::Hours, target, encoded.into(), ALARM_MASK_BIT)?);
        let (value, mode, meridiem) = decode_hours(raw);
        match target {
            RegisterTarget::Rtc => {
                self.shadow.hours = value;
                self.shadow.mode = mode;
                self.shadow.meridiem = meridiem;
            }
            RegisterTarget::Alarm1 => self.alarm1.hours = value,
            RegisterTarget::Alarm2 => self.alarm2.hours = value,
        }
        Ok(())
    }

    /// Writes the day of week of the clock, or puts an alarm register into
    /// day-of-week matching.
    ///
    /// # Arguments
    /// * `value` - Day of week, 1-7 where 1=Monday
    /// * `target` - The register bank to write
    pub fn set_day(&mut self, value: u8, target: RegisterTarget) -> Result<(), Error<I2C::Error>> {
        if !(1..=7).contains(&value) {
            return Err(Error::Range(Field::Day));
        }
        let encoded = bcd::encode(value).ok_or(Error::Bcd(value))?;
        match target {
            RegisterTarget::Rtc => {
                let raw = self.write_field(Field::Day, target, encoded, 0)?;
                self.shadow.day = bcd::decode(raw & DAY_MASK);
            }
            RegisterTarget::Alarm1 | RegisterTarget::Alarm2 => {
                let raw = self.write_field(
                    Field::Day,
                    target,
                    DAY_DATE_SELECT_BIT | encoded,
                    ALARM_MASK_BIT,
                )?;
                let mirror = if target == RegisterTarget::Alarm1 {
                    &mut self.alarm1
                } else {
                    &mut self.alarm2
                };
                mirror.day_date = bcd::decode(raw & DAY_MASK);
                mirror.select = DayDateSelect::Day;
            }
        }
        Ok(())
    }

    /// Writes the date of month of the clock, or puts an alarm register
    /// into date matching.
    ///
    /// On the clock the value is checked against the days-in-month table
    /// for the shadowed month and leap-year flag. Alarm dates accept 1-31.
    ///
    /// # Arguments
    /// * `value` - Date of month
    /// * `target` - The register bank to write
    pub fn set_date(&mut self, value: u8, target: RegisterTarget) -> Result<(), Error<I2C::Error>> {
        match target {
            RegisterTarget::Rtc => {
                let limit = days_in_month(self.shadow.month, self.shadow.leap_year)
                    .ok_or(Error::UnknownMonth(self.shadow.month))?;
                if value == 0 || value > limit {
                    return Err(Error::Range(Field::Date));
                }
                let encoded = bcd::encode(value).ok_or(Error::Bcd(value))?;
                let raw = self.write_field(Field::Date, target, encoded, 0)?;
                self.shadow.date = bcd::decode(raw & DATE_MASK);
            }
            RegisterTarget::Alarm1 | RegisterTarget::Alarm2 => {
                if !(1..=31).contains(&value) {
                    return Err(Error::Range(Field::Date));
                }
                let encoded = bcd::encode(value).ok_or(Error::Bcd(value))?;
                let raw = self.write_field(Field::Date, target, encoded, ALARM_MASK_BIT)?;
                let mirror = if target == RegisterTarget::Alarm1 {
                    &mut self.alarm1
                } else {
                    &mut self.alarm2
                };
                mirror.day_date = bcd::decode(raw & DATE_MASK);
                mirror.select = DayDateSelect::Date;
            }
        }
        Ok(())
    }

    /// Writes the month (1-12) of the clock, preserving the century flag.
    pub fn set_month(&mut self, value: u8) -> Result<(), Error<I2C::Error>> {
        if !(1..=12).contains(&value) {
            return Err(Error::Range(Field::Month));
        }
        let encoded = bcd::encode(value).ok_or(Error::Bcd(value))?;
        let raw = self.write_field(Field::Month, RegisterTarget::Rtc, encoded, CENTURY_BIT)?;
        self.shadow.month = bcd::decode(raw & MONTH_MASK);
        Ok(())
    }

    /// Writes the year (2000-2099) of the clock.
    ///
    /// The two stored digits are relative to 2000; the century flag in the
    /// month register is cleared so the next rollover starts a fresh count.
    pub fn set_year(&mut self, value: u16) -> Result<(), Error<I2C::Error>> {
        if !(2000..=2099).contains(&value) {
            return Err(Error::Range(Field::Year));
        }
        let years = (value - 2000) as u8;
        let encoded = bcd::encode(years).ok_or(Error::Bcd(years))?;
        let month = self.read_register(RegAddr::MonthCentury)?;
        self.write_register(RegAddr::MonthCentury, month & !CENTURY_BIT)?;
        self.write_register(RegAddr::Year, encoded)?;
        let raw = self.read_register(RegAddr::Year)?;
        self.shadow.year = 2000 + u16::from(bcd::decode(raw));
        self.shadow.leap_year = is_leap_year(self.shadow.year);
        Ok(())
    }

    /// Flips only the 12/24-hour mode bit of an hours register.
    ///
    /// The remaining bits are left as they are and reread under the new
    /// mode, exactly as the hardware does: 0x21 (21:00) becomes 1 PM when
    /// switched to 12-hour mode.
    pub fn change_hour_mode(
        &mut self,
        mode: HourMode,
        target: RegisterTarget,
    ) -> Result<(), Error<I2C::Error>> {
        let reg = field_register(Field::Hours, target)
            .ok_or(Error::InvalidTarget(Field::Hours, target))?;
        let mut raw = Hours(self.read_register(reg)?);
        raw.set_mode(mode);
        self.write_register(reg, raw.into())?;
        let (value, mode, meridiem) = decode_hours(Hours(self.read_register(reg)?));
        match target {
            RegisterTarget::Rtc => {
                self.shadow.hours = value;
                self.shadow.mode = mode;
                self.shadow.meridiem = meridiem;
            }
            RegisterTarget::Alarm1 => self.alarm1.hours = value,
            RegisterTarget::Alarm2 => self.alarm2.hours = value,
        }
        Ok(())
    }

    fn try_set_time(&mut self, hours: u8, minutes: u8, seconds: u8) -> Result<(), Error<I2C::Error>> {
        self.set_seconds(seconds, RegisterTarget::Rtc)?;
        self.set_minutes(minutes, RegisterTarget::Rtc)?;
        self.set_hours(hours, RegisterTarget::Rtc)
    }

    fn try_set_calendar(&mut self, date: u8, month: u8, year: u16) -> Result<(), Error<I2C::Error>> {
        self.set_year(year)?;
        self.set_month(month)?;
        self.set_date(date, RegisterTarget::Rtc)
    }

    fn reset_time(&mut self) -> Result<(), Error<I2C::Error>> {
        self.try_set_time(0, 0, 0)
    }

    fn reset_calendar(&mut self) -> Result<(), Error<I2C::Error>> {
        self.try_set_calendar(1, 1, 2000)
    }

    /// Writes hours, minutes, and seconds of the clock as one group.
    ///
    /// When any component is rejected the whole group is restored to
    /// 00:00:00 and the original error is returned.
    pub fn set_time(&mut self, hours: u8, minutes: u8, seconds: u8) -> Result<(), Error<I2C::Error>> {
        if let Err(e) = self.try_set_time(hours, minutes, seconds) {
            #[cfg(any(feature = "log", feature = "defmt"))]
            error!("DS3231: invalid time, restoring 00:00:00");
            self.reset_time()?;
            return Err(e);
        }
        Ok(())
    }

    /// Writes date, month, and year of the clock as one group.
    ///
    /// The year lands first and the date last, so the days-in-month check
    /// always runs against the month being set. When any component is
    /// rejected the whole group is restored to 01/01/2000 and the original
    /// error is returned.
    pub fn set_calendar(&mut self, date: u8, month: u8, year: u16) -> Result<(), Error<I2C::Error>> {
        if let Err(e) = self.try_set_calendar(date, month, year) {
            #[cfg(any(feature = "log", feature = "defmt"))]
            error!("DS3231: invalid calendar, restoring 01/01/2000");
            self.reset_calendar()?;
            return Err(e);
        }
        Ok(())
    }

    /// Writes the complete time and date as one group, calendar first.
    ///
    /// A rejected component restores both groups to their power-on values
    /// (00:00:00, 01/01/2000) and returns the original error.
    pub fn set_time_and_date(
        &mut self,
        hours: u8,
        minutes: u8,
        seconds: u8,
        date: u8,
        month: u8,
        year: u16,
    ) -> Result<(), Error<I2C::Error>> {
        let result = self
            .try_set_calendar(date, month, year)
            .and_then(|()| self.try_set_time(hours, minutes, seconds));
        if let Err(e) = result {
            #[cfg(any(feature = "log", feature = "defmt"))]
            error!("DS3231: invalid time/date, restoring power-on values");
            self.reset_calendar()?;
            self.reset_time()?;
            return Err(e);
        }
        Ok(())
    }

    pub(crate) fn refresh_shadow(&mut self) -> Result<(), Error<I2C::Error>> {
        // Slow-moving fields first
        self.year()?;
        self.month()?;
        self.date()?;
        self.day()?;
        self.hours()?;
        self.minutes()?;
        self.seconds()?;
        Ok(())
    }

    /// Rereads every clock field and returns the fresh snapshot.
    pub fn time_and_date(&mut self) -> Result<TimeAndDate, Error<I2C::Error>> {
        self.refresh_shadow()?;
        Ok(self.time_and_date_cached())
    }

    /// Returns the last known clock fields without touching the bus.
    pub fn time_and_date_cached(&self) -> TimeAndDate {
        TimeAndDate {
            hours: self.shadow.hours,
            minutes: self.shadow.minutes,
            seconds: self.shadow.seconds,
            mode: self.shadow.mode,
            meridiem: self.shadow.meridiem,
            day: self.shadow.day,
            date: self.shadow.date,
            month: self.shadow.month,
            year: self.shadow.year,
        }
    }

    /// Reads the clock as a chrono `NaiveDateTime`.
    ///
    /// A 12-hour reading is converted to its canonical 24-hour value.
    pub fn datetime(&mut self) -> Result<NaiveDateTime, Error<I2C::Error>> {
        self.refresh_shadow()?;
        let hours = match (self.shadow.mode, self.shadow.meridiem) {
            (HourMode::TwentyFourHour, _) => self.shadow.hours,
            (HourMode::TwelveHour, Some(Meridiem::Pm)) => self.shadow.hours % 12 + 12,
            (HourMode::TwelveHour, _) => self.shadow.hours % 12,
        };
        let date = NaiveDate::from_ymd_opt(
            i32::from(self.shadow.year),
            u32::from(self.shadow.month),
            u32::from(self.shadow.date),
        )
        .ok_or(Error::InvalidDateTime)?;
        let time = NaiveTime::from_hms_opt(
            u32::from(hours),
            u32::from(self.shadow.minutes),
            u32::from(self.shadow.seconds),
        )
        .ok_or(Error::InvalidDateTime)?;
        Ok(NaiveDateTime::new(date, time))
    }

    /// Writes the clock from a chrono `NaiveDateTime`, including the day
    /// of week (Monday=1).
    pub fn set_datetime(&mut self, datetime: &NaiveDateTime) -> Result<(), Error<I2C::Error>> {
        let year = u16::try_from(datetime.year()).map_err(|_| Error::InvalidDateTime)?;
        self.set_time_and_date(
            datetime.hour() as u8,
            datetime.minute() as u8,
            datetime.second() as u8,
            datetime.day() as u8,
            datetime.month() as u8,
            year,
        )?;
        self.set_day(
            datetime.weekday().number_from_monday() as u8,
            RegisterTarget::Rtc,
        )
    }
}
