//! Alarm management for the DS3231 RTC driver.
//!
//! The chip carries two alarms. Alarm 1 matches down to seconds; alarm 2
//! has no seconds register and fires at the top of the matching minute.
//! Each alarm moves through the same cycle: configured and armed by
//! [`Ds3231::set_alarm`], fired when the device raises its flag, observed
//! through [`Ds3231::read_alarm`], and rearmed by clearing the flag or
//! snoozing.
//!
//! A match mode picks the components that must equal the running clock
//! for the alarm to fire. Its gate bits land in the MSB of the alarm
//! registers; the low seven bits hold the BCD field values, which are
//! written through the same field setters the clock uses.

use embedded_hal::i2c::I2c;

cfg_if::cfg_if! {
    if #[cfg(feature = "defmt")] {
        use defmt::debug;
    } else if #[cfg(feature = "log")] {
        use log::debug;
    }
}

use crate::bcd;
use crate::registers::{
    DayDateSelect, InterruptControl, RegAddr, RegisterTarget, ALARM_MASK_BIT, MINUTES_MASK,
};
use crate::{Ds3231, Error};

/// Selects one of the two hardware alarms.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AlarmId {
    /// Alarm 1, with a seconds register
    One,
    /// Alarm 2, which matches whole minutes
    Two,
}

impl AlarmId {
    fn target(self) -> RegisterTarget {
        match self {
            AlarmId::One => RegisterTarget::Alarm1,
            AlarmId::Two => RegisterTarget::Alarm2,
        }
    }

    fn minutes_register(self) -> RegAddr {
        match self {
            AlarmId::One => RegAddr::Alarm1Minutes,
            AlarmId::Two => RegAddr::Alarm2Minutes,
        }
    }

    #[cfg(any(feature = "log", feature = "defmt"))]
    fn number(self) -> u8 {
        match self {
            AlarmId::One => 1,
            AlarmId::Two => 2,
        }
    }
}

/// The components an alarm compares against the running clock.
///
/// Each excluded component has its gate bit set in the MSB of the
/// corresponding alarm register. Alarm 2 has no seconds register, so
/// [`AlarmMatch::OncePerSecond`] and [`AlarmMatch::Seconds`] are
/// rejected for it.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AlarmMatch {
    /// Fire every second (all gate bits set)
    OncePerSecond,
    /// Fire when seconds match (seconds gate clear, others set)
    Seconds,
    /// Fire when minutes and seconds match. On alarm 2 this matches
    /// minutes alone, at the top of the minute.
    MinutesSeconds,
    /// Fire once a day when the full time matches (only the day/date
    /// gate set)
    HoursMinutesSeconds,
    /// Fire when the day or date and the full time match (all gate bits
    /// clear)
    DayDateHoursMinutesSeconds,
}

impl AlarmMatch {
    /// Gate bits for the seconds, minutes, hours, and day/date registers,
    /// in that order. A set gate excludes the component from matching.
    fn gate_bits(self) -> [bool; 4] {
        match self {
            AlarmMatch::OncePerSecond => [true, true, true, true],
            AlarmMatch::Seconds => [false, true, true, true],
            AlarmMatch::MinutesSeconds => [false, false, true, true],
            AlarmMatch::HoursMinutesSeconds => [false, false, false, true],
            AlarmMatch::DayDateHoursMinutesSeconds => [false, false, false, false],
        }
    }
}

/// Mirror of one alarm's last written configuration.
///
/// Field values follow the readbacks performed by the setters, the same
/// way the clock shadow does. [`Ds3231::read_alarm`] refreshes the
/// triggered flag.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AlarmConfig {
    pub(crate) match_mode: AlarmMatch,
    pub(crate) select: DayDateSelect,
    pub(crate) seconds: u8,
    pub(crate) minutes: u8,
    pub(crate) hours: u8,
    pub(crate) day_date: u8,
    pub(crate) enabled: bool,
    pub(crate) triggered: bool,
}

impl Default for AlarmConfig {
    fn default() -> Self {
        Self {
            match_mode: AlarmMatch::OncePerSecond,
            select: DayDateSelect::Date,
            seconds: 0,
            minutes: 0,
            hours: 0,
            day_date: 0,
            enabled: false,
            triggered: false,
        }
    }
}

impl AlarmConfig {
    /// The configured match mode.
    pub fn match_mode(&self) -> AlarmMatch {
        self.match_mode
    }

    /// Whether the day/date field holds a day of week or a date of month.
    pub fn day_date_select(&self) -> DayDateSelect {
        self.select
    }

    /// The configured seconds (always 0 for alarm 2).
    pub fn seconds(&self) -> u8 {
        self.seconds
    }

    /// The configured minutes.
    pub fn minutes(&self) -> u8 {
        self.minutes
    }

    /// The configured hours.
    pub fn hours(&self) -> u8 {
        self.hours
    }

    /// The configured day of week or date of month, per
    /// [`AlarmConfig::day_date_select`].
    pub fn day_date(&self) -> u8 {
        self.day_date
    }

    /// Whether the alarm's interrupt-enable bit was last set.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Whether the alarm flag was set at the last poll.
    pub fn is_triggered(&self) -> bool {
        self.triggered
    }
}

impl<I2C: I2c> Ds3231<I2C> {
    fn alarm_mirror_mut(&mut self, id: AlarmId) -> &mut AlarmConfig {
        match id {
            AlarmId::One => &mut self.alarm1,
            AlarmId::Two => &mut self.alarm2,
        }
    }

    fn write_match_gate(&mut self, reg: RegAddr, masked: bool) -> Result<(), Error<I2C::Error>> {
        let old = self.read_register(reg)?;
        let value = if masked {
            old | ALARM_MASK_BIT
        } else {
            old & !ALARM_MASK_BIT
        };
        self.write_register(reg, value)
    }

    /// Returns the mirrored configuration of an alarm.
    ///
    /// The mirror tracks what the driver last wrote or polled; reading it
    /// performs no bus traffic.
    pub fn alarm_config(&self, id: AlarmId) -> AlarmConfig {
        match id {
            AlarmId::One => self.alarm1,
            AlarmId::Two => self.alarm2,
        }
    }

    /// Configures and arms an alarm in one call.
    ///
    /// The match-mode gate bits are written first, one read-modify-write
    /// per alarm register. Every field value then goes through the same
    /// setters the clock uses, the day or date interpretation is selected,
    /// and the alarm interrupt is enabled.
    ///
    /// Alarm 2 has no seconds register: `seconds` is ignored for it, and
    /// the match modes that need one are rejected.
    ///
    /// # Arguments
    /// * `id` - Which alarm to configure
    /// * `day_date` - Whether `day` or `date` participates in matching
    /// * `match_mode` - The components that must match for the alarm to fire
    /// * `date` - Date of month, 1-31, used when `day_date` is `Date`
    /// * `day` - Day of week, 1-7, used when `day_date` is `Day`
    /// * `hours` - Hours, 0-23
    /// * `minutes` - Minutes, 0-59
    /// * `seconds` - Seconds, 0-59 (alarm 1 only)
    #[allow(clippy::too_many_arguments)]
    pub fn set_alarm(
        &mut self,
        id: AlarmId,
        day_date: DayDateSelect,
        match_mode: AlarmMatch,
        date: u8,
        day: u8,
        hours: u8,
        minutes: u8,
        seconds: u8,
    ) -> Result<(), Error<I2C::Error>> {
        if id == AlarmId::Two
            && matches!(match_mode, AlarmMatch::OncePerSecond | AlarmMatch::Seconds)
        {
            return Err(Error::InvalidMatchMode(match_mode));
        }
        let gates = match_mode.gate_bits();
        match id {
            AlarmId::One => {
                self.write_match_gate(RegAddr::Alarm1Seconds, gates[0])?;
                self.write_match_gate(RegAddr::Alarm1Minutes, gates[1])?;
                self.write_match_gate(RegAddr::Alarm1Hours, gates[2])?;
                self.write_match_gate(RegAddr::Alarm1DayDate, gates[3])?;
            }
            AlarmId::Two => {
                self.write_match_gate(RegAddr::Alarm2Minutes, gates[1])?;
                self.write_match_gate(RegAddr::Alarm2Hours, gates[2])?;
                self.write_match_gate(RegAddr::Alarm2DayDate, gates[3])?;
            }
        }
        let target = id.target();
        if id == AlarmId::One {
            self.set_seconds(seconds, target)?;
        }
        self.set_minutes(minutes, target)?;
        self.set_hours(hours, target)?;
        match day_date {
            DayDateSelect::Day => self.set_day(day, target)?,
            DayDateSelect::Date => self.set_date(date, target)?,
        }
        self.enable_alarm(id)?;
        self.alarm_mirror_mut(id).match_mode = match_mode;
        #[cfg(any(feature = "log", feature = "defmt"))]
        debug!("DS3231: alarm {} armed", id.number());
        Ok(())
    }

    /// Arms an alarm by routing the INT/SQW pin to interrupts.
    ///
    /// Square-wave output and alarm interrupts share the pin, so this
    /// stops the battery-backed square wave and switches the pin to
    /// interrupt mode before setting the alarm's own enable bit.
    pub fn enable_alarm(&mut self, id: AlarmId) -> Result<(), Error<I2C::Error>> {
        let mut control = self.control()?;
        control.set_battery_backed_square_wave(false);
        control.set_interrupt_control(InterruptControl::Interrupt);
        match id {
            AlarmId::One => control.set_alarm1_interrupt_enable(true),
            AlarmId::Two => control.set_alarm2_interrupt_enable(true),
        }
        self.set_control(control)?;
        self.alarm_mirror_mut(id).enabled = true;
        Ok(())
    }

    /// Disarms an alarm.
    ///
    /// Clears only the alarm's own interrupt-enable bit. The pin stays in
    /// interrupt mode; use [`Ds3231::start_square_wave`] to hand it back.
    pub fn disable_alarm(&mut self, id: AlarmId) -> Result<(), Error<I2C::Error>> {
        let mut control = self.control()?;
        match id {
            AlarmId::One => control.set_alarm1_interrupt_enable(false),
            AlarmId::Two => control.set_alarm2_interrupt_enable(false),
        }
        self.set_control(control)?;
        self.alarm_mirror_mut(id).enabled = false;
        Ok(())
    }

    /// Polls whether the alarm has fired.
    ///
    /// Non-destructive: the flag stays set until [`Ds3231::clear_alarm_flag`]
    /// or [`Ds3231::alarm_snooze`] clears it, so callers poll this and
    /// clear once they have acted on it.
    pub fn read_alarm(&mut self, id: AlarmId) -> Result<bool, Error<I2C::Error>> {
        let status = self.status()?;
        let triggered = match id {
            AlarmId::One => status.alarm1_flag(),
            AlarmId::Two => status.alarm2_flag(),
        };
        self.alarm_mirror_mut(id).triggered = triggered;
        Ok(triggered)
    }

    /// Clears the alarm's fired flag in the status register.
    ///
    /// The enable bit is untouched, so the alarm stays armed for the next
    /// match.
    pub fn clear_alarm_flag(&mut self, id: AlarmId) -> Result<(), Error<I2C::Error>> {
        let mut status = self.status()?;
        match id {
            AlarmId::One => status.set_alarm1_flag(false),
            AlarmId::Two => status.set_alarm2_flag(false),
        }
        self.set_status(status)?;
        self.alarm_mirror_mut(id).triggered = false;
        Ok(())
    }

    /// Pushes the alarm 10 minutes into the future and clears its flag.
    ///
    /// The minutes field wraps within the hour: an alarm set for minute
    /// 55 moves to minute 5. The hour field does not carry.
    pub fn alarm_snooze(&mut self, id: AlarmId) -> Result<(), Error<I2C::Error>> {
        let reg = id.minutes_register();
        let old = self.read_register(reg)?;
        let minutes = (bcd::decode(old & MINUTES_MASK) + 10) % 60;
        let encoded = bcd::encode(minutes).ok_or(Error::Bcd(minutes))?;
        self.write_register(reg, (old & ALARM_MASK_BIT) | encoded)?;
        self.alarm_mirror_mut(id).minutes = minutes;
        self.clear_alarm_flag(id)
    }
}

#[cfg(test)]
mod tests {
    extern crate alloc;
    use super::*;
    use alloc::vec;
    use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTrans};

    const DEVICE_ADDRESS: u8 = 0x68;

    #[test]
    fn test_match_mode_gate_bits() {
        assert_eq!(
            AlarmMatch::OncePerSecond.gate_bits(),
            [true, true, true, true]
        );
        assert_eq!(AlarmMatch::Seconds.gate_bits(), [false, true, true, true]);
        assert_eq!(
            AlarmMatch::MinutesSeconds.gate_bits(),
            [false, false, true, true]
        );
        assert_eq!(
            AlarmMatch::HoursMinutesSeconds.gate_bits(),
            [false, false, false, true]
        );
        assert_eq!(
            AlarmMatch::DayDateHoursMinutesSeconds.gate_bits(),
            [false, false, false, false]
        );
    }

    #[test]
    fn test_alarm_config_defaults() {
        let config = AlarmConfig::default();
        assert_eq!(config.match_mode(), AlarmMatch::OncePerSecond);
        assert_eq!(config.day_date_select(), DayDateSelect::Date);
        assert_eq!(config.seconds(), 0);
        assert_eq!(config.minutes(), 0);
        assert_eq!(config.hours(), 0);
        assert_eq!(config.day_date(), 0);
        assert!(!config.is_enabled());
        assert!(!config.is_triggered());
    }

    #[test]
    fn test_set_alarm1_once_per_second() {
        let expectations = [
            // Gate bits set across all four alarm 1 registers
            I2cTrans::write_read(DEVICE_ADDRESS, vec![RegAddr::Alarm1Seconds as u8], vec![0x00]),
            I2cTrans::write(DEVICE_ADDRESS, vec![RegAddr::Alarm1Seconds as u8, 0x80]),
            I2cTrans::write_read(DEVICE_ADDRESS, vec![RegAddr::Alarm1Minutes as u8], vec![0x00]),
            I2cTrans::write(DEVICE_ADDRESS, vec![RegAddr::Alarm1Minutes as u8, 0x80]),
            I2cTrans::write_read(DEVICE_ADDRESS, vec![RegAddr::Alarm1Hours as u8], vec![0x00]),
            I2cTrans::write(DEVICE_ADDRESS, vec![RegAddr::Alarm1Hours as u8, 0x80]),
            I2cTrans::write_read(DEVICE_ADDRESS, vec![RegAddr::Alarm1DayDate as u8], vec![0x00]),
            I2cTrans::write(DEVICE_ADDRESS, vec![RegAddr::Alarm1DayDate as u8, 0x80]),
            // Field writes keep the gate bits
            I2cTrans::write_read(DEVICE_ADDRESS, vec![RegAddr::Alarm1Seconds as u8], vec![0x80]),
            I2cTrans::write(DEVICE_ADDRESS, vec![RegAddr::Alarm1Seconds as u8, 0x80]),
            I2cTrans::write_read(DEVICE_ADDRESS, vec![RegAddr::Alarm1Seconds as u8], vec![0x80]),
            I2cTrans::write_read(DEVICE_ADDRESS, vec![RegAddr::Alarm1Minutes as u8], vec![0x80]),
            I2cTrans::write(DEVICE_ADDRESS, vec![RegAddr::Alarm1Minutes as u8, 0xD5]),
            I2cTrans::write_read(DEVICE_ADDRESS, vec![RegAddr::Alarm1Minutes as u8], vec![0xD5]),
            // 21:00 stays in 24-hour form
            I2cTrans::write_read(DEVICE_ADDRESS, vec![RegAddr::Alarm1Hours as u8], vec![0x80]),
            I2cTrans::write(DEVICE_ADDRESS, vec![RegAddr::Alarm1Hours as u8, 0xA1]),
            I2cTrans::write_read(DEVICE_ADDRESS, vec![RegAddr::Alarm1Hours as u8], vec![0xA1]),
            I2cTrans::write_read(DEVICE_ADDRESS, vec![RegAddr::Alarm1DayDate as u8], vec![0x80]),
            I2cTrans::write(DEVICE_ADDRESS, vec![RegAddr::Alarm1DayDate as u8, 0x81]),
            I2cTrans::write_read(DEVICE_ADDRESS, vec![RegAddr::Alarm1DayDate as u8], vec![0x81]),
            // Arming routes the pin to interrupts
            I2cTrans::write_read(DEVICE_ADDRESS, vec![RegAddr::Control as u8], vec![0x1C]),
            I2cTrans::write(DEVICE_ADDRESS, vec![RegAddr::Control as u8, 0x1D]),
        ];
        let mock = I2cMock::new(&expectations);
        let mut dev = Ds3231::new(mock, DEVICE_ADDRESS);

        dev.set_alarm(
            AlarmId::One,
            DayDateSelect::Date,
            AlarmMatch::OncePerSecond,
            1,
            1,
            21,
            55,
            0,
        )
        .unwrap();

        let config = dev.alarm_config(AlarmId::One);
        assert_eq!(config.match_mode(), AlarmMatch::OncePerSecond);
        assert_eq!(config.day_date_select(), DayDateSelect::Date);
        assert_eq!(config.seconds(), 0);
        assert_eq!(config.minutes(), 55);
        assert_eq!(config.hours(), 21);
        assert_eq!(config.day_date(), 1);
        assert!(config.is_enabled());
        assert!(!config.is_triggered());
        dev.i2c.done();
    }

    #[test]
    fn test_set_alarm2_minutes_match_on_day() {
        let expectations = [
            // Minutes gate cleared, hours and day/date gates set
            I2cTrans::write_read(DEVICE_ADDRESS, vec![RegAddr::Alarm2Minutes as u8], vec![0x80]),
            I2cTrans::write(DEVICE_ADDRESS, vec![RegAddr::Alarm2Minutes as u8, 0x00]),
            I2cTrans::write_read(DEVICE_ADDRESS, vec![RegAddr::Alarm2Hours as u8], vec![0x00]),
            I2cTrans::write(DEVICE_ADDRESS, vec![RegAddr::Alarm2Hours as u8, 0x80]),
            I2cTrans::write_read(DEVICE_ADDRESS, vec![RegAddr::Alarm2DayDate as u8], vec![0x00]),
            I2cTrans::write(DEVICE_ADDRESS, vec![RegAddr::Alarm2DayDate as u8, 0x80]),
            // No seconds register on alarm 2; fields start at minutes
            I2cTrans::write_read(DEVICE_ADDRESS, vec![RegAddr::Alarm2Minutes as u8], vec![0x00]),
            I2cTrans::write(DEVICE_ADDRESS, vec![RegAddr::Alarm2Minutes as u8, 0x30]),
            I2cTrans::write_read(DEVICE_ADDRESS, vec![RegAddr::Alarm2Minutes as u8], vec![0x30]),
            // 6 o'clock lands in 12-hour AM form
            I2cTrans::write_read(DEVICE_ADDRESS, vec![RegAddr::Alarm2Hours as u8], vec![0x80]),
            I2cTrans::write(DEVICE_ADDRESS, vec![RegAddr::Alarm2Hours as u8, 0xC6]),
            I2cTrans::write_read(DEVICE_ADDRESS, vec![RegAddr::Alarm2Hours as u8], vec![0xC6]),
            // Day-of-week matching sets the DY/DT bit
            I2cTrans::write_read(DEVICE_ADDRESS, vec![RegAddr::Alarm2DayDate as u8], vec![0x80]),
            I2cTrans::write(DEVICE_ADDRESS, vec![RegAddr::Alarm2DayDate as u8, 0xC3]),
            I2cTrans::write_read(DEVICE_ADDRESS, vec![RegAddr::Alarm2DayDate as u8], vec![0xC3]),
            I2cTrans::write_read(DEVICE_ADDRESS, vec![RegAddr::Control as u8], vec![0x1C]),
            I2cTrans::write(DEVICE_ADDRESS, vec![RegAddr::Control as u8, 0x1E]),
        ];
        let mock = I2cMock::new(&expectations);
        let mut dev = Ds3231::new(mock, DEVICE_ADDRESS);

        dev.set_alarm(
            AlarmId::Two,
            DayDateSelect::Day,
            AlarmMatch::MinutesSeconds,
            1,
            3,
            6,
            30,
            45,
        )
        .unwrap();

        let config = dev.alarm_config(AlarmId::Two);
        assert_eq!(config.match_mode(), AlarmMatch::MinutesSeconds);
        assert_eq!(config.day_date_select(), DayDateSelect::Day);
        // The seconds argument is ignored for alarm 2
        assert_eq!(config.seconds(), 0);
        assert_eq!(config.minutes(), 30);
        assert_eq!(config.hours(), 6);
        assert_eq!(config.day_date(), 3);
        assert!(config.is_enabled());
        dev.i2c.done();
    }

    #[test]
    fn test_set_alarm2_rejects_seconds_match_modes() {
        let mock = I2cMock::new(&[]);
        let mut dev = Ds3231::new(mock, DEVICE_ADDRESS);

        assert_eq!(
            dev.set_alarm(
                AlarmId::Two,
                DayDateSelect::Date,
                AlarmMatch::OncePerSecond,
                1,
                1,
                0,
                0,
                0,
            ),
            Err(Error::InvalidMatchMode(AlarmMatch::OncePerSecond))
        );
        assert_eq!(
            dev.set_alarm(
                AlarmId::Two,
                DayDateSelect::Date,
                AlarmMatch::Seconds,
                1,
                1,
                0,
                30,
                0,
            ),
            Err(Error::InvalidMatchMode(AlarmMatch::Seconds))
        );
        assert!(!dev.alarm_config(AlarmId::Two).is_enabled());
        dev.i2c.done();
    }

    #[test]
    fn test_enable_alarm_shuts_down_square_wave() {
        let expectations = [
            // Battery-backed square wave running at 8.192kHz
            I2cTrans::write_read(DEVICE_ADDRESS, vec![RegAddr::Control as u8], vec![0x58]),
            I2cTrans::write(DEVICE_ADDRESS, vec![RegAddr::Control as u8, 0x1D]),
            I2cTrans::write_read(DEVICE_ADDRESS, vec![RegAddr::Control as u8], vec![0x1D]),
            I2cTrans::write(DEVICE_ADDRESS, vec![RegAddr::Control as u8, 0x1C]),
        ];
        let mock = I2cMock::new(&expectations);
        let mut dev = Ds3231::new(mock, DEVICE_ADDRESS);

        dev.enable_alarm(AlarmId::One).unwrap();
        assert!(dev.alarm_config(AlarmId::One).is_enabled());

        dev.disable_alarm(AlarmId::One).unwrap();
        assert!(!dev.alarm_config(AlarmId::One).is_enabled());
        dev.i2c.done();
    }

    #[test]
    fn test_read_alarm_polls_the_status_flag() {
        let expectations = [
            I2cTrans::write_read(DEVICE_ADDRESS, vec![RegAddr::ControlStatus as u8], vec![0x00]),
            I2cTrans::write_read(DEVICE_ADDRESS, vec![RegAddr::ControlStatus as u8], vec![0x01]),
            I2cTrans::write_read(DEVICE_ADDRESS, vec![RegAddr::ControlStatus as u8], vec![0x02]),
        ];
        let mock = I2cMock::new(&expectations);
        let mut dev = Ds3231::new(mock, DEVICE_ADDRESS);

        // Polling until the device raises the flag
        assert!(!dev.read_alarm(AlarmId::One).unwrap());
        assert!(dev.read_alarm(AlarmId::One).unwrap());
        assert!(dev.alarm_config(AlarmId::One).is_triggered());

        assert!(dev.read_alarm(AlarmId::Two).unwrap());
        assert!(dev.alarm_config(AlarmId::One).is_triggered());
        dev.i2c.done();
    }

    #[test]
    fn test_clear_alarm_flag_leaves_other_bits() {
        let expectations = [
            // Both alarm flags and the oscillator-stop flag are set
            I2cTrans::write_read(DEVICE_ADDRESS, vec![RegAddr::ControlStatus as u8], vec![0x83]),
            I2cTrans::write(DEVICE_ADDRESS, vec![RegAddr::ControlStatus as u8, 0x82]),
            I2cTrans::write_read(DEVICE_ADDRESS, vec![RegAddr::ControlStatus as u8], vec![0x82]),
            I2cTrans::write(DEVICE_ADDRESS, vec![RegAddr::ControlStatus as u8, 0x80]),
        ];
        let mock = I2cMock::new(&expectations);
        let mut dev = Ds3231::new(mock, DEVICE_ADDRESS);
        dev.alarm1.triggered = true;
        dev.alarm2.triggered = true;

        dev.clear_alarm_flag(AlarmId::One).unwrap();
        assert!(!dev.alarm_config(AlarmId::One).is_triggered());

        dev.clear_alarm_flag(AlarmId::Two).unwrap();
        assert!(!dev.alarm_config(AlarmId::Two).is_triggered());
        dev.i2c.done();
    }

    #[test]
    fn test_alarm_snooze_advances_ten_minutes() {
        let expectations = [
            I2cTrans::write_read(DEVICE_ADDRESS, vec![RegAddr::Alarm2Minutes as u8], vec![0x30]),
            I2cTrans::write(DEVICE_ADDRESS, vec![RegAddr::Alarm2Minutes as u8, 0x40]),
            I2cTrans::write_read(DEVICE_ADDRESS, vec![RegAddr::ControlStatus as u8], vec![0x02]),
            I2cTrans::write(DEVICE_ADDRESS, vec![RegAddr::ControlStatus as u8, 0x00]),
        ];
        let mock = I2cMock::new(&expectations);
        let mut dev = Ds3231::new(mock, DEVICE_ADDRESS);

        dev.alarm_snooze(AlarmId::Two).unwrap();
        assert_eq!(dev.alarm_config(AlarmId::Two).minutes(), 40);
        assert!(!dev.alarm_config(AlarmId::Two).is_triggered());
        dev.i2c.done();
    }

    #[test]
    fn test_alarm_snooze_wraps_past_the_hour() {
        let expectations = [
            // Minute 55 with the gate bit set; 55 + 10 wraps to 5
            I2cTrans::write_read(DEVICE_ADDRESS, vec![RegAddr::Alarm1Minutes as u8], vec![0xD5]),
            I2cTrans::write(DEVICE_ADDRESS, vec![RegAddr::Alarm1Minutes as u8, 0x85]),
            I2cTrans::write_read(DEVICE_ADDRESS, vec![RegAddr::ControlStatus as u8], vec![0x01]),
            I2cTrans::write(DEVICE_ADDRESS, vec![RegAddr::ControlStatus as u8, 0x00]),
        ];
        let mock = I2cMock::new(&expectations);
        let mut dev = Ds3231::new(mock, DEVICE_ADDRESS);

        dev.alarm_snooze(AlarmId::One).unwrap();
        assert_eq!(dev.alarm_config(AlarmId::One).minutes(), 5);
        assert!(!dev.alarm_config(AlarmId::One).is_triggered());
        dev.i2c.done();
    }
}
