//! Driving an indicator from the alarm poll loop.
//!
//! Hosts that poll [`crate::Ds3231::read_alarm`] usually surface the
//! result on a LED or buzzer pin. [`AlarmIndicator`] wraps such a pin,
//! claiming it in a known off state and offering level and toggle
//! control with readback.

use embedded_hal::digital::{InputPin, OutputPin};

/// An output pin claimed for alarm signaling.
///
/// The wrapped pin must also implement [`InputPin`] so the driven level
/// can be read back for [`AlarmIndicator::toggle`] and
/// [`AlarmIndicator::is_on`]. Errors are the pin's own.
#[derive(Debug)]
pub struct AlarmIndicator<P> {
    pin: P,
}

impl<P: OutputPin + InputPin> AlarmIndicator<P> {
    /// Claims the pin and drives it off.
    pub fn new(mut pin: P) -> Result<Self, P::Error> {
        pin.set_low()?;
        Ok(Self { pin })
    }

    /// Drives the indicator on.
    pub fn on(&mut self) -> Result<(), P::Error> {
        self.pin.set_high()
    }

    /// Drives the indicator off.
    pub fn off(&mut self) -> Result<(), P::Error> {
        self.pin.set_low()
    }

    /// Drives the indicator to the given state.
    pub fn set(&mut self, on: bool) -> Result<(), P::Error> {
        if on {
            self.on()
        } else {
            self.off()
        }
    }

    /// Flips the indicator to the opposite of its current level.
    pub fn toggle(&mut self) -> Result<(), P::Error> {
        let on = self.is_on()?;
        self.set(!on)
    }

    /// Reads the level currently on the pin.
    pub fn is_on(&mut self) -> Result<bool, P::Error> {
        self.pin.is_high()
    }

    /// Releases the underlying pin.
    pub fn release(self) -> P {
        self.pin
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal_mock::eh1::digital::{
        Mock as PinMock, State as PinState, Transaction as PinTrans,
    };

    #[test]
    fn test_new_claims_the_pin_off() {
        let expectations = [PinTrans::set(PinState::Low)];
        let pin = PinMock::new(&expectations);

        let indicator = AlarmIndicator::new(pin).unwrap();

        let mut pin = indicator.release();
        pin.done();
    }

    #[test]
    fn test_level_control() {
        let expectations = [
            PinTrans::set(PinState::Low),
            PinTrans::set(PinState::High),
            PinTrans::set(PinState::Low),
            PinTrans::set(PinState::High),
            PinTrans::set(PinState::Low),
        ];
        let pin = PinMock::new(&expectations);
        let mut indicator = AlarmIndicator::new(pin).unwrap();

        indicator.on().unwrap();
        indicator.off().unwrap();
        indicator.set(true).unwrap();
        indicator.set(false).unwrap();

        let mut pin = indicator.release();
        pin.done();
    }

    #[test]
    fn test_toggle_reads_then_flips() {
        let expectations = [
            PinTrans::set(PinState::Low),
            PinTrans::get(PinState::Low),
            PinTrans::set(PinState::High),
            PinTrans::get(PinState::High),
            PinTrans::set(PinState::Low),
        ];
        let pin = PinMock::new(&expectations);
        let mut indicator = AlarmIndicator::new(pin).unwrap();

        indicator.toggle().unwrap();
        indicator.toggle().unwrap();

        let mut pin = indicator.release();
        pin.done();
    }

    #[test]
    fn test_is_on_reads_the_pin() {
        let expectations = [
            PinTrans::set(PinState::Low),
            PinTrans::get(PinState::High),
            PinTrans::get(PinState::Low),
        ];
        let pin = PinMock::new(&expectations);
        let mut indicator = AlarmIndicator::new(pin).unwrap();

        assert!(indicator.is_on().unwrap());
        assert!(!indicator.is_on().unwrap());

        let mut pin = indicator.release();
        pin.done();
    }
}
