//! Status LED helper
//!
//! Boards using the PSSI typically flag transfer completion or errors on an
//! LED. [`Led`] wraps any `embedded_hal` output pin and hides the board's
//! wiring polarity.

use embedded_hal::digital::OutputPin;

/// Electrical level that lights the LED
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ActiveLevel {
    /// LED lights when the pin is high
    #[default]
    High,
    /// LED lights when the pin is low
    Low,
}

/// LED driven by an output pin
#[derive(Debug)]
pub struct Led<P: OutputPin> {
    pin: P,
    active: ActiveLevel,
    is_on: bool,
}

impl<P: OutputPin> Led<P> {
    /// Wrap `pin` and switch the LED off
    pub fn new(pin: P, active: ActiveLevel) -> Result<Self, P::Error> {
        let mut led = Self {
            pin,
            active,
            is_on: true,
        };
        led.off()?;
        Ok(led)
    }

    /// LED lit by a high pin level
    pub fn active_high(pin: P) -> Result<Self, P::Error> {
        Self::new(pin, ActiveLevel::High)
    }

    /// LED lit by a low pin level
    pub fn active_low(pin: P) -> Result<Self, P::Error> {
        Self::new(pin, ActiveLevel::Low)
    }

    /// Drive the LED on (`true`) or off (`false`)
    pub fn set(&mut self, on: bool) -> Result<(), P::Error> {
        match (self.active, on) {
            (ActiveLevel::High, true) | (ActiveLevel::Low, false) => self.pin.set_high()?,
            (ActiveLevel::High, false) | (ActiveLevel::Low, true) => self.pin.set_low()?,
        }
        self.is_on = on;
        Ok(())
    }

    /// Light the LED
    #[inline]
    pub fn on(&mut self) -> Result<(), P::Error> {
        self.set(true)
    }

    /// Switch the LED off
    #[inline]
    pub fn off(&mut self) -> Result<(), P::Error> {
        self.set(false)
    }

    /// Invert the LED
    pub fn toggle(&mut self) -> Result<(), P::Error> {
        self.set(!self.is_on)
    }

    /// Last state written
    #[inline]
    pub fn is_on(&self) -> bool {
        self.is_on
    }

    /// Release the pin
    pub fn free(self) -> P {
        self.pin
    }
}
