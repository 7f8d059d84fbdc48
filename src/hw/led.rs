// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! On-board LEDs.
//!
//! The LaunchPad RGB LED sits on PF1 (red), PF2 (blue) and PF3 (green), all active-high. Red
//! shares its pin with the motor PWM output, so only blue and green are used as status LEDs:
//! blue while the controller is seeking, green once the goal is reached.

use embedded_hal::digital::v2::OutputPin;

use crate::control::ControlMode;

/// Pin level that corresponds to "on" for the board wiring.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ActiveLevel {
    High,
    Low,
}

impl ActiveLevel {
    /// Whether the pin sits high in the given logical state.
    #[inline]
    pub fn drives_high(self, active: bool) -> bool {
        active == (self == ActiveLevel::High)
    }
}

/// Single LED. The pin is left alone until the first [`Led::set`].
pub struct Led<PIN> {
    pin: PIN,
    active: ActiveLevel,
    lit: Option<bool>,
}

impl<PIN: OutputPin> Led<PIN> {
    pub fn new(pin: PIN, active: ActiveLevel) -> Self {
        Self {
            pin,
            active,
            lit: None,
        }
    }

    /// Light or darken the LED. Writes the pin only when the state changes.
    pub fn set(&mut self, on: bool) -> Result<(), PIN::Error> {
        if self.lit == Some(on) {
            return Ok(());
        }
        if self.active.drives_high(on) {
            self.pin.set_high()?;
        } else {
            self.pin.set_low()?;
        }
        self.lit = Some(on);
        Ok(())
    }

    #[inline]
    pub fn is_lit(&self) -> bool {
        self.lit == Some(true)
    }

    pub fn free(self) -> PIN {
        self.pin
    }
}

/// Blue/green pair showing the controller mode.
pub struct StatusLeds<B, G> {
    seeking: Led<B>,
    holding: Led<G>,
}

impl<B, G> StatusLeds<B, G>
where
    B: OutputPin,
    G: OutputPin<Error = B::Error>,
{
    pub fn new(blue: B, green: G) -> Self {
        Self {
            seeking: Led::new(blue, ActiveLevel::High),
            holding: Led::new(green, ActiveLevel::High),
        }
    }

    /// Light the LED for `mode` and darken the other.
    pub fn show(&mut self, mode: ControlMode) -> Result<(), B::Error> {
        self.seeking.set(mode == ControlMode::Seeking)?;
        self.holding.set(mode == ControlMode::Holding)
    }

    /// Both dark, while the motor is disarmed.
    pub fn clear(&mut self) -> Result<(), B::Error> {
        self.seeking.set(false)?;
        self.holding.set(false)
    }

    /// Lit state as `(seeking, holding)`.
    pub fn lit(&self) -> (bool, bool) {
        (self.seeking.is_lit(), self.holding.is_lit())
    }

    pub fn free(self) -> (B, G) {
        (self.seeking.free(), self.holding.free())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal_mock::eh0::digital::{Mock, State, Transaction};

    #[test]
    fn active_low_inverts() {
        let pin = Mock::new(&[Transaction::set(State::Low), Transaction::set(State::High)]);
        let mut led = Led::new(pin, ActiveLevel::Low);
        assert!(!led.is_lit());

        led.set(true).unwrap();
        led.set(true).unwrap();
        assert!(led.is_lit());
        led.set(false).unwrap();
        assert!(!led.is_lit());
        led.free().done();
    }

    #[test]
    fn levels() {
        assert!(ActiveLevel::High.drives_high(true));
        assert!(!ActiveLevel::High.drives_high(false));
        assert!(!ActiveLevel::Low.drives_high(true));
        assert!(ActiveLevel::Low.drives_high(false));
    }

    #[test]
    fn status_follows_mode_once() {
        let blue = Mock::new(&[Transaction::set(State::High), Transaction::set(State::Low)]);
        let green = Mock::new(&[Transaction::set(State::Low), Transaction::set(State::High)]);

        let mut leds = StatusLeds::new(blue, green);
        leds.show(ControlMode::Seeking).unwrap();
        leds.show(ControlMode::Seeking).unwrap();
        assert_eq!(leds.lit(), (true, false));
        leds.show(ControlMode::Holding).unwrap();
        assert_eq!(leds.lit(), (false, true));

        let (mut blue, mut green) = leds.free();
        blue.done();
        green.done();
    }

    #[test]
    fn clear_darkens_until_next_show() {
        let blue = Mock::new(&[Transaction::set(State::Low)]);
        let green = Mock::new(&[
            Transaction::set(State::High),
            Transaction::set(State::Low),
            Transaction::set(State::High),
        ]);

        let mut leds = StatusLeds::new(blue, green);
        leds.show(ControlMode::Holding).unwrap();
        leds.clear().unwrap();
        assert_eq!(leds.lit(), (false, false));
        leds.show(ControlMode::Holding).unwrap();
        assert_eq!(leds.lit(), (false, true));

        let (mut blue, mut green) = leds.free();
        blue.done();
        green.done();
    }
}
