// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Push buttons.
//!
//! SW1 on the LaunchPad is PF4, wired to ground with the internal pull-up enabled, so it reads
//! low while pressed.

use embedded_hal::digital::v2::InputPin;

use crate::hw::led::ActiveLevel;

/// Button with press-edge detection.
pub struct Button<PIN: InputPin> {
    pin: PIN,
    active: ActiveLevel,
    was_pressed: bool,
}

impl<PIN: InputPin> Button<PIN> {
    pub fn new(pin: PIN, active: ActiveLevel) -> Self {
        Self {
            pin,
            active,
            was_pressed: false,
        }
    }

    /// Button that pulls the pin to ground.
    pub fn active_low(pin: PIN) -> Self {
        Self::new(pin, ActiveLevel::Low)
    }

    /// Current level, translated through the active level.
    pub fn is_pressed(&self) -> Result<bool, PIN::Error> {
        match self.active {
            ActiveLevel::High => self.pin.is_high(),
            ActiveLevel::Low => self.pin.is_low(),
        }
    }

    /// True exactly once per press, on the released-to-pressed transition.
    pub fn pressed_edge(&mut self) -> Result<bool, PIN::Error> {
        let pressed = self.is_pressed()?;
        let edge = pressed && !self.was_pressed;
        self.was_pressed = pressed;
        Ok(edge)
    }

    pub fn free(self) -> PIN {
        self.pin
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal_mock::eh0::digital::{Mock, State, Transaction};

    #[test]
    fn edge_fires_once_per_press() {
        let pin = Mock::new(&[
            Transaction::get(State::High),
            Transaction::get(State::Low),
            Transaction::get(State::Low),
            Transaction::get(State::High),
            Transaction::get(State::Low),
        ]);
        let mut button = Button::active_low(pin);

        let edges: Vec<bool> = (0..5).map(|_| button.pressed_edge().unwrap()).collect();
        assert_eq!(edges, [false, true, false, false, true]);
        button.free().done();
    }

    #[test]
    fn active_high_level() {
        let pin = Mock::new(&[Transaction::get(State::High), Transaction::get(State::Low)]);
        let button = Button::new(pin, ActiveLevel::High);
        assert!(button.is_pressed().unwrap());
        assert!(!button.is_pressed().unwrap());
        button.free().done();
    }
}
