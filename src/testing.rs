// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Host-side stand-ins for board peripherals, shared by the unit tests.

use core::cell::Cell;
use core::convert::Infallible;

use embedded_hal::digital::v2::OutputPin;

use crate::drivers::{LoadSensor, PwmOutput};

/// Records what the motor channel wrote to the PWM generator.
#[derive(Default, Debug)]
pub struct FakePwm {
    pub period: u32,
    pub width: u32,
    pub enabled: bool,
    /// Number of writes to the output enable
    pub toggles: u32,
}

impl PwmOutput for FakePwm {
    fn set_period(&mut self, period: u32) {
        self.period = period;
    }

    fn set_pulse_width(&mut self, width: u32) {
        self.width = width;
    }

    fn set_output_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        self.toggles += 1;
    }
}

/// Output pin that only remembers its level.
#[derive(Default, Debug)]
pub struct FakePin {
    pub high: bool,
}

impl OutputPin for FakePin {
    type Error = Infallible;

    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.high = false;
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.high = true;
        Ok(())
    }
}

/// Load sensor whose reading the test sets directly.
pub struct FixedLoad<'a> {
    pub load: &'a Cell<f32>,
}

impl LoadSensor for FixedLoad<'_> {
    fn load(&self) -> f32 {
        self.load.get()
    }
}
