// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Brushed DC motor channel: one PWM output for speed and one GPIO for direction.
//!
//! Wiring on the Tiva shield:
//! - PF1 (M1PWM5): motor driver PWM input
//! - PB7: motor driver direction input (high = up, low = down)
//!
//! Duty cycles are percentages. [`MotorChannel::send_command`] takes a magnitude and a direction;
//! [`MotorChannel::check_limits`] takes a signed duty, splits the sign off into the direction and
//! clamps the magnitude to 100 before sending. The PWM output stage is only enabled while the duty
//! is non-zero and the channel is armed, and it is only written when that state changes.

use embedded_hal::digital::v2::OutputPin;

use crate::Error;

/// Largest duty cycle, percent.
pub const MAX_DUTY: f32 = 100.0;

/// Hardware PWM generator driving the motor.
pub trait PwmOutput {
    /// Set the PWM period in PWM clock ticks.
    fn set_period(&mut self, period: u32);

    /// Set the active pulse width in PWM clock ticks.
    fn set_pulse_width(&mut self, width: u32);

    /// Connect or disconnect the PWM signal from the pin.
    fn set_output_enabled(&mut self, enabled: bool);
}

/// Logical drive direction.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    /// Negative command, direction pin low.
    Down,
    /// Non-negative command, direction pin high.
    Up,
}

impl Direction {
    /// `0` for down, `1` for up.
    #[inline]
    pub fn bit(self) -> u8 {
        match self {
            Direction::Down => 0,
            Direction::Up => 1,
        }
    }
}

impl From<bool> for Direction {
    fn from(up: bool) -> Self {
        if up {
            Direction::Up
        } else {
            Direction::Down
        }
    }
}

/// Duty magnitude plus direction, as handed to the motor.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ActuatorCommand {
    /// Percent, `0..=100`
    pub duty: f32,
    pub direction: Direction,
}

impl ActuatorCommand {
    /// Zero duty, pin low. The state the motor powers up in.
    pub const IDLE: Self = Self {
        duty: 0.0,
        direction: Direction::Down,
    };

    /// Split a signed duty into direction and clamped magnitude.
    ///
    /// Negative values always map to [`Direction::Down`]. NaN is treated as zero.
    pub fn from_signed(duty: f32) -> Self {
        if duty.is_nan() {
            return Self {
                duty: 0.0,
                direction: Direction::Up,
            };
        }

        let (magnitude, direction) = if duty < 0.0 {
            (-duty, Direction::Down)
        } else {
            (duty, Direction::Up)
        };

        Self {
            duty: magnitude.min(MAX_DUTY),
            direction,
        }
    }

    /// Duty with the direction folded back into the sign.
    pub fn signed(&self) -> f32 {
        match self.direction {
            Direction::Up => self.duty,
            Direction::Down => -self.duty,
        }
    }
}

/// Motor channel bound to a PWM generator and a direction pin.
pub struct MotorChannel<PWM, DIR> {
    pwm: PWM,
    dir: DIR,

    /// PWM period in PWM clock ticks
    period: u32,
    /// Last pulse width written
    pulse_width: u32,

    output_enabled: bool,
    armed: bool,
    last: ActuatorCommand,
}

impl<PWM, DIR> MotorChannel<PWM, DIR>
where
    PWM: PwmOutput,
    DIR: OutputPin,
{
    /// Configure the generator for `pwm_frequency_hz` out of `pwm_clock_hz`.
    ///
    /// The channel starts armed, at zero width, with the output stage disabled.
    pub fn new(
        mut pwm: PWM,
        dir: DIR,
        pwm_clock_hz: u32,
        pwm_frequency_hz: u32,
    ) -> Result<Self, Error> {
        if pwm_frequency_hz == 0 {
            return Err(Error::ZeroFrequency);
        }
        let period = pwm_clock_hz / pwm_frequency_hz;
        if period == 0 {
            return Err(Error::FrequencyTooHigh);
        }

        pwm.set_period(period);
        pwm.set_pulse_width(0);
        pwm.set_output_enabled(false);

        Ok(Self {
            pwm,
            dir,
            period,
            pulse_width: 0,
            output_enabled: false,
            armed: true,
            last: ActuatorCommand::IDLE,
        })
    }

    /// Send a duty magnitude (percent, clamped to `0..=100`) and direction.
    pub fn send_command(&mut self, duty: f32, direction: Direction) -> Result<(), DIR::Error> {
        let duty = if duty.is_nan() {
            0.0
        } else {
            duty.clamp(0.0, MAX_DUTY)
        };

        match direction {
            Direction::Down => self.dir.set_low()?,
            Direction::Up => self.dir.set_high()?,
        }

        let width = self.pulse_width_for(duty);
        self.pwm.set_pulse_width(width);
        self.pulse_width = width;
        self.last = ActuatorCommand { duty, direction };

        self.update_output_stage();
        Ok(())
    }

    /// Send a signed duty: sign picks the direction, magnitude is clamped to 100.
    pub fn check_limits(&mut self, duty: f32) -> Result<ActuatorCommand, DIR::Error> {
        let command = ActuatorCommand::from_signed(duty);
        self.send_command(command.duty, command.direction)?;
        Ok(self.last)
    }

    /// Arm the channel. The output stage turns on if the current duty is non-zero.
    pub fn enable(&mut self) {
        self.armed = true;
        self.update_output_stage();
    }

    /// Disarm the channel and turn the output stage off. Commands are still recorded.
    pub fn disable(&mut self) {
        self.armed = false;
        self.update_output_stage();
    }

    /// Pulse width for a duty percentage.
    #[inline]
    pub fn pulse_width_for(&self, duty: f32) -> u32 {
        (duty / 100.0 * self.period as f32) as u32
    }

    #[inline]
    pub fn period(&self) -> u32 {
        self.period
    }

    #[inline]
    pub fn pulse_width(&self) -> u32 {
        self.pulse_width
    }

    #[inline]
    pub fn last_command(&self) -> ActuatorCommand {
        self.last
    }

    #[inline]
    pub fn is_armed(&self) -> bool {
        self.armed
    }

    #[inline]
    pub fn is_output_enabled(&self) -> bool {
        self.output_enabled
    }

    /// Release the PWM generator and direction pin.
    pub fn free(self) -> (PWM, DIR) {
        (self.pwm, self.dir)
    }

    fn update_output_stage(&mut self) {
        let wanted = self.armed && self.last.duty != 0.0;
        if wanted != self.output_enabled {
            self.pwm.set_output_enabled(wanted);
            self.output_enabled = wanted;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakePwm;
    use embedded_hal_mock::eh0::digital::{Mock as PinMock, State as PinState, Transaction as PinTransaction};

    fn channel(expect: &[PinTransaction]) -> MotorChannel<FakePwm, PinMock> {
        MotorChannel::new(FakePwm::default(), PinMock::new(expect), 40_000_000, 10_000).unwrap()
    }

    #[test]
    fn init_disables_output_at_zero_width() {
        let motor = channel(&[]);
        assert_eq!(motor.period(), 4_000);
        assert!(!motor.is_output_enabled());
        assert_eq!(motor.last_command(), ActuatorCommand::IDLE);

        let (pwm, mut dir) = motor.free();
        assert_eq!(pwm.period, 4_000);
        assert_eq!(pwm.width, 0);
        assert!(!pwm.enabled);
        dir.done();
    }

    #[test]
    fn zero_frequency_is_rejected() {
        let result = MotorChannel::new(FakePwm::default(), PinMock::new(&[]), 40_000_000, 0);
        assert!(matches!(result, Err(Error::ZeroFrequency)));

        let result = MotorChannel::new(FakePwm::default(), PinMock::new(&[]), 1_000, 2_000);
        assert!(matches!(result, Err(Error::FrequencyTooHigh)));
    }

    #[test]
    fn positive_duty_drives_up() {
        let mut motor = channel(&[PinTransaction::set(PinState::High)]);
        let command = motor.check_limits(25.0).unwrap();

        assert_eq!(command, ActuatorCommand { duty: 25.0, direction: Direction::Up });
        assert_eq!(motor.pulse_width(), 1_000);
        assert!(motor.is_output_enabled());

        let (pwm, mut dir) = motor.free();
        assert_eq!(pwm.width, 1_000);
        assert!(pwm.enabled);
        dir.done();
    }

    #[test]
    fn negative_duty_drives_down_and_clamps() {
        let mut motor = channel(&[PinTransaction::set(PinState::Low)]);
        let command = motor.check_limits(-250.0).unwrap();

        assert_eq!(command, ActuatorCommand { duty: 100.0, direction: Direction::Down });
        assert_eq!(motor.pulse_width(), 4_000);

        let (_pwm, mut dir) = motor.free();
        dir.done();
    }

    #[test]
    fn split_bounds_and_sign() {
        for duty in [-1e6, -100.5, -42.0, -0.01, 0.0, 0.01, 42.0, 100.0, 1e6] {
            let command = ActuatorCommand::from_signed(duty);
            assert!(command.duty >= 0.0 && command.duty <= 100.0);
            let expected = if duty < 0.0 { Direction::Down } else { Direction::Up };
            assert_eq!(command.direction, expected, "duty {}", duty);
        }
        assert_eq!(ActuatorCommand::from_signed(f32::NAN).duty, 0.0);
        assert_eq!(ActuatorCommand::from_signed(-30.0).signed(), -30.0);
    }

    #[test]
    fn low_level_command_clamps_magnitude() {
        let mut motor = channel(&[
            PinTransaction::set(PinState::High),
            PinTransaction::set(PinState::Low),
        ]);
        motor.send_command(150.0, Direction::Up).unwrap();
        assert_eq!(motor.last_command().duty, 100.0);
        motor.send_command(-5.0, Direction::Down).unwrap();
        assert_eq!(motor.last_command().duty, 0.0);
        assert!(!motor.is_output_enabled());

        let (_pwm, mut dir) = motor.free();
        dir.done();
    }

    #[test]
    fn output_stage_follows_zero_duty() {
        let mut motor = channel(&[
            PinTransaction::set(PinState::High),
            PinTransaction::set(PinState::High),
            PinTransaction::set(PinState::High),
            PinTransaction::set(PinState::Low),
        ]);

        motor.check_limits(10.0).unwrap();
        assert!(motor.is_output_enabled());
        motor.check_limits(20.0).unwrap();
        motor.check_limits(0.0).unwrap();
        assert!(!motor.is_output_enabled());
        motor.check_limits(-5.0).unwrap();
        assert!(motor.is_output_enabled());

        let (pwm, mut dir) = motor.free();
        // init, on, off, on
        assert_eq!(pwm.toggles, 4);
        dir.done();
    }

    #[test]
    fn disarmed_channel_keeps_output_off() {
        let mut motor = channel(&[
            PinTransaction::set(PinState::High),
            PinTransaction::set(PinState::High),
        ]);

        motor.disable();
        motor.check_limits(40.0).unwrap();
        assert!(!motor.is_armed());
        assert!(!motor.is_output_enabled());
        assert_eq!(motor.pulse_width(), 1_600);

        motor.enable();
        assert!(motor.is_output_enabled());

        motor.check_limits(40.0).unwrap();
        let (pwm, mut dir) = motor.free();
        assert!(pwm.enabled);
        assert_eq!(pwm.toggles, 2);
        dir.done();
    }
}
