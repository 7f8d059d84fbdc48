// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Periodic force control loop.
//!
//! [`ForceLoop`] owns the motor channel and the controller state and is driven from the
//! controller timer interrupt. Each [`ForceLoop::tick`] reads the latest load, steps the
//! controller, sends the resulting signed duty to the motor and publishes the outcome to the
//! [`StateMailbox`] for the logger.
//!
//! Typical usage pattern:
//!
//! ```ignore
//! force_loop.init(50.0);
//! force_loop.enable();
//!
//! // controller timer interrupt
//! force_loop.tick()?;
//! ```
//!
//! The loop never waits for a fresh sample. If the sensor reports the same conversion counter
//! twice in a row the tick proceeds with the old value and the stale tick is counted.

use embedded_hal::digital::v2::OutputPin;

use crate::control::{ControlMode, ControllerConfig, ControllerState};
use crate::drivers::{ActuatorCommand, LoadSensor, MotorChannel, PwmOutput};
use crate::telemetry::StateMailbox;

/// Controller state bound to its sensor, its motor and the telemetry mailbox.
pub struct ForceLoop<'a, S, PWM, DIR> {
    sensor: S,
    motor: MotorChannel<PWM, DIR>,
    state: ControllerState,
    mailbox: &'a StateMailbox,

    /// Ticks do nothing until enabled
    enabled: bool,

    last_sequence: Option<u32>,
    stale_ticks: u32,
}

impl<'a, S, PWM, DIR> ForceLoop<'a, S, PWM, DIR>
where
    S: LoadSensor,
    PWM: PwmOutput,
    DIR: OutputPin,
{
    pub fn new(
        sensor: S,
        motor: MotorChannel<PWM, DIR>,
        config: ControllerConfig,
        mailbox: &'a StateMailbox,
    ) -> Self {
        Self {
            sensor,
            motor,
            state: ControllerState::new(config),
            mailbox,
            enabled: false,
            last_sequence: None,
            stale_ticks: 0,
        }
    }

    /// Start over toward `goal_force`. Clears the goal latch, the integrator and the stale count.
    pub fn init(&mut self, goal_force: f32) {
        self.state.init(goal_force);
        self.last_sequence = None;
        self.stale_ticks = 0;
    }

    /// Let ticks run.
    pub fn enable(&mut self) {
        self.enabled = true;
    }

    /// Stop ticking and command zero duty.
    pub fn disable(&mut self) -> Result<(), DIR::Error> {
        self.enabled = false;
        let command = self.motor.check_limits(0.0)?;
        self.mailbox.publish(
            self.state.error(),
            self.state.hold(),
            self.state.goal_reached(),
            command,
        );
        Ok(())
    }

    /// Arm or disarm the motor output stage. The controller keeps running either way.
    pub fn set_armed(&mut self, armed: bool) {
        if armed {
            self.motor.enable();
        } else {
            self.motor.disable();
        }
    }

    /// Run one control period. Returns the command sent, or `None` while disabled.
    pub fn tick(&mut self) -> Result<Option<ActuatorCommand>, DIR::Error> {
        if !self.enabled {
            return Ok(None);
        }

        let output = match self.state.mode() {
            ControlMode::Holding => self.state.hold(),

            ControlMode::Seeking => {
                // Counter before value: a sample landing mid-read is seen fresh next tick
                self.track_freshness();
                let load = self.sensor.load();
                self.state.step(load)
            }
        };

        let command = self.motor.check_limits(output)?;
        self.mailbox.publish(
            self.state.error(),
            output,
            self.state.goal_reached(),
            command,
        );

        Ok(Some(command))
    }

    fn track_freshness(&mut self) {
        if let Some(sequence) = self.sensor.sequence() {
            if self.last_sequence == Some(sequence) {
                self.stale_ticks = self.stale_ticks.wrapping_add(1);
            }
            self.last_sequence = Some(sequence);
        }
    }

    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    #[inline]
    pub fn state(&self) -> &ControllerState {
        &self.state
    }

    #[inline]
    pub fn motor(&self) -> &MotorChannel<PWM, DIR> {
        &self.motor
    }

    #[inline]
    pub fn motor_mut(&mut self) -> &mut MotorChannel<PWM, DIR> {
        &mut self.motor
    }

    /// Ticks that reused a sample already seen by the previous tick.
    #[inline]
    pub fn stale_ticks(&self) -> u32 {
        self.stale_ticks
    }

    /// Release the sensor and the motor channel.
    pub fn free(self) -> (S, MotorChannel<PWM, DIR>) {
        (self.sensor, self.motor)
    }
}
