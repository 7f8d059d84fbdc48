// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Force controller state machine.
//!
//! The controller starts in [`ControlMode::Seeking`]. Each [`ControllerState::step`] computes
//! `error = goal - measured`, runs the adaptive PID law and returns a signed command. Once the
//! goal criterion fires the controller latches into [`ControlMode::Holding`]: every later step
//! returns `0` and the PID state is frozen. Only [`ControllerState::init`] clears the latch.
//!
//! The latching step still returns the PID output it computed; the zero command starts with the
//! following step.
//!
//! The default [`GoalCriterion::Signed`] compares the signed error against the threshold, so any
//! overshoot (negative error) also latches. [`GoalCriterion::Absolute`] compares `|error|`.

#[allow(unused_imports)]
use micromath::F32Ext;

use crate::control::pid::{AdaptivePid, Gains, IntegralLimits};

/// Goal threshold, in force units.
pub const GOAL_THRESHOLD: f32 = 0.05;

/// How the goal-reached latch compares the error against the threshold.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GoalCriterion {
    /// `error < threshold`
    Signed,
    /// `|error| < threshold`
    Absolute,
}

impl GoalCriterion {
    pub fn is_met(self, error: f32, threshold: f32) -> bool {
        match self {
            GoalCriterion::Signed => error < threshold,
            GoalCriterion::Absolute => error.abs() < threshold,
        }
    }
}

/// Operating mode of the force controller.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ControlMode {
    /// Closed-loop control toward the goal force.
    Seeking,

    /// Goal reached; output held at zero until re-initialized.
    Holding,
}

/// Gains and thresholds, fixed at initialization.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ControllerConfig {
    pub gains: Gains,
    pub integral_limits: IntegralLimits,
    pub goal_threshold: f32,
    pub goal_criterion: GoalCriterion,
}

impl ControllerConfig {
    pub const DEFAULT: Self = Self {
        gains: Gains::DEFAULT,
        integral_limits: IntegralLimits::DEFAULT,
        goal_threshold: GOAL_THRESHOLD,
        goal_criterion: GoalCriterion::Signed,
    };
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Everything the force controller remembers between ticks.
#[derive(Clone, Debug)]
pub struct ControllerState {
    config: ControllerConfig,
    pid: AdaptivePid,

    goal_force: f32,
    goal_reached: bool,

    /// Error computed by the last seeking step
    error: f32,
    /// Signed command produced by the last step
    output: f32,
}

impl ControllerState {
    /// New controller with no goal (0), a clear latch and an empty integrator.
    pub fn new(config: ControllerConfig) -> Self {
        Self {
            config,
            pid: AdaptivePid::new(config.gains).with_integral_limits(config.integral_limits),
            goal_force: 0.0,
            goal_reached: false,
            error: 0.0,
            output: 0.0,
        }
    }

    /// Re-initialize toward `goal_force`: clears the latch, the integrator and the error history.
    pub fn init(&mut self, goal_force: f32) {
        self.pid.reset();
        self.goal_force = goal_force;
        self.goal_reached = false;
        self.error = 0.0;
        self.output = 0.0;
    }

    /// Change the setpoint without touching the latch or the integrator.
    pub fn set_goal_force(&mut self, goal_force: f32) {
        self.goal_force = goal_force;
    }

    /// Run one control step against `measured_load` and return the signed command.
    ///
    /// `measured_load` is ignored while holding.
    pub fn step(&mut self, measured_load: f32) -> f32 {
        if self.goal_reached {
            return self.hold();
        }

        let error = self.goal_force - measured_load;
        self.error = error;

        if self
            .config
            .goal_criterion
            .is_met(error, self.config.goal_threshold)
        {
            self.goal_reached = true;
        }

        self.output = self.pid.update(error);
        self.output
    }

    /// Step taken while holding: the command is forced to zero and nothing accumulates.
    pub fn hold(&mut self) -> f32 {
        self.output = 0.0;
        self.output
    }

    #[inline]
    pub fn mode(&self) -> ControlMode {
        if self.goal_reached {
            ControlMode::Holding
        } else {
            ControlMode::Seeking
        }
    }

    #[inline]
    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    #[inline]
    pub fn goal_force(&self) -> f32 {
        self.goal_force
    }

    #[inline]
    pub fn goal_reached(&self) -> bool {
        self.goal_reached
    }

    #[inline]
    pub fn error(&self) -> f32 {
        self.error
    }

    #[inline]
    pub fn last_error(&self) -> f32 {
        self.pid.last_error()
    }

    #[inline]
    pub fn total_error(&self) -> f32 {
        self.pid.total_error()
    }

    #[inline]
    pub fn proportional_gain(&self) -> f32 {
        self.pid.proportional_gain()
    }

    #[inline]
    pub fn output(&self) -> f32 {
        self.output
    }
}

impl Default for ControllerState {
    fn default() -> Self {
        Self::new(ControllerConfig::DEFAULT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    fn seeking(goal: f32) -> ControllerState {
        let mut state = ControllerState::default();
        state.init(goal);
        state
    }

    #[test]
    fn one_tick_below_goal() {
        let mut state = seeking(50.0);
        let out = state.step(45.0);

        assert_eq!(state.mode(), ControlMode::Seeking);
        assert!(close(state.error(), 5.0));
        assert!(close(state.total_error(), 5.0));
        assert!(close(state.proportional_gain(), 0.5));
        assert!(close(out, 2.55));
        assert_eq!(state.output(), out);
    }

    #[test]
    fn small_error_latches_goal() {
        let mut state = seeking(50.0);
        state.step(49.97);
        assert!(state.goal_reached());
        assert_eq!(state.mode(), ControlMode::Holding);
    }

    #[test]
    fn holding_forces_zero_output() {
        let mut state = seeking(50.0);
        // Latching tick still reports the PID output.
        let latched = state.step(49.99);
        assert!(state.goal_reached());
        assert!(latched != 0.0);

        let total = state.total_error();
        for load in [0.0, 10.0, 49.0, 80.0, -5.0] {
            assert_eq!(state.step(load), 0.0);
            assert_eq!(state.output(), 0.0);
            assert!(state.goal_reached());
        }
        assert_eq!(state.total_error(), total);
    }

    #[test]
    fn signed_criterion_latches_on_overshoot() {
        let mut state = seeking(50.0);
        state.step(60.0);
        assert!(state.goal_reached());
    }

    #[test]
    fn absolute_criterion_keeps_seeking_on_overshoot() {
        let mut state = ControllerState::new(ControllerConfig {
            goal_criterion: GoalCriterion::Absolute,
            ..ControllerConfig::DEFAULT
        });
        state.init(50.0);

        let out = state.step(60.0);
        assert!(!state.goal_reached());
        assert!(out < 0.0);

        state.step(50.01);
        assert!(state.goal_reached());
    }

    #[test]
    fn init_clears_latch() {
        let mut state = seeking(50.0);
        state.step(50.0);
        assert!(state.goal_reached());

        state.init(20.0);
        assert_eq!(state.mode(), ControlMode::Seeking);
        assert_eq!(state.total_error(), 0.0);
        assert_eq!(state.goal_force(), 20.0);
        assert!(state.step(10.0) > 0.0);
    }

    #[test]
    fn integral_stays_within_limits() {
        let mut state = seeking(100.0);
        for _ in 0..20 {
            state.step(0.0);
            assert!((0.0..=100.0).contains(&state.total_error()));
        }
        assert_eq!(state.total_error(), 100.0);
    }

    #[test]
    fn set_goal_keeps_integrator() {
        let mut state = seeking(50.0);
        state.step(45.0);
        state.set_goal_force(60.0);
        assert!(close(state.total_error(), 5.0));
        state.step(45.0);
        assert!(close(state.error(), 15.0));
        assert!(close(state.total_error(), 20.0));
    }
}
