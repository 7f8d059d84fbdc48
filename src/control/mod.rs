// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Control Algorithms
//!
//! This module provides the closed-loop force control for the rig.
//!
//! ## Modules
//!
//! - [`pid`] - PID law with an error-scaled proportional gain and a clamped integrator.
//! - [`force`] - Goal latch and controller state, independent of any hardware.
//! - [`force_loop`] - Periodic tick that ties a load sensor, the controller and the motor together.

pub mod force;
pub mod force_loop;
pub mod pid;

pub use force::{ControlMode, ControllerConfig, ControllerState, GoalCriterion, GOAL_THRESHOLD};
pub use force_loop::ForceLoop;
pub use pid::{check_integral_limit, AdaptivePid, Gains, IntegralLimits};
