// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Device-Specific Drivers
//!
//! This module contains device-specific drivers that sit above the raw `hw/` layer and below the
//! application logic. Drivers talk to hardware through small traits so the control code can be
//! exercised on the host.
//!
//! ## Existing drivers
//!
//! - [`load_cell`] – load cell on AIN0, read from the ADC sample cell
//! - [`motor`] – brushed DC motor driven by one PWM output and one direction pin

pub mod load_cell;
pub mod motor;

pub use load_cell::{LoadCell, LoadSensor};
pub use motor::{ActuatorCommand, Direction, MotorChannel, PwmOutput, MAX_DUTY};
