// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Tiva Force Firmware
//!
//! This crate contains the firmware components for the Tiva shield force-control rig, written in
//! Rust, targeting a TM4C123GH6PM MCU. A load cell is sampled by a timer-triggered ADC, a PID
//! loop computes a motor command every controller tick, and a logger streams telemetry over the
//! debug UART.
//!
//! ## Crate Structure
//!
//! | Module | Purpose |
//! | ------ | -------- |
//! | [`hw`] | MCU-level wrappers around ADC, PWM, timers, UART, LEDs and buttons |
//! | [`drivers`] | Device-level drivers (load cell, DC motor channel) |
//! | [`control`] | Control algorithms (adaptive-gain PID, force controller, control loop) |
//! | [`sampling`] | Single-slot sample cells shared between interrupts |
//! | [`units`] | Raw ADC code to physical unit conversions |
//! | [`telemetry`] | Telemetry records, the controller state mailbox and the logger |
//! | [`config`] | Board constants and default configuration |
//!
//! Everything outside the register-level parts of [`hw`] is portable and unit-tested on the host.
//!
//! ## Getting Started
//!
//! Run the host tests:
//!
//! ```bash
//! cargo test
//! ```
//!
//! Flash the board:
//!
//! ```bash
//! cargo run --release --target thumbv7em-none-eabihf
//! ```
//!
//! ## License
//!
//! Licensed under the **MIT License**.
//! See the `LICENSE` file in the repository root for full terms.
//!
//! © 2025–2026 Christopher Liu

#![cfg_attr(not(test), no_std)]

pub mod config;
pub mod control;
pub mod drivers;
pub mod error;
pub mod hw;
pub mod sampling;
pub mod telemetry;
pub mod units;

pub use error::Error;

#[cfg(test)]
mod testing;
