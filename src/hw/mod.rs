// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! MCU-level wrappers.
//!
//! `button`, `led` and `usart` are written against `embedded-hal` traits and build everywhere.
//! The rest touch TM4C123 registers and only exist on the target.

pub mod button;
pub mod led;
pub mod usart;

#[cfg(target_os = "none")]
pub mod adc;
#[cfg(target_os = "none")]
pub mod pins;
#[cfg(target_os = "none")]
pub mod pwm;
#[cfg(target_os = "none")]
pub mod timer;

pub use button::Button;
pub use led::{ActiveLevel, Led, StatusLeds};
pub use usart::{Console, QueuedSink, TxDrain};

#[cfg(target_os = "none")]
pub use adc::{Adc0, LoadCellChannel, TempSensorChannel};
#[cfg(target_os = "none")]
pub use pins::BoardPins;
#[cfg(target_os = "none")]
pub use pwm::MotorPwm;
#[cfg(target_os = "none")]
pub use timer::PeriodicTimer;
