// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Crate-wide error type.
//!
//! Only configuration can fail. Duty commands are clamped rather than rejected, a busy converter
//! or transport is reported through [`nb::Error::WouldBlock`], and a stale sensor value is
//! counted but never surfaced as an error.

use core::fmt;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Error {
    /// A timer, sampling or PWM frequency of 0 Hz.
    ZeroFrequency,

    /// The requested frequency is higher than the clock that has to produce it.
    FrequencyTooHigh,

    /// Hardware averaging factor other than 2, 4, 8, 16, 32 or 64.
    UnsupportedAveraging(u8),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::ZeroFrequency => f.write_str("frequency must be non-zero"),
            Error::FrequencyTooHigh => f.write_str("frequency exceeds source clock"),
            Error::UnsupportedAveraging(n) => {
                write!(f, "unsupported hardware averaging factor {}", n)
            }
        }
    }
}
