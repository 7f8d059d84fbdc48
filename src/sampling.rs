// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Sample cells shared between an ADC interrupt and its readers.
//!
//! A [`SampleCell`] holds only the most recent conversion. The interrupt that owns the converter
//! is its single writer; any number of readers may load from it at any time. There is no queue
//! and no backpressure, so the newest sample always wins.
//!
//! A sequence counter is bumped on every completed conversion. Readers that compare sequence
//! numbers between two reads can tell a fresh sample from a stale one. The counter and the value
//! are separate atomics, so a reader racing the writer may pair a new value with the old count.

use core::convert::Infallible;
use core::sync::atomic::{AtomicU16, AtomicU32, Ordering};

use crate::config::timer_reload;
use crate::units::ADC_FULL_SCALE;
use crate::Error;

/// Hardware oversampling applied by the ADC before a sample reaches software.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum HardwareAveraging {
    X2,
    X4,
    X8,
    X16,
    X32,
    X64,
}

impl HardwareAveraging {
    pub fn from_factor(factor: u8) -> Result<Self, Error> {
        match factor {
            2 => Ok(Self::X2),
            4 => Ok(Self::X4),
            8 => Ok(Self::X8),
            16 => Ok(Self::X16),
            32 => Ok(Self::X32),
            64 => Ok(Self::X64),
            n => Err(Error::UnsupportedAveraging(n)),
        }
    }

    pub fn factor(self) -> u8 {
        1 << self.sac_bits()
    }

    /// Encoding for the ADCSAC register (log2 of the factor).
    pub fn sac_bits(self) -> u32 {
        match self {
            Self::X2 => 1,
            Self::X4 => 2,
            Self::X8 => 3,
            Self::X16 => 4,
            Self::X32 => 5,
            Self::X64 => 6,
        }
    }
}

/// Timer-triggered sampling setup.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SamplingConfig {
    pub frequency_hz: u32,
    pub averaging: HardwareAveraging,
}

impl SamplingConfig {
    /// Reload value for the trigger timer.
    pub fn reload(&self, clock_hz: u32) -> Result<u32, Error> {
        timer_reload(clock_hz, self.frequency_hz)
    }
}

/// Latest-value mailbox for one ADC channel.
pub struct SampleCell {
    raw: AtomicU16,
    sequence: AtomicU32,
}

impl SampleCell {
    pub const fn new() -> Self {
        Self {
            raw: AtomicU16::new(0),
            sequence: AtomicU32::new(0),
        }
    }

    /// Store a completed conversion. Codes are masked to 12 bits.
    pub fn publish(&self, raw: u16) {
        self.raw.store(raw & ADC_FULL_SCALE, Ordering::Release);
        self.sequence.fetch_add(1, Ordering::Release);
    }

    /// Store the outcome of a FIFO read.
    ///
    /// `WouldBlock` means the converter had nothing to hand over; the previous value stays in
    /// place. Returns whether a new sample was stored.
    pub fn complete(&self, conversion: nb::Result<u16, Infallible>) -> bool {
        match conversion {
            Ok(raw) => {
                self.publish(raw);
                true
            }
            Err(nb::Error::WouldBlock) => false,
            Err(nb::Error::Other(never)) => match never {},
        }
    }

    /// Last completed conversion. Never blocks.
    #[inline]
    pub fn latest(&self) -> u16 {
        self.raw.load(Ordering::Acquire)
    }

    /// Number of conversions stored so far (wrapping).
    #[inline]
    pub fn sequence(&self) -> u32 {
        self.sequence.load(Ordering::Acquire)
    }
}

impl Default for SampleCell {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newest_sample_wins() {
        let cell = SampleCell::new();
        assert_eq!(cell.latest(), 0);
        cell.publish(100);
        cell.publish(2000);
        assert_eq!(cell.latest(), 2000);
        assert_eq!(cell.sequence(), 2);
    }

    #[test]
    fn codes_are_twelve_bit() {
        let cell = SampleCell::new();
        cell.publish(0xFFFF);
        assert_eq!(cell.latest(), 4095);
        cell.publish(0x1001);
        assert_eq!(cell.latest(), 1);
    }

    #[test]
    fn busy_conversion_keeps_previous_value() {
        let cell = SampleCell::new();
        assert!(cell.complete(Ok(1234)));
        assert!(!cell.complete(Err(nb::Error::WouldBlock)));
        assert_eq!(cell.latest(), 1234);
        assert_eq!(cell.sequence(), 1);
    }

    #[test]
    fn averaging_factors() {
        for (n, bits) in [(2u8, 1u32), (4, 2), (8, 3), (16, 4), (32, 5), (64, 6)] {
            let avg = HardwareAveraging::from_factor(n).unwrap();
            assert_eq!(avg.sac_bits(), bits);
            assert_eq!(avg.factor(), n);
        }
        assert_eq!(
            HardwareAveraging::from_factor(3),
            Err(Error::UnsupportedAveraging(3))
        );
        assert_eq!(
            HardwareAveraging::from_factor(1),
            Err(Error::UnsupportedAveraging(1))
        );
    }

    #[test]
    fn sampling_reload() {
        let cfg = SamplingConfig {
            frequency_hz: 500,
            averaging: HardwareAveraging::X16,
        };
        assert_eq!(cfg.reload(80_000_000), Ok(159_999));

        let cfg = SamplingConfig {
            frequency_hz: 0,
            ..cfg
        };
        assert_eq!(cfg.reload(80_000_000), Err(Error::ZeroFrequency));
    }
}
