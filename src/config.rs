// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Board constants and default configuration for the Tiva shield force rig.

use crate::control::{ControllerConfig, GoalCriterion};
use crate::sampling::{HardwareAveraging, SamplingConfig};
use crate::units::LoadCellCalibration;
use crate::Error;

/// System clock after PLL setup (16 MHz crystal, 400 MHz PLL, /5).
pub const SYSTEM_CLOCK_HZ: u32 = 80_000_000;

/// PWM module clock (system clock / 2).
pub const PWM_CLOCK_HZ: u32 = SYSTEM_CLOCK_HZ / 2;

pub const LOAD_SAMPLE_HZ: u32 = 500;
pub const CONTROLLER_HZ: u32 = 2_000;
pub const LOGGER_HZ: u32 = 10;
pub const MOTOR_PWM_HZ: u32 = 10_000;
pub const BAUD_RATE: u32 = 115_200;

/// Telemetry bytes waiting for UART0. The queue keeps one slot free.
pub const TELEMETRY_QUEUE_LEN: usize = 512;

/// Default force setpoint, pounds.
pub const GOAL_FORCE_LB: f32 = 50.0;

/// Goal criterion the firmware is built with.
pub const GOAL_CRITERION: GoalCriterion = if cfg!(feature = "absolute-goal") {
    GoalCriterion::Absolute
} else {
    GoalCriterion::Signed
};

/// Everything the firmware needs to bring the rig up.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Config {
    pub sampling: SamplingConfig,
    pub calibration: LoadCellCalibration,
    pub controller: ControllerConfig,
    pub controller_hz: u32,
    pub logger_hz: u32,
    pub pwm_hz: u32,
    pub baud_rate: u32,
    pub goal_force: f32,
}

impl Config {
    pub const DEFAULT: Self = Self {
        sampling: SamplingConfig {
            frequency_hz: LOAD_SAMPLE_HZ,
            averaging: HardwareAveraging::X16,
        },
        calibration: LoadCellCalibration::DEFAULT,
        controller: ControllerConfig {
            goal_criterion: GOAL_CRITERION,
            ..ControllerConfig::DEFAULT
        },
        controller_hz: CONTROLLER_HZ,
        logger_hz: LOGGER_HZ,
        pwm_hz: MOTOR_PWM_HZ,
        baud_rate: BAUD_RATE,
        goal_force: GOAL_FORCE_LB,
    };
}

impl Default for Config {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Reload value for a periodic down-counter: `clock_hz / freq_hz - 1`.
pub fn timer_reload(clock_hz: u32, freq_hz: u32) -> Result<u32, Error> {
    if freq_hz == 0 {
        return Err(Error::ZeroFrequency);
    }
    match clock_hz / freq_hz {
        0 => Err(Error::FrequencyTooHigh),
        ticks => Ok(ticks - 1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reload_values() {
        assert_eq!(timer_reload(SYSTEM_CLOCK_HZ, CONTROLLER_HZ), Ok(39_999));
        assert_eq!(timer_reload(SYSTEM_CLOCK_HZ, LOGGER_HZ), Ok(7_999_999));
        assert_eq!(timer_reload(SYSTEM_CLOCK_HZ, SYSTEM_CLOCK_HZ), Ok(0));
    }

    #[test]
    fn reload_rejects_bad_frequencies() {
        assert_eq!(timer_reload(SYSTEM_CLOCK_HZ, 0), Err(Error::ZeroFrequency));
        assert_eq!(
            timer_reload(1_000, 2_000),
            Err(Error::FrequencyTooHigh)
        );
    }

    #[test]
    fn default_config() {
        let cfg = Config::default();
        assert_eq!(cfg.sampling.averaging.factor(), 16);
        assert_eq!(cfg.goal_force, 50.0);
        assert_eq!(cfg.controller.goal_criterion, GOAL_CRITERION);
        assert_eq!(PWM_CLOCK_HZ / cfg.pwm_hz, 4_000);
    }

    #[test]
    fn telemetry_queue_fits_longest_line() {
        // Worst case every byte is a newline and gains a CR
        assert!(TELEMETRY_QUEUE_LEN - 1 >= 2 * crate::telemetry::LINE_CAPACITY);
        // One record period of line time at the configured baud rate
        assert!(TELEMETRY_QUEUE_LEN as u32 <= BAUD_RATE / 10 / LOGGER_HZ);
    }
}
