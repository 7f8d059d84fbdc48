// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! PID law with an error-scaled proportional gain.
//!
//! Works in `no_std` and does not allocate memory.
//!
//! The proportional gain is recomputed every update as `base_gain * |error|`, so the P term grows
//! with the square of the error. The integrator is clamped to [`IntegralLimits`], which default to
//! `[0, 100]`: accumulated error can never go negative.

#[allow(unused_imports)]
use micromath::F32Ext;

/// Lower bound of the accumulated error.
pub const MIN_STEADY_ERROR: f32 = 0.0;
/// Upper bound of the accumulated error.
pub const MAX_STEADY_ERROR: f32 = 100.0;

/// Tunable gains.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Gains {
    /// Proportional base constant, multiplied by `|error|` each update
    pub base_gain: f32,
    /// Integral gain
    pub ki: f32,
    /// Derivative gain (disabled by default)
    pub kd: f32,
}

impl Gains {
    pub const DEFAULT: Self = Self {
        base_gain: 0.1,
        ki: 0.01,
        kd: 0.0,
    };
}

impl Default for Gains {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Anti-windup clamp for the accumulated error.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct IntegralLimits {
    pub min: f32,
    pub max: f32,
}

impl IntegralLimits {
    pub const DEFAULT: Self = Self {
        min: MIN_STEADY_ERROR,
        max: MAX_STEADY_ERROR,
    };

    /// Clamp `e` into `[min, max]`. NaN collapses to `min`.
    pub fn clamp(&self, e: f32) -> f32 {
        if e.is_nan() {
            return self.min;
        }

        let mut e = e;
        if e > self.max {
            e = self.max;
        }
        if e < self.min {
            e = self.min;
        }
        e
    }
}

impl Default for IntegralLimits {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Clamp an accumulated error into `[MIN_STEADY_ERROR, MAX_STEADY_ERROR]`.
pub fn check_integral_limit(e: f32) -> f32 {
    IntegralLimits::DEFAULT.clamp(e)
}

/// PID state: gains, error history and integrator.
#[derive(Clone, Debug)]
pub struct AdaptivePid {
    gains: Gains,
    limits: IntegralLimits,

    /// Proportional gain used by the last update
    kp: f32,
    /// Error seen by the last update (for the derivative term)
    last_error: f32,
    /// Clamped running sum of errors
    total_error: f32,
}

impl AdaptivePid {
    pub fn new(gains: Gains) -> Self {
        Self {
            gains,
            limits: IntegralLimits::DEFAULT,
            kp: 0.0,
            last_error: 0.0,
            total_error: 0.0,
        }
    }

    /// Set integral limits for anti-windup.
    pub fn with_integral_limits(mut self, limits: IntegralLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Reset integrator, derivative history and the adapted gain.
    pub fn reset(&mut self) {
        self.kp = 0.0;
        self.last_error = 0.0;
        self.total_error = 0.0;
    }

    /// Run one update on `error = setpoint - measurement` and return the unclamped output.
    pub fn update(&mut self, error: f32) -> f32 {
        // ----- P term -----
        self.kp = self.gains.base_gain * error.abs();
        let p = self.kp * error;

        // ----- D term -----
        let d = self.gains.kd * (error - self.last_error);
        self.last_error = error;

        // ----- I term -----
        self.total_error = self.limits.clamp(self.total_error + error);
        let i = self.gains.ki * self.total_error;

        p + d + i
    }

    #[inline]
    pub fn gains(&self) -> Gains {
        self.gains
    }

    #[inline]
    pub fn proportional_gain(&self) -> f32 {
        self.kp
    }

    #[inline]
    pub fn last_error(&self) -> f32 {
        self.last_error
    }

    #[inline]
    pub fn total_error(&self) -> f32 {
        self.total_error
    }
}
