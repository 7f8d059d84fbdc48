// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Conversions from raw 12-bit ADC codes to physical units.
//!
//! All functions here are pure. The load-cell chain is linear and floating point; the on-die
//! temperature sensor formulas keep the truncating integer arithmetic used by earlier logged
//! data, so identical raw codes produce identical readings.

/// Largest 12-bit ADC code.
pub const ADC_FULL_SCALE: u16 = 4095;

/// ADC reference voltage on the Tiva shield.
pub const REFERENCE_VOLTS: f32 = 3.3;

/// Load-cell amplifier calibration, pounds per volt.
pub const LOAD_PER_VOLT: f32 = 25.0;

/// Linear calibration of the load-cell channel.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LoadCellCalibration {
    /// Voltage corresponding to a full-scale code.
    pub reference_volts: f32,
    /// Full-scale ADC code.
    pub full_scale: u16,
    /// Force per volt at the ADC pin.
    pub load_per_volt: f32,
}

impl LoadCellCalibration {
    pub const DEFAULT: Self = Self {
        reference_volts: REFERENCE_VOLTS,
        full_scale: ADC_FULL_SCALE,
        load_per_volt: LOAD_PER_VOLT,
    };

    #[inline]
    pub fn adc_to_voltage(&self, raw: u16) -> f32 {
        (raw as f32) * self.reference_volts / (self.full_scale as f32)
    }

    #[inline]
    pub fn voltage_to_load(&self, volts: f32) -> f32 {
        volts * self.load_per_volt
    }

    /// Raw code straight to force.
    #[inline]
    pub fn raw_to_load(&self, raw: u16) -> f32 {
        self.voltage_to_load(self.adc_to_voltage(raw))
    }
}

impl Default for LoadCellCalibration {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Convert a raw code to volts with the default calibration (`raw * 3.3 / 4095`).
pub fn adc_to_voltage(raw: u16) -> f32 {
    LoadCellCalibration::DEFAULT.adc_to_voltage(raw)
}

/// Convert volts at the ADC pin to pounds with the default calibration (`volts * 25`).
pub fn voltage_to_load(volts: f32) -> f32 {
    LoadCellCalibration::DEFAULT.voltage_to_load(volts)
}

/// On-die temperature sensor code to whole degrees Celsius.
///
/// `(1475 - 2475 * raw / 4096) / 10`, every division truncating toward zero.
pub fn raw_to_celsius(raw: u16) -> i32 {
    (1475 - (2475 * raw as i32) / 4096) / 10
}

/// Whole degrees Celsius to whole degrees Fahrenheit, `(c * 9 + 160) / 5` truncated.
pub fn celsius_to_fahrenheit(celsius: i32) -> i32 {
    (celsius * 9 + 160) / 5
}
