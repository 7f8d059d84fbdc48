// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Load cell on AIN0 (PE3), read through a [`SampleCell`].
//!
//! The ADC interrupt publishes raw 12-bit codes into the cell. [`LoadCell`] is a cheap `Copy`
//! view that converts the latest code into volts and pounds on demand; it never touches the
//! converter itself.

use crate::sampling::SampleCell;
use crate::units::LoadCellCalibration;

/// Anything that can report the current force on the rig.
pub trait LoadSensor {
    /// Latest load, in force units.
    fn load(&self) -> f32;

    /// Conversion counter of the underlying source, if it has one.
    fn sequence(&self) -> Option<u32> {
        None
    }
}

impl<T: LoadSensor + ?Sized> LoadSensor for &T {
    fn load(&self) -> f32 {
        (**self).load()
    }

    fn sequence(&self) -> Option<u32> {
        (**self).sequence()
    }
}

/// Calibrated reader over a shared sample cell.
#[derive(Copy, Clone)]
pub struct LoadCell<'a> {
    cell: &'a SampleCell,
    calibration: LoadCellCalibration,
}

impl<'a> LoadCell<'a> {
    pub fn new(cell: &'a SampleCell) -> Self {
        Self::with_calibration(cell, LoadCellCalibration::DEFAULT)
    }

    pub fn with_calibration(cell: &'a SampleCell, calibration: LoadCellCalibration) -> Self {
        Self { cell, calibration }
    }

    /// Latest raw ADC code.
    #[inline]
    pub fn raw(&self) -> u16 {
        self.cell.latest()
    }

    /// Latest sample in volts.
    #[inline]
    pub fn voltage(&self) -> f32 {
        self.calibration.adc_to_voltage(self.raw())
    }

    #[inline]
    pub fn calibration(&self) -> &LoadCellCalibration {
        &self.calibration
    }
}

impl LoadSensor for LoadCell<'_> {
    fn load(&self) -> f32 {
        self.calibration.raw_to_load(self.raw())
    }

    fn sequence(&self) -> Option<u32> {
        Some(self.cell.sequence())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_latest_sample() {
        let cell = SampleCell::new();
        let load_cell = LoadCell::new(&cell);
        assert_eq!(load_cell.load(), 0.0);
        assert_eq!(load_cell.sequence(), Some(0));

        cell.publish(4095);
        assert_eq!(load_cell.raw(), 4095);
        assert!((load_cell.voltage() - 3.3).abs() < 1e-4);
        assert!((load_cell.load() - 82.5).abs() < 1e-3);
        assert_eq!(load_cell.sequence(), Some(1));
    }

    #[test]
    fn custom_calibration() {
        let cell = SampleCell::new();
        cell.publish(4095);
        let load_cell = LoadCell::with_calibration(
            &cell,
            LoadCellCalibration {
                load_per_volt: 10.0,
                ..LoadCellCalibration::DEFAULT
            },
        );
        assert!((load_cell.load() - 33.0).abs() < 1e-3);
    }

    #[test]
    fn reference_forwards() {
        let cell = SampleCell::new();
        cell.publish(2048);
        let load_cell = LoadCell::new(&cell);

        fn read<S: LoadSensor>(sensor: S) -> (f32, Option<u32>) {
            (sensor.load(), sensor.sequence())
        }
        assert_eq!(read(&load_cell), (load_cell.load(), Some(1)));
    }
}
