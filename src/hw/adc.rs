// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! ADC0 support for TM4C123 using direct PAC register access.
//!
//! Two sample sequencers are used:
//! - SS3: one sample of AIN0 (PE3), started by a timer trigger, for the load cell
//! - SS1: one sample of the on-die temperature sensor, started by software
//!
//! Hardware averaging applies to the whole converter. Reads never wait: an empty FIFO answers
//! `WouldBlock` and the caller keeps whatever it had.
//!
//! Example:
//! ```ignore
//! let adc = Adc0::new(dp.ADC0, &sc.power_control, HardwareAveraging::X16);
//! let (mut load_cell, _temp) = adc.split();
//! load_cell.configure();
//! // ADC0SS3 interrupt
//! SAMPLE.complete(load_cell.read());
//! ```

use core::convert::Infallible;

use tm4c123x::{adc0, ADC0};
use tm4c123x_hal::sysctl::{self, Domain, PowerControl, PowerState, RunMode};

use crate::sampling::HardwareAveraging;
use crate::units::ADC_FULL_SCALE;

/// ADCEMUX.EMn: timer trigger
const EMUX_TIMER: u32 = 0x5;
/// ADCSSCTLn step-0 bits
const CTL_END0: u32 = 1 << 1;
const CTL_IE0: u32 = 1 << 2;
const CTL_TS0: u32 = 1 << 3;
/// ADCSSFSTATn.EMPTY
const FSTAT_EMPTY: u32 = 1 << 8;

const SS1: u32 = 1 << 1;
const SS3: u32 = 1 << 3;

/// PE3 (AIN0)
const PE3: u32 = 1 << 3;

#[inline]
fn regs() -> &'static adc0::RegisterBlock {
    unsafe { &*ADC0::ptr() }
}

/// Powered ADC0 with averaging configured, before the sequencers are split off.
pub struct Adc0 {
    adc: ADC0,
}

impl Adc0 {
    pub fn new(adc: ADC0, pc: &PowerControl, averaging: HardwareAveraging) -> Self {
        sysctl::control_power(pc, Domain::Adc0, RunMode::Run, PowerState::On);
        sysctl::reset(pc, Domain::Adc0);

        adc.actss.write(|w| unsafe { w.bits(0) });
        adc.sac.write(|w| unsafe { w.bits(averaging.sac_bits()) });

        Self { adc }
    }

    /// Hand the sequencers out to their owners.
    pub fn split(self) -> (LoadCellChannel, TempSensorChannel) {
        (
            LoadCellChannel { _adc: self.adc },
            TempSensorChannel { _private: () },
        )
    }
}

/// Timer-triggered single conversion of AIN0 on sequencer 3.
pub struct LoadCellChannel {
    _adc: ADC0,
}

impl LoadCellChannel {
    /// Route PE3 to the converter and arm SS3 on the timer trigger with its interrupt enabled.
    pub fn configure(&mut self, pc: &PowerControl) {
        sysctl::control_power(pc, Domain::GpioE, RunMode::Run, PowerState::On);
        let porte = unsafe { &*tm4c123x::GPIO_PORTE::ptr() };
        porte.dir.modify(|r, w| unsafe { w.bits(r.bits() & !PE3) });
        porte.afsel.modify(|r, w| unsafe { w.bits(r.bits() | PE3) });
        porte.den.modify(|r, w| unsafe { w.bits(r.bits() & !PE3) });
        porte.amsel.modify(|r, w| unsafe { w.bits(r.bits() | PE3) });

        let adc = regs();
        adc.actss.modify(|r, w| unsafe { w.bits(r.bits() & !SS3) });
        adc.emux
            .modify(|r, w| unsafe { w.bits((r.bits() & !(0xF << 12)) | (EMUX_TIMER << 12)) });
        adc.ssmux3.write(|w| unsafe { w.bits(0) });
        adc.ssctl3.write(|w| unsafe { w.bits(CTL_IE0 | CTL_END0) });
        adc.isc.write(|w| unsafe { w.bits(SS3) });
        adc.im.modify(|r, w| unsafe { w.bits(r.bits() | SS3) });
        adc.actss.modify(|r, w| unsafe { w.bits(r.bits() | SS3) });
    }

    /// Acknowledge the sequencer interrupt and pop the conversion, if there is one.
    pub fn read(&mut self) -> nb::Result<u16, Infallible> {
        let adc = regs();
        adc.isc.write(|w| unsafe { w.bits(SS3) });

        if adc.ssfstat3.read().bits() & FSTAT_EMPTY != 0 {
            return Err(nb::Error::WouldBlock);
        }
        Ok(adc.ssfifo3.read().bits() as u16 & ADC_FULL_SCALE)
    }
}

/// Software-started conversion of the internal temperature sensor on sequencer 1.
pub struct TempSensorChannel {
    _private: (),
}

impl TempSensorChannel {
    pub fn configure(&mut self) {
        let adc = regs();
        adc.actss.modify(|r, w| unsafe { w.bits(r.bits() & !SS1) });
        // EM1 = processor
        adc.emux.modify(|r, w| unsafe { w.bits(r.bits() & !(0xF << 4)) });
        adc.ssmux1.write(|w| unsafe { w.bits(0) });
        adc.ssctl1
            .write(|w| unsafe { w.bits(CTL_TS0 | CTL_IE0 | CTL_END0) });
        adc.isc.write(|w| unsafe { w.bits(SS1) });
        adc.im.modify(|r, w| unsafe { w.bits(r.bits() | SS1) });
        adc.actss.modify(|r, w| unsafe { w.bits(r.bits() | SS1) });
    }

    /// Kick off one conversion. Completion raises ADC0SS1.
    #[inline]
    pub fn start_conversion(&mut self) {
        regs().pssi.write(|w| unsafe { w.bits(SS1) });
    }

    pub fn read(&mut self) -> nb::Result<u16, Infallible> {
        let adc = regs();
        adc.isc.write(|w| unsafe { w.bits(SS1) });

        if adc.ssfstat1.read().bits() & FSTAT_EMPTY != 0 {
            return Err(nb::Error::WouldBlock);
        }
        Ok(adc.ssfifo1.read().bits() as u16 & ADC_FULL_SCALE)
    }
}
