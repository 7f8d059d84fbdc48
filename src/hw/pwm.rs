// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Motor PWM on PWM1 generator 2, output B (M1PWM5 on PF1).
//!
//! The generator counts down from LOAD. The output goes high at LOAD and low on the CMPB match
//! while counting down, so the high time is `LOAD - CMPB` ticks of the PWM clock.

use tm4c123x::{PWM1, SYSCTL};
use tm4c123x_hal::sysctl::{self, Domain, PowerControl, PowerState, RunMode};

use crate::drivers::PwmOutput;

/// RCC.USEPWMDIV
const RCC_USEPWMDIV: u32 = 1 << 20;
/// RCC.PWMDIV field, value 0 selects /2
const RCC_PWMDIV_MASK: u32 = 0x7 << 17;

/// GENB: drive high on LOAD, drive low on CMPB while counting down
const GENB_ACTLOAD_HIGH: u32 = 0x3 << 2;
const GENB_ACTCMPBD_LOW: u32 = 0x2 << 10;

/// _2_CTL.ENABLE
const CTL_ENABLE: u32 = 1 << 0;
/// ENABLE.PWM5EN
const PWM5EN: u32 = 1 << 5;

/// LOAD and CMPB are 16 bits wide.
const MAX_LOAD: u32 = 0xFFFF;

pub struct MotorPwm {
    pwm: PWM1,
    load: u32,
}

impl MotorPwm {
    /// Power PWM1, select the system clock / 2 as PWM clock and start generator 2 with the output
    /// disconnected. PF1 must already be muxed to M1PWM5.
    pub fn new(pwm: PWM1, pc: &PowerControl) -> Self {
        sysctl::control_power(pc, Domain::Pwm1, RunMode::Run, PowerState::On);
        sysctl::reset(pc, Domain::Pwm1);

        let sc = unsafe { &*SYSCTL::ptr() };
        sc.rcc
            .modify(|r, w| unsafe { w.bits((r.bits() & !RCC_PWMDIV_MASK) | RCC_USEPWMDIV) });

        pwm._2_ctl.write(|w| unsafe { w.bits(0) });
        pwm._2_genb
            .write(|w| unsafe { w.bits(GENB_ACTLOAD_HIGH | GENB_ACTCMPBD_LOW) });
        pwm._2_load.write(|w| unsafe { w.bits(0) });
        pwm._2_cmpb.write(|w| unsafe { w.bits(0) });
        pwm._2_ctl.write(|w| unsafe { w.bits(CTL_ENABLE) });
        pwm.enable.modify(|r, w| unsafe { w.bits(r.bits() & !PWM5EN) });

        Self { pwm, load: 0 }
    }

    pub fn free(self) -> PWM1 {
        self.pwm
    }
}

impl PwmOutput for MotorPwm {
    fn set_period(&mut self, period: u32) {
        self.load = period.saturating_sub(1).min(MAX_LOAD);
        self.pwm._2_load.write(|w| unsafe { w.bits(self.load) });
    }

    fn set_pulse_width(&mut self, width: u32) {
        let cmpb = self.load - width.min(self.load);
        self.pwm._2_cmpb.write(|w| unsafe { w.bits(cmpb) });
    }

    fn set_output_enabled(&mut self, enabled: bool) {
        self.pwm.enable.modify(|r, w| unsafe {
            if enabled {
                w.bits(r.bits() | PWM5EN)
            } else {
                w.bits(r.bits() & !PWM5EN)
            }
        });
    }
}
