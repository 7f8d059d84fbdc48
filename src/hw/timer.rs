// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Periodic general-purpose timers using direct PAC register access.
//!
//! Each 16/32-bit GPTM is run as one 32-bit periodic down-counter (timer A). A timer can raise its
//! own timeout interrupt, trigger the ADC, or both.
//!
//! Example:
//! ```ignore
//! let mut tim = PeriodicTimer::periodic(dp.TIMER1, &sc.power_control, SYSTEM_CLOCK_HZ, 2_000)?;
//! tim.listen();
//! tim.start();
//! ```

use core::ops::Deref;

use tm4c123x::{timer0, TIMER0, TIMER1, TIMER2};
use tm4c123x_hal::sysctl::{self, Domain, PowerControl, PowerState, RunMode};

use crate::config::timer_reload;
use crate::Error;

/// GPTMTAMR.TAMR = periodic
const TAMR_PERIODIC: u32 = 0x2;
/// GPTMCTL.TAEN
const CTL_TAEN: u32 = 1 << 0;
/// GPTMCTL.TAOTE
const CTL_TAOTE: u32 = 1 << 5;
/// GPTMIMR.TATOIM / GPTMICR.TATOCINT
const TATO: u32 = 1 << 0;

/// Timer peripheral that can be powered through SYSCTL.
pub trait Instance: Deref<Target = timer0::RegisterBlock> {
    const DOMAIN: Domain;
}

impl Instance for TIMER0 {
    const DOMAIN: Domain = Domain::Timer0;
}

impl Instance for TIMER1 {
    const DOMAIN: Domain = Domain::Timer1;
}

impl Instance for TIMER2 {
    const DOMAIN: Domain = Domain::Timer2;
}

pub struct PeriodicTimer<TIM> {
    tim: TIM,
    reload: u32,
}

impl<TIM: Instance> PeriodicTimer<TIM> {
    /// Power the timer and load it for `freq_hz` out of `clock_hz`. The timer is left stopped.
    pub fn periodic(
        tim: TIM,
        pc: &PowerControl,
        clock_hz: u32,
        freq_hz: u32,
    ) -> Result<Self, Error> {
        let reload = timer_reload(clock_hz, freq_hz)?;

        sysctl::control_power(pc, TIM::DOMAIN, RunMode::Run, PowerState::On);
        sysctl::reset(pc, TIM::DOMAIN);

        // Disable while configuring
        tim.ctl.modify(|r, w| unsafe { w.bits(r.bits() & !CTL_TAEN) });

        // 32-bit concatenated mode, periodic, count down
        tim.cfg.write(|w| unsafe { w.bits(0) });
        tim.tamr.write(|w| unsafe { w.bits(TAMR_PERIODIC) });
        tim.tailr.write(|w| unsafe { w.bits(reload) });
        tim.icr.write(|w| unsafe { w.bits(TATO) });

        Ok(Self { tim, reload })
    }

    /// Route the timeout to the ADC trigger input.
    pub fn enable_adc_trigger(&mut self) {
        self.tim
            .ctl
            .modify(|r, w| unsafe { w.bits(r.bits() | CTL_TAOTE) });
    }

    /// Raise the timeout interrupt.
    pub fn listen(&mut self) {
        self.tim.imr.modify(|r, w| unsafe { w.bits(r.bits() | TATO) });
    }

    pub fn start(&mut self) {
        self.tim.ctl.modify(|r, w| unsafe { w.bits(r.bits() | CTL_TAEN) });
    }

    pub fn stop(&mut self) {
        self.tim.ctl.modify(|r, w| unsafe { w.bits(r.bits() & !CTL_TAEN) });
    }

    /// Acknowledge the timeout. Call first thing in the interrupt handler.
    #[inline]
    pub fn clear_interrupt(&mut self) {
        self.tim.icr.write(|w| unsafe { w.bits(TATO) });
    }

    #[inline]
    pub fn reload(&self) -> u32 {
        self.reload
    }

    pub fn free(self) -> TIM {
        self.tim
    }
}
