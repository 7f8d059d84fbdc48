// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Pin definitions for the TM4C123GH6PM LaunchPad with the Tiva shield.
//!
//! PE3 (AIN0, load cell) is muxed to the ADC by [`crate::hw::adc`] and does not appear here.

use tm4c123x::{GPIO_PORTA, GPIO_PORTB, GPIO_PORTF};
use tm4c123x_hal::{
    gpio::{
        gpioa, gpiob, gpiof, AlternateFunction, GpioExt, Input, Output, PullUp, PushPull, AF1,
        AF5,
    },
    sysctl::PowerControl,
};

/// All board pins. Construct this once at startup using:
///
/// ```ignore
/// let pins = BoardPins::new(dp.GPIO_PORTA, dp.GPIO_PORTB, dp.GPIO_PORTF, &sc.power_control);
/// ```
pub struct BoardPins {
    pub leds: LedPins,
    pub button: ButtonPins,
    pub uart0: Uart0Pins,
    pub motor: MotorPins,
}

pub struct LedPins {
    pub blue: gpiof::PF2<Output<PushPull>>,
    pub green: gpiof::PF3<Output<PushPull>>,
}

pub struct ButtonPins {
    /// SW1, active low
    pub sw1: gpiof::PF4<Input<PullUp>>,
}

pub struct Uart0Pins {
    pub tx: gpioa::PA1<AlternateFunction<AF1, PushPull>>,
    pub rx: gpioa::PA0<AlternateFunction<AF1, PushPull>>,
}

/// Motor driver pins
pub struct MotorPins {
    pub pwm: gpiof::PF1<AlternateFunction<AF5, PushPull>>, // M1PWM5
    pub dir: gpiob::PB7<Output<PushPull>>,
}

impl BoardPins {
    pub fn new(
        gpioa: GPIO_PORTA,
        gpiob: GPIO_PORTB,
        gpiof: GPIO_PORTF,
        pc: &PowerControl,
    ) -> Self {
        let mut pa = gpioa.split(pc);
        let pb = gpiob.split(pc);
        let mut pf = gpiof.split(pc);

        Self {
            leds: LedPins {
                blue: pf.pf2.into_push_pull_output(),
                green: pf.pf3.into_push_pull_output(),
            },
            button: ButtonPins {
                sw1: pf.pf4.into_pull_up_input(),
            },
            uart0: Uart0Pins {
                tx: pa.pa1.into_af_push_pull::<AF1>(&mut pa.control),
                rx: pa.pa0.into_af_push_pull::<AF1>(&mut pa.control),
            },
            motor: MotorPins {
                pwm: pf.pf1.into_af_push_pull::<AF5>(&mut pf.control),
                dir: pb.pb7.into_push_pull_output(),
            },
        }
    }
}
