// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! On-die temperature sensor demo.
//!
//! Starts one conversion on ADC0 SS1 per second and prints the raw code with the converted
//! Celsius and Fahrenheit readings on the console. The conversion completes in the `ADC0SS1`
//! interrupt.
//!
//! Built for the host, prints the conversion table for a few codes instead.

#![cfg_attr(target_os = "none", no_std)]
#![cfg_attr(target_os = "none", no_main)]

#[cfg(target_os = "none")]
mod firmware {
    use core::cell::RefCell;
    use core::fmt::Write;

    use cortex_m::interrupt::{free, Mutex};
    use cortex_m::peripheral::NVIC;
    use cortex_m_rt::entry;
    use embedded_hal::blocking::delay::DelayMs;
    use panic_halt as _;

    use tm4c123x::interrupt;
    use tm4c123x_hal::{
        delay::Delay,
        serial::{NewlineMode, Serial},
        sysctl::{self, SysctlExt},
        time::U32Ext,
    };

    use tiva_force::config::BAUD_RATE;
    use tiva_force::hw::{Adc0, BoardPins, Console, TempSensorChannel};
    use tiva_force::sampling::{HardwareAveraging, SampleCell};
    use tiva_force::units::{celsius_to_fahrenheit, raw_to_celsius};

    static TEMP_SAMPLE: SampleCell = SampleCell::new();
    static SENSOR: Mutex<RefCell<Option<TempSensorChannel>>> = Mutex::new(RefCell::new(None));

    #[entry]
    fn main() -> ! {
        let dp = tm4c123x::Peripherals::take().unwrap();
        let cp = cortex_m::Peripherals::take().unwrap();

        let mut sc = dp.SYSCTL.constrain();
        sc.clock_setup.oscillator = sysctl::Oscillator::Main(
            sysctl::CrystalFrequency::_16mhz,
            sysctl::SystemClock::UsePll(sysctl::PllOutputFrequency::_80_00mhz),
        );
        let clocks = sc.clock_setup.freeze();
        let pc = &sc.power_control;

        let pins = BoardPins::new(dp.GPIO_PORTA, dp.GPIO_PORTB, dp.GPIO_PORTF, pc);
        let serial = Serial::uart0(
            dp.UART0,
            pins.uart0.tx,
            pins.uart0.rx,
            (),
            (),
            BAUD_RATE.bps(),
            NewlineMode::Binary,
            &clocks,
            pc,
        );
        let (tx, _rx) = serial.split();
        let mut console = Console::new(tx);
        console.println("Temperature sensor");

        let adc = Adc0::new(dp.ADC0, pc, HardwareAveraging::X64);
        let (_load_cell, mut sensor) = adc.split();
        sensor.configure();
        free(|cs| SENSOR.borrow(cs).replace(Some(sensor)));

        unsafe { NVIC::unmask(interrupt::ADC0SS1) };

        let mut delay = Delay::new(cp.SYST, &clocks);
        loop {
            let seen = TEMP_SAMPLE.sequence();
            free(|cs| {
                if let Some(sensor) = SENSOR.borrow(cs).borrow_mut().as_mut() {
                    sensor.start_conversion();
                }
            });

            delay.delay_ms(1_000u32);
            if TEMP_SAMPLE.sequence() == seen {
                console.println("no conversion");
                continue;
            }

            let raw = TEMP_SAMPLE.latest();
            let c = raw_to_celsius(raw);
            let _ = writeln!(console, "{}, {} C, {} F\r", raw, c, celsius_to_fahrenheit(c));
        }
    }

    #[interrupt]
    fn ADC0SS1() {
        free(|cs| {
            if let Some(sensor) = SENSOR.borrow(cs).borrow_mut().as_mut() {
                TEMP_SAMPLE.complete(sensor.read());
            }
        });
    }
}

#[cfg(not(target_os = "none"))]
fn main() {
    use tiva_force::units::{celsius_to_fahrenheit, raw_to_celsius, ADC_FULL_SCALE};

    println!("raw, C, F");
    for raw in [0, 1024, 2048, 2441, 3072, ADC_FULL_SCALE] {
        let c = raw_to_celsius(raw);
        println!("{}, {}, {}", raw, c, celsius_to_fahrenheit(c));
    }
}
