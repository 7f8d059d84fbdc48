// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Force-control firmware for the Tiva shield rig.
//!
//! Interrupts, highest priority first:
//! - `ADC0SS3`: load-cell conversion done (TIMER0A triggers the ADC at the sample rate)
//! - `TIMER1A`: controller tick
//! - `TIMER2A`: telemetry record, queued for UART0
//! - `UART0`: moves queued telemetry bytes into the TX FIFO
//!
//! The main loop only polls SW1 and updates the status LEDs. SW1 disarms the motor output stage;
//! the next press arms it again.
//!
//! Built for the host, the same control loop runs against a simulated rig and the telemetry is
//! printed to stdout.

#![cfg_attr(target_os = "none", no_std)]
#![cfg_attr(target_os = "none", no_main)]

#[cfg(target_os = "none")]
mod firmware {
    use core::cell::RefCell;
    use core::fmt::Write;
    use core::sync::atomic::{AtomicBool, Ordering};

    use cortex_m::interrupt::{free, Mutex};
    use cortex_m::peripheral::NVIC;
    use cortex_m_rt::entry;
    use embedded_hal::blocking::delay::DelayMs;
    use heapless::spsc::Queue;
    use panic_halt as _;

    use tm4c123x::{interrupt, TIMER1, TIMER2, UART0};
    use tm4c123x_hal::{
        delay::Delay,
        gpio::{gpioa, gpiob, AlternateFunction, Output, PushPull, AF1},
        serial::{NewlineMode, Serial, Tx},
        sysctl::{self, SysctlExt},
        time::U32Ext,
    };

    use tiva_force::config::{Config, PWM_CLOCK_HZ, SYSTEM_CLOCK_HZ, TELEMETRY_QUEUE_LEN};
    use tiva_force::control::{ControlMode, ForceLoop};
    use tiva_force::drivers::{LoadCell, MotorChannel};
    use tiva_force::hw::usart::{clear_tx_interrupt, listen_tx_fifo};
    use tiva_force::hw::{
        Adc0, BoardPins, Button, Console, LoadCellChannel, MotorPwm, PeriodicTimer, QueuedSink,
        StatusLeds, TxDrain,
    };
    use tiva_force::sampling::SampleCell;
    use tiva_force::telemetry::{StateMailbox, TelemetryLogger};

    type DirPin = gpiob::PB7<Output<PushPull>>;
    type ConsoleTx = Tx<UART0, gpioa::PA1<AlternateFunction<AF1, PushPull>>, ()>;
    type Controller = ForceLoop<'static, LoadCell<'static>, MotorPwm, DirPin>;
    type Logger = TelemetryLogger<'static, LoadCell<'static>>;
    type TelemetryQueue = Queue<u8, TELEMETRY_QUEUE_LEN>;
    type Sink = QueuedSink<'static, TELEMETRY_QUEUE_LEN>;
    type Drain = TxDrain<'static, ConsoleTx, TELEMETRY_QUEUE_LEN>;

    /// Latest load-cell conversion, written only by `ADC0SS3`.
    static LOAD_SAMPLE: SampleCell = SampleCell::new();
    /// Controller outputs, written only by `TIMER1A`.
    static STATE: StateMailbox = StateMailbox::new();
    /// Arm request from SW1, applied on the next controller tick.
    static ARMED: AtomicBool = AtomicBool::new(true);

    // Handed to the interrupt handlers once, before their NVIC lines are unmasked.
    static SAMPLER: Mutex<RefCell<Option<LoadCellChannel>>> = Mutex::new(RefCell::new(None));
    static CONTROLLER: Mutex<RefCell<Option<(PeriodicTimer<TIMER1>, Controller)>>> =
        Mutex::new(RefCell::new(None));
    static LOGGER: Mutex<RefCell<Option<(PeriodicTimer<TIMER2>, Logger, Sink)>>> =
        Mutex::new(RefCell::new(None));
    static DRAIN: Mutex<RefCell<Option<Drain>>> = Mutex::new(RefCell::new(None));

    const PRIO_SAMPLER: u8 = 0x20;
    const PRIO_CONTROLLER: u8 = 0x40;
    const PRIO_LOGGER: u8 = 0x80;
    const PRIO_CONSOLE: u8 = 0xA0;

    #[entry]
    fn main() -> ! {
        static mut TELEMETRY: TelemetryQueue = Queue::new();

        // Peripherals
        let dp = tm4c123x::Peripherals::take().unwrap();
        let mut cp = cortex_m::Peripherals::take().unwrap();
        let cfg = Config::DEFAULT;

        // Clocks: 16 MHz crystal through the PLL to 80 MHz
        let mut sc = dp.SYSCTL.constrain();
        sc.clock_setup.oscillator = sysctl::Oscillator::Main(
            sysctl::CrystalFrequency::_16mhz,
            sysctl::SystemClock::UsePll(sysctl::PllOutputFrequency::_80_00mhz),
        );
        let clocks = sc.clock_setup.freeze();
        let pc = &sc.power_control;

        let pins = BoardPins::new(dp.GPIO_PORTA, dp.GPIO_PORTB, dp.GPIO_PORTF, pc);

        // Console (UART0, ICDI virtual COM port)
        let serial = Serial::uart0(
            dp.UART0,
            pins.uart0.tx,
            pins.uart0.rx,
            (),
            (),
            cfg.baud_rate.bps(),
            NewlineMode::Binary,
            &clocks,
            pc,
        );
        let (tx, _rx) = serial.split();
        let mut console = Console::new(tx);
        console.println("");
        console.println("Tiva force rig");

        // Motor
        let pwm = MotorPwm::new(dp.PWM1, pc);
        let motor = match MotorChannel::new(pwm, pins.motor.dir, PWM_CLOCK_HZ, cfg.pwm_hz) {
            Ok(motor) => motor,
            Err(e) => halt(&mut console, e),
        };
        console.println("Motor initialized");

        // Load cell: TIMER0A triggers ADC0 SS3
        let adc = Adc0::new(dp.ADC0, pc, cfg.sampling.averaging);
        let (mut sampler, _temp) = adc.split();
        sampler.configure(pc);
        let mut sample_timer = match PeriodicTimer::periodic(
            dp.TIMER0,
            pc,
            SYSTEM_CLOCK_HZ,
            cfg.sampling.frequency_hz,
        ) {
            Ok(t) => t,
            Err(e) => halt(&mut console, e),
        };
        sample_timer.enable_adc_trigger();
        let load_cell = LoadCell::with_calibration(&LOAD_SAMPLE, cfg.calibration);
        console.println("Load cell configured");

        // Controller
        let mut force_loop = ForceLoop::new(load_cell, motor, cfg.controller, &STATE);
        force_loop.init(cfg.goal_force);
        force_loop.enable();
        let mut control_timer =
            match PeriodicTimer::periodic(dp.TIMER1, pc, SYSTEM_CLOCK_HZ, cfg.controller_hz) {
                Ok(t) => t,
                Err(e) => halt(&mut console, e),
            };
        control_timer.listen();
        let _ = writeln!(console, "Controller initialized, goal {} lb\r", cfg.goal_force);

        // Logger
        let logger = TelemetryLogger::new(load_cell, &STATE);
        let mut log_timer =
            match PeriodicTimer::periodic(dp.TIMER2, pc, SYSTEM_CLOCK_HZ, cfg.logger_hz) {
                Ok(t) => t,
                Err(e) => halt(&mut console, e),
            };
        log_timer.listen();

        // Console goes quiet from here on; telemetry owns the transmitter
        let (producer, consumer) = TELEMETRY.split();
        let sink = QueuedSink::new(producer);
        let drain = TxDrain::new(consumer, console.free());

        let mut leds = StatusLeds::new(pins.leds.blue, pins.leds.green);
        let mut button = Button::active_low(pins.button.sw1);
        let mut delay = Delay::new(cp.SYST, &clocks);

        // Timeouts stay pending until the NVIC lines are unmasked
        control_timer.start();
        log_timer.start();

        free(|cs| {
            SAMPLER.borrow(cs).replace(Some(sampler));
            CONTROLLER
                .borrow(cs)
                .replace(Some((control_timer, force_loop)));
            LOGGER.borrow(cs).replace(Some((log_timer, logger, sink)));
            DRAIN.borrow(cs).replace(Some(drain));
        });
        listen_tx_fifo();

        unsafe {
            cp.NVIC.set_priority(interrupt::ADC0SS3, PRIO_SAMPLER);
            cp.NVIC.set_priority(interrupt::TIMER1A, PRIO_CONTROLLER);
            cp.NVIC.set_priority(interrupt::TIMER2A, PRIO_LOGGER);
            cp.NVIC.set_priority(interrupt::UART0, PRIO_CONSOLE);
            NVIC::unmask(interrupt::ADC0SS3);
            NVIC::unmask(interrupt::TIMER1A);
            NVIC::unmask(interrupt::TIMER2A);
            NVIC::unmask(interrupt::UART0);
        }

        sample_timer.start();

        loop {
            if let Ok(true) = button.pressed_edge() {
                ARMED.fetch_xor(true, Ordering::Relaxed);
            }

            let shown = if ARMED.load(Ordering::Relaxed) {
                let mode = if STATE.goal_reached() {
                    ControlMode::Holding
                } else {
                    ControlMode::Seeking
                };
                leds.show(mode)
            } else {
                leds.clear()
            };
            if let Err(never) = shown {
                match never {}
            }

            delay.delay_ms(10u32);
        }
    }

    /// Report a configuration error and stop.
    fn halt<TX: embedded_hal::serial::Write<u8>>(
        console: &mut Console<TX>,
        e: tiva_force::Error,
    ) -> ! {
        let _ = writeln!(console, "init failed: {}\r", e);
        console.flush();
        loop {
            cortex_m::asm::wfi();
        }
    }

    #[interrupt]
    fn ADC0SS3() {
        static mut CHANNEL: Option<LoadCellChannel> = None;

        if CHANNEL.is_none() {
            *CHANNEL = free(|cs| SAMPLER.borrow(cs).take());
        }
        if let Some(channel) = CHANNEL {
            LOAD_SAMPLE.complete(channel.read());
        }
    }

    #[interrupt]
    fn TIMER1A() {
        static mut CONTROL: Option<(PeriodicTimer<TIMER1>, Controller)> = None;

        if CONTROL.is_none() {
            *CONTROL = free(|cs| CONTROLLER.borrow(cs).take());
        }
        if let Some((timer, force_loop)) = CONTROL {
            timer.clear_interrupt();

            let armed = ARMED.load(Ordering::Relaxed);
            if armed != force_loop.motor().is_armed() {
                force_loop.set_armed(armed);
            }

            match force_loop.tick() {
                Ok(_) => {}
                Err(never) => match never {},
            }
        }
    }

    #[interrupt]
    fn TIMER2A() {
        static mut LOG: Option<(PeriodicTimer<TIMER2>, Logger, Sink)> = None;

        if LOG.is_none() {
            *LOG = free(|cs| LOGGER.borrow(cs).take());
        }
        if let Some((timer, logger, sink)) = LOG {
            timer.clear_interrupt();

            match logger.log(sink) {
                Ok(_) => {}
                Err(never) => match never {},
            }
            // The FIFO interrupt only fires on a level crossing; start the drain by hand
            NVIC::pend(interrupt::UART0);
        }
    }

    #[interrupt]
    fn UART0() {
        static mut TX: Option<Drain> = None;

        if TX.is_none() {
            *TX = free(|cs| DRAIN.borrow(cs).take());
        }
        clear_tx_interrupt();
        if let Some(drain) = TX {
            drain.pump();
        }
    }
}

#[cfg(not(target_os = "none"))]
fn main() -> Result<(), tiva_force::Error> {
    host::run()
}

/// Same loop, simulated rig.
#[cfg(not(target_os = "none"))]
mod host {
    use core::cell::Cell;
    use core::convert::Infallible;

    use embedded_hal::digital::v2::OutputPin;

    use tiva_force::config::{Config, PWM_CLOCK_HZ};
    use tiva_force::control::{ControlMode, ForceLoop};
    use tiva_force::drivers::{LoadSensor, MotorChannel, PwmOutput};
    use tiva_force::telemetry::{StateMailbox, TelemetryLogger, TelemetrySink};

    /// Force gained per controller tick per percent of signed duty.
    const PLANT_GAIN: f32 = 0.002;
    const START_LOAD: f32 = 45.0;
    const MAX_TICKS: u32 = 40_000;
    /// Ticks to keep logging after the goal latches.
    const HOLD_TICKS: u32 = 2_000;

    struct Rig<'a> {
        load: &'a Cell<f32>,
    }

    impl LoadSensor for Rig<'_> {
        fn load(&self) -> f32 {
            self.load.get()
        }
    }

    struct NullPwm;

    impl PwmOutput for NullPwm {
        fn set_period(&mut self, _period: u32) {}
        fn set_pulse_width(&mut self, _width: u32) {}
        fn set_output_enabled(&mut self, _enabled: bool) {}
    }

    struct NullPin;

    impl OutputPin for NullPin {
        type Error = Infallible;

        fn set_low(&mut self) -> Result<(), Infallible> {
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Infallible> {
            Ok(())
        }
    }

    struct Stdout;

    impl TelemetrySink for Stdout {
        type Error = Infallible;

        fn try_send(&mut self, line: &str) -> nb::Result<(), Infallible> {
            print!("{}", line);
            Ok(())
        }
    }

    pub fn run() -> Result<(), tiva_force::Error> {
        let cfg = Config::DEFAULT;
        let mailbox = StateMailbox::new();
        let load = Cell::new(START_LOAD);

        let motor = MotorChannel::new(NullPwm, NullPin, PWM_CLOCK_HZ, cfg.pwm_hz)?;
        let mut force_loop = ForceLoop::new(Rig { load: &load }, motor, cfg.controller, &mailbox);
        force_loop.init(cfg.goal_force);
        force_loop.enable();

        let mut logger = TelemetryLogger::new(Rig { load: &load }, &mailbox);
        let log_every = (cfg.controller_hz / cfg.logger_hz).max(1);

        println!("load, error, output, direction, goal, duty");
        let mut held = 0;
        for tick in 0..MAX_TICKS {
            let command = match force_loop.tick() {
                Ok(command) => command,
                Err(never) => match never {},
            };
            if let Some(command) = command {
                load.set(load.get() + command.signed() * PLANT_GAIN);
            }

            if tick % log_every == 0 {
                let _ = logger.log(&mut Stdout);
            }

            if force_loop.state().mode() == ControlMode::Holding {
                held += 1;
                if held > HOLD_TICKS {
                    break;
                }
            }
        }

        let _ = logger.log(&mut Stdout);
        println!(
            "goal {} lb reached: {}, {} records",
            force_loop.state().goal_force(),
            force_loop.state().goal_reached(),
            logger.sent()
        );
        Ok(())
    }
}
