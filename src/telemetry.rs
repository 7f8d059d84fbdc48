// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Telemetry: the controller's published state and the periodic logger that reports it.
//!
//! The control loop is the only writer of [`StateMailbox`]. The logger runs from its own, lower
//! priority interrupt and only loads from it. Each field is its own atomic, so a record may mix
//! fields from two consecutive controller ticks. That is accepted; nothing here tries to give
//! the logger a consistent snapshot.
//!
//! One record per logger tick, one line per record:
//!
//! ```text
//! <load>, <error>, <pid output>, <direction>, <goal flag>, <duty>
//! 45.830, 4.999, 2.550, 1, 0, 2.550
//! ```
//!
//! Real-valued fields print three zero-padded fractional digits, truncated, with the sign carried
//! by the integer part only. Records are never queued here: if the sink has no room for the whole
//! line the new one is dropped and counted.

use core::fmt::{self, Write};
use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use crate::drivers::{ActuatorCommand, Direction, LoadSensor};

/// Capacity of one formatted record, newline included.
pub const LINE_CAPACITY: usize = 160;

/// One formatted telemetry line.
pub type Line = heapless::String<LINE_CAPACITY>;

/// Controller outputs shared with the logger.
pub struct StateMailbox {
    error: AtomicU32,
    output: AtomicU32,
    goal_reached: AtomicBool,
    duty: AtomicU32,
    up: AtomicBool,
}

impl StateMailbox {
    pub const fn new() -> Self {
        Self {
            error: AtomicU32::new(0),
            output: AtomicU32::new(0),
            goal_reached: AtomicBool::new(false),
            duty: AtomicU32::new(0),
            up: AtomicBool::new(false),
        }
    }

    /// Store the results of one controller tick.
    pub fn publish(&self, error: f32, output: f32, goal_reached: bool, command: ActuatorCommand) {
        self.error.store(error.to_bits(), Ordering::Relaxed);
        self.output.store(output.to_bits(), Ordering::Relaxed);
        self.goal_reached.store(goal_reached, Ordering::Relaxed);
        self.duty.store(command.duty.to_bits(), Ordering::Relaxed);
        self.up
            .store(command.direction == Direction::Up, Ordering::Relaxed);
    }

    #[inline]
    pub fn error(&self) -> f32 {
        f32::from_bits(self.error.load(Ordering::Relaxed))
    }

    #[inline]
    pub fn output(&self) -> f32 {
        f32::from_bits(self.output.load(Ordering::Relaxed))
    }

    #[inline]
    pub fn goal_reached(&self) -> bool {
        self.goal_reached.load(Ordering::Relaxed)
    }

    /// Last command handed to the motor.
    #[inline]
    pub fn command(&self) -> ActuatorCommand {
        ActuatorCommand {
            duty: f32::from_bits(self.duty.load(Ordering::Relaxed)),
            direction: Direction::from(self.up.load(Ordering::Relaxed)),
        }
    }
}

impl Default for StateMailbox {
    fn default() -> Self {
        Self::new()
    }
}

/// Real value printed as `integer.fff`.
///
/// The integer part is the value truncated toward zero and carries the sign; the fraction is
/// always a magnitude. A value in `(-1, 0)` therefore prints without a minus sign.
///
/// The fraction is rounded to the nearest millionth before the digits past the third are
/// dropped, so an `f32` sitting just under a decimal boundary (2.55 is stored as 2.5499999...)
/// still prints as written. The correction never carries into the integer part.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Fixed3(pub f32);

impl fmt::Display for Fixed3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = self.0 as f64;

        // NaN truncates to 0, infinities saturate
        let whole = value as i64;
        let fraction = if value < 0.0 {
            whole as f64 - value
        } else {
            value - whole as f64
        };
        let millis = (((fraction * 1e6 + 0.5) as u64) / 1_000).min(999);

        write!(f, "{}.{:03}", whole, millis)
    }
}

/// One telemetry sample as it goes on the wire.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TelemetryRecord {
    pub load: f32,
    pub error: f32,
    pub output: f32,
    pub direction: Direction,
    pub goal_reached: bool,
    pub duty: f32,
}

impl TelemetryRecord {
    /// Format the record and terminate it with `\n`.
    pub fn to_line(&self) -> Result<Line, fmt::Error> {
        let mut line = Line::new();
        writeln!(line, "{}", self)?;
        Ok(line)
    }
}

impl fmt::Display for TelemetryRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}, {}, {}, {}, {}, {}",
            Fixed3(self.load),
            Fixed3(self.error),
            Fixed3(self.output),
            self.direction.bit(),
            self.goal_reached as u8,
            Fixed3(self.duty),
        )
    }
}

/// Non-blocking byte transport for telemetry lines.
pub trait TelemetrySink {
    type Error;

    /// Hand over a whole line, or answer `WouldBlock` without sending any of it.
    fn try_send(&mut self, line: &str) -> nb::Result<(), Self::Error>;
}

/// Periodic reporter. Reads the load sensor and the mailbox, never writes either.
pub struct TelemetryLogger<'a, S> {
    sensor: S,
    mailbox: &'a StateMailbox,

    sent: u32,
    dropped: u32,
}

impl<'a, S: LoadSensor> TelemetryLogger<'a, S> {
    pub fn new(sensor: S, mailbox: &'a StateMailbox) -> Self {
        Self {
            sensor,
            mailbox,
            sent: 0,
            dropped: 0,
        }
    }

    /// Gather the current state into a record.
    pub fn record(&self) -> TelemetryRecord {
        let command = self.mailbox.command();
        TelemetryRecord {
            load: self.sensor.load(),
            error: self.mailbox.error(),
            output: self.mailbox.output(),
            direction: command.direction,
            goal_reached: self.mailbox.goal_reached(),
            duty: command.duty,
        }
    }

    /// Emit one record. Returns `Ok(false)` when the record was dropped.
    ///
    /// A busy sink or a record that does not fit the line buffer drops the record. Transport
    /// errors are counted as drops and then returned.
    pub fn log<K: TelemetrySink>(&mut self, sink: &mut K) -> Result<bool, K::Error> {
        let line = match self.record().to_line() {
            Ok(line) => line,
            Err(fmt::Error) => {
                self.dropped = self.dropped.wrapping_add(1);
                return Ok(false);
            }
        };

        match sink.try_send(&line) {
            Ok(()) => {
                self.sent = self.sent.wrapping_add(1);
                Ok(true)
            }
            Err(nb::Error::WouldBlock) => {
                self.dropped = self.dropped.wrapping_add(1);
                Ok(false)
            }
            Err(nb::Error::Other(e)) => {
                self.dropped = self.dropped.wrapping_add(1);
                Err(e)
            }
        }
    }

    #[inline]
    pub fn sent(&self) -> u32 {
        self.sent
    }

    #[inline]
    pub fn dropped(&self) -> u32 {
        self.dropped
    }
}
