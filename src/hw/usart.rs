// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Debug console on UART0.
//!
//! UART0 (PA0/PA1) is routed to the ICDI virtual COM port of the LaunchPad. Startup messages go
//! out through [`Console`] with blocking writes. Telemetry never waits on the transmitter:
//! [`QueuedSink`] copies a whole line into a byte queue or refuses it, and [`TxDrain`] moves
//! queued bytes into the TX FIFO from the UART0 interrupt.
//!
//! ```ignore
//! let (producer, consumer) = queue.split();
//! let mut sink = QueuedSink::new(producer);
//! let mut drain = TxDrain::new(consumer, console.free());
//!
//! // logger interrupt
//! logger.log(&mut sink)?;
//! NVIC::pend(interrupt::UART0);
//!
//! // UART0 interrupt
//! clear_tx_interrupt();
//! drain.pump();
//! ```
//!
//! Note: When using `writeln!`, be sure to include `\r` (CR) in the format string to ensure correct
//! line endings on the terminal.
//!
//! To access the terminal on the host machine, connect to the debug USB port and use
//! ```bash
//! $ screen /dev/ttyACM0 115200
//! ```
//!
//! To close the debug terminal, press `Ctrl+A` then `Ctrl+\` then `y`.

use core::convert::Infallible;
use core::fmt;

use embedded_hal::serial::Write;
use heapless::spsc::{Consumer, Producer};
use nb::block;

use crate::telemetry::TelemetrySink;

pub struct Console<TX> {
    tx: TX,
}

impl<TX: Write<u8>> Console<TX> {
    pub fn new(tx: TX) -> Self {
        Self { tx }
    }

    #[inline]
    pub fn write_byte(&mut self, b: u8) {
        let _ = block!(self.tx.write(b));
    }

    pub fn write_str(&mut self, s: &str) {
        for &b in s.as_bytes() {
            self.write_byte(b);
        }
    }

    /// Write string and CRLF terminator.
    #[inline]
    pub fn println(&mut self, s: &str) {
        self.write_str(s);
        self.write_str("\r\n");
    }

    /// Block until the transmitter has drained.
    #[inline]
    pub fn flush(&mut self) {
        let _ = block!(self.tx.flush());
    }

    pub fn free(self) -> TX {
        self.tx
    }
}

// Implement `core::fmt::Write` so we can use `write!` / `writeln!` on `Console`.
impl<TX: Write<u8>> fmt::Write for Console<TX> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        Console::write_str(self, s);
        Ok(())
    }
}

/// Producer half of the telemetry byte queue.
pub struct QueuedSink<'q, const N: usize> {
    producer: Producer<'q, u8, N>,
}

impl<'q, const N: usize> QueuedSink<'q, N> {
    pub fn new(producer: Producer<'q, u8, N>) -> Self {
        Self { producer }
    }

    /// Bytes that can still be queued.
    #[inline]
    pub fn room(&self) -> usize {
        self.producer.capacity() - self.producer.len()
    }
}

impl<const N: usize> TelemetrySink for QueuedSink<'_, N> {
    type Error = Infallible;

    /// Queue the whole line or none of it. `\n` goes out as `\r\n`.
    fn try_send(&mut self, line: &str) -> nb::Result<(), Infallible> {
        let bytes = line.as_bytes();
        let needed = bytes.len() + bytes.iter().filter(|&&b| b == b'\n').count();
        if needed > self.room() {
            return Err(nb::Error::WouldBlock);
        }

        for &b in bytes {
            if b == b'\n' {
                let _ = self.producer.enqueue(b'\r');
            }
            let _ = self.producer.enqueue(b);
        }
        Ok(())
    }
}

/// Consumer half of the telemetry byte queue, bound to the transmitter it feeds.
pub struct TxDrain<'q, TX, const N: usize> {
    consumer: Consumer<'q, u8, N>,
    tx: TX,
}

impl<'q, TX: Write<u8>, const N: usize> TxDrain<'q, TX, N> {
    pub fn new(consumer: Consumer<'q, u8, N>, tx: TX) -> Self {
        Self { consumer, tx }
    }

    /// Move queued bytes into the transmitter until it is full or the queue is empty.
    /// Returns the number of bytes moved.
    pub fn pump(&mut self) -> usize {
        let mut moved = 0;
        while let Some(&b) = self.consumer.peek() {
            if self.tx.write(b).is_err() {
                break;
            }
            self.consumer.dequeue();
            moved += 1;
        }
        moved
    }

    /// Bytes still waiting for the transmitter.
    #[inline]
    pub fn pending(&self) -> usize {
        self.consumer.len()
    }

    pub fn free(self) -> (Consumer<'q, u8, N>, TX) {
        (self.consumer, self.tx)
    }
}

/// Raise UART0 when the TX FIFO drops below its trigger level.
#[cfg(target_os = "none")]
pub fn listen_tx_fifo() {
    let uart = unsafe { &*tm4c123x::UART0::ptr() };
    uart.im.modify(|_, w| w.txim().set_bit());
}

#[cfg(target_os = "none")]
#[inline]
pub fn clear_tx_interrupt() {
    let uart = unsafe { &*tm4c123x::UART0::ptr() };
    uart.icr.write(|w| w.txic().set_bit());
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::fmt::Write as _;
    use heapless::spsc::Queue;

    /// Transmitter with a FIFO of `room` bytes. Writes past that report busy.
    #[derive(Default)]
    struct FakeTx {
        bytes: Vec<u8>,
        room: usize,
        busy_polls: u32,
        writes: u32,
    }

    impl FakeTx {
        fn with_room(room: usize) -> Self {
            Self {
                room,
                ..Self::default()
            }
        }
    }

    impl Write<u8> for FakeTx {
        type Error = Infallible;

        fn write(&mut self, word: u8) -> nb::Result<(), Infallible> {
            self.writes += 1;
            if self.room == 0 {
                return Err(nb::Error::WouldBlock);
            }
            self.room -= 1;
            self.bytes.push(word);
            Ok(())
        }

        fn flush(&mut self) -> nb::Result<(), Infallible> {
            if self.busy_polls > 0 {
                self.busy_polls -= 1;
                return Err(nb::Error::WouldBlock);
            }
            Ok(())
        }
    }

    #[test]
    fn println_uses_crlf() {
        let mut console = Console::new(FakeTx::with_room(64));
        console.println("Motor initialized");
        write!(console, "{} lb\r\n", 50).unwrap();
        assert_eq!(console.free().bytes, b"Motor initialized\r\n50 lb\r\n");
    }

    #[test]
    fn blocking_flush_waits() {
        let mut console = Console::new(FakeTx {
            busy_polls: 3,
            ..FakeTx::default()
        });
        console.flush();
        assert_eq!(console.free().busy_polls, 0);
    }

    #[test]
    fn send_only_queues() {
        let mut queue: Queue<u8, 64> = Queue::new();
        let (producer, consumer) = queue.split();
        let mut sink = QueuedSink::new(producer);
        let drain = TxDrain::new(consumer, FakeTx::with_room(4));

        assert_eq!(sink.try_send("45.830, 1\n"), Ok(()));
        assert_eq!(sink.try_send("45.840, 1\n"), Ok(()));
        assert_eq!(drain.pending(), 22);

        let (_, tx) = drain.free();
        assert_eq!(tx.writes, 0);
        assert!(tx.bytes.is_empty());
    }

    #[test]
    fn full_queue_refuses_whole_line() {
        let mut queue: Queue<u8, 16> = Queue::new();
        let (producer, consumer) = queue.split();
        let mut sink = QueuedSink::new(producer);
        let drain = TxDrain::new(consumer, FakeTx::with_room(0));

        // 15 usable bytes: 10 + CR leaves 4
        assert_eq!(sink.try_send("2.550, 10\n"), Ok(()));
        assert_eq!(sink.room(), 4);
        assert_eq!(sink.try_send("1.0\n"), Err(nb::Error::WouldBlock));
        assert_eq!(drain.pending(), 11);

        assert_eq!(sink.try_send("1.\n"), Ok(()));
        assert_eq!(sink.room(), 0);
    }

    #[test]
    fn pump_stops_at_full_fifo_and_resumes() {
        let mut queue: Queue<u8, 64> = Queue::new();
        let (producer, consumer) = queue.split();
        let mut sink = QueuedSink::new(producer);
        let mut drain = TxDrain::new(consumer, FakeTx::with_room(4));

        sink.try_send("0.500, 1\n").unwrap();
        assert_eq!(drain.pump(), 4);
        assert_eq!(drain.pump(), 0);
        assert_eq!(drain.pending(), 6);

        let (consumer, mut tx) = drain.free();
        let mut sent = core::mem::take(&mut tx.bytes);
        tx.room = 16;
        let mut drain = TxDrain::new(consumer, tx);
        assert_eq!(drain.pump(), 6);
        assert_eq!(drain.pending(), 0);

        sent.extend(drain.free().1.bytes);
        assert_eq!(sent, b"0.500, 1\r\n");
    }
}
