//! The core bit-pump: two independent state machines sharing one free-running
//! counter. One drives the TX line on compare matches; the other samples the
//! RX line on compare matches after the edge detector has armed it. Neither
//! one blocks the other.

use crate::hal::Hal;
use crate::timing::{self, Timing};

#[cfg(not(ring_buffer))]
mod storage {
    /// Single-slot receive storage: a byte plus a flag. A second receive
    /// completing before the first is read silently overwrites it.
    pub struct Receiver {
        byte: u8,
        available: bool,
    }

    impl Receiver {
        pub const fn new() -> Self {
            Receiver { byte: 0, available: false }
        }

        pub fn publish(&mut self, byte: u8) {
            self.byte = byte;
            self.available = true;
        }

        pub fn available(&self) -> usize {
            self.available as usize
        }

        pub fn take(&mut self) -> Option<u8> {
            if !self.available {
                return None;
            }
            let byte = self.byte;
            self.byte = 0;
            self.available = false;
            Some(byte)
        }

        pub fn clear(&mut self) {
            self.byte = 0;
            self.available = false;
        }
    }
}

#[cfg(ring_buffer)]
mod storage {
    use crate::ring::Ring;

    /// Ring-buffered receive storage. Overflow drops the oldest unread byte.
    pub struct Receiver {
        ring: Ring<{ crate::RING_BUFFER }>,
    }

    impl Receiver {
        pub const fn new() -> Self {
            Receiver { ring: Ring::new() }
        }

        pub fn publish(&mut self, byte: u8) {
            self.ring.push(byte);
        }

        pub fn available(&self) -> usize {
            self.ring.len()
        }

        pub fn take(&mut self) -> Option<u8> {
            self.ring.pop()
        }

        pub fn clear(&mut self) {
            self.ring.clear();
        }
    }
}

use storage::Receiver;

/// The bit clock's timing constants for the line rate baked in at build time.
pub const TIMING: Timing = timing::derive(crate::CPU_FREQUENCY, crate::SERIAL_RATE, u16::MAX);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TxState {
    Idle,
    StartBit,
    DataBit,
    StopBit,
    Return,
    Delay,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RxState {
    Idle,
    StartMid,
    DataBit,
    AwaitHigh,
}

/// Full-duplex software UART state. One process-wide instance is expected;
/// its fields are written from both foreground code and interrupt context
/// under the time-partitioned discipline described on each method.
pub struct Uart {
    send_ready: bool,
    tx_state: TxState,
    send_byte: u8,
    send_bits: u8,
    delay: u32,

    rx_state: RxState,
    recv_shift: u8,
    recv_bits: u8,
    rx: Receiver,
}

impl Uart {
    pub const fn new() -> Self {
        Uart {
            send_ready: true,
            tx_state: TxState::Idle,
            send_byte: 0,
            send_bits: 0,
            delay: 0,
            rx_state: RxState::Idle,
            recv_shift: 0,
            recv_bits: 0,
            rx: Receiver::new(),
        }
    }

    /// Idles the TX line high, leaves both compare ticks disabled, and arms
    /// the edge detector. Call once before interrupts are enabled.
    pub fn init(&mut self, hal: &impl Hal) {
        self.send_ready = true;
        self.tx_state = TxState::Idle;
        self.rx_state = RxState::Idle;
        self.recv_shift = 0;
        self.recv_bits = 0;
        self.rx.clear();

        hal.set_tx_line(true);
        hal.disable_tx_tick();
        hal.disable_rx_tick();
        hal.set_tx_compare(0);
        hal.set_rx_compare(0);
        hal.start_timer();
        hal.enable_edge();
    }

    /// `true` once the transmit engine has returned to `Idle` and a new byte
    /// (or alarm) can be armed without blocking.
    pub fn send_ok(&self) -> bool {
        self.send_ready
    }

    /// Number of bytes waiting to be read.
    pub fn available(&self) -> usize {
        self.rx.available()
    }

    /// Blocks until a byte has been received, then removes and returns it.
    pub fn recv(&mut self, hal: &impl Hal) -> u8 {
        loop {
            if let Some(byte) = self.rx.take() {
                return byte;
            }
            hal.wait();
        }
    }

    /// Blocks until the transmit engine is idle, then arms it to shift
    /// `byte` out starting at the next bit boundary.
    pub fn send(&mut self, hal: &impl Hal, byte: u8) {
        while !self.send_ready {
            hal.wait();
        }
        // Re-arming the A-compare to the current counter value means the
        // next match is exactly one full period away, lining the start bit
        // up with the bit-clock grid regardless of the current phase.
        hal.set_tx_compare(hal.counter());
        self.send_ready = false;
        self.send_byte = byte;
        self.tx_state = TxState::StartBit;
        hal.enable_tx_tick();
    }

    /// Ties the transmit engine up for `ms` milliseconds without touching
    /// the TX line. Returns immediately; use [`Uart::send_ok`] or
    /// [`Uart::delay`] to wait for it to finish.
    pub fn alarm(&mut self, hal: &impl Hal, ms: u32) {
        let ticks_per_bit = TIMING.top as u64 + 1;
        let timer_ticks = (ms as u64 * crate::CPU_FREQUENCY) / (TIMING.prescaler as u64) / 1000;
        let cycles = timer_ticks / ticks_per_bit;
        let remainder = (timer_ticks - cycles * ticks_per_bit) as u16;

        while !self.send_ready {
            hal.wait();
        }

        let counter = hal.counter();
        let target = if counter >= remainder {
            counter - remainder
        } else {
            counter + ticks_per_bit as u16 - remainder
        };
        hal.set_tx_compare(target);
        self.delay = cycles as u32;
        self.send_ready = false;
        self.tx_state = TxState::Delay;
        hal.enable_tx_tick();
    }

    /// Like [`Uart::alarm`], but blocks until the duration has elapsed.
    pub fn delay(&mut self, hal: &impl Hal, ms: u32) {
        self.alarm(hal, ms);
        while !self.send_ready {
            hal.wait();
        }
    }

    /// Runs from the transmit-compare interrupt. Owned entirely by interrupt
    /// context except for the instant a foreground [`Uart::send`] or
    /// [`Uart::alarm`] call arms it.
    pub fn on_tx_compare(&mut self, hal: &impl Hal) {
        match self.tx_state {
            TxState::Idle => {}
            TxState::StartBit => {
                hal.set_tx_line(false);
                self.send_bits = 8;
                self.tx_state = TxState::DataBit;
            }
            TxState::DataBit => {
                hal.set_tx_line(self.send_byte & 1 != 0);
                self.send_byte >>= 1;
                self.send_bits -= 1;
                if self.send_bits == 0 {
                    self.tx_state = TxState::StopBit;
                }
            }
            TxState::StopBit => {
                hal.set_tx_line(true);
                self.tx_state = TxState::Return;
            }
            TxState::Return => {
                self.send_ready = true;
                self.tx_state = TxState::Idle;
                hal.disable_tx_tick();
            }
            TxState::Delay => {
                self.delay -= 1;
                if self.delay == 0 {
                    self.send_ready = true;
                    self.tx_state = TxState::Idle;
                    hal.disable_tx_tick();
                }
            }
        }
    }

    /// Runs from the receive-compare interrupt. Samples the line first, so
    /// the sample point is as close as possible to the interrupt's own
    /// jitter floor before anything else in the handler runs.
    pub fn on_rx_compare(&mut self, hal: &impl Hal) {
        let bit = hal.read_rx_line();

        match self.rx_state {
            RxState::Idle => {}
            RxState::StartMid => {
                self.recv_bits = 8;
                self.rx_state = RxState::DataBit;
            }
            RxState::DataBit => {
                self.recv_shift >>= 1;
                if bit {
                    self.recv_shift |= 0x80;
                }
                self.recv_bits -= 1;
                if self.recv_bits == 0 {
                    self.rx_state = RxState::AwaitHigh;
                }
            }
            RxState::AwaitHigh => {
                if bit {
                    self.rx.publish(self.recv_shift);
                    self.rx_state = RxState::Idle;
                    hal.disable_rx_tick();
                    hal.enable_edge();
                }
            }
        }
    }

    /// Runs from the falling-edge interrupt. Schedules the first receive
    /// sample for the middle of the presumed start bit and hands the line
    /// off to the receive-compare interrupt.
    pub fn on_edge(&mut self, hal: &impl Hal) {
        let now = hal.counter();
        let target = if now >= TIMING.halfbit {
            now - TIMING.halfbit
        } else {
            now + TIMING.halfbit
        };
        hal.set_rx_compare(target);
        hal.disable_edge();
        self.rx_state = RxState::StartMid;
        hal.enable_rx_tick();
    }
}
