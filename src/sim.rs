//! A simulated counter and wires, standing in for [`crate::avr::Avr`] so the
//! engine in [`crate::uart`] can be exercised on the host. Not compiled for
//! the AVR target; real firmware never links this in.

use core::cell::Cell;
use crate::hal::Hal;
use crate::uart::Uart;

/// Implements [`Hal`] with a software counter and two software GPIO lines
/// instead of real registers.
pub struct SimHal {
    counter: Cell<u16>,
    top: u16,
    tx_compare: Cell<u16>,
    rx_compare: Cell<u16>,
    tx_tick: Cell<bool>,
    rx_tick: Cell<bool>,
    edge: Cell<bool>,
    running: Cell<bool>,
    tx_line: Cell<bool>,
    rx_line: Cell<bool>,
}

impl SimHal {
    pub fn new(top: u16) -> Self {
        SimHal {
            counter: Cell::new(0),
            top,
            tx_compare: Cell::new(0),
            rx_compare: Cell::new(0),
            tx_tick: Cell::new(false),
            rx_tick: Cell::new(false),
            edge: Cell::new(false),
            running: Cell::new(false),
            tx_line: Cell::new(true),
            rx_line: Cell::new(true),
        }
    }

    pub fn tx_line(&self) -> bool {
        self.tx_line.get()
    }

    pub fn is_edge_enabled(&self) -> bool {
        self.edge.get()
    }

    pub fn is_tx_tick_enabled(&self) -> bool {
        self.tx_tick.get()
    }

    pub fn is_rx_tick_enabled(&self) -> bool {
        self.rx_tick.get()
    }

    /// Only meaningful in tests that need to start from a specific phase.
    pub fn set_counter(&self, value: u16) {
        self.counter.set(value);
    }

    /// Drives the RX line from outside, reporting whether this is a falling
    /// edge (the only transition the real edge detector reacts to).
    pub fn drive_rx(&self, high: bool) -> bool {
        let falling = self.rx_line.get() && !high;
        self.rx_line.set(high);
        falling
    }

    /// Advances the virtual counter by one tick, wrapping at `top`, and
    /// reports which enabled compare channels matched.
    pub fn tick(&self) -> (bool, bool) {
        if !self.running.get() {
            return (false, false);
        }
        let next = if self.counter.get() == self.top { 0 } else { self.counter.get() + 1 };
        self.counter.set(next);
        let a = next == self.tx_compare.get() && self.tx_tick.get();
        let b = next == self.rx_compare.get() && self.rx_tick.get();
        (a, b)
    }
}

impl Hal for SimHal {
    fn counter(&self) -> u16 {
        self.counter.get()
    }

    fn set_tx_compare(&self, value: u16) {
        self.tx_compare.set(value);
    }

    fn set_rx_compare(&self, value: u16) {
        self.rx_compare.set(value);
    }

    fn start_timer(&self) {
        self.running.set(true);
    }

    fn stop_timer(&self) {
        self.running.set(false);
    }

    fn enable_tx_tick(&self) {
        self.tx_tick.set(true);
    }

    fn disable_tx_tick(&self) {
        self.tx_tick.set(false);
    }

    fn enable_rx_tick(&self) {
        self.rx_tick.set(true);
    }

    fn disable_rx_tick(&self) {
        self.rx_tick.set(false);
    }

    fn enable_edge(&self) {
        self.edge.set(true);
    }

    fn disable_edge(&self) {
        self.edge.set(false);
    }

    fn set_tx_line(&self, high: bool) {
        self.tx_line.set(high);
    }

    fn read_rx_line(&self) -> bool {
        self.rx_line.get()
    }
}

/// Couples a [`Uart`] engine with a [`SimHal`] and pumps the interrupts a
/// real timer and edge detector would raise.
pub struct Harness {
    pub uart: Uart,
    pub hal: SimHal,
}

impl Harness {
    pub fn new() -> Self {
        let hal = SimHal::new(crate::uart::TIMING.top);
        let mut uart = Uart::new();
        uart.init(&hal);
        Harness { uart, hal }
    }

    /// Advances the bit clock by one counter tick, dispatching whichever
    /// compare interrupts matched.
    pub fn tick(&mut self) {
        let (tx_match, rx_match) = self.hal.tick();
        if tx_match {
            self.uart.on_tx_compare(&self.hal);
        }
        if rx_match {
            self.uart.on_rx_compare(&self.hal);
        }
    }

    pub fn run_ticks(&mut self, n: u32) {
        for _ in 0..n {
            self.tick();
        }
    }

    /// Feeds one line transition into RX, firing the edge interrupt on a
    /// falling edge if the detector is currently armed.
    pub fn drive_rx(&mut self, high: bool) {
        let falling = self.hal.drive_rx(high);
        if falling && self.hal.is_edge_enabled() {
            self.uart.on_edge(&self.hal);
        }
    }

    /// Ties TX back onto RX for one tick, as if the two wires were shorted
    /// together.
    pub fn loopback_tick(&mut self) {
        let line = self.hal.tx_line();
        self.drive_rx(line);
        self.tick();
    }

    pub fn loopback_ticks(&mut self, n: u32) {
        for _ in 0..n {
            self.loopback_tick();
        }
    }
}

/// Two harnesses with their TX/RX lines cross-wired, modeling two real
/// peers talking to each other rather than one device looped back on
/// itself.
struct CrossWire {
    a: Harness,
    b: Harness,
}

impl CrossWire {
    fn new() -> Self {
        let a = Harness::new();
        let mut b = Harness::new();
        // Give the two sides an arbitrary, unsynchronized phase.
        for _ in 0..57 {
            b.hal.tick();
        }
        CrossWire { a, b }
    }

    fn tick(&mut self) {
        let a_tx = self.a.hal.tx_line();
        let b_tx = self.b.hal.tx_line();
        self.b.drive_rx(a_tx);
        self.a.drive_rx(b_tx);
        self.a.tick();
        self.b.tick();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::uart::TIMING;

    fn period() -> u32 {
        TIMING.top as u32 + 1
    }

    #[test]
    fn idle_after_init() {
        let h = Harness::new();
        assert!(h.uart.send_ok());
        assert_eq!(h.uart.available(), 0);
        assert!(!h.hal.is_tx_tick_enabled());
        assert!(!h.hal.is_rx_tick_enabled());
        assert!(h.hal.is_edge_enabled());
        assert!(h.hal.tx_line());
    }

    fn waveform_for(byte: u8) -> Vec<bool> {
        let mut h = Harness::new();
        h.uart.send(&h.hal, byte);
        let mut waveform = Vec::new();
        for _ in 0..10 {
            h.run_ticks(period());
            waveform.push(h.hal.tx_line());
        }
        waveform
    }

    #[test]
    fn send_0x55_emits_alternating_start_bits_stop() {
        // start(L), 8 data bits LSB-first (1,0,1,0,1,0,1,0 -> H,L,H,L,H,L,H,L), stop(H)
        let expected = vec![false, true, false, true, false, true, false, true, false, true];
        assert_eq!(waveform_for(0x55), expected);
    }

    #[test]
    fn send_0x00_emits_all_low_data_bits() {
        let mut expected = vec![false; 9];
        expected.push(true);
        assert_eq!(waveform_for(0x00), expected);
    }

    #[test]
    fn send_0xff_emits_all_high_data_bits() {
        let mut expected = vec![false];
        expected.extend(core::iter::repeat(true).take(9));
        assert_eq!(waveform_for(0xFF), expected);
    }

    #[test]
    fn on_edge_schedules_the_sample_at_the_bit_midpoint() {
        let h = Harness::new();
        h.hal.set_counter(50);
        let mut uart = Uart::new();
        uart.init(&h.hal);
        uart.on_edge(&h.hal);
        // halfbit is computed from TIMING; 50 >= halfbit is false for this
        // part's constants, so the target wraps forward.
        let expected = if 50u16 >= TIMING.halfbit {
            50 - TIMING.halfbit
        } else {
            50 + TIMING.halfbit
        };
        assert_eq!(h.hal.rx_compare.get(), expected);
        assert!(!h.hal.is_edge_enabled());
        assert!(h.hal.is_rx_tick_enabled());
    }

    #[test]
    fn receive_samples_recur_every_full_period() {
        let mut h = Harness::new();
        // Drive a start bit (falling edge), then hold the line high so every
        // data bit and the stop bit samples as 1 -> byte 0xFF.
        h.drive_rx(false);
        h.run_ticks(period() / 2); // reach the scheduled start-bit sample
        h.drive_rx(true);
        for _ in 0..9 {
            h.run_ticks(period());
        }
        assert_eq!(h.uart.available(), 1);
        assert_eq!(h.uart.recv(&h.hal), 0xFF);
    }

    #[test]
    fn loopback_fidelity_for_every_byte() {
        for byte in 0u16..=255 {
            let mut h = Harness::new();
            h.uart.send(&h.hal, byte as u8);
            // Ten bit periods to clear the frame, plus a couple of spare
            // periods for the edge-arming half-bit offset.
            h.loopback_ticks(period() * 12);
            assert_eq!(h.uart.available(), 1, "byte {byte:#04x} never arrived");
            assert_eq!(h.uart.recv(&h.hal), byte as u8, "byte {byte:#04x} corrupted in transit");
        }
    }

    #[test]
    fn single_slot_overwrite_drops_the_unread_byte() {
        let mut h = Harness::new();
        h.uart.send(&h.hal, 0xAA);
        h.loopback_ticks(period() * 12);
        assert_eq!(h.uart.available(), 1);
        // A second byte arrives before the first is read.
        h.uart.send(&h.hal, 0x3C);
        h.loopback_ticks(period() * 12);
        assert_eq!(h.uart.available(), 1);
        assert_eq!(h.uart.recv(&h.hal), 0x3C);
    }

    #[test]
    fn alarm_ties_up_the_line_for_roughly_the_requested_duration() {
        let mut h = Harness::new();
        h.uart.alarm(&h.hal, 100);
        let mut ticks = 0u64;
        while !h.uart.send_ok() {
            h.tick();
            ticks += 1;
            assert!(ticks < 10_000_000, "alarm never cleared");
        }
        let elapsed_us = ticks * TIMING.prescaler as u64 * 1_000_000 / crate::CPU_FREQUENCY;
        let bit_period_us = period() as u64 * TIMING.prescaler as u64 * 1_000_000 / crate::CPU_FREQUENCY;
        assert!(elapsed_us >= 100_000, "alarm fired early: {elapsed_us}us");
        assert!(elapsed_us <= 100_000 + bit_period_us, "alarm overshot by more than one bit period: {elapsed_us}us");
    }

    #[test]
    fn independence_of_concurrent_transmit_and_receive() {
        let mut wire = CrossWire::new();
        let a_to_send: Vec<u8> = (0..1000u32).map(|i| i as u8).collect();
        let b_to_send: Vec<u8> = (0..1000u32).map(|i| (i as u8).wrapping_mul(7).wrapping_add(3)).collect();
        // What arrives at `a` came from `b`'s stream, and vice versa.
        let mut received_by_a = Vec::new();
        let mut received_by_b = Vec::new();
        let mut a_idx = 0usize;
        let mut b_idx = 0usize;

        let max_ticks: u64 = 1000 * 12 * period() as u64 * 2;
        let mut ticks = 0u64;

        loop {
            if a_idx < a_to_send.len() && wire.a.uart.send_ok() {
                wire.a.uart.send(&wire.a.hal, a_to_send[a_idx]);
                a_idx += 1;
            }
            if b_idx < b_to_send.len() && wire.b.uart.send_ok() {
                wire.b.uart.send(&wire.b.hal, b_to_send[b_idx]);
                b_idx += 1;
            }

            wire.tick();
            ticks += 1;

            if wire.a.uart.available() > 0 {
                received_by_a.push(wire.a.uart.recv(&wire.a.hal));
            }
            if wire.b.uart.available() > 0 {
                received_by_b.push(wire.b.uart.recv(&wire.b.hal));
            }

            if a_idx == a_to_send.len()
                && b_idx == b_to_send.len()
                && received_by_a.len() == b_to_send.len()
                && received_by_b.len() == a_to_send.len()
            {
                break;
            }
            assert!(ticks < max_ticks, "transfer stalled");
        }

        assert_eq!(received_by_a, b_to_send);
        assert_eq!(received_by_b, a_to_send);
    }
}
