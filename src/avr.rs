//! Wires the bit-pump onto Timer/Counter1 (CTC mode, ICR1 as top) and INT0.
//!
//! Timer1 is the only 16-bit timer on this part with two independent output
//! compare channels, which is what lets the transmit and receive engines run
//! off the same free-running counter without fighting over a single compare
//! register the way an 8-bit timer would force them to.

use crate::hal::Hal;
use crate::interrupts;
use crate::registers::*;
use crate::uart::Uart;
use crate::wiring::{self, Pin, PinMode};

/// TX line. Any GPIO works; PD3 keeps it off the same pins as INT0.
const TX_PIN: Pin = Pin::D3;
/// RX line. Must be wired to INT0, which is PD2 on this part.
const RX_PIN: Pin = Pin::D2;

pub struct Avr;

impl Hal for Avr {
    fn counter(&self) -> u16 {
        unsafe {
            let low = TCNT1L::read();
            let high = TCNT1H::read();
            ((high as u16) << 8) | low as u16
        }
    }

    fn set_tx_compare(&self, value: u16) {
        unsafe {
            OCR1AH::write((value >> 8) as u8);
            OCR1AL::write(value as u8);
        }
    }

    fn set_rx_compare(&self, value: u16) {
        unsafe {
            OCR1BH::write((value >> 8) as u8);
            OCR1BL::write(value as u8);
        }
    }

    fn start_timer(&self) {
        let bits = crate::timing::prescaler_bits(crate::uart::TIMING.prescaler);
        unsafe { TCCR1B::operate(|val| (val & !0b0000_0111) | bits); }
    }

    fn stop_timer(&self) {
        unsafe { TCCR1B::operate(|val| val & !0b0000_0111); }
    }

    fn enable_tx_tick(&self) {
        unsafe {
            TIFR1::OCF1A.set();
            TIMSK1::OCIE1A.set();
        }
    }

    fn disable_tx_tick(&self) {
        unsafe { TIMSK1::OCIE1A.clear(); }
    }

    fn enable_rx_tick(&self) {
        unsafe {
            TIFR1::OCF1B.set();
            TIMSK1::OCIE1B.set();
        }
    }

    fn disable_rx_tick(&self) {
        unsafe { TIMSK1::OCIE1B.clear(); }
    }

    fn enable_edge(&self) {
        unsafe {
            EIFR::INTF0.set();
            EIMSK::INT0.set();
        }
    }

    fn disable_edge(&self) {
        unsafe { EIMSK::INT0.clear(); }
    }

    fn set_tx_line(&self, high: bool) {
        wiring::digital_write(TX_PIN, high);
    }

    fn read_rx_line(&self) -> bool {
        wiring::digital_read(RX_PIN)
    }
}

static mut UART: Uart = Uart::new();

/// Brings the line up. Configures the pins, puts Timer1 into CTC-with-ICR1
/// mode, initializes the bit-pump, and enables global interrupts.
///
/// # Safety
/// Must be called exactly once, before any other function in this module,
/// and before interrupts are otherwise enabled.
pub unsafe fn init() {
    wiring::pin_mode(TX_PIN, PinMode::Output);
    wiring::pin_mode(RX_PIN, PinMode::InputPullup);

    // Falling edge on INT0.
    EICRA::ISC01.set();
    EICRA::ISC00.clear();

    TCCR1A::write(0);
    TCCR1B::WGM12.set();
    TCCR1B::WGM13.set();
    ICR1H::write((crate::uart::TIMING.top >> 8) as u8);
    ICR1L::write(crate::uart::TIMING.top as u8);

    UART.init(&Avr);
    interrupts::enable();
}

/// Blocks until the line is idle, then sends `byte`.
pub fn send(byte: u8) {
    unsafe { UART.send(&Avr, byte); }
}

/// Blocks until a byte has arrived, then returns it.
pub fn recv() -> u8 {
    unsafe { UART.recv(&Avr) }
}

/// Number of bytes waiting to be read.
pub fn available() -> usize {
    unsafe { UART.available() }
}

/// `true` if a new byte can be sent without blocking.
pub fn send_ok() -> bool {
    unsafe { UART.send_ok() }
}

/// Ties the line up for `ms` milliseconds without blocking.
pub fn alarm(ms: u32) {
    unsafe { UART.alarm(&Avr, ms); }
}

/// Ties the line up for `ms` milliseconds and waits for it to finish.
pub fn delay(ms: u32) {
    unsafe { UART.delay(&Avr, ms); }
}

#[doc(hidden)]
#[export_name = "__vector_11"]
pub unsafe extern "avr-interrupt" fn __vector_11() {
    UART.on_tx_compare(&Avr);
}

#[doc(hidden)]
#[export_name = "__vector_12"]
pub unsafe extern "avr-interrupt" fn __vector_12() {
    UART.on_rx_compare(&Avr);
}

#[doc(hidden)]
#[export_name = "__vector_1"]
pub unsafe extern "avr-interrupt" fn __vector_1() {
    UART.on_edge(&Avr);
}
