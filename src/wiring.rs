//! Minimal digital pin control for the two wires this driver owns.
//!
//! Trimmed down from a full Arduino-style pin abstraction to just Port D,
//! since both the TX line and the INT0-capable RX line live there on the
//! parts this crate targets.

use crate::registers::{ DDRD, PIND, PORTD, Register };

/// A digital pin on Port D.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(non_camel_case_types)]
pub enum Pin {
    D0,
    D1,
    D2,
    D3,
    D4,
    D5,
    D6,
    D7,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinMode {
    Input,
    InputPullup,
    Output,
}

pub const HIGH: bool = true;
pub const LOW: bool = false;

impl Pin {
    fn ddr(self) -> DDRD {
        match self {
            Pin::D0 => DDRD::DDRD0,
            Pin::D1 => DDRD::DDRD1,
            Pin::D2 => DDRD::DDRD2,
            Pin::D3 => DDRD::DDRD3,
            Pin::D4 => DDRD::DDRD4,
            Pin::D5 => DDRD::DDRD5,
            Pin::D6 => DDRD::DDRD6,
            Pin::D7 => DDRD::DDRD7,
        }
    }

    fn port(self) -> PORTD {
        match self {
            Pin::D0 => PORTD::PORTD0,
            Pin::D1 => PORTD::PORTD1,
            Pin::D2 => PORTD::PORTD2,
            Pin::D3 => PORTD::PORTD3,
            Pin::D4 => PORTD::PORTD4,
            Pin::D5 => PORTD::PORTD5,
            Pin::D6 => PORTD::PORTD6,
            Pin::D7 => PORTD::PORTD7,
        }
    }

    fn pin(self) -> PIND {
        match self {
            Pin::D0 => PIND::PIND0,
            Pin::D1 => PIND::PIND1,
            Pin::D2 => PIND::PIND2,
            Pin::D3 => PIND::PIND3,
            Pin::D4 => PIND::PIND4,
            Pin::D5 => PIND::PIND5,
            Pin::D6 => PIND::PIND6,
            Pin::D7 => PIND::PIND7,
        }
    }
}

/// Configures a pin's direction, optionally enabling the pull-up resistor
/// when used as an input.
pub fn pin_mode(pin: Pin, mode: PinMode) {
    unsafe {
        match mode {
            PinMode::Input => {
                pin.ddr().clear();
                pin.port().clear();
            }
            PinMode::InputPullup => {
                pin.ddr().clear();
                pin.port().set();
            }
            PinMode::Output => {
                pin.ddr().set();
            }
        }
    }
}

pub fn digital_write(pin: Pin, value: bool) {
    unsafe { pin.port().set_value(value); }
}

pub fn digital_read(pin: Pin) -> bool {
    unsafe { pin.pin().is_set() }
}
