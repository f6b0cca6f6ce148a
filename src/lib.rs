//! A full-duplex, bit-banged software UART for 8-bit AVR parts that are out
//! of (or don't have) a hardware USART on the pins you need.
//!
//! One 16-bit timer runs free in CTC mode with two independent output
//! compare channels: one drives a transmit state machine, the other a
//! receive state machine. A single external interrupt on the RX pin
//! detects the falling edge of a start bit and arms the receive channel
//! half a bit-period later, in the middle of the bit. Both engines share
//! the timer but never block each other.
//!
//! Only 9600bps 8N1 is validated; [`build.rs`](https://doc.rust-lang.org/cargo/reference/build-scripts.html)
//! refuses to build for any other `SERIAL_RATE`. There is no parity, no
//! framing-error reporting, and no flow control: a foreground reader that
//! falls behind silently loses data, the same way the original hardware
//! peripheral it stands in for would on overrun.
#![cfg_attr(not(test), no_std)]
#![cfg_attr(target_arch = "avr", feature(asm_experimental_arch, abi_avr_interrupt, error_in_core))]

include!(concat!(env!("OUT_DIR"), "/constants.rs"));

pub mod hal;
pub mod interrupts;
pub mod prelude;
pub mod registers;
pub mod ring;
pub mod timing;
pub mod uart;
pub mod wiring;

#[cfg(target_arch = "avr")]
pub mod avr;

#[cfg(not(target_arch = "avr"))]
pub mod sim;

#[cfg(not(test))]
use core::panic::PanicInfo;

#[cfg(not(test))]
#[panic_handler]
fn panic(_info: &PanicInfo) -> ! {
    loop {}
}

#[cfg(all(target_arch = "avr", not(test)))]
#[lang = "eh_personality"]
extern "C" fn eh_personality() {}
