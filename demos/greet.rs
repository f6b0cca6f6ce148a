//! Sends a greeting every two seconds, without blocking on anything else.
#![no_std]
#![no_main]

use softuart::prelude::*;

const GREETING: &[u8] = b"hello\r\n";

#[no_mangle]
pub extern "C" fn main() -> ! {
    unsafe {
        softuart::avr::init();
    }

    loop {
        for &byte in GREETING {
            while !send_ok() {}
            send(byte);
        }
        delay(2000);
    }
}
