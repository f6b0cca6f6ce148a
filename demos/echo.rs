//! Echoes every received byte straight back out.
#![no_std]
#![no_main]

use softuart::prelude::*;

#[no_mangle]
pub extern "C" fn main() -> ! {
    unsafe {
        softuart::avr::init();
    }

    loop {
        let byte = recv();
        send(byte);
    }
}
