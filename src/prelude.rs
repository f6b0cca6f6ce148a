//! Convenience glob import for the foreground API.
//!
//! ```ignore
//! use softuart::prelude::*;
//!
//! fn setup() {
//!     unsafe { softuart::avr::init(); }
//!     send(b'\r');
//! }
//! ```

#[cfg(target_arch = "avr")]
pub use crate::avr::{ available, delay, alarm, recv, send, send_ok };

pub use crate::wiring::{ Pin, PinMode, HIGH, LOW };
pub use crate::hal::Hal;
