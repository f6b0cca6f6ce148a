#![allow(non_camel_case_types)]
use core::{ ptr::{ write_volatile, read_volatile }, ops, cmp };

pub trait Register: Sized + Clone + Copy + Into<u8>
                    + ops::BitAnd<u8, Output=u8>
                    + ops::BitAndAssign<u8>
                    + ops::BitOr<u8, Output = u8>
                    + ops::BitOrAssign<u8>
                    + ops::BitXor<u8, Output = u8>
                    + ops::BitXorAssign<u8>
                    + cmp::PartialEq<u8>
                    + cmp::PartialOrd<u8>
 {
    const ADDR: *mut u8;

    #[inline(always)]
    unsafe fn read() -> u8 {
        read_volatile(Self::ADDR)
    }

    #[inline(always)]
    unsafe fn write(value: u8) {
        write_volatile(Self::ADDR, value)
    }

    #[inline(always)]
    unsafe fn operate<F: Fn(u8) -> u8>(operator: F) {
        Self::write(operator(Self::read()))
    }

    #[inline(always)]
    fn bit(&self) -> u8 {
        Into::<u8>::into(*self)
    }

    #[inline(always)]
    unsafe fn read_bit(&self) -> bool {
        0 < Self::read() & (1 << self.bit())
    }

    #[inline(always)]
    unsafe fn set(&self) {
        Self::write(Self::read() | (1 << self.bit()))
    }

    #[inline(always)]
    unsafe fn clear(&self) {
        Self::write(Self::read() & !(1 << self.bit()))
    }

    #[inline(always)]
    unsafe fn toggle(&self) {
        Self::write(Self::read() ^ (1 << self.bit()))
    }

    #[inline(always)]
    unsafe fn set_value(&self, value: bool) {
        if value {
            self.set();
        } else {
            self.clear();
        }
    }

    #[inline(always)]
    unsafe fn until<F: Fn(u8) -> bool>(check: F) {
        while !check(Self::read()) {}
    }

    /// Shorthand for `read_bit()`. Reads more naturally at flag-polling call sites.
    #[inline(always)]
    unsafe fn is_set(&self) -> bool {
        self.read_bit()
    }

    #[inline(always)]
    unsafe fn is_clear(&self) -> bool {
        !self.read_bit()
    }
}

/// Initialize a type as a Register.
///
/// Syntax: `register!(<type>[<address>],);`
macro_rules! register {
    ($($t:ty[$addr:expr],)*) => {
        $(
            impl Into<u8> for $t {
                fn into(self) -> u8 {
                    self as u8
                }
            }
            impl ops::BitAnd<u8> for $t {
                type Output = u8;
                fn bitand(self, rhs: u8) -> Self::Output {
                    unsafe { Self::read() & rhs }
                }
            }
            impl ops::BitAndAssign<u8> for $t {
                fn bitand_assign(&mut self, rhs: u8) {
                    unsafe { Self::operate(|val| val & rhs); }
                }
            }
            impl ops::BitOr<u8> for $t {
                type Output = u8;
                fn bitor(self, rhs: u8) -> Self::Output {
                    unsafe { Self::read() | rhs }
                }
            }
            impl ops::BitOrAssign<u8> for $t {
                fn bitor_assign(&mut self, rhs: u8) {
                    unsafe { Self::operate(|val| val | rhs) }
                }
            }
            impl ops::BitXor<u8> for $t {
                type Output = u8;
                fn bitxor(self, rhs: u8) -> Self::Output {
                    unsafe { Self::read() ^ rhs }
                }
            }
            impl ops::BitXorAssign<u8> for $t {
                fn bitxor_assign(&mut self, rhs: u8) {
                    unsafe { Self::operate(|val| val ^ rhs) }
                }
            }
            impl cmp::PartialEq<u8> for $t {
                fn eq(&self, other: &u8) -> bool {
                    unsafe { Self::read() == *other }
                }
            }
            impl cmp::PartialOrd<u8> for $t {
                fn ge(&self, other: &u8) -> bool {
                    let val = unsafe { Self::read() };
                    val >= *other
                }
                fn gt(&self, other: &u8) -> bool {
                    let val = unsafe { Self::read() };
                    val > *other
                }
                fn le(&self, other: &u8) -> bool {
                    let val = unsafe { Self::read() };
                    val <= *other
                }
                fn lt(&self, other: &u8) -> bool {
                    let val = unsafe { Self::read() };
                    val < *other
                }
                fn partial_cmp(&self, other: &u8) -> Option<cmp::Ordering> {
                    let val = unsafe { Self::read() };
                    Some(val.cmp(other))
                }
            }
            impl Register for $t {
                const ADDR: *mut u8 = $addr as *mut u8;
            }

        )*
    };
}

/// AVR Status Register
#[derive(Clone, Copy)]
pub enum SREG {
    C = 0,
    Z = 1,
    N = 2,
    V = 3,
    S = 4,
    H = 5,
    T = 6,
    I = 7,
}

/// Port D Input Pins Address
#[derive(Clone, Copy)]
pub enum PIND {
    PIND0 = 0,
    PIND1 = 1,
    PIND2 = 2,
    PIND3 = 3,
    PIND4 = 4,
    PIND5 = 5,
    PIND6 = 6,
    PIND7 = 7,
}

/// Port D Data Direction Register
#[derive(Clone, Copy)]
pub enum DDRD {
    DDRD0 = 0,
    DDRD1 = 1,
    DDRD2 = 2,
    DDRD3 = 3,
    DDRD4 = 4,
    DDRD5 = 5,
    DDRD6 = 6,
    DDRD7 = 7,
}

/// Port D Data Register
#[derive(Clone, Copy)]
pub enum PORTD {
    PORTD0 = 0,
    PORTD1 = 1,
    PORTD2 = 2,
    PORTD3 = 3,
    PORTD4 = 4,
    PORTD5 = 5,
    PORTD6 = 6,
    PORTD7 = 7,
}

/// External Interrupt Control Register A
#[derive(Clone, Copy)]
pub enum EICRA {
    ISC00 = 0,
    ISC01 = 1,
    ISC10 = 2,
    ISC11 = 3,
}

/// External Interrupt Mask Register
#[derive(Clone, Copy)]
pub enum EIMSK {
    INT0 = 0,
    INT1 = 1,
}

/// External Interrupt Flag Register
#[derive(Clone, Copy)]
pub enum EIFR {
    INTF0 = 0,
    INTF1 = 1,
}

/// Timer/Counter1 Interrupt Flag Register
#[derive(Clone, Copy)]
pub enum TIFR1 {
    TOV1  = 0,
    OCF1A = 1,
    OCF1B = 2,
    ICF1  = 5,
}

/// Timer/Counter1 Interrupt Mask Register
#[derive(Clone, Copy)]
pub enum TIMSK1 {
    TOIE1  = 0,
    OCIE1A = 1,
    OCIE1B = 2,
    ICIE1  = 5,
}

/// Timer/Counter1 Control Register A
#[derive(Clone, Copy)]
pub enum TCCR1A {
    WGM10  = 0,
    WGM11  = 1,
    COM1B0 = 4,
    COM1B1 = 5,
    COM1A0 = 6,
    COM1A1 = 7,
}

/// Timer/Counter1 Control Register B
#[derive(Clone, Copy)]
pub enum TCCR1B {
    CS10  = 0,
    CS11  = 1,
    CS12  = 2,
    WGM12 = 3,
    WGM13 = 4,
    ICES1 = 6,
    ICNC1 = 7,
}

/// Timer/Counter1 Low
#[derive(Clone, Copy)]
pub enum TCNT1L {
    TCNT1L0 = 0,
    TCNT1L1 = 1,
    TCNT1L2 = 2,
    TCNT1L3 = 3,
    TCNT1L4 = 4,
    TCNT1L5 = 5,
    TCNT1L6 = 6,
    TCNT1L7 = 7,
}

/// Timer/Counter1 High
#[derive(Clone, Copy)]
pub enum TCNT1H {
    TCNT1H0 = 0,
    TCNT1H1 = 1,
    TCNT1H2 = 2,
    TCNT1H3 = 3,
    TCNT1H4 = 4,
    TCNT1H5 = 5,
    TCNT1H6 = 6,
    TCNT1H7 = 7,
}

/// Timer 1 Input Capture Register Low (used here as the CTC top)
#[derive(Clone, Copy)]
pub enum ICR1L {
    ICR1L0 = 0,
    ICR1L1 = 1,
    ICR1L2 = 2,
    ICR1L3 = 3,
    ICR1L4 = 4,
    ICR1L5 = 5,
    ICR1L6 = 6,
    ICR1L7 = 7,
}

/// Timer 1 Input Capture Register High (used here as the CTC top)
#[derive(Clone, Copy)]
pub enum ICR1H {
    ICR1H0 = 0,
    ICR1H1 = 1,
    ICR1H2 = 2,
    ICR1H3 = 3,
    ICR1H4 = 4,
    ICR1H5 = 5,
    ICR1H6 = 6,
    ICR1H7 = 7,
}

/// Timer 1 Output Compare Register A Low
#[derive(Clone, Copy)]
pub enum OCR1AL {
    OCR1AL0 = 0,
    OCR1AL1 = 1,
    OCR1AL2 = 2,
    OCR1AL3 = 3,
    OCR1AL4 = 4,
    OCR1AL5 = 5,
    OCR1AL6 = 6,
    OCR1AL7 = 7,
}

/// Timer 1 Output Compare Register A High
#[derive(Clone, Copy)]
pub enum OCR1AH {
    OCR1AH0 = 0,
    OCR1AH1 = 1,
    OCR1AH2 = 2,
    OCR1AH3 = 3,
    OCR1AH4 = 4,
    OCR1AH5 = 5,
    OCR1AH6 = 6,
    OCR1AH7 = 7,
}

/// Timer 1 Output Compare Register B Low
#[derive(Clone, Copy)]
pub enum OCR1BL {
    OCR1BL0 = 0,
    OCR1BL1 = 1,
    OCR1BL2 = 2,
    OCR1BL3 = 3,
    OCR1BL4 = 4,
    OCR1BL5 = 5,
    OCR1BL6 = 6,
    OCR1BL7 = 7,
}

/// Timer 1 Output Compare Register B High
#[derive(Clone, Copy)]
pub enum OCR1BH {
    OCR1BH0 = 0,
    OCR1BH1 = 1,
    OCR1BH2 = 2,
    OCR1BH3 = 3,
    OCR1BH4 = 4,
    OCR1BH5 = 5,
    OCR1BH6 = 6,
    OCR1BH7 = 7,
}

register!(
    SREG[0x3F],
    PIND[0x29],
    DDRD[0x2A],
    PORTD[0x2B],
    EICRA[0x69],
    EIMSK[0x3D],
    EIFR[0x3C],
    TIFR1[0x36],
    TIMSK1[0x6F],
    TCCR1A[0x80],
    TCCR1B[0x81],
    TCNT1L[0x84],
    TCNT1H[0x85],
    ICR1L[0x86],
    ICR1H[0x87],
    OCR1AL[0x88],
    OCR1AH[0x89],
    OCR1BL[0x8A],
    OCR1BH[0x8B],
);
