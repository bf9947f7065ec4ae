//! PM: power manager, bus clock masks.

use bitfield_struct::bitfield;

use super::Reg;

/// PM registers used during clock bring-up. Everything outside APBC is
/// enabled at reset, so only the APBC mask is modeled.
#[repr(C)]
pub struct RegisterBlock {
    _reserved0: [u8; 0x20], // CTRL through APBBMASK
    /// APBC bridge clock mask.
    pub apbcmask: Reg<Apbcmask, u32>, // 0x20
}

impl RegisterBlock {
    /// PM base address.
    pub const PTR: *const Self = 0x4000_0400 as *const Self;

    /// Alias the live PM registers.
    ///
    /// # Safety
    /// The caller must be the only writer of PM for as long as the
    /// returned reference is used.
    #[inline(always)]
    pub unsafe fn steal() -> &'static Self {
        &*Self::PTR
    }
}

/// APBC bridge clock mask register.
#[cfg_attr(not(feature = "defmt"), bitfield(u32))]
#[cfg_attr(feature = "defmt", bitfield(u32, defmt = true))]
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Apbcmask {
    pub pac2: bool,
    pub evsys: bool,
    pub sercom0: bool,
    pub sercom1: bool,
    pub sercom2: bool,
    pub sercom3: bool,
    pub sercom4: bool,
    pub sercom5: bool,
    pub tcc0: bool,
    pub tcc1: bool,
    pub tcc2: bool,
    pub tc3: bool,
    pub tc4: bool,
    pub tc5: bool,
    pub tc6: bool,
    pub tc7: bool,
    pub adc: bool,
    pub ac: bool,
    pub dac: bool,
    pub ptc: bool,
    pub i2s: bool,

    #[bits(11)]
    __: u16,
}

#[cfg(test)]
mod test {
    use super::*;
    use core::mem::offset_of;

    #[test]
    fn layout() {
        assert_eq!(0x20, offset_of!(RegisterBlock, apbcmask));
    }

    #[test]
    fn encodings() {
        assert_eq!(0x0001_0000, Apbcmask::new().with_adc(true).into_bits());
    }
}
