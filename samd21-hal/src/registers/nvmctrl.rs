//! NVMCTRL: flash controller, read timing only.

use bitfield_struct::bitfield;

use super::Reg;

/// NVMCTRL registers used during clock bring-up.
#[repr(C)]
pub struct RegisterBlock {
    _reserved0: [u8; 0x04], // CTRLA
    /// Control B: read wait states and cache behavior.
    pub ctrlb: Reg<Ctrlb, u32>, // 0x04
}

impl RegisterBlock {
    /// NVMCTRL base address.
    pub const PTR: *const Self = 0x4100_4000 as *const Self;

    /// Alias the live NVMCTRL registers.
    ///
    /// # Safety
    /// The caller must be the only writer of NVMCTRL for as long as the
    /// returned reference is used.
    #[inline(always)]
    pub unsafe fn steal() -> &'static Self {
        &*Self::PTR
    }
}

/// Control B register.
#[cfg_attr(not(feature = "defmt"), bitfield(u32))]
#[cfg_attr(feature = "defmt", bitfield(u32, defmt = true))]
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ctrlb {
    __0: bool,

    /// Flash read wait states.
    #[bits(4)]
    pub rws: u8,

    #[bits(2)]
    __1: u8,

    /// Manual write.
    pub manw: bool,
    /// Power reduction mode during sleep.
    #[bits(2)]
    pub sleepprm: u8,

    #[bits(6)]
    __2: u8,

    /// NVM read mode.
    #[bits(2)]
    pub readmode: u8,
    /// Cache disable.
    pub cachedis: bool,

    #[bits(13)]
    __3: u16,
}

#[cfg(test)]
mod test {
    use super::*;
    use core::mem::offset_of;

    #[test]
    fn layout() {
        assert_eq!(0x04, offset_of!(RegisterBlock, ctrlb));
    }

    #[test]
    fn encodings() {
        assert_eq!(0x0000_0004, Ctrlb::new().with_rws(2).into_bits());
    }
}
