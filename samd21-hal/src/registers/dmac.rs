//! DMAC: only the CRC engine is modeled.

use bitfield_struct::bitfield;

use super::Reg;

/// DMAC registers used by the CRC wrapper.
#[repr(C)]
pub struct RegisterBlock {
    /// Control.
    pub ctrl: Reg<Ctrl, u16>, // 0x00
    /// CRC control.
    pub crcctrl: Reg<Crcctrl, u16>, // 0x02
    /// CRC data input.
    pub crcdatain: Reg<u32, u32>, // 0x04
    /// CRC checksum.
    pub crcchksum: Reg<u32, u32>, // 0x08
}

impl RegisterBlock {
    /// DMAC base address.
    pub const PTR: *const Self = 0x4100_4800 as *const Self;

    /// Alias the live DMAC registers.
    ///
    /// # Safety
    /// The caller must be the only user of the CRC engine for as long
    /// as the returned reference is used.
    #[inline(always)]
    pub unsafe fn steal() -> &'static Self {
        &*Self::PTR
    }
}

/// Control register.
#[cfg_attr(not(feature = "defmt"), bitfield(u16))]
#[cfg_attr(feature = "defmt", bitfield(u16, defmt = true))]
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ctrl {
    /// Software reset.
    pub swrst: bool,
    /// DMA enable.
    pub dmaenable: bool,
    /// CRC engine enable.
    pub crcenable: bool,

    #[bits(5)]
    __0: u8,

    pub lvlen0: bool,
    pub lvlen1: bool,
    pub lvlen2: bool,
    pub lvlen3: bool,

    #[bits(4)]
    __1: u8,
}

/// CRC beat size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum BeatSize {
    Byte = 0,
    Hword = 1,
    Word = 2,
}

impl BeatSize {
    pub const fn into_bits(this: Result<Self, u8>) -> u8 {
        match this {
            Ok(v) => v as u8,
            Err(v) => v,
        }
    }

    pub const fn from_bits(v: u8) -> Result<Self, u8> {
        match v {
            0 => Ok(Self::Byte),
            1 => Ok(Self::Hword),
            2 => Ok(Self::Word),
            _ => Err(v),
        }
    }
}

/// CRC polynomial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Poly {
    /// CRC16/CCITT.
    Crc16 = 0,
    /// CRC32 (IEEE 802.3).
    Crc32 = 1,
}

impl Poly {
    pub const fn into_bits(this: Result<Self, u8>) -> u8 {
        match this {
            Ok(v) => v as u8,
            Err(v) => v,
        }
    }

    pub const fn from_bits(v: u8) -> Result<Self, u8> {
        match v {
            0 => Ok(Self::Crc16),
            1 => Ok(Self::Crc32),
            _ => Err(v),
        }
    }
}

/// CRC input source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum CrcSource {
    /// No action.
    Noact = 0,
    /// CPU writes to CRCDATAIN.
    Io = 1,
}

impl CrcSource {
    pub const fn into_bits(this: Result<Self, u8>) -> u8 {
        match this {
            Ok(v) => v as u8,
            Err(v) => v,
        }
    }

    pub const fn from_bits(v: u8) -> Result<Self, u8> {
        match v {
            0 => Ok(Self::Noact),
            1 => Ok(Self::Io),
            _ => Err(v),
        }
    }
}

/// CRC control register.
#[cfg_attr(not(feature = "defmt"), bitfield(u16))]
#[cfg_attr(feature = "defmt", bitfield(u16, defmt = true))]
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Crcctrl {
    /// Beat size fed through CRCDATAIN.
    #[bits(2, from = BeatSize::from_bits, into = BeatSize::into_bits)]
    pub crcbeatsize: Result<BeatSize, u8>,
    /// Polynomial selection.
    #[bits(2, from = Poly::from_bits, into = Poly::into_bits)]
    pub crcpoly: Result<Poly, u8>,

    #[bits(4)]
    __0: u8,

    /// Input source.
    #[bits(6, from = CrcSource::from_bits, into = CrcSource::into_bits)]
    pub crcsrc: Result<CrcSource, u8>,

    #[bits(2)]
    __1: u8,
}

#[cfg(test)]
mod test {
    use super::*;
    use core::mem::offset_of;

    #[test]
    fn layout() {
        assert_eq!(0x02, offset_of!(RegisterBlock, crcctrl));
        assert_eq!(0x04, offset_of!(RegisterBlock, crcdatain));
        assert_eq!(0x08, offset_of!(RegisterBlock, crcchksum));
    }

    #[test]
    fn encodings() {
        assert_eq!(
            0x0101,
            Crcctrl::new()
                .with_crcsrc(Ok(CrcSource::Io))
                .with_crcpoly(Ok(Poly::Crc16))
                .with_crcbeatsize(Ok(BeatSize::Hword))
                .into_bits()
        );
    }
}
