//! Factory calibration values from the NVM software calibration row.

use bitfield_struct::bitfield;

// Bits 63..0 of the calibration row.
#[bitfield(u64)]
struct RowLo {
    #[bits(27)]
    __: u32,

    #[bits(8)]
    adc_linearity: u8,
    #[bits(3)]
    adc_biascal: u8,
    #[bits(7)]
    osc32k: u8,
    #[bits(5)]
    usb_transn: u8,
    #[bits(5)]
    usb_transp: u8,
    #[bits(3)]
    usb_trim: u8,
    #[bits(6)]
    dfll48m_coarse: u8,
}

// Bits 127..64. The fine value is absent from some datasheet revisions
// but present in silicon.
#[bitfield(u64)]
struct RowHi {
    #[bits(10)]
    dfll48m_fine: u16,

    #[bits(54)]
    __: u64,
}

/// Factory trim and bias values, read once at startup and immutable
/// afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Calibration {
    /// ADC linearity trim.
    pub adc_linearity: u8,
    /// ADC bias trim.
    pub adc_biascal: u8,
    /// OSC32K frequency calibration.
    pub osc32k: u8,
    /// USB pad TRANSN trim.
    pub usb_transn: u8,
    /// USB pad TRANSP trim.
    pub usb_transp: u8,
    /// USB pad output trim.
    pub usb_trim: u8,
    /// DFLL48M coarse tuning.
    pub dfll48m_coarse: u8,
    /// DFLL48M fine tuning.
    pub dfll48m_fine: u16,
}

impl Calibration {
    /// Address of the NVM software calibration row.
    pub const ROW: *const u64 = 0x0080_6020 as *const u64;

    /// Read the calibration row from NVM.
    #[inline]
    pub fn read() -> Self {
        // safety: the row is part of the always-readable NVM auxiliary
        // space; nothing ever writes it
        let (lo, hi) = unsafe { (Self::ROW.read_volatile(), Self::ROW.add(1).read_volatile()) };
        Self::from_row(lo, hi)
    }

    /// Decode the two 64-bit words of the calibration row.
    pub const fn from_row(lo: u64, hi: u64) -> Self {
        let lo = RowLo::from_bits(lo);
        let hi = RowHi::from_bits(hi);
        Self {
            adc_linearity: lo.adc_linearity(),
            adc_biascal: lo.adc_biascal(),
            osc32k: lo.osc32k(),
            usb_transn: lo.usb_transn(),
            usb_transp: lo.usb_transp(),
            usb_trim: lo.usb_trim(),
            dfll48m_coarse: lo.dfll48m_coarse(),
            dfll48m_fine: hi.dfll48m_fine(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn decode() {
        let lo = (0xa5u64 << 27)
            | (0x5u64 << 35)
            | (0x55u64 << 38)
            | (0x19u64 << 45)
            | (0x0bu64 << 50)
            | (0x5u64 << 55)
            | (0x2au64 << 58);
        let hi = 0x155u64;

        let cal = Calibration::from_row(lo, hi);
        assert_eq!(0xa5, cal.adc_linearity);
        assert_eq!(0x5, cal.adc_biascal);
        assert_eq!(0x55, cal.osc32k);
        assert_eq!(0x19, cal.usb_transn);
        assert_eq!(0x0b, cal.usb_transp);
        assert_eq!(0x5, cal.usb_trim);
        assert_eq!(0x2a, cal.dfll48m_coarse);
        assert_eq!(0x155, cal.dfll48m_fine);
    }

    #[test]
    fn reserved_bits_ignored() {
        let cal = Calibration::from_row(0x07ff_ffff, !0x3ffu64);
        assert_eq!(0, cal.osc32k);
        assert_eq!(0, cal.dfll48m_coarse);
        assert_eq!(0, cal.dfll48m_fine);
    }
}
