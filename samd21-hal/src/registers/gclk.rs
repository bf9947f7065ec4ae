//! GCLK: generic clock generators and peripheral clock channels.

use bitfield_struct::bitfield;

use super::Reg;

/// GCLK registers used during clock bring-up.
///
/// GENCTRL and GENDIV are windows over a per-generator register file:
/// the ID field in the written value selects which generator the rest
/// of the value applies to. CLKCTRL works the same way per peripheral
/// channel.
#[repr(C)]
pub struct RegisterBlock {
    _reserved0: [u8; 0x02], // CTRL, STATUS
    /// Peripheral channel control.
    pub clkctrl: Reg<Clkctrl, u16>, // 0x02
    /// Generator control.
    pub genctrl: Reg<Genctrl, u32>, // 0x04
    /// Generator division.
    pub gendiv: Reg<Gendiv, u32>, // 0x08
}

impl RegisterBlock {
    /// GCLK base address.
    pub const PTR: *const Self = 0x4000_0c00 as *const Self;

    /// Alias the live GCLK registers.
    ///
    /// # Safety
    /// The caller must be the only writer of GCLK for as long as the
    /// returned reference is used.
    #[inline(always)]
    pub unsafe fn steal() -> &'static Self {
        &*Self::PTR
    }
}

/// A clock source feeding a generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Source {
    /// External crystal oscillator.
    Xosc = 0,
    /// Generator input pad.
    Gclkin = 1,
    /// Output of generator 1.
    Gclkgen1 = 2,
    /// Internal ultra-low-power 32.768 kHz oscillator.
    Osculp32k = 3,
    /// Internal 32.768 kHz oscillator.
    Osc32k = 4,
    /// External 32.768 kHz crystal oscillator.
    Xosc32k = 5,
    /// Internal 8 MHz oscillator.
    Osc8m = 6,
    /// 48 MHz digital frequency-locked loop.
    Dfll48m = 7,
    /// 96 MHz fractional digital PLL.
    Dpll96m = 8,
}

impl Source {
    /// Every source, in register encoding order.
    pub const ALL: [Self; 9] = [
        Self::Xosc,
        Self::Gclkin,
        Self::Gclkgen1,
        Self::Osculp32k,
        Self::Osc32k,
        Self::Xosc32k,
        Self::Osc8m,
        Self::Dfll48m,
        Self::Dpll96m,
    ];

    pub const fn into_bits(this: Result<Self, u8>) -> u8 {
        match this {
            Ok(v) => v as u8,
            Err(v) => v,
        }
    }

    pub const fn from_bits(v: u8) -> Result<Self, u8> {
        if (v as usize) < Self::ALL.len() {
            Ok(Self::ALL[v as usize])
        } else {
            Err(v)
        }
    }
}

/// A clock generator channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Generator {
    /// Generator 0, the CPU and bus clock.
    Gclk0 = 0,
    Gclk1 = 1,
    Gclk2 = 2,
    Gclk3 = 3,
    Gclk4 = 4,
    Gclk5 = 5,
    Gclk6 = 6,
    Gclk7 = 7,
    Gclk8 = 8,
}

impl Generator {
    /// Every generator, in register ID order.
    pub const ALL: [Self; 9] = [
        Self::Gclk0,
        Self::Gclk1,
        Self::Gclk2,
        Self::Gclk3,
        Self::Gclk4,
        Self::Gclk5,
        Self::Gclk6,
        Self::Gclk7,
        Self::Gclk8,
    ];

    pub const fn into_bits(this: Result<Self, u8>) -> u8 {
        match this {
            Ok(v) => v as u8,
            Err(v) => v,
        }
    }

    pub const fn from_bits(v: u8) -> Result<Self, u8> {
        if (v as usize) < Self::ALL.len() {
            Ok(Self::ALL[v as usize])
        } else {
            Err(v)
        }
    }
}

/// A clock consumer: one peripheral channel of the clock controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Peripheral {
    /// DFLL48M reference.
    Dfll48 = 0,
    /// FDPLL96M reference.
    Fdpll = 1,
    /// FDPLL96M 32 kHz timer.
    Fdpll32k = 2,
    Wdt = 3,
    Rtc = 4,
    Eic = 5,
    Usb = 6,
    Evsys0 = 7,
    Evsys1 = 8,
    Evsys2 = 9,
    Evsys3 = 10,
    Evsys4 = 11,
    Evsys5 = 12,
    Evsys6 = 13,
    Evsys7 = 14,
    Evsys8 = 15,
    Evsys9 = 16,
    Evsys10 = 17,
    Evsys11 = 18,
    /// Shared slow clock for all SERCOMs.
    SercomSlow = 19,
    Sercom0Core = 20,
    Sercom1Core = 21,
    Sercom2Core = 22,
    Sercom3Core = 23,
    Sercom4Core = 24,
    Sercom5Core = 25,
    Tcc0Tcc1 = 26,
    Tcc2Tc3 = 27,
    Tc4Tc5 = 28,
    Tc6Tc7 = 29,
    Adc = 30,
    AcDig = 31,
    AcAna = 32,
    Dac = 33,
    Ptc = 34,
    I2s0 = 35,
    I2s1 = 36,
}

impl Peripheral {
    /// Every peripheral channel, in register ID order.
    pub const ALL: [Self; 37] = [
        Self::Dfll48,
        Self::Fdpll,
        Self::Fdpll32k,
        Self::Wdt,
        Self::Rtc,
        Self::Eic,
        Self::Usb,
        Self::Evsys0,
        Self::Evsys1,
        Self::Evsys2,
        Self::Evsys3,
        Self::Evsys4,
        Self::Evsys5,
        Self::Evsys6,
        Self::Evsys7,
        Self::Evsys8,
        Self::Evsys9,
        Self::Evsys10,
        Self::Evsys11,
        Self::SercomSlow,
        Self::Sercom0Core,
        Self::Sercom1Core,
        Self::Sercom2Core,
        Self::Sercom3Core,
        Self::Sercom4Core,
        Self::Sercom5Core,
        Self::Tcc0Tcc1,
        Self::Tcc2Tc3,
        Self::Tc4Tc5,
        Self::Tc6Tc7,
        Self::Adc,
        Self::AcDig,
        Self::AcAna,
        Self::Dac,
        Self::Ptc,
        Self::I2s0,
        Self::I2s1,
    ];

    pub const fn into_bits(this: Result<Self, u8>) -> u8 {
        match this {
            Ok(v) => v as u8,
            Err(v) => v,
        }
    }

    pub const fn from_bits(v: u8) -> Result<Self, u8> {
        if (v as usize) < Self::ALL.len() {
            Ok(Self::ALL[v as usize])
        } else {
            Err(v)
        }
    }
}

/// Peripheral channel control register.
#[cfg_attr(not(feature = "defmt"), bitfield(u16))]
#[cfg_attr(feature = "defmt", bitfield(u16, defmt = true))]
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Clkctrl {
    /// Peripheral channel this write applies to.
    #[bits(6, from = Peripheral::from_bits, into = Peripheral::into_bits)]
    pub id: Result<Peripheral, u8>,

    #[bits(2)]
    __0: u8,

    /// Generator feeding this channel.
    #[bits(4, from = Generator::from_bits, into = Generator::into_bits)]
    pub gen: Result<Generator, u8>,

    #[bits(2)]
    __1: u8,

    /// Channel clock enable.
    pub clken: bool,
    /// Write lock.
    pub wrtlock: bool,
}

/// Generator control register.
#[cfg_attr(not(feature = "defmt"), bitfield(u32))]
#[cfg_attr(feature = "defmt", bitfield(u32, defmt = true))]
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Genctrl {
    /// Generator this write applies to.
    #[bits(4)]
    pub id: u8,

    #[bits(4)]
    __0: u8,

    /// Source selection.
    #[bits(5, from = Source::from_bits, into = Source::into_bits)]
    pub src: Result<Source, u8>,

    #[bits(3)]
    __1: u8,

    /// Generator enable.
    pub genen: bool,
    /// Improve duty cycle to 50/50.
    pub idc: bool,
    /// Output off value.
    pub oov: bool,
    /// Output enable to the generator pin.
    pub oe: bool,
    /// Divide by 2^(DIV+1) instead of DIV.
    pub divsel: bool,
    /// Run in standby.
    pub runstdby: bool,

    #[bits(10)]
    __2: u16,
}

/// Generator division register.
#[cfg_attr(not(feature = "defmt"), bitfield(u32))]
#[cfg_attr(feature = "defmt", bitfield(u32, defmt = true))]
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Gendiv {
    /// Generator this write applies to.
    #[bits(4)]
    pub id: u8,

    #[bits(4)]
    __0: u8,

    /// Division factor. Width varies per generator; generator 1 has the
    /// full 16 bits, generator 2 only 5, the rest 8.
    #[bits(16)]
    pub div: u16,

    #[bits(8)]
    __1: u8,
}
