//! PORT pin autoconfiguration.
//!
//! Each port is described by one [`Role`] per pin; [`configure`] walks
//! the table and applies every role in one pass. Pins multiplexed to a
//! clock output must only be configured after the clock tree is up,
//! which the bring-up order guarantees.

use core::convert::Infallible;

use embedded_hal::digital as hal;

use crate::registers::port::{Group, Pincfg};

pub use crate::registers::port::Function;

/// Pins per port group.
pub const PINS: usize = 32;

/// Electrical and functional configuration for one pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Role {
    /// Leave the pin in its reset state: no writes, minimal power,
    /// nothing driven.
    Unused,
    /// Route the pin to a multiplexed peripheral function.
    Alternate(Function),
    /// Digital input, floating.
    Input,
    /// Digital input with the internal pull-up.
    InputPullUp,
    /// Digital input with the internal pull-down.
    InputPullDown,
    /// Digital output, push-pull. The output level stays at its reset
    /// default; setting it is the application's business.
    Output,
}

/// Apply a role table to a port group.
///
/// Total over [`Role`], so nothing can fail. Running the same table
/// twice ends in the same register state. DIR and the pull directions
/// go through the set/clear registers as accumulated masks, so pins
/// the table does not claim are never disturbed.
pub fn configure(group: &Group, roles: &[Role; PINS]) {
    let mut dirset = 0u32;
    let mut outset = 0u32;
    let mut outclr = 0u32;

    for (i, role) in roles.iter().enumerate() {
        let bit = 1u32 << i;
        match role {
            Role::Unused => {}
            Role::Alternate(f) => {
                // two mux fields per byte, even pin in the low half
                group.pmux[i / 2].modify(|r| {
                    if i % 2 == 0 {
                        r.with_pmuxe(Ok(*f))
                    } else {
                        r.with_pmuxo(Ok(*f))
                    }
                });
                group.pincfg[i].write(Pincfg::new().with_pmuxen(true));
            }
            Role::Input => {
                group.pincfg[i].write(Pincfg::new().with_inen(true));
            }
            Role::InputPullUp => {
                group.pincfg[i].write(Pincfg::new().with_inen(true).with_pullen(true));
                outset |= bit;
            }
            Role::InputPullDown => {
                group.pincfg[i].write(Pincfg::new().with_inen(true).with_pullen(true));
                outclr |= bit;
            }
            Role::Output => {
                dirset |= bit;
            }
        }
    }

    if dirset != 0 {
        group.dirset.write(dirset);
    }
    if outset != 0 {
        group.outset.write(outset);
    }
    if outclr != 0 {
        group.outclr.write(outclr);
    }
}

/// Push-pull output handle for one pin.
///
/// Valid once the pin's role is [`Role::Output`]; all accesses go
/// through the set/clear/toggle registers, so handles to different
/// pins of the same group do not step on each other.
pub struct Output<'a> {
    group: &'a Group,
    mask: u32,
}

impl core::fmt::Debug for Output<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.debug_tuple("Output")
            .field(&self.mask.trailing_zeros())
            .finish()
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Output<'_> {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "Output({})", self.mask.trailing_zeros())
    }
}

impl<'a> Output<'a> {
    /// Wrap pin `pin` of `group`.
    #[inline(always)]
    pub fn new(group: &'a Group, pin: u8) -> Self {
        debug_assert!((pin as usize) < PINS);
        Self {
            group,
            mask: 1 << pin,
        }
    }

    /// Drive the pin high.
    #[inline(always)]
    pub fn set_high(&mut self) {
        self.group.outset.write(self.mask);
    }

    /// Drive the pin low.
    #[inline(always)]
    pub fn set_low(&mut self) {
        self.group.outclr.write(self.mask);
    }

    /// Flip the pin.
    #[inline(always)]
    pub fn toggle(&mut self) {
        self.group.outtgl.write(self.mask);
    }

    /// Is the pin driven high?
    #[inline(always)]
    pub fn is_set_high(&self) -> bool {
        self.group.out.read() & self.mask != 0
    }
}

impl hal::ErrorType for Output<'_> {
    type Error = Infallible;
}

impl hal::OutputPin for Output<'_> {
    #[inline(always)]
    fn set_low(&mut self) -> Result<(), Self::Error> {
        Output::set_low(self);
        Ok(())
    }

    #[inline(always)]
    fn set_high(&mut self) -> Result<(), Self::Error> {
        Output::set_high(self);
        Ok(())
    }
}

impl hal::StatefulOutputPin for Output<'_> {
    #[inline(always)]
    fn is_set_high(&mut self) -> Result<bool, Self::Error> {
        Ok(Output::is_set_high(self))
    }

    #[inline(always)]
    fn is_set_low(&mut self) -> Result<bool, Self::Error> {
        Ok(!Output::is_set_high(self))
    }

    #[inline(always)]
    fn toggle(&mut self) -> Result<(), Self::Error> {
        Output::toggle(self);
        Ok(())
    }
}
