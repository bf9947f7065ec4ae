//! Memory-mapped register surface for the peripherals bring-up touches.
//!
//! Each peripheral is a `#[repr(C)]` block of volatile cells at its
//! datasheet offsets, obtained on hardware with [`steal`] from the fixed
//! base address. Everything that writes these blocks takes them by
//! reference, so tests can point the same code at a zeroed block in RAM.
//!
//! [`steal`]: sysctrl::RegisterBlock::steal

use core::marker::PhantomData;

use vcell::VolatileCell;

pub mod dmac;
pub mod gclk;
pub mod nvmctrl;
pub mod pm;
pub mod port;
pub mod sysctrl;

/// One memory-mapped register, read and written as bitfield type `R`
/// stored in raw width `W`.
#[repr(transparent)]
pub struct Reg<R, W: Copy> {
    value: VolatileCell<W>,
    _marker: PhantomData<R>,
}

impl<R, W: Copy> Reg<R, W>
where
    R: From<W> + Into<W>,
{
    /// Read the register.
    #[inline(always)]
    pub fn read(&self) -> R {
        self.value.get().into()
    }

    /// Write the register.
    #[inline(always)]
    pub fn write(&self, value: R) {
        self.value.set(value.into());
    }

    /// Read the register, transform it, write it back.
    #[inline(always)]
    pub fn modify(&self, f: impl FnOnce(R) -> R) {
        self.write(f(self.read()));
    }
}
