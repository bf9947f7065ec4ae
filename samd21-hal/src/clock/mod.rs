//! Clock tree bring-up.
//!
//! The order here is load-bearing: oscillators start before the
//! generators they feed, every generator is programmed before any
//! peripheral channel is routed to one, and the PLL comes up last,
//! after its reference channel exists. Each oscillator is gated by a
//! bounded ready poll; a flag that never rises aborts bring-up instead
//! of hanging it.

use crate::calib::Calibration;
use crate::delay;
use crate::registers::gclk::{self, Clkctrl, Genctrl, Gendiv};
use crate::registers::sysctrl::{
    self, Dfllctrl, Dfllval, Dpllctrla, Dpllctrlb, Dpllratio, Osc32k, RefClk,
};
use crate::registers::{nvmctrl, pm};
use crate::time::Hertz;

mod config;
pub use config::*;

pub use crate::registers::gclk::{Generator, Peripheral};

/// Ready-flag poll budget, in spins.
///
/// Datasheet worst cases are a few hundred microseconds for the DFLL
/// and about a millisecond for OSC32K startup and PLL lock. Even from
/// the 1 MHz reset clock this budget covers those several times over.
const READY_SPINS: u32 = 100_000;

// FDPLL96M target: 96 MHz from a 32.768 kHz reference.
// 96 MHz / 32.768 kHz = 2929.6875 = (2928 + 1) + 11/16
const DPLL_LDR: u16 = 2928;
const DPLL_LDRFRAC: u8 = 11;

/// Flash read wait states needed at 48 MHz.
const RWS_DUAL: u8 = 2;

/// A clock unit that must report ready during bring-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Oscillator {
    /// The 48 MHz frequency-locked loop.
    Dfll48m,
    /// The internal 32.768 kHz oscillator.
    Osc32k,
    /// The 96 MHz fractional PLL.
    Dpll96m,
}

/// Clock bring-up error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// An oscillator or PLL never reported ready. Retrying will not
    /// help; this is a hardware or calibration fault.
    OscillatorTimeout(Oscillator),
    /// A peripheral channel is routed to a disabled generator.
    InvalidBinding(Peripheral),
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        match self {
            Error::OscillatorTimeout(osc) => write!(f, "{:?} never became ready", osc),
            Error::InvalidBinding(p) => {
                write!(f, "{:?} is routed to a disabled clock generator", p)
            }
        }
    }
}

/// Frozen, complete information about the configured clock tree.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Clocks {
    gen: [Option<Hertz>; GEN_COUNT],
}

impl Clocks {
    /// Output frequency of a generator, if the config enables it and
    /// its source rate is known.
    #[inline(always)]
    pub fn generator(&self, gen: Generator) -> Option<Hertz> {
        self.gen[gen as usize]
    }

    /// CPU and AHB clock, generator 0. Falls back to the reset
    /// default (OSC8M prescaled to 1 MHz) if the config leaves
    /// generator 0 alone.
    #[inline(always)]
    pub fn sys_clk(&self) -> Hertz {
        match self.gen[0] {
            Some(f) => f,
            None => Hertz::MHz(1),
        }
    }
}

impl ClockConfig {
    /// Bring up the clock tree described by this config.
    ///
    /// Strictly ordered: DFLL48M (with flash wait states raised first),
    /// OSC32K, the generators, the peripheral channels, the APBC mask,
    /// and finally the FDPLL96M. Returns the frozen [Clocks] on
    /// success. On the first oscillator timeout the tree is left
    /// partially configured and the error says which unit died;
    /// callers should halt rather than continue.
    pub fn apply(
        &self,
        sysctrl: &sysctrl::RegisterBlock,
        gclk: &gclk::RegisterBlock,
        pm: &pm::RegisterBlock,
        nvmctrl: &nvmctrl::RegisterBlock,
        cal: &Calibration,
    ) -> Result<Clocks, Error> {
        // a channel routed to a dead generator must never touch
        // hardware, so reject before the first write
        if let Some(p) = self.unbound_peripheral() {
            return Err(Error::InvalidBinding(p));
        }

        // Start the DFLL. The enable must be written alone before
        // anything else: the DFLL register interface drops writes
        // until its clock has been requested.
        sysctrl.dfllctrl.write(Dfllctrl::new().with_enable(true));
        sysctrl.dfllval.write(
            Dfllval::new()
                .with_coarse(cal.dfll48m_coarse)
                .with_fine(cal.dfll48m_fine),
        );
        // Flash cannot keep up at 48 MHz on one wait state. Raise it
        // before the core runs from the new clock.
        nvmctrl.ctrlb.modify(|r| r.with_rws(RWS_DUAL));
        delay::poll_until(READY_SPINS, || sysctrl.pclksr.read().dfllrdy())
            .map_err(|_| Error::OscillatorTimeout(Oscillator::Dfll48m))?;

        // Start OSC32K with its factory trim.
        sysctrl.osc32k.write(
            Osc32k::new()
                .with_calib(cal.osc32k)
                .with_en32k(true)
                .with_enable(true),
        );
        delay::poll_until(READY_SPINS, || sysctrl.pclksr.read().osc32krdy())
            .map_err(|_| Error::OscillatorTimeout(Oscillator::Osc32k))?;

        // Program the generators. Untouched entries stay disabled.
        for (i, gen) in self.generators.iter().enumerate() {
            let Some(gen) = gen else { continue };
            gclk.gendiv
                .write(Gendiv::new().with_id(i as u8).with_div(gen.divider.bits()));
            gclk.genctrl.write(
                Genctrl::new()
                    .with_id(i as u8)
                    .with_src(Ok(gen.source))
                    .with_divsel(gen.divider.divsel())
                    .with_genen(true),
            );
        }

        // Route the peripheral channels. Every generator above is
        // already enabled, so no channel can see a dead source.
        for (i, target) in self.peripherals.iter().enumerate() {
            let Some(target) = target else { continue };
            gclk.clkctrl.write(
                Clkctrl::new()
                    .with_id(Ok(Peripheral::ALL[i]))
                    .with_gen(Ok(*target))
                    .with_clken(true),
            );
        }

        // Bus clocks. Everything outside APBC is on by default.
        pm.apbcmask.write(self.apbc);

        // Start the PLL against its generic clock reference. Lock
        // detection is unreliable with a 32 kHz reference, so bypass
        // the lock gate and trust CLKRDY.
        sysctrl
            .dpllratio
            .write(Dpllratio::new().with_ldr(DPLL_LDR).with_ldrfrac(DPLL_LDRFRAC));
        sysctrl.dpllctrlb.write(
            Dpllctrlb::new()
                .with_lbypass(true)
                .with_refclk(Ok(RefClk::Gclk)),
        );
        sysctrl.dpllctrla.write(Dpllctrla::new().with_enable(true));
        delay::poll_until(READY_SPINS, || sysctrl.dpllstatus.read().clkrdy())
            .map_err(|_| Error::OscillatorTimeout(Oscillator::Dpll96m))?;

        Ok(self.clocks())
    }

    /// Compute the frozen frequency summary for this config.
    fn clocks(&self) -> Clocks {
        // the PLL reference is whichever generator feeds its channel
        let reference = self.peripherals[Peripheral::Fdpll as usize]
            .and_then(|g| self.generators[g as usize])
            .and_then(|g| gen_freq(&g, None, None));
        let dpll = reference.map(|f| {
            Hertz::from_raw((DPLL_LDR as u32 + 1) * f.raw() + (DPLL_LDRFRAC as u32 * f.raw()) / 16)
        });

        let gen1 = self.generators[1].and_then(|g| gen_freq(&g, dpll, None));

        let mut gen = [None; GEN_COUNT];
        for (i, g) in self.generators.iter().enumerate() {
            gen[i] = g.and_then(|g| gen_freq(&g, dpll, gen1));
        }
        Clocks { gen }
    }
}

/// Rate a source runs at, where the config can know it.
fn source_freq(source: Source, dpll: Option<Hertz>, gen1: Option<Hertz>) -> Option<Hertz> {
    match source {
        Source::Osc32k | Source::Osculp32k | Source::Xosc32k => Some(Hertz::Hz(32_768)),
        // OSC8M keeps its reset prescaler, divide by eight
        Source::Osc8m => Some(Hertz::MHz(1)),
        Source::Dfll48m => Some(Hertz::MHz(48)),
        Source::Dpll96m => dpll,
        Source::Gclkgen1 => gen1,
        // external inputs, rate unknown to the config
        Source::Xosc | Source::Gclkin => None,
    }
}

fn gen_freq(gen: &GenConfig, dpll: Option<Hertz>, gen1: Option<Hertz>) -> Option<Hertz> {
    source_freq(gen.source, dpll, gen1).map(|f| Hertz::from_raw(f.raw() / gen.divider.factor()))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::registers::pm::Apbcmask;
    use crate::registers::sysctrl::{Dpllstatus, Pclksr};

    fn blocks() -> (
        sysctrl::RegisterBlock,
        gclk::RegisterBlock,
        pm::RegisterBlock,
        nvmctrl::RegisterBlock,
    ) {
        // zeroed RAM stand-ins for the hardware blocks
        unsafe { core::mem::zeroed() }
    }

    fn cal() -> Calibration {
        Calibration {
            adc_linearity: 0,
            adc_biascal: 0,
            osc32k: 0x41,
            usb_transn: 0,
            usb_transp: 0,
            usb_trim: 0,
            dfll48m_coarse: 0x1c,
            dfll48m_fine: 0x1ff,
        }
    }

    fn board_config() -> ClockConfig {
        let mut generators = [None; GEN_COUNT];
        generators[0] = Some(GenConfig {
            source: Source::Dfll48m,
            divider: Divider::Div(1),
        });
        generators[1] = Some(GenConfig {
            source: Source::Osc32k,
            divider: Divider::Div(1),
        });
        generators[8] = Some(GenConfig {
            source: Source::Dpll96m,
            divider: Divider::Div(1),
        });

        let mut peripherals = [None; PERIPH_COUNT];
        peripherals[Peripheral::Fdpll as usize] = Some(Generator::Gclk1);
        peripherals[Peripheral::Fdpll32k as usize] = Some(Generator::Gclk1);

        ClockConfig {
            generators,
            peripherals,
            apbc: Apbcmask::new().with_adc(true),
        }
    }

    fn all_ready(sysctrl: &sysctrl::RegisterBlock) {
        sysctrl
            .pclksr
            .write(Pclksr::new().with_dfllrdy(true).with_osc32krdy(true));
        sysctrl.dpllstatus.write(Dpllstatus::new().with_clkrdy(true));
    }

    #[test]
    fn dfll_timeout() {
        let (sysctrl, gclk, pm, nvmctrl) = blocks();
        let result = board_config().apply(&sysctrl, &gclk, &pm, &nvmctrl, &cal());
        assert_eq!(Err(Error::OscillatorTimeout(Oscillator::Dfll48m)), result);
    }

    #[test]
    fn osc32k_timeout() {
        let (sysctrl, gclk, pm, nvmctrl) = blocks();
        sysctrl.pclksr.write(Pclksr::new().with_dfllrdy(true));
        let result = board_config().apply(&sysctrl, &gclk, &pm, &nvmctrl, &cal());
        assert_eq!(Err(Error::OscillatorTimeout(Oscillator::Osc32k)), result);
    }

    #[test]
    fn dpll_timeout() {
        let (sysctrl, gclk, pm, nvmctrl) = blocks();
        sysctrl
            .pclksr
            .write(Pclksr::new().with_dfllrdy(true).with_osc32krdy(true));
        let result = board_config().apply(&sysctrl, &gclk, &pm, &nvmctrl, &cal());
        assert_eq!(Err(Error::OscillatorTimeout(Oscillator::Dpll96m)), result);
    }

    #[test]
    fn oscillators_seeded_from_calibration() {
        let (sysctrl, gclk, pm, nvmctrl) = blocks();
        all_ready(&sysctrl);
        board_config()
            .apply(&sysctrl, &gclk, &pm, &nvmctrl, &cal())
            .unwrap();

        // the DFLL control write is the bare enable
        assert_eq!(Dfllctrl::new().with_enable(true), sysctrl.dfllctrl.read());
        let dfllval = sysctrl.dfllval.read();
        assert_eq!(0x1c, dfllval.coarse());
        assert_eq!(0x1ff, dfllval.fine());

        let osc32k = sysctrl.osc32k.read();
        assert!(osc32k.enable());
        assert!(osc32k.en32k());
        assert_eq!(0x41, osc32k.calib());

        // flash keeps up with 48 MHz
        assert_eq!(2, nvmctrl.ctrlb.read().rws());
    }

    #[test]
    fn generators_routed_and_pll_started() {
        let (sysctrl, gclk, pm, nvmctrl) = blocks();
        all_ready(&sysctrl);
        board_config()
            .apply(&sysctrl, &gclk, &pm, &nvmctrl, &cal())
            .unwrap();

        // generator 8 is configured last, so its setup is what the
        // write windows still hold
        let genctrl = gclk.genctrl.read();
        assert_eq!(8, genctrl.id());
        assert_eq!(Ok(Source::Dpll96m), genctrl.src());
        assert!(genctrl.genen());
        assert!(!genctrl.divsel());
        let gendiv = gclk.gendiv.read();
        assert_eq!(8, gendiv.id());
        assert_eq!(1, gendiv.div());

        // last channel routed is the PLL 32k timer
        let clkctrl = gclk.clkctrl.read();
        assert_eq!(Ok(Peripheral::Fdpll32k), clkctrl.id());
        assert_eq!(Ok(Generator::Gclk1), clkctrl.gen());
        assert!(clkctrl.clken());

        assert_eq!(Apbcmask::new().with_adc(true), pm.apbcmask.read());

        assert_eq!(2928, sysctrl.dpllratio.read().ldr());
        assert_eq!(11, sysctrl.dpllratio.read().ldrfrac());
        let ctrlb = sysctrl.dpllctrlb.read();
        assert!(ctrlb.lbypass());
        assert_eq!(Ok(RefClk::Gclk), ctrlb.refclk());
        assert!(sysctrl.dpllctrla.read().enable());
    }

    #[test]
    fn empty_config_leaves_generators_alone() {
        let (sysctrl, gclk, pm, nvmctrl) = blocks();
        all_ready(&sysctrl);
        let config = ClockConfig {
            generators: [None; GEN_COUNT],
            peripherals: [None; PERIPH_COUNT],
            apbc: Apbcmask::new(),
        };
        config.apply(&sysctrl, &gclk, &pm, &nvmctrl, &cal()).unwrap();

        assert_eq!(0, gclk.genctrl.read().into_bits());
        assert_eq!(0, gclk.gendiv.read().into_bits());
        assert_eq!(0, gclk.clkctrl.read().into_bits());
    }

    #[test]
    fn invalid_binding_rejected_before_any_write() {
        let (sysctrl, gclk, pm, nvmctrl) = blocks();
        all_ready(&sysctrl);
        let mut config = board_config();
        config.peripherals[Peripheral::Adc as usize] = Some(Generator::Gclk3);

        let result = config.apply(&sysctrl, &gclk, &pm, &nvmctrl, &cal());
        assert_eq!(Err(Error::InvalidBinding(Peripheral::Adc)), result);

        // nothing was touched, not even the DFLL
        assert_eq!(0, sysctrl.dfllctrl.read().into_bits());
        assert_eq!(0, nvmctrl.ctrlb.read().into_bits());
    }

    #[test]
    fn frozen_frequencies() {
        let (sysctrl, gclk, pm, nvmctrl) = blocks();
        all_ready(&sysctrl);
        let clocks = board_config()
            .apply(&sysctrl, &gclk, &pm, &nvmctrl, &cal())
            .unwrap();

        assert_eq!(Hertz::MHz(48), clocks.sys_clk());
        assert_eq!(Some(Hertz::Hz(32_768)), clocks.generator(Generator::Gclk1));
        assert_eq!(Some(Hertz::MHz(96)), clocks.generator(Generator::Gclk8));
        assert_eq!(None, clocks.generator(Generator::Gclk2));
    }

    #[test]
    fn reset_default_sys_clk() {
        let clocks = Clocks {
            gen: [None; GEN_COUNT],
        };
        assert_eq!(Hertz::MHz(1), clocks.sys_clk());
    }
}
