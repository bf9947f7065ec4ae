//! Board bring-up: the clock plan and the ordered configurator chain.

use samd21_hal::calib::Calibration;
use samd21_hal::clock::{
    self, ClockConfig, Clocks, Divider, GenConfig, Generator, Peripheral, Source, GEN_COUNT,
    PERIPH_COUNT,
};
use samd21_hal::registers::pm::Apbcmask;
use samd21_hal::registers::{gclk, nvmctrl, pm, port, sysctrl};

use crate::pinout;

// Maximum clock frequencies: datasheet 37.6.

/// The board clock tree. GCLK0 carries the CPU at 48 MHz off the DFLL,
/// GCLK1 is the 32.768 kHz reference that feeds the PLL channels, and
/// GCLK8 carries the 96 MHz PLL output.
pub const CLOCKS: ClockConfig = ClockConfig {
    generators: generators(),
    peripherals: peripherals(),
    // everything outside APBC is on by default; on APBC only the ADC
    // earns its clock
    apbc: Apbcmask::new().with_adc(true),
};

// a peripheral routed to a disabled generator is a board bug, caught
// here rather than on the device
const _: () = assert!(CLOCKS.valid());

const fn generators() -> [Option<GenConfig>; GEN_COUNT] {
    let mut gen = [None; GEN_COUNT];
    // 48 MHz
    gen[Generator::Gclk0 as usize] = Some(GenConfig {
        source: Source::Dfll48m,
        divider: Divider::Div(1),
    });
    // 32.768 kHz
    gen[Generator::Gclk1 as usize] = Some(GenConfig {
        source: Source::Osc32k,
        divider: Divider::Div(1),
    });
    // 96 MHz
    gen[Generator::Gclk8 as usize] = Some(GenConfig {
        source: Source::Dpll96m,
        divider: Divider::Div(1),
    });
    gen
}

const fn peripherals() -> [Option<Generator>; PERIPH_COUNT] {
    let mut routed = [None; PERIPH_COUNT];
    routed[Peripheral::Fdpll as usize] = Some(Generator::Gclk1);
    routed[Peripheral::Fdpll32k as usize] = Some(Generator::Gclk1);
    routed
}

/// Run every configurator in dependency order: clocks before pins,
/// pins before everything that drives them. Returns on the first
/// failure without touching later stages.
pub fn run() -> Result<Clocks, clock::Error> {
    // safety: bring-up runs once, before interrupts, and is the only
    // writer of these blocks until it returns
    let (sysctrl, gclk, pm, nvmctrl, port_regs) = unsafe {
        (
            sysctrl::RegisterBlock::steal(),
            gclk::RegisterBlock::steal(),
            pm::RegisterBlock::steal(),
            nvmctrl::RegisterBlock::steal(),
            port::RegisterBlock::steal(),
        )
    };

    let clocks = CLOCKS.apply(sysctrl, gclk, pm, nvmctrl, &Calibration::read())?;

    samd21_hal::port::configure(port_regs.a(), &pinout::PORTA);
    samd21_hal::port::configure(port_regs.b(), &pinout::PORTB);

    conf_adc();
    conf_dmac();
    conf_eic();
    conf_evsys();
    conf_sercom();
    conf_tc();
    conf_tcc();
    conf_usb();

    Ok(clocks)
}

// The remaining configurators keep their slots in the chain; each one
// fills in when its peripheral grows a driver.

fn conf_adc() {}

fn conf_dmac() {}

fn conf_eic() {}

fn conf_evsys() {}

fn conf_sercom() {}

fn conf_tc() {}

fn conf_tcc() {}

fn conf_usb() {}
