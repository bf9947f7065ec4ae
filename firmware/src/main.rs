#![no_std]
#![no_main]

use panic_halt as _;

use samd21_hal as hal;

use hal::delay;
use hal::port::Output;
use hal::registers::port;

mod conf;
mod pinout;

#[cortex_m_rt::entry]
fn main() -> ! {
    let clocks = match conf::run() {
        Ok(clocks) => clocks,
        // a dead oscillator means an unknown clock tree; park rather
        // than run the application on it
        Err(_) => loop {
            cortex_m::asm::wfi();
        },
    };

    // safety: bring-up is done with PORT; the blinker is the only
    // remaining user of PA02
    let port = unsafe { port::RegisterBlock::steal() };
    let mut led = Output::new(port.a(), pinout::LED);

    let khz = clocks.sys_clk().to_kHz();
    loop {
        led.toggle();
        delay::busy_wait_ms(khz, 250);
    }
}
