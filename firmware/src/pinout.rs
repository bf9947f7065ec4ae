//! Board pinout: one role per physical pin, consumed by the PORT
//! autoconfiguration during bring-up.

use samd21_hal::port::{Role, PINS};

/// Status LED, PA02.
pub const LED: u8 = 2;

/// Pin roles for PORTA.
pub static PORTA: [Role; PINS] = porta();

const fn porta() -> [Role; PINS] {
    let mut roles = [Role::Unused; PINS];
    roles[LED as usize] = Role::Output;
    roles
}

/// Pin roles for PORTB. Nothing on this port is used yet.
pub static PORTB: [Role; PINS] = [Role::Unused; PINS];
