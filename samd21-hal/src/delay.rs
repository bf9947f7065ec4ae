//! Busy-wait delays and bounded readiness polling.

/// A bounded poll gave up before its condition came true.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Timeout;

impl core::fmt::Display for Timeout {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "bounded poll timed out")
    }
}

/// Block until `ready` returns true, giving up after `max_spins`
/// checks.
///
/// This is the only way bring-up waits on hardware; there is no
/// unbounded loop anywhere in it.
#[inline]
pub fn poll_until(max_spins: u32, mut ready: impl FnMut() -> bool) -> Result<(), Timeout> {
    let mut spins = 0;
    while spins < max_spins {
        if ready() {
            return Ok(());
        }
        core::hint::spin_loop();
        spins += 1;
    }
    Err(Timeout)
}

/// Block for `ms` milliseconds, counted in CPU cycles.
///
/// `cpu_khz` is the core clock in kHz, which is also the cycle count of
/// one millisecond. Accurate to a few cycles; meant for short one-time
/// waits, not timekeeping.
#[inline]
pub fn busy_wait_ms(cpu_khz: u32, ms: u32) {
    cortex_m::asm::delay(cpu_khz.saturating_mul(ms));
}

/// Block for `us` microseconds, counted in CPU cycles.
#[inline]
pub fn busy_wait_us(cpu_mhz: u32, us: u32) {
    cortex_m::asm::delay(cpu_mhz.saturating_mul(us));
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn ready_immediately() {
        assert_eq!(Ok(()), poll_until(1, || true));
    }

    #[test]
    fn ready_after_a_while() {
        let mut n = 0;
        let result = poll_until(100, || {
            n += 1;
            n == 7
        });
        assert_eq!(Ok(()), result);
        assert_eq!(7, n);
    }

    #[test]
    fn gives_up() {
        let mut n = 0u32;
        assert_eq!(Err(Timeout), poll_until(100, || false));
        assert_eq!(
            Err(Timeout),
            poll_until(100, || {
                n += 1;
                false
            })
        );
        // the condition is checked exactly once per spin
        assert_eq!(100, n);
    }

    #[test]
    fn zero_budget_times_out() {
        assert_eq!(Err(Timeout), poll_until(0, || true));
    }
}
