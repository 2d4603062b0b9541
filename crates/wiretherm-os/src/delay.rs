use std::time::{Duration, Instant};

use embedded_hal::delay::DelayNs;

// Below this bound the scheduler cannot be trusted to wake up in time for
// a protocol slot, so the delay spins instead of sleeping.
const SPIN_BOUND: Duration = Duration::from_millis(1);

/// Delay provider for OS-hosted use.
///
/// Protocol slots need microsecond precision that an OS scheduler cannot
/// guarantee, so sub-millisecond delays busy-wait on a monotonic clock.
/// Longer delays, such as the conversion wait, yield to the scheduler
/// with a plain sleep.
///
/// Both paths honor the requested duration as a lower bound only; the
/// protocol tolerates late completion.
#[derive(Debug, Default, Clone, Copy)]
pub struct HostDelay;

impl HostDelay {
    /// Creates a new delay provider.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl DelayNs for HostDelay {
    fn delay_ns(&mut self, ns: u32) {
        let target = Duration::from_nanos(u64::from(ns));
        if target >= SPIN_BOUND {
            std::thread::sleep(target);
            return;
        }

        let start = Instant::now();
        while start.elapsed() < target {
            std::hint::spin_loop();
        }
    }
}
