use std::sync::{Mutex, PoisonError, TryLockError};
use std::thread;
use std::time::Duration;

use embedded_hal::delay::DelayNs;

use tracing::{debug, warn};

use wiretherm::ds18b20::{Ds18b20, Temperature};
use wiretherm::line::LineDriver;

use crate::error::{Error, ErrorKind, Result};

/// Serialized access to a single `DS18B20` on a shared line.
///
/// The wrapper holds two locks with different scopes:
///
/// - A *transaction* lock that spans a whole sample cycle, conversion wait
///   included. It fully serializes callers: transaction N+1 does not
///   start its first reset until transaction N has produced its result
///   and released the lock.
/// - A *bus* lock that guards the line itself. It is held tightly around
///   each bus phase (reset, command bytes, data bytes) and released
///   during the conversion wait, when no bus traffic occurs, so that the
///   line is never pinned for the full multi-hundred-millisecond window.
///
/// A transaction cannot be cancelled once started; interrupting an open
/// slot would leave the line in an inconsistent electrical state. A
/// caller-side timeout can only abandon the result, not abort the
/// hardware sequence.
pub struct SharedDs18b20<L, D>
where
    L: LineDriver,
    D: DelayNs,
{
    bus: Mutex<Ds18b20<L, D>>,
    transaction: Mutex<()>,
    conversion_wait: Duration,
}

impl<L, D> SharedDs18b20<L, D>
where
    L: LineDriver,
    D: DelayNs,
    L::Error: std::fmt::Debug,
{
    /// Wraps a sensor driver for shared use.
    ///
    /// The driver must own its line exclusively; after this call all
    /// access goes through the wrapper.
    #[must_use]
    pub fn new(sensor: Ds18b20<L, D>) -> Self {
        let conversion_wait = Duration::from_millis(u64::from(sensor.timing().conversion_wait_ms));
        Self {
            bus: Mutex::new(sensor),
            transaction: Mutex::new(()),
            conversion_wait,
        }
    }

    /// Runs one full sample transaction, blocking until the line is free.
    ///
    /// Each call triggers a fresh conversion on the sensor; samples are
    /// never cached. The call blocks for at least the conversion wait of
    /// the sensor's timing profile, plus any time spent waiting for an
    /// in-flight transaction to finish.
    ///
    /// # Errors
    ///
    /// Returns an error of kind [`ErrorKind::NoResponse`] if the sensor
    /// does not answer either presence check, or [`ErrorKind::Line`] if
    /// accessing the pin fails. No partial sample is ever returned.
    pub fn sample(&self) -> Result<Temperature> {
        let _transaction = self
            .transaction
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        self.run_transaction()
    }

    /// As [`Self::sample`], but fails instead of waiting for the line.
    ///
    /// # Errors
    ///
    /// Returns an error of kind [`ErrorKind::BusBusy`] when another
    /// transaction is in flight, otherwise as [`Self::sample`].
    pub fn try_sample(&self) -> Result<Temperature> {
        let _transaction = match self.transaction.try_lock() {
            Ok(guard) => guard,
            Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner(),
            Err(TryLockError::WouldBlock) => {
                return Err(Error::new(
                    ErrorKind::BusBusy,
                    "another sample transaction is in flight",
                ));
            }
        };
        self.run_transaction()
    }

    // Caller must hold the transaction lock.
    fn run_transaction(&self) -> Result<Temperature> {
        {
            let mut bus = self.bus.lock().unwrap_or_else(PoisonError::into_inner);
            if let Err(e) = bus.start_conversion() {
                warn!("sample aborted at convert phase");
                return Err(e.into());
            }
        }

        // The sensor converts autonomously; no bus traffic until the wait
        // expires, so the bus lock stays released.
        debug!(wait_ms = self.conversion_wait.as_millis() as u64, "conversion started");
        thread::sleep(self.conversion_wait);

        let sample = {
            let mut bus = self.bus.lock().unwrap_or_else(PoisonError::into_inner);
            match bus.read_raw() {
                Ok(sample) => sample,
                Err(e) => {
                    warn!("sample aborted at read phase");
                    return Err(e.into());
                }
            }
        };

        debug!(raw = sample.raw(), "sample complete");
        Ok(sample)
    }
}
