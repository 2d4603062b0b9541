use std::convert::Infallible;
use std::sync::{Arc, Mutex};
use std::thread::{self, ThreadId};

use embedded_hal::digital::{ErrorType, InputPin, OutputPin};

// One sample transaction performs two presence samples and sixteen data
// samples.
const SAMPLES_PER_TRANSACTION: usize = 18;

/// A single recorded line operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineOp {
    SetLow,
    SetHigh,
    Sample,
}

/// Shared, ordered log of line operations tagged with the calling thread.
pub type OpLog = Arc<Mutex<Vec<(ThreadId, LineOp)>>>;

/// An instrumented stand-in for the physical line.
///
/// Every driven level and every sample is recorded, tagged with the
/// calling thread, so tests can verify that concurrent transactions never
/// interleave their bus operations. Sample responses replay a scripted
/// sensor: presence pulses are answered, then the configured raw register
/// is transmitted bit by bit, LSB of the low byte first.
pub struct FakeLine {
    log: OpLog,
    raw: u16,
    present: bool,
    samples: usize,
}

impl FakeLine {
    /// A responding sensor that reports the given raw register.
    pub fn new(raw: u16) -> (Self, OpLog) {
        let log = OpLog::default();
        (
            Self {
                log: Arc::clone(&log),
                raw,
                present: true,
                samples: 0,
            },
            log,
        )
    }

    /// A line with no sensor attached: it never pulls low.
    pub fn absent() -> (Self, OpLog) {
        let log = OpLog::default();
        (
            Self {
                log: Arc::clone(&log),
                raw: 0,
                present: false,
                samples: 0,
            },
            log,
        )
    }

    fn record(&self, op: LineOp) {
        self.log
            .lock()
            .unwrap()
            .push((thread::current().id(), op));
    }
}

impl ErrorType for FakeLine {
    type Error = Infallible;
}

impl OutputPin for FakeLine {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.record(LineOp::SetLow);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.record(LineOp::SetHigh);
        Ok(())
    }
}

impl InputPin for FakeLine {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        self.record(LineOp::Sample);
        if !self.present {
            // The pull-up keeps the idle line high forever.
            return Ok(true);
        }

        let index = self.samples % SAMPLES_PER_TRANSACTION;
        self.samples += 1;
        let level = match index {
            // Presence pulses at the start of each bus phase.
            0 | 1 => false,
            _ => (self.raw >> (index - 2)) & 1 == 1,
        };
        Ok(level)
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        self.is_high().map(|level| !level)
    }
}
