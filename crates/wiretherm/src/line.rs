//! # Line driver
//!
//! The 1-Wire data line is open drain with an external pull-up resistor:
//! the host and every peripheral may pull the line low, and releasing it
//! lets the pull-up float it back high. This module reduces the physical
//! pin to the three primitives the signalling layer needs.
//!
//! The line must be owned exclusively by the engine for its lifetime. No
//! other component may toggle it while a transaction is possible.

use embedded_hal::digital::{InputPin, OutputPin};

/// Low-level control of the shared 1-Wire data line.
///
/// The contract is open loop: a failure to physically assert a level is
/// not observable at this layer, so only pin access faults are reported.
pub trait LineDriver {
    /// Error raised by the underlying pin.
    type Error;

    /// Drives the line as an output at the given level (`true` is high).
    fn set_output(&mut self, level: bool) -> Result<(), Self::Error>;

    /// Releases the line so peripherals can drive it.
    fn set_input(&mut self) -> Result<(), Self::Error>;

    /// Samples the current line level (`true` is high).
    fn read_level(&mut self) -> Result<bool, Self::Error>;
}

impl<P> LineDriver for P
where
    P: InputPin + OutputPin,
{
    type Error = P::Error;

    fn set_output(&mut self, level: bool) -> Result<(), Self::Error> {
        if level { self.set_high() } else { self.set_low() }
    }

    fn set_input(&mut self) -> Result<(), Self::Error> {
        // Open drain: releasing the driver is the same as letting the
        // pull-up take the line high.
        self.set_high()
    }

    fn read_level(&mut self) -> Result<bool, Self::Error> {
        self.is_high()
    }
}
