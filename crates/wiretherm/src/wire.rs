//! # Bit and byte signalling
//!
//! This module implements the electrical layer of the 1-Wire protocol:
//! reset/presence detection and the timed slots that carry single bits,
//! composed into LSB-first byte transfers.
//!
//! All timing is cooperative busy-waiting through the delay provider; no
//! timer interrupts are involved. The calling context must therefore not
//! be preempted for unbounded periods while a slot is open, which keeps
//! each critical section in the low hundreds of microseconds.

use embedded_hal::delay::DelayNs;

use crate::line::LineDriver;
use crate::timing::TimingProfile;

/// The software-timed 1-Wire bus engine.
///
/// Owns the data line and the delay provider for its whole lifetime and
/// performs every transition the protocol requires. The bus itself keeps
/// no transfer state: correctness of byte transfers rests entirely on the
/// timing fidelity of the single-bit operations.
pub struct OneWireBus<L, D>
where
    L: LineDriver,
    D: DelayNs,
{
    line: L,
    delay: D,
    timing: TimingProfile,
}

impl<L, D> OneWireBus<L, D>
where
    L: LineDriver,
    D: DelayNs,
{
    /// Creates a bus over the given line with the default DS18B20 timings.
    #[must_use]
    pub fn new(line: L, delay: D) -> Self {
        Self::with_timing(line, delay, TimingProfile::DS18B20)
    }

    /// Creates a bus with an explicit timing profile.
    #[must_use]
    pub fn with_timing(line: L, delay: D, timing: TimingProfile) -> Self {
        Self {
            line,
            delay,
            timing,
        }
    }

    /// Returns the timing profile the bus was built with.
    #[must_use]
    pub const fn timing(&self) -> &TimingProfile {
        &self.timing
    }

    /// Releases the line and delay provider.
    #[must_use]
    pub fn into_parts(self) -> (L, D) {
        (self.line, self.delay)
    }

    /// Issues a reset pulse and checks for a presence pulse.
    ///
    /// The line is held low for the reset hold time, released, and sampled
    /// inside the presence window. A peripheral pulls the line low within
    /// 60-240 us of release, so a low sample means at least one device is
    /// present and listening. The bus is left driven idle-high.
    ///
    /// Returns `Ok(false)` when the line stays high; an absent sensor is a
    /// recoverable condition for the caller, not a fault.
    ///
    /// # Errors
    ///
    /// Returns an error if accessing the line fails.
    pub fn reset(&mut self) -> Result<bool, L::Error> {
        self.line.set_output(false)?;
        self.delay.delay_us(self.timing.reset_low_us);

        self.line.set_output(true)?;
        self.delay.delay_us(self.timing.presence_sample_us);

        self.line.set_input()?;
        let present = !self.line.read_level()?;
        if present {
            // Wait out the rest of the presence pulse before driving again.
            self.delay.delay_us(self.timing.presence_hold_us);
        }

        self.line.set_output(true)?;
        Ok(present)
    }

    /// Writes a single bit slot.
    ///
    /// The slot opens with a short low pulse; a one releases the line
    /// almost immediately afterwards while a zero keeps it driven low for
    /// the bulk of the slot. The line is forced back high at the end and a
    /// recovery gap is held before the next slot may open.
    ///
    /// Values greater than one are clamped to one rather than rejected.
    ///
    /// # Errors
    ///
    /// Returns an error if accessing the line fails.
    pub fn write_bit(&mut self, bit: u8) -> Result<(), L::Error> {
        let bit = bit.min(1);

        self.line.set_output(true)?;
        self.delay.delay_us(self.timing.write_idle_us);

        self.line.set_output(false)?;
        self.delay.delay_us(self.timing.slot_start_us);

        self.line.set_output(bit != 0)?;
        self.delay.delay_us(self.timing.slot_hold_us);

        self.line.set_output(true)?;
        self.delay.delay_us(self.timing.slot_recovery_us);
        Ok(())
    }

    /// Reads a single bit slot.
    ///
    /// The host opens the slot with a short low pulse, releases the line,
    /// and samples it within 15 us of the slot start; the peripheral holds
    /// the line low through the sample point to transmit a zero. The
    /// remainder of the minimum slot period is waited out before return.
    ///
    /// # Errors
    ///
    /// Returns an error if accessing the line fails.
    pub fn read_bit(&mut self) -> Result<bool, L::Error> {
        self.line.set_output(false)?;
        self.delay.delay_us(self.timing.slot_start_us);

        self.line.set_input()?;
        self.delay.delay_us(self.timing.read_sample_us);
        let bit = self.line.read_level()?;

        self.delay.delay_us(self.timing.read_tail_us);
        Ok(bit)
    }

    /// Writes a byte, least-significant bit first.
    ///
    /// # Errors
    ///
    /// Returns an error if accessing the line fails.
    pub fn write_byte(&mut self, byte: u8) -> Result<(), L::Error> {
        for i in 0..8 {
            self.write_bit((byte >> i) & 1)?;
        }
        Ok(())
    }

    /// Reads a byte, least-significant bit first.
    ///
    /// # Errors
    ///
    /// Returns an error if accessing the line fails.
    pub fn read_byte(&mut self) -> Result<u8, L::Error> {
        let mut byte = 0;
        for i in 0..8 {
            if self.read_bit()? {
                byte |= 1 << i;
            }
        }
        Ok(byte)
    }

    pub(crate) fn wait_ms(&mut self, ms: u32) {
        self.delay.delay_ms(ms);
    }
}
