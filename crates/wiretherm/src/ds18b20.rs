//! # DS18B20 driver
//!
//! This module provides a synchronous driver for the `DS18B20` digital
//! temperature sensor on top of the [`wire`](crate::wire) signalling
//! layer. The driver is synchronous to meet the device's strict timing
//! requirements.
//!
//! The sensor performs temperature conversions internally and exposes the
//! result through its scratchpad memory as a 16-bit two's-complement
//! register scaled by 16. The driver operates in *single-sensor mode*
//! using the `Skip ROM` command to address the device directly without its
//! unique 64-bit ROM code, so exactly one sensor may be connected to the
//! bus.
//!
//! A sample transaction has two bus phases separated by the conversion
//! wait: a reset/`Skip ROM`/`Convert T` phase and a reset/`Skip ROM`/
//! `Read Scratchpad` phase. [`Ds18b20::start_conversion`] and
//! [`Ds18b20::read_raw`] expose the phases individually so a hosting
//! layer can release the bus while the sensor converts;
//! [`Ds18b20::read_temperature`] runs the whole cycle for exclusive
//! owners.
//!
//! The reference sample path reads only the two temperature bytes of the
//! scratchpad and performs no integrity check. Callers that want the
//! CRC-validated form can use [`Ds18b20::read_scratchpad`] instead.
//!
//! For detailed specifications, refer to the
//! [datasheet](https://www.alldatasheet.com/datasheet-pdf/pdf/58557/DALLAS/DS18B20.html).

use embedded_hal::delay::DelayNs;

use crate::line::LineDriver;
use crate::timing::TimingProfile;
use crate::wire::OneWireBus;

// DS18B20 ROM and function commands.
const CMD_SKIP_ROM: u8 = 0xCC;
const CMD_CONVERT_T: u8 = 0x44;
const CMD_READ_SCRATCHPAD: u8 = 0xBE;

// Each LSB of the 16-bit register is 1/16 of a degree Celsius.
const RESOLUTION_C_PER_LSB: f32 = 0.0625;
// The same resolution in the x10000 integer fixed-point form used by
// text read surfaces: 0.0625 C = 625 ten-thousandths.
const RESOLUTION_E4_PER_LSB: i32 = 625;

/// Errors that may occur when interacting with the `DS18B20` sensor.
#[derive(Debug)]
pub enum Error<E> {
    /// Error related to GPIO line access.
    Line(E),
    /// No presence pulse detected on reset; the sensor did not respond.
    NoResponse,
    /// Scratchpad data failed CRC validation.
    ///
    /// Only produced by [`Ds18b20::read_scratchpad`]; the plain sample
    /// path carries no integrity check.
    CrcMismatch,
}

impl<E> From<E> for Error<E> {
    fn from(e: E) -> Self {
        Error::Line(e)
    }
}

/// A decoded temperature sample.
///
/// Wraps the raw 16-bit register as read from the sensor (low byte first,
/// two's complement, scaled by 16). Decoding is a pure function of the
/// register: the same raw value always yields the same temperature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Temperature {
    raw: u16,
}

impl Temperature {
    /// Wraps a raw 16-bit temperature register.
    #[must_use]
    pub const fn from_raw(raw: u16) -> Self {
        Self { raw }
    }

    /// The raw register, pre-decode, as binary read surfaces expose it.
    #[must_use]
    pub const fn raw(self) -> u16 {
        self.raw
    }

    /// `true` if the sign bit of the register is set.
    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.raw & 0x8000 != 0
    }

    // Splits the register into sign and two's-complement magnitude.
    const fn sign_magnitude(self) -> (bool, u16) {
        if self.is_negative() {
            (true, (!self.raw).wrapping_add(1))
        } else {
            (false, self.raw)
        }
    }

    /// The temperature in degrees Celsius.
    #[must_use]
    pub fn degrees_celsius(self) -> f32 {
        let (negative, magnitude) = self.sign_magnitude();
        let degrees = f32::from(magnitude) * RESOLUTION_C_PER_LSB;
        if negative { -degrees } else { degrees }
    }

    /// The temperature multiplied by 10000, as an integer.
    ///
    /// This is the fixed-point form used by text read surfaces so that
    /// consumers never parse floating point: `25.0625` C is reported as
    /// `250625`.
    #[must_use]
    pub const fn celsius_e4(self) -> i32 {
        let (negative, magnitude) = self.sign_magnitude();
        let scaled = magnitude as i32 * RESOLUTION_E4_PER_LSB;
        if negative { -scaled } else { scaled }
    }
}

/// The `DS18B20` driver.
pub struct Ds18b20<L, D>
where
    L: LineDriver,
    D: DelayNs,
{
    bus: OneWireBus<L, D>,
}

impl<L, D> Ds18b20<L, D>
where
    L: LineDriver,
    D: DelayNs,
{
    /// Creates a [`Ds18b20`] driver for the given line and delay provider.
    #[must_use]
    pub fn new(line: L, delay: D) -> Self {
        Self::with_timing(line, delay, TimingProfile::DS18B20)
    }

    /// Creates a [`Ds18b20`] driver with an explicit timing profile.
    #[must_use]
    pub fn with_timing(line: L, delay: D, timing: TimingProfile) -> Self {
        Self {
            bus: OneWireBus::with_timing(line, delay, timing),
        }
    }

    /// Returns the timing profile the driver was built with.
    #[must_use]
    pub const fn timing(&self) -> &TimingProfile {
        self.bus.timing()
    }

    /// Releases the line and delay provider.
    #[must_use]
    pub fn into_parts(self) -> (L, D) {
        self.bus.into_parts()
    }

    /// Starts a temperature conversion.
    ///
    /// Resets the bus, checks for presence, and issues `Skip ROM` followed
    /// by `Convert T`. The sensor then converts autonomously for the
    /// conversion wait of the timing profile; no bus traffic occurs during
    /// that window, so the caller may release the bus until it expires.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoResponse`] if no presence pulse is detected, or
    /// a line error if accessing the pin fails.
    pub fn start_conversion(&mut self) -> Result<(), Error<L::Error>> {
        if !self.bus.reset()? {
            return Err(Error::NoResponse);
        }

        self.bus.write_byte(CMD_SKIP_ROM)?;
        self.bus.write_byte(CMD_CONVERT_T)?;
        Ok(())
    }

    /// Reads the raw temperature register of the most recent conversion.
    ///
    /// Resets the bus, checks for presence, issues `Skip ROM` followed by
    /// `Read Scratchpad`, and reads exactly the two temperature bytes, low
    /// byte first. The register is only returned after a presence-checked
    /// cycle; no partial value is ever produced.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoResponse`] if no presence pulse is detected, or
    /// a line error if accessing the pin fails.
    pub fn read_raw(&mut self) -> Result<Temperature, Error<L::Error>> {
        if !self.bus.reset()? {
            return Err(Error::NoResponse);
        }

        self.bus.write_byte(CMD_SKIP_ROM)?;
        self.bus.write_byte(CMD_READ_SCRATCHPAD)?;

        let low = self.bus.read_byte()?;
        let high = self.bus.read_byte()?;

        Ok(Temperature::from_raw(u16::from(high) << 8 | u16::from(low)))
    }

    /// Performs a full sample cycle and returns the decoded temperature.
    ///
    /// Starts a conversion, blocks for the conversion wait of the timing
    /// profile, and reads the result back. Intended for exclusive owners
    /// of the bus; a hosting layer serializing concurrent callers should
    /// drive [`Self::start_conversion`] and [`Self::read_raw`] itself so
    /// the bus lock can be dropped during the wait.
    ///
    /// # Notes
    ///
    /// After a power-on reset the temperature register reads 85.0 C until
    /// the first conversion completes, so discard the first sample after
    /// powering the sensor.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoResponse`] if no presence pulse is detected at
    /// either phase, or a line error if accessing the pin fails.
    pub fn read_temperature(&mut self) -> Result<Temperature, Error<L::Error>> {
        self.start_conversion()?;
        self.bus.wait_ms(self.timing().conversion_wait_ms);
        self.read_raw()
    }

    /// Reads and CRC-verifies the full 9-byte scratchpad.
    ///
    /// The opt-in integrity-checked variant of [`Self::read_raw`]: bytes 0
    /// and 1 are the temperature register, byte 8 is the Dallas CRC-8 of
    /// the first eight bytes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoResponse`] if no presence pulse is detected,
    /// [`Error::CrcMismatch`] if the checksum does not match, or a line
    /// error if accessing the pin fails.
    pub fn read_scratchpad(&mut self) -> Result<[u8; 9], Error<L::Error>> {
        if !self.bus.reset()? {
            return Err(Error::NoResponse);
        }

        self.bus.write_byte(CMD_SKIP_ROM)?;
        self.bus.write_byte(CMD_READ_SCRATCHPAD)?;

        let mut data = [0u8; 9];
        for byte in &mut data {
            *byte = self.bus.read_byte()?;
        }

        if Self::crc8(&data[0..8]) != data[8] {
            return Err(Error::CrcMismatch);
        }

        Ok(data)
    }

    fn crc8(data: &[u8]) -> u8 {
        let mut crc: u8 = 0;

        // Dallas/Maxim CRC8, polynomial 0x31 reflected.
        for &byte in data {
            let mut b = byte;
            for _ in 0..8 {
                let mix = (crc ^ b) & 0x01;
                crc >>= 1;
                if mix != 0 {
                    crc ^= 0x8C;
                }
                b >>= 1;
            }
        }

        crc
    }
}
