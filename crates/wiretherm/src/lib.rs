//! `wiretherm` is a software-timed 1-Wire protocol engine with a driver for
//! the `DS18B20` digital temperature sensor.
//!
//! The 1-Wire bus is a single bidirectional data line shared between the
//! host and its peripherals. All signalling is encoded in the duration of
//! low pulses on that line, so the engine bit-bangs the protocol with
//! microsecond-granularity delays instead of relying on dedicated bus
//! hardware.
//!
//! The crate is split along the protocol layers:
//!
//! - [`line`] abstracts the physical pin into the three primitives the
//!   engine needs: drive a level, release the line, sample the level.
//! - [`timing`] gathers every protocol delay into a named profile of
//!   documented minimum durations.
//! - [`wire`] implements the electrical signalling: reset/presence
//!   detection and single-bit read/write slots, composed into LSB-first
//!   byte transfers.
//! - [`ds18b20`] drives the full sample transaction of the sensor and
//!   decodes its two's-complement temperature register.
//!
//! The engine is `no_std` and built on the `embedded-hal` pin and delay
//! traits, so it runs anywhere a GPIO and a microsecond delay source are
//! available. Serialization of concurrent callers is the concern of the
//! hosting layer; see the `wiretherm-os` crate for an OS-hosted wrapper.

#![no_std]
#![deny(unsafe_code)]

pub mod ds18b20;
pub mod line;
pub mod timing;
pub mod wire;
