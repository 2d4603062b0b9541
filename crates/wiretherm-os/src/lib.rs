//! `wiretherm-os` hosts the [`wiretherm`] protocol engine on an operating
//! system.
//!
//! The engine itself is single-threaded by nature: the 1-Wire line is one
//! shared hardware resource and every bit on it is software timed. This
//! crate adds what an OS-hosted consumer needs around that core:
//!
//! - [`device::SharedDs18b20`] serializes concurrent callers so that at
//!   most one sample transaction is ever in flight, while releasing the
//!   bus during the sensor's multi-hundred-millisecond conversion window.
//! - [`attr`] renders samples into the payload forms a read surface
//!   exposes to consumers: a fixed-point decimal attribute string and the
//!   raw little-endian register.
//! - [`delay::HostDelay`] provides the microsecond busy-wait the protocol
//!   slots require, since an OS scheduler cannot guarantee sub-millisecond
//!   sleep precision.
//!
//! An `std` environment is required.

#![deny(unsafe_code)]
#![deny(missing_docs)]

/// Rendering of samples for consumer-facing read surfaces.
pub mod attr;
/// Host-side delay provider.
pub mod delay;
/// Serialized access to the shared sensor line.
pub mod device;
/// Error management.
pub mod error;
