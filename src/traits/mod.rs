//! Trait definitions for GPIO hardware abstraction.
//!
//! Devices in this crate never talk to a pin driver directly; they go
//! through the traits defined here so the same device code runs against
//! real GPIO character devices on a Raspberry Pi, against a vendor HAL, or
//! against the in-memory mocks in [`crate::hal`].
//!
//! # Submodules
//!
//! - `gpio`: Logic levels, output lines, and edge-producing input lines
//!
//! The key traits are:
//!
//! - [`OutputPin`]: drive a line high or low
//! - [`InputPin`]: await the next edge on a line

pub mod gpio;

pub use gpio::*;
