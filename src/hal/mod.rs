//! Hardware Abstraction Layer implementations.
//!
//! Concrete implementations of the GPIO traits defined in
//! [`crate::traits`].
//!
//! # Available Implementations
//!
//! - `mock`: In-memory lines for desktop development and tests
//!
//! Real platform bindings (Raspberry Pi character devices, vendor HALs)
//! live in downstream crates that implement [`crate::traits::OutputPin`]
//! and [`crate::traits::InputPin`] for their own pin types.

pub mod mock;

pub use mock::*;
