//! GPIO line abstractions.
//!
//! Two small traits decouple device logic from pin drivers. Output lines
//! are synchronous and fallible, matching the character-device and HAL
//! crates they are implemented over; input lines hand out edges
//! asynchronously so a device can simply await the next one.

use core::future::Future;

/// Logic level of a GPIO line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Level {
    /// Line driven low
    Low,
    /// Line driven high
    High,
}

impl Level {
    /// Whether this is the high level.
    pub const fn is_high(&self) -> bool {
        matches!(self, Level::High)
    }

    /// The opposite level, used for active-low wiring.
    pub const fn inverted(&self) -> Level {
        match self {
            Level::Low => Level::High,
            Level::High => Level::Low,
        }
    }
}

impl From<bool> for Level {
    fn from(high: bool) -> Self {
        if high {
            Level::High
        } else {
            Level::Low
        }
    }
}

/// An output line that can be driven high or low.
///
/// # Example
///
/// ```rust
/// use rs_hearth::traits::{Level, OutputPin};
///
/// fn pulse<P: OutputPin>(pin: &mut P) -> Result<(), P::Error> {
///     pin.set_level(Level::High)?;
///     pin.set_level(Level::Low)
/// }
///
/// let mut pin = rs_hearth::hal::MockPin::new();
/// pulse(&mut pin).unwrap();
/// assert_eq!(pin.writes(), vec![Level::High, Level::Low]);
/// ```
pub trait OutputPin {
    /// Error type returned by line writes.
    type Error;

    /// Drives the line to the given level.
    fn set_level(&mut self, level: Level) -> Result<(), Self::Error>;
}

/// An input line that produces edge events.
///
/// Implementations resolve with the level the line settled at after each
/// edge, and with `None` once the line can produce no further edges (for
/// example when the driver or mock feeding it has shut down).
pub trait InputPin {
    /// Waits for the next edge.
    fn next_edge(&mut self) -> impl Future<Output = Option<Level>> + Send;
}

// ============================================================================
// Tests
// ============================================================================
