//! Mock implementations for testing without hardware.
//!
//! Test doubles for the GPIO traits, so devices can be exercised on a
//! desktop machine with no pins attached.
//!
//! # Available Mocks
//!
//! | Mock | Trait | Purpose |
//! |------|-------|---------|
//! | [`MockPin`] | [`OutputPin`] | Records every level written to a line |
//! | [`MockLine`] | [`InputPin`] | Replays edges fed in by the test |
//!
//! # Example
//!
//! ```rust
//! use rs_hearth::hal::MockPin;
//! use rs_hearth::traits::{Level, OutputPin};
//!
//! let mut pin = MockPin::new();
//! pin.set_level(Level::High).unwrap();
//!
//! assert_eq!(pin.level(), Some(Level::High));
//! assert_eq!(pin.writes(), vec![Level::High]);
//! ```
//!
//! [`OutputPin`]: crate::traits::OutputPin
//! [`InputPin`]: crate::traits::InputPin

use core::convert::Infallible;
use core::future::Future;
use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;

use crate::traits::{InputPin, Level, OutputPin};

// ============================================================================
// Output Mock
// ============================================================================

/// Mock output line that records every level written to it.
///
/// Cloning yields another handle onto the same line, so a test can keep
/// one handle for inspection and move the other into a device.
///
/// # Example
///
/// ```rust
/// use rs_hearth::hal::MockPin;
/// use rs_hearth::traits::{Level, OutputPin};
///
/// let probe = MockPin::new();
/// let mut line = probe.clone();
///
/// line.set_level(Level::High).unwrap();
/// line.set_level(Level::Low).unwrap();
///
/// assert_eq!(probe.level(), Some(Level::Low));
/// assert_eq!(probe.writes().len(), 2);
/// ```
#[derive(Clone, Debug, Default)]
pub struct MockPin {
    writes: Arc<Mutex<Vec<Level>>>,
}

impl MockPin {
    /// Creates a new mock line with no writes recorded.
    pub fn new() -> Self {
        Self::default()
    }

    /// The level the line currently sits at, if anything was written.
    pub fn level(&self) -> Option<Level> {
        self.writes.lock().unwrap().last().copied()
    }

    /// Every level written, in write order.
    pub fn writes(&self) -> Vec<Level> {
        self.writes.lock().unwrap().clone()
    }
}

impl OutputPin for MockPin {
    type Error = Infallible;

    fn set_level(&mut self, level: Level) -> Result<(), Self::Error> {
        self.writes.lock().unwrap().push(level);
        Ok(())
    }
}

// ============================================================================
// Input Mock
// ============================================================================

/// Mock input line that replays edges fed in through a [`MockLineHandle`].
///
/// # Example
///
/// ```rust
/// use rs_hearth::hal::MockLine;
/// use rs_hearth::traits::{InputPin, Level};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let (mut line, handle) = MockLine::new();
/// handle.emit(Level::High);
///
/// assert_eq!(line.next_edge().await, Some(Level::High));
/// # }
/// ```
#[derive(Debug)]
pub struct MockLine {
    edges: mpsc::UnboundedReceiver<Level>,
}

/// Feeding side of a [`MockLine`].
#[derive(Clone, Debug)]
pub struct MockLineHandle {
    edges: mpsc::UnboundedSender<Level>,
}

impl MockLine {
    /// Creates a line together with the handle that feeds it.
    pub fn new() -> (Self, MockLineHandle) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { edges: rx }, MockLineHandle { edges: tx })
    }
}

impl MockLineHandle {
    /// Emits one edge on the line.
    ///
    /// Edges emitted after the line was dropped are discarded.
    pub fn emit(&self, level: Level) {
        let _ = self.edges.send(level);
    }

    /// Emits a rising edge.
    pub fn rise(&self) {
        self.emit(Level::High);
    }

    /// Emits a falling edge.
    pub fn fall(&self) {
        self.emit(Level::Low);
    }
}

impl InputPin for MockLine {
    fn next_edge(&mut self) -> impl Future<Output = Option<Level>> + Send {
        self.edges.recv()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // MockPin Tests
    // =========================================================================

    #[test]
    fn mock_pin_starts_unwritten() {
        let pin = MockPin::new();
        assert_eq!(pin.level(), None);
        assert!(pin.writes().is_empty());
    }

    #[test]
    fn mock_pin_records_writes_in_order() {
        let mut pin = MockPin::new();
        pin.set_level(Level::High).unwrap();
        pin.set_level(Level::Low).unwrap();
        pin.set_level(Level::High).unwrap();

        assert_eq!(pin.writes(), vec![Level::High, Level::Low, Level::High]);
        assert_eq!(pin.level(), Some(Level::High));
    }

    #[test]
    fn mock_pin_clones_share_the_line() {
        let probe = MockPin::new();
        let mut line = probe.clone();

        line.set_level(Level::High).unwrap();
        assert_eq!(probe.level(), Some(Level::High));
    }

    // =========================================================================
    // MockLine Tests
    // =========================================================================

    #[tokio::test]
    async fn mock_line_replays_edges_in_order() {
        let (mut line, handle) = MockLine::new();
        handle.rise();
        handle.fall();

        assert_eq!(line.next_edge().await, Some(Level::High));
        assert_eq!(line.next_edge().await, Some(Level::Low));
    }

    #[tokio::test]
    async fn mock_line_ends_when_handle_is_dropped() {
        let (mut line, handle) = MockLine::new();
        handle.emit(Level::High);
        drop(handle);

        assert_eq!(line.next_edge().await, Some(Level::High));
        assert_eq!(line.next_edge().await, None);
    }

    #[tokio::test]
    async fn mock_line_handle_clones_feed_the_same_line() {
        let (mut line, handle) = MockLine::new();
        let other = handle.clone();

        handle.rise();
        other.fall();

        assert_eq!(line.next_edge().await, Some(Level::High));
        assert_eq!(line.next_edge().await, Some(Level::Low));
    }
}
