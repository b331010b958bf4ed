//! Crate-wide error and result types.

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = core::result::Result<T, Error>;

/// Everything that can fail across scheduling, devices, and the channel.
#[derive(Debug, Error)]
pub enum Error {
    /// Text did not parse as a clock time (`HH:MM`, `HH:MM:SS`, or
    /// `HH:MM:SS.mmm`).
    #[error("invalid clock time `{text}`")]
    InvalidTime {
        /// The rejected input.
        text: String,
    },

    /// A timer was requested for an instant that is not in the future.
    #[error("time cannot be in the past")]
    PastInstant,

    /// A device was given a name outside `[A-Za-z0-9-_]+`.
    #[error("device name `{name}` must be an alphanumeric string")]
    InvalidDeviceName {
        /// The rejected name.
        name: String,
    },

    /// No output device is registered under the requested name.
    #[error("no output device with name `{name}`")]
    UnknownDevice {
        /// The name that was looked up.
        name: String,
    },

    /// A GPIO line write failed.
    #[error("gpio write for `{device}` failed: {detail}")]
    Pin {
        /// Name of the device whose line failed.
        device: String,
        /// Underlying driver error.
        detail: String,
    },

    /// The channel has not been opened, or was already closed.
    #[error("channel is not open")]
    ChannelClosed,

    /// `open` was called on a channel that is already open.
    #[error("channel is already open")]
    ChannelOpen,

    /// A datagram payload could not be parsed as JSON (or an outgoing
    /// message could not be encoded).
    #[error("failed to parse message: {0}")]
    MalformedMessage(#[from] serde_json::Error),

    /// Socket-level I/O failure.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

// ============================================================================
// Tests
// ============================================================================
