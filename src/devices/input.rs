//! Input devices: buttons, motion sensors, reed switches.

use core::fmt;

use uuid::Uuid;

use crate::config::DeviceConfig;
use crate::error::Result;
use crate::traits::InputPin;

use super::{identity, DeviceInfo, InputEvent};

/// A GPIO-backed sensor whose edges become activation events.
///
/// Rising edges map to [`InputEvent::Activation`], falling edges to
/// [`InputEvent::Deactivation`]. The stream ends (`None`) when the line
/// can produce no further edges.
///
/// # Example
///
/// ```rust
/// use rs_hearth::config::DeviceConfig;
/// use rs_hearth::devices::{InputDevice, InputEvent};
/// use rs_hearth::hal::MockLine;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let (line, handle) = MockLine::new();
/// let mut button = InputDevice::new(DeviceConfig::new("doorbell", 22), line).unwrap();
///
/// handle.rise();
/// assert_eq!(button.next_event().await, Some(InputEvent::Activation));
/// # }
/// ```
pub struct InputDevice<P: InputPin> {
    info: DeviceInfo,
    line: P,
}

impl<P: InputPin> InputDevice<P> {
    /// Creates the device.
    ///
    /// # Errors
    ///
    /// [`crate::Error::InvalidDeviceName`] for names outside
    /// `[A-Za-z0-9-_]+`.
    pub fn new(config: DeviceConfig, line: P) -> Result<Self> {
        Ok(Self { info: identity(config)?, line })
    }

    /// Identity snapshot of this device.
    pub fn info(&self) -> &DeviceInfo {
        &self.info
    }

    /// Configured device name.
    pub fn name(&self) -> &str {
        &self.info.name
    }

    /// Generated unique id.
    pub fn id(&self) -> Uuid {
        self.info.id
    }

    /// Waits for the next edge and maps it to an event.
    pub async fn next_event(&mut self) -> Option<InputEvent> {
        let level = self.line.next_edge().await?;
        Some(InputEvent::from(level))
    }
}

// The line type need not be Debug, so the driver handle is skipped.
impl<P: InputPin> fmt::Debug for InputDevice<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InputDevice").field("info", &self.info).finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================
