//! Output devices: relays, lamps, and anything else with an on/off state.

use core::fmt::{self, Display};

use tracing::trace;
use uuid::Uuid;

use crate::config::DeviceConfig;
use crate::error::{Error, Result};
use crate::traits::{Level, OutputPin};

use super::{identity, DeviceInfo};

/// A GPIO-backed actuator with logical on/off state.
///
/// The logical state is what callers reason about; the physical line level
/// depends on the wiring. Relay boards and LED strips that switch on a low
/// line are created with [`OutputDevice::lamp`] or
/// [`OutputDevice::with_polarity`], and the driver inverts every write for
/// them. Construction drives the line to the logical off state, so a
/// rebooting controller never leaves half its devices on.
///
/// # Example
///
/// ```rust
/// use rs_hearth::config::DeviceConfig;
/// use rs_hearth::devices::OutputDevice;
/// use rs_hearth::hal::MockPin;
/// use rs_hearth::traits::Level;
///
/// let probe = MockPin::new();
/// let mut lamp = OutputDevice::lamp(DeviceConfig::new("porch-lamp", 17), probe.clone()).unwrap();
///
/// // Active-low: logical on drives the line low.
/// lamp.on().unwrap();
/// assert_eq!(probe.level(), Some(Level::Low));
/// ```
pub struct OutputDevice<P: OutputPin> {
    info: DeviceInfo,
    active_low: bool,
    line: P,
}

impl<P> OutputDevice<P>
where
    P: OutputPin,
    P::Error: Display,
{
    /// Creates an active-high device and drives its line to logical off.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidDeviceName`] for names outside `[A-Za-z0-9-_]+`, or
    /// [`Error::Pin`] when the initial off write fails.
    pub fn new(config: DeviceConfig, line: P) -> Result<Self> {
        Self::with_polarity(config, line, false)
    }

    /// Creates a lamp: an output device wired active-low.
    pub fn lamp(config: DeviceConfig, line: P) -> Result<Self> {
        Self::with_polarity(config, line, true)
    }

    /// Creates a device with explicit polarity.
    pub fn with_polarity(config: DeviceConfig, line: P, active_low: bool) -> Result<Self> {
        let info = identity(config)?;
        let mut device = Self { info, active_low, line };
        device.off()?;
        Ok(device)
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

    /// Whether writes are inverted for active-low wiring.
    pub fn is_active_low(&self) -> bool {
        self.active_low
    }

    /// Turns the device on.
    pub fn on(&mut self) -> Result<()> {
        self.write(Level::High)
    }

    /// Turns the device off.
    pub fn off(&mut self) -> Result<()> {
        self.write(Level::Low)
    }

    fn write(&mut self, logical: Level) -> Result<()> {
        let physical = if self.active_low { logical.inverted() } else { logical };
        trace!(device = %self.info.name, ?logical, ?physical, "gpio write");
        self.line.set_level(physical).map_err(|err| Error::Pin {
            device: self.info.name.clone(),
            detail: err.to_string(),
        })
    }
}

// The line type need not be Debug, so the driver handle is skipped.
impl<P: OutputPin> fmt::Debug for OutputDevice<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OutputDevice")
            .field("info", &self.info)
            .field("active_low", &self.active_low)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================
