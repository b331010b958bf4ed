//! GPIO-backed device wrappers.
//!
//! A device couples identity (name, generated id, pin number) with a GPIO
//! line behind the traits in [`crate::traits`]:
//!
//! - [`OutputDevice`]: an actuator with logical on/off state, optionally
//!   wired active-low
//! - [`InputDevice`]: a sensor whose edges become activation events
//!
//! Device names are restricted to `[A-Za-z0-9-_]+` so they can travel in
//! config files and datagrams without quoting concerns.

mod input;
mod output;

pub use input::InputDevice;
pub use output::OutputDevice;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::DeviceConfig;
use crate::error::{Error, Result};
use crate::traits::Level;

/// Identity snapshot of a device, carried on every fan-out event.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceInfo {
    /// Unique id generated when the device was created
    pub id: Uuid,
    /// Configured device name
    pub name: String,
    /// GPIO pin the device is wired to
    pub pin: u8,
}

/// Events produced by input devices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputEvent {
    /// The line went high
    Activation,
    /// The line went low
    Deactivation,
}

impl InputEvent {
    /// Lowercase event name, matching the wire spelling.
    pub const fn as_str(&self) -> &'static str {
        match self {
            InputEvent::Activation => "activation",
            InputEvent::Deactivation => "deactivation",
        }
    }
}

impl From<Level> for InputEvent {
    fn from(level: Level) -> Self {
        match level {
            Level::High => InputEvent::Activation,
            Level::Low => InputEvent::Deactivation,
        }
    }
}

// Shared by both device kinds: validate the configured name and mint the id.
fn identity(config: DeviceConfig) -> Result<DeviceInfo> {
    let valid = !config.name.is_empty()
        && config
            .name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if !valid {
        return Err(Error::InvalidDeviceName { name: config.name });
    }
    Ok(DeviceInfo {
        id: Uuid::new_v4(),
        name: config.name,
        pin: config.pin,
    })
}

// ============================================================================
// Tests
// ============================================================================
