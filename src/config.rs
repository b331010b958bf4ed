//! Configuration types for the scheduler, the broadcast channel, and
//! GPIO-backed devices.
//!
//! # Example
//!
//! ```rust
//! use rs_hearth::config::{ChannelConfig, DeviceConfig, SchedulerConfig};
//!
//! // Use defaults
//! let site = SchedulerConfig::default();
//!
//! // Or customize
//! let site = SchedulerConfig::new(52.09, 5.12);
//! let channel = ChannelConfig::new(41234)
//!     .with_peer("192.168.1.20")
//!     .with_peer("192.168.1.21");
//! let lamp = DeviceConfig::new("porch-lamp", 17);
//! ```

use serde::{Deserialize, Serialize};

// ============================================================================
// Scheduler Config
// ============================================================================

/// Geographic site used for every solar resolution a scheduler performs.
///
/// Defaults to the null island origin (0, 0); any coordinates are accepted
/// and clamped to the valid ranges at resolution time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Degrees north of the equator, nominally `[-90, 90]`
    pub latitude: f64,
    /// Degrees east of the zero meridian, nominally `[-180, 180]`
    pub longitude: f64,
}

impl SchedulerConfig {
    /// Create a config for the given site
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Set the latitude
    pub fn with_latitude(mut self, latitude: f64) -> Self {
        self.latitude = latitude;
        self
    }

    /// Set the longitude
    pub fn with_longitude(mut self, longitude: f64) -> Self {
        self.longitude = longitude;
        self
    }
}

// ============================================================================
// Channel Config
// ============================================================================

/// UDP broadcast configuration: the peer hosts and the shared port.
///
/// All peers of one installation bind the same port; a port of `0` asks the
/// OS for an ephemeral one (useful in tests).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelConfig {
    /// Hostnames or IP addresses of the peers to send to
    pub peers: Vec<String>,
    /// Port shared by all peers (0 = ephemeral)
    pub port: u16,
}

impl ChannelConfig {
    /// Create a config with no peers on the given port
    pub fn new(port: u16) -> Self {
        Self { peers: Vec::new(), port }
    }

    /// Add a peer host
    pub fn with_peer(mut self, host: &str) -> Self {
        self.peers.push(host.to_owned());
        self
    }

    /// Set the port
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }
}

// ============================================================================
// Device Config
// ============================================================================

/// Identity and wiring of a single GPIO-backed device.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceConfig {
    /// Device name, restricted to `[A-Za-z0-9-_]+`
    pub name: String,
    /// GPIO pin number the device is wired to
    pub pin: u8,
}

impl DeviceConfig {
    /// Create a config for the given name and pin
    pub fn new(name: &str, pin: u8) -> Self {
        Self { name: name.to_owned(), pin }
    }

    /// Set the device name
    pub fn with_name(mut self, name: &str) -> Self {
        self.name = name.to_owned();
        self
    }

    /// Set the GPIO pin
    pub fn with_pin(mut self, pin: u8) -> Self {
        self.pin = pin;
        self
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scheduler_config_default_is_the_origin() {
        let site = SchedulerConfig::default();
        assert_eq!(site.latitude, 0.0);
        assert_eq!(site.longitude, 0.0);
    }

    #[test]
    fn scheduler_config_builder() {
        let site = SchedulerConfig::default()
            .with_latitude(52.09)
            .with_longitude(5.12);
        assert_eq!(site, SchedulerConfig::new(52.09, 5.12));
    }

    #[test]
    fn channel_config_default_has_no_peers() {
        let channel = ChannelConfig::default();
        assert!(channel.peers.is_empty());
        assert_eq!(channel.port, 0);
    }

    #[test]
    fn channel_config_collects_peers_in_order() {
        let channel = ChannelConfig::new(41234)
            .with_peer("10.0.0.2")
            .with_peer("10.0.0.3");
        assert_eq!(channel.peers, vec!["10.0.0.2", "10.0.0.3"]);
        assert_eq!(channel.port, 41234);
    }

    #[test]
    fn device_config_builder() {
        let device = DeviceConfig::default().with_name("porch-lamp").with_pin(17);
        assert_eq!(device, DeviceConfig::new("porch-lamp", 17));
    }

    #[test]
    fn configs_round_trip_through_json() {
        let channel = ChannelConfig::new(41234).with_peer("10.0.0.2");
        let json = serde_json::to_string(&channel).unwrap();
        let back: ChannelConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, channel);
    }
}
