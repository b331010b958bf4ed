//! Device and registry behavior through the public API.

use rs_hearth::config::DeviceConfig;
use rs_hearth::devices::{InputDevice, InputEvent, OutputDevice};
use rs_hearth::hal::{MockLine, MockPin};
use rs_hearth::manager::DeviceManager;
use rs_hearth::traits::Level;
use serde_json::json;

// ============================================================================
// Device identity
// ============================================================================

#[test]
fn device_names_follow_the_alphanumeric_rule() {
    for name in ["test-device", "test_device", "Lamp7"] {
        assert!(
            OutputDevice::new(DeviceConfig::new(name, 4), MockPin::new()).is_ok(),
            "{name:?} should be accepted"
        );
    }
    for name in ["test device", "te$t-device", ""] {
        let err = OutputDevice::new(DeviceConfig::new(name, 4), MockPin::new()).unwrap_err();
        assert!(err.to_string().contains("alphanumeric"), "{name:?}: {err}");
    }
}

#[test]
fn devices_carry_id_name_and_pin() {
    let device = OutputDevice::new(DeviceConfig::new("test-device", 4), MockPin::new()).unwrap();
    assert_eq!(device.name(), "test-device");
    assert_eq!(device.info().pin, 4);
    assert!(!device.id().is_nil());

    let other = OutputDevice::new(DeviceConfig::new("test-device", 4), MockPin::new()).unwrap();
    assert_ne!(device.id(), other.id());
}

// ============================================================================
// Output state
// ============================================================================

#[test]
fn construction_leaves_devices_logically_off() {
    let relay = MockPin::new();
    let lamp_line = MockPin::new();

    let _pump = OutputDevice::new(DeviceConfig::new("pump", 4), relay.clone()).unwrap();
    let _porch = OutputDevice::lamp(DeviceConfig::new("porch", 17), lamp_line.clone()).unwrap();

    // Logical off: low for active-high wiring, high for active-low.
    assert_eq!(relay.level(), Some(Level::Low));
    assert_eq!(lamp_line.level(), Some(Level::High));
}

#[test]
fn one_name_drives_a_mixed_polarity_group() {
    let relay = MockPin::new();
    let lamp_line = MockPin::new();

    let mut manager = DeviceManager::new();
    manager.add_output(OutputDevice::new(DeviceConfig::new("garden", 4), relay.clone()).unwrap());
    manager
        .add_output(OutputDevice::lamp(DeviceConfig::new("garden", 17), lamp_line.clone()).unwrap());

    manager.activate("garden").unwrap();
    assert_eq!(relay.level(), Some(Level::High));
    assert_eq!(lamp_line.level(), Some(Level::Low));

    manager.deactivate("garden").unwrap();
    assert_eq!(relay.level(), Some(Level::Low));
    assert_eq!(lamp_line.level(), Some(Level::High));
}

// ============================================================================
// Registry
// ============================================================================

#[test]
fn aliases_span_device_groups() {
    let porch = MockPin::new();
    let garden = MockPin::new();

    let mut manager = DeviceManager::new();
    manager.add_output(OutputDevice::new(DeviceConfig::new("porch", 4), porch.clone()).unwrap());
    manager.add_output(OutputDevice::new(DeviceConfig::new("garden", 5), garden.clone()).unwrap());
    manager.create_alias("outside", "porch").unwrap();
    manager.create_alias("outside", "garden").unwrap();

    manager.activate("outside").unwrap();
    assert_eq!(porch.level(), Some(Level::High));
    assert_eq!(garden.level(), Some(Level::High));

    manager.deactivate("porch").unwrap();
    assert_eq!(porch.level(), Some(Level::Low));
    assert_eq!(garden.level(), Some(Level::High));
}

#[test]
fn unknown_names_report_the_missing_device() {
    let mut manager = DeviceManager::new();
    let err = manager.activate("attic").unwrap_err();
    assert_eq!(err.to_string(), "no output device with name `attic`");
}

// ============================================================================
// Input fan-out
// ============================================================================

#[tokio::test]
async fn motion_events_reach_subscribers_with_identity() {
    let (line, handle) = MockLine::new();
    let sensor = InputDevice::new(DeviceConfig::new("hall-motion", 22), line).unwrap();
    let id = sensor.id();

    let manager = DeviceManager::new();
    let mut events = manager.subscribe();
    let _pump = manager.watch_input(sensor);

    handle.rise();
    handle.fall();

    let activation = events.recv().await.unwrap();
    assert_eq!(activation.event, InputEvent::Activation);
    assert_eq!(activation.device.id, id);
    assert_eq!(activation.device.name, "hall-motion");
    assert_eq!(activation.device.pin, 22);

    let deactivation = events.recv().await.unwrap();
    assert_eq!(deactivation.event, InputEvent::Deactivation);
    assert_eq!(deactivation.device.id, id);
}

#[tokio::test]
async fn device_events_serialize_for_the_wire() {
    // Subscribers can forward events over the broadcast channel as-is.
    let (line, handle) = MockLine::new();
    let sensor = InputDevice::new(DeviceConfig::new("doorbell", 23), line).unwrap();

    let manager = DeviceManager::new();
    let mut events = manager.subscribe();
    let _pump = manager.watch_input(sensor);

    handle.rise();
    let event = events.recv().await.unwrap();

    let wire = serde_json::to_value(&event).unwrap();
    assert_eq!(wire["event"], json!("activation"));
    assert_eq!(wire["device"]["name"], json!("doorbell"));
    assert_eq!(wire["device"]["pin"], json!(23));
}
