//! Named device registry with aliases and input event fan-out.
//!
//! A [`DeviceManager`] groups output devices by name, so one `activate`
//! call can drive several physical devices (two switches wired to the same
//! lamp name, a "garden" alias spanning multiple lamps). Input devices are
//! watched in background tasks and their events fan out to every
//! subscriber, each event tagged with the identity of the device that
//! produced it.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, trace, warn};
use uuid::Uuid;

use crate::devices::{DeviceInfo, InputDevice, InputEvent, OutputDevice};
use crate::error::{Error, Result};
use crate::traits::{InputPin, OutputPin};

/// An input event tagged with the device that produced it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceEvent {
    /// What happened
    pub event: InputEvent,
    /// Which device reported it
    pub device: DeviceInfo,
}

// Object-safe view over OutputDevice<P>, so one registry can hold devices
// with different pin types.
trait OutputSlot: Send {
    fn turn_on(&mut self) -> Result<()>;
    fn turn_off(&mut self) -> Result<()>;
}

impl<P> OutputSlot for OutputDevice<P>
where
    P: OutputPin + Send,
    P::Error: core::fmt::Display,
{
    fn turn_on(&mut self) -> Result<()> {
        self.on()
    }

    fn turn_off(&mut self) -> Result<()> {
        self.off()
    }
}

const EVENT_CAPACITY: usize = 64;

/// Registry of output devices by name plus the input event fan-out.
///
/// # Example
///
/// ```rust
/// use rs_hearth::config::DeviceConfig;
/// use rs_hearth::devices::OutputDevice;
/// use rs_hearth::hal::MockPin;
/// use rs_hearth::manager::DeviceManager;
///
/// let mut manager = DeviceManager::new();
/// manager.add_output(OutputDevice::new(DeviceConfig::new("porch", 17), MockPin::new()).unwrap());
/// manager.add_output(OutputDevice::new(DeviceConfig::new("garden", 27), MockPin::new()).unwrap());
/// manager.create_alias("outside", "porch").unwrap();
///
/// manager.activate("outside").unwrap();
/// assert!(manager.activate("attic").is_err());
/// ```
pub struct DeviceManager {
    devices: HashMap<Uuid, Box<dyn OutputSlot>>,
    outputs: HashMap<String, BTreeSet<Uuid>>,
    events: broadcast::Sender<DeviceEvent>,
}

impl DeviceManager {
    /// Creates an empty registry.
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            devices: HashMap::new(),
            outputs: HashMap::new(),
            events,
        }
    }

    /// Registers an output device under its configured name.
    ///
    /// Several devices may share one name; driving the name drives them
    /// all.
    pub fn add_output<P>(&mut self, device: OutputDevice<P>)
    where
        P: OutputPin + Send + 'static,
        P::Error: core::fmt::Display,
    {
        let id = device.id();
        let name = device.name().to_owned();
        debug!(%id, %name, "registering output device");
        self.outputs.entry(name).or_default().insert(id);
        self.devices.insert(id, Box::new(device));
    }

    /// Registers `alias` for every device currently known under `name`.
    ///
    /// The alias captures a snapshot: devices added under `name` later do
    /// not join it. Aliasing onto an existing name merges the sets.
    ///
    /// # Errors
    ///
    /// [`Error::UnknownDevice`] when nothing is registered under `name`.
    pub fn create_alias(&mut self, alias: &str, name: &str) -> Result<()> {
        let sources = self.named(name)?.clone();
        debug!(alias, name, devices = sources.len(), "creating alias");
        self.outputs.entry(alias.to_owned()).or_default().extend(sources);
        Ok(())
    }

    /// Turns every device registered under `name` on.
    ///
    /// All devices are attempted even when one fails; the first error is
    /// returned afterwards.
    ///
    /// # Errors
    ///
    /// [`Error::UnknownDevice`] when nothing is registered under `name`,
    /// or the first [`Error::Pin`] produced by a failing line.
    pub fn activate(&mut self, name: &str) -> Result<()> {
        self.drive(name, true)
    }

    /// Turns every device registered under `name` off.
    ///
    /// Same error behavior as [`DeviceManager::activate`].
    pub fn deactivate(&mut self, name: &str) -> Result<()> {
        self.drive(name, false)
    }

    /// Attaches an input device and forwards its events to all
    /// subscribers.
    ///
    /// The returned handle belongs to the forwarding task, which runs
    /// until the device's line ends. Events sent while nobody is
    /// subscribed are dropped.
    pub fn watch_input<P>(&self, device: InputDevice<P>) -> JoinHandle<()>
    where
        P: InputPin + Send + 'static,
    {
        let events = self.events.clone();
        tokio::spawn(async move {
            let mut device = device;
            while let Some(event) = device.next_event().await {
                trace!(device = device.name(), ?event, "forwarding input event");
                let _ = events.send(DeviceEvent {
                    event,
                    device: device.info().clone(),
                });
            }
            debug!(device = device.name(), "input line ended");
        })
    }

    /// New subscription to the device event stream.
    pub fn subscribe(&self) -> broadcast::Receiver<DeviceEvent> {
        self.events.subscribe()
    }

    fn drive(&mut self, name: &str, on: bool) -> Result<()> {
        let ids = self.named(name)?.clone();
        debug!(name, devices = ids.len(), on, "driving output devices");
        let mut first_err = None;
        for id in &ids {
            if let Some(device) = self.devices.get_mut(id) {
                let result = if on { device.turn_on() } else { device.turn_off() };
                if let Err(err) = result {
                    warn!(%id, error = %err, "device write failed");
                    first_err.get_or_insert(err);
                }
            }
        }
        match first_err {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn named(&self, name: &str) -> Result<&BTreeSet<Uuid>> {
        match self.outputs.get(name) {
            Some(ids) if !ids.is_empty() => Ok(ids),
            _ => Err(Error::UnknownDevice { name: name.to_owned() }),
        }
    }
}

impl Default for DeviceManager {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DeviceConfig;
    use crate::hal::{MockLine, MockPin};
    use crate::traits::Level;

    fn output(name: &str, probe: &MockPin) -> OutputDevice<MockPin> {
        OutputDevice::new(DeviceConfig::new(name, 4), probe.clone()).unwrap()
    }

    #[test]
    fn activate_drives_every_device_under_the_name() {
        let first = MockPin::new();
        let second = MockPin::new();
        let third = MockPin::new();

        let mut manager = DeviceManager::new();
        manager.add_output(output("duplicate", &first));
        manager.add_output(output("duplicate", &second));
        manager.add_output(output("unique", &third));

        manager.activate("duplicate").unwrap();
        assert_eq!(first.level(), Some(Level::High));
        assert_eq!(second.level(), Some(Level::High));
        assert_eq!(third.level(), Some(Level::Low));

        manager.deactivate("duplicate").unwrap();
        manager.activate("unique").unwrap();
        assert_eq!(first.level(), Some(Level::Low));
        assert_eq!(second.level(), Some(Level::Low));
        assert_eq!(third.level(), Some(Level::High));
    }

    #[test]
    fn unknown_names_are_errors() {
        let mut manager = DeviceManager::new();
        let err = manager.activate("ghost").unwrap_err();
        assert!(err.to_string().contains("no output device"), "{err}");
        assert!(manager.deactivate("ghost").is_err());
        assert!(manager.create_alias("alias", "ghost").is_err());
    }

    #[test]
    fn aliases_union_their_sources() {
        let one = MockPin::new();
        let two = MockPin::new();

        let mut manager = DeviceManager::new();
        manager.add_output(output("one", &one));
        manager.add_output(output("two", &two));
        manager.create_alias("alias", "one").unwrap();
        manager.create_alias("alias", "two").unwrap();

        manager.activate("alias").unwrap();
        assert_eq!(one.level(), Some(Level::High));
        assert_eq!(two.level(), Some(Level::High));

        // The originals still answer to their own names.
        manager.deactivate("one").unwrap();
        assert_eq!(one.level(), Some(Level::Low));
        assert_eq!(two.level(), Some(Level::High));
    }

    #[test]
    fn aliases_snapshot_the_source_set() {
        let early = MockPin::new();
        let late = MockPin::new();

        let mut manager = DeviceManager::new();
        manager.add_output(output("lamp", &early));
        manager.create_alias("alias", "lamp").unwrap();
        manager.add_output(output("lamp", &late));

        manager.activate("alias").unwrap();
        assert_eq!(early.level(), Some(Level::High));
        // Added after the alias was created, so not part of it.
        assert_eq!(late.level(), Some(Level::Low));

        manager.activate("lamp").unwrap();
        assert_eq!(late.level(), Some(Level::High));
    }

    #[test]
    fn drive_returns_the_first_error_but_reaches_all_devices() {
        struct StuckPin {
            writes: std::sync::Arc<std::sync::Mutex<u32>>,
        }

        impl crate::traits::OutputPin for StuckPin {
            type Error = &'static str;

            fn set_level(&mut self, _level: Level) -> std::result::Result<(), Self::Error> {
                let mut writes = self.writes.lock().unwrap();
                *writes += 1;
                // First write (construction) succeeds, later ones fail.
                if *writes > 1 {
                    Err("line stuck")
                } else {
                    Ok(())
                }
            }
        }

        let healthy = MockPin::new();
        let stuck_writes = std::sync::Arc::new(std::sync::Mutex::new(0));

        let mut manager = DeviceManager::new();
        manager.add_output(
            OutputDevice::new(
                DeviceConfig::new("lights", 5),
                StuckPin { writes: stuck_writes.clone() },
            )
            .unwrap(),
        );
        manager.add_output(output("lights", &healthy));

        let err = manager.activate("lights").unwrap_err();
        assert!(err.to_string().contains("line stuck"), "{err}");
        // The healthy device was still driven.
        assert_eq!(healthy.level(), Some(Level::High));
        // Construction plus the failed activation.
        assert_eq!(*stuck_writes.lock().unwrap(), 2);
    }

    #[tokio::test]
    async fn input_events_fan_out_with_device_identity() {
        let (line, handle) = MockLine::new();
        let sensor = InputDevice::new(DeviceConfig::new("motion", 22), line).unwrap();
        let expect = sensor.info().clone();

        let manager = DeviceManager::new();
        let mut events = manager.subscribe();
        let _pump = manager.watch_input(sensor);

        handle.rise();
        let event = events.recv().await.unwrap();
        assert_eq!(event.event, InputEvent::Activation);
        assert_eq!(event.device, expect);

        handle.fall();
        let event = events.recv().await.unwrap();
        assert_eq!(event.event, InputEvent::Deactivation);
    }

    #[tokio::test]
    async fn every_subscriber_sees_every_event() {
        let (line, handle) = MockLine::new();
        let sensor = InputDevice::new(DeviceConfig::new("doorbell", 22), line).unwrap();

        let manager = DeviceManager::new();
        let mut first = manager.subscribe();
        let mut second = manager.subscribe();
        let _pump = manager.watch_input(sensor);

        handle.rise();
        assert_eq!(first.recv().await.unwrap().event, InputEvent::Activation);
        assert_eq!(second.recv().await.unwrap().event, InputEvent::Activation);
    }

    #[tokio::test]
    async fn multiple_inputs_share_the_stream() {
        let (line_a, handle_a) = MockLine::new();
        let (line_b, handle_b) = MockLine::new();
        let motion = InputDevice::new(DeviceConfig::new("motion", 22), line_a).unwrap();
        let doorbell = InputDevice::new(DeviceConfig::new("doorbell", 23), line_b).unwrap();

        let manager = DeviceManager::new();
        let mut events = manager.subscribe();
        let _pump_a = manager.watch_input(motion);
        let _pump_b = manager.watch_input(doorbell);

        handle_a.rise();
        let first = events.recv().await.unwrap();
        assert_eq!(first.device.name, "motion");

        handle_b.rise();
        let second = events.recv().await.unwrap();
        assert_eq!(second.device.name, "doorbell");
    }
}
