//! # rs-hearth
//!
//! Home-automation building blocks: a solar-aware daily scheduler,
//! GPIO-backed devices behind mockable traits, and a UDP broadcast channel
//! for talking to sibling controllers.
//!
//! ## Features
//!
//! - **Recurring times**: fixed clock readings or named solar events (dawn,
//!   dusk, sunrise, sunset) resolved daily against a configured site
//! - **Timers**: `at` arms a one-shot callback, `every_day_at` keeps a
//!   self-re-arming daily chain alive until its handle is cancelled
//! - **Jitter**: `delayed_handler` spreads simultaneous triggers over a
//!   random window so a street of controllers doesn't switch at once
//! - **Devices**: named output devices with active-low support, input
//!   devices that map GPIO edges to events, aliases spanning device groups
//! - **Presence broadcast**: JSON datagrams fanned out to a fixed peer set
//!
//! ## Architecture
//!
//! The crate is structured so everything runs on a desktop without pins:
//!
//! - `time` / `solar` / `schedule` - the scheduling core
//! - `traits` - GPIO line abstractions
//! - `hal` - mock lines for desktop development and tests
//! - `devices` / `manager` - device wrappers and the named registry
//! - `channel` - UDP broadcast between controllers
//!
//! ## Example
//!
//! ```rust
//! use rs_hearth::{Scheduler, SchedulerConfig, SolarEvent, Time};
//!
//! // A scheduler for Utrecht.
//! let scheduler = Scheduler::new(SchedulerConfig::new(52.09, 5.12));
//!
//! // Fixed clock time: today if still ahead, otherwise tomorrow.
//! let wake = Time::parse("07:30").unwrap();
//! assert!(scheduler.next(wake) > chrono::Local::now());
//!
//! // Solar events follow the season at the configured site.
//! assert!(scheduler.next(SolarEvent::Dusk) > chrono::Local::now());
//! ```

#![warn(missing_docs)]

/// UDP broadcast channel between controllers.
pub mod channel;
/// Configuration types for the scheduler, channel, and devices.
pub mod config;
/// GPIO-backed input and output device wrappers.
pub mod devices;
/// Crate-wide error and result types.
pub mod error;
/// Hardware abstraction layer with mock implementations for testing.
pub mod hal;
/// Named device registry with aliases and event fan-out.
pub mod manager;
/// Recurring time resolution and timer-backed callbacks.
pub mod schedule;
/// Solar event times for a date and site.
pub mod solar;
/// Day-relative clock time values.
pub mod time;
/// Core traits for GPIO hardware abstraction.
pub mod traits;

// Re-exports for convenience
pub use channel::Channel;
pub use config::{ChannelConfig, DeviceConfig, SchedulerConfig};
pub use devices::{DeviceInfo, InputDevice, InputEvent, OutputDevice};
pub use error::{Error, Result};
pub use manager::{DeviceEvent, DeviceManager};
pub use schedule::{delayed_handler, RecurringTime, ScheduleHandle, Scheduler, SolarEvent};
pub use solar::{solar_date, solar_times, SolarTimes};
pub use time::Time;
pub use traits::{InputPin, Level, OutputPin};
