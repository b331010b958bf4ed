//! Recurring time resolution and timer-backed callbacks.
//!
//! The [`Scheduler`] answers one question (when does a daily time next
//! occur?) and arms Tokio timers on top of the answer. A recurring time
//! is either a fixed wall-clock reading ([`Time`]) or a named solar event
//! resolved against the configured site, so "every day at dusk" drifts
//! through the year exactly like the sky does.
//!
//! Resolution is calendar-naive on purpose: a time that has already
//! passed today is retried in fixed 24-hour steps, with no handling of
//! leap seconds or political calendar changes in between.
//!
//! # Example
//!
//! ```rust
//! use rs_hearth::{Scheduler, SchedulerConfig, SolarEvent, Time};
//!
//! let scheduler = Scheduler::new(SchedulerConfig::new(52.09, 5.12));
//!
//! let wake = scheduler.next(Time::parse("07:30").unwrap());
//! let dusk = scheduler.next(SolarEvent::Dusk);
//!
//! assert!(wake > chrono::Local::now());
//! assert!(dusk > chrono::Local::now());
//! ```

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use chrono::{DateTime, Duration as ChronoDuration, Local};
use serde::{Deserialize, Serialize};
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error};

use crate::config::SchedulerConfig;
use crate::error::{Error, Result};
use crate::solar;
use crate::time::Time;

// ============================================================================
// Recurring times
// ============================================================================

/// The named solar events a schedule can follow.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SolarEvent {
    /// Start of civil twilight
    Dawn,
    /// End of civil twilight
    Dusk,
    /// Morning horizon crossing
    Sunrise,
    /// Evening horizon crossing
    Sunset,
}

impl SolarEvent {
    /// Lowercase event name, matching the wire/config spelling.
    pub const fn as_str(&self) -> &'static str {
        match self {
            SolarEvent::Dawn => "dawn",
            SolarEvent::Dusk => "dusk",
            SolarEvent::Sunrise => "sunrise",
            SolarEvent::Sunset => "sunset",
        }
    }
}

/// A time that recurs every day.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RecurringTime {
    /// A named solar event, resolved daily against the configured site
    Solar(SolarEvent),
    /// A fixed wall-clock reading
    Clock(Time),
}

impl From<SolarEvent> for RecurringTime {
    fn from(event: SolarEvent) -> Self {
        RecurringTime::Solar(event)
    }
}

impl From<Time> for RecurringTime {
    fn from(time: Time) -> Self {
        RecurringTime::Clock(time)
    }
}

// ============================================================================
// Scheduler
// ============================================================================

/// Handle onto a running daily chain.
///
/// Dropping the handle does not stop the chain; only [`cancel`]
/// (from any clone) does.
///
/// [`cancel`]: ScheduleHandle::cancel
#[derive(Clone, Debug)]
pub struct ScheduleHandle {
    token: CancellationToken,
}

impl ScheduleHandle {
    /// Stops the chain: the pending occurrence is dropped and nothing
    /// re-arms. Idempotent.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Whether [`cancel`](ScheduleHandle::cancel) has been called.
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

/// Resolves recurring times against a site and arms timer-backed
/// callbacks.
///
/// The scheduler itself is a small copyable value; timers spawned from it
/// keep running after it is dropped.
#[derive(Clone, Copy, Debug)]
pub struct Scheduler {
    config: SchedulerConfig,
}

impl Scheduler {
    /// Creates a scheduler for the given site.
    pub fn new(config: SchedulerConfig) -> Self {
        Self { config }
    }

    /// The configured site.
    pub fn config(&self) -> SchedulerConfig {
        self.config
    }

    /// Next occurrence of `time`, strictly after the current instant.
    pub fn next(&self, time: impl Into<RecurringTime>) -> DateTime<Local> {
        self.next_after(Local::now(), time)
    }

    /// Next occurrence of `time` strictly after `now`.
    ///
    /// Resolves on `now`'s day first; an occurrence at or before `now`
    /// (equality counts as passed) steps the reference 24 hours ahead and
    /// resolves again. One step is usually enough, but a fall-back day
    /// repeats a local calendar date and a far-eastern solar cycle can lag
    /// its reference by most of a day, so the step repeats until the
    /// result is strictly future.
    pub fn next_after(&self, now: DateTime<Local>, time: impl Into<RecurringTime>) -> DateTime<Local> {
        let time = time.into();
        let mut reference = now;
        loop {
            let candidate = self.resolve_on(reference, time);
            if candidate > now {
                return candidate;
            }
            reference = reference + ChronoDuration::hours(24);
        }
    }

    /// Arms a one-shot invocation of `handler` at `instant`.
    ///
    /// The check is synchronous: nothing is armed unless `Ok` is
    /// returned. Must be called within a Tokio runtime; the timer lives on
    /// it and survives this scheduler.
    ///
    /// # Errors
    ///
    /// [`Error::PastInstant`] when `instant` is not strictly in the
    /// future.
    pub fn at<F>(&self, instant: DateTime<Local>, handler: F) -> Result<()>
    where
        F: FnOnce() + Send + 'static,
    {
        let delay = delay_until(Local::now(), instant)?;
        debug!(at = %instant, delay_ms = delay.as_millis() as u64, "one-shot timer armed");
        tokio::spawn(async move {
            sleep(delay).await;
            debug!(at = %instant, "one-shot timer fired");
            handler();
        });
        Ok(())
    }

    /// Invokes `handler` every day at `time`.
    ///
    /// Each cycle resolves the time afresh, so solar events follow the
    /// season. A handler that panics is logged and does not break the
    /// chain. Must be called within a Tokio runtime; the chain lives on it
    /// and survives this scheduler.
    ///
    /// Cancel through the returned handle; there is no other way to stop
    /// the chain.
    pub fn every_day_at<F>(&self, time: impl Into<RecurringTime>, handler: F) -> ScheduleHandle
    where
        F: FnMut() + Send + 'static,
    {
        let scheduler = *self;
        let time = time.into();
        let token = CancellationToken::new();
        let guard = token.clone();
        let mut handler = handler;

        tokio::spawn(async move {
            loop {
                let due = scheduler.next(time);
                // `due` is strictly future; the clamp covers the clock
                // advancing between the two reads.
                let delay = delay_until(Local::now(), due).unwrap_or(Duration::ZERO);
                debug!(due = %due, ?time, "daily chain armed");

                tokio::select! {
                    _ = guard.cancelled() => break,
                    _ = sleep(delay) => {}
                }
                if guard.is_cancelled() {
                    break;
                }

                debug!(due = %due, ?time, "daily chain fired");
                if let Err(panic) = catch_unwind(AssertUnwindSafe(&mut handler)) {
                    error!(reason = panic_text(panic.as_ref()), "scheduled handler panicked");
                }
            }
            debug!(?time, "daily chain stopped");
        });

        ScheduleHandle { token }
    }

    // The occurrence of `time` on the day of `reference`. Solar days are
    // keyed to the cycle nearest the reference; clock readings attach to
    // the local calendar date.
    fn resolve_on(&self, reference: DateTime<Local>, time: RecurringTime) -> DateTime<Local> {
        match time {
            RecurringTime::Solar(event) => {
                let date = solar::solar_date(reference, self.config.longitude);
                let times = solar::solar_times(date, self.config.latitude, self.config.longitude);
                match event {
                    SolarEvent::Dawn => times.dawn,
                    SolarEvent::Dusk => times.dusk,
                    SolarEvent::Sunrise => times.sunrise,
                    SolarEvent::Sunset => times.sunset,
                }
            }
            RecurringTime::Clock(reading) => reading.for_date(reference),
        }
    }
}

// ============================================================================
// Jittered handlers
// ============================================================================

/// Wraps `handler` so every invocation runs after a fresh uniformly
/// random delay in `[0, max_delay)`.
///
/// Several controllers sharing one schedule use this to avoid switching
/// their loads in the same instant. Each invocation draws independently;
/// invocations may overlap in time but the handler itself runs under a
/// lock, one execution at a time. A panicking invocation is caught and
/// logged like a scheduled handler, and later invocations still run.
///
/// The returned closure arms its timer on the ambient Tokio runtime, so
/// invoke it from runtime context; scheduler callbacks already are.
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use rs_hearth::{delayed_handler, Scheduler, SchedulerConfig, SolarEvent};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let scheduler = Scheduler::new(SchedulerConfig::new(52.09, 5.12));
/// let lights = delayed_handler(Duration::from_secs(300), || println!("lights on"));
/// let chain = scheduler.every_day_at(SolarEvent::Dusk, lights);
/// chain.cancel();
/// # }
/// ```
pub fn delayed_handler<F>(max_delay: Duration, handler: F) -> impl FnMut() + Send + 'static
where
    F: FnMut() + Send + 'static,
{
    let handler = Arc::new(Mutex::new(handler));
    // Seed from the subsecond clock so parallel controllers draw
    // different sequences.
    let mut draw = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|since| since.subsec_nanos())
        .unwrap_or(0);

    move || {
        draw = draw.wrapping_add(1);
        let delay = max_delay.mul_f64(uniform_fraction(draw));
        debug!(delay_ms = delay.as_millis() as u64, "jittered handler armed");
        let handler = Arc::clone(&handler);
        tokio::spawn(async move {
            sleep(delay).await;
            // A poisoned lock means an earlier invocation panicked; the
            // handler itself is still usable.
            let mut handler = handler.lock().unwrap_or_else(PoisonError::into_inner);
            if let Err(panic) = catch_unwind(AssertUnwindSafe(&mut *handler)) {
                error!(reason = panic_text(panic.as_ref()), "delayed handler panicked");
            }
        });
    }
}

// Uniform fraction in [0, 1): multiplicative hashing spreads consecutive
// draws across the range.
fn uniform_fraction(draw: u32) -> f64 {
    let hash = draw.wrapping_mul(2_654_435_761);
    f64::from(hash) / (f64::from(u32::MAX) + 1.0)
}

// Delay to `instant`, failing when it is not strictly in the future.
fn delay_until(now: DateTime<Local>, instant: DateTime<Local>) -> Result<Duration> {
    let delta = instant.signed_duration_since(now);
    if delta <= ChronoDuration::zero() {
        return Err(Error::PastInstant);
    }
    Ok(delta.to_std().unwrap_or(Duration::ZERO))
}

fn panic_text(panic: &(dyn std::any::Any + Send)) -> &str {
    if let Some(text) = panic.downcast_ref::<&str>() {
        text
    } else if let Some(text) = panic.downcast_ref::<String>() {
        text
    } else {
        "non-string panic payload"
    }
}

// ============================================================================
// Tests
// ============================================================================
