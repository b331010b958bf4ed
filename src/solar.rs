//! Solar event times for a date and site.
//!
//! Thin wrapper over the `sunrise` ephemeris: one call yields the civil
//! dawn, sunrise, sunset, and civil dusk instants of a calendar day at a
//! geographic site, converted to the local timezone. [`solar_date`] picks
//! which calendar day an instant belongs to at a given longitude.

use chrono::{DateTime, Duration as ChronoDuration, Local, NaiveDate};
use sunrise::{Coordinates, DawnType, SolarDay, SolarEvent};

/// The four solar instants of one calendar day at one site.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SolarTimes {
    /// Start of civil twilight, before sunrise.
    pub dawn: DateTime<Local>,
    /// Upper limb of the sun crosses the horizon, morning.
    pub sunrise: DateTime<Local>,
    /// Upper limb of the sun crosses the horizon, evening.
    pub sunset: DateTime<Local>,
    /// End of civil twilight, after sunset.
    pub dusk: DateTime<Local>,
}

/// Computes the solar times of `date` at the given site.
///
/// Total over all inputs: latitudes are clamped to `[-90, 90]`, longitudes
/// to `[-180, 180]`, and NaN falls back to the zero meridian/equator. Polar
/// day and night degenerate the same way the underlying ephemeris does,
/// with events collapsing towards the solar transit.
pub fn solar_times(date: NaiveDate, latitude: f64, longitude: f64) -> SolarTimes {
    let day = SolarDay::new(site(latitude, longitude), date);
    SolarTimes {
        dawn: local(day.event_time(SolarEvent::Dawn(DawnType::Civil))),
        sunrise: local(day.event_time(SolarEvent::Sunrise)),
        sunset: local(day.event_time(SolarEvent::Sunset)),
        dusk: local(day.event_time(SolarEvent::Dusk(DawnType::Civil))),
    }
}

/// The calendar date of the solar cycle nearest `instant` at `longitude`.
///
/// Mean solar time leads UTC by four minutes per degree east. Shifting the
/// instant by that amount before taking its UTC date selects the cycle
/// whose solar noon lies within twelve hours of the instant, at any
/// longitude; the raw UTC date is a whole cycle off for part of every day
/// once the site is more than 90 degrees from the prime meridian.
pub fn solar_date(instant: DateTime<Local>, longitude: f64) -> NaiveDate {
    let longitude = if longitude.is_nan() { 0.0 } else { longitude.clamp(-180.0, 180.0) };
    (instant.naive_utc() + ChronoDuration::seconds((longitude * 240.0) as i64)).date()
}

fn local(instant: DateTime<chrono::Utc>) -> DateTime<Local> {
    instant.with_timezone(&Local)
}

fn site(latitude: f64, longitude: f64) -> Coordinates {
    let latitude = if latitude.is_nan() { 0.0 } else { latitude.clamp(-90.0, 90.0) };
    let longitude = if longitude.is_nan() { 0.0 } else { longitude.clamp(-180.0, 180.0) };
    // Both axes are finite and in range after clamping.
    Coordinates::new(latitude, longitude).expect("clamped coordinates are in range")
}

// ============================================================================
// Tests
// ============================================================================
