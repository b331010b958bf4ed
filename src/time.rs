//! Day-relative clock times.
//!
//! A [`Time`] is a reading on a 24-hour wall clock, independent of any
//! calendar date. It is parsed from `HH:MM`, `HH:MM:SS`, or `HH:MM:SS.mmm`
//! text and can be projected onto any local calendar day with
//! [`Time::for_date`].

use chrono::{DateTime, Duration as ChronoDuration, Local, LocalResult, NaiveTime, TimeZone, Timelike};

use crate::error::{Error, Result};

/// A wall-clock reading within a day, millisecond precision.
///
/// Ordering and equality follow the reading itself, so `07:00 < 19:30`
/// regardless of which days the readings are later attached to.
///
/// # Example
///
/// ```rust
/// use rs_hearth::Time;
///
/// let noon = Time::parse("12:00").unwrap();
/// let late = Time::parse("12:34:56.789").unwrap();
///
/// assert!(noon < late);
/// assert_eq!(late.as_millis(), 45_296_789);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Time {
    reading: NaiveTime,
}

impl Time {
    /// Parses `HH:MM`, `HH:MM:SS`, or `HH:MM:SS.mmm`.
    ///
    /// Every numeric field is fixed-width: two digits for hours, minutes,
    /// and seconds, exactly three for the optional fraction. A fraction is
    /// only accepted after a seconds field, so `07:30.5` is rejected.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidTime`] when the text does not match the grammar or a
    /// field is out of range (`25:00`, `12:60`, `10:00:99`).
    pub fn parse(text: &str) -> Result<Self> {
        let invalid = || Error::InvalidTime { text: text.to_owned() };

        let (clock, fraction) = match text.split_once('.') {
            Some((clock, fraction)) => (clock, Some(fraction)),
            None => (text, None),
        };

        let mut fields = clock.split(':');
        let hour = two_digits(fields.next()).ok_or_else(invalid)?;
        let minute = two_digits(fields.next()).ok_or_else(invalid)?;
        let second = match fields.next() {
            Some(field) => two_digits(Some(field)).ok_or_else(invalid)?,
            // A fraction without a seconds field is malformed.
            None if fraction.is_some() => return Err(invalid()),
            None => 0,
        };
        if fields.next().is_some() {
            return Err(invalid());
        }

        let milli = match fraction {
            Some(digits) if digits.len() == 3 && digits.bytes().all(|b| b.is_ascii_digit()) => {
                digits.parse::<u32>().ok().ok_or_else(invalid)?
            }
            Some(_) => return Err(invalid()),
            None => 0,
        };

        let reading = (hour <= 23 && minute <= 59 && second <= 59)
            .then(|| NaiveTime::from_hms_milli_opt(hour, minute, second, milli))
            .flatten()
            .ok_or_else(invalid)?;
        Ok(Self { reading })
    }

    /// The reading as milliseconds since midnight, in `[0, 86_400_000)`.
    pub fn as_millis(&self) -> u32 {
        self.reading.num_seconds_from_midnight() * 1000 + self.reading.nanosecond() / 1_000_000
    }

    /// The underlying clock reading.
    pub fn as_naive(&self) -> NaiveTime {
        self.reading
    }

    /// Attaches the reading to the local calendar day of `instant`.
    ///
    /// The result shows this exact reading on a local wall clock for that
    /// day, whatever the day's UTC offset is. On a backward clock jump the
    /// earlier of the two occurrences is chosen; a reading erased by a
    /// forward jump lands on the first wall time that exists after the gap.
    pub fn for_date(&self, instant: DateTime<Local>) -> DateTime<Local> {
        let mut candidate = instant.date_naive().and_time(self.reading);
        loop {
            match Local.from_local_datetime(&candidate) {
                LocalResult::Single(resolved) => return resolved,
                LocalResult::Ambiguous(earliest, _) => return earliest,
                LocalResult::None => candidate = candidate + ChronoDuration::minutes(1),
            }
        }
    }
}

impl core::fmt::Display for Time {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.reading.format("%H:%M:%S%.3f"))
    }
}

// Fixed-width two-digit field.
fn two_digits(field: Option<&str>) -> Option<u32> {
    let field = field?;
    if field.len() != 2 || !field.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    field.parse().ok()
}

// ============================================================================
// Tests
// ============================================================================
