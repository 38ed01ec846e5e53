//! Decoding of CF-style time coordinates.
//!
//! Gridded datasets store time as numbers with a `units` attribute such as
//! `hours since 1800-01-01 00:00:0.0`. [`TimeUnits`] parses that attribute and
//! converts raw values into timestamps.

use chrono::{Duration, NaiveDate, NaiveDateTime};

use crate::error::{Result, StratusError};

/// Step size of an encoded time coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeStep {
    Seconds,
    Minutes,
    Hours,
    Days,
}

impl TimeStep {
    fn millis(self) -> f64 {
        match self {
            TimeStep::Seconds => 1_000.0,
            TimeStep::Minutes => 60_000.0,
            TimeStep::Hours => 3_600_000.0,
            TimeStep::Days => 86_400_000.0,
        }
    }

    fn parse(word: &str) -> Option<Self> {
        match word.to_ascii_lowercase().as_str() {
            "s" | "sec" | "secs" | "second" | "seconds" => Some(TimeStep::Seconds),
            "min" | "mins" | "minute" | "minutes" => Some(TimeStep::Minutes),
            "h" | "hr" | "hrs" | "hour" | "hours" => Some(TimeStep::Hours),
            "d" | "day" | "days" => Some(TimeStep::Days),
            _ => None,
        }
    }
}

/// A parsed `<step> since <reference>` units string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeUnits {
    pub step: TimeStep,
    pub reference: NaiveDateTime,
}

impl TimeUnits {
    /// Parse a units attribute
    pub fn parse(units: &str) -> Result<Self> {
        let invalid = |message: &str| StratusError::InvalidTimeUnits {
            units: units.to_string(),
            message: message.to_string(),
        };

        let (step, reference) = units
            .split_once(" since ")
            .ok_or_else(|| invalid("expected '<unit> since <reference>'"))?;

        let step = TimeStep::parse(step.trim()).ok_or_else(|| invalid("unknown time step"))?;
        let reference =
            parse_reference(reference.trim()).ok_or_else(|| invalid("unreadable reference date"))?;

        Ok(Self { step, reference })
    }

    /// Convert one encoded value into a timestamp
    pub fn decode(&self, value: f64) -> Result<NaiveDateTime> {
        let millis = (value * self.step.millis()).round();
        // i64::MAX as f64 rounds up to 2^63, so the bound itself is out of range
        if !millis.is_finite() || millis.abs() >= i64::MAX as f64 {
            return Err(StratusError::InvalidTimeUnits {
                units: format!("{:?}", self.step),
                message: format!("time value {} out of range", value),
            });
        }

        self.reference
            .checked_add_signed(Duration::milliseconds(millis as i64))
            .ok_or_else(|| StratusError::InvalidTimeUnits {
                units: format!("{:?}", self.step),
                message: format!("time value {} overflows the calendar", value),
            })
    }

    /// Convert a whole coordinate array
    pub fn decode_all(&self, values: &[f64]) -> Result<Vec<NaiveDateTime>> {
        values.iter().map(|&v| self.decode(v)).collect()
    }
}

/// Calendars whose dates follow the proleptic Gregorian rules chrono uses
const GREGORIAN_CALENDARS: [&str; 3] = ["standard", "gregorian", "proleptic_gregorian"];

/// Check a `calendar` attribute against the calendars [`TimeUnits`] can decode.
///
/// A missing attribute means `standard`. Calendars such as `noleap` or
/// `360_day` are rejected instead of being decoded onto the wrong dates.
pub fn check_calendar(calendar: Option<&str>) -> Result<()> {
    let Some(calendar) = calendar else {
        return Ok(());
    };

    let name = calendar.trim().to_ascii_lowercase();
    if GREGORIAN_CALENDARS.contains(&name.as_str()) {
        Ok(())
    } else {
        Err(StratusError::InvalidTimeUnits {
            units: calendar.to_string(),
            message: format!(
                "unsupported calendar, expected one of: {}",
                GREGORIAN_CALENDARS.join(", ")
            ),
        })
    }
}

/// Parse the reference date of a units string.
///
/// Accepts a bare date, a date with `HH:MM` or `HH:MM:SS` (seconds may be
/// fractional), either `T` or a space as separator, and a trailing `Z`/`UTC`.
fn parse_reference(text: &str) -> Option<NaiveDateTime> {
    let text = text
        .trim_end_matches(" UTC")
        .trim_end_matches('Z')
        .replacen('T', " ", 1);

    let (date_part, time_part) = match text.split_once(' ') {
        Some((d, t)) => (d, Some(t.trim())),
        None => (text.as_str(), None),
    };

    let date = NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()?;
    let Some(time_part) = time_part else {
        return date.and_hms_opt(0, 0, 0);
    };

    let mut pieces = time_part.split(':');
    let hour: u32 = pieces.next()?.parse().ok()?;
    let minute: u32 = pieces.next().map_or(Some(0), |m| m.parse().ok())?;
    let seconds: f64 = pieces.next().map_or(Some(0.0), |s| s.parse().ok())?;

    let whole = seconds.trunc() as u32;
    let millis = ((seconds - seconds.trunc()) * 1000.0).round() as u32;
    date.and_hms_milli_opt(hour, minute, whole, millis)
}
