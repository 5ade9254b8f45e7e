// Date parsing for the date-bound predicates

use crate::FieldValue;
use chrono::{
    DateTime, Duration, FixedOffset, Local, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeZone,
    Utc,
};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static ISO_DATE_TIME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?P<year>[0-9]{4})(?:-(?P<month>[0-9]{2})(?:-(?P<day>[0-9]{2}))?)?(?:[Tt ](?P<hour>[0-9]{2}):(?P<minute>[0-9]{2})(?::(?P<second>[0-9]{2})(?:[.,](?P<fraction>[0-9]+))?)?(?P<offset>[Zz]|[+-][0-9]{2}:?[0-9]{2})?)?$",
    )
    .unwrap()
});

/// Largest distance from the epoch a date may have, in milliseconds.
const MAX_EPOCH_MILLIS: f64 = 8.64e15;

/// Zone used for date-times written without a UTC offset.
///
/// Date-only values (`2024-05-01`) are always midnight UTC; only values with
/// a time of day and no offset (`2024-05-01T09:30`) depend on this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NaiveZone {
    /// The host's local time zone
    #[default]
    Local,
    Fixed(FixedOffset),
}

impl NaiveZone {
    /// Fixed offset east of UTC, in minutes. `None` if out of range.
    pub fn fixed_minutes(minutes: i32) -> Option<Self> {
        minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .map(NaiveZone::Fixed)
    }

    pub fn utc() -> Self {
        NaiveZone::Fixed(Utc.fix())
    }

    fn resolve(&self, naive: NaiveDateTime) -> Option<DateTime<Utc>> {
        match self {
            NaiveZone::Local => Local
                .from_local_datetime(&naive)
                .earliest()
                // Times skipped by a DST jump land one hour later.
                .or_else(|| {
                    let shifted = naive.checked_add_signed(Duration::hours(1))?;
                    Local.from_local_datetime(&shifted).earliest()
                })
                .map(|dt| dt.with_timezone(&Utc)),
            NaiveZone::Fixed(offset) => offset
                .from_local_datetime(&naive)
                .single()
                .map(|dt| dt.with_timezone(&Utc)),
        }
    }
}

/// Interpret a form value as a moment in time.
///
/// Text is parsed with [`parse_moment`], numbers are milliseconds since the
/// Unix epoch, arrays are parsed from their string form. Everything else has
/// no moment.
pub fn moment_of(value: &FieldValue, zone: NaiveZone) -> Option<DateTime<Utc>> {
    match value {
        FieldValue::Text(text) => parse_moment(text, zone),
        FieldValue::Number(millis) => from_epoch_millis(*millis),
        FieldValue::Array(_) => parse_moment(&value.coerce_to_string(), zone),
        FieldValue::Undefined | FieldValue::Null | FieldValue::Bool(_) | FieldValue::Object => None,
    }
}

/// Parse a date or date-time string.
///
/// Accepts ISO-8601 dates (`YYYY`, `YYYY-MM`, `YYYY-MM-DD`), ISO date-times
/// with or without an offset, RFC 3339 and RFC 2822. Returns `None` for
/// anything else, including impossible calendar dates.
pub fn parse_moment(text: &str, zone: NaiveZone) -> Option<DateTime<Utc>> {
    let text = text.trim();

    if let Some(caps) = ISO_DATE_TIME.captures(text) {
        return from_iso_captures(&caps, zone);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }

    DateTime::parse_from_rfc2822(text)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

fn from_iso_captures(caps: &Captures<'_>, zone: NaiveZone) -> Option<DateTime<Utc>> {
    let number = |name: &str| -> Option<Option<u32>> {
        match caps.name(name) {
            Some(m) => m.as_str().parse().ok().map(Some),
            None => Some(None),
        }
    };

    let year: i32 = caps.name("year")?.as_str().parse().ok()?;
    let month = number("month")?.unwrap_or(1);
    let day = number("day")?.unwrap_or(1);
    let date = NaiveDate::from_ymd_opt(year, month, day)?;

    let Some(hour) = number("hour")? else {
        return Some(Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN)));
    };
    let minute = number("minute")?.unwrap_or(0);
    let second = number("second")?.unwrap_or(0);
    let nanos = caps.name("fraction").map_or(0, |m| fraction_nanos(m.as_str()));
    let naive = date.and_time(NaiveTime::from_hms_nano_opt(hour, minute, second, nanos)?);

    match caps.name("offset") {
        Some(offset) => parse_offset(offset.as_str())?
            .from_local_datetime(&naive)
            .single()
            .map(|dt| dt.with_timezone(&Utc)),
        None => zone.resolve(naive),
    }
}

/// Nanoseconds from a decimal fraction, ignoring digits past the ninth.
fn fraction_nanos(digits: &str) -> u32 {
    let mut padded: String = digits.chars().take(9).collect();
    while padded.len() < 9 {
        padded.push('0');
    }
    padded.parse().unwrap_or(0)
}

fn parse_offset(raw: &str) -> Option<FixedOffset> {
    if raw.eq_ignore_ascii_case("z") {
        return FixedOffset::east_opt(0);
    }

    let sign = if raw.starts_with('-') { -1 } else { 1 };
    let digits: String = raw[1..].chars().filter(|c| *c != ':').collect();
    let hours: i32 = digits.get(..2)?.parse().ok()?;
    let minutes: i32 = digits.get(2..4)?.parse().ok()?;
    if minutes >= 60 {
        return None;
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

/// Milliseconds since the epoch, truncated toward zero.
fn from_epoch_millis(millis: f64) -> Option<DateTime<Utc>> {
    if !millis.is_finite() || millis.abs() > MAX_EPOCH_MILLIS {
        return None;
    }
    Utc.timestamp_millis_opt(millis.trunc() as i64).single()
}
