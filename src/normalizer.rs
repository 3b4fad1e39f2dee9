//! Normalization of heterogeneous ledger dates into local wall-clock timestamps.
//!
//! The ledger stores transaction dates as spreadsheet serial numbers, ISO strings,
//! JavaScript `Date::toString` output, or day-first `DD/MM/YYYY HH:mm[:ss]` text. Every
//! shape is mapped onto a [`NaiveDateTime`] in the warehouses' local time. Nothing here
//! fails: input that cannot be understood becomes the epoch sentinel, which sorts before
//! any ledger date. `ReconciliationWindow::position` places it before every window,
//! including the one around 1970-01-01.

use crate::config::{ReportConfig, DEFAULT_UTC_OFFSET_MINUTES};
use crate::error::Result;
use crate::schema::RawDate;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};

/// Days between the spreadsheet epoch (1899-12-30) and the Unix epoch.
pub const SERIAL_UNIX_EPOCH_OFFSET: f64 = 25569.0;

const MILLIS_PER_DAY: f64 = 86_400_000.0;

pub const MIN_YEAR: i32 = 1900;
pub const MAX_YEAR: i32 = 2100;

const NAIVE_FORMATS: [&str; 6] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
];

/// The "unknown date" value: 1970-01-01 00:00:00.
pub fn epoch_sentinel() -> NaiveDateTime {
    NaiveDateTime::default()
}

pub fn is_sentinel(ts: NaiveDateTime) -> bool {
    ts == epoch_sentinel()
}

/// Normalizes with the default business offset (WIB).
pub fn normalize(raw: &RawDate) -> NaiveDateTime {
    DateNormalizer::default().normalize(raw)
}

pub fn normalize_str(raw: &str) -> NaiveDateTime {
    DateNormalizer::default().normalize_str(raw)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateNormalizer {
    offset: FixedOffset,
}

impl Default for DateNormalizer {
    fn default() -> Self {
        Self {
            offset: FixedOffset::east_opt(DEFAULT_UTC_OFFSET_MINUTES * 60)
                .expect("WIB offset is within range"),
        }
    }
}

impl DateNormalizer {
    pub fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }

    pub fn from_config(config: &ReportConfig) -> Result<Self> {
        Ok(Self::new(config.utc_offset()?))
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    pub fn normalize(&self, raw: &RawDate) -> NaiveDateTime {
        match raw {
            RawDate::Serial(serial) => from_serial(*serial).unwrap_or_else(epoch_sentinel),
            RawDate::Text(text) => self.normalize_str(text),
            RawDate::Missing => epoch_sentinel(),
        }
    }

    pub fn normalize_str(&self, raw: &str) -> NaiveDateTime {
        let text = raw.trim();
        if text.is_empty() || text == "-" {
            return epoch_sentinel();
        }

        if looks_like_iso(text) {
            if let Some(ts) = self.parse_general(text) {
                return ts;
            }
        }

        // Slash dates are day-first; handing them to the general parser would read them
        // month-first.
        if text.contains('/') && !starts_with_year(text) {
            return parse_day_first(text).unwrap_or_else(epoch_sentinel);
        }

        self.parse_general(text).unwrap_or_else(epoch_sentinel)
    }

    fn parse_general(&self, text: &str) -> Option<NaiveDateTime> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
            return Some(dt.with_timezone(&self.offset).naive_local());
        }

        if let Ok(dt) = DateTime::parse_from_rfc2822(text) {
            return Some(dt.with_timezone(&self.offset).naive_local());
        }

        // JavaScript Date::toString(), e.g.
        // "Mon Jan 05 2026 14:30:00 GMT+0700 (Western Indonesia Time)"
        let without_zone_name = text.split(" (").next().unwrap_or(text).trim();
        if let Ok(dt) = DateTime::parse_from_str(without_zone_name, "%a %b %d %Y %H:%M:%S GMT%z") {
            return Some(dt.with_timezone(&self.offset).naive_local());
        }

        for format in NAIVE_FORMATS {
            if let Ok(ts) = NaiveDateTime::parse_from_str(text, format) {
                return Some(ts);
            }
        }

        for format in ["%Y-%m-%d", "%Y/%m/%d"] {
            if let Ok(date) = NaiveDate::parse_from_str(text, format) {
                return date.and_hms_opt(0, 0, 0);
            }
        }

        None
    }
}

fn looks_like_iso(text: &str) -> bool {
    text.contains('T') || text.contains("GMT") || (starts_with_year(text) && text.contains('-'))
}

fn starts_with_year(text: &str) -> bool {
    let bytes = text.as_bytes();
    bytes.len() > 4 && bytes[..4].iter().all(u8::is_ascii_digit) && !bytes[4].is_ascii_digit()
}

/// Serial numbers carry the spreadsheet's wall-clock date and time with no zone, so the
/// result is taken as local time and is not shifted by the configured offset.
fn from_serial(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() {
        return None;
    }
    let millis = ((serial - SERIAL_UNIX_EPOCH_OFFSET) * MILLIS_PER_DAY).round();
    if millis.abs() >= i64::MAX as f64 {
        return None;
    }
    DateTime::from_timestamp_millis(millis as i64).map(|dt| dt.naive_utc())
}

/// Parses `DD/MM/YYYY[ HH:mm[:ss]]` field by field, rejecting out-of-range components
/// instead of letting them roll over into the next month or year.
fn parse_day_first(text: &str) -> Option<NaiveDateTime> {
    let mut parts = text.split_whitespace();
    let date_part = parts.next()?.trim_end_matches(',');
    let time_part = parts.next();

    let fields: Vec<&str> = date_part.split('/').collect();
    if fields.len() < 3 {
        return None;
    }

    let day: u32 = fields[0].trim().parse().ok()?;
    let month: u32 = fields[1].trim().parse().ok()?;
    let year: i32 = fields[2].trim().parse().ok()?;

    if !(1..=31).contains(&day)
        || !(1..=12).contains(&month)
        || !(MIN_YEAR..=MAX_YEAR).contains(&year)
    {
        return None;
    }

    let (hour, minute, second) = match time_part {
        Some(time) => parse_time(time)?,
        None => (0, 0, 0),
    };

    NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(hour, minute, second)
}

fn parse_time(time: &str) -> Option<(u32, u32, u32)> {
    let fields: Vec<&str> = time.split(':').collect();
    if fields.len() < 2 || fields.len() > 3 {
        return None;
    }

    let hour: u32 = fields[0].trim().parse().ok()?;
    let minute: u32 = fields[1].trim().parse().ok()?;
    let second: u32 = match fields.get(2) {
        Some(s) => s.trim().parse().ok()?,
        None => 0,
    };

    if hour > 23 || minute > 59 || second > 59 {
        return None;
    }
    Some((hour, minute, second))
}
