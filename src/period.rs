use crate::error::{Result, StockOpnameError};
use crate::normalizer::{is_sentinel, MAX_YEAR, MIN_YEAR};
use crate::utils::{format_long_date, previous_month, validate_month};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// First day of a stock opname period, in the month before the report month.
pub const CUTOFF_START_DAY: u32 = 26;
/// Last day of a stock opname period, in the report month.
pub const CUTOFF_END_DAY: u32 = 25;

/// Inclusive cut-off window `[start, end]` at second granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciliationWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl ReconciliationWindow {
    /// The 26th of the previous month 00:00:00 through the 25th of `month` 23:59:59.
    pub fn for_month(year: i32, month: u32) -> Result<Self> {
        validate_month(month)?;
        if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
            return Err(StockOpnameError::InvalidPeriod(format!(
                "year {} is outside {}..={}",
                year, MIN_YEAR, MAX_YEAR
            )));
        }

        let (start_year, start_month) = previous_month(year, month);
        let start = at(start_year, start_month, CUTOFF_START_DAY, 0, 0, 0)?;
        let end = at(year, month, CUTOFF_END_DAY, 23, 59, 59)?;

        Ok(Self { start, end })
    }

    /// Where a timestamp falls relative to the window. The epoch sentinel is always
    /// `Less`, even for a window that spans 1970-01-01.
    pub fn position(&self, ts: NaiveDateTime) -> Ordering {
        if is_sentinel(ts) || ts < self.start {
            Ordering::Less
        } else if ts > self.end {
            Ordering::Greater
        } else {
            Ordering::Equal
        }
    }

    pub fn contains(&self, ts: NaiveDateTime) -> bool {
        self.position(ts) == Ordering::Equal
    }

    pub fn is_after(&self, ts: NaiveDateTime) -> bool {
        self.position(ts) == Ordering::Greater
    }

    /// "26 Desember 2025 - 25 Januari 2026"
    pub fn label(&self) -> String {
        format!(
            "{} - {}",
            format_long_date(self.start.date()),
            format_long_date(self.end.date())
        )
    }
}

pub fn resolve_window(year: i32, month: u32) -> Result<ReconciliationWindow> {
    ReconciliationWindow::for_month(year, month)
}

fn at(year: i32, month: u32, day: u32, h: u32, m: u32, s: u32) -> Result<NaiveDateTime> {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|d| d.and_hms_opt(h, m, s))
        .ok_or_else(|| {
            StockOpnameError::InvalidPeriod(format!(
                "{:04}-{:02}-{:02} is not a valid calendar date",
                year, month, day
            ))
        })
}
