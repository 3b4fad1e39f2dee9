use crate::error::{Result, StockOpnameError};
use chrono::{Datelike, NaiveDate, NaiveDateTime};

pub const MONTH_NAMES: [&str; 12] = [
    "Januari",
    "Februari",
    "Maret",
    "April",
    "Mei",
    "Juni",
    "Juli",
    "Agustus",
    "September",
    "Oktober",
    "November",
    "Desember",
];

const SHORT_MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "Mei", "Jun", "Jul", "Agu", "Sep", "Okt", "Nov", "Des",
];

const SHORT_DAY_NAMES: [&str; 7] = ["Min", "Sen", "Sel", "Rab", "Kam", "Jum", "Sab"];

pub fn validate_month(month: u32) -> Result<()> {
    if !(1..=12).contains(&month) {
        return Err(StockOpnameError::InvalidPeriod(format!(
            "month {} must be between 1 and 12",
            month
        )));
    }
    Ok(())
}

/// Indonesian name for a 1-based month number.
pub fn month_name(month: u32) -> &'static str {
    MONTH_NAMES[(month.clamp(1, 12) - 1) as usize]
}

/// (year, month) of the month preceding the given one.
pub fn previous_month(year: i32, month: u32) -> (i32, u32) {
    if month == 1 {
        (year - 1, 12)
    } else {
        (year, month - 1)
    }
}

/// "05 Januari 2026"
pub fn format_long_date(date: NaiveDate) -> String {
    format!(
        "{:02} {} {}",
        date.day(),
        month_name(date.month()),
        date.year()
    )
}

/// "Sen, 05 Jan 2026 14:30" as shown in the transaction log.
pub fn format_log_timestamp(ts: NaiveDateTime) -> String {
    format!(
        "{}, {:02} {} {} {}",
        SHORT_DAY_NAMES[ts.weekday().num_days_from_sunday() as usize],
        ts.day(),
        SHORT_MONTH_NAMES[ts.month0() as usize],
        ts.year(),
        ts.format("%H:%M")
    )
}

/// Parses the month picker value "YYYY-MM" into (year, month).
pub fn parse_month_selection(selection: &str) -> Result<(i32, u32)> {
    let trimmed = selection.trim();
    if trimmed.is_empty() {
        return Err(StockOpnameError::InvalidPeriod(
            "no month selected".to_string(),
        ));
    }

    let start = NaiveDate::parse_from_str(&format!("{}-01", trimmed), "%Y-%m-%d").map_err(|_| {
        StockOpnameError::InvalidPeriod(format!(
            "Invalid month format: {}. Expected YYYY-MM",
            trimmed
        ))
    })?;

    Ok((start.year(), start.month()))
}
