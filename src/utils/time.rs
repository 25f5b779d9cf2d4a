//! Time utilities: the server's date, time-of-day and duration formats.
//!
//! Durations are elapsed milliseconds. The server prints them as `HH:mm`
//! where the hour part is not bounded by a day ("27:15" is valid on week
//! and month totals).

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIME_FORMAT: &str = "%H:%M";

const MINUTE_MS: i64 = 60_000;
const HOUR_MS: i64 = 60 * MINUTE_MS;

/// `yyyy-MM-dd` → date. Blank or malformed text yields `None`.
pub fn parse_system_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(text, DATE_FORMAT).ok()
}

pub fn format_system_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// `HH:mm` on the given day → timestamp with zero seconds.
pub fn parse_system_time(date: NaiveDate, text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    NaiveTime::parse_from_str(text, TIME_FORMAT)
        .ok()
        .map(|t| date.and_time(t))
}

pub fn format_system_time(time: NaiveDateTime) -> String {
    time.format(TIME_FORMAT).to_string()
}

/// `HH:mm` → elapsed milliseconds ("02:30" is 9_000_000).
/// A leading `-` is accepted for negative balances such as the remaining quota.
pub fn parse_duration(text: &str) -> Option<i64> {
    let text = text.trim();
    let (negative, body) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };

    let (hours, minutes) = body.split_once(':')?;
    if hours.is_empty()
        || minutes.len() != 2
        || !hours.bytes().all(|b| b.is_ascii_digit())
        || !minutes.bytes().all(|b| b.is_ascii_digit())
    {
        return None;
    }

    let hours: i64 = hours.parse().ok()?;
    let minutes: i64 = minutes.parse().ok()?;
    if minutes > 59 {
        return None;
    }

    // Digits beyond what fits in milliseconds are malformed, not wrapped.
    let elapsed = hours.checked_mul(HOUR_MS)?.checked_add(minutes * MINUTE_MS)?;
    Some(if negative { -elapsed } else { elapsed })
}

/// Elapsed milliseconds → `HH:mm`, truncating seconds. Hours are not wrapped.
pub fn format_duration(elapsed: i64) -> String {
    let sign = if elapsed < 0 { "-" } else { "" };
    let mins = elapsed.unsigned_abs() / MINUTE_MS as u64;
    format!("{}{:02}:{:02}", sign, mins / 60, mins % 60)
}
