//! Time utilities: pure date/instant helpers for the planner.
//!
//! Every instant is a `NaiveDateTime` read as local wall-clock time. Helpers
//! return new values and never touch their inputs.

use std::sync::OnceLock;

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use regex::Regex;
use tracing::warn;

/// Half-open `[start, end)` span of wall-clock time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Interval {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl Interval {
    /// Interval starting at `start` and lasting `minutes`.
    pub fn from_minutes(start: NaiveDateTime, minutes: i64) -> Self {
        Self {
            start,
            end: add_minutes(start, minutes),
        }
    }

    pub fn overlaps(&self, other: &Interval) -> bool {
        intervals_overlap(self, other)
    }
}

/// Touching endpoints do not overlap.
pub fn intervals_overlap(a: &Interval, b: &Interval) -> bool {
    a.start < b.end && b.start < a.end
}

pub fn add_days(at: NaiveDateTime, days: i64) -> NaiveDateTime {
    at.checked_add_signed(Duration::days(days)).unwrap_or(at)
}

pub fn add_minutes(at: NaiveDateTime, minutes: i64) -> NaiveDateTime {
    at.checked_add_signed(Duration::minutes(minutes)).unwrap_or(at)
}

/// Midnight of the most recent `week_starts_on` day at or before `at`.
pub fn start_of_week(at: NaiveDateTime, week_starts_on: Weekday) -> NaiveDateTime {
    let date = at.date();
    let back = (7 + date.weekday().num_days_from_sunday()
        - week_starts_on.num_days_from_sunday())
        % 7;
    add_days(date.and_time(NaiveTime::MIN), -(back as i64))
}

/// Map the 0=Sunday .. 6=Saturday convention onto `Weekday`.
///
/// Values above 6 wrap around.
pub fn weekday_from_index(index: u8) -> Weekday {
    match index % 7 {
        0 => Weekday::Sun,
        1 => Weekday::Mon,
        2 => Weekday::Tue,
        3 => Weekday::Wed,
        4 => Weekday::Thu,
        5 => Weekday::Fri,
        _ => Weekday::Sat,
    }
}

fn ymd_split() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(\d{4})[-/.](\d{1,2})[-/.](\d{1,2})").expect("static regex")
    })
}

fn mdy_split() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\d{1,2})/(\d{1,2})/(\d{4})").expect("static regex"))
}

fn captured_date(caps: &regex::Captures<'_>, y: usize, m: usize, d: usize) -> Option<NaiveDate> {
    let year = caps.get(y)?.as_str().parse().ok()?;
    let month = caps.get(m)?.as_str().parse().ok()?;
    let day = caps.get(d)?.as_str().parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Parse a stored calendar date, tolerating the loose formats user- and
/// AI-generated tasks carry. Never fails: unreadable input yields `fallback`.
pub fn parse_date_only(raw: &str, fallback: NaiveDate) -> NaiveDate {
    let s = raw.trim();

    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return d;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return dt.date_naive();
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return dt.date();
        }
    }
    if let Some(d) = ymd_split()
        .captures(s)
        .and_then(|caps| captured_date(&caps, 1, 2, 3))
    {
        return d;
    }
    if let Some(d) = mdy_split()
        .captures(s)
        .and_then(|caps| captured_date(&caps, 3, 1, 2))
    {
        return d;
    }

    warn!(raw = %raw, fallback = %fallback, "unreadable task date, using fallback");
    fallback
}

/// Parse a "HH:mm" clock string. `None` on malformed input.
pub fn parse_time_only(raw: &str) -> Option<NaiveTime> {
    let s = raw.trim();
    NaiveTime::parse_from_str(s, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
        .ok()
}

pub fn format_date_only(at: NaiveDateTime) -> String {
    at.format("%Y-%m-%d").to_string()
}

pub fn format_time_only(at: NaiveDateTime) -> String {
    at.format("%H:%M").to_string()
}
