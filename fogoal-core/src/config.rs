//! Planner tuning knobs.
//!
//! The defaults are the fixed values the app ships with. They are exposed as
//! named constants and gathered in [`PlannerConfig`] so a caller (or the
//! CLI's `config.toml`) can tune them.

use std::ops::Range;

use anyhow::{bail, Result};
use chrono::Weekday;
use serde::{Deserialize, Serialize};

use crate::task::PreferredTime;
use crate::time::weekday_from_index;

/// First hour a task may start.
pub const WORK_START_HOUR: u32 = 8;
/// Every placed task must end at or before this hour.
pub const WORK_END_HOUR: u32 = 23;
/// Number of consecutive days searched.
pub const HORIZON_DAYS: u32 = 7;
/// The horizon starts on this weekday.
pub const WEEK_STARTS_ON: Weekday = Weekday::Mon;

pub const MORNING_HOURS: Range<u32> = 8..12;
pub const AFTERNOON_HOURS: Range<u32> = 12..17;
pub const EVENING_HOURS: Range<u32> = 17..22;
/// Used when a task states no preferred time.
pub const NO_PREFERENCE_HOURS: Range<u32> = 9..18;

/// Half-open `[start, end)` range of whole clock hours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourRange {
    pub start: u32,
    pub end: u32,
}

impl HourRange {
    pub const fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    fn from_range(r: Range<u32>) -> Self {
        Self::new(r.start, r.end)
    }

    pub fn contains(&self, hour: u32) -> bool {
        hour >= self.start && hour < self.end
    }

    pub fn hours(&self) -> Range<u32> {
        self.start..self.end
    }

    fn check(&self, name: &str) -> Result<()> {
        if self.start >= self.end {
            bail!("{name}: start hour {} must be before end hour {}", self.start, self.end);
        }
        if self.end > 24 {
            bail!("{name}: end hour {} is past midnight", self.end);
        }
        Ok(())
    }

    fn check_within(&self, name: &str, window: HourRange) -> Result<()> {
        if self.start < window.start || self.end > window.end {
            bail!(
                "{name}: hours {}..{} fall outside working hours {}..{}",
                self.start,
                self.end,
                window.start,
                window.end
            );
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    pub work_start_hour: u32,
    pub work_end_hour: u32,
    pub horizon_days: u32,
    /// 0 = Sunday .. 6 = Saturday.
    pub week_starts_on: u8,

    pub morning: HourRange,
    pub afternoon: HourRange,
    pub evening: HourRange,
    pub no_preference: HourRange,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            work_start_hour: WORK_START_HOUR,
            work_end_hour: WORK_END_HOUR,
            horizon_days: HORIZON_DAYS,
            week_starts_on: WEEK_STARTS_ON.num_days_from_sunday() as u8,
            morning: HourRange::from_range(MORNING_HOURS),
            afternoon: HourRange::from_range(AFTERNOON_HOURS),
            evening: HourRange::from_range(EVENING_HOURS),
            no_preference: HourRange::from_range(NO_PREFERENCE_HOURS),
        }
    }
}

impl PlannerConfig {
    pub fn working_hours(&self) -> HourRange {
        HourRange::new(self.work_start_hour, self.work_end_hour)
    }

    pub fn week_start(&self) -> Weekday {
        weekday_from_index(self.week_starts_on)
    }

    /// Hours scanned first for a task with the given preference.
    pub fn preferred_hours(&self, preferred: Option<PreferredTime>) -> HourRange {
        match preferred {
            Some(PreferredTime::Morning) => self.morning,
            Some(PreferredTime::Afternoon) => self.afternoon,
            Some(PreferredTime::Evening) => self.evening,
            None => self.no_preference,
        }
    }

    pub fn validate(&self) -> Result<()> {
        let work = self.working_hours();
        work.check("working hours")?;
        for (name, range) in [
            ("morning", self.morning),
            ("afternoon", self.afternoon),
            ("evening", self.evening),
            ("no_preference", self.no_preference),
        ] {
            range.check(name)?;
            range.check_within(name, work)?;
        }
        if self.horizon_days == 0 {
            bail!("horizon_days must be at least 1");
        }
        if self.week_starts_on > 6 {
            bail!(
                "week_starts_on must be 0 (Sunday) ..= 6 (Saturday), got {}",
                self.week_starts_on
            );
        }
        Ok(())
    }
}
