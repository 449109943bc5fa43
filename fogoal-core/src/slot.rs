//! Slot finder: first-fit search for one task across the planning horizon.
//!
//! Scan order is fixed (ascending day, then ascending hour, preferred window
//! before the rest of the working day) so the same input always lands in the
//! same slot.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use crate::config::{HourRange, PlannerConfig};
use crate::task::PreferredTime;
use crate::time::{add_days, add_minutes, Interval};

/// Which scan produced a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotPass {
    /// Inside the task's preferred time window.
    Preferred,
    /// Elsewhere in the working-hours window.
    Fallback,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    pub interval: Interval,
    pub pass: SlotPass,
}

#[derive(Debug, Clone)]
pub struct SlotFinder<'a> {
    config: &'a PlannerConfig,
    horizon_start: NaiveDateTime,
}

impl<'a> SlotFinder<'a> {
    /// `horizon_start` is day 0; it is normalised to midnight.
    pub fn new(config: &'a PlannerConfig, horizon_start: NaiveDate) -> Self {
        Self {
            config,
            horizon_start: horizon_start.and_time(NaiveTime::MIN),
        }
    }

    /// Earliest free slot for a block of `duration_minutes`, or `None` when
    /// the whole horizon is full.
    pub fn find(
        &self,
        duration_minutes: i64,
        preferred: Option<PreferredTime>,
        placed: &[Interval],
    ) -> Option<Slot> {
        let pref = self.config.preferred_hours(preferred);
        let work = self.config.working_hours();

        // Preferred hours are clipped to the working window.
        if let Some(interval) = self.scan(duration_minutes, placed, pref, |h| work.contains(h)) {
            return Some(Slot {
                interval,
                pass: SlotPass::Preferred,
            });
        }

        // Hours already tried above are skipped, never re-tested.
        self.scan(duration_minutes, placed, work, |h| !pref.contains(h))
            .map(|interval| Slot {
                interval,
                pass: SlotPass::Fallback,
            })
    }

    fn scan(
        &self,
        duration_minutes: i64,
        placed: &[Interval],
        hours: HourRange,
        include: impl Fn(u32) -> bool,
    ) -> Option<Interval> {
        for day in 0..self.config.horizon_days {
            let midnight = add_days(self.horizon_start, day.into());
            let day_end = add_minutes(midnight, i64::from(self.config.work_end_hour) * 60);

            for hour in hours.hours().filter(|h| include(*h)) {
                let start = add_minutes(midnight, i64::from(hour) * 60);
                let candidate = Interval::from_minutes(start, duration_minutes);

                if candidate.end > day_end {
                    continue;
                }
                if placed.iter().any(|p| p.overlaps(&candidate)) {
                    continue;
                }
                return Some(candidate);
            }
        }
        None
    }
}
