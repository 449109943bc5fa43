//! Bridge between the persisted `date` + `scheduledTime` string pair and the
//! single instant the planner does arithmetic on.

use chrono::{NaiveDate, NaiveDateTime};

use crate::task::Task;
use crate::time::{format_date_only, format_time_only, parse_date_only, parse_time_only, Interval};

/// Combined start instant of a task, if it has a date and a readable time.
///
/// `today` is the fallback for unreadable dates.
pub fn task_start(task: &Task, today: NaiveDate) -> Option<NaiveDateTime> {
    let date = parse_date_only(task.date.as_deref()?, today);
    let time = parse_time_only(task.scheduled_time.as_deref()?)?;
    Some(date.and_time(time))
}

/// `[start, start + duration)` of a scheduled task.
pub fn task_interval(task: &Task, today: NaiveDate) -> Option<Interval> {
    let start = task_start(task, today)?;
    Some(Interval::from_minutes(start, task.duration_minutes.into()))
}

/// Write a start instant back into the persisted string pair.
pub fn assign_start(task: &mut Task, start: NaiveDateTime) {
    task.date = Some(format_date_only(start));
    task.scheduled_time = Some(format_time_only(start));
}
