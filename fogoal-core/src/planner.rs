//! Smart Planner: auto-places backlog tasks into free calendar slots.
//!
//! Greedy first-fit. Backlog is ordered by priority then duration (bigger
//! blocks first), and each task takes the earliest slot the
//! [`SlotFinder`] returns against the pinned tasks plus everything placed
//! earlier in the same pass. Not globally optimal.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use tracing::{debug, info, warn};

use crate::adapter::{assign_start, task_interval};
use crate::config::PlannerConfig;
use crate::slot::{SlotFinder, SlotPass};
use crate::task::{Task, TaskState};
use crate::time::{start_of_week, Interval};

/// One backlog task that received a slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    pub task_id: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub pass: SlotPass,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlanOutcome {
    /// Same tasks, same order as the input; placed ones carry a date + time.
    pub tasks: Vec<Task>,
    /// In placement order.
    pub placements: Vec<Placement>,
    /// Backlog ids left without a slot, in placement order.
    pub unplaced: Vec<String>,
}

impl PlanOutcome {
    pub fn summary(&self) -> String {
        format!(
            "placed {} task(s), {} left in backlog",
            self.placements.len(),
            self.unplaced.len()
        )
    }
}

#[derive(Debug, Clone, Default)]
pub struct Planner {
    config: PlannerConfig,
}

impl Planner {
    pub fn new(config: PlannerConfig) -> Self {
        Self { config }
    }

    /// First day searched for a given reference date.
    pub fn horizon_start(&self, reference: NaiveDate) -> NaiveDate {
        start_of_week(reference.and_time(NaiveTime::MIN), self.config.week_start()).date()
    }

    /// Plan the backlog of `tasks` around the week containing `reference`.
    ///
    /// Pinned and completed tasks come back untouched. `reference` doubles as
    /// "today" for stored dates that cannot be read.
    pub fn plan(&self, tasks: &[Task], reference: NaiveDate) -> PlanOutcome {
        let mut out = tasks.to_vec();

        let mut placed: Vec<Interval> = Vec::new();
        let mut backlog: Vec<usize> = Vec::new();

        for (i, t) in out.iter().enumerate() {
            match t.state() {
                TaskState::Completed => {}
                TaskState::Pinned => match task_interval(t, reference) {
                    Some(iv) => placed.push(iv),
                    None => warn!(
                        task_id = %t.id,
                        scheduled_time = t.scheduled_time.as_deref().unwrap_or_default(),
                        "pinned task has an unreadable time; not treated as busy"
                    ),
                },
                TaskState::Backlog => backlog.push(i),
            }
        }

        // Stable: equal keys keep input order.
        backlog.sort_by(|&a, &b| {
            let (ta, tb) = (&out[a], &out[b]);
            tb.priority
                .weight()
                .cmp(&ta.priority.weight())
                .then_with(|| tb.duration_minutes.cmp(&ta.duration_minutes))
        });

        let horizon_start = self.horizon_start(reference);
        let finder = SlotFinder::new(&self.config, horizon_start);
        debug!(
            %horizon_start,
            busy = placed.len(),
            backlog = backlog.len(),
            "auto-planning backlog"
        );

        let mut placements = Vec::new();
        let mut unplaced = Vec::new();

        for i in backlog {
            let task = &mut out[i];
            if task.duration_minutes <= 0 {
                warn!(
                    task_id = %task.id,
                    duration = task.duration_minutes,
                    "non-positive duration; left in backlog"
                );
                unplaced.push(task.id.clone());
                continue;
            }

            match finder.find(task.duration_minutes.into(), task.preferred_time, &placed) {
                Some(slot) => {
                    assign_start(task, slot.interval.start);
                    placed.push(slot.interval);
                    debug!(
                        task_id = %task.id,
                        start = %slot.interval.start,
                        pass = ?slot.pass,
                        "placed"
                    );
                    placements.push(Placement {
                        task_id: task.id.clone(),
                        start: slot.interval.start,
                        end: slot.interval.end,
                        pass: slot.pass,
                    });
                }
                None => {
                    debug!(task_id = %task.id, "no free slot in horizon");
                    unplaced.push(task.id.clone());
                }
            }
        }

        let outcome = PlanOutcome {
            tasks: out,
            placements,
            unplaced,
        };
        info!("{}", outcome.summary());
        outcome
    }
}

/// Plan with the default configuration and return only the task list.
pub fn auto_schedule(tasks: &[Task], reference: NaiveDate) -> Vec<Task> {
    Planner::default().plan(tasks, reference).tasks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::{PreferredTime, Priority};

    fn wednesday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 3).unwrap()
    }

    fn slot_of(tasks: &[Task], id: &str) -> (Option<String>, Option<String>) {
        let t = tasks.iter().find(|t| t.id == id).unwrap();
        (t.date.clone(), t.scheduled_time.clone())
    }

    fn slot(date: &str, time: &str) -> (Option<String>, Option<String>) {
        (Some(date.to_string()), Some(time.to_string()))
    }

    #[test]
    fn horizon_starts_on_monday_of_reference_week() {
        let p = Planner::default();
        let monday = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert_eq!(p.horizon_start(wednesday()), monday);
    }

    #[test]
    fn keeps_input_order_and_length() {
        let tasks = vec![
            Task::new("low", "l").with_priority(Priority::Low),
            Task::new("pin", "p").pinned_at("2024-01-02", "10:00"),
            Task::new("high", "h").with_priority(Priority::High),
        ];
        let out = auto_schedule(&tasks, wednesday());
        let ids: Vec<&str> = out.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["low", "pin", "high"]);
    }

    #[test]
    fn high_priority_placed_first_then_longer() {
        let tasks = vec![
            Task::new("short", "s").with_priority(Priority::High).with_duration(30),
            Task::new("long", "l").with_priority(Priority::High).with_duration(90),
            Task::new("med", "m").with_priority(Priority::Medium).with_duration(120),
        ];
        let out = Planner::default().plan(&tasks, wednesday());
        let order: Vec<&str> = out.placements.iter().map(|p| p.task_id.as_str()).collect();
        assert_eq!(order, vec!["long", "short", "med"]);

        // long: Mon 09:00-10:30, short: next free whole hour 11:00, med: 12:00.
        assert_eq!(slot_of(&out.tasks, "long"), slot("2024-01-01", "09:00"));
        assert_eq!(slot_of(&out.tasks, "short"), slot("2024-01-01", "11:00"));
        assert_eq!(slot_of(&out.tasks, "med"), slot("2024-01-01", "12:00"));
    }

    #[test]
    fn completed_backlog_task_is_ignored() {
        let tasks = vec![Task::new("done", "d").completed()];
        let out = Planner::default().plan(&tasks, wednesday());
        assert_eq!(out.tasks, tasks);
        assert!(out.placements.is_empty());
        assert!(out.unplaced.is_empty());
    }

    #[test]
    fn completed_pinned_task_is_not_an_obstacle() {
        let tasks = vec![
            Task::new("done", "d").pinned_at("2024-01-01", "08:00").with_duration(60).completed(),
            Task::new("new", "n").with_preferred_time(PreferredTime::Morning).with_duration(60),
        ];
        let out = auto_schedule(&tasks, wednesday());
        assert_eq!(slot_of(&out, "new"), slot("2024-01-01", "08:00"));
    }

    #[test]
    fn date_only_task_gets_rescheduled() {
        let mut t = Task::new("half", "h").with_duration(60);
        t.date = Some("2024-01-05".into());
        let out = auto_schedule(&[t], wednesday());
        assert_eq!(slot_of(&out, "half"), slot("2024-01-01", "09:00"));
    }

    #[test]
    fn non_positive_duration_left_alone() {
        let tasks = vec![
            Task::new("zero", "z").with_duration(0),
            Task::new("neg", "n").with_duration(-15),
        ];
        let out = Planner::default().plan(&tasks, wednesday());
        assert_eq!(out.tasks, tasks);
        assert_eq!(out.unplaced, vec!["zero".to_string(), "neg".to_string()]);
    }

    #[test]
    fn unreadable_pinned_time_passes_through() {
        let tasks = vec![
            Task::new("odd", "o").pinned_at("2024-01-01", "morning-ish").with_duration(60),
            Task::new("new", "n").with_duration(60),
        ];
        let out = auto_schedule(&tasks, wednesday());
        assert_eq!(out[0], tasks[0]);
        assert_eq!(slot_of(&out, "new"), slot("2024-01-01", "09:00"));
    }

    #[test]
    fn custom_config_narrows_window() {
        let cfg = PlannerConfig {
            work_start_hour: 10,
            work_end_hour: 12,
            horizon_days: 1,
            ..PlannerConfig::default()
        };
        let tasks = vec![
            Task::new("a", "a").with_duration(120).with_preferred_time(PreferredTime::Evening),
            Task::new("b", "b").with_duration(60).with_preferred_time(PreferredTime::Evening),
        ];
        let out = Planner::new(cfg).plan(&tasks, wednesday());
        // Evening hours all end past 12:00; fallback 10:00 takes the whole window.
        assert_eq!(out.placements.len(), 1);
        assert_eq!(out.placements[0].task_id, "a");
        assert_eq!(out.placements[0].pass, SlotPass::Fallback);
        assert_eq!(out.unplaced, vec!["b".to_string()]);
        assert_eq!(out.summary(), "placed 1 task(s), 1 left in backlog");
    }
}
