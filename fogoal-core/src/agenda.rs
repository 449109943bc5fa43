//! Read-only week view over a task list, one bucket per horizon day.

use chrono::{NaiveDate, NaiveDateTime};

use crate::adapter::task_interval;
use crate::config::PlannerConfig;
use crate::planner::Planner;
use crate::task::Task;
use crate::time::parse_date_only;

#[derive(Debug, Clone, PartialEq)]
pub struct AgendaEntry {
    pub task_id: String,
    pub title: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub completed: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AgendaDay {
    pub date: NaiveDate,
    /// Timed tasks, earliest first.
    pub entries: Vec<AgendaEntry>,
    /// Dated tasks without a readable clock time.
    pub all_day: Vec<String>,
}

impl AgendaDay {
    pub fn busy_minutes(&self) -> i64 {
        self.entries
            .iter()
            .filter(|e| !e.completed)
            .map(|e| (e.end - e.start).num_minutes())
            .sum()
    }
}

pub fn build_week_agenda(
    tasks: &[Task],
    reference: NaiveDate,
    config: &PlannerConfig,
) -> Vec<AgendaDay> {
    let first = Planner::new(config.clone()).horizon_start(reference);

    let mut days: Vec<AgendaDay> = first
        .iter_days()
        .take(config.horizon_days as usize)
        .map(|date| AgendaDay {
            date,
            entries: Vec::new(),
            all_day: Vec::new(),
        })
        .collect();

    for t in tasks {
        let Some(raw) = t.date.as_deref() else { continue };
        let date = parse_date_only(raw, reference);
        let Some(day) = days.iter_mut().find(|d| d.date == date) else { continue };

        match task_interval(t, reference) {
            Some(iv) => day.entries.push(AgendaEntry {
                task_id: t.id.clone(),
                title: t.title.clone(),
                start: iv.start,
                end: iv.end,
                completed: t.completed,
            }),
            None => day.all_day.push(t.id.clone()),
        }
    }

    for day in &mut days {
        day.entries.sort_by_key(|e| e.start);
    }
    days
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_by_day_and_sorts() {
        let mut all_day = Task::new("d", "dentist");
        all_day.date = Some("2024-01-02".into());

        let tasks = vec![
            Task::new("late", "late").pinned_at("2024-01-01", "18:00").with_duration(30),
            Task::new("early", "early").pinned_at("2024-01-01", "08:00").with_duration(60),
            Task::new("done", "done")
                .pinned_at("2024-01-01", "12:00")
                .with_duration(60)
                .completed(),
            Task::new("next-week", "x").pinned_at("2024-01-08", "09:00"),
            Task::new("backlog", "b"),
            all_day,
        ];

        let wed = NaiveDate::from_ymd_opt(2024, 1, 3).unwrap();
        let days = build_week_agenda(&tasks, wed, &PlannerConfig::default());

        assert_eq!(days.len(), 7);
        assert_eq!(days[0].date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(days[6].date, NaiveDate::from_ymd_opt(2024, 1, 7).unwrap());

        let ids: Vec<&str> = days[0].entries.iter().map(|e| e.task_id.as_str()).collect();
        assert_eq!(ids, vec!["early", "done", "late"]);
        assert_eq!(days[0].busy_minutes(), 90);

        assert_eq!(days[1].all_day, vec!["d".to_string()]);
        assert!(days.iter().all(|d| d.entries.iter().all(|e| e.task_id != "next-week")));
    }
}
