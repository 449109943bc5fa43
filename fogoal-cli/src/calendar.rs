use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use fogoal_core::AgendaDay;
use tracing::warn;

pub struct CalendarEvent {
    pub uid: String,
    pub start_utc: DateTime<Utc>,
    pub end_utc: DateTime<Utc>,
    pub summary: String,
    pub description: String,
}

fn local_to_utc(at: NaiveDateTime, tz: Tz) -> Option<DateTime<Utc>> {
    tz.from_local_datetime(&at)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Turn the timed agenda entries into events. Completed tasks are skipped.
pub fn agenda_to_events(days: &[AgendaDay], tz: Tz) -> Vec<CalendarEvent> {
    let mut events = Vec::new();

    for day in days {
        for e in day.entries.iter().filter(|e| !e.completed) {
            let (Some(start_utc), Some(end_utc)) =
                (local_to_utc(e.start, tz), local_to_utc(e.end, tz))
            else {
                // Wall-clock time skipped by a DST jump.
                warn!(
                    task_id = %e.task_id,
                    start = %e.start,
                    "local time does not exist in {tz}; skipped"
                );
                continue;
            };

            events.push(CalendarEvent {
                uid: format!("fogoal-{}@fogoal", e.task_id),
                start_utc,
                end_utc,
                summary: e.title.clone(),
                description: format!(
                    "TaskId: {}\nPlanned: {} {}\n",
                    e.task_id,
                    day.date,
                    e.start.format("%H:%M")
                ),
            });
        }
    }

    events
}

/// Emit a minimal ICS calendar containing VEVENT blocks.
///
/// DTSTART/DTEND are UTC. UIDs derive from task ids, so re-imports update
/// events in place.
pub fn events_to_ics(events: &[CalendarEvent]) -> String {
    let mut s = String::new();
    s.push_str("BEGIN:VCALENDAR\nVERSION:2.0\nPRODID:-//FoGoal//Planner//EN\n");

    for e in events {
        let dtstart = e.start_utc.format("%Y%m%dT%H%M%SZ");
        let dtend = e.end_utc.format("%Y%m%dT%H%M%SZ");

        s.push_str("BEGIN:VEVENT\n");
        s.push_str(&format!("UID:{}\n", escape_ics(&e.uid)));
        s.push_str(&format!("DTSTART:{}\n", dtstart));
        s.push_str(&format!("DTEND:{}\n", dtend));
        s.push_str(&format!("SUMMARY:{}\n", escape_ics(&e.summary)));
        s.push_str(&format!("DESCRIPTION:{}\n", escape_ics(&e.description)));
        s.push_str("END:VEVENT\n");
    }

    s.push_str("END:VCALENDAR\n");
    s
}

fn escape_ics(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('\n', "\\n")
        .replace(',', "\\,")
        .replace(';', "\\;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use fogoal_core::{build_week_agenda, PlannerConfig, Task};

    fn week(tasks: &[Task]) -> Vec<AgendaDay> {
        let wed = NaiveDate::from_ymd_opt(2024, 1, 3).unwrap();
        build_week_agenda(tasks, wed, &PlannerConfig::default())
    }

    #[test]
    fn converts_local_wall_clock_to_utc() {
        let tasks = vec![
            Task::new("t1", "Yoga, mat")
                .pinned_at("2024-01-01", "08:00")
                .with_duration(45),
        ];
        let events = agenda_to_events(&week(&tasks), chrono_tz::America::Chicago);

        assert_eq!(events.len(), 1);
        // January is CST (UTC-6).
        assert_eq!(events[0].start_utc.to_rfc3339(), "2024-01-01T14:00:00+00:00");
        assert_eq!(events[0].end_utc.to_rfc3339(), "2024-01-01T14:45:00+00:00");

        let ics = events_to_ics(&events);
        assert!(ics.starts_with("BEGIN:VCALENDAR\n"));
        assert!(ics.contains("UID:fogoal-t1@fogoal\n"));
        assert!(ics.contains("DTSTART:20240101T140000Z\n"));
        assert!(ics.contains("SUMMARY:Yoga\\, mat\n"));
        assert!(ics.ends_with("END:VCALENDAR\n"));
    }

    #[test]
    fn completed_tasks_are_not_exported() {
        let tasks = vec![Task::new("t1", "Done").pinned_at("2024-01-02", "10:00").completed()];
        assert!(agenda_to_events(&week(&tasks), chrono_tz::UTC).is_empty());
    }

    #[test]
    fn escapes_special_characters() {
        assert_eq!(escape_ics("a;b\\c\nd"), "a\\;b\\\\c\\nd");
    }
}
