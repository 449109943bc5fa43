//! Task model as persisted by the FoGoal front end.
//!
//! The stored shape keeps `date` and `scheduledTime` as two independent
//! strings (separate date and time pickers). The planner combines them via
//! `crate::adapter`.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Priority {
    #[serde(alias = "high")]
    High,
    #[default]
    #[serde(alias = "medium")]
    Medium,
    #[serde(alias = "low")]
    Low,
}

impl Priority {
    /// Sort weight; larger is placed first.
    pub fn weight(self) -> u8 {
        match self {
            Priority::High => 3,
            Priority::Medium => 2,
            Priority::Low => 1,
        }
    }
}

/// Coarse part-of-day hint. Soft: the planner falls back to any open hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PreferredTime {
    #[serde(alias = "morning")]
    Morning,
    #[serde(alias = "afternoon")]
    Afternoon,
    #[serde(alias = "evening")]
    Evening,
}

impl PreferredTime {
    pub fn as_str(self) -> &'static str {
        match self {
            PreferredTime::Morning => "Morning",
            PreferredTime::Afternoon => "Afternoon",
            PreferredTime::Evening => "Evening",
        }
    }
}

/// Where a task sits relative to the planner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    /// Excluded from planning: neither moved nor an obstacle.
    Completed,
    /// Has both a date and a clock time; immovable obstacle.
    Pinned,
    /// Missing a date or a time; candidate for placement.
    Backlog,
}

/// How an unset optional field was spelled in the stored JSON.
///
/// Written back as read, so a planning pass that leaves a task alone does
/// not rewrite `""` or `null` into a missing key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Blank {
    #[default]
    Missing,
    Null,
    /// Empty or whitespace-only string, kept verbatim.
    Text(String),
}

impl Blank {
    fn to_value(&self) -> Option<Value> {
        match self {
            Blank::Missing => None,
            Blank::Null => Some(Value::Null),
            Blank::Text(s) => Some(Value::String(s.clone())),
        }
    }
}

/// Stored spelling of the optional fields that are currently `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Blanks {
    pub preferred_time: Blank,
    pub date: Blank,
    pub scheduled_time: Blank,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "StoredTask", into = "StoredTask")]
pub struct Task {
    pub id: String,
    pub title: String,

    /// Minutes.
    pub duration_minutes: i32,

    pub priority: Priority,

    pub preferred_time: Option<PreferredTime>,

    /// ISO calendar date, "YYYY-MM-DD".
    pub date: Option<String>,

    /// 24h clock, "HH:mm".
    pub scheduled_time: Option<String>,

    pub completed: bool,

    /// Fields owned by other parts of the app (notes, category, ...). Carried
    /// through untouched.
    pub extra: Map<String, Value>,

    /// Only consulted for fields that are `None`.
    pub blanks: Blanks,
}

/// Wire form of [`Task`]. Optional fields stay raw JSON so that `null`, `""`
/// and a missing key can be told apart.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredTask {
    id: String,
    #[serde(default)]
    title: String,
    duration_minutes: i32,
    #[serde(default)]
    priority: Priority,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    preferred_time: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    date: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    scheduled_time: Option<Value>,
    #[serde(default)]
    completed: bool,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

/// A present key, `null` included, becomes `Some`.
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// `null`, missing and blank strings all mean "absent"; the spelling is kept.
fn split<T: DeserializeOwned>(raw: Option<Value>) -> Result<(Option<T>, Blank), serde_json::Error> {
    match raw {
        None => Ok((None, Blank::Missing)),
        Some(Value::Null) => Ok((None, Blank::Null)),
        Some(Value::String(s)) if s.trim().is_empty() => Ok((None, Blank::Text(s))),
        Some(v) => Ok((Some(serde_json::from_value(v)?), Blank::Missing)),
    }
}

impl TryFrom<StoredTask> for Task {
    type Error = serde_json::Error;

    fn try_from(raw: StoredTask) -> Result<Self, Self::Error> {
        let (preferred_time, preferred_blank) = split(raw.preferred_time)?;
        let (date, date_blank) = split(raw.date)?;
        let (scheduled_time, time_blank) = split(raw.scheduled_time)?;

        Ok(Task {
            id: raw.id,
            title: raw.title,
            duration_minutes: raw.duration_minutes,
            priority: raw.priority,
            preferred_time,
            date,
            scheduled_time,
            completed: raw.completed,
            extra: raw.extra,
            blanks: Blanks {
                preferred_time: preferred_blank,
                date: date_blank,
                scheduled_time: time_blank,
            },
        })
    }
}

impl From<Task> for StoredTask {
    fn from(t: Task) -> Self {
        StoredTask {
            id: t.id,
            title: t.title,
            duration_minutes: t.duration_minutes,
            priority: t.priority,
            preferred_time: match t.preferred_time {
                Some(p) => Some(Value::from(p.as_str())),
                None => t.blanks.preferred_time.to_value(),
            },
            date: match t.date {
                Some(d) => Some(Value::String(d)),
                None => t.blanks.date.to_value(),
            },
            scheduled_time: match t.scheduled_time {
                Some(s) => Some(Value::String(s)),
                None => t.blanks.scheduled_time.to_value(),
            },
            completed: t.completed,
            extra: t.extra,
        }
    }
}

impl Task {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            duration_minutes: 30,
            priority: Priority::Medium,
            preferred_time: None,
            date: None,
            scheduled_time: None,
            completed: false,
            extra: Map::new(),
            blanks: Blanks::default(),
        }
    }

    pub fn with_duration(mut self, minutes: i32) -> Self {
        self.duration_minutes = minutes;
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_preferred_time(mut self, preferred: PreferredTime) -> Self {
        self.preferred_time = Some(preferred);
        self
    }

    pub fn pinned_at(mut self, date: impl Into<String>, time: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self.scheduled_time = Some(time.into());
        self
    }

    pub fn completed(mut self) -> Self {
        self.completed = true;
        self
    }

    pub fn state(&self) -> TaskState {
        if self.completed {
            TaskState::Completed
        } else if self.date.is_some() && self.scheduled_time.is_some() {
            TaskState::Pinned
        } else {
            TaskState::Backlog
        }
    }

    pub fn is_backlog(&self) -> bool {
        self.state() == TaskState::Backlog
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_classification() {
        assert_eq!(Task::new("a", "x").state(), TaskState::Backlog);
        assert_eq!(
            Task::new("b", "x").pinned_at("2024-01-03", "09:00").state(),
            TaskState::Pinned
        );
        assert_eq!(
            Task::new("c", "x").pinned_at("2024-01-03", "09:00").completed().state(),
            TaskState::Completed
        );

        let mut date_only = Task::new("d", "x");
        date_only.date = Some("2024-01-03".into());
        assert_eq!(date_only.state(), TaskState::Backlog);
    }

    #[test]
    fn priority_weights_order() {
        assert!(Priority::High.weight() > Priority::Medium.weight());
        assert!(Priority::Medium.weight() > Priority::Low.weight());
    }

    #[test]
    fn deserializes_persisted_shape() {
        let json = r#"{
            "id": "t1",
            "title": "Leg day",
            "durationMinutes": 45,
            "priority": "high",
            "preferredTime": "Evening",
            "date": "",
            "scheduledTime": null,
            "ecosystem": "sport",
            "notes": ["warm up"]
        }"#;
        let t: Task = serde_json::from_str(json).unwrap();
        assert_eq!(t.duration_minutes, 45);
        assert_eq!(t.priority, Priority::High);
        assert_eq!(t.preferred_time, Some(PreferredTime::Evening));
        assert_eq!(t.date, None);
        assert_eq!(t.scheduled_time, None);
        assert!(!t.completed);
        assert_eq!(t.extra.get("ecosystem"), Some(&Value::from("sport")));
        assert!(t.is_backlog());
    }

    #[test]
    fn serializes_camel_case_and_keeps_extra_fields() {
        let json = r#"{"id":"t2","title":"Read","durationMinutes":30,
            "priority":"Low","category":"study"}"#;
        let mut t: Task = serde_json::from_str(json).unwrap();
        t.date = Some("2024-01-01".into());
        t.scheduled_time = Some("08:00".into());

        let v = serde_json::to_value(&t).unwrap();
        assert_eq!(v["durationMinutes"], 30);
        assert_eq!(v["scheduledTime"], "08:00");
        assert_eq!(v["category"], "study");
        assert!(v.get("preferredTime").is_none());
    }

    #[test]
    fn blank_fields_keep_their_stored_spelling() {
        let json = r#"{"id":"t3","title":"Nap","durationMinutes":20,"priority":"Medium",
            "preferredTime":"","date":"","scheduledTime":null}"#;
        let t: Task = serde_json::from_str(json).unwrap();
        assert_eq!(t.date, None);
        assert_eq!(t.blanks.date, Blank::Text(String::new()));
        assert_eq!(t.blanks.scheduled_time, Blank::Null);

        let v = serde_json::to_value(&t).unwrap();
        assert_eq!(v["preferredTime"], "");
        assert_eq!(v["date"], "");
        assert_eq!(v["scheduledTime"], Value::Null);
        assert!(v.as_object().unwrap().contains_key("scheduledTime"));

        let missing = serde_json::to_value(Task::new("t4", "x")).unwrap();
        assert!(missing.get("date").is_none());
        assert!(missing.get("scheduledTime").is_none());
    }

    #[test]
    fn set_value_wins_over_blank_spelling() {
        let json = r#"{"id":"t5","durationMinutes":30,"date":"","scheduledTime":null}"#;
        let mut t: Task = serde_json::from_str(json).unwrap();
        t.date = Some("2024-01-01".into());
        t.scheduled_time = Some("08:00".into());
        t.preferred_time = Some(PreferredTime::Afternoon);

        let v = serde_json::to_value(&t).unwrap();
        assert_eq!(v["date"], "2024-01-01");
        assert_eq!(v["scheduledTime"], "08:00");
        assert_eq!(v["preferredTime"], "Afternoon");
    }

    #[test]
    fn rejects_malformed_preferred_time() {
        let json = r#"{"id":"t6","durationMinutes":30,"preferredTime":"Noon"}"#;
        assert!(serde_json::from_str::<Task>(json).is_err());
    }
}
