//! fogoal-core: task model and the Smart Planner auto-placement heuristic.

pub mod adapter;
pub mod agenda;
pub mod config;
pub mod planner;
pub mod slot;
pub mod task;
pub mod time;

pub use adapter::{assign_start, task_interval, task_start};
pub use agenda::{build_week_agenda, AgendaDay, AgendaEntry};
pub use config::{HourRange, PlannerConfig};
pub use planner::{auto_schedule, PlanOutcome, Placement, Planner};
pub use slot::{Slot, SlotFinder, SlotPass};
pub use task::{Blank, Blanks, PreferredTime, Priority, Task, TaskState};
pub use time::{
    add_days, add_minutes, format_date_only, format_time_only, intervals_overlap,
    parse_date_only, parse_time_only, start_of_week, weekday_from_index, Interval,
};
