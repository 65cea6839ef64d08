pub mod resolver;
pub mod timings;

pub use resolver::{resolve_schedule, ScheduleError, ScheduleState, Timetable};
pub use timings::TimingSource;
