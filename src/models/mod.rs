pub mod dhikr;
pub mod prayer;
pub mod stats;

pub use dhikr::{DhikrPreset, DHIKR_PRESETS};
pub use prayer::{DailyLog, PrayerName, PrayerRecord, ToggleEvent};
pub use stats::{DayStats, RangeStats};
