use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// The five canonical daily prayers, declared in chronological order.
/// Sunrise appears in timetables for display but is not part of this set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrayerName {
    Fajr,
    Dhuhr,
    Asr,
    Maghrib,
    Isha,
}

impl PrayerName {
    pub fn all() -> [PrayerName; 5] {
        [
            PrayerName::Fajr,
            PrayerName::Dhuhr,
            PrayerName::Asr,
            PrayerName::Maghrib,
            PrayerName::Isha,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PrayerName::Fajr => "fajr",
            PrayerName::Dhuhr => "dhuhr",
            PrayerName::Asr => "asr",
            PrayerName::Maghrib => "maghrib",
            PrayerName::Isha => "isha",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            PrayerName::Fajr => "Fajr",
            PrayerName::Dhuhr => "Dhuhr",
            PrayerName::Asr => "Asr",
            PrayerName::Maghrib => "Maghrib",
            PrayerName::Isha => "Isha",
        }
    }
}

impl std::fmt::Display for PrayerName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for PrayerName {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fajr" => Ok(PrayerName::Fajr),
            "dhuhr" | "zuhr" | "dhuhur" => Ok(PrayerName::Dhuhr),
            "asr" => Ok(PrayerName::Asr),
            "maghrib" => Ok(PrayerName::Maghrib),
            "isha" => Ok(PrayerName::Isha),
            _ => Err(anyhow::anyhow!("Unknown prayer name: {}", s)),
        }
    }
}

/// One prayer's completion state within a day. `time` is a display
/// annotation copied from the timetable; toggles never touch it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrayerRecord {
    pub name: PrayerName,
    pub completed: bool,
    pub time: Option<NaiveTime>,
}

impl PrayerRecord {
    pub fn new(name: PrayerName) -> Self {
        Self {
            name,
            completed: false,
            time: None,
        }
    }
}

/// The completion record for one calendar date. Invariant: `prayers`
/// holds exactly the five canonical names, in canonical order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyLog {
    pub date: String,
    pub prayers: Vec<PrayerRecord>,
}

impl DailyLog {
    /// A fresh all-incomplete day.
    pub fn new(date: &str) -> Self {
        Self {
            date: date.to_string(),
            prayers: PrayerName::all().into_iter().map(PrayerRecord::new).collect(),
        }
    }

    pub fn record(&self, name: PrayerName) -> Option<&PrayerRecord> {
        self.prayers.iter().find(|r| r.name == name)
    }

    pub fn record_mut(&mut self, name: PrayerName) -> Option<&mut PrayerRecord> {
        self.prayers.iter_mut().find(|r| r.name == name)
    }

    pub fn completed_count(&self) -> u32 {
        self.prayers.iter().filter(|r| r.completed).count() as u32
    }

    /// Restore the canonical-five invariant on a day loaded from storage.
    /// Completion flags of recognizable records survive; duplicates and
    /// extras are dropped, missing prayers come back incomplete.
    pub fn repair(&mut self) {
        let old = std::mem::take(&mut self.prayers);
        self.prayers = PrayerName::all()
            .into_iter()
            .map(|name| {
                old.iter()
                    .find(|r| r.name == name)
                    .cloned()
                    .unwrap_or_else(|| PrayerRecord::new(name))
            })
            .collect();
    }

    pub fn is_canonical(&self) -> bool {
        self.prayers.len() == 5
            && self
                .prayers
                .iter()
                .zip(PrayerName::all())
                .all(|(r, name)| r.name == name)
    }
}

/// Emitted to the notification sink after a successful toggle.
#[derive(Debug, Clone, PartialEq)]
pub struct ToggleEvent {
    pub date: String,
    pub prayer: PrayerName,
    pub completed: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_day_holds_all_five_incomplete() {
        let day = DailyLog::new("2026-08-07");
        assert!(day.is_canonical());
        assert_eq!(day.completed_count(), 0);
        assert_eq!(day.prayers[0].name, PrayerName::Fajr);
        assert_eq!(day.prayers[4].name, PrayerName::Isha);
    }

    #[test]
    fn repair_fills_missing_and_drops_duplicates() {
        let mut day = DailyLog::new("2026-08-07");
        day.record_mut(PrayerName::Asr).unwrap().completed = true;
        // Simulate a corrupt blob: drop Fajr, duplicate Isha.
        day.prayers.remove(0);
        let isha = day.record(PrayerName::Isha).cloned().unwrap();
        day.prayers.push(isha);
        assert!(!day.is_canonical());

        day.repair();
        assert!(day.is_canonical());
        assert!(day.record(PrayerName::Asr).unwrap().completed);
        assert!(!day.record(PrayerName::Fajr).unwrap().completed);
    }

    #[test]
    fn prayer_name_parses_common_spellings() {
        assert_eq!(PrayerName::from_str("Fajr").unwrap(), PrayerName::Fajr);
        assert_eq!(PrayerName::from_str("zuhr").unwrap(), PrayerName::Dhuhr);
        assert_eq!(PrayerName::from_str("DHUHR").unwrap(), PrayerName::Dhuhr);
        assert!(PrayerName::from_str("sunrise").is_err());
    }
}
