use std::collections::BTreeMap;
use std::ops::Bound;

use chrono::NaiveDate;
use thiserror::Error;

use crate::db::{Storage, StorageError};
use crate::models::{DailyLog, DayStats, PrayerName, RangeStats, ToggleEvent};
use crate::schedule::Timetable;

/// Fixed key under which the whole ledger blob lives in storage.
pub const LEDGER_KEY: &str = "prayer-storage";

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("no log exists for {0}")]
    UnknownDate(String),
    #[error("{date} has no record for {prayer}")]
    UnknownPrayer { date: String, prayer: PrayerName },
    #[error("ledger persistence failed: {0}")]
    Persistence(#[from] StorageError),
    #[error("ledger serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl LedgerError {
    /// Durability failures. The in-memory ledger stays authoritative and
    /// the next mutation rewrites the full blob, so callers downgrade
    /// these to a logged warning instead of blocking the user.
    pub fn is_persistence(&self) -> bool {
        matches!(self, Self::Persistence(_) | Self::Serialization(_))
    }
}

/// Receives toggle events for user-facing display. Presentation
/// (language, wording) is the sink's concern, not the ledger's.
pub trait NotificationSink {
    fn prayer_toggled(&self, event: &ToggleEvent);
}

/// Date-keyed completion log for the five canonical prayers. Single
/// owner of its backing map: every mutation goes through these
/// operations and is followed by a synchronous full-blob write to the
/// given `Storage`.
#[derive(Default)]
pub struct Ledger {
    days: BTreeMap<String, DailyLog>,
    sink: Option<Box<dyn NotificationSink>>,
}

impl std::fmt::Debug for Ledger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ledger")
            .field("days", &self.days)
            .field("sink", &self.sink.as_ref().map(|_| "<sink>"))
            .finish()
    }
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the persisted blob, or start empty when none exists.
    /// Days that lost the canonical-five invariant are repaired in place.
    pub fn load(store: &dyn Storage) -> Result<Self, LedgerError> {
        let Some(blob) = store.get(LEDGER_KEY)? else {
            return Ok(Self::new());
        };
        let mut days: BTreeMap<String, DailyLog> = serde_json::from_str(&blob)?;
        for (date, day) in days.iter_mut() {
            if !day.is_canonical() {
                log::warn!("repairing non-canonical day {} in stored ledger", date);
                day.repair();
            }
        }
        Ok(Self { days, sink: None })
    }

    pub fn set_sink(&mut self, sink: Box<dyn NotificationSink>) {
        self.sink = Some(sink);
    }

    pub fn day(&self, date: &str) -> Option<&DailyLog> {
        self.days.get(date)
    }

    /// Lazily create `date` with all five prayers incomplete. Calling
    /// again is a no-op. The fresh day is reconstructible, so its
    /// durability rides on the next toggle's blob write.
    pub fn ensure_day(&mut self, date: &str) -> &DailyLog {
        self.days
            .entry(date.to_string())
            .or_insert_with(|| DailyLog::new(date))
    }

    /// Copy timetable start times onto `date`'s records for display.
    pub fn annotate_times(&mut self, date: &str, timetable: &Timetable) {
        let day = self
            .days
            .entry(date.to_string())
            .or_insert_with(|| DailyLog::new(date));
        for (name, time) in timetable.in_order() {
            if let Some(record) = day.record_mut(name) {
                record.time = Some(time);
            }
        }
    }

    /// Set one prayer's completion flag and persist the whole ledger.
    ///
    /// The day must already exist (`ensure_day` first). On a
    /// persistence failure the mutation is retained in memory and the
    /// error is returned; the notification sink has already seen the
    /// event by then, since the toggle itself did happen.
    pub fn toggle(
        &mut self,
        store: &dyn Storage,
        date: &str,
        prayer: PrayerName,
        completed: bool,
    ) -> Result<ToggleEvent, LedgerError> {
        let day = self
            .days
            .get_mut(date)
            .ok_or_else(|| LedgerError::UnknownDate(date.to_string()))?;
        let record = day
            .record_mut(prayer)
            .ok_or_else(|| LedgerError::UnknownPrayer {
                date: date.to_string(),
                prayer,
            })?;
        record.completed = completed;

        let event = ToggleEvent {
            date: date.to_string(),
            prayer,
            completed,
        };
        if let Some(sink) = &self.sink {
            sink.prayer_toggled(&event);
        }

        self.persist(store)?;
        Ok(event)
    }

    /// Serialize every day under the fixed key. Also the retry path:
    /// a later call rewrites everything an earlier failed call dropped.
    pub fn persist(&self, store: &dyn Storage) -> Result<(), LedgerError> {
        let blob = serde_json::to_string(&self.days)?;
        store.set(LEDGER_KEY, &blob)?;
        Ok(())
    }

    /// Completion summary for one date. A never-observed date reads as
    /// zero of the five canonical prayers.
    pub fn daily_stats(&self, date: &str) -> DayStats {
        match self.days.get(date) {
            Some(day) => DayStats {
                completed: day.completed_count(),
                total: day.prayers.len() as u32,
            },
            None => DayStats {
                completed: 0,
                total: 5,
            },
        }
    }

    /// Aggregate over the inclusive `start..=end` key range. Only
    /// observed days contribute to `completed`/`total`; `span_days`
    /// lets callers derive full capacity for goal displays.
    pub fn range_stats(&self, start: &str, end: &str) -> RangeStats {
        let mut completed = 0;
        let mut total = 0;
        let mut observed_days = 0;
        for (_, day) in self
            .days
            .range::<str, _>((Bound::Included(start), Bound::Included(end)))
        {
            completed += day.completed_count();
            total += day.prayers.len() as u32;
            observed_days += 1;
        }

        let span_days = match (
            NaiveDate::parse_from_str(start, "%Y-%m-%d"),
            NaiveDate::parse_from_str(end, "%Y-%m-%d"),
        ) {
            (Ok(s), Ok(e)) if e >= s => (e - s).num_days() as u32 + 1,
            _ => observed_days,
        };

        RangeStats {
            completed,
            total,
            observed_days,
            span_days,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::rc::Rc;

    use crate::db::migrations::run_migrations;
    use crate::db::SqliteStore;
    use rusqlite::Connection;

    #[derive(Default)]
    struct MemoryStore {
        map: RefCell<HashMap<String, String>>,
    }

    impl Storage for MemoryStore {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            Ok(self.map.borrow().get(key).cloned())
        }
        fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
            self.map.borrow_mut().insert(key.into(), value.into());
            Ok(())
        }
    }

    /// Reads work, writes always fail: the storage-quota scenario.
    struct FailingStore;

    impl Storage for FailingStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Ok(None)
        }
        fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Backend("write refused".into()))
        }
    }

    struct RecordingSink {
        events: Rc<RefCell<Vec<ToggleEvent>>>,
    }

    impl NotificationSink for RecordingSink {
        fn prayer_toggled(&self, event: &ToggleEvent) {
            self.events.borrow_mut().push(event.clone());
        }
    }

    const DAY: &str = "2026-08-07";

    #[test]
    fn ensure_day_is_idempotent() {
        let mut ledger = Ledger::new();
        let first = ledger.ensure_day(DAY).clone();
        let second = ledger.ensure_day(DAY).clone();
        assert_eq!(first, second);
        assert_eq!(first.completed_count(), 0);
    }

    #[test]
    fn toggle_before_ensure_day_is_an_unknown_date() {
        let store = MemoryStore::default();
        let mut ledger = Ledger::new();
        let err = ledger
            .toggle(&store, DAY, PrayerName::Fajr, true)
            .unwrap_err();
        assert!(matches!(err, LedgerError::UnknownDate(_)));
    }

    #[test]
    fn toggle_round_trip_restores_the_day() {
        let store = MemoryStore::default();
        let mut ledger = Ledger::new();
        let original = ledger.ensure_day(DAY).clone();

        ledger.toggle(&store, DAY, PrayerName::Maghrib, true).unwrap();
        assert_ne!(ledger.day(DAY).unwrap(), &original);

        ledger.toggle(&store, DAY, PrayerName::Maghrib, false).unwrap();
        assert_eq!(ledger.day(DAY).unwrap(), &original);
    }

    #[test]
    fn toggle_touches_exactly_one_record() {
        let store = MemoryStore::default();
        let mut ledger = Ledger::new();
        ledger.ensure_day(DAY);
        ledger.toggle(&store, DAY, PrayerName::Dhuhr, true).unwrap();

        let day = ledger.day(DAY).unwrap();
        for record in &day.prayers {
            assert_eq!(record.completed, record.name == PrayerName::Dhuhr);
        }
    }

    #[test]
    fn daily_stats_counts_k_of_five() {
        let store = MemoryStore::default();
        let mut ledger = Ledger::new();
        ledger.ensure_day(DAY);
        ledger.toggle(&store, DAY, PrayerName::Fajr, true).unwrap();
        ledger.toggle(&store, DAY, PrayerName::Dhuhr, true).unwrap();

        let stats = ledger.daily_stats(DAY);
        assert_eq!(stats.completed, 2);
        assert_eq!(stats.total, 5);
        assert_eq!(stats.percentage(), 40);
    }

    #[test]
    fn range_stats_skips_unobserved_days_but_reports_span() {
        let store = MemoryStore::default();
        let mut ledger = Ledger::new();
        ledger.ensure_day("2026-08-01");
        ledger.ensure_day("2026-08-03");
        ledger
            .toggle(&store, "2026-08-01", PrayerName::Fajr, true)
            .unwrap();
        ledger
            .toggle(&store, "2026-08-03", PrayerName::Isha, true)
            .unwrap();
        // Outside the queried range.
        ledger.ensure_day("2026-08-09");

        let stats = ledger.range_stats("2026-08-01", "2026-08-07");
        assert_eq!(stats.completed, 2);
        assert_eq!(stats.total, 10);
        assert_eq!(stats.observed_days, 2);
        assert_eq!(stats.span_days, 7);
        assert_eq!(stats.capacity(), 35);
    }

    #[test]
    fn toggles_survive_a_store_round_trip() {
        let store = MemoryStore::default();
        let mut ledger = Ledger::new();
        ledger.ensure_day(DAY);
        ledger.toggle(&store, DAY, PrayerName::Asr, true).unwrap();

        let reloaded = Ledger::load(&store).unwrap();
        assert!(reloaded.day(DAY).unwrap().record(PrayerName::Asr).unwrap().completed);
        assert_eq!(reloaded.daily_stats(DAY).completed, 1);
    }

    #[test]
    fn load_repairs_a_mangled_blob_day() {
        let store = MemoryStore::default();
        // Fajr missing, completed Isha present.
        let blob = format!(
            "{{\"{DAY}\":{{\"date\":\"{DAY}\",\"prayers\":[\
             {{\"name\":\"isha\",\"completed\":true,\"time\":null}}]}}}}"
        );
        store.set(LEDGER_KEY, &blob).unwrap();

        let ledger = Ledger::load(&store).unwrap();
        let day = ledger.day(DAY).unwrap();
        assert!(day.is_canonical());
        assert!(day.record(PrayerName::Isha).unwrap().completed);
        assert!(!day.record(PrayerName::Fajr).unwrap().completed);
    }

    #[test]
    fn unparseable_blob_is_a_serialization_error() {
        let store = MemoryStore::default();
        store.set(LEDGER_KEY, "not json").unwrap();
        assert!(matches!(
            Ledger::load(&store).unwrap_err(),
            LedgerError::Serialization(_)
        ));
    }

    #[test]
    fn failed_persistence_keeps_memory_and_retries_on_next_toggle() {
        let mut ledger = Ledger::new();
        ledger.ensure_day(DAY);

        let err = ledger
            .toggle(&FailingStore, DAY, PrayerName::Fajr, true)
            .unwrap_err();
        assert!(err.is_persistence());
        // The in-memory view kept the toggle.
        assert!(ledger.day(DAY).unwrap().record(PrayerName::Fajr).unwrap().completed);

        // Next mutation against a healthy store writes the full state,
        // including the toggle whose write previously failed.
        let store = MemoryStore::default();
        ledger.toggle(&store, DAY, PrayerName::Dhuhr, true).unwrap();
        let reloaded = Ledger::load(&store).unwrap();
        assert!(reloaded.day(DAY).unwrap().record(PrayerName::Fajr).unwrap().completed);
        assert!(reloaded.day(DAY).unwrap().record(PrayerName::Dhuhr).unwrap().completed);
    }

    #[test]
    fn sink_sees_every_toggle_in_order() {
        let events = Rc::new(RefCell::new(Vec::new()));
        let store = MemoryStore::default();
        let mut ledger = Ledger::new();
        ledger.set_sink(Box::new(RecordingSink {
            events: events.clone(),
        }));

        ledger.ensure_day(DAY);
        ledger.toggle(&store, DAY, PrayerName::Fajr, true).unwrap();
        ledger.toggle(&store, DAY, PrayerName::Fajr, false).unwrap();

        let seen = events.borrow();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0].prayer, PrayerName::Fajr);
        assert!(seen[0].completed);
        assert!(!seen[1].completed);
    }

    #[test]
    fn ledger_persists_through_sqlite() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        let store = SqliteStore::new(&conn);

        let mut ledger = Ledger::new();
        ledger.ensure_day(DAY);
        ledger.toggle(&store, DAY, PrayerName::Maghrib, true).unwrap();

        let reloaded = Ledger::load(&store).unwrap();
        assert!(
            reloaded
                .day(DAY)
                .unwrap()
                .record(PrayerName::Maghrib)
                .unwrap()
                .completed
        );
    }
}
