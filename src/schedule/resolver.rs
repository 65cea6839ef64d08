use chrono::{NaiveTime, Timelike};
use thiserror::Error;

use crate::models::PrayerName;

pub const MINUTES_PER_DAY: u32 = 24 * 60;

#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("invalid timetable: {0}")]
    InvalidTimetable(String),
}

/// One day's prayer start times for a fixed location. A constructed
/// value is always complete; malformed raw input is rejected at the
/// boundary with `InvalidTimetable`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timetable {
    pub fajr: NaiveTime,
    pub sunrise: NaiveTime,
    pub dhuhr: NaiveTime,
    pub asr: NaiveTime,
    pub maghrib: NaiveTime,
    pub isha: NaiveTime,
}

impl Timetable {
    /// Build from raw "HH:MM" strings, e.g. a cache row or an external
    /// timings payload.
    pub fn from_strings(
        fajr: &str,
        sunrise: &str,
        dhuhr: &str,
        asr: &str,
        maghrib: &str,
        isha: &str,
    ) -> Result<Self, ScheduleError> {
        let parse = |label: &str, s: &str| {
            NaiveTime::parse_from_str(s, "%H:%M").map_err(|e| {
                ScheduleError::InvalidTimetable(format!("{} time '{}': {}", label, s, e))
            })
        };
        Ok(Self {
            fajr: parse("fajr", fajr)?,
            sunrise: parse("sunrise", sunrise)?,
            dhuhr: parse("dhuhr", dhuhr)?,
            asr: parse("asr", asr)?,
            maghrib: parse("maghrib", maghrib)?,
            isha: parse("isha", isha)?,
        })
    }

    pub fn time_of(&self, prayer: PrayerName) -> NaiveTime {
        match prayer {
            PrayerName::Fajr => self.fajr,
            PrayerName::Dhuhr => self.dhuhr,
            PrayerName::Asr => self.asr,
            PrayerName::Maghrib => self.maghrib,
            PrayerName::Isha => self.isha,
        }
    }

    /// The five canonical prayers with their start times, in canonical
    /// order. Sunrise is deliberately absent.
    pub fn in_order(&self) -> [(PrayerName, NaiveTime); 5] {
        PrayerName::all().map(|p| (p, self.time_of(p)))
    }
}

/// What the schedule looks like at one instant. Recomputed on demand,
/// never mutated in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleState {
    pub current: PrayerName,
    pub next: PrayerName,
    pub minutes_remaining: u32,
}

fn minute_of_day(t: NaiveTime) -> u32 {
    t.hour() * 60 + t.minute()
}

/// Derive the current prayer, the next prayer, and the minutes until it.
///
/// Comparison happens at minute resolution on the same calendar day.
/// The current prayer is the last canonical prayer whose start is at or
/// before `now`; before Fajr that is yesterday's Isha, still in effect.
/// The next prayer is the first whose start is strictly after `now`;
/// after Isha it wraps to tomorrow's Fajr across midnight. Equal start
/// times resolve by canonical order for both selections.
///
/// Pure: the caller supplies `now` and owns the refresh cadence
/// (once per minute, plus whenever a new timetable arrives).
pub fn resolve_schedule(timetable: &Timetable, now: NaiveTime) -> ScheduleState {
    let now_min = minute_of_day(now);

    let mut current = PrayerName::Isha;
    for (prayer, time) in timetable.in_order() {
        if minute_of_day(time) <= now_min {
            current = prayer;
        }
    }

    for (prayer, time) in timetable.in_order() {
        let start = minute_of_day(time);
        if start > now_min {
            return ScheduleState {
                current,
                next: prayer,
                minutes_remaining: start - now_min,
            };
        }
    }

    // Every prayer has started: next is Fajr tomorrow, counted across
    // the midnight boundary.
    ScheduleState {
        current,
        next: PrayerName::Fajr,
        minutes_remaining: (MINUTES_PER_DAY - now_min) + minute_of_day(timetable.fajr),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn timetable() -> Timetable {
        Timetable::from_strings("04:30", "05:55", "12:15", "15:45", "18:20", "19:50").unwrap()
    }

    fn at(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn midday_sits_between_dhuhr_and_asr() {
        let state = resolve_schedule(&timetable(), at(13, 0));
        assert_eq!(state.current, PrayerName::Dhuhr);
        assert_eq!(state.next, PrayerName::Asr);
        assert_eq!(state.minutes_remaining, 165);
    }

    #[test]
    fn after_isha_wraps_to_tomorrows_fajr() {
        let state = resolve_schedule(&timetable(), at(20, 30));
        assert_eq!(state.current, PrayerName::Isha);
        assert_eq!(state.next, PrayerName::Fajr);
        // (1440 - 1230) + 270
        assert_eq!(state.minutes_remaining, 480);
    }

    #[test]
    fn before_fajr_yesterdays_isha_is_still_in_effect() {
        let state = resolve_schedule(&timetable(), at(3, 0));
        assert_eq!(state.current, PrayerName::Isha);
        assert_eq!(state.next, PrayerName::Fajr);
        assert_eq!(state.minutes_remaining, 90);
    }

    #[test]
    fn between_fajr_and_dhuhr() {
        let state = resolve_schedule(&timetable(), at(7, 10));
        assert_eq!(state.current, PrayerName::Fajr);
        assert_eq!(state.next, PrayerName::Dhuhr);
        assert_eq!(state.minutes_remaining, 305);
    }

    #[test]
    fn a_prayers_own_start_minute_makes_it_current() {
        let state = resolve_schedule(&timetable(), at(12, 15));
        assert_eq!(state.current, PrayerName::Dhuhr);
        assert_eq!(state.next, PrayerName::Asr);
        assert_eq!(state.minutes_remaining, 210);
    }

    #[test]
    fn seconds_are_ignored() {
        let now = NaiveTime::from_hms_opt(12, 14, 59).unwrap();
        let state = resolve_schedule(&timetable(), now);
        assert_eq!(state.current, PrayerName::Fajr);
        assert_eq!(state.next, PrayerName::Dhuhr);
        assert_eq!(state.minutes_remaining, 1);
    }

    #[test]
    fn equal_start_times_resolve_by_canonical_order() {
        let tt = Timetable::from_strings("04:30", "05:55", "13:00", "13:00", "18:20", "19:50")
            .unwrap();
        // Both Dhuhr and Asr started at 13:00; the later canonical one
        // is current. Next skips past both to Maghrib.
        let state = resolve_schedule(&tt, at(13, 5));
        assert_eq!(state.current, PrayerName::Asr);
        assert_eq!(state.next, PrayerName::Maghrib);

        // Just before the shared minute, the earlier canonical one is
        // next.
        let state = resolve_schedule(&tt, at(12, 59));
        assert_eq!(state.next, PrayerName::Dhuhr);
        assert_eq!(state.minutes_remaining, 1);
    }

    #[test]
    fn malformed_raw_times_are_rejected() {
        let err = Timetable::from_strings("4:3x", "05:55", "12:15", "15:45", "18:20", "19:50")
            .unwrap_err();
        assert!(matches!(err, ScheduleError::InvalidTimetable(_)));

        let err = Timetable::from_strings("04:30", "05:55", "25:00", "15:45", "18:20", "19:50")
            .unwrap_err();
        assert!(err.to_string().contains("dhuhr"));
    }

    #[test]
    fn identical_inputs_yield_identical_output() {
        let a = resolve_schedule(&timetable(), at(16, 40));
        let b = resolve_schedule(&timetable(), at(16, 40));
        assert_eq!(a, b);
    }
}
