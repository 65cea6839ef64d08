use anyhow::{anyhow, Result};
use chrono::{Duration, FixedOffset, NaiveDate};
use rusqlite::Connection;
use salah::prelude::*;

use crate::db::cache;
use crate::schedule::resolver::Timetable;

/// Offline timing provider: computes a day's `Timetable` from the
/// configured coordinates, calculation method and madhab, with a
/// per-date SQLite cache in front.
pub struct TimingSource {
    pub latitude: f64,
    pub longitude: f64,
    method: String,
    madhab: String,
    tz_offset_minutes: i32,
}

impl TimingSource {
    pub fn new(
        latitude: f64,
        longitude: f64,
        method: &str,
        madhab: &str,
        tz_offset_minutes: i32,
    ) -> Result<Self> {
        // Reject bad configuration before any computation is attempted
        parse_method(method)?;
        parse_madhab(madhab)?;
        Ok(Self {
            latitude,
            longitude,
            method: method.to_string(),
            madhab: madhab.to_string(),
            tz_offset_minutes,
        })
    }

    fn compute(&self, date: NaiveDate) -> Result<Timetable> {
        let coords = Coordinates::new(self.latitude, self.longitude);
        let method = parse_method(&self.method)?;
        let madhab = parse_madhab(&self.madhab)?;
        let params = Configuration::with(method, madhab);

        let times = PrayerSchedule::new()
            .on(date)
            .for_location(coords)
            .with_configuration(params)
            .calculate()
            .map_err(|e| anyhow!("Prayer time calculation failed: {}", e))?;

        let offset = FixedOffset::east_opt(self.tz_offset_minutes * 60)
            .ok_or_else(|| anyhow!("Invalid timezone offset: {}", self.tz_offset_minutes))?;
        let local = |utc: chrono::DateTime<chrono::Utc>| utc.with_timezone(&offset).time();

        Ok(Timetable {
            fajr: local(times.time(Prayer::Fajr)),
            sunrise: local(times.time(Prayer::Sunrise)),
            dhuhr: local(times.time(Prayer::Dhuhr)),
            asr: local(times.time(Prayer::Asr)),
            maghrib: local(times.time(Prayer::Maghrib)),
            isha: local(times.time(Prayer::Isha)),
        })
    }

    /// Timetable for `date`, served from the cache when present.
    pub fn timetable(&self, conn: &Connection, date: NaiveDate) -> Result<Timetable> {
        let date_str = date.format("%Y-%m-%d").to_string();
        if let Some(cached) = cache::timetable_for_date(conn, &date_str)? {
            return Ok(cached);
        }

        let timetable = self.compute(date)?;
        cache::store_timetable(conn, &date_str, &timetable)?;
        log::debug!("cached timetable for {}", date_str);
        Ok(timetable)
    }

    /// Fill the cache for today through `days_ahead` days.
    pub fn prefetch(&self, conn: &Connection, today: NaiveDate, days_ahead: u32) -> Result<()> {
        for i in 0..=(days_ahead as i64) {
            let date = today + Duration::days(i);
            self.timetable(conn, date)?;
        }
        Ok(())
    }
}

fn parse_method(s: &str) -> Result<Method> {
    match s {
        "MuslimWorldLeague" => Ok(Method::MuslimWorldLeague),
        "Egyptian" => Ok(Method::Egyptian),
        "Karachi" => Ok(Method::Karachi),
        "UmmAlQura" => Ok(Method::UmmAlQura),
        "Dubai" => Ok(Method::Dubai),
        "MoonsightingCommittee" => Ok(Method::MoonsightingCommittee),
        "NorthAmerica" => Ok(Method::NorthAmerica),
        "Kuwait" => Ok(Method::Kuwait),
        "Qatar" => Ok(Method::Qatar),
        "Singapore" => Ok(Method::Singapore),
        "Tehran" => Ok(Method::Tehran),
        "Turkey" => Ok(Method::Turkey),
        "Other" => Ok(Method::Other),
        _ => Err(anyhow!("Unknown calculation method: '{}'", s)),
    }
}

fn parse_madhab(s: &str) -> Result<Madhab> {
    match s {
        "Hanafi" => Ok(Madhab::Hanafi),
        "Shafi" | "Shafi'i" => Ok(Madhab::Shafi),
        _ => Err(anyhow!("Unknown madhab: '{}'", s)),
    }
}

pub const CALC_METHODS: &[&str] = &[
    "MuslimWorldLeague",
    "Egyptian",
    "Karachi",
    "UmmAlQura",
    "Dubai",
    "MoonsightingCommittee",
    "NorthAmerica",
    "Kuwait",
    "Qatar",
    "Singapore",
    "Tehran",
    "Turkey",
    "Other",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bad_method_is_rejected_at_construction() {
        assert!(TimingSource::new(23.8, 90.4, "NotAMethod", "Hanafi", 360).is_err());
        assert!(TimingSource::new(23.8, 90.4, "Karachi", "Hanafi", 360).is_ok());
    }

    #[test]
    fn shafi_spelling_variants_parse() {
        assert!(parse_madhab("Shafi").is_ok());
        assert!(parse_madhab("Shafi'i").is_ok());
        assert!(parse_madhab("Maliki").is_err());
    }
}
