use anyhow::Result;
use rusqlite::{params, Connection, OptionalExtension};

use crate::schedule::Timetable;

/// Cached timetable for one date, or None when the date was never
/// computed. A row that no longer parses fails with `InvalidTimetable`
/// rather than being guessed around.
pub fn timetable_for_date(conn: &Connection, date: &str) -> Result<Option<Timetable>> {
    let row = conn
        .query_row(
            "SELECT fajr, sunrise, dhuhr, asr, maghrib, isha
             FROM timetable_cache WHERE date = ?1",
            params![date],
            |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, String>(4)?,
                    row.get::<_, String>(5)?,
                ))
            },
        )
        .optional()?;

    match row {
        None => Ok(None),
        Some((fajr, sunrise, dhuhr, asr, maghrib, isha)) => Ok(Some(Timetable::from_strings(
            &fajr, &sunrise, &dhuhr, &asr, &maghrib, &isha,
        )?)),
    }
}

pub fn store_timetable(conn: &Connection, date: &str, timetable: &Timetable) -> Result<()> {
    let hhmm = |t: chrono::NaiveTime| t.format("%H:%M").to_string();
    conn.execute(
        "INSERT OR REPLACE INTO timetable_cache
             (date, fajr, sunrise, dhuhr, asr, maghrib, isha)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            date,
            hhmm(timetable.fajr),
            hhmm(timetable.sunrise),
            hhmm(timetable.dhuhr),
            hhmm(timetable.asr),
            hhmm(timetable.maghrib),
            hhmm(timetable.isha),
        ],
    )?;
    Ok(())
}

pub fn clear(conn: &Connection) -> Result<()> {
    conn.execute("DELETE FROM timetable_cache", [])?;
    Ok(())
}
