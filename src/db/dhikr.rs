use anyhow::Result;
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashMap;

/// Counts for every dhikr logged on `date`, keyed by slug.
pub fn counts_for_date(conn: &Connection, date: &str) -> Result<HashMap<String, i32>> {
    let mut stmt = conn.prepare("SELECT slug, count FROM dhikr_log WHERE date = ?1")?;
    let rows = stmt.query_map(params![date], |row| {
        Ok((row.get::<_, String>(0)?, row.get::<_, i32>(1)?))
    })?;

    let mut counts = HashMap::new();
    for row in rows {
        let (slug, count) = row?;
        counts.insert(slug, count);
    }
    Ok(counts)
}

pub fn count_for(conn: &Connection, date: &str, slug: &str) -> Result<i32> {
    let count = conn
        .query_row(
            "SELECT count FROM dhikr_log WHERE date = ?1 AND slug = ?2",
            params![date, slug],
            |row| row.get(0),
        )
        .optional()?;
    Ok(count.unwrap_or(0))
}

/// Add `by` to today's count for `slug` and return the new total.
pub fn add(conn: &Connection, date: &str, slug: &str, by: i32) -> Result<i32> {
    conn.execute(
        "INSERT INTO dhikr_log (slug, date, count) VALUES (?1, ?2, ?3)
         ON CONFLICT(slug, date) DO UPDATE SET count = count + ?3",
        params![slug, date, by],
    )?;
    count_for(conn, date, slug)
}

pub fn reset(conn: &Connection, date: &str, slug: &str) -> Result<()> {
    conn.execute(
        "DELETE FROM dhikr_log WHERE date = ?1 AND slug = ?2",
        params![date, slug],
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;

    #[test]
    fn add_accumulates_per_date_and_slug() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();

        assert_eq!(add(&conn, "2026-08-07", "subhanallah", 1).unwrap(), 1);
        assert_eq!(add(&conn, "2026-08-07", "subhanallah", 10).unwrap(), 11);
        assert_eq!(add(&conn, "2026-08-08", "subhanallah", 3).unwrap(), 3);
        assert_eq!(add(&conn, "2026-08-07", "alhamdulillah", 5).unwrap(), 5);

        let counts = counts_for_date(&conn, "2026-08-07").unwrap();
        assert_eq!(counts.get("subhanallah"), Some(&11));
        assert_eq!(counts.get("alhamdulillah"), Some(&5));
    }

    #[test]
    fn reset_clears_one_slug_only() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();

        add(&conn, "2026-08-07", "subhanallah", 20).unwrap();
        add(&conn, "2026-08-07", "allahu-akbar", 7).unwrap();
        reset(&conn, "2026-08-07", "subhanallah").unwrap();

        assert_eq!(count_for(&conn, "2026-08-07", "subhanallah").unwrap(), 0);
        assert_eq!(count_for(&conn, "2026-08-07", "allahu-akbar").unwrap(), 7);
    }
}
