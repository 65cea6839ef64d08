use anyhow::Result;
use chrono::{Datelike, Duration, NaiveDate};
use hijri_date::HijriDate;

const HIJRI_MONTHS: &[&str] = &[
    "Muharram",
    "Safar",
    "Rabi' al-Awwal",
    "Rabi' al-Thani",
    "Jumada al-Awwal",
    "Jumada al-Thani",
    "Rajab",
    "Sha'ban",
    "Ramadan",
    "Shawwal",
    "Dhu al-Qi'dah",
    "Dhu al-Hijjah",
];

fn month_name(month: usize) -> &'static str {
    HIJRI_MONTHS.get(month.wrapping_sub(1)).copied().unwrap_or("Unknown")
}

#[derive(Debug, Clone)]
pub struct HijriDay {
    pub day: usize,
    pub month: usize,
    pub year: usize,
}

impl HijriDay {
    pub fn formatted(&self) -> String {
        format!("{} {} {} AH", self.day, month_name(self.month), self.year)
    }
}

/// Convert a Gregorian date, shifted by `offset_days` for local moon
/// sighting differences (-1 = one day behind Saudi sighting, etc.).
pub fn to_hijri(date: NaiveDate, offset_days: i32) -> Result<HijriDay> {
    let adjusted = date + Duration::days(offset_days as i64);
    let hd = HijriDate::from_gr(
        adjusted.year() as usize,
        adjusted.month() as usize,
        adjusted.day() as usize,
    )
    .map_err(|e| anyhow::anyhow!("Hijri conversion error: {}", e))?;

    Ok(HijriDay {
        day: hd.day(),
        month: hd.month(),
        year: hd.year(),
    })
}

/// Display string for a date, falling back to the unshifted conversion
/// when the offset lands outside the supported range.
pub fn hijri_string(date: NaiveDate, offset_days: i32) -> String {
    to_hijri(date, offset_days)
        .or_else(|_| to_hijri(date, 0))
        .map(|h| h.formatted())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_shifts_the_hijri_day() {
        let date = NaiveDate::from_ymd_opt(2026, 8, 7).unwrap();
        let base = to_hijri(date, 0).unwrap();
        let behind = to_hijri(date, -1).unwrap();
        assert_ne!(
            (base.day, base.month, base.year),
            (behind.day, behind.month, behind.year)
        );
    }

    #[test]
    fn formatted_names_the_month() {
        let day = HijriDay {
            day: 10,
            month: 9,
            year: 1447,
        };
        assert_eq!(day.formatted(), "10 Ramadan 1447 AH");
    }
}
