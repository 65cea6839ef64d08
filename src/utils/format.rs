use chrono::NaiveTime;

/// Format a countdown in whole minutes as "Xh Ym" or "Ym".
/// Zero means the prayer starts this minute.
pub fn format_minutes(minutes: u32) -> String {
    if minutes == 0 {
        return "now".to_string();
    }
    let hours = minutes / 60;
    let mins = minutes % 60;
    if hours > 0 {
        format!("{}h {}m", hours, mins)
    } else {
        format!("{}m", mins)
    }
}

/// "HH:MM"
pub fn format_time(t: NaiveTime) -> String {
    t.format("%H:%M").to_string()
}

/// "h:MM AM/PM"
pub fn format_time_12h(t: NaiveTime) -> String {
    t.format("%-I:%M %p").to_string()
}

/// Simple block progress bar.
pub fn progress_bar(filled: u32, total: u32, width: usize) -> String {
    if total == 0 {
        return "░".repeat(width);
    }
    let ratio = (filled as f64 / total as f64).min(1.0);
    let filled_count = (ratio * width as f64).round() as usize;
    format!(
        "{}{}",
        "█".repeat(filled_count),
        "░".repeat(width.saturating_sub(filled_count))
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minutes_render_as_hours_and_minutes() {
        assert_eq!(format_minutes(0), "now");
        assert_eq!(format_minutes(45), "45m");
        assert_eq!(format_minutes(165), "2h 45m");
        assert_eq!(format_minutes(480), "8h 0m");
    }

    #[test]
    fn twelve_hour_formatting() {
        let t = NaiveTime::from_hms_opt(19, 50, 0).unwrap();
        assert_eq!(format_time_12h(t), "7:50 PM");
        let t = NaiveTime::from_hms_opt(4, 30, 0).unwrap();
        assert_eq!(format_time_12h(t), "4:30 AM");
        assert_eq!(format_time(t), "04:30");
    }

    #[test]
    fn bar_clamps_and_fills() {
        assert_eq!(progress_bar(0, 5, 5), "░░░░░");
        assert_eq!(progress_bar(2, 5, 5), "██░░░");
        assert_eq!(progress_bar(7, 5, 5), "█████");
        assert_eq!(progress_bar(1, 0, 4), "░░░░");
    }
}
