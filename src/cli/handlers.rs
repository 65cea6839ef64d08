use anyhow::{anyhow, Result};
use chrono::Local;
use rusqlite::Connection;
use std::io::{self, BufRead, Write};
use std::str::FromStr;

use crate::cli::args::DhikrCommands;
use crate::config::AppConfig;
use crate::db::{self, SqliteStore, Storage};
use crate::ledger::{Ledger, NotificationSink};
use crate::models::{PrayerName, ToggleEvent, DHIKR_PRESETS};
use crate::schedule::{resolve_schedule, timings::CALC_METHODS, TimingSource};
use crate::utils::format::{format_minutes, format_time, format_time_12h, progress_bar};
use crate::utils::qibla::{compass_point, qibla_bearing};

// ─── ANSI helpers ────────────────────────────────────────────────────────────

macro_rules! println_colored {
    ($color:expr, $($arg:tt)*) => {{
        print!("{}", $color);
        print!($($arg)*);
        println!("\x1b[0m");
    }};
}

const GREEN: &str = "\x1b[32m";
const AMBER: &str = "\x1b[33m";
const DIM: &str = "\x1b[2m";
const BOLD: &str = "\x1b[1m";
const GOLD: &str = "\x1b[38;2;212;175;55m";

/// Prints toggle events as they happen.
struct CliNotifier;

impl NotificationSink for CliNotifier {
    fn prayer_toggled(&self, event: &ToggleEvent) {
        if event.completed {
            println_colored!(GREEN, "  ✓ {} marked as prayed", event.prayer);
        } else {
            println_colored!(DIM, "  ○ {} unmarked", event.prayer);
        }
    }
}

fn timing_source(config: &AppConfig) -> Result<TimingSource> {
    TimingSource::new(
        config.location.latitude,
        config.location.longitude,
        &config.salah.calc_method,
        &config.salah.madhab,
        config.salah.timezone_offset,
    )
}

/// Load the persisted ledger; a corrupt blob logs a warning and starts
/// fresh rather than blocking every command.
fn open_ledger(store: &dyn Storage) -> Ledger {
    Ledger::load(store).unwrap_or_else(|e| {
        log::warn!("could not load stored ledger, starting empty: {}", e);
        Ledger::new()
    })
}

fn today_key() -> String {
    Local::now().date_naive().format("%Y-%m-%d").to_string()
}

// ─── Setup wizard ────────────────────────────────────────────────────────────

pub fn handle_setup(conn: &Connection, config: &mut AppConfig, reset: bool) -> Result<()> {
    let store = SqliteStore::new(conn);
    if !reset {
        if let Some(done) = store.get("setup_done")? {
            if done == "1" {
                println!("qiyam is already configured. Use --reset to reconfigure.");
                return Ok(());
            }
        }
    }

    println!();
    println_colored!(GOLD, "  qiyam setup");
    println!();

    let name = prompt(&format!("  Location name [{}]: ", config.location.name))?;
    if !name.is_empty() {
        config.location.name = name;
    }

    let lat = prompt(&format!("  Latitude [{}]: ", config.location.latitude))?;
    if !lat.is_empty() {
        config.location.latitude = lat.parse()?;
    }
    let lng = prompt(&format!("  Longitude [{}]: ", config.location.longitude))?;
    if !lng.is_empty() {
        config.location.longitude = lng.parse()?;
    }

    println!();
    println_colored!(DIM, "  Calculation methods:");
    for (i, method) in CALC_METHODS.iter().enumerate() {
        println_colored!(DIM, "    {:>2}. {}", i + 1, method);
    }
    let method = prompt(&format!("  Method [{}]: ", config.salah.calc_method))?;
    if !method.is_empty() {
        config.salah.calc_method = match method.parse::<usize>() {
            Ok(n) if n >= 1 && n <= CALC_METHODS.len() => CALC_METHODS[n - 1].to_string(),
            _ => method,
        };
    }

    let madhab = prompt(&format!("  Madhab (Hanafi/Shafi) [{}]: ", config.salah.madhab))?;
    if !madhab.is_empty() {
        config.salah.madhab = madhab;
    }

    let tz = prompt(&format!(
        "  UTC offset [{}]: ",
        format_tz_offset(config.salah.timezone_offset)
    ))?;
    if !tz.is_empty() {
        config.salah.timezone_offset = parse_tz_offset(&tz)?;
    }

    // Reject an invalid method/madhab combination before saving
    timing_source(config)?;
    config.save()?;

    db::cache::clear(conn)?;
    store.set("setup_done", "1")?;

    println!();
    println_colored!(GREEN, "  ✓ Configuration saved for {}", config.location.name);
    Ok(())
}

// ─── Times ───────────────────────────────────────────────────────────────────

pub fn handle_times(conn: &Connection, config: &AppConfig) -> Result<()> {
    let today = Local::now().date_naive();
    let now = Local::now().time();

    let source = timing_source(config)?;
    let timetable = source.timetable(conn, today)?;
    let state = resolve_schedule(&timetable, now);

    println!();
    println_colored!(
        GOLD,
        "  Prayer Times — {} ({})",
        config.location.name,
        today.format("%Y-%m-%d")
    );
    println!();

    let rows = [
        ("Fajr", timetable.fajr),
        ("Sunrise", timetable.sunrise),
        ("Dhuhr", timetable.dhuhr),
        ("Asr", timetable.asr),
        ("Maghrib", timetable.maghrib),
        ("Isha", timetable.isha),
    ];
    for (name, time) in &rows {
        let line = format!("  {:<10}  {}", name, format_time(*time));
        if *name == state.current.display_name() {
            println_colored!(BOLD, "{}  ← current", line);
        } else if *name == state.next.display_name() {
            println_colored!(AMBER, "{}  ← next", line);
        } else {
            println_colored!(DIM, "{}", line);
        }
    }

    println!();
    println_colored!(
        AMBER,
        "  {} in {}  ({})",
        state.next,
        format_minutes(state.minutes_remaining),
        format_time_12h(timetable.time_of(state.next))
    );
    println!();
    Ok(())
}

// ─── Mark ────────────────────────────────────────────────────────────────────

pub fn handle_mark(conn: &Connection, config: &AppConfig, prayer_str: &str, undo: bool) -> Result<()> {
    let prayer = PrayerName::from_str(prayer_str)
        .map_err(|_| anyhow!("Unknown prayer '{}'. Use: fajr, dhuhr, asr, maghrib, isha", prayer_str))?;
    let today = today_key();

    let store = SqliteStore::new(conn);
    let mut ledger = open_ledger(&store);
    ledger.set_sink(Box::new(CliNotifier));
    ledger.ensure_day(&today);

    // Annotate start times when the timetable is available; purely
    // cosmetic, so a failed computation does not block the toggle.
    if let Ok(source) = timing_source(config) {
        if let Ok(timetable) = source.timetable(conn, Local::now().date_naive()) {
            ledger.annotate_times(&today, &timetable);
        }
    }

    match ledger.toggle(&store, &today, prayer, !undo) {
        Ok(_) => {}
        Err(e) if e.is_persistence() => {
            log::warn!("toggle saved in memory only: {}", e);
        }
        Err(e) => return Err(e.into()),
    }

    let stats = ledger.daily_stats(&today);
    println_colored!(
        DIM,
        "  Today: {}/{} ({}%)",
        stats.completed,
        stats.total,
        stats.percentage()
    );
    Ok(())
}

// ─── Stats ───────────────────────────────────────────────────────────────────

pub fn handle_stats(conn: &Connection, config: &AppConfig, week: bool, month: bool) -> Result<()> {
    let store = SqliteStore::new(conn);
    let ledger = open_ledger(&store);
    let today = Local::now().date_naive();
    let today_str = today.format("%Y-%m-%d").to_string();

    let daily = ledger.daily_stats(&today_str);

    println!();
    println_colored!(GOLD, "  Statistics");
    println!();
    println_colored!(
        BOLD,
        "  Today:    {}/{}  {}  {}%",
        daily.completed,
        daily.total,
        progress_bar(daily.completed, daily.total, 10),
        daily.percentage()
    );

    if week || !month {
        let start = (today - chrono::Duration::days(6)).format("%Y-%m-%d").to_string();
        let stats = ledger.range_stats(&start, &today_str);
        println_colored!(
            BOLD,
            "  Week:     {}/{} prayed, {}%  (goal {})",
            stats.completed,
            stats.capacity(),
            stats.percentage_of_capacity(),
            config.goals.weekly_target
        );
    }

    if month {
        let start = (today - chrono::Duration::days(29)).format("%Y-%m-%d").to_string();
        let stats = ledger.range_stats(&start, &today_str);
        println_colored!(
            BOLD,
            "  Month:    {}/{} prayed, {}%  (goal {})",
            stats.completed,
            stats.capacity(),
            stats.percentage_of_capacity(),
            config.goals.monthly_target
        );
    }

    if week {
        println!();
        println_colored!(DIM, "  Last 7 days  (● = 5/5, ◕ = 3-4, ◑ = 1-2, ○ = 0)");
        println!();
        print!("  ");
        for i in (0..7).rev() {
            let date = (today - chrono::Duration::days(i)).format("%Y-%m-%d").to_string();
            let done = ledger.daily_stats(&date).completed;
            let icon = match done {
                5 => format!("{}●\x1b[0m ", GREEN),
                3 | 4 => format!("{}◕\x1b[0m ", AMBER),
                1 | 2 => format!("{}◑\x1b[0m ", AMBER),
                _ => format!("{}○\x1b[0m ", DIM),
            };
            print!("{}", icon);
        }
        println!();
    }

    println!();
    Ok(())
}

// ─── Dhikr ───────────────────────────────────────────────────────────────────

pub fn handle_dhikr(conn: &Connection, action: &DhikrCommands) -> Result<()> {
    let today = today_key();

    match action {
        DhikrCommands::List => {
            let counts = db::dhikr::counts_for_date(conn, &today)?;
            println!();
            println_colored!(GOLD, "  Dhikr");
            println!();
            for preset in &DHIKR_PRESETS {
                let count = counts.get(preset.slug).copied().unwrap_or(0);
                let status = if count >= preset.target {
                    format!("{}✓ {}/{}\x1b[0m", GREEN, count, preset.target)
                } else {
                    format!("{}/{}", count, preset.target)
                };
                println!("  {:<20} {:<24} {}", preset.name, preset.arabic, status);
            }
            println!();
        }
        DhikrCommands::Count { name, by } => {
            let preset = crate::models::dhikr::find_preset(name)
                .ok_or_else(|| anyhow!("Unknown dhikr '{}'", name))?;
            let count = db::dhikr::add(conn, &today, preset.slug, *by)?;
            if count >= preset.target {
                println_colored!(GREEN, "  ✓ {} — {}/{} (complete)", preset.name, count, preset.target);
            } else {
                println_colored!(AMBER, "  ◑ {} — {}/{}", preset.name, count, preset.target);
            }
        }
        DhikrCommands::Reset { name } => {
            let preset = crate::models::dhikr::find_preset(name)
                .ok_or_else(|| anyhow!("Unknown dhikr '{}'", name))?;
            db::dhikr::reset(conn, &today, preset.slug)?;
            println_colored!(DIM, "  {} reset to 0", preset.name);
        }
    }
    Ok(())
}

// ─── Qibla ───────────────────────────────────────────────────────────────────

pub fn handle_qibla(config: &AppConfig) -> Result<()> {
    let bearing = qibla_bearing(config.location.latitude, config.location.longitude);
    println!();
    println_colored!(GOLD, "  Qibla from {}", config.location.name);
    println!();
    println_colored!(
        BOLD,
        "  {:.1}° from true north  ({})",
        bearing,
        compass_point(bearing)
    );
    println!();
    Ok(())
}

// ─── Export ──────────────────────────────────────────────────────────────────

pub fn handle_export(conn: &Connection, config: &AppConfig) -> Result<()> {
    let store = SqliteStore::new(conn);
    let ledger = open_ledger(&store);
    let today = Local::now().date_naive();
    let today_str = today.format("%Y-%m-%d").to_string();
    let week_start = (today - chrono::Duration::days(6)).format("%Y-%m-%d").to_string();

    let stats = ledger.range_stats(&week_start, &today_str);

    println!("# qiyam — Weekly Summary");
    println!("# {}", today_str);
    println!();
    println!("Location: {}", config.location.name);
    println!("Method:   {}", config.salah.calc_method);
    println!();
    println!("## Prayer Completion (last 7 days)");
    for i in (0..7).rev() {
        let date = (today - chrono::Duration::days(i)).format("%Y-%m-%d").to_string();
        let done = ledger.daily_stats(&date).completed;
        let bar = match done {
            5 => "█████",
            4 => "████░",
            3 => "███░░",
            2 => "██░░░",
            1 => "█░░░░",
            _ => "░░░░░",
        };
        println!("  {}  {}/5  {}", date, done, bar);
    }
    println!();
    println!("## Summary");
    println!(
        "  Week:  {}/{} prayed (goal {})",
        stats.completed,
        stats.capacity(),
        config.goals.weekly_target
    );
    println!("  Days with activity: {}/{}", stats.observed_days, stats.span_days);
    Ok(())
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

fn prompt(message: &str) -> Result<String> {
    print!("{}", message);
    io::stdout().flush()?;
    let mut buf = String::new();
    io::stdin().lock().read_line(&mut buf)?;
    Ok(buf.trim_end_matches('\n').trim_end_matches('\r').trim().to_string())
}

/// Parse a UTC offset string into total minutes.
/// Accepts: "5:30", "+5:30", "-5:30", "5", "+5", "5.5"
fn parse_tz_offset(s: &str) -> Result<i32> {
    let s = s.trim_start_matches('+');
    let negative = s.starts_with('-');
    let s = s.trim_start_matches('-');
    let sign = if negative { -1 } else { 1 };

    let minutes = if s.contains(':') {
        let mut parts = s.splitn(2, ':');
        let hours: i32 = parts.next().unwrap_or("0").parse()?;
        let mins: i32 = parts.next().unwrap_or("0").parse()?;
        hours * 60 + mins
    } else if s.contains('.') {
        let hours: f64 = s.parse()?;
        (hours * 60.0).round() as i32
    } else {
        let hours: i32 = s.parse()?;
        hours * 60
    };

    Ok(sign * minutes)
}

/// Format total minutes as "+H:MM"
fn format_tz_offset(minutes: i32) -> String {
    let sign = if minutes < 0 { "-" } else { "+" };
    let abs = minutes.abs();
    let h = abs / 60;
    let m = abs % 60;
    if m == 0 {
        format!("{}{}", sign, h)
    } else {
        format!("{}{}:{:02}", sign, h, m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tz_offsets_parse_in_all_spellings() {
        assert_eq!(parse_tz_offset("5:30").unwrap(), 330);
        assert_eq!(parse_tz_offset("+5:30").unwrap(), 330);
        assert_eq!(parse_tz_offset("-5:30").unwrap(), -330);
        assert_eq!(parse_tz_offset("6").unwrap(), 360);
        assert_eq!(parse_tz_offset("5.5").unwrap(), 330);
    }

    #[test]
    fn tz_offsets_format_back() {
        assert_eq!(format_tz_offset(330), "+5:30");
        assert_eq!(format_tz_offset(-330), "-5:30");
        assert_eq!(format_tz_offset(360), "+6");
    }
}
