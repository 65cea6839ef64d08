use anyhow::Result;
use chrono::Local;
use crossterm::event::KeyCode;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
    Frame,
};
use rusqlite::Connection;
use std::collections::HashMap;

use crate::config::AppConfig;
use crate::db::{self, SqliteStore};
use crate::ledger::Ledger;
use crate::models::{DayStats, PrayerName, RangeStats};
use crate::schedule::{resolve_schedule, ScheduleState, Timetable, TimingSource};
use crate::tui::events::{Event, EventHandler};
use crate::tui::theme;
use crate::tui::widgets::{countdown, dhikr, header, prayers, progress, statusbar};
use crate::utils::hijri::hijri_string;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Dashboard,
    Stats,
    Help,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusSection {
    Prayers,
    Dhikr,
}

pub struct App<'a> {
    conn: &'a Connection,
    config: AppConfig,
    ledger: Ledger,

    view: View,
    focus_section: FocusSection,
    focus_idx: usize,
    should_quit: bool,

    today_str: String,
    hijri_str: String,
    timetable: Option<Timetable>,
    schedule: Option<ScheduleState>,
    dhikr_counts: HashMap<String, i32>,
    week_days: Vec<(String, u32)>,
    week_stats: RangeStats,
    month_stats: RangeStats,
}

impl<'a> App<'a> {
    pub fn new(conn: &'a Connection, config: AppConfig) -> Self {
        let store = SqliteStore::new(conn);
        let ledger = Ledger::load(&store).unwrap_or_else(|e| {
            log::warn!("could not load stored ledger, starting empty: {}", e);
            Ledger::new()
        });

        let mut app = App {
            conn,
            config,
            ledger,
            view: View::Dashboard,
            focus_section: FocusSection::Prayers,
            focus_idx: 0,
            should_quit: false,
            today_str: String::new(),
            hijri_str: String::new(),
            timetable: None,
            schedule: None,
            dhikr_counts: HashMap::new(),
            week_days: Vec::new(),
            week_stats: RangeStats {
                completed: 0,
                total: 0,
                observed_days: 0,
                span_days: 0,
            },
            month_stats: RangeStats {
                completed: 0,
                total: 0,
                observed_days: 0,
                span_days: 0,
            },
        };
        app.refresh();
        app
    }

    /// Recompute every piece of display state, including the date key.
    /// Called at startup, after each mutation, and on day rollover.
    fn refresh(&mut self) {
        let today = Local::now().date_naive();
        self.today_str = today.format("%Y-%m-%d").to_string();
        self.hijri_str = hijri_string(today, self.config.salah.hijri_offset);

        self.ledger.ensure_day(&self.today_str);

        self.timetable = TimingSource::new(
            self.config.location.latitude,
            self.config.location.longitude,
            &self.config.salah.calc_method,
            &self.config.salah.madhab,
            self.config.salah.timezone_offset,
        )
        .and_then(|source| source.timetable(self.conn, today))
        .map_err(|e| log::warn!("no timetable available: {}", e))
        .ok();

        if let Some(timetable) = &self.timetable {
            self.ledger.annotate_times(&self.today_str, timetable);
        }
        self.recompute_schedule();

        self.dhikr_counts = db::dhikr::counts_for_date(self.conn, &self.today_str)
            .unwrap_or_default();

        self.week_days = (0..7)
            .rev()
            .map(|i| {
                let date = (today - chrono::Duration::days(i)).format("%Y-%m-%d").to_string();
                let done = self.ledger.daily_stats(&date).completed;
                (date, done)
            })
            .collect();
        let week_start = (today - chrono::Duration::days(6)).format("%Y-%m-%d").to_string();
        self.week_stats = self.ledger.range_stats(&week_start, &self.today_str);
        let month_start = (today - chrono::Duration::days(29)).format("%Y-%m-%d").to_string();
        self.month_stats = self.ledger.range_stats(&month_start, &self.today_str);
    }

    fn recompute_schedule(&mut self) {
        self.schedule = self
            .timetable
            .as_ref()
            .map(|t| resolve_schedule(t, Local::now().time()));
    }

    /// Once per tick: refresh the countdown, and the whole view when
    /// the calendar date has rolled over since the last refresh.
    fn tick(&mut self) {
        let today_str = Local::now().date_naive().format("%Y-%m-%d").to_string();
        if today_str != self.today_str {
            self.refresh();
        } else {
            self.recompute_schedule();
        }
    }

    fn handle_key(&mut self, key: crossterm::event::KeyEvent) {
        match self.view {
            View::Dashboard => self.handle_dashboard_key(key),
            View::Stats => match key.code {
                KeyCode::Esc | KeyCode::Char('s') => self.view = View::Dashboard,
                _ => {}
            },
            View::Help => match key.code {
                KeyCode::Esc | KeyCode::Char('?') => self.view = View::Dashboard,
                _ => {}
            },
        }
    }

    fn handle_dashboard_key(&mut self, key: crossterm::event::KeyEvent) {
        match key.code {
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('s') => self.view = View::Stats,
            KeyCode::Char('?') => self.view = View::Help,
            KeyCode::Up => {
                if self.focus_idx > 0 {
                    self.focus_idx -= 1;
                }
            }
            KeyCode::Down => {
                let max = match self.focus_section {
                    FocusSection::Prayers => 4,
                    FocusSection::Dhikr => crate::models::DHIKR_PRESETS.len() - 1,
                };
                if self.focus_idx < max {
                    self.focus_idx += 1;
                }
            }
            KeyCode::Tab => {
                self.focus_section = match self.focus_section {
                    FocusSection::Prayers => FocusSection::Dhikr,
                    FocusSection::Dhikr => FocusSection::Prayers,
                };
                self.focus_idx = 0;
            }
            KeyCode::Char('m') | KeyCode::Enter => {
                if self.focus_section == FocusSection::Prayers {
                    self.toggle_focused_prayer();
                }
            }
            // d always drives the dhikr panel, switching focus to it
            KeyCode::Char('d') => {
                if self.focus_section != FocusSection::Dhikr {
                    self.focus_section = FocusSection::Dhikr;
                    self.focus_idx = 0;
                }
                self.bump_focused_dhikr(1);
            }
            KeyCode::Char('0') => {
                if self.focus_section == FocusSection::Dhikr {
                    self.reset_focused_dhikr();
                }
            }
            _ => {}
        }
    }

    fn toggle_focused_prayer(&mut self) {
        let Some(prayer) = PrayerName::all().get(self.focus_idx).copied() else {
            return;
        };
        let completed = self
            .ledger
            .day(&self.today_str)
            .and_then(|d| d.record(prayer))
            .map(|r| r.completed)
            .unwrap_or(false);

        let store = SqliteStore::new(self.conn);
        let today = self.today_str.clone();
        match self.ledger.toggle(&store, &today, prayer, !completed) {
            Ok(_) => {}
            Err(e) if e.is_persistence() => {
                log::warn!("toggle saved in memory only: {}", e);
            }
            Err(e) => log::warn!("toggle rejected: {}", e),
        }
        self.refresh();
    }

    fn bump_focused_dhikr(&mut self, by: i32) {
        if let Some(preset) = crate::models::DHIKR_PRESETS.get(self.focus_idx) {
            if let Err(e) = db::dhikr::add(self.conn, &self.today_str, preset.slug, by) {
                log::warn!("dhikr count not saved: {}", e);
            }
            self.dhikr_counts = db::dhikr::counts_for_date(self.conn, &self.today_str)
                .unwrap_or_default();
        }
    }

    fn reset_focused_dhikr(&mut self) {
        if let Some(preset) = crate::models::DHIKR_PRESETS.get(self.focus_idx) {
            if let Err(e) = db::dhikr::reset(self.conn, &self.today_str, preset.slug) {
                log::warn!("dhikr reset not saved: {}", e);
            }
            self.dhikr_counts = db::dhikr::counts_for_date(self.conn, &self.today_str)
                .unwrap_or_default();
        }
    }

    fn today_stats(&self) -> DayStats {
        self.ledger.daily_stats(&self.today_str)
    }

    // ─── Drawing ─────────────────────────────────────────────────────────────

    pub fn draw(&self, frame: &mut Frame) {
        match self.view {
            View::Dashboard => self.draw_dashboard(frame),
            View::Stats => self.draw_stats(frame),
            View::Help => {
                self.draw_dashboard(frame);
                self.draw_help_overlay(frame);
            }
        }
    }

    fn draw_dashboard(&self, frame: &mut Frame) {
        let area = frame.area();
        frame.render_widget(Block::default().style(theme::base()), area);

        let outer = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(5), // header
                Constraint::Min(0),    // body
                Constraint::Length(1), // status bar
            ])
            .split(area);

        header::render(frame, outer[0], &self.config.location.name, &self.hijri_str);
        statusbar::render(frame, outer[2]);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(outer[1]);

        let left = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(7), Constraint::Length(6), Constraint::Min(0)])
            .split(columns[0]);

        prayers::render(
            frame,
            left[0],
            self.ledger.day(&self.today_str),
            self.schedule.as_ref(),
            self.focus_idx,
            self.focus_section == FocusSection::Prayers,
        );
        if self.config.dhikr.enabled {
            dhikr::render(
                frame,
                left[1],
                &self.dhikr_counts,
                self.focus_idx,
                self.focus_section == FocusSection::Dhikr,
            );
        }

        let right = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(9), Constraint::Min(0)])
            .split(columns[1]);

        countdown::render(
            frame,
            right[0],
            self.schedule.as_ref(),
            self.timetable.as_ref(),
        );
        progress::render(
            frame,
            right[1],
            &self.today_stats(),
            &self.week_days,
            &self.week_stats,
            &self.config.goals,
        );
    }

    fn draw_stats(&self, frame: &mut Frame) {
        let area = frame.area();
        frame.render_widget(Block::default().style(theme::base()), area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0)])
            .split(area);

        let title = Paragraph::new(Line::from(vec![
            Span::styled("  Stats  ", theme::accent().add_modifier(Modifier::BOLD)),
            Span::styled("  [Esc] back", theme::dim()),
        ]));
        frame.render_widget(title, chunks[0]);

        let today = self.today_stats();
        let mut lines = vec![
            Line::from(""),
            Line::from(vec![
                Span::styled("  Today:          ", theme::dim()),
                Span::styled(
                    format!("{}/{} ({}%)", today.completed, today.total, today.percentage()),
                    theme::mint().add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(vec![
                Span::styled("  Week (7d):      ", theme::dim()),
                Span::styled(
                    format!("{}/{}", self.week_stats.completed, self.week_stats.capacity()),
                    theme::bold(),
                ),
                Span::styled(
                    format!("  goal {}", self.config.goals.weekly_target),
                    theme::dim(),
                ),
            ]),
            Line::from(vec![
                Span::styled("  Month (30d):    ", theme::dim()),
                Span::styled(
                    format!("{}/{}", self.month_stats.completed, self.month_stats.capacity()),
                    theme::bold(),
                ),
                Span::styled(
                    format!("  goal {}", self.config.goals.monthly_target),
                    theme::dim(),
                ),
            ]),
            Line::from(vec![
                Span::styled("  Days observed:  ", theme::dim()),
                Span::styled(
                    format!("{}/{}", self.month_stats.observed_days, self.month_stats.span_days),
                    theme::bold(),
                ),
            ]),
            Line::from(""),
            Line::from(Span::styled("  Last 7 Days", theme::accent())),
            Line::from(""),
        ];

        for (date, done) in &self.week_days {
            let bar = match done {
                5 => Span::styled("  ████████████  ", theme::mint()),
                4 => Span::styled("  █████████░░░  ", theme::mint()),
                3 => Span::styled("  ███████░░░░░  ", theme::amber()),
                2 => Span::styled("  █████░░░░░░░  ", theme::amber()),
                1 => Span::styled("  ██░░░░░░░░░░  ", theme::dim()),
                _ => Span::styled("  ░░░░░░░░░░░░  ", theme::dim()),
            };
            lines.push(Line::from(vec![
                bar,
                Span::styled(format!("{}  {}/5", date, done), theme::dim()),
            ]));
        }

        frame.render_widget(Paragraph::new(lines), chunks[1]);
    }

    fn draw_help_overlay(&self, frame: &mut Frame) {
        let area = frame.area();
        let popup = Rect {
            x: area.width / 4,
            y: area.height / 4,
            width: area.width / 2,
            height: (area.height / 2).min(14),
        };
        frame.render_widget(Clear, popup);

        let rows = [
            ("[m] / Enter", "Toggle focused prayer"),
            ("[d]", "Count focused dhikr"),
            ("[0]", "Reset focused dhikr"),
            ("[Tab]", "Switch focus section"),
            ("[↑ ↓]", "Navigate items"),
            ("[s]", "Stats view"),
            ("[?]", "Toggle help"),
            ("[Esc]", "Quit"),
        ];
        let mut text = vec![
            Line::from(Span::styled(
                "  Keybindings",
                theme::accent().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
        ];
        for (key, action) in rows {
            text.push(Line::from(vec![
                Span::styled(format!("  {:<13}", key), theme::accent()),
                Span::styled(action, theme::dim()),
            ]));
        }

        let block = Block::default()
            .title(Span::styled(" Help ", theme::accent()))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::accent())
            .style(theme::surface());
        frame.render_widget(Paragraph::new(text).block(block), popup);
    }
}

/// Run the TUI event loop.
pub fn run(conn: Connection, config: AppConfig) -> Result<()> {
    let mut app = App::new(&conn, config);

    let mut terminal = ratatui::init();
    let events = EventHandler::new(500);

    loop {
        terminal.draw(|frame| app.draw(frame))?;

        match events.next()? {
            Event::Key(key) => {
                app.handle_key(key);
                if app.should_quit {
                    break;
                }
            }
            Event::Tick => app.tick(),
        }
    }

    ratatui::restore();
    Ok(())
}
