use ratatui::{
    layout::Rect,
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use crate::config::settings::GoalsConfig;
use crate::models::{DayStats, RangeStats};
use crate::tui::theme;
use crate::utils::format::progress_bar;

pub fn render(
    frame: &mut Frame,
    area: Rect,
    today: &DayStats,
    week_days: &[(String, u32)],
    week: &RangeStats,
    goals: &GoalsConfig,
) {
    let block = Block::default()
        .title(Span::styled(" Progress ", theme::accent()))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border(false))
        .style(theme::surface());

    let mut lines = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled("  Today   ", theme::dim()),
            Span::styled(
                progress_bar(today.completed, today.total, 10),
                theme::mint(),
            ),
            Span::styled(
                format!("  {}/{}  {}%", today.completed, today.total, today.percentage()),
                theme::bold(),
            ),
        ]),
        Line::from(""),
    ];

    // One cell per day, oldest first.
    let mut cells = vec![Span::styled("  Week    ", theme::dim())];
    for (_, done) in week_days {
        let (glyph, style) = match done {
            5 => ("●", theme::mint()),
            3 | 4 => ("◕", theme::amber()),
            1 | 2 => ("◑", theme::amber()),
            _ => ("○", theme::dim()),
        };
        cells.push(Span::styled(format!("{} ", glyph), style));
    }
    lines.push(Line::from(cells));
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("  Weekly  ", theme::dim()),
        Span::styled(
            format!("{}/{}", week.completed, week.capacity()),
            theme::bold().add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!("  goal {}", goals.weekly_target), theme::dim()),
    ]));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
